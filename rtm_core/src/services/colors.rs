//! Category colors.
//!
//! Two distinct schemes coexist and are never merged:
//!
//! - a deterministic hash colorizer ([`color_of`]) for arbitrary category
//!   strings on the map, with a session-scoped legend cache keyed by the
//!   active grouping field;
//! - small fixed lookup tables for the hierarchy levels (sales method,
//!   rhythm, frequency bucket) with a gray default for unmapped labels.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::domain::Field;

/// RGBA color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(code: &str) -> Option<Self> {
        let bytes = hex::decode(code.strip_prefix('#').unwrap_or(code)).ok()?;
        match bytes.as_slice() {
            [r, g, b] => Some(Self::new(*r, *g, *b, 255)),
            [r, g, b, a] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// CSS `rgba(r,g,b,a)` string with alpha scaled to 0..1.
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{:.2})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }

    /// `#rrggbb` string, alpha dropped.
    pub fn hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

/// Alpha applied to hash-derived point colors.
pub const POINT_ALPHA: u8 = 200;

/// Fallback for labels absent from a fixed lookup table.
pub const DEFAULT_CATEGORY_COLOR: Rgba = Rgba::new(200, 200, 200, 204);

/// Point color when no grouping field is active.
pub const DEFAULT_POINT_COLOR: Rgba = Rgba::new(255, 0, 0, 200);

/// Deterministic color for a category value: a pure function of the
/// string's UTF-8 bytes. The low-order bytes of the SHA-256 digest feed
/// the R, G and B channels; alpha is fixed. Collisions between different
/// inputs are acceptable and not corrected.
pub fn color_of(value: &str) -> Rgba {
    let digest = Sha256::digest(value.as_bytes());
    Rgba::new(digest[0], digest[1], digest[2], POINT_ALPHA)
}

static SALES_METHOD_COLORS: Lazy<HashMap<&'static str, Rgba>> = Lazy::new(|| {
    [
        ("(?)", "#282a2e"),
        ("1DA", "#37b741"),
        ("2DA", "#cfb53a"),
        ("3DA", "#ff0000"),
        ("NO DATA", "#ff0000"),
        ("-", "#ff0000"),
    ]
    .into_iter()
    .map(|(label, code)| (label, Rgba::from_hex(code).unwrap_or(DEFAULT_CATEGORY_COLOR)))
    .collect()
});

static RHYTHM_COLORS: Lazy<HashMap<&'static str, Rgba>> = Lazy::new(|| {
    [("1", "#2ca02c"), ("2", "#1f77b4"), ("3", "#ff7f0e"), ("4", "#d62728")]
        .into_iter()
        .map(|(label, code)| (label, Rgba::from_hex(code).unwrap_or(DEFAULT_CATEGORY_COLOR)))
        .collect()
});

static FREQUENCY_COLORS: Lazy<HashMap<&'static str, Rgba>> = Lazy::new(|| {
    [
        ("1", "#2ca02c"),
        ("2", "#1f77b4"),
        ("3", "#9467bd"),
        ("4", "#ff7f0e"),
        ("5", "#cfb53a"),
        ("6", "#d62728"),
    ]
    .into_iter()
    .map(|(label, code)| (label, Rgba::from_hex(code).unwrap_or(DEFAULT_CATEGORY_COLOR)))
    .collect()
});

pub fn sales_method_color(label: &str) -> Rgba {
    SALES_METHOD_COLORS
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

pub fn rhythm_color(label: &str) -> Rgba {
    RHYTHM_COLORS
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

pub fn frequency_color(label: &str) -> Rgba {
    FREQUENCY_COLORS
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Session-scoped legend cache.
///
/// Binds one color map to the currently active grouping field. The map is
/// built over the *global* dataset domain, so a category keeps its color
/// while filters narrow the visible rows; only a change of field rebuilds
/// it. Each session owns its own cache; the active field differs per
/// session, so the cache must never be shared.
#[derive(Debug, Clone, Default)]
pub struct LegendCache {
    field: Option<Field>,
    colors: BTreeMap<String, Rgba>,
}

impl LegendCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_field(&self) -> Option<Field> {
        self.field
    }

    /// Rebuild the color map iff the grouping field changed. Filter
    /// changes alone never rebuild.
    pub fn ensure(&mut self, field: Field, global_domain: &BTreeSet<String>) {
        if self.field != Some(field) {
            self.field = Some(field);
            self.colors = global_domain
                .iter()
                .map(|value| (value.clone(), color_of(value)))
                .collect();
            log::debug!(
                "legend rebuilt for field '{}' over {} categories",
                field.name(),
                self.colors.len()
            );
        }
    }

    /// Color map for `field`, rebuilding first if the field changed.
    pub fn legend_for(&mut self, field: Field, global_domain: &BTreeSet<String>) -> &BTreeMap<String, Rgba> {
        self.ensure(field, global_domain);
        &self.colors
    }

    /// Cached color for a value, gray default for unknown categories.
    pub fn color(&self, value: &str) -> Rgba {
        self.colors
            .get(value)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}
