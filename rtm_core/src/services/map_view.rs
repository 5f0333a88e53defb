//! Map point-layer projection.
//!
//! Consumes the filtered table through the map-table preparation (one
//! point per client, coordinates required) and attaches a color per
//! point plus a legend. Legend colors always come from the global
//! dataset domain via the session cache; legend counts reflect the
//! currently visible points.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::dataset::Dataset;
use crate::core::domain::{ClientRecord, Field};
use crate::services::colors::{LegendCache, Rgba, DEFAULT_CATEGORY_COLOR, DEFAULT_POINT_COLOR};
use crate::transformations::cleaning::prepare_map_table;

/// Point coloring mode: flat default color, or hash colors keyed by a
/// grouping field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorBy {
    None,
    Field(Field),
}

/// One plotted client, tooltip fields inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub client_id: String,
    pub client_name: String,
    pub route: String,
    pub commercial_figure: String,
    pub gec_group: String,
    pub distribution_group: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    /// Visible points carrying this category under the current filters.
    pub count: usize,
}

/// Everything the map renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub points: Vec<MapPoint>,
    /// Mean of the visible coordinates; `None` when nothing is plotted.
    pub center: Option<(f64, f64)>,
    pub dropped_missing_coords: usize,
    pub deduplicated_clients: usize,
    /// Empty when no grouping field is active.
    pub legend: Vec<LegendEntry>,
}

fn point_from(record: &ClientRecord, color: Rgba) -> Option<MapPoint> {
    let (latitude, longitude) = (record.latitude?, record.longitude?);
    Some(MapPoint {
        client_id: record.client_id.clone(),
        client_name: record.client_name.clone(),
        route: record.route.clone(),
        commercial_figure: record.commercial_figure.clone(),
        gec_group: record.gec_group.clone(),
        distribution_group: record.distribution_group.clone(),
        latitude,
        longitude,
        color,
    })
}

/// Build the map projection for the filtered rows.
pub fn build_map_data(
    filtered: &[ClientRecord],
    color_by: ColorBy,
    cache: &mut LegendCache,
    dataset: &Dataset,
) -> MapData {
    let table = prepare_map_table(filtered);

    if let ColorBy::Field(field) = color_by {
        cache.ensure(field, &dataset.field_domain(field));
    }

    let mut points = Vec::with_capacity(table.rows.len());
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in &table.rows {
        let color = match color_by {
            ColorBy::None => DEFAULT_POINT_COLOR,
            ColorBy::Field(field) => match field.value_of(record) {
                Some(value) => {
                    let color = cache.color(&value);
                    *counts.entry(value).or_default() += 1;
                    color
                }
                None => DEFAULT_CATEGORY_COLOR,
            },
        };
        if let Some(point) = point_from(record, color) {
            points.push(point);
        }
    }

    let center = if points.is_empty() {
        None
    } else {
        let n = points.len() as f64;
        let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
        let lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;
        Some((lat, lon))
    };

    let legend = counts
        .into_iter()
        .map(|(label, count)| LegendEntry {
            color: cache.color(&label),
            label,
            count,
        })
        .collect();

    MapData {
        points,
        center,
        dropped_missing_coords: table.dropped_missing_coords,
        deduplicated_clients: table.duplicate_clients,
        legend,
    }
}
