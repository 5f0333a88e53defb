//! Cascading dependent filters.
//!
//! Each stage's option set is computed from the *output* of the previous
//! stage, never from the raw table; that is what makes the stages
//! dependent. An empty selection empties the table outright instead of
//! acting as "no filter". Downstream stages then see no rows and no
//! options, and the caller gets an explicit empty result.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::domain::{ClientRecord, Field};

/// User selection for one filter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Everything currently available at this stage (the "select all"
    /// checkbox state).
    All,
    /// An explicit subset of the stage's options. An empty set is honored
    /// as-is and yields an empty table.
    Chosen(BTreeSet<String>),
}

impl Selection {
    pub fn chosen<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Chosen(values.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Selection::Chosen(BTreeSet::new())
    }
}

/// Static description of a pipeline stage: which field it filters on and
/// whether the UI should start with "select all" checked. The engine only
/// consumes resolved [`Selection`]s; the default flag is metadata for the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub field: Field,
    pub default_select_all: bool,
}

/// What one stage saw and kept during a cascade run, for rendering the
/// filter widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub field: Field,
    /// Sorted distinct non-blank values available at this stage.
    pub options: Vec<String>,
    /// The subset of `options` that was kept, in option order.
    pub selected: Vec<String>,
}

/// Filtered table plus the per-stage snapshots.
#[derive(Debug, Clone)]
pub struct CascadeResult {
    pub rows: Vec<ClientRecord>,
    pub stages: Vec<StageSnapshot>,
}

impl CascadeResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sorted distinct stringified values of `field` over `rows`, blanks
/// excluded.
pub fn stage_options(rows: &[ClientRecord], field: Field) -> Vec<String> {
    let distinct: BTreeSet<String> = rows.iter().filter_map(|r| field.value_of(r)).collect();
    distinct.into_iter().collect()
}

/// Fold the stages left over `records`, narrowing at each step.
pub fn apply_cascade(
    records: &[ClientRecord],
    stages: &[(Field, Selection)],
) -> CascadeResult {
    let mut rows: Vec<ClientRecord> = records.to_vec();
    let mut snapshots = Vec::with_capacity(stages.len());

    for (field, selection) in stages {
        let options = stage_options(&rows, *field);
        let selected: Vec<String> = match selection {
            Selection::All => options.clone(),
            Selection::Chosen(set) => options
                .iter()
                .filter(|option| set.contains(option.as_str()))
                .cloned()
                .collect(),
        };

        if selected.is_empty() {
            // Empty selection empties the table; it is not a no-op.
            rows.clear();
        } else {
            let keep: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
            rows.retain(|record| {
                field
                    .value_of(record)
                    .map(|value| keep.contains(value.as_str()))
                    .unwrap_or(false)
            });
        }

        snapshots.push(StageSnapshot {
            field: *field,
            options,
            selected,
        });
    }

    CascadeResult {
        rows,
        stages: snapshots,
    }
}
