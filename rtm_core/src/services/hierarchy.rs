//! Hierarchical client breakdown (sunburst projection).
//!
//! Groups the filtered table by every prefix of the level fields and
//! emits one node per group. Two aggregation bases are computed per node
//! and must not be conflated: `weight` counts matching raw rows and
//! drives proportional layout, `clients` counts distinct client
//! identifiers and is what gets displayed.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::domain::{ClientRecord, Field};
use crate::services::colors::{self, Rgba};

/// One node of the breakdown tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    /// Synthetic id: level tag plus the escaped path values.
    pub id: String,
    pub label: String,
    /// Id of the parent node; empty for root-level nodes.
    pub parent: String,
    /// Count of matching raw rows, for proportional layout. For every
    /// non-leaf node this equals the sum of its children's weights.
    pub weight: u64,
    /// Count of distinct client identifiers matching this node's path.
    pub clients: u64,
    pub color: Rgba,
}

/// Default level order: operating unit, sales method, visit rhythm,
/// weekly visit-frequency bucket.
pub const DEFAULT_LEVELS: [Field; 4] = [
    Field::OperatingUnit,
    Field::SalesMethod,
    Field::Rhythm,
    Field::FrequencyBucket,
];

/// Path values may contain the separator, so it gets escaped rather than
/// forbidden.
fn escape_segment(value: &str) -> String {
    value.replace('\\', "\\\\").replace('/', "\\/")
}

fn node_id(level: usize, path: &[String]) -> String {
    let joined: Vec<String> = path.iter().map(|v| escape_segment(v)).collect();
    format!("l{}:{}", level, joined.join("/"))
}

/// Fixed-table color for a node value at `field`. Levels without a table
/// of their own take the shared gray default.
pub fn level_color(field: Field, value: &str) -> Rgba {
    match field {
        Field::SalesMethod => colors::sales_method_color(value),
        Field::Rhythm => colors::rhythm_color(value),
        Field::FrequencyBucket => colors::frequency_color(value),
        _ => colors::DEFAULT_CATEGORY_COLOR,
    }
}

/// Build the breakdown tree over `rows`. `id_of` extracts the client
/// identifier used for the distinct count. Blank level values group under
/// the "Sin dato" label so every row lands in exactly one group per
/// level, which keeps parent weights equal to the sum of their children.
pub fn aggregate<'a, F>(rows: &'a [ClientRecord], levels: &[Field], id_of: F) -> Vec<HierarchyNode>
where
    F: Fn(&'a ClientRecord) -> &'a str,
{
    let mut nodes = Vec::new();

    for prefix_len in 1..=levels.len() {
        let mut groups: BTreeMap<Vec<String>, (u64, BTreeSet<&str>)> = BTreeMap::new();
        for row in rows {
            let path: Vec<String> = levels[..prefix_len]
                .iter()
                .map(|field| field.display_value(row))
                .collect();
            let entry = groups.entry(path).or_default();
            entry.0 += 1;
            entry.1.insert(id_of(row));
        }

        let field = levels[prefix_len - 1];
        for (path, (weight, client_ids)) in groups {
            let value = path.last().map(String::as_str).unwrap_or_default();
            let parent = if prefix_len == 1 {
                String::new()
            } else {
                node_id(prefix_len - 1, &path[..prefix_len - 1])
            };

            nodes.push(HierarchyNode {
                id: node_id(prefix_len, &path),
                label: field.node_label(value),
                parent,
                weight,
                clients: client_ids.len() as u64,
                color: level_color(field, value),
            });
        }
    }

    nodes
}
