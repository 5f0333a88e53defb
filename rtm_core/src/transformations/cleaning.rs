//! Map-table preparation.
//!
//! The map view needs numeric coordinates and exactly one point per
//! client. Both operations apply to a copy of the filtered table;
//! aggregation and compliance keep working on the unmodified filtered
//! rows so their visit-count totals are unaffected.

use crate::core::domain::ClientRecord;

/// Filtered rows ready for the map renderer, plus exclusion counters.
#[derive(Debug, Clone)]
pub struct MapTable {
    pub rows: Vec<ClientRecord>,
    /// Rows dropped for lacking a parseable latitude or longitude.
    pub dropped_missing_coords: usize,
    /// Extra rows removed by per-client deduplication.
    pub duplicate_clients: usize,
}

/// Keep only rows with both coordinates present.
pub fn drop_missing_coordinates(rows: &[ClientRecord]) -> (Vec<ClientRecord>, usize) {
    let kept: Vec<ClientRecord> = rows
        .iter()
        .filter(|r| r.has_coordinates())
        .cloned()
        .collect();
    let dropped = rows.len() - kept.len();
    (kept, dropped)
}

/// One row per client identifier. Deterministic tie-break: rows are sorted
/// by (client id, route, client name) and the first survives, so the kept
/// row never depends on input order.
pub fn dedup_by_client(mut rows: Vec<ClientRecord>) -> (Vec<ClientRecord>, usize) {
    rows.sort_by(|a, b| {
        a.client_id
            .cmp(&b.client_id)
            .then_with(|| a.route.cmp(&b.route))
            .then_with(|| a.client_name.cmp(&b.client_name))
    });
    let before = rows.len();
    rows.dedup_by(|a, b| a.client_id == b.client_id);
    let removed = before - rows.len();
    (rows, removed)
}

/// Full map-table pass: coordinate validity first, then dedup.
pub fn prepare_map_table(rows: &[ClientRecord]) -> MapTable {
    let (with_coords, dropped_missing_coords) = drop_missing_coordinates(rows);
    let (deduped, duplicate_clients) = dedup_by_client(with_coords);

    if dropped_missing_coords > 0 {
        log::debug!(
            "map table: excluded {} row(s) without parseable coordinates",
            dropped_missing_coords
        );
    }

    MapTable {
        rows: deduped,
        dropped_missing_coords,
        duplicate_clients,
    }
}
