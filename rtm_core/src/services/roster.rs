//! Client listing projection.
//!
//! One entry per filtered row, in table order. Unlike the map view this
//! applies no coordinate filtering and no per-client deduplication, so a
//! client served by two routes appears twice and rows without parseable
//! coordinates still show up with their coordinates blank.

use serde::Serialize;

use crate::core::domain::ClientRecord;

/// One row of the client listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub client_id: String,
    pub client_name: String,
    pub route: String,
    pub commercial_figure: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Project the filtered rows into the listing.
pub fn client_roster(rows: &[ClientRecord]) -> Vec<ClientRow> {
    rows.iter()
        .map(|r| ClientRow {
            client_id: r.client_id.clone(),
            client_name: r.client_name.clone(),
            route: r.route.clone(),
            commercial_figure: r.commercial_figure.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client_id: &str, route: &str, lat: Option<f64>) -> ClientRecord {
        ClientRecord {
            client_id: client_id.to_string(),
            client_name: format!("CLIENTE {client_id}"),
            route: route.to_string(),
            commercial_figure: "EDI".to_string(),
            latitude: lat,
            longitude: lat.map(|_| -99.0),
            ..ClientRecord::default()
        }
    }

    #[test]
    fn every_filtered_row_is_listed_including_duplicates() {
        let rows = vec![
            record("100", "R1", Some(19.4)),
            record("100", "R2", Some(19.5)),
            record("101", "R1", None),
        ];
        let roster = client_roster(&rows);

        assert_eq!(roster.len(), 3);
        let ids: Vec<&str> = roster.iter().map(|r| r.client_id.as_str()).collect();
        assert_eq!(ids, vec!["100", "100", "101"]);
        // Coordinate-less rows stay in the listing.
        assert_eq!(roster[2].latitude, None);
    }

    #[test]
    fn listing_preserves_row_order() {
        let rows = vec![record("200", "R9", Some(20.0)), record("100", "R1", Some(19.0))];
        let roster = client_roster(&rows);
        assert_eq!(roster[0].client_id, "200");
        assert_eq!(roster[1].client_id, "100");
    }
}
