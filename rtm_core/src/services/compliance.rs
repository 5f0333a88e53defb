//! Route compliance evaluation.
//!
//! Sums visit counts per (route, commercial figure), computes the rounded
//! daily average, and classifies each route against the band for its
//! commercial-figure type. Classification is total: the default band
//! guarantees every group resolves to some band, and every group is
//! either in-band or out-of-band.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{Band, BandConfig};
use crate::core::domain::{ClientRecord, WEEKDAY_COUNT};
use crate::services::colors::Rgba;
use crate::services::visits::weekday_totals;

/// Where a route's average landed relative to its band. Membership in the
/// out-of-band set does not encode direction, so the status carries it
/// explicitly for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandStatus {
    Within,
    Under,
    Over,
}

impl BandStatus {
    pub fn in_band(&self) -> bool {
        matches!(self, BandStatus::Within)
    }
}

/// One row of the compliance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCompliance {
    pub route: String,
    pub commercial_figure: String,
    pub weekday_totals: [Option<f64>; WEEKDAY_COUNT],
    /// Mean of the per-weekday sums over present weekdays, rounded to the
    /// nearest integer.
    pub daily_average: i64,
    pub band: Band,
    pub status: BandStatus,
}

/// Compliance table partitioned by band membership; both halves are
/// independently retrievable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub in_band: Vec<RouteCompliance>,
    pub out_of_band: Vec<RouteCompliance>,
}

impl ComplianceReport {
    pub fn total_routes(&self) -> usize {
        self.in_band.len() + self.out_of_band.len()
    }
}

/// Cell style directive for the table renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellStyle {
    pub background: Rgba,
    pub text: Rgba,
}

/// Conditional table colors: yellow for under-band, red for over-band,
/// green for in-band.
pub fn cell_style(status: BandStatus) -> CellStyle {
    const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    match status {
        BandStatus::Under => CellStyle {
            background: Rgba::new(255, 222, 69, 204),
            text: BLACK,
        },
        BandStatus::Over => CellStyle {
            background: Rgba::new(255, 69, 69, 204),
            text: WHITE,
        },
        BandStatus::Within => CellStyle {
            background: Rgba::new(69, 255, 85, 179),
            text: BLACK,
        },
    }
}

/// Evaluate every (route, commercial figure) group in `rows`. Rows with a
/// blank route are skipped, since they belong to no route group.
pub fn evaluate(rows: &[ClientRecord], bands: &BandConfig) -> ComplianceReport {
    let mut groups: BTreeMap<(String, String), Vec<&ClientRecord>> = BTreeMap::new();
    for row in rows {
        let route = row.route.trim();
        if route.is_empty() {
            continue;
        }
        groups
            .entry((route.to_string(), row.commercial_figure.trim().to_string()))
            .or_default()
            .push(row);
    }

    let mut report = ComplianceReport::default();
    for ((route, commercial_figure), members) in groups {
        let totals = weekday_totals(members.iter().copied());
        let present: Vec<f64> = totals.iter().flatten().copied().collect();
        let mean = if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f64>() / present.len() as f64
        };
        let daily_average = mean.round() as i64;

        let band = bands.band_for(&commercial_figure);
        let status = if daily_average < band.min {
            BandStatus::Under
        } else if daily_average > band.max {
            BandStatus::Over
        } else {
            BandStatus::Within
        };

        let record = RouteCompliance {
            route,
            commercial_figure,
            weekday_totals: totals,
            daily_average,
            band,
            status,
        };
        if status.in_band() {
            report.in_band.push(record);
        } else {
            report.out_of_band.push(record);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BAND;

    fn record(route: &str, figure: &str, visits: [Option<f64>; WEEKDAY_COUNT]) -> ClientRecord {
        ClientRecord {
            client_id: format!("{route}-{figure}"),
            route: route.to_string(),
            commercial_figure: figure.to_string(),
            weekday_visits: visits,
            ..ClientRecord::default()
        }
    }

    fn six_days(value: f64) -> [Option<f64>; WEEKDAY_COUNT] {
        [
            Some(value),
            Some(value),
            Some(value),
            Some(value),
            Some(value),
            Some(value),
            None,
        ]
    }

    #[test]
    fn six_day_route_averages_over_present_days() {
        // Three rows on route R1 summing to 10 per weekday, no Sunday
        // column: the average must be exactly 10, not 10 * 6 / 7.
        let rows = vec![
            record("R1", "EDI", six_days(5.0)),
            record("R1", "EDI", six_days(3.0)),
            record("R1", "EDI", six_days(2.0)),
        ];
        let bands = BandConfig::from_toml_str("[per_type.EDI]\nmin = 0\nmax = 99\n").unwrap();
        let report = evaluate(&rows, &bands);

        assert_eq!(report.total_routes(), 1);
        assert_eq!(report.in_band.len(), 1);
        let route = &report.in_band[0];
        assert_eq!(route.daily_average, 10);
        assert_eq!(route.band, Band { min: 0, max: 99 });
        assert_eq!(route.status, BandStatus::Within);
    }

    #[test]
    fn unknown_figure_falls_back_to_default_band() {
        let rows = vec![record("R2", "DESCONOCIDO", six_days(9.0))];
        let report = evaluate(&rows, &BandConfig::default());

        assert_eq!(report.out_of_band.len(), 1);
        let route = &report.out_of_band[0];
        assert_eq!(route.band, DEFAULT_BAND);
        assert_eq!(route.daily_average, 9);
        assert_eq!(route.status, BandStatus::Under);
    }

    #[test]
    fn over_and_under_are_distinguishable() {
        let rows = vec![
            record("LOW", "EDI", six_days(1.0)),
            record("HIGH", "EDI", six_days(100.0)),
            record("OK", "EDI", six_days(50.0)),
        ];
        let report = evaluate(&rows, &BandConfig::default());

        assert_eq!(report.in_band.len(), 1);
        assert_eq!(report.out_of_band.len(), 2);
        let high = report.out_of_band.iter().find(|r| r.route == "HIGH").unwrap();
        let low = report.out_of_band.iter().find(|r| r.route == "LOW").unwrap();
        assert_eq!(high.status, BandStatus::Over);
        assert_eq!(low.status, BandStatus::Under);
    }

    #[test]
    fn same_route_different_figures_stay_separate_groups() {
        let rows = vec![
            record("R1", "EDI", six_days(50.0)),
            record("R1", "MAYOREO", six_days(50.0)),
        ];
        let report = evaluate(&rows, &BandConfig::default());
        assert_eq!(report.total_routes(), 2);
    }

    #[test]
    fn blank_routes_are_skipped() {
        let rows = vec![record("", "EDI", six_days(50.0))];
        let report = evaluate(&rows, &BandConfig::default());
        assert_eq!(report.total_routes(), 0);
    }

    #[test]
    fn styles_follow_band_direction() {
        assert_eq!(cell_style(BandStatus::Within).background, Rgba::new(69, 255, 85, 179));
        assert_eq!(cell_style(BandStatus::Under).background, Rgba::new(255, 222, 69, 204));
        assert_eq!(cell_style(BandStatus::Over).text, Rgba::new(255, 255, 255, 255));
    }
}
