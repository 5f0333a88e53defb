//! Weekday visit totals and the radar-chart profile.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::domain::{ClientRecord, WEEKDAY_COUNT, WEEKDAY_LABELS};

/// Per-weekday sums over a set of rows. A slot stays `None` when no row
/// carried a parsed value for that weekday (e.g. sources without the
/// Sunday column), so averages can be taken over present weekdays only.
pub fn weekday_totals<'a, I>(rows: I) -> [Option<f64>; WEEKDAY_COUNT]
where
    I: IntoIterator<Item = &'a ClientRecord>,
{
    let mut totals = [None; WEEKDAY_COUNT];
    for row in rows {
        for (slot, value) in totals.iter_mut().zip(row.weekday_visits.iter()) {
            if let Some(v) = value {
                *slot = Some(slot.unwrap_or(0.0) + v);
            }
        }
    }
    totals
}

/// Average visits per weekday on one point of the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    pub weekday: &'static str,
    pub visits: f64,
}

/// Average visits per weekday across the filtered table: the per-weekday
/// total divided by the number of distinct routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayProfile {
    /// One entry per weekday present in the data, Monday first.
    pub averages: Vec<WeekdayAverage>,
    pub route_count: usize,
}

pub fn weekday_profile(rows: &[ClientRecord]) -> WeekdayProfile {
    let routes: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.route.trim())
        .filter(|r| !r.is_empty())
        .collect();
    let route_count = routes.len();

    let totals = weekday_totals(rows);
    let averages = totals
        .iter()
        .enumerate()
        .filter_map(|(i, total)| {
            total.map(|sum| WeekdayAverage {
                weekday: WEEKDAY_LABELS[i],
                visits: if route_count == 0 {
                    0.0
                } else {
                    sum / route_count as f64
                },
            })
        })
        .collect();

    WeekdayProfile {
        averages,
        route_count,
    }
}
