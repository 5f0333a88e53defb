//! Canonical client/route records and categorical field access.
//!
//! Source extracts come in per-branch CSV files with two known column-naming
//! variants; the loader resolves both into this single fixed schema so the
//! pipeline never touches columns by name.

use serde::{Deserialize, Serialize};

/// Number of per-weekday visit-count slots (Monday through Sunday).
pub const WEEKDAY_COUNT: usize = 7;

/// Display labels for the weekday slots, Monday first.
pub const WEEKDAY_LABELS: [&str; WEEKDAY_COUNT] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Fill-in label for blank categorical values in aggregated views.
pub const MISSING_LABEL: &str = "Sin dato";

/// One row of the merged client/route table.
///
/// Categorical fields hold an empty string when the source cell was blank;
/// numeric fields hold `None` when the cell was blank or failed coercion.
/// The Sunday slot of `weekday_visits` stays `None` for sources that only
/// carry the six Monday–Saturday columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub client_name: String,
    pub operating_unit: String,
    pub commercial_figure: String,
    pub route: String,
    pub distribution_group: String,
    pub gec_group: String,
    pub sales_method: String,
    pub rhythm: String,
    pub frequency_code: String,
    pub weekday_visits: [Option<f64>; WEEKDAY_COUNT],
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ClientRecord {
    /// Weekly visit frequency, encoded as the character length of the
    /// frequency code. A 3-character code means 3 visits per week; this
    /// string-length convention comes from the source system and is
    /// preserved as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtm_core::core::domain::ClientRecord;
    ///
    /// let mut record = ClientRecord::default();
    /// record.frequency_code = "LMV".to_string();
    /// assert_eq!(record.visit_frequency(), 3);
    ///
    /// record.frequency_code = "  ".to_string();
    /// assert_eq!(record.visit_frequency(), 0);
    /// ```
    pub fn visit_frequency(&self) -> usize {
        self.frequency_code.trim().chars().count()
    }

    /// Returns `true` if both coordinates parsed.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Categorical fields the filter engine, colorizer and aggregator can
/// address. Keeping this closed enum (instead of stringly-typed column
/// names) is what guarantees the pipeline never asks for a column that
/// does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    OperatingUnit,
    CommercialFigure,
    Route,
    DistributionGroup,
    GecGroup,
    SalesMethod,
    Rhythm,
    /// Derived field: weekly visit count from the frequency-code length.
    FrequencyBucket,
}

impl Field {
    /// Stable machine name, used in snapshots and serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            Field::OperatingUnit => "operating_unit",
            Field::CommercialFigure => "commercial_figure",
            Field::Route => "route",
            Field::DistributionGroup => "distribution_group",
            Field::GecGroup => "gec_group",
            Field::SalesMethod => "sales_method",
            Field::Rhythm => "rhythm",
            Field::FrequencyBucket => "frequency_bucket",
        }
    }

    /// Stringified value of this field on `record`, or `None` when blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtm_core::core::domain::{ClientRecord, Field};
    ///
    /// let mut record = ClientRecord::default();
    /// record.route = "R102".to_string();
    /// assert_eq!(Field::Route.value_of(&record), Some("R102".to_string()));
    /// assert_eq!(Field::Rhythm.value_of(&record), None);
    /// ```
    pub fn value_of(&self, record: &ClientRecord) -> Option<String> {
        if let Field::FrequencyBucket = self {
            if record.frequency_code.trim().is_empty() {
                return None;
            }
            return Some(record.visit_frequency().to_string());
        }

        let raw = match self {
            Field::OperatingUnit => record.operating_unit.as_str(),
            Field::CommercialFigure => record.commercial_figure.as_str(),
            Field::Route => record.route.as_str(),
            Field::DistributionGroup => record.distribution_group.as_str(),
            Field::GecGroup => record.gec_group.as_str(),
            Field::SalesMethod => record.sales_method.as_str(),
            Field::Rhythm => record.rhythm.as_str(),
            Field::FrequencyBucket => unreachable!("handled above"),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Value with blanks normalized to [`MISSING_LABEL`], for aggregated
    /// views where every row must land in some group.
    pub fn display_value(&self, record: &ClientRecord) -> String {
        self.value_of(record)
            .unwrap_or_else(|| MISSING_LABEL.to_string())
    }

    /// Human label for a hierarchy node carrying `value` at this level.
    /// The rhythm and frequency levels get their level-name prefix so the
    /// chart reads "Ritmo 2" / "FS 3" rather than a bare number.
    pub fn node_label(&self, value: &str) -> String {
        match self {
            Field::Rhythm => format!("Ritmo {value}"),
            Field::FrequencyBucket => format!("FS {value}"),
            _ => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ClientRecord {
        ClientRecord {
            client_id: "123".to_string(),
            client_name: "ABARROTES LUPITA".to_string(),
            operating_unit: "UO-01".to_string(),
            commercial_figure: "EDI".to_string(),
            route: "R001".to_string(),
            distribution_group: "G1".to_string(),
            gec_group: "GEC-A".to_string(),
            sales_method: "1DA".to_string(),
            rhythm: "2".to_string(),
            frequency_code: "LMV".to_string(),
            weekday_visits: [Some(1.0), None, Some(2.0), None, None, None, None],
            latitude: Some(19.43),
            longitude: Some(-99.13),
        }
    }

    #[test]
    fn frequency_is_code_length() {
        let mut r = record();
        assert_eq!(r.visit_frequency(), 3);
        r.frequency_code = "LMRJVS".to_string();
        assert_eq!(r.visit_frequency(), 6);
        r.frequency_code = String::new();
        assert_eq!(r.visit_frequency(), 0);
    }

    #[test]
    fn field_values_trim_and_null_blanks() {
        let mut r = record();
        r.rhythm = "  4 ".to_string();
        assert_eq!(Field::Rhythm.value_of(&r), Some("4".to_string()));

        r.rhythm = "   ".to_string();
        assert_eq!(Field::Rhythm.value_of(&r), None);
        assert_eq!(Field::Rhythm.display_value(&r), MISSING_LABEL);
    }

    #[test]
    fn frequency_bucket_derives_from_code() {
        let r = record();
        assert_eq!(Field::FrequencyBucket.value_of(&r), Some("3".to_string()));

        let blank = ClientRecord::default();
        assert_eq!(Field::FrequencyBucket.value_of(&blank), None);
    }

    #[test]
    fn node_labels_carry_level_prefix() {
        assert_eq!(Field::Rhythm.node_label("2"), "Ritmo 2");
        assert_eq!(Field::FrequencyBucket.node_label("3"), "FS 3");
        assert_eq!(Field::SalesMethod.node_label("1DA"), "1DA");
    }
}
