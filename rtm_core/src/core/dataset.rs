//! The merged, immutable client table a session operates on.

use std::collections::BTreeSet;

use crate::core::domain::{ClientRecord, Field};

/// Full merged table produced by the loader. Sessions keep one of these
/// for their lifetime; the legend is always built from its unfiltered
/// domains so category colors survive filter narrowing.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<ClientRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ClientRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct non-blank values of `field` over the whole dataset.
    pub fn field_domain(&self, field: Field) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| field.value_of(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_distinct_sorted_and_skips_blanks() {
        let mut a = ClientRecord::default();
        a.route = "R2".to_string();
        let mut b = ClientRecord::default();
        b.route = "R1".to_string();
        let mut c = ClientRecord::default();
        c.route = "R2".to_string();
        let d = ClientRecord::default(); // blank route

        let dataset = Dataset::new(vec![a, b, c, d]);
        let domain: Vec<String> = dataset.field_domain(Field::Route).into_iter().collect();
        assert_eq!(domain, vec!["R1".to_string(), "R2".to_string()]);
    }
}
