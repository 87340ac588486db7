use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Direction;

/// One entry of the bundled adjustment dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub address: String,
    #[serde(rename = "blocksMintedAdjustment")]
    pub delta: i32,
}

impl AdjustmentRecord {
    pub fn new(address: impl Into<String>, delta: i32) -> Self {
        Self {
            address: address.into(),
            delta,
        }
    }
}

impl fmt::Display for AdjustmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has blocks minted adjustment {}", self.address, self.delta)
    }
}

/// Direction-transformed deltas keyed by address.
///
/// An address appears at most once; inserting it again replaces the delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentSet {
    entries: BTreeMap<String, i32>,
}

impl AdjustmentSet {
    /// Transform every record for `direction` and collapse by address
    /// (last record wins).
    pub fn from_records(direction: Direction, records: &[AdjustmentRecord]) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            entries.insert(record.address.clone(), direction.transform(record.delta));
        }
        Self { entries }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, address: &str) -> Option<i32> {
        self.entries.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(a, d)| (a.as_str(), *d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_reads_wire_field_name() {
        let r: AdjustmentRecord =
            serde_json::from_str(r#"{"address":"QaddrA","blocksMintedAdjustment":-12}"#).unwrap();
        assert_eq!(r, AdjustmentRecord::new("QaddrA", -12));
        assert_eq!(r.to_string(), "QaddrA has blocks minted adjustment -12");
    }

    #[test]
    fn forward_negates_and_reverse_keeps() {
        let records = vec![AdjustmentRecord::new("QaddrA", 40), AdjustmentRecord::new("QaddrB", -3)];

        let fwd = AdjustmentSet::from_records(Direction::Forward, &records);
        assert_eq!(fwd.get("QaddrA"), Some(-40));
        assert_eq!(fwd.get("QaddrB"), Some(3));

        let rev = AdjustmentSet::from_records(Direction::Reverse, &records);
        assert_eq!(rev.get("QaddrA"), Some(40));
        assert_eq!(rev.get("QaddrB"), Some(-3));
    }

    #[test]
    fn duplicate_address_keeps_last_delta() {
        let records = vec![
            AdjustmentRecord::new("QaddrB", 1),
            AdjustmentRecord::new("QaddrA", 2),
            AdjustmentRecord::new("QaddrB", 9),
        ];
        let set = AdjustmentSet::from_records(Direction::Reverse, &records);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("QaddrB"), Some(9));
        assert_eq!(set.addresses().collect::<Vec<_>>(), vec!["QaddrA", "QaddrB"]);
    }
}
