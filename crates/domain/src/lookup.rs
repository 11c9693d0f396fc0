use crate::dns_record::{RecordSet, RecordType};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Result of a single record-type lookup as seen by callers.
///
/// Every resolution failure collapses into `NotFound`; the cause is only
/// logged where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(RecordSet),
    NotFound,
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    pub fn records(&self) -> Option<&RecordSet> {
        match self {
            LookupOutcome::Found(set) => Some(set),
            LookupOutcome::NotFound => None,
        }
    }

    pub fn into_records(self) -> Option<RecordSet> {
        match self {
            LookupOutcome::Found(set) => Some(set),
            LookupOutcome::NotFound => None,
        }
    }
}

/// Per-type outcomes of the all-records lookup.
///
/// Serializes to an object with exactly one key per entry of
/// [`RecordType::ALL`]; types without a found outcome serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    outcomes: BTreeMap<RecordType, LookupOutcome>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed write; the order in which types report does not matter.
    pub fn insert(&mut self, record_type: RecordType, outcome: LookupOutcome) {
        self.outcomes.insert(record_type, outcome);
    }

    pub fn get(&self, record_type: RecordType) -> Option<&LookupOutcome> {
        self.outcomes.get(&record_type)
    }

    pub fn reported(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_complete(&self) -> bool {
        RecordType::ALL
            .iter()
            .all(|rt| self.outcomes.contains_key(rt))
    }

    pub fn found_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_found()).count()
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RecordType::ALL.len()))?;
        for rt in RecordType::ALL {
            let value = self.outcomes.get(&rt).and_then(LookupOutcome::records);
            map.serialize_entry(rt.result_key(), &value)?;
        }
        map.end()
    }
}
