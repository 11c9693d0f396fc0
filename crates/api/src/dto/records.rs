use dnsgate_domain::RecordSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Single-type lookup body: `{"<key>": <records>}` where the key is the
/// record type's result key (`ipv4`, `mx`, ...).
#[derive(Debug, Clone)]
pub struct RecordResponse {
    pub records: RecordSet,
}

impl From<RecordSet> for RecordResponse {
    fn from(records: RecordSet) -> Self {
        Self { records }
    }
}

impl Serialize for RecordResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.records.record_type().result_key(), &self.records)?;
        map.end()
    }
}
