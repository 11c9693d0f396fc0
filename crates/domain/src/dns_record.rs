mod record_set;
mod record_type;

pub use record_set::{MxRecord, RecordSet};
pub use record_type::RecordType;
