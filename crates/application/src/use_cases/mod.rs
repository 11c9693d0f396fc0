mod lookup_all;
mod lookup_record;

pub use lookup_all::LookupAllRecordsUseCase;
pub use lookup_record::LookupRecordUseCase;
