pub mod error;
pub mod records;

pub use error::ErrorResponse;
pub use records::RecordResponse;
