pub mod aggregate_lookup;
pub mod record_lookup;

pub use aggregate_lookup::AggregateLookupCoordinator;
pub use record_lookup::RecordLookupService;
