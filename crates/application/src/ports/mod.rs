mod service_record_backend;
mod stub_zone_store;

pub use service_record_backend::ServiceRecordBackend;
pub use stub_zone_store::StubZoneStore;
