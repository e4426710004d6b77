pub mod service_record_repository;

pub use service_record_repository::SqliteServiceRecordBackend;
