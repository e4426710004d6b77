//! Stubzone Domain Layer
pub mod config;
pub mod discovery_path;
pub mod domain_name;
pub mod errors;
pub mod service_record;
pub mod stub_zone;
pub mod transport;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use service_record::ServiceRecord;
pub use stub_zone::{SkipReason, SkippedRecord, StubZoneBuild, StubZoneTable};
pub use transport::ClientTransport;
