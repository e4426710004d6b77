pub mod database;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod stub;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use stub::StubConfig;
