use async_trait::async_trait;
use stubzone_domain::{DomainError, ServiceRecord};

/// Read access to the discovery record store.
#[async_trait]
pub trait ServiceRecordBackend: Send + Sync {
    /// Returns the records stored under the path derived from `name`.
    ///
    /// With `exact = false` every record beneath that path is returned; with
    /// `exact = true` only a record stored at the path itself.
    async fn records(&self, name: &str, exact: bool) -> Result<Vec<ServiceRecord>, DomainError>;
}
