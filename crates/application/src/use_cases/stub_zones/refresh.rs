use crate::ports::{ServiceRecordBackend, StubZoneStore};
use std::sync::Arc;
use stubzone_domain::{domain_name::fqdn, DomainError, SkipReason, StubZoneTable};
use tracing::{debug, error, info, warn};

/// Summary of one successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StubZoneRefresh {
    pub zones: usize,
    pub upstreams: usize,
    pub skipped: usize,
}

/// Rebuilds the stub-zone table from the backend and publishes it.
pub struct RefreshStubZonesUseCase {
    backend: Arc<dyn ServiceRecordBackend>,
    store: Arc<dyn StubZoneStore>,
    stub_prefix: String,
    local_domain: String,
}

impl RefreshStubZonesUseCase {
    pub fn new(
        backend: Arc<dyn ServiceRecordBackend>,
        store: Arc<dyn StubZoneStore>,
        stub_prefix: &str,
        local_domain: &str,
    ) -> Self {
        Self {
            backend,
            store,
            stub_prefix: fqdn(stub_prefix),
            local_domain: fqdn(local_domain),
        }
    }

    /// Runs one refresh cycle. A backend failure leaves the published table
    /// untouched.
    pub async fn execute(&self) -> Result<StubZoneRefresh, DomainError> {
        let records = match self.backend.records(&self.stub_prefix, false).await {
            Ok(records) => records,
            Err(e) => {
                error!(prefix = %self.stub_prefix, error = %e, "Stub zone update failed");
                return Err(e);
            }
        };

        debug!(prefix = %self.stub_prefix, records = records.len(), "Stub records fetched");

        let build = StubZoneTable::build(records, &self.local_domain);

        for skipped in &build.skipped {
            match skipped.reason {
                SkipReason::NonAddressHost => warn!(
                    key = %skipped.record.key,
                    host = %skipped.record.host,
                    "Stub zone non-address host seen"
                ),
                SkipReason::SelfDelegation => warn!(
                    key = %skipped.record.key,
                    local_domain = %self.local_domain,
                    "Not adding stub zone for own domain"
                ),
                SkipReason::MalformedKey => warn!(
                    key = %skipped.record.key,
                    "Stub zone key does not name a domain"
                ),
            }
        }

        let summary = StubZoneRefresh {
            zones: build.table.len(),
            upstreams: build.table.upstream_count(),
            skipped: build.skipped.len(),
        };

        self.store.publish(build.table);

        info!(
            zones = summary.zones,
            upstreams = summary.upstreams,
            skipped = summary.skipped,
            "Stub zones refreshed"
        );

        Ok(summary)
    }

    pub fn snapshot(&self) -> Arc<StubZoneTable> {
        self.store.snapshot()
    }
}
