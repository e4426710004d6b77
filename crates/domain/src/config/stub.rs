use crate::domain_name::fqdn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StubConfig {
    /// Zone this server is authoritative for, e.g. `skydns.local.`.
    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-upstream exchange timeout.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
}

impl StubConfig {
    /// The server's own local domain; never stub-delegated.
    pub fn local_domain(&self) -> String {
        fqdn(&format!("local.dns.{}", self.domain.trim_end_matches('.')))
    }

    /// Backend prefix under which stub nameservers are registered.
    pub fn stub_prefix(&self) -> String {
        fqdn(&format!("stub.dns.{}", self.domain.trim_end_matches('.')))
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            refresh_interval_secs: default_refresh_interval_secs(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

fn default_domain() -> String {
    "skydns.local.".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_upstream_timeout_ms() -> u64 {
    2000
}
