use crate::discovery_path::domain_from_path;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// A discovery record as stored in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Hierarchical backend key, e.g. `/skydns/local/skydns/dns/stub/com/example/ns1`.
    pub key: String,

    /// Expected to be a literal IP address for stub delegation.
    pub host: String,

    /// `0` means the default DNS port.
    #[serde(default)]
    pub port: u16,
}

impl ServiceRecord {
    pub fn new(key: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            key: key.into(),
            host: host.into(),
            port,
        }
    }

    /// Applies implicit defaults. Runs before any validation.
    pub fn normalized(mut self) -> Self {
        if self.port == 0 {
            self.port = DEFAULT_DNS_PORT;
        }
        self
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }

    pub fn domain(&self) -> String {
        domain_from_path(&self.key)
    }
}
