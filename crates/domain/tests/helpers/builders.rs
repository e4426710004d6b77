#![allow(dead_code)]
use stubzone_domain::ServiceRecord;

pub const LOCAL_DOMAIN: &str = "local.dns.skydns.local.";
pub const STUB_ROOT: &str = "/skydns/local/skydns/dns/stub";

/// Builds stub nameserver records the way they are registered in the
/// backend: `<root>/<reversed zone labels>/<nameserver>`.
pub struct ServiceRecordBuilder {
    zone: String,
    nameserver: String,
    host: String,
    port: u16,
}

impl ServiceRecordBuilder {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            nameserver: "ns1".to_string(),
            host: "192.0.2.1".to_string(),
            port: 0,
        }
    }

    pub fn nameserver(mut self, nameserver: &str) -> Self {
        self.nameserver = nameserver.to_string();
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn build(self) -> ServiceRecord {
        let mut path = STUB_ROOT.to_string();
        for label in self.zone.trim_end_matches('.').split('.').rev() {
            if !label.is_empty() {
                path.push('/');
                path.push_str(label);
            }
        }
        path.push('/');
        path.push_str(&self.nameserver);
        ServiceRecord::new(path, self.host, self.port)
    }
}
