//! The stub-zone forwarding table.
//!
//! A table maps forward-domains to the ordered list of upstream nameservers
//! that serve them. It is built in one pass from backend records and never
//! mutated afterwards; refresh produces a new table.

use crate::domain_name::{count_labels, fqdn, is_valid_name, join_labels, split_labels};
use crate::ServiceRecord;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Host is not a literal IP address.
    NonAddressHost,
    /// Forward-domain equals the local domain; forwarding would loop.
    SelfDelegation,
    /// Key does not encode a usable forward-domain.
    MalformedKey,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonAddressHost => "non-address host",
            Self::SelfDelegation => "self delegation",
            Self::MalformedKey => "malformed key",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub record: ServiceRecord,
    pub reason: SkipReason,
}

/// Outcome of one build: the table plus every record that was left out.
#[derive(Debug, Clone, Default)]
pub struct StubZoneBuild {
    pub table: StubZoneTable,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubZoneTable {
    zones: BTreeMap<String, Vec<SocketAddr>>,
}

impl StubZoneTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from backend records.
    ///
    /// Each record is normalised (port 0 becomes 53), then rejected if its
    /// host is not an IP literal or if its key yields the local domain
    /// itself. The forward-domain is the record's domain with the leftmost
    /// label (the nameserver placeholder) and the `local_domain`-sized tail
    /// (the discovery root) removed. Addresses keep arrival order.
    pub fn build<I>(records: I, local_domain: &str) -> StubZoneBuild
    where
        I: IntoIterator<Item = ServiceRecord>,
    {
        let local_domain = fqdn(local_domain);
        let root_labels = count_labels(&local_domain);

        let mut zones: BTreeMap<String, Vec<SocketAddr>> = BTreeMap::new();
        let mut skipped = Vec::new();

        for record in records {
            let record = record.normalized();

            let ip = match record.ip() {
                Some(ip) => ip,
                None => {
                    skipped.push(SkippedRecord {
                        record,
                        reason: SkipReason::NonAddressHost,
                    });
                    continue;
                }
            };

            let domain = match forward_domain(&record.domain(), root_labels) {
                Some(domain) => domain,
                None => {
                    skipped.push(SkippedRecord {
                        record,
                        reason: SkipReason::MalformedKey,
                    });
                    continue;
                }
            };

            if domain == local_domain {
                skipped.push(SkippedRecord {
                    record,
                    reason: SkipReason::SelfDelegation,
                });
                continue;
            }

            zones
                .entry(domain)
                .or_default()
                .push(SocketAddr::new(ip, record.port));
        }

        StubZoneBuild {
            table: Self { zones },
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn upstream_count(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SocketAddr])> {
        self.zones.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn upstreams(&self, domain: &str) -> Option<&[SocketAddr]> {
        self.zones.get(&fqdn(domain)).map(Vec::as_slice)
    }

    /// Finds the most specific stub zone containing `qname`.
    pub fn find(&self, qname: &str) -> Option<(&str, &[SocketAddr])> {
        if self.zones.is_empty() {
            return None;
        }
        let qname = fqdn(qname);
        let labels = split_labels(&qname);

        (0..=labels.len()).find_map(|start| {
            let candidate = join_labels(&labels[start..]);
            self.zones
                .get_key_value(&candidate)
                .map(|(k, v)| (k.as_str(), v.as_slice()))
        })
    }
}

fn forward_domain(record_domain: &str, root_labels: usize) -> Option<String> {
    let labels = split_labels(record_domain);
    if labels.len() < 1 + root_labels {
        return None;
    }
    let domain = join_labels(&labels[1..labels.len() - root_labels]);
    is_valid_name(&domain).then_some(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = "local.dns.skydns.local.";

    fn stub(path: &str, host: &str, port: u16) -> ServiceRecord {
        ServiceRecord::new(format!("/skydns/local/skydns/dns/stub/{}", path), host, port)
    }

    #[test]
    fn test_forward_domain_strips_placeholder_and_root() {
        assert_eq!(
            forward_domain("ns1.example.com.stub.dns.skydns.local.", 4),
            Some("example.com.".to_string())
        );
    }

    #[test]
    fn test_forward_domain_too_short() {
        assert_eq!(forward_domain("dns.skydns.local.", 4), None);
    }

    #[test]
    fn test_forward_domain_exact_length_is_root() {
        assert_eq!(
            forward_domain("ns1.stub.dns.skydns.local.", 4),
            Some(".".to_string())
        );
    }

    #[test]
    fn test_build_groups_by_domain_in_arrival_order() {
        let build = StubZoneTable::build(
            vec![
                stub("com/example/ns1", "10.0.0.1", 0),
                stub("org/other/ns1", "10.0.0.9", 5300),
                stub("com/example/ns2", "10.0.0.2", 53),
            ],
            LOCAL,
        );

        assert!(build.skipped.is_empty());
        assert_eq!(build.table.len(), 2);
        assert_eq!(
            build.table.upstreams("example.com."),
            Some(
                &[
                    "10.0.0.1:53".parse().unwrap(),
                    "10.0.0.2:53".parse().unwrap()
                ][..]
            )
        );
        assert_eq!(
            build.table.upstreams("other.org"),
            Some(&["10.0.0.9:5300".parse().unwrap()][..])
        );
    }

    #[test]
    fn test_find_prefers_longest_zone() {
        let build = StubZoneTable::build(
            vec![
                stub("com/example/ns1", "10.0.0.1", 0),
                stub("com/example/sub/ns1", "10.0.0.2", 0),
            ],
            LOCAL,
        );

        let (zone, _) = build.table.find("www.sub.example.com.").unwrap();
        assert_eq!(zone, "sub.example.com.");
        let (zone, _) = build.table.find("WWW.Example.com").unwrap();
        assert_eq!(zone, "example.com.");
        assert!(build.table.find("badexample.com.").is_none());
    }
}
