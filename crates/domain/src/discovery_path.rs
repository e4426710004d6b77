//! Mapping between backend keys and domain names.
//!
//! The backend stores records under slash-separated paths whose segments are
//! the domain labels in reverse order, rooted at a fixed namespace:
//! `/skydns/local/skydns/dns/stub/com/example/ns1` is the record for
//! `ns1.example.com.stub.dns.skydns.local.`.

use crate::domain_name::{fqdn, split_labels};

pub const PATH_NAMESPACE: &str = "skydns";

/// Converts a backend key into the domain it names. Keys that are not
/// paths (no leading `/`) are taken to be domain names already.
pub fn domain_from_path(key: &str) -> String {
    if !key.starts_with('/') {
        return fqdn(key);
    }

    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    // First segment is the namespace, not a label.
    let labels: Vec<&str> = segments.iter().skip(1).rev().copied().collect();
    fqdn(&labels.join("."))
}

/// Converts a domain name into the backend path prefix that holds its
/// records.
pub fn path_from_domain(name: &str) -> String {
    let normalized = fqdn(name);
    let mut labels = split_labels(&normalized);
    labels.reverse();

    let mut path = format!("/{}", PATH_NAMESPACE);
    for label in labels {
        path.push('/');
        path.push_str(label);
    }
    path
}
