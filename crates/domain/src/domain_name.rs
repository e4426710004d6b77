//! Label arithmetic on presentation-format domain names.
//!
//! Names are handled as plain strings: labels are separated by `.`, an
//! optional trailing dot marks the root. Comparison is case-insensitive, so
//! every normalising helper lower-cases its output.

use hickory_proto::rr::Name;

/// Splits a name into its labels. The root (`"."` or `""`) has none.
pub fn split_labels(name: &str) -> Vec<&str> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('.').collect()
}

pub fn count_labels(name: &str) -> usize {
    split_labels(name).len()
}

/// Lower-cases the name and guarantees exactly one trailing dot.
pub fn fqdn(name: &str) -> String {
    let trimmed = name.trim_end_matches('.');
    if trimmed.is_empty() {
        return ".".to_string();
    }
    let mut out = trimmed.to_ascii_lowercase();
    out.push('.');
    out
}

/// Joins labels into a normalised FQDN; no labels yields the root.
pub fn join_labels(labels: &[&str]) -> String {
    fqdn(&labels.join("."))
}

pub fn is_valid_name(name: &str) -> bool {
    let normalized = fqdn(name);
    if normalized.len() > 254 {
        return false;
    }
    let labels_ok = split_labels(name).iter().all(|label| {
        !label.is_empty() && label.len() <= 63 && label.bytes().all(|b| b.is_ascii_graphic())
    });
    labels_ok && Name::from_ascii(&normalized).is_ok()
}
