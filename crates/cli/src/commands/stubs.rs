//! One-shot commands that edit or inspect the stub records in the backend.

use crate::di::Services;
use anyhow::{bail, Context};
use std::net::IpAddr;
use stubzone_domain::discovery_path::path_from_domain;
use stubzone_domain::domain_name::{fqdn, is_valid_name};
use stubzone_domain::{Config, ServiceRecord};

/// Backend key for nameserver `name` of stub zone `domain`.
pub fn stub_key(config: &Config, domain: &str, name: Option<&str>) -> anyhow::Result<String> {
    let domain = fqdn(domain);
    if domain == "." || !is_valid_name(&domain) {
        bail!("invalid stub domain '{}'", domain);
    }
    if domain == config.stub.local_domain() {
        bail!("'{}' is the server's own domain and cannot be a stub zone", domain);
    }

    let zone = format!("{}{}", domain, config.stub.stub_prefix());
    let full = match name {
        Some(name) => {
            if name.is_empty() || name.contains('.') {
                bail!("nameserver name must be a single label, got '{}'", name);
            }
            format!("{}.{}", name, zone)
        }
        None => zone,
    };
    Ok(path_from_domain(&full))
}

pub async fn add_stub(
    config: &Config,
    services: &Services,
    domain: &str,
    host: &str,
    port: u16,
    name: &str,
) -> anyhow::Result<()> {
    host.parse::<IpAddr>()
        .with_context(|| format!("stub nameserver host must be an IP address, got '{}'", host))?;

    let record = ServiceRecord::new(stub_key(config, domain, Some(name))?, host, port);
    services.backend.upsert(&record).await?;

    let effective = record.normalized();
    println!("added {} -> {}:{}", effective.key, effective.host, effective.port);
    Ok(())
}

pub async fn remove_stub(
    config: &Config,
    services: &Services,
    domain: &str,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let key = stub_key(config, domain, name)?;
    let removed = services.backend.remove(&key).await?;
    println!("removed {} record(s) under {}", removed, key);
    Ok(())
}

/// Runs one refresh and prints the resulting table.
pub async fn list_stubs(services: &Services) -> anyhow::Result<()> {
    use stubzone_application::ports::StubZoneStore;

    let summary = services.refresh.execute().await?;
    let table = services.store.snapshot();

    for (domain, upstreams) in table.iter() {
        let addrs: Vec<String> = upstreams.iter().map(ToString::to_string).collect();
        println!("{}\t{}", domain, addrs.join(" "));
    }
    println!(
        "{} zone(s), {} upstream(s), {} record(s) skipped",
        summary.zones, summary.upstreams, summary.skipped
    );
    Ok(())
}
