mod signals;

use crate::di::Services;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use stubzone_domain::Config;
use stubzone_infrastructure::dns::DnsListener;
use stubzone_jobs::StubZoneRefreshJob;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the listener and the refresh job until SIGINT or SIGTERM.
pub async fn serve(config: &Config, services: &Services) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let job = Arc::new(
        StubZoneRefreshJob::new(services.refresh.clone())
            .with_interval(config.stub.refresh_interval_secs)
            .with_cancellation(shutdown.clone()),
    );
    signals::install(job.trigger(), shutdown.clone());
    let job_handle = job.start();

    let bind_ip: IpAddr = config.server.bind_address.parse()?;
    let addr = SocketAddr::new(bind_ip, config.server.dns_port);
    let listener = DnsListener::bind(addr, services.router.clone()).await?;

    info!(
        bind_address = %addr,
        domain = %config.stub.domain,
        stub_prefix = %config.stub.stub_prefix(),
        "Stub zone server ready"
    );

    listener.run(shutdown.clone()).await;
    shutdown.cancel();
    let _ = job_handle.await;

    info!(
        stub_forwards = services.router.forwarder().metrics().stub_forward_count(),
        "Server shutdown complete"
    );
    Ok(())
}
