use super::exchange::UpstreamExchanger;
use super::metrics::StubForwardMetrics;
use super::response::reply_with_code;
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use stubzone_domain::{ClientTransport, DomainError};
use tracing::{debug, warn};

/// Where the single reply for a forwarded query goes.
#[async_trait]
pub trait ResponseSink: Send {
    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError>;
}

/// Forwards queries for stub zones to their upstream nameservers.
///
/// Stateless across queries: the starting upstream is derived from the
/// query's transaction ID, then candidates are tried round-robin, each at
/// most once. Only a transport failure moves on to the next candidate.
pub struct StubForwarder {
    exchanger: Arc<dyn UpstreamExchanger>,
    metrics: StubForwardMetrics,
}

impl StubForwarder {
    pub fn new(exchanger: Arc<dyn UpstreamExchanger>) -> Self {
        Self {
            exchanger,
            metrics: StubForwardMetrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: StubForwardMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &StubForwardMetrics {
        &self.metrics
    }

    /// Forwards `query` and writes exactly one reply to `sink`.
    pub async fn forward<S>(
        &self,
        query: &Message,
        transport: ClientTransport,
        upstreams: &[SocketAddr],
        sink: &mut S,
    ) where
        S: ResponseSink + ?Sized,
    {
        self.metrics.record_forward();

        let response = self.resolve(query, transport, upstreams).await;

        if let Err(e) = sink.write_msg(&response).await {
            warn!(id = query.id(), error = %e, "Failed to write stub forward reply");
        }
    }

    /// Runs the failover loop and returns the reply to relay: the first
    /// upstream answer (any rcode) with the client's ID restored, or a
    /// SERVFAIL once every candidate failed at the transport level.
    pub async fn resolve(
        &self,
        query: &Message,
        transport: ClientTransport,
        upstreams: &[SocketAddr],
    ) -> Message {
        if upstreams.is_empty() {
            warn!(id = query.id(), error = %DomainError::TransportNoHealthyServers, "Failure to forward stub request");
            return reply_with_code(query, ResponseCode::ServFail);
        }

        let mut index = starting_index(query.id(), upstreams.len());
        let mut last_error = DomainError::TransportAllServersUnreachable;

        for attempt in 0..upstreams.len() {
            let server = upstreams[index];

            match self.exchanger.exchange(query, server, transport).await {
                Ok(mut response) => {
                    response.set_id(query.id());
                    debug!(
                        server = %server,
                        attempt,
                        rcode = %response.response_code(),
                        "Stub forward answered"
                    );
                    return response;
                }
                Err(e) => {
                    debug!(server = %server, attempt, error = %e, "Stub upstream failed, trying next");
                    last_error = e;
                    index = (index + 1) % upstreams.len();
                }
            }
        }

        warn!(
            id = query.id(),
            upstreams = upstreams.len(),
            error = %last_error,
            "Failure to forward stub request"
        );
        reply_with_code(query, ResponseCode::ServFail)
    }
}

/// First candidate for a query: its transaction ID modulo the candidate
/// count.
pub fn starting_index(id: u16, candidates: usize) -> usize {
    usize::from(id) % candidates
}
