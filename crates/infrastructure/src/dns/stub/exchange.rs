use crate::dns::transport::create_transport;
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::time::Duration;
use stubzone_domain::{ClientTransport, DomainError};
use tracing::debug;

/// Sends one query to one upstream and returns its reply.
///
/// An `Err` always means no usable reply arrived. A reply carrying a DNS
/// error code is still `Ok`.
#[async_trait]
pub trait UpstreamExchanger: Send + Sync {
    async fn exchange(
        &self,
        query: &Message,
        server: SocketAddr,
        transport: ClientTransport,
    ) -> Result<Message, DomainError>;
}

/// Exchanges over the network with a bounded timeout per attempt.
///
/// The outgoing packet carries a fresh random ID; the reply must echo it.
/// The returned message keeps the upstream's ID, callers restore the
/// client's.
pub struct NetworkExchanger {
    timeout: Duration,
}

impl NetworkExchanger {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl UpstreamExchanger for NetworkExchanger {
    async fn exchange(
        &self,
        query: &Message,
        server: SocketAddr,
        transport: ClientTransport,
    ) -> Result<Message, DomainError> {
        let outgoing_id = fastrand::u16(..);
        let mut outgoing = query.clone();
        outgoing.set_id(outgoing_id);

        let bytes = outgoing
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;

        let upstream = create_transport(transport, server);
        let response = upstream.send(&bytes, self.timeout).await?;

        let message = Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Unparsable reply from {}: {}", server, e))
        })?;

        if message.id() != outgoing_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Reply from {} has ID {}, expected {}",
                server,
                message.id(),
                outgoing_id
            )));
        }

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Reply from {} is not a response",
                server
            )));
        }

        debug!(
            server = %server,
            protocol = response.protocol_used,
            rcode = %message.response_code(),
            answers = message.answers().len(),
            "Upstream exchange completed"
        );

        Ok(message)
    }
}
