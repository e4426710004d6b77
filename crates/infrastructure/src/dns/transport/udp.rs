//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). Datagrams from another source or
//! with another ID are ignored until the deadline. A truncated reply is
//! returned to the caller unchanged; the client decides whether to retry
//! over TCP.

use super::{io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use stubzone_domain::DomainError;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| io_error(self.server_addr, "Failed to bind UDP socket for", e))?;

        let exchange = async {
            let bytes_sent = socket
                .send_to(message_bytes, self.server_addr)
                .await
                .map_err(|e| io_error(self.server_addr, "Failed to send UDP query to", e))?;

            debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            loop {
                let (bytes_received, from_addr) = socket
                    .recv_from(&mut recv_buf)
                    .await
                    .map_err(|e| io_error(self.server_addr, "Failed to receive UDP response from", e))?;

                // Only the queried server may answer.
                if from_addr != self.server_addr {
                    warn!(
                        expected = %self.server_addr,
                        received_from = %from_addr,
                        "UDP response from unexpected source"
                    );
                    continue;
                }

                // A late or stray reply for another query; keep waiting.
                if recv_buf[..bytes_received].get(..2) != message_bytes.get(..2) {
                    warn!(
                        server = %self.server_addr,
                        bytes_received,
                        "UDP response with mismatched ID"
                    );
                    continue;
                }

                recv_buf.truncate(bytes_received);
                return Ok::<_, DomainError>(recv_buf);
            }
        };

        // One deadline covers send and receive.
        let bytes = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        debug!(server = %self.server_addr, bytes_received = bytes.len(), "UDP response received");

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
