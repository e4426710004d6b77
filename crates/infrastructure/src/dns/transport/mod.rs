pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use stubzone_domain::{ClientTransport, DomainError};

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

/// Picks the upstream transport matching the one the client used.
pub fn create_transport(transport: ClientTransport, server_addr: SocketAddr) -> Transport {
    match transport {
        ClientTransport::Udp => Transport::Udp(udp::UdpTransport::new(server_addr)),
        ClientTransport::Tcp => Transport::Tcp(tcp::TcpTransport::new(server_addr)),
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

pub(crate) fn io_error(server: SocketAddr, context: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => DomainError::TransportConnectionReset {
            server: server.to_string(),
        },
        io::ErrorKind::TimedOut => timeout_error(server),
        _ => DomainError::IoError(format!("{} {}: {}", context, server, e)),
    }
}
