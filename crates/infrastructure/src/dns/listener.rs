//! DNS front end: receives client queries over UDP and TCP and routes the
//! ones that fall inside a stub zone to [`StubForwarder`].

use super::stub::{reply_with_code, ResponseSink, StubForwarder};
use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stubzone_application::ports::StubZoneStore;
use stubzone_domain::{ClientTransport, DomainError};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const MAX_UDP_MESSAGE_SIZE: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Not a parsable query; nothing was written.
    Dropped,
    Forwarded,
    Refused,
    FormatError,
}

/// Decides what happens to one client packet.
pub struct StubRouter {
    store: Arc<dyn StubZoneStore>,
    forwarder: Arc<StubForwarder>,
}

impl StubRouter {
    pub fn new(store: Arc<dyn StubZoneStore>, forwarder: Arc<StubForwarder>) -> Self {
        Self { store, forwarder }
    }

    pub fn forwarder(&self) -> &Arc<StubForwarder> {
        &self.forwarder
    }

    pub async fn handle<S>(
        &self,
        packet: &[u8],
        transport: ClientTransport,
        sink: &mut S,
    ) -> RouteOutcome
    where
        S: ResponseSink + ?Sized,
    {
        let query = match Message::from_vec(packet) {
            Ok(message) => message,
            Err(e) => {
                debug!(transport = %transport, error = %e, "Dropping unparsable packet");
                return RouteOutcome::Dropped;
            }
        };

        if query.message_type() != MessageType::Query {
            debug!(id = query.id(), "Dropping packet that is not a query");
            return RouteOutcome::Dropped;
        }

        let Some(question) = query.queries().first() else {
            write_reply(sink, &reply_with_code(&query, ResponseCode::FormErr)).await;
            return RouteOutcome::FormatError;
        };

        let qname = question.name().to_ascii();
        let table = self.store.snapshot();

        match table.find(&qname) {
            Some((zone, upstreams)) => {
                debug!(
                    qname = %qname,
                    zone = %zone,
                    transport = %transport,
                    upstreams = upstreams.len(),
                    "Forwarding stub query"
                );
                self.forwarder
                    .forward(&query, transport, upstreams, sink)
                    .await;
                RouteOutcome::Forwarded
            }
            None => {
                debug!(qname = %qname, "No stub zone for query");
                write_reply(sink, &reply_with_code(&query, ResponseCode::Refused)).await;
                RouteOutcome::Refused
            }
        }
    }
}

async fn write_reply<S>(sink: &mut S, reply: &Message)
where
    S: ResponseSink + ?Sized,
{
    if let Err(e) = sink.write_msg(reply).await {
        warn!(id = reply.id(), error = %e, "Failed to write reply");
    }
}

fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    message
        .to_vec()
        .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))
}

pub struct UdpResponseSink {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpResponseSink {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }
}

#[async_trait]
impl ResponseSink for UdpResponseSink {
    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        let bytes = encode(message)?;
        self.socket
            .send_to(&bytes, self.peer)
            .await
            .map_err(|e| DomainError::IoError(format!("UDP reply to {}: {}", self.peer, e)))?;
        Ok(())
    }
}

pub struct TcpResponseSink<'a> {
    stream: &'a mut TcpStream,
    peer: SocketAddr,
}

impl<'a> TcpResponseSink<'a> {
    pub fn new(stream: &'a mut TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }
}

#[async_trait]
impl<'a> ResponseSink for TcpResponseSink<'a> {
    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        let bytes = encode(message)?;
        send_with_length_prefix(self.stream, &bytes)
            .await
            .map_err(|e| DomainError::IoError(format!("TCP reply to {}: {}", self.peer, e)))
    }
}

/// UDP socket and TCP listener bound to the same address.
pub struct DnsListener {
    udp: Arc<UdpSocket>,
    tcp: TcpListener,
    router: Arc<StubRouter>,
}

impl DnsListener {
    /// Binds UDP first; with port 0 the TCP listener reuses the port the OS
    /// picked for UDP.
    pub async fn bind(addr: SocketAddr, router: Arc<StubRouter>) -> Result<Self, DomainError> {
        let udp = UdpSocket::bind(addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP {}: {}", addr, e)))?;
        let udp_addr = udp
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        let tcp = TcpListener::bind(udp_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind TCP {}: {}", udp_addr, e)))?;

        Ok(Self {
            udp: Arc::new(udp),
            tcp,
            router,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.udp
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    /// Serves until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let local_addr = self.local_addr().ok();
        info!(bind_address = ?local_addr, "DNS listener ready (UDP + TCP)");

        let mut join_set: JoinSet<()> = JoinSet::new();

        join_set.spawn(run_udp(
            self.udp.clone(),
            self.router.clone(),
            shutdown.clone(),
        ));
        join_set.spawn(run_tcp(self.tcp, self.router, shutdown));

        while join_set.join_next().await.is_some() {}

        info!("DNS listener stopped");
    }
}

async fn run_udp(socket: Arc<UdpSocket>, router: Arc<StubRouter>, shutdown: CancellationToken) {
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let packet = recv_buf[..len].to_vec();
        let socket = socket.clone();
        let router = router.clone();
        tokio::spawn(async move {
            let mut sink = UdpResponseSink::new(socket, peer);
            router.handle(&packet, ClientTransport::Udp, &mut sink).await;
        });
    }
}

async fn run_tcp(listener: TcpListener, router: Arc<StubRouter>, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(a) => a,
                Err(e) => {
                    error!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let router = router.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(serve_tcp_connection(stream, peer, router, shutdown));
    }
}

/// Handles queries on one connection in order until the client closes it,
/// it idles out, or the listener shuts down.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    router: Arc<StubRouter>,
    shutdown: CancellationToken,
) {
    loop {
        let read = tokio::select! {
            _ = shutdown.cancelled() => break,
            read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)) => read,
        };

        let packet = match read {
            Ok(Ok(packet)) => packet,
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Ok(Err(e)) => {
                debug!(peer = %peer, error = %e, "TCP read error");
                break;
            }
            Err(_) => {
                debug!(peer = %peer, "TCP connection idle, closing");
                break;
            }
        };

        let mut sink = TcpResponseSink::new(&mut stream, peer);
        router.handle(&packet, ClientTransport::Tcp, &mut sink).await;
    }
}
