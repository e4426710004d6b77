use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stubzone_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// Authoritative stand-in answering every A query with a fixed address, or
/// NXDOMAIN when built with `nxdomain`. Serves UDP and TCP on one port.
pub struct MockUpstream {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn answering(ip: Ipv4Addr) -> Self {
        Self::start(Some(ip)).await
    }

    pub async fn nxdomain() -> Self {
        Self::start(None).await
    }

    async fn start(answer: Option<Ipv4Addr>) -> Self {
        let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = udp.local_addr().unwrap();
        let tcp = TcpListener::bind(addr).await.unwrap();

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = udp_queries.clone();
        let tcp_count = tcp_queries.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            let reply = Self::reply(&buf[..len], answer);
                            let _ = udp.send_to(&reply, peer).await;
                        }
                    }
                    accepted = tcp.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let tcp_count = tcp_count.clone();
                            tokio::spawn(async move {
                                while let Ok(packet) = read_with_length_prefix(&mut stream).await {
                                    tcp_count.fetch_add(1, Ordering::SeqCst);
                                    let reply = Self::reply(&packet, answer);
                                    if send_with_length_prefix(&mut stream, &reply).await.is_err() {
                                        break;
                                    }
                                }
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn reply(packet: &[u8], answer: Option<Ipv4Addr>) -> Vec<u8> {
        let query = Message::from_vec(packet).unwrap();
        let mut reply = query.clone();
        reply.set_message_type(MessageType::Response);

        match answer {
            Some(ip) => {
                let name = query.queries()[0].name().clone();
                reply.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            }
            None => {
                reply.set_response_code(ResponseCode::NXDomain);
            }
        }

        reply.to_vec().unwrap()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// An address nothing listens on: bound then released.
pub async fn dead_addr() -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    drop(socket);
    addr
}
