use super::queries::answer_ip;
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use stubzone_domain::{ClientTransport, DomainError};
use stubzone_infrastructure::dns::stub::{ResponseSink, UpstreamExchanger};

#[derive(Clone)]
pub enum Behavior {
    Answer(Ipv4Addr),
    NxDomain,
    Timeout,
}

/// Scripted upstreams keyed by address. Unknown addresses refuse the
/// connection. Replies carry a deliberately wrong ID so callers must
/// restore the client's.
pub struct MockExchanger {
    behaviors: Mutex<HashMap<SocketAddr, Behavior>>,
    calls: Mutex<Vec<(SocketAddr, ClientTransport)>>,
}

impl MockExchanger {
    pub fn new() -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(self, server: SocketAddr, behavior: Behavior) -> Self {
        self.behaviors.lock().unwrap().insert(server, behavior);
        self
    }

    pub fn calls(&self) -> Vec<(SocketAddr, ClientTransport)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn servers_called(&self) -> Vec<SocketAddr> {
        self.calls().into_iter().map(|(server, _)| server).collect()
    }
}

#[async_trait]
impl UpstreamExchanger for MockExchanger {
    async fn exchange(
        &self,
        query: &Message,
        server: SocketAddr,
        transport: ClientTransport,
    ) -> Result<Message, DomainError> {
        self.calls.lock().unwrap().push((server, transport));

        let behavior = self.behaviors.lock().unwrap().get(&server).cloned();

        let mut reply = query.clone();
        reply
            .set_id(query.id().wrapping_add(1))
            .set_message_type(MessageType::Response);

        match behavior {
            Some(Behavior::Answer(ip)) => {
                let name = query.queries()[0].name().clone();
                reply.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
                Ok(reply)
            }
            Some(Behavior::NxDomain) => {
                reply.set_response_code(ResponseCode::NXDomain);
                Ok(reply)
            }
            Some(Behavior::Timeout) => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
            None => Err(DomainError::TransportConnectionRefused {
                server: server.to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub written: Vec<Message>,
}

impl RecordingSink {
    pub fn only(&self) -> &Message {
        assert_eq!(self.written.len(), 1, "expected exactly one reply");
        &self.written[0]
    }

    pub fn only_ip(&self) -> Option<Ipv4Addr> {
        answer_ip(self.only())
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        self.written.push(message.clone());
        Ok(())
    }
}
