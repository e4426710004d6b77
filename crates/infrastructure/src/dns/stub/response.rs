use hickory_proto::op::{Message, MessageType, ResponseCode};

/// Builds an empty reply to `query` carrying `code`: same ID, opcode, RD and
/// CD bits, question section echoed.
pub fn reply_with_code(query: &Message, code: ResponseCode) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(query.op_code())
        .set_recursion_desired(query.recursion_desired())
        .set_checking_disabled(query.checking_disabled())
        .set_response_code(code);
    reply.add_queries(query.queries().iter().cloned());
    reply
}
