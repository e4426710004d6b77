pub mod exchange;
pub mod forwarder;
pub mod metrics;
pub mod response;

pub use exchange::{NetworkExchanger, UpstreamExchanger};
pub use forwarder::{starting_index, ResponseSink, StubForwarder};
pub use metrics::StubForwardMetrics;
pub use response::reply_with_code;
