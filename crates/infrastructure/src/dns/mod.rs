pub mod listener;
pub mod stub;
pub mod stub_zone_store;
pub mod transport;

pub use listener::{DnsListener, RouteOutcome, StubRouter};
pub use stub::{NetworkExchanger, StubForwardMetrics, StubForwarder, UpstreamExchanger};
pub use stub_zone_store::ArcSwapStubZoneStore;
