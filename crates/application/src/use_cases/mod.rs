pub mod stub_zones;

pub use stub_zones::{RefreshStubZonesUseCase, StubZoneRefresh};
