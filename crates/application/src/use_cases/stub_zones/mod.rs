mod refresh;

pub use refresh::{RefreshStubZonesUseCase, StubZoneRefresh};
