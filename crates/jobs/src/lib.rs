pub mod stub_zone_refresh;

pub use stub_zone_refresh::StubZoneRefreshJob;
