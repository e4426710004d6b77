mod mock_repositories;

pub use mock_repositories::{stub_record, MockServiceRecordBackend, MockStubZoneStore};
