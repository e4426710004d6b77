#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock};
use stubzone_application::ports::{ServiceRecordBackend, StubZoneStore};
use stubzone_domain::{DomainError, ServiceRecord, StubZoneTable};

#[derive(Clone, Default)]
pub struct MockServiceRecordBackend {
    records: Arc<RwLock<Vec<ServiceRecord>>>,
    failure: Arc<RwLock<Option<DomainError>>>,
    calls: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MockServiceRecordBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ServiceRecord>) -> Self {
        let backend = Self::new();
        backend.set_records(records);
        backend
    }

    pub fn set_records(&self, records: Vec<ServiceRecord>) {
        *self.records.write().unwrap() = records;
    }

    pub fn set_failure(&self, error: Option<DomainError>) {
        *self.failure.write().unwrap() = error;
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceRecordBackend for MockServiceRecordBackend {
    async fn records(&self, name: &str, exact: bool) -> Result<Vec<ServiceRecord>, DomainError> {
        self.calls.lock().unwrap().push((name.to_string(), exact));
        if let Some(err) = self.failure.read().unwrap().clone() {
            return Err(err);
        }
        Ok(self.records.read().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockStubZoneStore {
    current: RwLock<Arc<StubZoneTable>>,
    publications: Mutex<usize>,
}

impl MockStubZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publications(&self) -> usize {
        *self.publications.lock().unwrap()
    }

    pub fn snapshot_has(&self, domain: &str) -> bool {
        self.snapshot().upstreams(domain).is_some()
    }
}

impl StubZoneStore for MockStubZoneStore {
    fn publish(&self, table: StubZoneTable) {
        *self.current.write().unwrap() = Arc::new(table);
        *self.publications.lock().unwrap() += 1;
    }

    fn snapshot(&self) -> Arc<StubZoneTable> {
        self.current.read().unwrap().clone()
    }
}

pub fn stub_record(zone_path: &str, host: &str, port: u16) -> ServiceRecord {
    ServiceRecord::new(
        format!("/skydns/local/skydns/dns/stub/{}", zone_path),
        host,
        port,
    )
}
