use arc_swap::ArcSwap;
use std::sync::Arc;
use stubzone_application::ports::StubZoneStore;
use stubzone_domain::StubZoneTable;

/// Lock-free publication slot. Lookups load the current `Arc` and keep it
/// for the whole forward, so a concurrent publish never affects them.
pub struct ArcSwapStubZoneStore {
    table: ArcSwap<StubZoneTable>,
}

impl ArcSwapStubZoneStore {
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(StubZoneTable::empty()),
        }
    }
}

impl Default for ArcSwapStubZoneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StubZoneStore for ArcSwapStubZoneStore {
    fn publish(&self, table: StubZoneTable) {
        self.table.store(Arc::new(table));
    }

    fn snapshot(&self) -> Arc<StubZoneTable> {
        self.table.load_full()
    }
}
