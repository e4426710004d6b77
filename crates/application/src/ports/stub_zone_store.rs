use std::sync::Arc;
use stubzone_domain::StubZoneTable;

/// Publication slot for the active stub-zone table.
///
/// Readers always observe a complete table: either the one they captured or
/// the one most recently published, never a mix.
pub trait StubZoneStore: Send + Sync {
    fn publish(&self, table: StubZoneTable);

    fn snapshot(&self) -> Arc<StubZoneTable>;
}
