use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use stubzone_application::use_cases::RefreshStubZonesUseCase;
use stubzone_domain::Config;
use stubzone_infrastructure::dns::{
    ArcSwapStubZoneStore, NetworkExchanger, StubForwarder, StubRouter,
};
use stubzone_infrastructure::repositories::SqliteServiceRecordBackend;

/// Everything the commands need, wired once from the configuration.
pub struct Services {
    pub backend: Arc<SqliteServiceRecordBackend>,
    pub store: Arc<ArcSwapStubZoneStore>,
    pub refresh: Arc<RefreshStubZonesUseCase>,
    pub router: Arc<StubRouter>,
}

impl Services {
    pub fn new(config: &Config, pool: SqlitePool) -> Self {
        let backend = Arc::new(SqliteServiceRecordBackend::new(pool));
        let store = Arc::new(ArcSwapStubZoneStore::new());

        let refresh = Arc::new(RefreshStubZonesUseCase::new(
            backend.clone(),
            store.clone(),
            &config.stub.stub_prefix(),
            &config.stub.local_domain(),
        ));

        let exchanger = Arc::new(NetworkExchanger::new(Duration::from_millis(
            config.stub.upstream_timeout_ms,
        )));
        let forwarder = Arc::new(StubForwarder::new(exchanger));
        let router = Arc::new(StubRouter::new(store.clone(), forwarder));

        Self {
            backend,
            store,
            refresh,
            router,
        }
    }
}
