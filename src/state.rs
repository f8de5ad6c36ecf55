use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::fmt;
use std::sync::Arc;

use crate::access::store::{PgRoleStore, RoleStore};
use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::gate::GateConfig;
use crate::metrics::init_metrics;

/// Shared application state, cloned into every handler.
///
/// The role store is held behind the [`RoleStore`] trait so tests and
/// embedded setups can supply an in-memory store while the binaries use
/// Postgres.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: Arc<dyn RoleStore>,
    pub cors_config: CorsConfig,
    pub gate_config: GateConfig,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("gate_config", &self.gate_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    let store: Arc<dyn RoleStore> = Arc::new(PgRoleStore::new(db.clone()));

    AppState {
        db,
        store,
        cors_config: CorsConfig::from_env(),
        gate_config: GateConfig::from_env(),
        metrics_handle: init_metrics(),
    }
}
