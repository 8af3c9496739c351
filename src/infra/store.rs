use std::sync::Arc;

use tracing::info;

use crate::application::repos::PostStore;
use crate::application::source::is_live_store_configured;
use crate::config::{StoreBackend, StoreSettings};
use crate::infra::{db::PostgresStore, error::InfraError, rest::PostgrestStore};

/// Build the adapter for the configured backend, or `None` when the store is not configured.
pub fn build_live_store(
    settings: &StoreSettings,
) -> Result<Option<Arc<dyn PostStore>>, InfraError> {
    if !is_live_store_configured(settings) {
        info!(
            target = "inkpost::store",
            "live store not configured; serving the sample collection"
        );
        return Ok(None);
    }

    let store: Arc<dyn PostStore> = match settings.backend {
        StoreBackend::Rest => Arc::new(PostgrestStore::new(settings)?),
        StoreBackend::Postgres => Arc::new(PostgresStore::connect_lazy(settings)?),
    };

    info!(
        target = "inkpost::store",
        backend = settings.backend.as_str(),
        table = %settings.table,
        timeout_secs = settings.timeout.as_secs(),
        "live store configured"
    );

    Ok(Some(store))
}
