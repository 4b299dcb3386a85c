use std::sync::Arc;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};

/// Open the document store selected by configuration
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store (contents are lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let base = config
                .database_url
                .as_deref()
                .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
            let connection_string = build_connection_string(base, config.database_name.as_deref())?;
            let store = PgDocumentStore::connect(
                &connection_string,
                config.max_connections,
                config.connection_timeout(),
            )
            .await?;
            Ok(Arc::new(store))
        }
    }
}

/// Swap the database name in the URL path when an override is given
fn build_connection_string(base: &str, database_name: Option<&str>) -> Result<String, StoreError> {
    let mut url = url::Url::parse(base).map_err(|_| StoreError::InvalidDatabaseUrl)?;
    if let Some(name) = database_name {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StoreError::InvalidDatabaseUrl);
        }
        url.set_path(&format!("/{}", name));
    }
    Ok(url.into())
}
