use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{DocumentStore, Fields, TreePath};

pub const FIELD_LAST_UPDATE: &str = "lastUpdate";

/// Stamps a Classe's `lastUpdate` after a mutation somewhere in its subtree
///
/// The primary write is the operation of record: a failed stamp is logged
/// and never reported back to the caller.
#[derive(Clone)]
pub struct Propagator {
    store: Arc<dyn DocumentStore>,
}

impl Propagator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns whether the stamp was written
    pub async fn touch(&self, classe_id: &str) -> bool {
        let fields = Fields::new().server_timestamp(FIELD_LAST_UPDATE);
        match self
            .store
            .update_fields(&TreePath::classes(), classe_id, fields)
            .await
        {
            Ok(()) => {
                debug!("Stamped lastUpdate on classe {}", classe_id);
                true
            }
            Err(e) => {
                warn!("Failed to stamp lastUpdate on classe {}: {}", classe_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn touch_on_missing_classe_is_reported_not_raised() {
        let propagator = Propagator::new(Arc::new(MemoryStore::new()));
        assert!(!propagator.touch("ghost").await);
    }

    #[tokio::test]
    async fn touch_sets_last_update() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_document(&TreePath::classes(), "6e", Fields::new().set("nom", "6e"))
            .await
            .unwrap();
        let propagator = Propagator::new(store.clone());

        assert!(propagator.touch("6e").await);
        let doc = store.get_one(&TreePath::classes(), "6e").await.unwrap();
        assert!(doc.get_str(FIELD_LAST_UPDATE).is_some());
    }
}
