use std::sync::Arc;

use crate::config::Config;
use crate::database::{InMemoryStore, MongoDB, OrderStore, UserStore};

/// Everything a request handler needs, built once at startup and shared
/// through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub orders: Arc<dyn OrderStore>,
    pub config: Config,
    /// Present when backed by MongoDB; used by the health check.
    pub database: Option<MongoDB>,
}

impl AppState {
    pub fn with_mongodb(db: MongoDB, config: Config) -> Self {
        let store = Arc::new(db.clone());
        Self {
            users: store.clone(),
            orders: store,
            config,
            database: Some(db),
        }
    }

    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            orders: store,
            config,
            database: None,
        }
    }
}
