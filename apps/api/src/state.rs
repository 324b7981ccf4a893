use std::sync::Arc;

use crate::readings::store::ReadingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Created once by bootstrap; owns the connection pool.
    pub store: Arc<dyn ReadingStore>,
}
