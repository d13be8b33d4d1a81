pub mod error;
pub mod extract;
pub mod health;
pub mod history;
pub mod recipients;

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;

use firewatch_db::{KeyValueStore, RecipientStore, StoreError};

use crate::error::ApiError;

/// Store behind a type-erased backend so the server can pick one at startup.
pub type DashboardStore = RecipientStore<Box<dyn KeyValueStore>>;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Mutex<DashboardStore>,
}

impl AppStateInner {
    pub fn new(store: DashboardStore) -> AppState {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

/// Routes consumed by the dashboard front end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/recipients",
            get(recipients::list_recipients).post(recipients::add_recipient),
        )
        .route(
            "/recipients/{id}",
            get(recipients::get_recipient)
                .put(recipients::update_recipient)
                .delete(recipients::delete_recipient),
        )
        .route("/recipients/{id}/active", post(recipients::set_active))
        .route("/audience/{severity}", get(recipients::audience))
        .route("/history", get(history::list_history))
        .route("/summary", get(history::summary))
        .with_state(state)
}

/// Run `f` against the store on the blocking pool, holding the lock for the
/// whole read-modify-persist.
pub(crate) async fn with_store<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut DashboardStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let mut store = state.store.lock().map_err(|_| ApiError::LockPoisoned)?;
        f(&mut *store).map_err(ApiError::from)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Join
    })?
}
