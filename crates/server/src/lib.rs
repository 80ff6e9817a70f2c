//! HTTP dispatcher for the BITS upload protocol.
//!
//! Exposes a single route that accepts `BITS_POST` requests and drives
//! the per-session state machine: create-session, fragment,
//! close-session, cancel-session, plus ping. Session state lives
//! entirely on the filesystem; every request re-resolves the session
//! identifier through the store before acting.

mod dispatch;
mod error;
mod locks;

use axum::Router;
use axum::routing::any;
use tower_http::trace::TraceLayer;

use bitsd_store::SessionStore;

pub use error::BitsError;
pub use locks::SessionLocks;

/// Shared state for the protocol handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) store: SessionStore,
    pub(crate) locks: SessionLocks,
}

impl AppState {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            locks: SessionLocks::default(),
        }
    }
}

/// Builds the protocol router serving `route` (e.g. `/bits`).
///
/// The route is registered for every HTTP method; the handler itself
/// rejects anything other than `BITS_POST`, which axum's method
/// routing cannot express.
pub fn bits_router(route: &str, state: AppState) -> Router {
    Router::new()
        .route(route, any(dispatch::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
