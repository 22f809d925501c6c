//! JSON REST API for the helpdesk.
//!
//! Exposes an axum [`Router`] backed by any [`helpdesk_core::store::TicketStore`].
//! TLS and transport concerns are the caller's responsibility. There is no
//! authentication: anyone may act as staff.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", helpdesk_api::api_router(store.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod extract;
pub mod tickets;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use helpdesk_core::store::TicketStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TicketStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Tickets
    .route(
      "/tickets",
      get(views::list::<S>)
        .post(tickets::create::<S>)
        .patch(tickets::update::<S>),
    )
    .route("/tickets/{id}", get(views::detail::<S>))
    // Comments
    .route("/comments", post(comments::create::<S>))
    // Dashboard
    .route("/dashboard", get(views::dashboard::<S>))
    .with_state(store)
}
