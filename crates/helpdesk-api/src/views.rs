//! Read-only handlers backing the list, detail, and dashboard pages.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tickets` | Optional `?status=all\|open\|in_progress\|resolved` |
//! | `GET`  | `/tickets/{id}` | Ticket + comments; 404 if absent. `?success=true` is echoed |
//! | `GET`  | `/dashboard` | Counts + 10 most recently updated; never cached |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use helpdesk_core::{
  comment::Comment,
  store::TicketStore,
  ticket::{Ticket, TicketId},
  view::{self, ListFilter},
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::QueryParams};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
}

/// `{"tickets": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketsEnvelope {
  pub tickets: Vec<Ticket>,
}

/// `GET /tickets[?status=<status>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<TicketsEnvelope>, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = ListFilter::parse(params.status.as_deref())
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let tickets = view::list(store.as_ref(), filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(TicketsEnvelope { tickets }))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DetailParams {
  pub success: Option<String>,
}

/// A ticket page: the ticket, its comments oldest first, and whether the
/// viewer just submitted it.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailEnvelope {
  pub ticket:         Ticket,
  pub comments:       Vec<Comment>,
  #[serde(default)]
  pub just_submitted: bool,
}

/// `GET /tickets/{id}[?success=true]`
pub async fn detail<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  QueryParams(params): QueryParams<DetailParams>,
) -> Result<Json<DetailEnvelope>, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let not_found = || ApiError::NotFound(format!("ticket {raw_id} not found"));

  let id: TicketId = raw_id.parse().map_err(|_| not_found())?;

  // A lookup that errors reads as not found on this page, same as a miss.
  let detail = match view::detail(store.as_ref(), id).await {
    Ok(Some(detail)) => detail,
    Ok(None) => return Err(not_found()),
    Err(e) => {
      tracing::warn!(ticket_id = id, error = %e, "ticket lookup failed");
      return Err(not_found());
    }
  };

  Ok(Json(DetailEnvelope {
    ticket:         detail.ticket,
    comments:       detail.comments,
    just_submitted: params.success.as_deref() == Some("true"),
  }))
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

/// `GET /dashboard` — recomputed on every request.
pub async fn dashboard<S>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let dashboard = view::dashboard(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(([(header::CACHE_CONTROL, "no-store")], Json(dashboard)))
}
