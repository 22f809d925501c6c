//! Handlers for `/tickets` writes.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/tickets` | Body: [`CreateBody`]; any `status` is ignored, tickets start `open` |
//! | `PATCH` | `/tickets?id=<id>` | Body: [`TicketPatch`]; 400 if `id` is missing |

use std::sync::Arc;

use axum::{Json, extract::State};
use helpdesk_core::{
  store::TicketStore,
  ticket::{NewTicket, Ticket, TicketId, TicketPatch, TicketPriority},
};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  extract::{JsonBody, QueryParams},
};

/// `{"ticket": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketEnvelope {
  pub ticket: Ticket,
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /tickets`. Unknown keys (including `status`)
/// are dropped.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:          String,
  pub description:    String,
  #[serde(default)]
  pub priority:       TicketPriority,
  pub customer_name:  String,
  pub customer_email: String,
}

impl From<CreateBody> for NewTicket {
  fn from(b: CreateBody) -> Self {
    NewTicket {
      title:          b.title,
      description:    b.description,
      priority:       b.priority,
      customer_name:  b.customer_name,
      customer_email: b.customer_email,
    }
  }
}

/// `POST /tickets` — returns the stored ticket, always `open`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<Json<TicketEnvelope>, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ticket = store
    .create_ticket(NewTicket::from(body))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(ticket_id = ticket.id, priority = %ticket.priority, "ticket created");
  Ok(Json(TicketEnvelope { ticket }))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PatchParams {
  /// Required; kept optional here so a missing value gets our own message.
  pub id: Option<String>,
}

impl PatchParams {
  fn ticket_id(&self) -> Result<TicketId, ApiError> {
    let raw = self
      .id
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .ok_or_else(|| ApiError::BadRequest("Missing ticket ID".into()))?;
    raw
      .parse()
      .map_err(|_| ApiError::BadRequest(format!("invalid ticket ID: {raw:?}")))
  }
}

/// `PATCH /tickets?id=<id>` — partial update; `updated_at` is always stamped.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<PatchParams>,
  JsonBody(patch): JsonBody<TicketPatch>,
) -> Result<Json<TicketEnvelope>, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = params.ticket_id()?;
  let ticket = store
    .update_ticket(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(ticket_id = id, status = %ticket.status, "ticket updated");
  Ok(Json(TicketEnvelope { ticket }))
}
