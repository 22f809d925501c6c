//! Handler for `POST /comments`.
//!
//! Creating a comment is two independent statements: insert the comment, then
//! touch the parent ticket's `updated_at`. Only the insert decides the
//! response. A failed touch is logged and otherwise ignored; the comment is
//! not rolled back.

use std::sync::Arc;

use axum::{Json, extract::State};
use helpdesk_core::{
  comment::{Comment, NewComment},
  store::TicketStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::JsonBody};

/// `{"comment": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentEnvelope {
  pub comment: Comment,
}

/// `POST /comments` — body: `{ticket_id, author_name, author_email, comment, is_staff}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewComment>,
) -> Result<Json<CommentEnvelope>, ApiError>
where
  S: TicketStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ticket_id = body.ticket_id;
  let comment = store
    .create_comment(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(ticket_id, comment_id = comment.id, is_staff = comment.is_staff, "comment created");

  if let Err(e) = store.touch_ticket(ticket_id).await {
    tracing::warn!(ticket_id, error = %e, "failed to touch ticket after comment");
  }

  Ok(Json(CommentEnvelope { comment }))
}
