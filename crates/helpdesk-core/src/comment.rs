//! Comments — timestamped notes attached to a ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ticket::TicketId;

pub type CommentId = i64;

/// A comment row as returned by the store. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id:           CommentId,
  pub ticket_id:    TicketId,
  pub author_name:  String,
  pub author_email: String,
  pub comment:      String,
  /// Self-asserted by the author; nothing verifies it.
  pub is_staff:     bool,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::TicketStore::create_comment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
  pub ticket_id:    TicketId,
  pub author_name:  String,
  pub author_email: String,
  pub comment:      String,
  #[serde(default)]
  pub is_staff:     bool,
}
