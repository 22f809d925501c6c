//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix, so string comparison in SQL orders them chronologically.
//! Enums are stored as their wire names.

use chrono::{DateTime, SecondsFormat, Utc};
use helpdesk_core::{
  comment::Comment,
  ticket::{Ticket, TicketPriority, TicketStatus},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`raw_ticket`].
pub const TICKET_COLUMNS: &str = "id, title, description, status, priority, \
   customer_name, customer_email, assigned_to, created_at, updated_at";

/// Column list matching [`raw_comment`].
pub const COMMENT_COLUMNS: &str =
  "id, ticket_id, author_name, author_email, comment, is_staff, created_at";

/// Raw values read directly from a `tickets` row.
pub struct RawTicket {
  pub id:             i64,
  pub title:          String,
  pub description:    String,
  pub status:         String,
  pub priority:       String,
  pub customer_name:  String,
  pub customer_email: String,
  pub assigned_to:    Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

pub fn raw_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTicket> {
  Ok(RawTicket {
    id:             row.get(0)?,
    title:          row.get(1)?,
    description:    row.get(2)?,
    status:         row.get(3)?,
    priority:       row.get(4)?,
    customer_name:  row.get(5)?,
    customer_email: row.get(6)?,
    assigned_to:    row.get(7)?,
    created_at:     row.get(8)?,
    updated_at:     row.get(9)?,
  })
}

impl RawTicket {
  pub fn into_ticket(self) -> Result<Ticket> {
    Ok(Ticket {
      id:             self.id,
      title:          self.title,
      description:    self.description,
      status:         TicketStatus::parse(&self.status)?,
      priority:       TicketPriority::parse(&self.priority)?,
      customer_name:  self.customer_name,
      customer_email: self.customer_email,
      assigned_to:    self.assigned_to,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `ticket_comments` row.
pub struct RawComment {
  pub id:           i64,
  pub ticket_id:    i64,
  pub author_name:  String,
  pub author_email: String,
  pub comment:      String,
  pub is_staff:     bool,
  pub created_at:   String,
}

pub fn raw_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawComment> {
  Ok(RawComment {
    id:           row.get(0)?,
    ticket_id:    row.get(1)?,
    author_name:  row.get(2)?,
    author_email: row.get(3)?,
    comment:      row.get(4)?,
    is_staff:     row.get(5)?,
    created_at:   row.get(6)?,
  })
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:           self.id,
      ticket_id:    self.ticket_id,
      author_name:  self.author_name,
      author_email: self.author_email,
      comment:      self.comment,
      is_staff:     self.is_staff,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
