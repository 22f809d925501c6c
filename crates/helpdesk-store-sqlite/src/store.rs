//! [`SqliteStore`] — the SQLite implementation of [`TicketStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use helpdesk_core::{
  comment::{Comment, NewComment},
  store::TicketStore,
  ticket::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus},
};

use crate::{
  Error, Result,
  encode::{
    COMMENT_COLUMNS, RawComment, RawTicket, TICKET_COLUMNS, encode_dt,
    raw_comment, raw_ticket,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A helpdesk store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Run raw SQL against the connection, for seeding rows with chosen
  /// timestamps.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &str) -> Result<()> {
    let sql = sql.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TicketStore impl ────────────────────────────────────────────────────────

impl TicketStore for SqliteStore {
  type Error = Error;

  // ── Tickets — writes ──────────────────────────────────────────────────────

  async fn create_ticket(&self, input: NewTicket) -> Result<Ticket> {
    let now_str      = encode_dt(Utc::now());
    let status_str   = TicketStatus::Open.as_str();
    let priority_str = input.priority.as_str();

    let raw: RawTicket = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO tickets (
               title, description, status, priority,
               customer_name, customer_email, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {TICKET_COLUMNS}"
          ),
          rusqlite::params![
            input.title,
            input.description,
            status_str,
            priority_str,
            input.customer_name,
            input.customer_email,
            now_str,
          ],
          raw_ticket,
        )?)
      })
      .await?;

    raw.into_ticket()
  }

  async fn update_ticket(
    &self,
    id:    TicketId,
    patch: TicketPatch,
  ) -> Result<Ticket> {
    let now_str      = encode_dt(Utc::now());
    let status_str   = patch.status.map(TicketStatus::as_str);
    let priority_str = patch.priority.map(|p| p.as_str());
    let set_assignee = patch.assigned_to.is_some();
    let assignee     = patch.assigned_to.flatten();

    // updated_at never moves backwards, even if the clock does.
    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE tickets SET
                 title          = COALESCE(?1, title),
                 description    = COALESCE(?2, description),
                 status         = COALESCE(?3, status),
                 priority       = COALESCE(?4, priority),
                 customer_name  = COALESCE(?5, customer_name),
                 customer_email = COALESCE(?6, customer_email),
                 assigned_to    = CASE WHEN ?7 THEN ?8 ELSE assigned_to END,
                 updated_at     = MAX(?9, updated_at)
               WHERE id = ?10
               RETURNING {TICKET_COLUMNS}"
            ),
            rusqlite::params![
              patch.title,
              patch.description,
              status_str,
              priority_str,
              patch.customer_name,
              patch.customer_email,
              set_assignee,
              assignee,
              now_str,
              id,
            ],
            raw_ticket,
          )
          .optional()?)
      })
      .await?;

    raw.ok_or(Error::TicketNotFound(id))?.into_ticket()
  }

  async fn touch_ticket(&self, id: TicketId) -> Result<()> {
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE tickets SET updated_at = MAX(?1, updated_at) WHERE id = ?2",
          rusqlite::params![now_str, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::TicketNotFound(id));
    }
    Ok(())
  }

  // ── Tickets — reads ───────────────────────────────────────────────────────

  async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>> {
    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
            rusqlite::params![id],
            raw_ticket,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTicket::into_ticket).transpose()
  }

  async fn list_tickets(
    &self,
    status: Option<TicketStatus>,
  ) -> Result<Vec<Ticket>> {
    let status_str = status.map(TicketStatus::as_str);

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TICKET_COLUMNS} FROM tickets
           WHERE ?1 IS NULL OR status = ?1
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status_str], raw_ticket)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTicket::into_ticket).collect()
  }

  async fn recent_tickets(&self, limit: usize) -> Result<Vec<Ticket>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TICKET_COLUMNS} FROM tickets
           ORDER BY updated_at DESC, id DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], raw_ticket)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTicket::into_ticket).collect()
  }

  async fn ticket_statuses(&self) -> Result<Vec<TicketStatus>> {
    let raws: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT status FROM tickets")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .iter()
      .map(|s| TicketStatus::parse(s).map_err(Error::from))
      .collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let now_str = encode_dt(Utc::now());

    // A new comment never sorts before one already on the ticket, even if
    // the clock does.
    let raw: RawComment = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO ticket_comments (
               ticket_id, author_name, author_email, comment, is_staff, created_at
             ) VALUES (
               ?1, ?2, ?3, ?4, ?5,
               MAX(?6, COALESCE(
                 (SELECT MAX(created_at) FROM ticket_comments WHERE ticket_id = ?1),
                 ?6
               ))
             )
             RETURNING {COMMENT_COLUMNS}"
          ),
          rusqlite::params![
            input.ticket_id,
            input.author_name,
            input.author_email,
            input.comment,
            input.is_staff,
            now_str,
          ],
          raw_comment,
        )?)
      })
      .await?;

    raw.into_comment()
  }

  async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM ticket_comments
           WHERE ticket_id = ?1
           ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ticket_id], raw_comment)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }
}
