//! Read views — the computed read models behind the list, dashboard, and
//! detail pages.
//!
//! Views are never stored and never cached; each call reads the store afresh.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  comment::Comment,
  store::TicketStore,
  ticket::{Ticket, TicketId, TicketStatus},
};

/// How many tickets the dashboard shows under "recently updated".
pub const RECENT_LIMIT: usize = 10;

// ─── List ────────────────────────────────────────────────────────────────────

/// The `status` filter on the ticket list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
  #[default]
  All,
  Status(TicketStatus),
}

impl ListFilter {
  /// Parse the raw query value; unset, empty, and `"all"` mean no filter.
  pub fn parse(raw: Option<&str>) -> Result<Self> {
    match raw {
      None | Some("") | Some("all") => Ok(Self::All),
      Some(s) => TicketStatus::parse(s).map(Self::Status),
    }
  }

  pub fn status(self) -> Option<TicketStatus> {
    match self {
      Self::All => None,
      Self::Status(s) => Some(s),
    }
  }
}

/// Tickets matching `filter`, newest first.
pub async fn list<S: TicketStore>(
  store: &S,
  filter: ListFilter,
) -> Result<Vec<Ticket>, S::Error> {
  store.list_tickets(filter.status()).await
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Ticket counts per status. `open + in_progress + resolved == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
  pub open:        usize,
  pub in_progress: usize,
  pub resolved:    usize,
  pub total:       usize,
}

impl TicketStats {
  pub fn count(&self, status: TicketStatus) -> usize {
    match status {
      TicketStatus::Open => self.open,
      TicketStatus::InProgress => self.in_progress,
      TicketStatus::Resolved => self.resolved,
    }
  }
}

impl FromIterator<TicketStatus> for TicketStats {
  fn from_iter<I: IntoIterator<Item = TicketStatus>>(iter: I) -> Self {
    let mut stats = Self::default();
    for status in iter {
      match status {
        TicketStatus::Open => stats.open += 1,
        TicketStatus::InProgress => stats.in_progress += 1,
        TicketStatus::Resolved => stats.resolved += 1,
      }
      stats.total += 1;
    }
    stats
  }
}

/// The staff dashboard: aggregate counts plus the most recently updated
/// tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
  pub stats:  TicketStats,
  /// At most [`RECENT_LIMIT`] tickets, latest `updated_at` first.
  pub recent: Vec<Ticket>,
}

pub async fn dashboard<S: TicketStore>(
  store: &S,
) -> Result<Dashboard, S::Error> {
  let stats = store.ticket_statuses().await?.into_iter().collect();
  let recent = store.recent_tickets(RECENT_LIMIT).await?;
  Ok(Dashboard { stats, recent })
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// A ticket together with its full comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDetail {
  pub ticket:   Ticket,
  /// Oldest first.
  pub comments: Vec<Comment>,
}

/// Returns `None` if the ticket does not exist.
pub async fn detail<S: TicketStore>(
  store: &S,
  id: TicketId,
) -> Result<Option<TicketDetail>, S::Error> {
  let Some(ticket) = store.get_ticket(id).await? else {
    return Ok(None);
  };
  let comments = store.list_comments(id).await?;
  Ok(Some(TicketDetail { ticket, comments }))
}
