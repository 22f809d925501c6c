//! Error type for `helpdesk-store-sqlite`.

use helpdesk_core::ticket::TicketId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] helpdesk_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An update or touch matched no row.
  #[error("ticket not found: {0}")]
  TicketNotFound(TicketId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
