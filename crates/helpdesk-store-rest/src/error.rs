//! Error type for `helpdesk-store-rest`.

use helpdesk_core::ticket::TicketId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// A non-2xx response. `message` is the store's own wording.
  #[error("{message}")]
  Api { status: u16, message: String },

  /// A touch matched no row.
  #[error("ticket not found: {0}")]
  TicketNotFound(TicketId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
