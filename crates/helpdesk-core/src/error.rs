//! Error types for `helpdesk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown ticket status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown ticket priority: {0:?}")]
  UnknownPriority(String),

  #[error("missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  #[error("a submission is already in flight")]
  AlreadySubmitting,

  #[error("no submission is in flight")]
  NotSubmitting,

  #[error("submission failed: {0}")]
  SubmitFailed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
