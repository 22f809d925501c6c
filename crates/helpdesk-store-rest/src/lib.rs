//! PostgREST backend for the helpdesk store.
//!
//! Talks to a hosted Postgres through its REST interface (`/rest/v1/<table>`),
//! authenticating every request with the project's access key. This is the
//! thinnest possible facade: one HTTP request per store call, no retries, no
//! caching.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{RestConfig, RestStore};

#[cfg(test)]
mod tests;
