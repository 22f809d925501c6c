//! Core types and trait definitions for the helpdesk.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; storage backends implement
//! [`store::TicketStore`] and the API layer is generic over it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod comment;
pub mod error;
pub mod form;
pub mod store;
pub mod ticket;
pub mod view;

pub use error::{Error, Result};
