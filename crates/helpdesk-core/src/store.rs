//! The `TicketStore` trait — the data access facade.
//!
//! The trait is implemented by storage backends (`helpdesk-store-sqlite`,
//! `helpdesk-store-rest`). Higher layers (`helpdesk-api`, the read views in
//! [`crate::view`]) depend on this abstraction, not on any concrete backend.
//!
//! Every method is a single statement against the store. Nothing here
//! retries, caches, or groups statements into a transaction.

use std::future::Future;

use crate::{
  comment::{Comment, NewComment},
  ticket::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus},
};

/// Abstraction over a helpdesk store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TicketStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tickets — writes ──────────────────────────────────────────────────

  /// Insert a ticket with status `Open` and return the stored row, including
  /// its assigned ID and timestamps.
  fn create_ticket(
    &self,
    input: NewTicket,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  /// Apply `patch` to the ticket `id`, stamping a fresh `updated_at`, and
  /// return the updated row. An empty patch still stamps `updated_at`.
  ///
  /// Returns an error if no row matches.
  fn update_ticket(
    &self,
    id: TicketId,
    patch: TicketPatch,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  /// Refresh only the `updated_at` of ticket `id`. Errors if no such ticket
  /// exists.
  fn touch_ticket(
    &self,
    id: TicketId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Tickets — reads ───────────────────────────────────────────────────

  /// Retrieve a ticket by ID. Returns `None` if not found.
  fn get_ticket(
    &self,
    id: TicketId,
  ) -> impl Future<Output = Result<Option<Ticket>, Self::Error>> + Send + '_;

  /// All tickets, newest `created_at` first, optionally restricted to one
  /// status.
  fn list_tickets(
    &self,
    status: Option<TicketStatus>,
  ) -> impl Future<Output = Result<Vec<Ticket>, Self::Error>> + Send + '_;

  /// The `limit` tickets with the latest `updated_at`, newest first.
  fn recent_tickets(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Ticket>, Self::Error>> + Send + '_;

  /// The status of every ticket, in no particular order.
  fn ticket_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<TicketStatus>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Insert a comment and return the stored row. Does not touch the parent
  /// ticket; that is the caller's second step.
  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// All comments on `ticket_id`, oldest first, ties broken by ID.
  fn list_comments(
    &self,
    ticket_id: TicketId,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;
}
