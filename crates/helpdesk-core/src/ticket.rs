//! Tickets — customer-submitted support requests.
//!
//! A ticket is created by a customer and mutated by staff (status changes,
//! assignment). Adding a comment touches its `updated_at` but nothing else.
//! Tickets are never deleted.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Store-assigned numeric identity of a ticket.
pub type TicketId = i64;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a ticket is in its lifecycle.
///
/// Transitions are unrestricted: any status may be patched to any other, and
/// `Resolved` is not terminal. New tickets always start as `Open`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicketStatus {
  #[default]
  Open,
  InProgress,
  Resolved,
}

impl TicketStatus {
  pub const ALL: [TicketStatus; 3] =
    [Self::Open, Self::InProgress, Self::Resolved];

  /// The string stored in the `status` column and used on the wire.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a wire/column value, rejecting anything outside the three states.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  /// The one-click transitions offered to staff for a ticket in this status.
  pub fn quick_actions(self) -> Vec<QuickAction> {
    let mut actions = Vec::with_capacity(2);
    if self != Self::InProgress {
      actions.push(QuickAction::StartWorking);
    }
    if self != Self::Resolved {
      actions.push(QuickAction::MarkResolved);
    }
    if self == Self::Resolved {
      actions.push(QuickAction::Reopen);
    }
    actions
  }
}

/// A shortcut status change. The API itself accepts any transition; these
/// are just the ones worth a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
  StartWorking,
  MarkResolved,
  Reopen,
}

impl QuickAction {
  pub fn target(self) -> TicketStatus {
    match self {
      Self::StartWorking => TicketStatus::InProgress,
      Self::MarkResolved => TicketStatus::Resolved,
      Self::Reopen => TicketStatus::Open,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::StartWorking => "Start Working",
      Self::MarkResolved => "Mark as Resolved",
      Self::Reopen => "Reopen Ticket",
    }
  }
}

// ─── Priority ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketPriority {
  Low,
  #[default]
  Medium,
  High,
}

impl TicketPriority {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownPriority(s.to_owned()))
  }
}

// ─── Ticket ──────────────────────────────────────────────────────────────────

/// A ticket row as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
  pub id:             TicketId,
  pub title:          String,
  pub description:    String,
  pub status:         TicketStatus,
  pub priority:       TicketPriority,
  pub customer_name:  String,
  pub customer_email: String,
  /// `None` means unassigned.
  pub assigned_to:    Option<String>,
  /// Store-assigned; never changes after creation.
  pub created_at:     DateTime<Utc>,
  /// Refreshed on every patch and every new comment.
  pub updated_at:     DateTime<Utc>,
}

// ─── NewTicket ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::TicketStore::create_ticket`].
///
/// There is no `status` field: every ticket is created `Open`. Identity and
/// timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
  pub title:          String,
  pub description:    String,
  pub priority:       TicketPriority,
  pub customer_name:  String,
  pub customer_email: String,
}

// ─── TicketPatch ─────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the column untouched.
///
/// `assigned_to` is doubly optional: `Some(None)` clears the assignment
/// (`"assigned_to": null` on the wire), `None` leaves it as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status:         Option<TicketStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority:       Option<TicketPriority>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer_name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer_email: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "present"
  )]
  pub assigned_to:    Option<Option<String>>,
}

impl TicketPatch {
  /// A patch that only changes the status.
  pub fn status(status: TicketStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  /// A patch assigning the ticket to `staff`. A blank name is not an
  /// assignment, so there is nothing to send.
  pub fn assign(staff: &str) -> Option<Self> {
    if staff.trim().is_empty() {
      return None;
    }
    Some(Self {
      assigned_to: Some(Some(staff.to_owned())),
      ..Self::default()
    })
  }
}

/// Distinguishes an explicit `null` from an absent key.
fn present<'de, D>(de: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(de).map(Some)
}
