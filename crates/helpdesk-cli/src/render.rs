//! Plain-text rendering of tickets, comment threads, and the dashboard.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use helpdesk_core::{
  ticket::{QuickAction, Ticket, TicketStatus},
  view::Dashboard,
};

use crate::client::TicketPage;

fn when(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}

fn status_label(status: TicketStatus) -> &'static str {
  match status {
    TicketStatus::Open => "Open",
    TicketStatus::InProgress => "In Progress",
    TicketStatus::Resolved => "Resolved",
  }
}

/// One line per ticket, newest first as given.
pub fn ticket_table(tickets: &[Ticket]) -> String {
  if tickets.is_empty() {
    return "No tickets found.\n".to_string();
  }
  let mut out = String::new();
  for t in tickets {
    let _ = writeln!(
      out,
      "#{:<5} {:<12} {:<7} {:<40} {}",
      t.id,
      status_label(t.status),
      t.priority,
      truncate(&t.title, 40),
      t.customer_name,
    );
  }
  out
}

/// Full ticket page: header, description, comment thread, and the status
/// changes on offer.
pub fn ticket_page(page: &TicketPage) -> String {
  let t = &page.ticket;
  let mut out = String::new();

  if page.just_submitted {
    out.push_str("Ticket submitted. We'll get back to you soon.\n\n");
  }

  let _ = writeln!(out, "#{} {}", t.id, t.title);
  let _ = writeln!(
    out,
    "Status: {}   Priority: {}   Assigned: {}",
    status_label(t.status),
    t.priority,
    t.assigned_to.as_deref().unwrap_or("unassigned"),
  );
  let _ = writeln!(out, "From: {} <{}>", t.customer_name, t.customer_email);
  let _ = writeln!(out, "Created: {}   Updated: {}", when(t.created_at), when(t.updated_at));
  let _ = writeln!(out, "\n{}\n", t.description);

  let _ = writeln!(out, "Comments ({})", page.comments.len());
  for c in &page.comments {
    let badge = if c.is_staff { " [staff]" } else { "" };
    let _ = writeln!(out, "- {}{} · {}", c.author_name, badge, when(c.created_at));
    for line in c.comment.lines() {
      let _ = writeln!(out, "    {line}");
    }
  }

  let actions = t.status.quick_actions();
  let hints: Vec<String> = actions
    .iter()
    .map(|a| format!("{} (helpdesk {} {})", a.label(), verb(*a), t.id))
    .collect();
  let _ = writeln!(out, "\nActions: {}", hints.join(" · "));
  out
}

pub fn dashboard(d: &Dashboard) -> String {
  let mut out = String::new();
  for status in TicketStatus::ALL {
    let _ = write!(out, "{}: {}   ", status_label(status), d.stats.count(status));
  }
  let _ = writeln!(out, "Total: {}\n", d.stats.total);
  out.push_str("Recently updated\n");
  out.push_str(&ticket_table(&d.recent));
  out
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_string();
  }
  let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
  cut.push('…');
  cut
}

/// CLI verb for a quick action.
pub fn verb(action: QuickAction) -> &'static str {
  match action {
    QuickAction::StartWorking => "start",
    QuickAction::MarkResolved => "resolve",
    QuickAction::Reopen => "reopen",
  }
}
