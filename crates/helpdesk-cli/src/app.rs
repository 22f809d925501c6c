//! Command dispatcher: drives the core form state machines against the API
//! and renders what the user should see next.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use helpdesk_core::{
  Error as CoreError,
  form::{CommentDraft, CommentForm, TicketDraft, TicketForm},
  ticket::{TicketId, TicketPatch, TicketStatus},
  view::ListFilter,
};

use crate::{client::ApiClient, render};

// ─── Prompting ────────────────────────────────────────────────────────────────

/// Ask for `label` if `value` is blank. End of input leaves it blank, which
/// the form then reports as missing.
fn fill(
  value: &mut String,
  label: &str,
  input: &mut impl BufRead,
  output: &mut impl Write,
) -> Result<()> {
  if !value.trim().is_empty() {
    return Ok(());
  }
  write!(output, "{label}: ")?;
  output.flush()?;
  let mut line = String::new();
  input.read_line(&mut line).context("reading input")?;
  *value = line.trim_end_matches(['\r', '\n']).to_string();
  Ok(())
}

fn missing(err: CoreError) -> anyhow::Error {
  match err {
    CoreError::MissingFields(fields) => {
      anyhow::anyhow!("Please fill in: {}", fields.join(", "))
    }
    other => other.into(),
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  client: ApiClient,
}

impl App {
  pub fn new(client: ApiClient) -> Self { Self { client } }

  // ── Read views ────────────────────────────────────────────────────────────

  pub async fn list(&self, status: Option<&str>) -> Result<String> {
    let filter = ListFilter::parse(status)?;
    let tickets = self
      .client
      .list_tickets(filter.status())
      .await
      .context("Failed to load tickets. Please try again.")?;
    Ok(render::ticket_table(&tickets))
  }

  pub async fn show(&self, id: TicketId, just_submitted: bool) -> Result<String> {
    let page = self
      .client
      .ticket_page(id, just_submitted)
      .await
      .with_context(|| format!("Ticket #{id} could not be loaded."))?;
    Ok(render::ticket_page(&page))
  }

  pub async fn dashboard(&self) -> Result<String> {
    let dashboard = self
      .client
      .dashboard()
      .await
      .context("Failed to load the dashboard. Please try again.")?;
    Ok(render::dashboard(&dashboard))
  }

  // ── Forms ─────────────────────────────────────────────────────────────────

  /// Submit a new ticket, prompting for any blank required field, then show
  /// the created ticket flagged as just submitted.
  pub async fn submit(
    &self,
    draft: TicketDraft,
    input: &mut impl BufRead,
    output: &mut impl Write,
  ) -> Result<String> {
    let mut draft = draft;
    fill(&mut draft.title, "Title", input, output)?;
    fill(&mut draft.description, "Description", input, output)?;
    fill(&mut draft.customer_name, "Your name", input, output)?;
    fill(&mut draft.customer_email, "Your email", input, output)?;
    let mut form = TicketForm::new(draft);

    let payload = form.begin_submit().map_err(missing)?;
    let outcome = self.client.create_ticket(&payload).await;
    let ticket = form
      .complete(outcome)
      .context("Failed to submit ticket. Please try again.")?;
    tracing::debug!(ticket_id = ticket.id, "ticket submitted");

    self.show(ticket.id, true).await
  }

  /// Add a comment, then re-fetch the ticket so the thread is current.
  pub async fn comment(
    &self,
    draft: CommentDraft,
    input: &mut impl BufRead,
    output: &mut impl Write,
  ) -> Result<String> {
    let ticket_id = draft.ticket_id;
    let mut draft = draft;
    fill(&mut draft.author_name, "Your name", input, output)?;
    fill(&mut draft.author_email, "Your email", input, output)?;
    fill(&mut draft.comment, "Comment", input, output)?;
    let mut form = CommentForm::new(draft);

    let payload = form.begin_submit().map_err(missing)?;
    let outcome = self.client.create_comment(&payload).await;
    form
      .complete(outcome)
      .context("Failed to add comment. Please try again.")?;

    self.show(ticket_id, false).await
  }

  // ── Staff actions ─────────────────────────────────────────────────────────

  pub async fn set_status(&self, id: TicketId, status: TicketStatus) -> Result<String> {
    self
      .client
      .patch_ticket(id, &TicketPatch::status(status))
      .await
      .context("Failed to update status. Please try again.")?;
    self.show(id, false).await
  }

  /// A blank name is ignored without contacting the server.
  pub async fn assign(&self, id: TicketId, staff: &str) -> Result<String> {
    let Some(patch) = TicketPatch::assign(staff) else {
      return Ok(format!("No staff name given; ticket #{id} left unchanged.\n"));
    };
    self
      .client
      .patch_ticket(id, &patch)
      .await
      .context("Failed to assign ticket. Please try again.")?;
    self.show(id, false).await
  }
}
