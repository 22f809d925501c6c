//! [`RestStore`] — the PostgREST implementation of [`TicketStore`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use helpdesk_core::{
  comment::{Comment, NewComment},
  store::TicketStore,
  ticket::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus},
};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::{
  Deserialize, Serialize,
  de::{DeserializeOwned, IgnoredAny},
};

use crate::{Error, Result};

const TICKETS: &str = "tickets";
const COMMENTS: &str = "ticket_comments";

/// Ask for a single JSON object instead of an array; the store rejects the
/// request unless exactly one row matches.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the hosted store.
#[derive(Debug, Clone)]
pub struct RestConfig {
  /// Project URL, e.g. `http://127.0.0.1:54321`. `/rest/v1` is appended.
  pub base_url: String,
  /// Access key sent as both `apikey` and bearer token.
  pub api_key:  String,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A helpdesk store backed by a hosted PostgREST endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestStore {
  client: Client,
  config: RestConfig,
}

impl RestStore {
  pub fn new(config: RestConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, table: &str) -> String {
    format!(
      "{}/rest/v1/{}",
      self.config.base_url.trim_end_matches('/'),
      table
    )
  }

  fn request(&self, method: Method, table: &str) -> RequestBuilder {
    tracing::debug!(%method, table, "store request");
    self
      .client
      .request(method, self.url(table))
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }

  /// A write that returns the affected row as a single object.
  fn write_one(&self, method: Method, table: &str) -> RequestBuilder {
    self
      .request(method, table)
      .header("Prefer", "return=representation")
      .header(header::ACCEPT, SINGLE_OBJECT)
  }
}

/// Map a non-2xx response to [`Error::Api`], keeping the store's message.
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  #[derive(Deserialize)]
  struct ErrorBody {
    message: String,
  }

  let body = resp.text().await.unwrap_or_default();
  let message = match serde_json::from_str::<ErrorBody>(&body) {
    Ok(parsed) => parsed.message,
    Err(_) if body.is_empty() => status.to_string(),
    Err(_) => body,
  };
  Err(Error::Api { status: status.as_u16(), message })
}

async fn json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
  let resp = check(req.send().await?).await?;
  Ok(resp.json().await?)
}

fn eq(value: impl std::fmt::Display) -> String { format!("eq.{value}") }

// ─── Request bodies ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct InsertTicket<'a> {
  #[serde(flatten)]
  input:  &'a NewTicket,
  status: TicketStatus,
}

#[derive(Serialize)]
struct Stamped<'a, T> {
  #[serde(flatten)]
  fields:     &'a T,
  updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct Touch {
  updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StatusRow {
  status: TicketStatus,
}

// ─── TicketStore impl ────────────────────────────────────────────────────────

impl TicketStore for RestStore {
  type Error = Error;

  // ── Tickets — writes ──────────────────────────────────────────────────────

  async fn create_ticket(&self, input: NewTicket) -> Result<Ticket> {
    let body = InsertTicket { input: &input, status: TicketStatus::Open };
    json(self.write_one(Method::POST, TICKETS).json(&body)).await
  }

  async fn update_ticket(
    &self,
    id: TicketId,
    patch: TicketPatch,
  ) -> Result<Ticket> {
    let body = Stamped { fields: &patch, updated_at: Utc::now() };
    json(
      self
        .write_one(Method::PATCH, TICKETS)
        .query(&[("id", eq(id))])
        .json(&body),
    )
    .await
  }

  async fn touch_ticket(&self, id: TicketId) -> Result<()> {
    let touched: Vec<IgnoredAny> = json(
      self
        .request(Method::PATCH, TICKETS)
        .header("Prefer", "return=representation")
        .query(&[("id", eq(id)), ("select", "id".to_owned())])
        .json(&Touch { updated_at: Utc::now() }),
    )
    .await?;

    if touched.is_empty() {
      return Err(Error::TicketNotFound(id));
    }
    Ok(())
  }

  // ── Tickets — reads ───────────────────────────────────────────────────────

  async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>> {
    let rows: Vec<Ticket> = json(
      self
        .request(Method::GET, TICKETS)
        .query(&[("select", "*".to_owned()), ("id", eq(id))]),
    )
    .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_tickets(
    &self,
    status: Option<TicketStatus>,
  ) -> Result<Vec<Ticket>> {
    let mut query = vec![
      ("select", "*".to_owned()),
      ("order", "created_at.desc,id.desc".to_owned()),
    ];
    if let Some(status) = status {
      query.push(("status", eq(status)));
    }
    json(self.request(Method::GET, TICKETS).query(&query)).await
  }

  async fn recent_tickets(&self, limit: usize) -> Result<Vec<Ticket>> {
    json(self.request(Method::GET, TICKETS).query(&[
      ("select", "*".to_owned()),
      ("order", "updated_at.desc,id.desc".to_owned()),
      ("limit", limit.to_string()),
    ]))
    .await
  }

  async fn ticket_statuses(&self) -> Result<Vec<TicketStatus>> {
    let rows: Vec<StatusRow> = json(
      self
        .request(Method::GET, TICKETS)
        .query(&[("select", "status")]),
    )
    .await?;
    Ok(rows.into_iter().map(|r| r.status).collect())
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    json(self.write_one(Method::POST, COMMENTS).json(&input)).await
  }

  async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
    json(self.request(Method::GET, COMMENTS).query(&[
      ("select", "*".to_owned()),
      ("ticket_id", eq(ticket_id)),
      ("order", "created_at.asc,id.asc".to_owned()),
    ]))
    .await
  }
}
