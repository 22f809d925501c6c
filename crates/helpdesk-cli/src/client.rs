//! Async HTTP client wrapping the helpdesk JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use helpdesk_core::{
  comment::{Comment, NewComment},
  ticket::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus},
  view::Dashboard,
};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};

/// Connection settings for the helpdesk API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

// ── Response envelopes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TicketEnvelope {
  ticket: Ticket,
}

#[derive(Deserialize)]
struct TicketsEnvelope {
  tickets: Vec<Ticket>,
}

#[derive(Deserialize)]
struct CommentEnvelope {
  comment: Comment,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: String,
}

/// A ticket page as returned by `GET /api/tickets/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketPage {
  pub ticket:         Ticket,
  pub comments:       Vec<Comment>,
  #[serde(default)]
  pub just_submitted: bool,
}

/// Async HTTP client for the helpdesk JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Decode a success body, or turn the `{"error": ...}` envelope into an
  /// error carrying the server's message.
  async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
      return resp
        .json()
        .await
        .with_context(|| format!("deserialising {what}"));
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
      .map(|e| e.error)
      .unwrap_or(body);
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Tickets ───────────────────────────────────────────────────────────────

  /// `GET /api/tickets[?status=<status>]`
  pub async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>> {
    let mut req = self.client.get(self.url("/tickets"));
    if let Some(status) = status {
      req = req.query(&[("status", status.as_str())]);
    }
    let resp = req.send().await.context("GET /tickets failed")?;
    let env: TicketsEnvelope = Self::decode(resp, "tickets").await?;
    Ok(env.tickets)
  }

  /// `GET /api/tickets/{id}[?success=true]`
  pub async fn ticket_page(&self, id: TicketId, just_submitted: bool) -> Result<TicketPage> {
    let mut req = self.client.get(self.url(&format!("/tickets/{id}")));
    if just_submitted {
      req = req.query(&[("success", "true")]);
    }
    let resp = req
      .send()
      .await
      .with_context(|| format!("GET /tickets/{id} failed"))?;
    Self::decode(resp, "ticket").await
  }

  /// `POST /api/tickets`
  pub async fn create_ticket(&self, input: &NewTicket) -> Result<Ticket> {
    let resp = self
      .client
      .post(self.url("/tickets"))
      .json(input)
      .send()
      .await
      .context("POST /tickets failed")?;
    let env: TicketEnvelope = Self::decode(resp, "created ticket").await?;
    Ok(env.ticket)
  }

  /// `PATCH /api/tickets?id=<id>`
  pub async fn patch_ticket(&self, id: TicketId, patch: &TicketPatch) -> Result<Ticket> {
    let resp = self
      .client
      .patch(self.url("/tickets"))
      .query(&[("id", id)])
      .json(patch)
      .send()
      .await
      .context("PATCH /tickets failed")?;
    let env: TicketEnvelope = Self::decode(resp, "updated ticket").await?;
    Ok(env.ticket)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  /// `POST /api/comments`
  pub async fn create_comment(&self, input: &NewComment) -> Result<Comment> {
    let resp = self
      .client
      .post(self.url("/comments"))
      .json(input)
      .send()
      .await
      .context("POST /comments failed")?;
    let env: CommentEnvelope = Self::decode(resp, "created comment").await?;
    Ok(env.comment)
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/dashboard`
  pub async fn dashboard(&self) -> Result<Dashboard> {
    let resp = self
      .client
      .get(self.url("/dashboard"))
      .send()
      .await
      .context("GET /dashboard failed")?;
    Self::decode(resp, "dashboard").await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use mockito::Matcher;
  use serde_json::json;

  fn ticket_json(id: i64, status: &str) -> serde_json::Value {
    json!({
      "id": id,
      "title": "Cannot login",
      "description": "...",
      "status": status,
      "priority": "high",
      "customer_name": "Ann",
      "customer_email": "ann@x.com",
      "assigned_to": null,
      "created_at": "2026-03-01T10:00:00.000000Z",
      "updated_at": "2026-03-01T10:05:00.000000Z"
    })
  }

  fn client(server: &mockito::Server) -> ApiClient {
    ApiClient::new(ApiConfig { base_url: format!("{}/", server.url()) }).unwrap()
  }

  #[tokio::test]
  async fn list_sends_status_filter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/api/tickets")
      .match_query(Matcher::UrlEncoded("status".into(), "in_progress".into()))
      .with_body(json!({ "tickets": [ticket_json(3, "in_progress")] }).to_string())
      .create_async()
      .await;

    let tickets = client(&server)
      .list_tickets(Some(TicketStatus::InProgress))
      .await
      .unwrap();
    mock.assert_async().await;
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].status, TicketStatus::InProgress);
  }

  #[tokio::test]
  async fn patch_puts_id_in_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("PATCH", "/api/tickets")
      .match_query(Matcher::UrlEncoded("id".into(), "7".into()))
      .match_body(Matcher::Json(json!({ "status": "resolved" })))
      .with_body(json!({ "ticket": ticket_json(7, "resolved") }).to_string())
      .create_async()
      .await;

    let ticket = client(&server)
      .patch_ticket(7, &TicketPatch::status(TicketStatus::Resolved))
      .await
      .unwrap();
    mock.assert_async().await;
    assert_eq!(ticket.id, 7);
  }

  #[tokio::test]
  async fn page_passes_success_flag() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/tickets/9")
      .match_query(Matcher::UrlEncoded("success".into(), "true".into()))
      .with_body(
        json!({
          "ticket": ticket_json(9, "open"),
          "comments": [],
          "just_submitted": true
        })
        .to_string(),
      )
      .create_async()
      .await;

    let page = client(&server).ticket_page(9, true).await.unwrap();
    assert!(page.just_submitted);
    assert!(page.comments.is_empty());
  }

  #[tokio::test]
  async fn error_envelope_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/api/comments")
      .with_status(500)
      .with_body(json!({ "error": "ticket not found: 41" }).to_string())
      .create_async()
      .await;

    let err = client(&server)
      .create_comment(&NewComment {
        ticket_id:    41,
        author_name:  "Sam".into(),
        author_email: "sam@helpdesk.test".into(),
        comment:      "hi".into(),
        is_staff:     true,
      })
      .await
      .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "{message}");
    assert!(message.contains("ticket not found: 41"), "{message}");
  }

  #[tokio::test]
  async fn non_json_error_body_is_kept() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/dashboard")
      .with_status(502)
      .with_body("bad gateway")
      .create_async()
      .await;

    let err = client(&server).dashboard().await.unwrap_err();
    assert!(err.to_string().contains("bad gateway"));
  }
}
