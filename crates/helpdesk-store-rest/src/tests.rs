//! Request-shape tests for `RestStore` against a mock PostgREST server.

use helpdesk_core::{
  comment::NewComment,
  store::TicketStore,
  ticket::{NewTicket, TicketPatch, TicketPriority, TicketStatus},
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use crate::{Error, RestConfig, RestStore};

const KEY: &str = "test-anon-key";

fn store(server: &ServerGuard) -> RestStore {
  RestStore::new(RestConfig {
    base_url: format!("{}/", server.url()),
    api_key:  KEY.into(),
  })
  .unwrap()
}

fn ticket_row(id: i64, status: &str) -> serde_json::Value {
  json!({
    "id": id,
    "title": "Cannot login",
    "description": "...",
    "status": status,
    "priority": "high",
    "customer_name": "Ann",
    "customer_email": "ann@x.com",
    "assigned_to": null,
    "created_at": "2024-03-01T12:00:00.000000+00:00",
    "updated_at": "2024-03-01T12:05:00.000000+00:00"
  })
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_ticket_forces_open_and_authenticates() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/rest/v1/tickets")
    .match_header("apikey", KEY)
    .match_header("authorization", format!("Bearer {KEY}").as_str())
    .match_header("prefer", "return=representation")
    .match_header("accept", "application/vnd.pgrst.object+json")
    .match_body(Matcher::PartialJson(json!({
      "title": "Cannot login",
      "priority": "high",
      "status": "open"
    })))
    .with_status(201)
    .with_header("content-type", "application/json")
    .with_body(ticket_row(1, "open").to_string())
    .create_async()
    .await;

  let ticket = store(&server)
    .create_ticket(NewTicket {
      title:          "Cannot login".into(),
      description:    "...".into(),
      priority:       TicketPriority::High,
      customer_name:  "Ann".into(),
      customer_email: "ann@x.com".into(),
    })
    .await
    .unwrap();

  mock.assert_async().await;
  assert_eq!(ticket.id, 1);
  assert_eq!(ticket.status, TicketStatus::Open);
  assert_eq!(ticket.priority, TicketPriority::High);
}

#[tokio::test]
async fn update_ticket_sends_patch_with_timestamp() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("PATCH", "/rest/v1/tickets")
    .match_query(Matcher::UrlEncoded("id".into(), "eq.5".into()))
    .match_body(Matcher::AllOf(vec![
      Matcher::PartialJson(json!({ "status": "in_progress" })),
      Matcher::Regex(r#""updated_at":""#.into()),
    ]))
    .with_status(200)
    .with_body(ticket_row(5, "in_progress").to_string())
    .create_async()
    .await;

  let ticket = store(&server)
    .update_ticket(5, TicketPatch::status(TicketStatus::InProgress))
    .await
    .unwrap();

  mock.assert_async().await;
  assert_eq!(ticket.status, TicketStatus::InProgress);
}

#[tokio::test]
async fn update_error_keeps_store_message() {
  let mut server = Server::new_async().await;
  server
    .mock("PATCH", "/rest/v1/tickets")
    .match_query(Matcher::Any)
    .with_status(406)
    .with_body(
      json!({
        "code": "PGRST116",
        "message": "JSON object requested, multiple (or no) rows returned"
      })
      .to_string(),
    )
    .create_async()
    .await;

  let err = store(&server)
    .update_ticket(99, TicketPatch::default())
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Api { status: 406, .. }));
  assert_eq!(
    err.to_string(),
    "JSON object requested, multiple (or no) rows returned"
  );
}

#[tokio::test]
async fn touch_sends_only_updated_at() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("PATCH", "/rest/v1/tickets")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("id".into(), "eq.3".into()),
      Matcher::UrlEncoded("select".into(), "id".into()),
    ]))
    .match_header("prefer", "return=representation")
    .match_body(Matcher::Regex(r#"^\{"updated_at":"[^"]+"\}$"#.into()))
    .with_body(json!([{ "id": 3 }]).to_string())
    .create_async()
    .await;

  store(&server).touch_ticket(3).await.unwrap();
  mock.assert_async().await;
}

#[tokio::test]
async fn touch_missing_ticket_errors() {
  let mut server = Server::new_async().await;
  server
    .mock("PATCH", "/rest/v1/tickets")
    .match_query(Matcher::UrlEncoded("id".into(), "eq.7".into()))
    .with_body("[]")
    .create_async()
    .await;

  let err = store(&server).touch_ticket(7).await.unwrap_err();
  assert!(matches!(err, Error::TicketNotFound(7)), "{err}");
}

#[tokio::test]
async fn create_comment_posts_row() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/rest/v1/ticket_comments")
    .match_body(Matcher::Json(json!({
      "ticket_id": 1,
      "author_name": "Sam",
      "author_email": "sam@helpdesk.test",
      "comment": "Looking into it",
      "is_staff": true
    })))
    .with_status(201)
    .with_body(
      json!({
        "id": 10,
        "ticket_id": 1,
        "author_name": "Sam",
        "author_email": "sam@helpdesk.test",
        "comment": "Looking into it",
        "is_staff": true,
        "created_at": "2024-03-01T12:06:00+00:00"
      })
      .to_string(),
    )
    .create_async()
    .await;

  let comment = store(&server)
    .create_comment(NewComment {
      ticket_id:    1,
      author_name:  "Sam".into(),
      author_email: "sam@helpdesk.test".into(),
      comment:      "Looking into it".into(),
      is_staff:     true,
    })
    .await
    .unwrap();

  mock.assert_async().await;
  assert_eq!(comment.id, 10);
  assert!(comment.is_staff);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_and_orders() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("GET", "/rest/v1/tickets")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("status".into(), "eq.resolved".into()),
      Matcher::UrlEncoded("order".into(), "created_at.desc,id.desc".into()),
    ]))
    .with_status(200)
    .with_body(json!([ticket_row(2, "resolved")]).to_string())
    .create_async()
    .await;

  let tickets = store(&server)
    .list_tickets(Some(TicketStatus::Resolved))
    .await
    .unwrap();

  mock.assert_async().await;
  assert_eq!(tickets.len(), 1);
  assert_eq!(tickets[0].status, TicketStatus::Resolved);
}

#[tokio::test]
async fn recent_tickets_uses_limit() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("GET", "/rest/v1/tickets")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("order".into(), "updated_at.desc,id.desc".into()),
      Matcher::UrlEncoded("limit".into(), "10".into()),
    ]))
    .with_status(200)
    .with_body("[]")
    .create_async()
    .await;

  let tickets = store(&server).recent_tickets(10).await.unwrap();
  mock.assert_async().await;
  assert!(tickets.is_empty());
}

#[tokio::test]
async fn get_missing_ticket_is_none() {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/rest/v1/tickets")
    .match_query(Matcher::UrlEncoded("id".into(), "eq.404".into()))
    .with_status(200)
    .with_body("[]")
    .create_async()
    .await;

  assert!(store(&server).get_ticket(404).await.unwrap().is_none());
}

#[tokio::test]
async fn statuses_are_selected_alone() {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/rest/v1/tickets")
    .match_query(Matcher::UrlEncoded("select".into(), "status".into()))
    .with_status(200)
    .with_body(
      json!([
        { "status": "open" },
        { "status": "in_progress" },
        { "status": "open" }
      ])
      .to_string(),
    )
    .create_async()
    .await;

  let statuses = store(&server).ticket_statuses().await.unwrap();
  assert_eq!(statuses, vec![
    TicketStatus::Open,
    TicketStatus::InProgress,
    TicketStatus::Open,
  ]);
}

#[tokio::test]
async fn comments_are_requested_oldest_first() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("GET", "/rest/v1/ticket_comments")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("ticket_id".into(), "eq.1".into()),
      Matcher::UrlEncoded("order".into(), "created_at.asc,id.asc".into()),
    ]))
    .with_status(200)
    .with_body("[]")
    .create_async()
    .await;

  store(&server).list_comments(1).await.unwrap();
  mock.assert_async().await;
}

#[tokio::test]
async fn non_json_error_body_is_kept() {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/rest/v1/tickets")
    .match_query(Matcher::Any)
    .with_status(502)
    .with_body("upstream unavailable")
    .create_async()
    .await;

  let err = store(&server).list_tickets(None).await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 502, ref message } if message == "upstream unavailable"));
}
