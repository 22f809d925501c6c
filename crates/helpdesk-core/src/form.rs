//! Form state machines for the submit-ticket and add-comment forms.
//!
//! A [`Form`] owns a draft and tracks where the submission stands:
//!
//! ```text
//!            edit               begin_submit            complete(Ok)
//!  Editing ──────▶ Editing ───────────────▶ Submitting ───────────▶ Succeeded
//!     ▲                                         │
//!     │ edit / begin_submit                     │ complete(Err)
//!     └──────────────────────────────────── Failed(message)
//! ```
//!
//! Nothing here performs I/O. The caller takes the payload from
//! [`Form::begin_submit`], makes the request, and feeds the outcome back
//! through [`Form::complete`].

use std::fmt;

use crate::{
  Error, Result,
  comment::NewComment,
  ticket::{NewTicket, TicketId, TicketPriority},
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
  #[default]
  Editing,
  Submitting,
  Succeeded,
  /// The request failed; the message is meant for the user.
  Failed(String),
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The editable contents of a form.
pub trait Draft {
  type Payload;

  /// Names of required fields that are blank.
  fn missing_fields(&self) -> Vec<&'static str>;

  /// Build the request payload. Only called once `missing_fields` is empty.
  fn payload(&self) -> Self::Payload;

  /// Reset whatever should not survive a successful submission.
  fn on_success(&mut self) {}
}

fn blank(s: &str) -> bool { s.trim().is_empty() }

// ─── Form ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Form<D> {
  draft: D,
  state: FormState,
}

impl<D: Draft> Form<D> {
  pub fn new(draft: D) -> Self {
    Self { draft, state: FormState::Editing }
  }

  pub fn state(&self) -> &FormState { &self.state }

  pub fn draft(&self) -> &D { &self.draft }

  /// Change the draft. Not allowed while a submission is in flight; any
  /// finished outcome goes back to `Editing`.
  pub fn edit(&mut self, f: impl FnOnce(&mut D)) -> Result<()> {
    if self.state == FormState::Submitting {
      return Err(Error::AlreadySubmitting);
    }
    f(&mut self.draft);
    self.state = FormState::Editing;
    Ok(())
  }

  /// Validate required fields and move to `Submitting`, yielding the payload
  /// to send. On a validation failure the state is left unchanged.
  pub fn begin_submit(&mut self) -> Result<D::Payload> {
    if self.state == FormState::Submitting {
      return Err(Error::AlreadySubmitting);
    }
    let missing = self.draft.missing_fields();
    if !missing.is_empty() {
      return Err(Error::MissingFields(missing));
    }
    self.state = FormState::Submitting;
    Ok(self.draft.payload())
  }

  /// Record the outcome of the request started by `begin_submit`.
  pub fn complete<T, E: fmt::Display>(
    &mut self,
    outcome: std::result::Result<T, E>,
  ) -> Result<T> {
    if self.state != FormState::Submitting {
      return Err(Error::NotSubmitting);
    }
    match outcome {
      Ok(value) => {
        self.draft.on_success();
        self.state = FormState::Succeeded;
        Ok(value)
      }
      Err(e) => {
        let message = e.to_string();
        self.state = FormState::Failed(message.clone());
        Err(Error::SubmitFailed(message))
      }
    }
  }
}

// ─── Submit ticket ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketDraft {
  pub title:          String,
  pub description:    String,
  pub priority:       TicketPriority,
  pub customer_name:  String,
  pub customer_email: String,
}

impl Draft for TicketDraft {
  type Payload = NewTicket;

  fn missing_fields(&self) -> Vec<&'static str> {
    [
      ("title", &self.title),
      ("description", &self.description),
      ("customer_name", &self.customer_name),
      ("customer_email", &self.customer_email),
    ]
    .into_iter()
    .filter(|(_, v)| blank(v))
    .map(|(k, _)| k)
    .collect()
  }

  fn payload(&self) -> NewTicket {
    NewTicket {
      title:          self.title.clone(),
      description:    self.description.clone(),
      priority:       self.priority,
      customer_name:  self.customer_name.clone(),
      customer_email: self.customer_email.clone(),
    }
  }
}

pub type TicketForm = Form<TicketDraft>;

// ─── Add comment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
  pub ticket_id:    TicketId,
  pub author_name:  String,
  pub author_email: String,
  pub comment:      String,
  pub is_staff:     bool,
}

impl CommentDraft {
  pub fn new(ticket_id: TicketId) -> Self {
    Self {
      ticket_id,
      author_name: String::new(),
      author_email: String::new(),
      comment: String::new(),
      is_staff: false,
    }
  }
}

impl Draft for CommentDraft {
  type Payload = NewComment;

  fn missing_fields(&self) -> Vec<&'static str> {
    [
      ("author_name", &self.author_name),
      ("author_email", &self.author_email),
      ("comment", &self.comment),
    ]
    .into_iter()
    .filter(|(_, v)| blank(v))
    .map(|(k, _)| k)
    .collect()
  }

  fn payload(&self) -> NewComment {
    NewComment {
      ticket_id:    self.ticket_id,
      author_name:  self.author_name.clone(),
      author_email: self.author_email.clone(),
      comment:      self.comment.clone(),
      is_staff:     self.is_staff,
    }
  }

  // The staff checkbox is sticky across comments.
  fn on_success(&mut self) {
    self.author_name.clear();
    self.author_email.clear();
    self.comment.clear();
  }
}

pub type CommentForm = Form<CommentDraft>;

#[cfg(test)]
mod tests {
  use super::*;

  fn filled_ticket() -> TicketForm {
    Form::new(TicketDraft {
      title:          "Cannot login".into(),
      description:    "Password reset loops".into(),
      priority:       TicketPriority::High,
      customer_name:  "Ann".into(),
      customer_email: "ann@x.com".into(),
    })
  }

  #[test]
  fn new_form_is_editing() {
    let form = TicketForm::new(TicketDraft::default());
    assert_eq!(form.state(), &FormState::Editing);
    assert_eq!(form.draft().priority, TicketPriority::Medium);
  }

  #[test]
  fn missing_fields_block_submission() {
    let mut form = TicketForm::new(TicketDraft {
      title: "  ".into(),
      description: "something".into(),
      ..Default::default()
    });
    let err = form.begin_submit().unwrap_err();
    match err {
      Error::MissingFields(fields) => {
        assert_eq!(fields, vec!["title", "customer_name", "customer_email"])
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(form.state(), &FormState::Editing);
  }

  #[test]
  fn successful_submission() {
    let mut form = filled_ticket();
    let payload = form.begin_submit().unwrap();
    assert_eq!(payload.priority, TicketPriority::High);
    assert_eq!(form.state(), &FormState::Submitting);

    let id = form.complete(Ok::<_, String>(42)).unwrap();
    assert_eq!(id, 42);
    assert_eq!(form.state(), &FormState::Succeeded);
  }

  #[test]
  fn double_submit_is_rejected() {
    let mut form = filled_ticket();
    form.begin_submit().unwrap();
    assert!(matches!(form.begin_submit(), Err(Error::AlreadySubmitting)));
    assert!(matches!(
      form.edit(|d| d.title.push('!')),
      Err(Error::AlreadySubmitting)
    ));
  }

  #[test]
  fn failure_then_retry() {
    let mut form = filled_ticket();
    form.begin_submit().unwrap();
    let err = form.complete::<(), _>(Err("store unavailable")).unwrap_err();
    assert!(matches!(err, Error::SubmitFailed(ref m) if m == "store unavailable"));
    assert_eq!(
      form.state(),
      &FormState::Failed("store unavailable".into())
    );

    // The draft survives a failure, so the user can simply try again.
    assert_eq!(form.draft().title, "Cannot login");
    form.begin_submit().unwrap();
    assert_eq!(form.state(), &FormState::Submitting);
  }

  #[test]
  fn complete_without_submit_is_rejected() {
    let mut form = filled_ticket();
    assert!(matches!(
      form.complete(Ok::<_, String>(())),
      Err(Error::NotSubmitting)
    ));
  }

  #[test]
  fn comment_form_clears_text_but_keeps_staff_flag() {
    let mut form = CommentForm::new(CommentDraft::new(7));
    form
      .edit(|d| {
        d.author_name = "Sam".into();
        d.author_email = "sam@helpdesk.test".into();
        d.comment = "Looking into it".into();
        d.is_staff = true;
      })
      .unwrap();

    let payload = form.begin_submit().unwrap();
    assert_eq!(payload.ticket_id, 7);
    assert!(payload.is_staff);

    form.complete(Ok::<_, String>(())).unwrap();
    let draft = form.draft();
    assert!(draft.comment.is_empty());
    assert!(draft.author_name.is_empty());
    assert!(draft.is_staff);
    assert_eq!(draft.ticket_id, 7);
  }

  #[test]
  fn editing_after_success_returns_to_editing() {
    let mut form = CommentForm::new(CommentDraft::new(1));
    form
      .edit(|d| {
        d.author_name = "A".into();
        d.author_email = "a@x.com".into();
        d.comment = "hi".into();
      })
      .unwrap();
    form.begin_submit().unwrap();
    form.complete(Ok::<_, String>(())).unwrap();

    form.edit(|d| d.comment = "again".into()).unwrap();
    assert_eq!(form.state(), &FormState::Editing);
  }
}
