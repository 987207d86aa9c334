//! The signed-in user's own profile, viewable and editable.

use std::future::Future;

use lifebridge_core::{
  model::{Person, PersonKind},
  validate::{self, FormMode, Validation},
};

use crate::{
  Result,
  services::PeopleService,
  views::{Notice, Phase, optimistic::Optimistic},
};

pub const SAVED: &str = "Profile updated successfully!";

/// Where a profile is read from and written back to.
pub trait ProfileSource: Send + Sync {
  fn kind(&self) -> PersonKind;

  fn fetch_mine(&self) -> impl Future<Output = Result<Person>> + Send + '_;

  fn update<'a>(
    &'a self,
    email: &'a str,
    person: &'a Person,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

impl ProfileSource for PeopleService {
  fn kind(&self) -> PersonKind { PeopleService::kind(self) }

  fn fetch_mine(&self) -> impl Future<Output = Result<Person>> + Send + '_ {
    PeopleService::fetch_mine(self)
  }

  fn update<'a>(
    &'a self,
    email: &'a str,
    person: &'a Person,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    PeopleService::update(self, email, person)
  }
}

#[derive(Debug)]
pub struct ProfileView {
  kind:      PersonKind,
  /// Subject claim of the session, shown in the header only.
  subject:   Option<String>,
  phase:     Phase,
  record:    Option<Person>,
  draft:     Option<Person>,
  errors:    Validation,
  in_flight: Option<Optimistic<Option<Person>>>,
  notice:    Option<Notice>,
}

impl ProfileView {
  pub fn new(kind: PersonKind, subject: Option<String>) -> Self {
    Self {
      kind,
      subject,
      phase: Phase::Idle,
      record: None,
      draft: None,
      errors: Validation::default(),
      in_flight: None,
      notice: None,
    }
  }

  pub fn kind(&self) -> PersonKind { self.kind }

  pub fn subject(&self) -> Option<&str> { self.subject.as_deref() }

  pub fn phase(&self) -> &Phase { &self.phase }

  /// The record as currently displayed.
  pub fn record(&self) -> Option<&Person> { self.record.as_ref() }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  pub fn errors(&self) -> &Validation { &self.errors }

  pub fn is_busy(&self) -> bool { self.in_flight.is_some() }

  pub fn begin_load(&mut self) { self.phase = Phase::Loading; }

  pub fn finish_load(&mut self, result: Result<Person>) {
    match result {
      Ok(person) => {
        self.record = Some(person);
        self.phase = Phase::Loaded;
      }
      Err(e) => {
        tracing::warn!(kind = %self.kind, error = %e, "profile load failed");
        self.phase = Phase::Error(e.user_message());
      }
    }
  }

  pub async fn load(&mut self, source: &impl ProfileSource) {
    self.begin_load();
    let result = source.fetch_mine().await;
    self.finish_load(result);
  }

  // ── editing ──

  pub fn is_editing(&self) -> bool { self.draft.is_some() }

  pub fn start_edit(&mut self) -> bool {
    if self.in_flight.is_some() {
      return false;
    }
    self.draft = self.record.clone();
    self.errors = Validation::default();
    self.draft.is_some()
  }

  pub fn draft(&self) -> Option<&Person> { self.draft.as_ref() }

  pub fn draft_mut(&mut self) -> Option<&mut Person> { self.draft.as_mut() }

  pub fn cancel_edit(&mut self) {
    if self.in_flight.is_none() {
      self.draft = None;
      self.errors = Validation::default();
    }
  }

  /// Validate the draft and show it immediately. Returns the key and body to
  /// send. The email is the record's key and is never taken from the draft.
  pub fn begin_save(&mut self) -> Option<(String, Person)> {
    if self.in_flight.is_some() {
      return None;
    }
    let email = self.record.as_ref()?.email.clone();
    let draft = self.draft.as_mut()?;
    draft.email = email.clone();
    self.errors = validate::person(draft, self.kind, FormMode::Edit);
    if !self.errors.is_valid() {
      return None;
    }
    let body = draft.clone();
    let shown = body.clone();
    self.in_flight = Some(Optimistic::apply(&mut self.record, |r| *r = Some(shown)));
    Some((email, body))
  }

  /// Returns `true` when the save went through.
  pub fn finish_save(&mut self, result: Result<()>) -> bool {
    let Some(change) = self.in_flight.take() else {
      return false;
    };
    match result {
      Ok(()) => {
        change.commit();
        self.draft = None;
        self.notice = Some(Notice::success(SAVED));
        true
      }
      Err(e) => {
        tracing::warn!(kind = %self.kind, error = %e, "profile update failed, rolling back");
        change.rollback(&mut self.record);
        self.notice = Some(Notice::error(e.user_message()));
        false
      }
    }
  }

  /// Save the draft, then reload from the server on success.
  pub async fn save(&mut self, source: &impl ProfileSource) -> bool {
    let Some((email, body)) = self.begin_save() else {
      return false;
    };
    let result = source.update(&email, &body).await;
    let saved = self.finish_save(result);
    if saved {
      self.load(source).await;
    }
    saved
  }
}
