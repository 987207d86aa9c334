//! Create-only forms: fill in, validate, send once, reset.

use lifebridge_core::validate::Validation;

use crate::{Error, Result, views::Notice};

#[derive(Debug, Clone, Default)]
pub struct Form<T> {
  pub value: T,
  errors:    Validation,
  busy:      bool,
  notice:    Option<Notice>,
}

impl<T: Clone + Default> Form<T> {
  pub fn new(value: T) -> Self {
    Self { value, errors: Validation::default(), busy: false, notice: None }
  }

  pub fn errors(&self) -> &Validation { &self.errors }

  pub fn is_busy(&self) -> bool { self.busy }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  /// Run `validate` over the current value. Returns the value to send, or
  /// `None` when a field failed or a submission is already in flight.
  pub fn begin(&mut self, validate: impl FnOnce(&T) -> Validation) -> Option<T> {
    if self.busy {
      return None;
    }
    self.errors = validate(&self.value);
    if !self.errors.is_valid() {
      return None;
    }
    self.busy = true;
    Some(self.value.clone())
  }

  /// Record the server's answer. On success the form is reset to `blank`.
  pub fn finish<R>(&mut self, result: Result<R>, success: &str, blank: T) -> Option<R> {
    self.busy = false;
    match result {
      Ok(r) => {
        self.value = blank;
        self.errors = Validation::default();
        self.notice = Some(Notice::success(success));
        Some(r)
      }
      Err(e) => {
        tracing::warn!(error = %e, "form submission failed");
        if let Error::Invalid(v) = &e {
          self.errors = v.clone();
        }
        self.notice = Some(Notice::error(e.user_message()));
        None
      }
    }
  }
}
