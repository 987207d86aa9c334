//! UI-agnostic view state machines.
//!
//! Views never perform I/O. Each interaction is split into a `begin_*` step
//! that updates local state and hands back the request to make, and a
//! `finish_*` step that folds the result back in. A front end runs the request
//! wherever it likes (the TUI spawns it inside a [`scope::ViewScope`]); the
//! async convenience methods simply run both halves inline.
//!
//! Every mutating view follows the same policy, implemented by
//! [`optimistic::Optimistic`]: apply the change locally, call the server,
//! roll back on failure, then reconcile with the server on success.

pub mod appointment;
pub mod booking;
pub mod feedback;
pub mod form;
pub mod login;
pub mod mine;
pub mod optimistic;
pub mod prescribe;
pub mod profile;
pub mod register;
pub mod scope;
pub mod table;

/// Where a view is in its fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
  #[default]
  Idle,
  Loading,
  Loaded,
  Error(String),
}

impl Phase {
  pub fn is_loading(&self) -> bool { matches!(self, Phase::Loading) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

/// A transient, dismissible message (the status-bar "snackbar").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind:    NoticeKind,
  pub message: String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self { kind: NoticeKind::Success, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { kind: NoticeKind::Error, message: message.into() }
  }

  pub fn is_error(&self) -> bool { self.kind == NoticeKind::Error }
}

/// Step a picker over `len` options, wrapping at both ends. With nothing
/// picked yet, forward starts at the first option and backward at the last.
pub fn cycle_index(len: usize, current: Option<usize>, forward: bool) -> Option<usize> {
  if len == 0 {
    return None;
  }
  Some(match (current, forward) {
    (None, true) => 0,
    (None, false) => len - 1,
    (Some(i), true) => (i + 1) % len,
    (Some(i), false) => (i + len - 1) % len,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycle_wraps_both_ways() {
    assert_eq!(cycle_index(0, None, true), None);
    assert_eq!(cycle_index(3, None, false), Some(2));
    assert_eq!(cycle_index(3, Some(2), true), Some(0));
    assert_eq!(cycle_index(3, Some(0), false), Some(2));
  }
}
