//! Error type for `lifebridge-client`.
//!
//! The variants mirror what a screen has to do with a failure: show a
//! transport banner, send the user back to login, mark fields inline, or pass
//! the server's own words through.

use lifebridge_core::validate::Validation;
use thiserror::Error;

pub const MSG_TRANSPORT: &str = "Could not load data. Please try again later.";
pub const MSG_LOGIN_AGAIN: &str = "Please log in again.";
pub const MSG_DECODE: &str = "Unexpected response from server.";

#[derive(Debug, Error)]
pub enum Error {
  /// No response was received.
  #[error("request failed: {0}")]
  Transport(#[source] reqwest::Error),

  /// 401 or 403 from the server.
  #[error("not authorized ({status})")]
  Unauthorized { status: u16, message: String },

  /// Any other non-2xx response, with the server-supplied message.
  #[error("{message}")]
  Rejected { status: u16, message: String },

  /// A 2xx response whose body did not have the expected shape.
  #[error("unexpected response body: {0}")]
  Decode(String),

  /// No session token is stored.
  #[error("not logged in")]
  NotAuthenticated,

  /// The stored session token has expired.
  #[error("session expired")]
  SessionExpired,

  /// Client-side validation failed; nothing was sent.
  #[error("validation failed")]
  Invalid(Validation),

  #[error("invalid base url {0:?}")]
  BaseUrl(String),

  #[error("token storage error: {0}")]
  Storage(#[from] std::io::Error),
}

impl Error {
  /// The HTTP status, for errors that came with a response.
  pub fn status(&self) -> Option<u16> {
    match self {
      Error::Unauthorized { status, .. } | Error::Rejected { status, .. } => Some(*status),
      Error::Transport(e) => e.status().map(|s| s.as_u16()),
      _ => None,
    }
  }

  /// Whether the user has to authenticate again.
  pub fn is_auth(&self) -> bool {
    matches!(
      self,
      Error::Unauthorized { .. } | Error::NotAuthenticated | Error::SessionExpired
    )
  }

  /// The text a screen shows for this failure.
  pub fn user_message(&self) -> String {
    match self {
      Error::Transport(_) => MSG_TRANSPORT.to_string(),
      Error::Unauthorized { .. } | Error::NotAuthenticated | Error::SessionExpired => {
        MSG_LOGIN_AGAIN.to_string()
      }
      Error::Rejected { message, .. } => message.clone(),
      Error::Decode(_) => MSG_DECODE.to_string(),
      Error::Invalid(v) => v
        .first()
        .map(|(_, m)| m.to_string())
        .unwrap_or_else(|| "Please correct the highlighted fields.".to_string()),
      Error::BaseUrl(_) | Error::Storage(_) => self.to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejected_message_passes_through_verbatim() {
    let e = Error::Rejected { status: 409, message: "Email already registered".into() };
    assert_eq!(e.user_message(), "Email already registered");
    assert_eq!(e.status(), Some(409));
    assert!(!e.is_auth());
  }

  #[test]
  fn auth_failures_ask_for_login() {
    let e = Error::Unauthorized { status: 401, message: "expired".into() };
    assert!(e.is_auth());
    assert_eq!(e.user_message(), MSG_LOGIN_AGAIN);
    assert_eq!(Error::SessionExpired.user_message(), MSG_LOGIN_AGAIN);
  }
}
