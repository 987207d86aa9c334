//! The login screen.
//!
//! A token is only persisted once it has passed the expiry check and its role
//! maps to a landing route; otherwise the session is left untouched.

use chrono::{DateTime, Utc};
use lifebridge_core::{
  claims,
  model::{LoginRequest, LoginResponse},
  role::Role,
  validate::{self, Validation},
};

use crate::{Error, Result, SessionStore, services::auth::Authenticator, views::Notice};

pub const MSG_BAD_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const MSG_NO_USER: &str = "User not found. Please register first.";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_FAILED: &str = "Login failed. Please check your credentials.";
pub const MSG_EXPIRED: &str = "Session Expired. Please login again.";
pub const MSG_UNKNOWN_ROLE: &str = "Unknown role. Please contact support.";
pub const MSG_NO_TOKEN: &str = "Invalid response from server. Please try again later.";

#[derive(Debug, Default)]
pub struct LoginView {
  pub email:    String,
  pub password: String,
  errors:       Validation,
  busy:         bool,
  notice:       Option<Notice>,
}

impl LoginView {
  pub fn new() -> Self { Self::default() }

  pub fn errors(&self) -> &Validation { &self.errors }

  pub fn is_busy(&self) -> bool { self.busy }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  /// Show a message carried over from elsewhere, e.g. after a forced logout.
  pub fn set_notice(&mut self, notice: Notice) { self.notice = Some(notice); }

  pub fn begin_submit(&mut self) -> Option<LoginRequest> {
    if self.busy {
      return None;
    }
    self.errors = validate::login(&self.email, &self.password);
    if !self.errors.is_valid() {
      return None;
    }
    self.busy = true;
    self.notice = None;
    Some(LoginRequest { email: self.email.trim().to_string(), password: self.password.clone() })
  }

  /// Accept or refuse the server's answer. Returns the role to route to
  /// once the token has been stored.
  pub fn finish_submit(
    &mut self,
    result: Result<LoginResponse>,
    session: &SessionStore,
    now: DateTime<Utc>,
  ) -> Option<Role> {
    self.busy = false;
    match accept(result, now) {
      Ok((token, role)) => match session.set_token(&token) {
        Ok(()) => {
          tracing::info!(%role, "logged in");
          self.password.clear();
          Some(role)
        }
        Err(e) => {
          self.notice = Some(Notice::error(e.user_message()));
          None
        }
      },
      Err(message) => {
        tracing::warn!(reason = message, "login refused");
        self.notice = Some(Notice::error(message));
        None
      }
    }
  }

  pub async fn submit(
    &mut self,
    auth: &impl Authenticator,
    session: &SessionStore,
    now: DateTime<Utc>,
  ) -> Option<Role> {
    let request = self.begin_submit()?;
    let result = auth.login(&request).await;
    self.finish_submit(result, session, now)
  }
}

fn accept(
  result: Result<LoginResponse>,
  now: DateTime<Utc>,
) -> Result<(String, Role), &'static str> {
  let response = result.map_err(|e| failure_message(&e))?;
  if response.token.trim().is_empty() {
    return Err(MSG_NO_TOKEN);
  }
  if claims::is_expired(&response.token, now) {
    return Err(MSG_EXPIRED);
  }
  // Prefer the role the server reported; fall back to the token's claim.
  let role = if response.role.trim().is_empty() {
    claims::decode_claims(&response.token).and_then(|c| c.role())
  } else {
    Role::parse(response.role.trim())
  };
  let role = role.ok_or(MSG_UNKNOWN_ROLE)?;
  Ok((response.token, role))
}

fn failure_message(e: &Error) -> &'static str {
  match (e, e.status()) {
    (Error::Decode(_), _) => MSG_NO_TOKEN,
    (_, Some(401)) => MSG_BAD_CREDENTIALS,
    (_, Some(404)) => MSG_NO_USER,
    (_, Some(500)) => MSG_SERVER,
    _ => MSG_FAILED,
  }
}
