//! Login and logout.

use std::future::Future;

use lifebridge_core::model::{LoginRequest, LoginResponse};

use crate::{ApiClient, Error, Result, SessionStore};

/// Anything that can exchange credentials for a session token.
pub trait Authenticator: Send + Sync {
  fn login<'a>(
    &'a self,
    request: &'a LoginRequest,
  ) -> impl Future<Output = Result<LoginResponse>> + Send + 'a;
}

#[derive(Clone)]
pub struct AuthService {
  api:     ApiClient,
  session: SessionStore,
}

impl AuthService {
  pub fn new(api: ApiClient, session: SessionStore) -> Self { Self { api, session } }

  /// `POST /api/login`. The returned token is *not* stored; the login flow
  /// decides whether to accept it (see [`crate::views::login`]).
  pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
    tracing::info!(email = %request.email, "logging in");
    let response: LoginResponse = self.api.post(&["api", "login"], request).await?;
    if response.token.trim().is_empty() {
      return Err(Error::Decode("no token received from server".into()));
    }
    Ok(response)
  }

  /// Drop the stored session.
  pub fn logout(&self) -> Result<()> {
    tracing::info!("logging out");
    self.session.clear()
  }

  pub fn session(&self) -> &SessionStore { &self.session }
}

impl Authenticator for AuthService {
  fn login<'a>(
    &'a self,
    request: &'a LoginRequest,
  ) -> impl Future<Output = Result<LoginResponse>> + Send + 'a {
    AuthService::login(self, request)
  }
}
