//! The single configured HTTP sender.
//!
//! Every request is built from the fixed base URL and passed through the
//! client's [`RequestInterceptor`] just before it is sent, which is where the
//! bearer credential gets attached. There is no retry and no per-call
//! timeout override.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{ClientConfig, Error, Result, session::SessionStore};

// ─── Interceptors ─────────────────────────────────────────────────────────────

/// Hook applied to every outgoing request.
pub trait RequestInterceptor: Send + Sync {
  fn intercept(&self, req: RequestBuilder) -> RequestBuilder;
}

/// Leaves requests untouched.
pub struct NoAuth;

impl RequestInterceptor for NoAuth {
  fn intercept(&self, req: RequestBuilder) -> RequestBuilder { req }
}

/// Attaches `Authorization: Bearer <token>` from the session store, read at
/// send time so a login or logout is picked up by the very next request.
pub struct BearerAuth {
  session: SessionStore,
}

impl BearerAuth {
  pub fn new(session: SessionStore) -> Self { Self { session } }
}

impl RequestInterceptor for BearerAuth {
  fn intercept(&self, req: RequestBuilder) -> RequestBuilder {
    match self.session.token() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async HTTP client for the hospital REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:      Client,
  base:        Url,
  interceptor: Arc<dyn RequestInterceptor>,
}

impl ApiClient {
  pub fn new(config: &ClientConfig, interceptor: impl RequestInterceptor + 'static) -> Result<Self> {
    let base = Url::parse(&config.base_url).map_err(|_| Error::BaseUrl(config.base_url.clone()))?;
    if base.cannot_be_a_base() {
      return Err(Error::BaseUrl(config.base_url.clone()));
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(Error::Transport)?;
    Ok(Self { client, base, interceptor: Arc::new(interceptor) })
  }

  /// A client that authenticates every request from `session`.
  pub fn with_session(config: &ClientConfig, session: SessionStore) -> Result<Self> {
    Self::new(config, BearerAuth::new(session))
  }

  pub fn base_url(&self) -> &Url { &self.base }

  /// `base` + `segments`, each segment percent-encoded on its own so keys
  /// like emails can never change the path shape.
  pub fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
    self
      .interceptor
      .intercept(self.client.request(method, self.url(segments)))
  }

  // ── Verbs ─────────────────────────────────────────────────────────────────

  pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
    self.json(self.request(Method::GET, segments), segments).await
  }

  pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    self
      .json(self.request(Method::POST, segments).json(body), segments)
      .await
  }

  /// POST whose response body is ignored.
  pub async fn post_unit<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<()> {
    self
      .unit(self.request(Method::POST, segments).json(body), segments)
      .await
  }

  /// PUT whose response body is ignored.
  pub async fn put_unit<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<()> {
    self
      .unit(self.request(Method::PUT, segments).json(body), segments)
      .await
  }

  /// PUT with query parameters and no body; response ignored.
  pub async fn put_query<Q: Serialize + ?Sized>(&self, segments: &[&str], query: &Q) -> Result<()> {
    self
      .unit(self.request(Method::PUT, segments).query(query), segments)
      .await
  }

  pub async fn delete(&self, segments: &[&str]) -> Result<()> {
    self
      .unit(self.request(Method::DELETE, segments), segments)
      .await
  }

  // ── Execution ─────────────────────────────────────────────────────────────

  async fn json<T: DeserializeOwned>(&self, req: RequestBuilder, segments: &[&str]) -> Result<T> {
    let body = self.execute(req, segments).await?;
    // An empty 2xx body decodes like JSON `null`, so `()` and `Option<T>` work.
    let bytes: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &body };
    serde_json::from_slice(bytes).map_err(|e| {
      tracing::warn!(path = %segments.join("/"), error = %e, "undecodable response body");
      Error::Decode(e.to_string())
    })
  }

  async fn unit(&self, req: RequestBuilder, segments: &[&str]) -> Result<()> {
    self.execute(req, segments).await.map(|_| ())
  }

  /// Send `req`; 2xx yields the raw body, anything else a typed error.
  async fn execute(&self, req: RequestBuilder, segments: &[&str]) -> Result<Vec<u8>> {
    let path = segments.join("/");
    let resp = req.send().await.map_err(|e| {
      tracing::warn!(%path, error = %e, "request failed");
      Error::Transport(e)
    })?;

    let status = resp.status();
    let body = resp.bytes().await.map_err(Error::Transport)?.to_vec();
    tracing::debug!(%path, status = status.as_u16(), "response");

    if status.is_success() {
      return Ok(body);
    }

    let message = server_message(status, &body);
    tracing::warn!(%path, status = status.as_u16(), %message, "request rejected");
    Err(match status {
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        Error::Unauthorized { status: status.as_u16(), message }
      }
      _ => Error::Rejected { status: status.as_u16(), message },
    })
  }
}

/// Extract the human-readable message from an error response body.
///
/// Accepts `{"message": ...}`, `{"error": ...}`, a bare JSON string, or plain
/// text; falls back to the status reason phrase.
pub fn server_message(status: StatusCode, body: &[u8]) -> String {
  if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
    let found = match &value {
      serde_json::Value::Object(map) => ["message", "error"]
        .iter()
        .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
        .map(str::to_string),
      serde_json::Value::String(s) => Some(s.clone()),
      _ => None,
    };
    if let Some(m) = found.filter(|m| !m.trim().is_empty()) {
      return m;
    }
  } else if let Ok(text) = std::str::from_utf8(body)
    && !text.trim().is_empty()
  {
    return text.trim().to_string();
  }
  status
    .canonical_reason()
    .unwrap_or("Request failed")
    .to_string()
}
