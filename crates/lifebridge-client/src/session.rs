//! The session store: one persisted bearer token.
//!
//! Role and subject are never stored on their own; they are decoded from the
//! token's claims whenever they are asked for. With no token stored, both are
//! `None`.
//!
//! There is no locking. The store assumes one active session per OS user; two
//! processes sharing the token file can race a logout against an in-flight
//! request, which then fails with an authorization error.

use std::{
  io::{self, Write},
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use lifebridge_core::{
  claims::{self, Claims},
  role::Role,
};

use crate::{Error, Result};

// ─── Storage ──────────────────────────────────────────────────────────────────

/// Persisted storage for exactly one token value.
pub trait TokenStorage: Send + Sync {
  fn load(&self) -> io::Result<Option<String>>;
  fn store(&self, token: &str) -> io::Result<()>;
  fn remove(&self) -> io::Result<()>;
}

/// Stores the token in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
  path: PathBuf,
}

impl FileTokenStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl TokenStorage for FileTokenStorage {
  fn load(&self) -> io::Result<Option<String>> {
    match std::fs::read_to_string(&self.path) {
      Ok(raw) => {
        let token = raw.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn store(&self, token: &str) -> io::Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
      use std::os::unix::fs::OpenOptionsExt;
      options.mode(0o600);
    }
    let mut file = options.open(&self.path)?;
    // `mode` only applies on creation; tighten a file left by an older run
    // before the token goes in.
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())
  }

  fn remove(&self) -> io::Result<()> {
    match std::fs::remove_file(&self.path) {
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }
}

/// Keeps the token in memory only; used by tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
  token: Mutex<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
  fn load(&self) -> io::Result<Option<String>> {
    Ok(self.token.lock().map_err(poisoned)?.clone())
  }

  fn store(&self, token: &str) -> io::Result<()> {
    *self.token.lock().map_err(poisoned)? = Some(token.to_string());
    Ok(())
  }

  fn remove(&self) -> io::Result<()> {
    *self.token.lock().map_err(poisoned)? = None;
    Ok(())
  }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> io::Error {
  io::Error::other("token storage lock poisoned")
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// A stored token together with on-demand claim decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
}

impl Session {
  /// `None` when the token is malformed; callers treat that as logged out.
  pub fn claims(&self) -> Option<Claims> { claims::decode_claims(&self.token) }

  pub fn role(&self) -> Option<Role> { self.claims().and_then(|c| c.role()) }

  pub fn subject_email(&self) -> Option<String> { self.claims().map(|c| c.subject) }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { claims::is_expired(&self.token, now) }
}

/// Process-wide handle to the persisted session token.
///
/// Cheap to clone; every clone shares the same storage.
#[derive(Clone)]
pub struct SessionStore {
  storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
  pub fn new(storage: impl TokenStorage + 'static) -> Self { Self { storage: Arc::new(storage) } }

  pub fn file(path: impl Into<PathBuf>) -> Self { Self::new(FileTokenStorage::new(path)) }

  pub fn in_memory() -> Self { Self::new(MemoryTokenStorage::default()) }

  /// Persist `token` as the current session. No validation is performed.
  pub fn set_token(&self, token: &str) -> Result<()> {
    self.storage.store(token)?;
    tracing::debug!("session token stored");
    Ok(())
  }

  /// The stored token, or `None`. Storage read failures are logged and
  /// reported as "no token".
  pub fn token(&self) -> Option<String> {
    match self.storage.load() {
      Ok(token) => token,
      Err(e) => {
        tracing::warn!(error = %e, "failed to read session token");
        None
      }
    }
  }

  pub fn session(&self) -> Option<Session> { self.token().map(|token| Session { token }) }

  pub fn claims(&self) -> Option<Claims> { self.session().and_then(|s| s.claims()) }

  pub fn role(&self) -> Option<Role> { self.session().and_then(|s| s.role()) }

  pub fn subject_email(&self) -> Option<String> { self.session().and_then(|s| s.subject_email()) }

  /// `true` when no token is stored, or the stored one is expired or
  /// malformed.
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.session().is_none_or(|s| s.is_expired(now))
  }

  /// The live session. [`Error::NotAuthenticated`] without a token,
  /// [`Error::SessionExpired`] once it is past its expiry or unreadable.
  pub fn current(&self, now: DateTime<Utc>) -> Result<Session> {
    let session = self.session().ok_or(Error::NotAuthenticated)?;
    if session.is_expired(now) {
      return Err(Error::SessionExpired);
    }
    Ok(session)
  }

  /// Remove the token.
  pub fn clear(&self) -> Result<()> {
    self.storage.remove()?;
    tracing::debug!("session token cleared");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
  use serde_json::json;

  use super::*;

  fn token(payload: serde_json::Value) -> String {
    format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()))
  }

  #[test]
  fn empty_store_has_no_identity() {
    let store = SessionStore::in_memory();
    assert!(store.token().is_none());
    assert!(store.role().is_none());
    assert!(store.subject_email().is_none());
    assert!(store.is_expired(Utc::now()));
    assert!(matches!(store.current(Utc::now()), Err(Error::NotAuthenticated)));
  }

  #[test]
  fn identity_is_decoded_from_the_token() {
    let store = SessionStore::in_memory();
    store
      .set_token(&token(json!({
        "sub": "dr.who@lifebridge.org",
        "role": "ROLE_DOCTOR",
        "exp": 4_102_444_800_i64,
      })))
      .unwrap();
    assert_eq!(store.subject_email().as_deref(), Some("dr.who@lifebridge.org"));
    assert_eq!(store.role(), Some(Role::Doctor));
    assert!(!store.is_expired(Utc::now()));
    assert_eq!(store.current(Utc::now()).unwrap().role(), Some(Role::Doctor));

    store.clear().unwrap();
    assert!(store.subject_email().is_none());
    assert!(store.role().is_none());
  }

  #[test]
  fn malformed_token_is_stored_but_yields_no_claims() {
    let store = SessionStore::in_memory();
    store.set_token("garbage").unwrap();
    assert_eq!(store.token().as_deref(), Some("garbage"));
    assert!(store.claims().is_none());
    assert!(store.is_expired(Utc::now()));
    assert!(matches!(store.current(Utc::now()), Err(Error::SessionExpired)));
  }

  #[test]
  fn file_storage_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("token");

    let a = SessionStore::file(&path);
    a.set_token("abc.def.ghi").unwrap();

    let b = SessionStore::file(&path);
    assert_eq!(b.token().as_deref(), Some("abc.def.ghi"));

    b.clear().unwrap();
    assert!(a.token().is_none());
    // Clearing twice is fine.
    a.clear().unwrap();
  }

  #[cfg(unix)]
  #[test]
  fn token_file_is_private_to_the_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

    SessionStore::file(&path).set_token("abc.def.ghi").unwrap();
    assert_eq!(mode(&path), 0o600);

    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
    SessionStore::file(&path).set_token("jkl.mno.pqr").unwrap();
    assert_eq!(mode(&path), 0o600);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "jkl.mno.pqr");
  }
}
