//! Error types for `lifebridge-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown appointment status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown collection: {0:?}")]
  UnknownKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
