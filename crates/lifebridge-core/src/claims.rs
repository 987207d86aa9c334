//! Session-token claim decoding.
//!
//! The session token is a JWT: three dot-separated base64 segments, the middle
//! of which is a JSON claims object. The client never verifies the signature;
//! claims are read for display and for the local expiry check only. The
//! server remains the sole authority on who the caller is.

use base64::{
  Engine as _,
  alphabet,
  engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::role::Role;

const LENIENT: GeneralPurposeConfig =
  GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// JWTs use the URL-safe alphabet; some issuers emit the standard one.
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// The decoded payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The authenticated subject's email (`sub`).
  #[serde(rename = "sub")]
  pub subject:    String,
  /// Role authority string, e.g. `ROLE_DOCTOR`. Not every issuer embeds it,
  /// and a non-string role is dropped rather than failing the decode.
  #[serde(default, deserialize_with = "string_or_none")]
  pub role:       Option<String>,
  /// Expiry as Unix seconds (`exp`).
  #[serde(rename = "exp", default)]
  pub expires_at: Option<i64>,
  /// Issued-at as Unix seconds (`iat`).
  #[serde(rename = "iat", default)]
  pub issued_at:  Option<i64>,
}

impl Claims {
  /// The embedded role, if present and recognised.
  pub fn role(&self) -> Option<Role> { self.role.as_deref().and_then(Role::parse) }

  /// Whether the expiry claim is absent or not after `now`.
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    match self.expires_at {
      Some(exp) => exp <= now.timestamp(),
      None => true,
    }
  }
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  Ok(match serde_json::Value::deserialize(deserializer)? {
    serde_json::Value::String(s) => Some(s),
    _ => None,
  })
}

/// Decode the claims segment of `token`.
///
/// Returns `None` for anything that is not three non-empty dot-separated
/// segments with a base64 JSON object in the middle that carries `sub`.
pub fn decode_claims(token: &str) -> Option<Claims> {
  let mut segments = token.trim().split('.');
  let (_header, payload, _signature) =
    (segments.next()?, segments.next()?, segments.next()?);
  if segments.next().is_some() || payload.is_empty() {
    return None;
  }

  let bytes = URL_SAFE
    .decode(payload)
    .or_else(|_| STANDARD.decode(payload))
    .ok()?;
  serde_json::from_slice(&bytes).ok()
}

/// Whether `token` should be treated as expired at `now`.
///
/// Malformed tokens and tokens without an expiry claim count as expired.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
  decode_claims(token).is_none_or(|c| c.is_expired_at(now))
}

#[cfg(test)]
mod tests {
  use base64::engine::general_purpose::URL_SAFE_NO_PAD;
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn token(payload: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
  }

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  #[test]
  fn decodes_subject_role_and_expiry() {
    let t = token(json!({
      "sub": "alice@example.com",
      "role": "ROLE_PATIENT",
      "exp": 2_000_000_000_i64,
      "iat": 1_000_000_000_i64,
    }));
    let claims = decode_claims(&t).unwrap();
    assert_eq!(claims.subject, "alice@example.com");
    assert_eq!(claims.role(), Some(Role::Patient));
    assert_eq!(claims.expires_at, Some(2_000_000_000));
  }

  #[test]
  fn standard_alphabet_with_padding_is_accepted() {
    let body = base64::engine::general_purpose::STANDARD
      .encode(json!({ "sub": "bob@example.com?>" }).to_string());
    let t = format!("h.{body}.s");
    assert_eq!(decode_claims(&t).unwrap().subject, "bob@example.com?>");
  }

  #[test]
  fn malformed_tokens_decode_to_none() {
    assert!(decode_claims("").is_none());
    assert!(decode_claims("not-a-token").is_none());
    assert!(decode_claims("a.b").is_none());
    assert!(decode_claims("a..c").is_none());
    assert!(decode_claims("a.!!!.c").is_none());
    assert!(decode_claims("a.b.c.d").is_none());
    // Valid base64, not JSON.
    let not_json = URL_SAFE_NO_PAD.encode("hello");
    assert!(decode_claims(&format!("a.{not_json}.c")).is_none());
    // JSON without a subject.
    assert!(decode_claims(&token(json!({ "role": "ROLE_ADMIN" }))).is_none());
  }

  #[test]
  fn unknown_role_claim_is_kept_but_not_recognised() {
    let claims = decode_claims(&token(json!({ "sub": "x@y.z", "role": "ROLE_JANITOR" }))).unwrap();
    assert_eq!(claims.role.as_deref(), Some("ROLE_JANITOR"));
    assert_eq!(claims.role(), None);
  }

  #[test]
  fn non_string_role_is_dropped_but_the_session_survives() {
    let claims = decode_claims(&token(json!({
      "sub": "x@y.z",
      "role": ["ROLE_ADMIN"],
      "exp": 2_000_000_000_i64,
    })))
    .unwrap();
    assert_eq!(claims.subject, "x@y.z");
    assert_eq!(claims.role, None);
    assert!(!claims.is_expired_at(at(1_000)));
  }

  #[test]
  fn expiry_checks() {
    let t = token(json!({ "sub": "a@b.co", "exp": 1_000 }));
    assert!(!is_expired(&t, at(999)));
    assert!(is_expired(&t, at(1_000)));
    assert!(is_expired(&t, at(5_000)));

    let no_exp = token(json!({ "sub": "a@b.co" }));
    assert!(is_expired(&no_exp, at(0)));
    assert!(is_expired("garbage", at(0)));
  }
}
