//! Roles and the role router.
//!
//! The backend reports a role as a Spring-style authority string
//! (`ROLE_ADMIN`, `ROLE_DOCTOR`, ...). Each known role has exactly one
//! landing route; anything else is an unknown role the caller must report to
//! the user rather than crash on.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// An authenticated user's role.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Role {
  #[serde(rename = "ROLE_ADMIN")]
  #[strum(serialize = "ROLE_ADMIN")]
  Admin,
  #[serde(rename = "ROLE_DOCTOR")]
  #[strum(serialize = "ROLE_DOCTOR")]
  Doctor,
  #[serde(rename = "ROLE_PATIENT")]
  #[strum(serialize = "ROLE_PATIENT")]
  Patient,
  #[serde(rename = "ROLE_NURSE")]
  #[strum(serialize = "ROLE_NURSE")]
  Nurse,
  #[serde(rename = "ROLE_STAFF")]
  #[strum(serialize = "ROLE_STAFF")]
  Staff,
}

impl Role {
  /// The profile route a freshly logged-in user of this role lands on.
  pub fn landing_route(self) -> &'static str {
    match self {
      Role::Admin => "/admin/profile",
      Role::Doctor => "/doctor/profile",
      Role::Patient => "/patient/profile",
      Role::Nurse => "/nurse/profile",
      Role::Staff => "/staff/profile",
    }
  }

  /// Short human label, e.g. "Doctor".
  pub fn label(self) -> &'static str {
    match self {
      Role::Admin => "Admin",
      Role::Doctor => "Doctor",
      Role::Patient => "Patient",
      Role::Nurse => "Nurse",
      Role::Staff => "Staff",
    }
  }

  /// Parse an authority string, returning `None` for unknown roles.
  pub fn parse(authority: &str) -> Option<Self> {
    authority.trim().parse().ok()
  }

  pub fn all() -> impl Iterator<Item = Role> { Role::iter() }
}

/// Map a role authority string to its landing route.
///
/// Returns `None` for anything that is not one of the five known roles.
pub fn route_for(role: &str) -> Option<&'static str> {
  Role::parse(role).map(Role::landing_route)
}
