//! Wire data model.
//!
//! Field names follow the backend's camelCase JSON. All records are owned by
//! the backend; the client only ever holds a transient copy.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result, role::Role};

/// Decode a field the backend may send as `null`, falling back to the
/// default. `#[serde(default)]` alone only covers a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
  pub email:    String,
  pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
  pub token: String,
  /// Authority string; kept raw so an unknown role can be reported verbatim.
  #[serde(default, deserialize_with = "null_default")]
  pub role:  String,
  #[serde(default)]
  pub email: Option<String>,
}

// ─── People ──────────────────────────────────────────────────────────────────

/// Which backend collection a [`Person`] belongs to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum PersonKind {
  Patients,
  Doctors,
  Nurses,
  Staff,
  Admins,
}

impl PersonKind {
  /// The collection whose profile a user of `role` owns.
  pub fn for_role(role: Role) -> Self {
    match role {
      Role::Admin => PersonKind::Admins,
      Role::Doctor => PersonKind::Doctors,
      Role::Patient => PersonKind::Patients,
      Role::Nurse => PersonKind::Nurses,
      Role::Staff => PersonKind::Staff,
    }
  }

  /// Parse a collection path segment such as `doctors`.
  pub fn parse(segment: &str) -> Result<Self> {
    segment
      .parse()
      .map_err(|_| Error::UnknownKind(segment.to_string()))
  }

  /// Singular display noun, e.g. "doctor".
  pub fn noun(self) -> &'static str {
    match self {
      PersonKind::Patients => "patient",
      PersonKind::Doctors => "doctor",
      PersonKind::Nurses => "nurse",
      PersonKind::Staff => "staff member",
      PersonKind::Admins => "admin",
    }
  }
}

/// A person record: patient, doctor, nurse, staff member or admin.
///
/// One shape serves every collection; the doctor-only fields are simply
/// absent elsewhere. `email` is the natural key and never changes after
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  #[serde(default, alias = "patientId", alias = "doctorId", skip_serializing_if = "Option::is_none")]
  pub id:             Option<i64>,
  #[serde(default, deserialize_with = "null_default")]
  pub first_name:     String,
  #[serde(default, deserialize_with = "null_default")]
  pub last_name:      String,
  #[serde(default, deserialize_with = "null_default")]
  pub email:          String,
  #[serde(default, deserialize_with = "null_default")]
  pub phone_number:   String,
  #[serde(default, deserialize_with = "null_default")]
  pub gender:         String,
  /// `YYYY-MM-DD`.
  #[serde(default, deserialize_with = "null_default")]
  pub date_of_birth:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:        Option<String>,
  #[serde(default, deserialize_with = "null_default")]
  pub city:           String,
  #[serde(default, deserialize_with = "null_default")]
  pub state:          String,
  #[serde(default, deserialize_with = "null_default")]
  pub country:        String,
  /// Only sent on registration; the backend never returns it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub specialization: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blood_group:    Option<String>,
  /// `YYYY-MM-DD`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub joining_date:   Option<String>,
}

impl Person {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name.trim(), self.last_name.trim())
      .trim()
      .to_string()
  }
}

/// Blood groups offered by the doctor form.
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Specializations offered by the doctor form.
pub const SPECIALIZATIONS: [&str; 7] = [
  "Cardiology",
  "Dermatology",
  "Neurology",
  "Pediatrics",
  "Orthopedics",
  "Psychiatry",
  "General Medicine",
];

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Entry of `GET /api/doctors/fetchAllDoctorNames`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorName {
  pub name: String,
}

// ─── Appointments ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AppointmentStatus {
  #[default]
  Pending,
  Scheduled,
  Completed,
  Cancelled,
}

impl AppointmentStatus {
  /// Parse a status name, ignoring case and surrounding whitespace.
  pub fn parse(value: &str) -> Result<Self> {
    value
      .trim()
      .parse()
      .map_err(|_| Error::UnknownStatus(value.to_string()))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
  pub id:            i64,
  #[serde(default, deserialize_with = "null_default")]
  pub patient_name:  String,
  #[serde(default, deserialize_with = "null_default")]
  pub patient_email: String,
  #[serde(default, deserialize_with = "null_default")]
  pub doctor_name:   String,
  #[serde(default, deserialize_with = "null_default")]
  pub date:          String,
  #[serde(default, deserialize_with = "null_default")]
  pub time:          String,
  #[serde(default, deserialize_with = "null_default")]
  pub status:        AppointmentStatus,
}

/// Body of `POST /api/appointments`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
  pub patient_name: String,
  pub doctor_name:  String,
  pub date:         String,
  pub time:         String,
}

// ─── Prescriptions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:            Option<i64>,
  #[serde(default, deserialize_with = "null_default")]
  pub doctor_name:   String,
  #[serde(default, deserialize_with = "null_default")]
  pub patient_name:  String,
  #[serde(default, deserialize_with = "null_default")]
  pub patient_email: String,
  #[serde(default, deserialize_with = "null_default")]
  pub date:          String,
  /// Medicine lines in the order the doctor entered them.
  #[serde(default, deserialize_with = "null_default")]
  pub medicines:     Vec<String>,
  #[serde(default, deserialize_with = "null_default")]
  pub instructions:  String,
  #[serde(default, deserialize_with = "null_default")]
  pub issued:        bool,
}

// ─── Feedback ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
  #[serde(default, deserialize_with = "null_default")]
  pub name:     String,
  #[serde(default, deserialize_with = "null_default")]
  pub email:    String,
  #[serde(default, deserialize_with = "null_default")]
  pub phone:    String,
  #[serde(default, deserialize_with = "null_default")]
  pub doctor:   String,
  /// 0–5 in steps of 0.5.
  #[serde(default, deserialize_with = "null_default")]
  pub rating:   f32,
  #[serde(default, deserialize_with = "null_default")]
  pub comments: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn person_round_trips_camel_case_and_hides_password_when_absent() {
    let p: Person = serde_json::from_value(json!({
      "patientId": 7,
      "firstName": "Ada",
      "lastName": "Lovelace",
      "email": "ada@example.com",
      "phoneNumber": "0123456789",
      "city": "London"
    }))
    .unwrap();
    assert_eq!(p.id, Some(7));
    assert_eq!(p.full_name(), "Ada Lovelace");

    let out = serde_json::to_value(&p).unwrap();
    assert_eq!(out["firstName"], "Ada");
    assert!(out.get("password").is_none());
    assert!(out.get("specialization").is_none());
  }

  #[test]
  fn null_fields_decode_as_empty_instead_of_failing_the_list() {
    let rx: Vec<Prescription> = serde_json::from_value(json!([
      { "doctorName": "Dr. Grey", "medicines": ["Aspirin"], "instructions": null, "issued": null },
      { "doctorName": null, "medicines": null, "instructions": "After meals", "issued": true }
    ]))
    .unwrap();
    assert_eq!(rx[0].instructions, "");
    assert!(!rx[0].issued);
    assert_eq!(rx[1].doctor_name, "");
    assert!(rx[1].medicines.is_empty());
    assert!(rx[1].issued);

    let people: Vec<Person> = serde_json::from_value(json!([
      { "firstName": "Ada", "email": "ada@example.com", "gender": null, "city": null },
      { "firstName": "Alan", "email": "alan@example.com", "phoneNumber": null }
    ]))
    .unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].gender, "");
    assert_eq!(people[1].phone_number, "");

    let appts: Vec<Appointment> =
      serde_json::from_value(json!([{ "id": 3, "time": null, "status": null }])).unwrap();
    assert_eq!(appts[0].status, AppointmentStatus::Pending);
    assert_eq!(appts[0].time, "");

    let feedback: Feedback =
      serde_json::from_value(json!({ "name": "Ada", "phone": null, "rating": 4.0, "comments": null }))
        .unwrap();
    assert_eq!(feedback.phone, "");
    assert_eq!(feedback.comments, "");
  }

  #[test]
  fn appointment_status_parses_loosely_and_serialises_uppercase() {
    assert_eq!(AppointmentStatus::parse(" scheduled ").unwrap(), AppointmentStatus::Scheduled);
    assert!(matches!(AppointmentStatus::parse("lost"), Err(Error::UnknownStatus(s)) if s == "lost"));
    assert_eq!(
      serde_json::to_value(AppointmentStatus::Cancelled).unwrap(),
      json!("CANCELLED")
    );
  }

  #[test]
  fn person_kind_paths() {
    assert_eq!(PersonKind::Doctors.as_ref(), "doctors");
    assert_eq!(PersonKind::for_role(Role::Staff), PersonKind::Staff);
    assert_eq!(PersonKind::parse("patients").unwrap(), PersonKind::Patients);
    assert!(matches!(PersonKind::parse("janitors"), Err(Error::UnknownKind(_))));
  }
}
