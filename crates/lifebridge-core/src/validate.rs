//! Client-side form validation.
//!
//! Every validator is a pure function from form values to a [`Validation`]:
//! a map of field name to message. Checks are per field only (presence,
//! format, length). Cross-field rules and uniqueness are the server's job;
//! a duplicate email only surfaces when the create call is rejected.

use std::{collections::BTreeMap, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{AppointmentRequest, Feedback, Person, PersonKind};

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub const MIN_PASSWORD_LEN: usize = 6;
pub const PHONE_DIGITS: usize = 10;
pub const MAX_RATING: f32 = 5.0;

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Add,
  Edit,
}

/// The outcome of validating one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
  errors: BTreeMap<&'static str, String>,
}

impl Validation {
  pub fn is_valid(&self) -> bool { self.errors.is_empty() }

  /// The message for `field`, if it failed.
  pub fn error(&self, field: &str) -> Option<&str> {
    self.errors.get(field).map(String::as_str)
  }

  pub fn errors(&self) -> &BTreeMap<&'static str, String> { &self.errors }

  /// First failing field in field-name order, for one-line summaries.
  pub fn first(&self) -> Option<(&'static str, &str)> {
    self.errors.iter().next().map(|(k, v)| (*k, v.as_str()))
  }

  fn fail(&mut self, field: &'static str, message: impl Into<String>) {
    self.errors.entry(field).or_insert_with(|| message.into());
  }

  fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
      self.fail(field, message);
      false
    } else {
      true
    }
  }

  fn email(&mut self, field: &'static str, value: &str) {
    if self.require(field, value, "Email is required") && !is_valid_email(value) {
      self.fail(field, "Invalid email format");
    }
  }

  fn phone(&mut self, field: &'static str, value: &str) {
    if !is_valid_phone(value) {
      self.fail(field, "Phone must be 10 digits.");
    }
  }

  fn date(&mut self, field: &'static str, value: &str, required: &str) {
    if self.require(field, value, required) && parse_date(value).is_none() {
      self.fail(field, "Date must be in YYYY-MM-DD format");
    }
  }
}

pub fn is_valid_email(value: &str) -> bool { EMAIL_RE.is_match(value.trim()) }

/// Exactly ten ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
  let value = value.trim();
  value.len() == PHONE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Login form. Field names: `email`, `password`.
pub fn login(email: &str, password: &str) -> Validation {
  let mut v = Validation::default();
  if email.trim().is_empty() || password.is_empty() {
    v.require("email", email, "Please enter both email and password.");
    v.require("password", password, "Please enter both email and password.");
    return v;
  }
  if !is_valid_email(email) {
    v.fail("email", "Please enter a valid email address.");
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    v.fail("password", "Password must be at least 6 characters long.");
  }
  v
}

/// Person add/edit form for any collection.
///
/// Field names are the camelCase wire names (`firstName`, `phoneNumber`, ...).
/// Doctors additionally need `specialization`, `bloodGroup` and
/// `joiningDate`. A password is only required when adding.
pub fn person(p: &Person, kind: PersonKind, mode: FormMode) -> Validation {
  let mut v = Validation::default();
  v.require("firstName", &p.first_name, "First name is required");
  v.require("lastName", &p.last_name, "Last name is required");
  v.email("email", &p.email);
  if v.require("phoneNumber", &p.phone_number, "Phone number is required") {
    v.phone("phoneNumber", &p.phone_number);
  }
  v.require("gender", &p.gender, "Gender is required");
  v.date("dateOfBirth", &p.date_of_birth, "Date of birth is required");
  v.require("city", &p.city, "City is required");
  v.require("state", &p.state, "State is required");
  v.require("country", &p.country, "Country is required");

  if kind == PersonKind::Doctors {
    let opt = |o: &Option<String>| o.clone().unwrap_or_default();
    v.require("specialization", &opt(&p.specialization), "Specialization is required");
    v.require("bloodGroup", &opt(&p.blood_group), "Blood group is required");
    v.date("joiningDate", &opt(&p.joining_date), "Joining date is required");
  }

  if mode == FormMode::Add {
    let password = p.password.as_deref().unwrap_or_default();
    if v.require("password", password, "Password is required")
      && password.chars().count() < MIN_PASSWORD_LEN
    {
      v.fail("password", "Password must be at least 6 characters long.");
    }
  }
  v
}

/// Patient feedback form. Field names: `name`, `email`, `phone`, `doctor`,
/// `rating`.
pub fn feedback(f: &Feedback) -> Validation {
  let mut v = Validation::default();
  v.require("name", &f.name, "Name is required.");
  if !is_valid_email(&f.email) {
    v.fail("email", "Email is not valid.");
  }
  v.phone("phone", &f.phone);
  v.require("doctor", &f.doctor, "Please select a doctor.");
  if !(f.rating > 0.0) {
    v.fail("rating", "Please provide a rating.");
  } else if f.rating > MAX_RATING || (f.rating * 2.0).fract() != 0.0 {
    v.fail("rating", "Rating must be between 0.5 and 5 in steps of 0.5.");
  }
  v
}

/// Prescription form. Field names: `appointment`, `medicines`.
pub fn prescription(appointment: Option<i64>, medicines: &[String]) -> Validation {
  let mut v = Validation::default();
  if appointment.is_none() {
    v.fail("appointment", "Please select an appointment.");
  }
  if !medicines.iter().any(|m| !m.trim().is_empty()) {
    v.fail("medicines", "Please enter at least one medicine.");
  }
  v
}

/// Appointment booking form. Field names: `doctorName`, `date`, `time`.
pub fn appointment_request(r: &AppointmentRequest) -> Validation {
  let mut v = Validation::default();
  v.require("doctorName", &r.doctor_name, "Please select a doctor.");
  v.date("date", &r.date, "Date is required");
  v.require("time", &r.time, "Time is required");
  v
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_feedback() -> Feedback {
    Feedback {
      name:     "Ada".into(),
      email:    "ada@example.com".into(),
      phone:    "0123456789".into(),
      doctor:   "Dr. House".into(),
      rating:   4.5,
      comments: String::new(),
    }
  }

  fn valid_patient() -> Person {
    Person {
      first_name: "Ada".into(),
      last_name: "Lovelace".into(),
      email: "ada@example.com".into(),
      phone_number: "0123456789".into(),
      gender: "Female".into(),
      date_of_birth: "1815-12-10".into(),
      city: "London".into(),
      state: "Greater London".into(),
      country: "UK".into(),
      password: Some("secret1".into()),
      ..Person::default()
    }
  }

  #[test]
  fn invalid_emails_are_rejected() {
    for bad in ["", "plain", "a@b", "a b@c.d", "@c.d", "a@.d", "a@@b.c"] {
      let mut f = valid_feedback();
      f.email = bad.into();
      let v = feedback(&f);
      assert!(!v.is_valid(), "{bad:?} should be invalid");
      assert!(v.error("email").is_some(), "{bad:?} should set errors.email");
    }
    assert!(feedback(&valid_feedback()).is_valid());
  }

  #[test]
  fn phone_must_be_exactly_ten_digits() {
    for (phone, ok) in [
      ("0123456789", true),
      ("012345678", false),
      ("01234567890", false),
      ("", false),
      ("01234abcde", false),
    ] {
      let mut f = valid_feedback();
      f.phone = phone.into();
      assert_eq!(feedback(&f).error("phone").is_none(), ok, "{phone:?}");
    }
  }

  #[test]
  fn zero_rating_blocks_feedback() {
    let mut f = valid_feedback();
    f.rating = 0.0;
    let v = feedback(&f);
    assert!(!v.is_valid());
    assert!(!v.error("rating").unwrap().is_empty());
  }

  #[test]
  fn rating_must_be_half_steps_up_to_five() {
    for (rating, ok) in [(0.5, true), (5.0, true), (3.25, false), (5.5, false), (-1.0, false)] {
      let mut f = valid_feedback();
      f.rating = rating;
      assert_eq!(feedback(&f).error("rating").is_none(), ok, "{rating}");
    }
  }

  #[test]
  fn login_rules() {
    assert!(login("a@b.co", "123456").is_valid());
    assert!(login("", "").error("email").is_some());
    assert_eq!(
      login("nope", "123456").error("email"),
      Some("Please enter a valid email address.")
    );
    assert!(login("a@b.co", "123").error("password").is_some());
  }

  #[test]
  fn patient_add_requires_password_but_edit_does_not() {
    let mut p = valid_patient();
    assert!(person(&p, PersonKind::Patients, FormMode::Add).is_valid());
    p.password = None;
    assert!(person(&p, PersonKind::Patients, FormMode::Add).error("password").is_some());
    assert!(person(&p, PersonKind::Patients, FormMode::Edit).is_valid());
  }

  #[test]
  fn doctor_needs_role_specific_fields() {
    let p = valid_patient();
    let v = person(&p, PersonKind::Doctors, FormMode::Add);
    assert!(v.error("specialization").is_some());
    assert!(v.error("bloodGroup").is_some());
    assert!(v.error("joiningDate").is_some());

    let doc = Person {
      specialization: Some("Neurology".into()),
      blood_group: Some("O+".into()),
      joining_date: Some("2020-01-01".into()),
      ..p
    };
    assert!(person(&doc, PersonKind::Doctors, FormMode::Add).is_valid());
  }

  #[test]
  fn bad_dates_are_flagged() {
    let mut p = valid_patient();
    p.date_of_birth = "10/12/1815".into();
    assert_eq!(
      person(&p, PersonKind::Patients, FormMode::Edit).error("dateOfBirth"),
      Some("Date must be in YYYY-MM-DD format")
    );
  }

  #[test]
  fn prescription_needs_appointment_and_a_medicine() {
    let v = prescription(None, &["  ".into()]);
    assert!(v.error("appointment").is_some());
    assert!(v.error("medicines").is_some());
    assert!(prescription(Some(3), &["".into(), "Ibuprofen".into()]).is_valid());
  }

  #[test]
  fn booking_requires_doctor_date_and_time() {
    let v = appointment_request(&AppointmentRequest::default());
    assert_eq!(v.errors().len(), 3);
    let ok = AppointmentRequest {
      patient_name: "Ada".into(),
      doctor_name:  "Dr. House".into(),
      date:         "2026-11-02".into(),
      time:         "10:30".into(),
    };
    assert!(appointment_request(&ok).is_valid());
  }
}
