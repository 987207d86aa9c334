//! Field layouts and keyboard editing for every form the TUI shows.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lifebridge_client::views::login::LoginView;
use lifebridge_core::{
  model::{
    Appointment, AppointmentRequest, AppointmentStatus, BLOOD_GROUPS, Feedback, GENDERS, Person,
    PersonKind, SPECIALIZATIONS,
  },
  validate::FormMode,
};

const STATUSES: [&str; 4] = ["PENDING", "SCHEDULED", "COMPLETED", "CANCELLED"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Secret,
  /// Fixed options cycled with ←/→.
  Choice(&'static [&'static str]),
  /// Options loaded at runtime; the screen does the cycling.
  Picker,
  /// Half-star rating; the screen does the stepping.
  Rating,
  /// Shown, never edited.
  ReadOnly,
}

/// One row of a form. `key` doubles as the validation field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  pub key:   &'static str,
  pub label: &'static str,
  pub kind:  FieldKind,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
  FieldSpec { key, label, kind }
}

/// A form value the editor can read and write by field key.
pub trait Editable {
  fn value(&self, key: &str) -> String;
  fn set_value(&mut self, key: &str, value: String);
}

// ─── Layouts ─────────────────────────────────────────────────────────────────

pub const LOGIN: [FieldSpec; 2] = [
  field("email", "Email", FieldKind::Text),
  field("password", "Password", FieldKind::Secret),
];

pub const BOOKING: [FieldSpec; 4] = [
  field("patientName", "Patient", FieldKind::ReadOnly),
  field("doctorName", "Doctor", FieldKind::Picker),
  field("date", "Date (YYYY-MM-DD)", FieldKind::Text),
  field("time", "Time (HH:MM)", FieldKind::Text),
];

pub const FEEDBACK: [FieldSpec; 6] = [
  field("name", "Name", FieldKind::Text),
  field("email", "Email", FieldKind::Text),
  field("phone", "Phone", FieldKind::Text),
  field("doctor", "Doctor", FieldKind::Picker),
  field("rating", "Rating", FieldKind::Rating),
  field("comments", "Comments", FieldKind::Text),
];

pub fn person(kind: PersonKind, mode: FormMode) -> Vec<FieldSpec> {
  let email = match mode {
    FormMode::Add => FieldKind::Text,
    FormMode::Edit => FieldKind::ReadOnly,
  };
  let mut fields = vec![
    field("firstName", "First name", FieldKind::Text),
    field("lastName", "Last name", FieldKind::Text),
    field("email", "Email", email),
    field("phoneNumber", "Phone", FieldKind::Text),
    field("gender", "Gender", FieldKind::Choice(&GENDERS)),
    field("dateOfBirth", "Date of birth", FieldKind::Text),
    field("address", "Address", FieldKind::Text),
    field("city", "City", FieldKind::Text),
    field("state", "State", FieldKind::Text),
    field("country", "Country", FieldKind::Text),
  ];
  if kind == PersonKind::Doctors {
    fields.extend([
      field("specialization", "Specialization", FieldKind::Choice(&SPECIALIZATIONS)),
      field("bloodGroup", "Blood group", FieldKind::Choice(&BLOOD_GROUPS)),
      field("joiningDate", "Joining date", FieldKind::Text),
    ]);
  }
  if mode == FormMode::Add {
    fields.push(field("password", "Password", FieldKind::Secret));
  }
  fields
}

pub fn appointment(mode: FormMode) -> Vec<FieldSpec> {
  match mode {
    FormMode::Add => vec![
      field("patientName", "Patient", FieldKind::Text),
      field("doctorName", "Doctor", FieldKind::Text),
      field("date", "Date (YYYY-MM-DD)", FieldKind::Text),
      field("time", "Time (HH:MM)", FieldKind::Text),
    ],
    FormMode::Edit => vec![
      field("patientName", "Patient", FieldKind::ReadOnly),
      field("doctorName", "Doctor", FieldKind::ReadOnly),
      field("date", "Date", FieldKind::ReadOnly),
      field("time", "Time", FieldKind::ReadOnly),
      field("status", "Status", FieldKind::Choice(&STATUSES)),
    ],
  }
}

// ─── Editable impls ──────────────────────────────────────────────────────────

fn opt(value: &Option<String>) -> String { value.clone().unwrap_or_default() }

fn some(value: String) -> Option<String> { (!value.is_empty()).then_some(value) }

impl Editable for Person {
  fn value(&self, key: &str) -> String {
    match key {
      "firstName" => self.first_name.clone(),
      "lastName" => self.last_name.clone(),
      "email" => self.email.clone(),
      "phoneNumber" => self.phone_number.clone(),
      "gender" => self.gender.clone(),
      "dateOfBirth" => self.date_of_birth.clone(),
      "address" => opt(&self.address),
      "city" => self.city.clone(),
      "state" => self.state.clone(),
      "country" => self.country.clone(),
      "specialization" => opt(&self.specialization),
      "bloodGroup" => opt(&self.blood_group),
      "joiningDate" => opt(&self.joining_date),
      "password" => opt(&self.password),
      _ => String::new(),
    }
  }

  fn set_value(&mut self, key: &str, value: String) {
    match key {
      "firstName" => self.first_name = value,
      "lastName" => self.last_name = value,
      "email" => self.email = value,
      "phoneNumber" => self.phone_number = value,
      "gender" => self.gender = value,
      "dateOfBirth" => self.date_of_birth = value,
      "address" => self.address = some(value),
      "city" => self.city = value,
      "state" => self.state = value,
      "country" => self.country = value,
      "specialization" => self.specialization = some(value),
      "bloodGroup" => self.blood_group = some(value),
      "joiningDate" => self.joining_date = some(value),
      "password" => self.password = some(value),
      _ => {}
    }
  }
}

impl Editable for Appointment {
  fn value(&self, key: &str) -> String {
    match key {
      "patientName" => self.patient_name.clone(),
      "doctorName" => self.doctor_name.clone(),
      "date" => self.date.clone(),
      "time" => self.time.clone(),
      "status" => self.status.to_string(),
      _ => String::new(),
    }
  }

  fn set_value(&mut self, key: &str, value: String) {
    match key {
      "patientName" => self.patient_name = value,
      "doctorName" => self.doctor_name = value,
      "date" => self.date = value,
      "time" => self.time = value,
      "status" => {
        if let Ok(status) = AppointmentStatus::parse(&value) {
          self.status = status;
        }
      }
      _ => {}
    }
  }
}

impl Editable for AppointmentRequest {
  fn value(&self, key: &str) -> String {
    match key {
      "patientName" => self.patient_name.clone(),
      "doctorName" => self.doctor_name.clone(),
      "date" => self.date.clone(),
      "time" => self.time.clone(),
      _ => String::new(),
    }
  }

  fn set_value(&mut self, key: &str, value: String) {
    match key {
      "date" => self.date = value,
      "time" => self.time = value,
      _ => {}
    }
  }
}

impl Editable for Feedback {
  fn value(&self, key: &str) -> String {
    match key {
      "name" => self.name.clone(),
      "email" => self.email.clone(),
      "phone" => self.phone.clone(),
      "doctor" => self.doctor.clone(),
      "rating" => stars(self.rating),
      "comments" => self.comments.clone(),
      _ => String::new(),
    }
  }

  fn set_value(&mut self, key: &str, value: String) {
    match key {
      "name" => self.name = value,
      "email" => self.email = value,
      "phone" => self.phone = value,
      "comments" => self.comments = value,
      _ => {}
    }
  }
}

impl Editable for LoginView {
  fn value(&self, key: &str) -> String {
    match key {
      "email" => self.email.clone(),
      "password" => self.password.clone(),
      _ => String::new(),
    }
  }

  fn set_value(&mut self, key: &str, value: String) {
    match key {
      "email" => self.email = value,
      "password" => self.password = value,
      _ => {}
    }
  }
}

/// `★★★½☆ 3.5`
pub fn stars(rating: f32) -> String {
  let halves = (rating * 2.0).round().clamp(0.0, 10.0) as usize;
  let mut out = "★".repeat(halves / 2);
  if halves % 2 == 1 {
    out.push('½');
  }
  out.push_str(&"☆".repeat(5 - halves.div_ceil(2)));
  format!("{out} {rating:.1}")
}

// ─── Key handling ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
  /// The key changed the value or the focus.
  Handled,
  Submit,
  Cancel,
  /// ←/→ on a picker or rating field; the screen owns those options.
  Cycle { key: &'static str, forward: bool },
  Ignored,
}

/// Apply `key` to the focused field of `target`.
pub fn edit(
  target: &mut impl Editable,
  fields: &[FieldSpec],
  focus: &mut usize,
  key: KeyEvent,
) -> Edit {
  if fields.is_empty() {
    return Edit::Ignored;
  }
  *focus = (*focus).min(fields.len() - 1);
  let spec = fields[*focus];

  match key.code {
    KeyCode::Enter => Edit::Submit,
    KeyCode::Esc => Edit::Cancel,
    KeyCode::Down | KeyCode::Tab => {
      *focus = (*focus + 1) % fields.len();
      Edit::Handled
    }
    KeyCode::Up | KeyCode::BackTab => {
      *focus = (*focus + fields.len() - 1) % fields.len();
      Edit::Handled
    }
    KeyCode::Left | KeyCode::Right => {
      let forward = key.code == KeyCode::Right;
      match spec.kind {
        FieldKind::Choice(options) => {
          let current = target.value(spec.key);
          let at = options.iter().position(|o| *o == current);
          if let Some(next) = lifebridge_client::views::cycle_index(options.len(), at, forward) {
            target.set_value(spec.key, options[next].to_string());
          }
          Edit::Handled
        }
        FieldKind::Picker | FieldKind::Rating => Edit::Cycle { key: spec.key, forward },
        _ => Edit::Ignored,
      }
    }
    KeyCode::Backspace if is_typed(spec.kind) => {
      let mut value = target.value(spec.key);
      value.pop();
      target.set_value(spec.key, value);
      Edit::Handled
    }
    KeyCode::Char(c)
      if is_typed(spec.kind)
        && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
    {
      let mut value = target.value(spec.key);
      value.push(c);
      target.set_value(spec.key, value);
      Edit::Handled
    }
    _ => Edit::Ignored,
  }
}

fn is_typed(kind: FieldKind) -> bool { matches!(kind, FieldKind::Text | FieldKind::Secret) }

/// Type into or erase from a bare string, for list-shaped inputs such as
/// medicine lines.
pub fn edit_text(value: &mut String, key: KeyEvent) -> bool {
  match key.code {
    KeyCode::Backspace => {
      value.pop();
      true
    }
    KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
      value.push(c);
      true
    }
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  #[test]
  fn typing_fills_the_focused_field() {
    let mut login = LoginView::new();
    let mut focus = 0;
    for c in "ada@x.io".chars() {
      edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Char(c)));
    }
    edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Tab));
    edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Char('p')));
    edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Backspace));
    edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Char('q')));
    assert_eq!(login.email, "ada@x.io");
    assert_eq!(login.password, "q");
    assert_eq!(edit(&mut login, &LOGIN, &mut focus, press(KeyCode::Enter)), Edit::Submit);
  }

  #[test]
  fn choices_cycle_and_read_only_fields_stay_put() {
    let mut doc = Person { email: "house@h.org".into(), ..Person::default() };
    let fields = person(PersonKind::Doctors, FormMode::Edit);
    let mut focus = fields.iter().position(|f| f.key == "email").unwrap();
    edit(&mut doc, &fields, &mut focus, press(KeyCode::Char('x')));
    assert_eq!(doc.email, "house@h.org");

    focus = fields.iter().position(|f| f.key == "bloodGroup").unwrap();
    edit(&mut doc, &fields, &mut focus, press(KeyCode::Right));
    assert_eq!(doc.blood_group.as_deref(), Some("A+"));
    edit(&mut doc, &fields, &mut focus, press(KeyCode::Left));
    assert_eq!(doc.blood_group.as_deref(), Some("O-"));
    assert!(!fields.iter().any(|f| f.key == "password"));
  }

  #[test]
  fn status_is_the_only_editable_appointment_field() {
    let mut appt = Appointment::default();
    let fields = appointment(FormMode::Edit);
    let mut focus = fields.len() - 1;
    edit(&mut appt, &fields, &mut focus, press(KeyCode::Right));
    assert_eq!(appt.status, AppointmentStatus::Scheduled);
  }

  #[test]
  fn pickers_are_left_to_the_screen() {
    let mut f = Feedback::default();
    let mut focus = 4;
    let got = edit(&mut f, &FEEDBACK, &mut focus, press(KeyCode::Right));
    assert_eq!(got, Edit::Cycle { key: "rating", forward: true });
  }

  #[test]
  fn control_chords_are_not_typed() {
    let mut text = String::from("ab");
    let chord = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
    assert!(!edit_text(&mut text, chord));
    assert_eq!(text, "ab");
  }

  #[test]
  fn stars_render_half_steps() {
    assert_eq!(stars(3.5), "★★★½☆ 3.5");
    assert_eq!(stars(0.0), "☆☆☆☆☆ 0.0");
    assert_eq!(stars(5.0), "★★★★★ 5.0");
  }
}
