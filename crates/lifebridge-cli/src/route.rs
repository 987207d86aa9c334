//! Path-based navigation, mounted under [`BASE`].
//!
//! Every screen has a path so it can be reached from the `g` prompt; role
//! landing paths come from [`Role::landing_route`].

use lifebridge_core::{model::PersonKind, role::Role};

pub const BASE: &str = "/LifeBridgeHospital";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home,
  Login,
  Register,
  Profile(Role),

  // admin
  Manage(PersonKind),
  AllAppointments,
  AllFeedback,

  // doctor
  DoctorAppointments,
  DoctorAppointment(i64),
  PrescribeFor(i64),
  NewPrescription,

  // patient
  MyAppointments,
  BookAppointment,
  MyPrescriptions,
  GiveFeedback,

  NotFound(String),
}

impl Route {
  /// Parse `path`, with or without the base prefix. Anything unrecognised
  /// becomes [`Route::NotFound`].
  pub fn parse(path: &str) -> Route {
    let trimmed = path.trim();
    let rel = trimmed.strip_prefix(BASE).unwrap_or(trimmed);
    let segments: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
      [] => Route::Home,
      ["login"] => Route::Login,
      ["register"] => Route::Register,
      [role, "profile"] => match profile_role(role) {
        Some(role) => Route::Profile(role),
        None => Route::NotFound(trimmed.to_string()),
      },

      ["admin", "appointments"] => Route::AllAppointments,
      ["admin", "feedback"] => Route::AllFeedback,
      ["admin", kind] => PersonKind::parse(kind)
        .map(Route::Manage)
        .unwrap_or_else(|_| Route::NotFound(trimmed.to_string())),

      ["doctor", "appointments"] => Route::DoctorAppointments,
      ["doctor", "appointments", id] => id
        .parse()
        .map(Route::DoctorAppointment)
        .unwrap_or_else(|_| Route::NotFound(trimmed.to_string())),
      ["doctor", "appointments", id, "prescription"] => id
        .parse()
        .map(Route::PrescribeFor)
        .unwrap_or_else(|_| Route::NotFound(trimmed.to_string())),
      ["doctor", "prescriptions", "new"] => Route::NewPrescription,

      ["patient", "appointments"] => Route::MyAppointments,
      ["patient", "appointments", "new"] => Route::BookAppointment,
      ["patient", "prescriptions"] => Route::MyPrescriptions,
      ["patient", "feedback"] => Route::GiveFeedback,

      _ => Route::NotFound(trimmed.to_string()),
    }
  }

  /// The path relative to [`BASE`].
  pub fn path(&self) -> String {
    match self {
      Route::Home => "/".into(),
      Route::Login => "/login".into(),
      Route::Register => "/register".into(),
      Route::Profile(role) => role.landing_route().into(),
      Route::Manage(kind) => format!("/admin/{kind}"),
      Route::AllAppointments => "/admin/appointments".into(),
      Route::AllFeedback => "/admin/feedback".into(),
      Route::DoctorAppointments => "/doctor/appointments".into(),
      Route::DoctorAppointment(id) => format!("/doctor/appointments/{id}"),
      Route::PrescribeFor(id) => format!("/doctor/appointments/{id}/prescription"),
      Route::NewPrescription => "/doctor/prescriptions/new".into(),
      Route::MyAppointments => "/patient/appointments".into(),
      Route::BookAppointment => "/patient/appointments/new".into(),
      Route::MyPrescriptions => "/patient/prescriptions".into(),
      Route::GiveFeedback => "/patient/feedback".into(),
      Route::NotFound(path) => path.clone(),
    }
  }

  /// The path including [`BASE`].
  pub fn full_path(&self) -> String {
    match self {
      Route::NotFound(path) => path.clone(),
      _ => format!("{BASE}{}", self.path()),
    }
  }

  /// Whether the route can be shown without a session.
  pub fn is_public(&self) -> bool {
    matches!(self, Route::Home | Route::Login | Route::Register | Route::NotFound(_))
  }

  /// The role a route belongs to, if it is role-specific.
  pub fn owner(&self) -> Option<Role> {
    match self {
      Route::Profile(role) => Some(*role),
      Route::Manage(_) | Route::AllAppointments | Route::AllFeedback => Some(Role::Admin),
      Route::DoctorAppointments
      | Route::DoctorAppointment(_)
      | Route::PrescribeFor(_)
      | Route::NewPrescription => Some(Role::Doctor),
      Route::MyAppointments
      | Route::BookAppointment
      | Route::MyPrescriptions
      | Route::GiveFeedback => Some(Role::Patient),
      Route::Home | Route::Login | Route::Register | Route::NotFound(_) => None,
    }
  }

  /// Short title for the header tab bar.
  pub fn title(&self) -> String {
    match self {
      Route::Home => "Home".into(),
      Route::Login => "Login".into(),
      Route::Register => "Register".into(),
      Route::Profile(_) => "Profile".into(),
      Route::Manage(PersonKind::Staff) => "Staff".into(),
      Route::Manage(kind) => {
        let noun = kind.noun();
        let mut title = noun[..1].to_uppercase();
        title.push_str(&noun[1..]);
        title.push('s');
        title
      }
      Route::AllAppointments | Route::DoctorAppointments | Route::MyAppointments => {
        "Appointments".into()
      }
      Route::AllFeedback => "Feedback".into(),
      Route::DoctorAppointment(id) => format!("Appointment #{id}"),
      Route::PrescribeFor(_) | Route::NewPrescription => "Prescribe".into(),
      Route::BookAppointment => "Book".into(),
      Route::MyPrescriptions => "Prescriptions".into(),
      Route::GiveFeedback => "Feedback".into(),
      Route::NotFound(_) => "Not found".into(),
    }
  }
}

fn profile_role(segment: &str) -> Option<Role> {
  let path = format!("/{segment}/profile");
  Role::all().find(|r| r.landing_route() == path)
}

/// The tabs shown to a signed-in user of `role`.
pub fn menu(role: Role) -> Vec<Route> {
  let mut tabs = vec![Route::Profile(role)];
  match role {
    Role::Admin => tabs.extend([
      Route::Manage(PersonKind::Patients),
      Route::Manage(PersonKind::Doctors),
      Route::Manage(PersonKind::Nurses),
      Route::Manage(PersonKind::Staff),
      Route::AllAppointments,
      Route::AllFeedback,
    ]),
    Role::Doctor => tabs.extend([Route::DoctorAppointments, Route::NewPrescription]),
    Role::Patient => tabs.extend([
      Route::MyAppointments,
      Route::BookAppointment,
      Route::MyPrescriptions,
      Route::GiveFeedback,
    ]),
    Role::Nurse | Role::Staff => {}
  }
  tabs
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn named_routes_parse_and_print() {
    for path in [
      "/",
      "/login",
      "/register",
      "/admin/profile",
      "/doctor/profile",
      "/patient/profile",
      "/nurse/profile",
      "/staff/profile",
      "/doctor/appointments",
      "/doctor/appointments/12",
      "/doctor/appointments/12/prescription",
      "/doctor/prescriptions/new",
      "/admin/doctors",
      "/patient/appointments/new",
    ] {
      assert_eq!(Route::parse(path).path(), path);
    }
  }

  #[test]
  fn base_prefix_is_optional() {
    assert_eq!(Route::parse("/LifeBridgeHospital/doctor/profile"), Route::Profile(Role::Doctor));
    assert_eq!(Route::parse("/LifeBridgeHospital"), Route::Home);
    assert_eq!(Route::Login.full_path(), "/LifeBridgeHospital/login");
  }

  #[test]
  fn unknown_paths_are_not_found() {
    assert_eq!(Route::parse("/janitor/profile"), Route::NotFound("/janitor/profile".into()));
    assert!(matches!(Route::parse("/doctor/appointments/abc"), Route::NotFound(_)));
    assert!(matches!(Route::parse("/nowhere"), Route::NotFound(_)));
    assert!(matches!(Route::parse("/admin/janitors"), Route::NotFound(_)));
  }

  #[test]
  fn every_role_lands_on_its_own_profile() {
    for role in Role::all() {
      assert_eq!(Route::parse(role.landing_route()), Route::Profile(role));
      assert_eq!(menu(role)[0], Route::Profile(role));
      assert_eq!(Route::Profile(role).owner(), Some(role));
    }
  }

  #[test]
  fn tab_titles() {
    assert_eq!(Route::Manage(PersonKind::Doctors).title(), "Doctors");
    assert_eq!(Route::Manage(PersonKind::Staff).title(), "Staff");
  }
}
