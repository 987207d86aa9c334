mod common;

use chrono::{Duration, Utc};
use common::{connect, doctor, person, token};
use lifebridge_client::{
  services::{AuthService, FeedbackService, PeopleService},
  views::{Phase, feedback::FeedbackForm, login, profile::ProfileView, table::CrudTable},
};
use lifebridge_core::{
  model::{Feedback, PersonKind},
  role::Role,
};

#[tokio::test]
async fn admin_deletes_a_doctor_then_refetches_once() {
  let (backend, api, _session) = connect().await;
  backend.seed("doctors", vec![doctor("Gregory", "house@h.org"), doctor("Lisa", "cuddy@h.org")]);
  let doctors = PeopleService::new(api, PersonKind::Doctors);

  let mut table = CrudTable::new();
  table.load(&doctors).await;
  table.set_search("house");
  assert!(table.request_delete());
  assert!(table.confirm_delete(&doctors).await);

  assert_eq!(backend.calls(), [
    "GET /hospital/api/doctors/all",
    "DELETE /hospital/api/doctors/delete/house@h.org",
    "GET /hospital/api/doctors/all",
  ]);
  assert_eq!(table.phase(), &Phase::Loaded);
  assert_eq!(table.items().len(), 1);
}

#[tokio::test]
async fn rejected_profile_update_rolls_back_with_the_server_message() {
  let (backend, api, _session) = connect().await;
  backend.seed("patients", vec![person("Ada", "ada@example.com")]);
  {
    let mut state = backend.state();
    state.me = Some("ada@example.com".into());
    state.reject_updates = Some((400, "Phone number already in use".into()));
  }
  let patients = PeopleService::new(api, PersonKind::Patients);

  let mut view = ProfileView::new(PersonKind::Patients, Some("ada@example.com".into()));
  view.load(&patients).await;
  let before = view.record().cloned().unwrap();

  view.start_edit();
  view.draft_mut().unwrap().phone_number = "9876543210".into();
  assert!(!view.save(&patients).await);

  assert_eq!(view.record(), Some(&before));
  assert_eq!(view.notice().unwrap().message, "Phone number already in use");
  assert_eq!(backend.state().people["patients"][0].phone_number, "0123456789");
}

#[tokio::test]
async fn unrated_feedback_makes_no_request() {
  let (backend, api, _session) = connect().await;
  let service = FeedbackService::new(api);

  let mut form = FeedbackForm::new();
  form.form.value = Feedback {
    name:     "Ada".into(),
    email:    "ada@example.com".into(),
    phone:    "0123456789".into(),
    doctor:   "Dr. Grey".into(),
    rating:   0.0,
    comments: String::new(),
  };
  assert!(!form.submit(&service).await);
  assert!(form.form.errors().error("rating").is_some());
  assert!(backend.hits().is_empty());

  form.nudge_rating(true);
  assert!(form.submit(&service).await);
  assert_eq!(backend.calls(), ["POST /hospital/api/feedback"]);
}

#[tokio::test]
async fn expired_token_at_login_shows_session_expired() {
  let (backend, api, session) = connect().await;
  {
    let mut state = backend.state();
    state.login_token = token("ada@example.com", "ROLE_PATIENT", (Utc::now() - Duration::hours(1)).timestamp());
    state.login_role = "ROLE_PATIENT".into();
  }
  let auth = AuthService::new(api, session.clone());

  let mut view = login::LoginView::new();
  view.email = "ada@example.com".into();
  view.password = "secret1".into();
  let routed = view.submit(&auth, &session, Utc::now()).await;

  assert_eq!(routed, None);
  assert_eq!(view.notice().unwrap().message, login::MSG_EXPIRED);
  assert_eq!(session.token(), None);
}

#[tokio::test]
async fn fresh_token_routes_to_the_role_landing_page() {
  let (backend, api, session) = connect().await;
  {
    let mut state = backend.state();
    state.login_token = token("root@h.org", "ROLE_ADMIN", (Utc::now() + Duration::hours(1)).timestamp());
    state.login_role = "ROLE_ADMIN".into();
  }
  let auth = AuthService::new(api, session.clone());

  let mut view = login::LoginView::new();
  view.email = "root@h.org".into();
  view.password = "secret1".into();
  let routed = view.submit(&auth, &session, Utc::now()).await;

  assert_eq!(routed, Some(Role::Admin));
  assert_eq!(routed.map(Role::landing_route), Some("/admin/profile"));
  assert_eq!(session.role(), Some(Role::Admin));
  assert_eq!(session.subject_email().as_deref(), Some("root@h.org"));
}
