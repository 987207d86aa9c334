mod common;

use chrono::Utc;
use common::{connect, doctor, person, token};
use lifebridge_client::{
  ApiClient, Error,
  error::MSG_TRANSPORT,
  services::{AppointmentService, AuthService, FeedbackService, PeopleService},
};
use lifebridge_core::{
  model::{Feedback, LoginRequest, PersonKind},
  role::Role,
};

#[tokio::test]
async fn registered_patient_appears_in_fetch_all() {
  let (_backend, api, _session) = connect().await;
  let patients = PeopleService::new(api, PersonKind::Patients);

  let mut ada = person("Ada", "ada@example.com");
  ada.password = Some("secret1".into());
  patients.register(&ada).await.unwrap();

  let all = patients.fetch_all().await.unwrap();
  assert!(all.iter().any(|p| p.email == "ada@example.com"));
}

#[tokio::test]
async fn duplicate_registration_passes_the_server_message_through() {
  let (backend, api, _session) = connect().await;
  backend.seed("patients", vec![person("Ada", "ada@example.com")]);
  let patients = PeopleService::new(api, PersonKind::Patients);

  let mut ada = person("Ada", "ada@example.com");
  ada.password = Some("secret1".into());
  let err = patients.register(&ada).await.unwrap_err();
  assert_eq!(err.status(), Some(409));
  assert_eq!(err.user_message(), "Email already registered");
}

#[tokio::test]
async fn incomplete_registration_is_refused_before_sending() {
  let (backend, api, _session) = connect().await;
  let patients = PeopleService::new(api, PersonKind::Patients);

  let err = patients
    .register(&person("Ada", "not-an-email"))
    .await
    .unwrap_err();
  let Error::Invalid(check) = &err else { panic!("expected a validation error, got {err:?}") };
  assert!(check.error("email").is_some());
  assert!(check.error("password").is_some());
  assert!(backend.hits().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached_at_send_time() {
  let (backend, api, session) = connect().await;
  let appointments = AppointmentService::new(api);

  let t = token("ada@example.com", "ROLE_PATIENT", Utc::now().timestamp() + 3600);
  session.set_token(&t).unwrap();
  appointments.fetch_mine(Role::Patient).await.unwrap();

  session.clear().unwrap();
  let err = appointments.fetch_mine(Role::Patient).await.unwrap_err();
  assert!(err.is_auth());

  let hits = backend.hits();
  assert_eq!(hits[0].path, "/hospital/api/appointments/my-appointments");
  assert_eq!(hits[0].auth.as_deref(), Some(format!("Bearer {t}").as_str()));
  assert_eq!(hits[1].auth, None);
}

#[tokio::test]
async fn update_keeps_the_email_and_never_sends_a_password() {
  let (backend, api, _session) = connect().await;
  backend.seed("doctors", vec![doctor("Gregory", "house@h.org")]);
  let doctors = PeopleService::new(api, PersonKind::Doctors);

  let mut edited = doctor("Greg", "changed@h.org");
  edited.password = Some("hunter22".into());
  doctors.update("house@h.org", &edited).await.unwrap();

  let stored = backend.state().people["doctors"][0].clone();
  assert_eq!(stored.email, "house@h.org");
  assert_eq!(stored.first_name, "Greg");
  assert_eq!(stored.password, None);
}

#[tokio::test]
async fn doctors_are_removed_by_email() {
  let (backend, api, _session) = connect().await;
  backend.seed("doctors", vec![doctor("Gregory", "house@h.org"), doctor("Lisa", "cuddy@h.org")]);
  let doctors = PeopleService::new(api, PersonKind::Doctors);

  doctors.remove("house@h.org").await.unwrap();
  let left = doctors.fetch_all().await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].email, "cuddy@h.org");
  assert!(
    backend
      .calls()
      .contains(&"DELETE /hospital/api/doctors/delete/house@h.org".to_string())
  );
}

#[tokio::test]
async fn feedback_round_trips() {
  let (_backend, api, _session) = connect().await;
  let feedback = FeedbackService::new(api);
  let f = Feedback {
    name:     "Ada".into(),
    email:    "ada@example.com".into(),
    phone:    "0123456789".into(),
    doctor:   "Dr. Grey".into(),
    rating:   4.5,
    comments: "Thorough".into(),
  };
  feedback.submit(&f).await.unwrap();
  assert_eq!(feedback.fetch_all().await.unwrap(), vec![f]);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let (_backend, api, session) = connect().await;
  let auth = AuthService::new(api, session);
  let err = auth
    .login(&LoginRequest { email: "ada@example.com".into(), password: "wrong-password".into() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn empty_token_is_a_decode_error() {
  let (backend, api, session) = connect().await;
  backend.state().login_role = "ROLE_ADMIN".into();
  let auth = AuthService::new(api, session);
  let err = auth
    .login(&LoginRequest { email: "root@h.org".into(), password: "secret1".into() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
  // Bind and release a port so nothing is listening on it.
  let port = {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
  };
  let api = ApiClient::new(
    &common::config(format!("http://127.0.0.1:{port}/hospital")),
    lifebridge_client::http::NoAuth,
  )
  .unwrap();
  let err = PeopleService::new(api, PersonKind::Nurses)
    .fetch_all()
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Transport(_)));
  assert_eq!(err.user_message(), MSG_TRANSPORT);
}
