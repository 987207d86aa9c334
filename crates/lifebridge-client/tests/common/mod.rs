//! In-process fake of the hospital REST API.

#![allow(dead_code)]

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard},
};

use axum::{
  Json, Router,
  extract::{Path, Request, State},
  http::{StatusCode, header},
  middleware::{self, Next},
  response::{IntoResponse, Response},
  routing::{delete, get, post, put},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use lifebridge_client::{ApiClient, ClientConfig, SessionStore};
use lifebridge_core::model::{Appointment, Feedback, LoginRequest, Person};
use serde_json::json;

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
  pub method: String,
  pub path:   String,
  pub auth:   Option<String>,
}

#[derive(Default)]
pub struct Db {
  pub people:         HashMap<String, Vec<Person>>,
  pub appointments:   Vec<Appointment>,
  pub feedback:       Vec<Feedback>,
  pub hits:           Vec<Hit>,
  /// Email `mydetails` answers for.
  pub me:             Option<String>,
  /// Token handed out by `/api/login`.
  pub login_token:    String,
  pub login_role:     String,
  /// Status and message every `update` is rejected with.
  pub reject_updates: Option<(u16, String)>,
}

#[derive(Clone, Default)]
pub struct Backend(Arc<Mutex<Db>>);

impl Backend {
  pub fn state(&self) -> MutexGuard<'_, Db> { self.0.lock().unwrap() }

  pub fn hits(&self) -> Vec<Hit> { self.state().hits.clone() }

  /// `METHOD path` of every request so far.
  pub fn calls(&self) -> Vec<String> {
    self
      .hits()
      .into_iter()
      .map(|h| format!("{} {}", h.method, h.path))
      .collect()
  }

  pub fn seed(&self, kind: &str, people: Vec<Person>) {
    self.state().people.insert(kind.to_string(), people);
  }
}

fn message(status: u16, text: &str) -> Response {
  let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
  (status, Json(json!({ "message": text }))).into_response()
}

async fn record(State(backend): State<Backend>, req: Request, next: Next) -> Response {
  let auth = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  backend.state().hits.push(Hit {
    method: req.method().to_string(),
    path: req.uri().path().to_string(),
    auth,
  });
  next.run(req).await
}

async fn login(State(backend): State<Backend>, Json(req): Json<LoginRequest>) -> Response {
  if req.password == "wrong-password" {
    return message(401, "Bad credentials");
  }
  let state = backend.state();
  Json(json!({ "token": state.login_token, "role": state.login_role, "email": req.email }))
    .into_response()
}

async fn register(
  State(backend): State<Backend>,
  Path(kind): Path<String>,
  Json(person): Json<Person>,
) -> Response {
  let mut state = backend.state();
  let rows = state.people.entry(kind).or_default();
  if rows.iter().any(|p| p.email == person.email) {
    return message(409, "Email already registered");
  }
  rows.push(Person { password: None, ..person });
  StatusCode::CREATED.into_response()
}

async fn all(State(backend): State<Backend>, Path(kind): Path<String>) -> Json<Vec<Person>> {
  Json(backend.state().people.get(&kind).cloned().unwrap_or_default())
}

async fn mine(State(backend): State<Backend>, Path(kind): Path<String>) -> Response {
  let state = backend.state();
  let found = state.me.as_ref().and_then(|me| {
    state
      .people
      .get(&kind)
      .and_then(|rows| rows.iter().find(|p| &p.email == me))
  });
  match found {
    Some(p) => Json(p.clone()).into_response(),
    None => message(404, "Not found"),
  }
}

async fn update(
  State(backend): State<Backend>,
  Path((kind, email)): Path<(String, String)>,
  Json(person): Json<Person>,
) -> Response {
  let mut state = backend.state();
  if let Some((status, text)) = state.reject_updates.clone() {
    return message(status, &text);
  }
  let Some(row) = state
    .people
    .get_mut(&kind)
    .and_then(|rows| rows.iter_mut().find(|p| p.email == email))
  else {
    return message(404, "Not found");
  };
  *row = person;
  StatusCode::OK.into_response()
}

async fn remove(
  State(backend): State<Backend>,
  Path((kind, email)): Path<(String, String)>,
) -> StatusCode {
  if let Some(rows) = backend.state().people.get_mut(&kind) {
    rows.retain(|p| p.email != email);
  }
  StatusCode::NO_CONTENT
}

async fn my_appointments(State(backend): State<Backend>, req: Request) -> Response {
  if !req.headers().contains_key(header::AUTHORIZATION) {
    return message(401, "Unauthorized");
  }
  Json(backend.state().appointments.clone()).into_response()
}

async fn submit_feedback(State(backend): State<Backend>, Json(f): Json<Feedback>) -> StatusCode {
  backend.state().feedback.push(f);
  StatusCode::CREATED
}

async fn list_feedback(State(backend): State<Backend>) -> Json<Vec<Feedback>> {
  Json(backend.state().feedback.clone())
}

pub fn router(backend: Backend) -> Router {
  let api = Router::new()
    .route("/login", post(login))
    .route("/appointments/my-appointments", get(my_appointments))
    .route("/feedback", post(submit_feedback).get(list_feedback))
    .route("/{kind}/register", post(register))
    .route("/{kind}/all", get(all))
    .route("/{kind}/mydetails", get(mine))
    .route("/{kind}/update/{email}", put(update))
    .route("/{kind}/delete/{email}", delete(remove));
  Router::new()
    .nest("/hospital/api", api)
    .layer(middleware::from_fn_with_state(backend.clone(), record))
    .with_state(backend)
}

/// Serve `backend` on an ephemeral port; returns the base URL.
pub async fn serve(backend: Backend) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let app = router(backend);
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}/hospital")
}

pub fn config(base_url: String) -> ClientConfig {
  ClientConfig { base_url, timeout_secs: 5, ..ClientConfig::default() }
}

/// A fake backend, a client bound to it, and the client's session.
pub async fn connect() -> (Backend, ApiClient, SessionStore) {
  let backend = Backend::default();
  let base = serve(backend.clone()).await;
  let session = SessionStore::in_memory();
  let api = ApiClient::with_session(&config(base), session.clone()).unwrap();
  (backend, api, session)
}

/// An unsigned JWT-shaped token for `sub` with the given role and expiry.
pub fn token(sub: &str, role: &str, exp: i64) -> String {
  let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
  let claims = URL_SAFE_NO_PAD.encode(json!({ "sub": sub, "role": role, "exp": exp }).to_string());
  format!("{header}.{claims}.signature")
}

pub fn person(first: &str, email: &str) -> Person {
  Person {
    first_name: first.into(),
    last_name: "Doe".into(),
    email: email.into(),
    phone_number: "0123456789".into(),
    gender: "Female".into(),
    date_of_birth: "1985-04-12".into(),
    city: "Pune".into(),
    state: "MH".into(),
    country: "India".into(),
    ..Person::default()
  }
}

pub fn doctor(first: &str, email: &str) -> Person {
  Person {
    specialization: Some("Neurology".into()),
    blood_group: Some("B+".into()),
    joining_date: Some("2019-01-01".into()),
    ..person(first, email)
  }
}
