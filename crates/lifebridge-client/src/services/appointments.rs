//! Appointments.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/api/appointments` | Body: [`AppointmentRequest`] |
//! | `GET`    | `/api/appointments/all` | Admin |
//! | `GET`    | `/api/appointments/my-appointments` | Patient, server-scoped |
//! | `GET`    | `/api/appointments/doctor-appointments` | Doctor, server-scoped |
//! | `GET`    | `/api/appointments/{id}` | |
//! | `PUT`    | `/api/appointments/{id}/status?status=` | Doctor or admin |
//! | `DELETE` | `/api/appointments/{id}` | Admin |

use std::future::Future;

use lifebridge_core::{
  model::{Appointment, AppointmentRequest, AppointmentStatus},
  role::Role,
  validate::{self, FormMode, Validation},
};

use crate::{
  ApiClient, Error, Result,
  services::{Collection, CrudService},
};

#[derive(Clone)]
pub struct AppointmentService {
  api: ApiClient,
}

impl AppointmentService {
  pub fn new(api: ApiClient) -> Self { Self { api } }

  pub async fn book(&self, request: &AppointmentRequest) -> Result<Appointment> {
    tracing::info!(doctor = %request.doctor_name, date = %request.date, "booking appointment");
    self.api.post(&["api", "appointments"], request).await
  }

  pub async fn fetch_all(&self) -> Result<Vec<Appointment>> {
    self.api.get(&["api", "appointments", "all"]).await
  }

  /// Appointments belonging to the caller: a doctor's schedule or a
  /// patient's bookings.
  pub async fn fetch_mine(&self, role: Role) -> Result<Vec<Appointment>> {
    let scope = match role {
      Role::Doctor => "doctor-appointments",
      _ => "my-appointments",
    };
    self.api.get(&["api", "appointments", scope]).await
  }

  pub async fn get(&self, id: i64) -> Result<Appointment> {
    self.api.get(&["api", "appointments", &id.to_string()]).await
  }

  pub async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<()> {
    tracing::info!(id, %status, "updating appointment status");
    self
      .api
      .put_query(&["api", "appointments", &id.to_string(), "status"], &[(
        "status",
        status.as_ref(),
      )])
      .await
  }

  pub async fn remove(&self, id: i64) -> Result<()> {
    tracing::info!(id, "deleting appointment");
    self
      .api
      .delete(&["api", "appointments", &id.to_string()])
      .await
  }
}

fn parse_id(key: &str) -> Result<i64> {
  key
    .parse()
    .map_err(|_| Error::Decode(format!("invalid appointment id {key:?}")))
}

impl Collection for AppointmentService {
  type Item = Appointment;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Appointment>>> + Send + '_ {
    AppointmentService::fetch_all(self)
  }
}

impl CrudService for AppointmentService {
  fn key(item: &Appointment) -> String { item.id.to_string() }

  fn validate(&self, item: &Appointment, mode: FormMode) -> Validation {
    match mode {
      FormMode::Add => validate::appointment_request(&request_for(item)),
      FormMode::Edit => Validation::default(),
    }
  }

  fn register<'a>(&'a self, item: &'a Appointment) -> impl Future<Output = Result<()>> + Send + 'a {
    async move { self.book(&request_for(item)).await.map(|_| ()) }
  }

  /// Only the status of an existing appointment can change.
  fn update<'a>(
    &'a self,
    key: &'a str,
    item: &'a Appointment,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    async move { self.update_status(parse_id(key)?, item.status).await }
  }

  fn remove<'a>(&'a self, key: &'a str) -> impl Future<Output = Result<()>> + Send + 'a {
    async move { AppointmentService::remove(self, parse_id(key)?).await }
  }
}

fn request_for(item: &Appointment) -> AppointmentRequest {
  AppointmentRequest {
    patient_name: item.patient_name.clone(),
    doctor_name:  item.doctor_name.clone(),
    date:         item.date.clone(),
    time:         item.time.clone(),
  }
}

/// The caller's own appointments, as a [`Collection`].
#[derive(Clone)]
pub struct MyAppointments {
  service: AppointmentService,
  role:    Role,
}

impl MyAppointments {
  pub fn new(service: AppointmentService, role: Role) -> Self { Self { service, role } }
}

impl Collection for MyAppointments {
  type Item = Appointment;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Appointment>>> + Send + '_ {
    self.service.fetch_mine(self.role)
  }
}
