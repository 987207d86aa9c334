//! Domain services: one module per entity.
//!
//! Each function maps one business intent onto one REST call. Services never
//! retry and never cache; every call reflects the server's state at the
//! moment it runs.
//!
//! "Mine" queries always go to server-scoped endpoints that identify the
//! caller from the bearer credential. Decoded claims are only ever used for
//! display.

use std::future::Future;

use lifebridge_core::{
  search::Searchable,
  validate::{FormMode, Validation},
};

use crate::Result;

pub mod appointments;
pub mod auth;
pub mod feedback;
pub mod people;
pub mod prescriptions;

pub use appointments::{AppointmentService, MyAppointments};
pub use auth::AuthService;
pub use feedback::FeedbackService;
pub use people::PeopleService;
pub use prescriptions::{MyPrescriptions, PrescriptionService};

// ─── Traits ───────────────────────────────────────────────────────────────────

/// A fetchable collection of records.
pub trait Collection: Send + Sync {
  type Item: Clone + Searchable + Send + Sync + 'static;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Self::Item>>> + Send + '_;
}

/// A collection that also supports create, update and delete.
pub trait CrudService: Collection {
  /// The key used in update/delete paths (email for people, id otherwise).
  fn key(item: &Self::Item) -> String;

  /// Client-side validation for the add/edit form.
  fn validate(&self, _item: &Self::Item, _mode: FormMode) -> Validation { Validation::default() }

  fn register<'a>(&'a self, item: &'a Self::Item) -> impl Future<Output = Result<()>> + Send + 'a;

  fn update<'a>(
    &'a self,
    key: &'a str,
    item: &'a Self::Item,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  fn remove<'a>(&'a self, key: &'a str) -> impl Future<Output = Result<()>> + Send + 'a;
}
