//! Person collections: patients, doctors, nurses, staff, admins.
//!
//! | Method | Path |
//! |--------|------|
//! | `POST`   | `/api/{kind}/register` |
//! | `GET`    | `/api/{kind}/all` |
//! | `GET`    | `/api/{kind}/mydetails` |
//! | `PUT`    | `/api/{kind}/update/{email}` |
//! | `DELETE` | `/api/{kind}/delete/{email}` |
//! | `GET`    | `/api/doctors/fetchAllDoctorNames` |

use std::future::Future;

use lifebridge_core::{
  model::{DoctorName, Person, PersonKind},
  validate::{self, FormMode, Validation},
};

use crate::{
  ApiClient, Error, Result,
  services::{Collection, CrudService},
};

#[derive(Clone)]
pub struct PeopleService {
  api:  ApiClient,
  kind: PersonKind,
}

impl PeopleService {
  pub fn new(api: ApiClient, kind: PersonKind) -> Self { Self { api, kind } }

  pub fn kind(&self) -> PersonKind { self.kind }

  /// Create a record. Refused without a request when `person` is not a
  /// complete new record for this collection.
  pub async fn register(&self, person: &Person) -> Result<()> {
    let check = validate::person(person, self.kind, FormMode::Add);
    if !check.is_valid() {
      return Err(Error::Invalid(check));
    }
    tracing::info!(kind = %self.kind, email = %person.email, "registering");
    self
      .api
      .post_unit(&["api", self.kind.as_ref(), "register"], person)
      .await
  }

  pub async fn fetch_all(&self) -> Result<Vec<Person>> {
    self.api.get(&["api", self.kind.as_ref(), "all"]).await
  }

  /// The caller's own record, identified by the server from the credential.
  pub async fn fetch_mine(&self) -> Result<Person> {
    self.api.get(&["api", self.kind.as_ref(), "mydetails"]).await
  }

  /// Update the record keyed by `email`. The email itself never changes.
  pub async fn update(&self, email: &str, person: &Person) -> Result<()> {
    tracing::info!(kind = %self.kind, %email, "updating");
    let mut body = person.clone();
    body.email = email.to_string();
    body.password = None;
    self
      .api
      .put_unit(&["api", self.kind.as_ref(), "update", email], &body)
      .await
  }

  pub async fn remove(&self, email: &str) -> Result<()> {
    tracing::info!(kind = %self.kind, %email, "deleting");
    self
      .api
      .delete(&["api", self.kind.as_ref(), "delete", email])
      .await
  }

  /// Display names of every doctor, for pickers.
  pub async fn doctor_names(&self) -> Result<Vec<String>> {
    let names: Vec<DoctorName> = self
      .api
      .get(&["api", PersonKind::Doctors.as_ref(), "fetchAllDoctorNames"])
      .await?;
    Ok(names.into_iter().map(|d| d.name).collect())
  }
}

impl Collection for PeopleService {
  type Item = Person;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Person>>> + Send + '_ {
    PeopleService::fetch_all(self)
  }
}

impl CrudService for PeopleService {
  fn key(item: &Person) -> String { item.email.clone() }

  fn validate(&self, item: &Person, mode: FormMode) -> Validation {
    validate::person(item, self.kind, mode)
  }

  fn register<'a>(&'a self, item: &'a Person) -> impl Future<Output = Result<()>> + Send + 'a {
    PeopleService::register(self, item)
  }

  fn update<'a>(
    &'a self,
    key: &'a str,
    item: &'a Person,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    PeopleService::update(self, key, item)
  }

  fn remove<'a>(&'a self, key: &'a str) -> impl Future<Output = Result<()>> + Send + 'a {
    PeopleService::remove(self, key)
  }
}
