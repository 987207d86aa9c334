//! Patient self-registration.

use lifebridge_core::{
  model::{Person, PersonKind},
  validate::{self, FormMode},
};

use crate::{services::PeopleService, views::form::Form};

pub const REGISTERED: &str = "Registration successful! Please log in.";

pub type RegisterForm = Form<Person>;

pub fn begin_register(form: &mut RegisterForm) -> Option<Person> {
  form.begin(|p| validate::person(p, PersonKind::Patients, FormMode::Add))
}

pub fn finish_register(form: &mut RegisterForm, result: crate::Result<()>) -> bool {
  form.finish(result, REGISTERED, Person::default()).is_some()
}

/// Register the form's patient through `service` (a patients collection).
pub async fn register(form: &mut RegisterForm, service: &PeopleService) -> bool {
  let Some(person) = begin_register(form) else {
    return false;
  };
  let result = service.register(&person).await;
  finish_register(form, result)
}
