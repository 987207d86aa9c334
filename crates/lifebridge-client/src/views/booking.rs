//! Appointment booking by a patient.

use lifebridge_core::{
  model::{Appointment, AppointmentRequest},
  validate,
};

use crate::{
  services::AppointmentService,
  views::{cycle_index, form::Form},
};

pub const BOOKED: &str = "Appointment booked successfully!";

#[derive(Debug, Default)]
pub struct BookingForm {
  pub form:     Form<AppointmentRequest>,
  patient_name: String,
  doctors:      Vec<String>,
  doctor_index: Option<usize>,
}

impl BookingForm {
  /// A form booking on behalf of `patient_name` (taken from the profile).
  pub fn new(patient_name: impl Into<String>) -> Self {
    let patient_name = patient_name.into();
    Self {
      form: Form::new(Self::blank(&patient_name)),
      patient_name,
      doctors: Vec::new(),
      doctor_index: None,
    }
  }

  fn blank(patient_name: &str) -> AppointmentRequest {
    AppointmentRequest { patient_name: patient_name.to_string(), ..Default::default() }
  }

  pub fn patient_name(&self) -> &str { &self.patient_name }

  /// Fill in the patient once their profile has loaded.
  pub fn set_patient_name(&mut self, name: impl Into<String>) {
    self.patient_name = name.into();
    self.form.value.patient_name = self.patient_name.clone();
  }

  pub fn doctors(&self) -> &[String] { &self.doctors }

  pub fn set_doctors(&mut self, doctors: Vec<String>) {
    self.doctors = doctors;
    self.doctor_index = None;
    self.form.value.doctor_name.clear();
  }

  /// Cycle the doctor picker.
  pub fn cycle_doctor(&mut self, forward: bool) {
    let Some(next) = cycle_index(self.doctors.len(), self.doctor_index, forward) else {
      return;
    };
    self.doctor_index = Some(next);
    self.form.value.doctor_name = self.doctors[next].clone();
  }

  pub fn begin_submit(&mut self) -> Option<AppointmentRequest> {
    self.form.begin(validate::appointment_request)
  }

  pub fn finish_submit(&mut self, result: crate::Result<Appointment>) -> Option<Appointment> {
    let blank = Self::blank(&self.patient_name);
    let booked = self.form.finish(result, BOOKED, blank);
    if booked.is_some() {
      self.doctor_index = None;
    }
    booked
  }

  pub async fn submit(&mut self, service: &AppointmentService) -> Option<Appointment> {
    let request = self.begin_submit()?;
    let result = service.book(&request).await;
    self.finish_submit(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn picker_wraps_and_fills_the_doctor() {
    let mut b = BookingForm::new("Ada Lovelace");
    b.set_doctors(vec!["Dr. A".into(), "Dr. B".into()]);
    b.cycle_doctor(false);
    assert_eq!(b.form.value.doctor_name, "Dr. B");
    b.cycle_doctor(true);
    assert_eq!(b.form.value.doctor_name, "Dr. A");
  }

  #[test]
  fn booking_needs_doctor_date_and_time() {
    let mut b = BookingForm::new("Ada Lovelace");
    assert!(b.begin_submit().is_none());
    let errors = b.form.errors();
    assert!(errors.error("doctorName").is_some());
    assert!(errors.error("date").is_some());
    assert!(errors.error("time").is_some());
  }

  #[test]
  fn success_keeps_the_patient_name() {
    let mut b = BookingForm::new("Ada Lovelace");
    b.set_doctors(vec!["Dr. A".into()]);
    b.cycle_doctor(true);
    b.form.value.date = "2030-01-01".into();
    b.form.value.time = "10:30".into();
    let request = b.begin_submit().unwrap();
    assert_eq!(request.patient_name, "Ada Lovelace");

    let booked = Appointment { id: 9, doctor_name: "Dr. A".into(), ..Default::default() };
    assert_eq!(b.finish_submit(Ok(booked)).map(|a| a.id), Some(9));
    assert_eq!(b.form.value.patient_name, "Ada Lovelace");
    assert!(b.form.value.doctor_name.is_empty());
  }
}
