//! Prescription issuance by a doctor, against one of their appointments.

use lifebridge_core::{
  model::{Appointment, Prescription},
  role::Role,
  validate::{self, Validation},
};

use crate::{
  Result,
  services::{AppointmentService, PrescriptionService},
  views::{Notice, Phase, cycle_index},
};

pub const ISSUED: &str = "Prescription issued successfully!";

#[derive(Debug)]
pub struct PrescriptionForm {
  doctor_name:      String,
  phase:            Phase,
  appointments:     Vec<Appointment>,
  selected:         Option<i64>,
  pub medicines:    Vec<String>,
  pub instructions: String,
  errors:           Validation,
  busy:             bool,
  notice:           Option<Notice>,
}

impl PrescriptionForm {
  /// `preselect` is the appointment the form was opened from, if any.
  pub fn new(preselect: Option<i64>) -> Self {
    Self {
      doctor_name:  String::new(),
      phase:        Phase::Idle,
      appointments: Vec::new(),
      selected:     preselect,
      medicines:    vec![String::new()],
      instructions: String::new(),
      errors:       Validation::default(),
      busy:         false,
      notice:       None,
    }
  }

  pub fn doctor_name(&self) -> &str { &self.doctor_name }

  /// The issuing doctor's display name, taken from their own profile.
  pub fn set_doctor_name(&mut self, name: impl Into<String>) { self.doctor_name = name.into(); }

  pub fn phase(&self) -> &Phase { &self.phase }

  pub fn appointments(&self) -> &[Appointment] { &self.appointments }

  pub fn errors(&self) -> &Validation { &self.errors }

  pub fn is_busy(&self) -> bool { self.busy }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  // ── appointment picker ──

  pub fn begin_load(&mut self) { self.phase = Phase::Loading; }

  pub fn finish_load(&mut self, result: Result<Vec<Appointment>>) {
    match result {
      Ok(appointments) => {
        self.appointments = appointments;
        if self
          .selected
          .is_some_and(|id| !self.appointments.iter().any(|a| a.id == id))
        {
          self.selected = None;
        }
        self.phase = Phase::Loaded;
      }
      Err(e) => {
        tracing::warn!(error = %e, "could not load appointments for prescribing");
        self.phase = Phase::Error(e.user_message());
      }
    }
  }

  pub async fn load(&mut self, service: &AppointmentService) {
    self.begin_load();
    let result = service.fetch_mine(Role::Doctor).await;
    self.finish_load(result);
  }

  pub fn selected(&self) -> Option<&Appointment> {
    let id = self.selected?;
    self.appointments.iter().find(|a| a.id == id)
  }

  pub fn select(&mut self, id: i64) -> bool {
    let found = self.appointments.iter().any(|a| a.id == id);
    if found {
      self.selected = Some(id);
    }
    found
  }

  pub fn cycle_appointment(&mut self, forward: bool) {
    let current = self
      .selected
      .and_then(|id| self.appointments.iter().position(|a| a.id == id));
    if let Some(next) = cycle_index(self.appointments.len(), current, forward) {
      self.selected = Some(self.appointments[next].id);
    }
  }

  // ── medicines ──

  pub fn add_medicine(&mut self) { self.medicines.push(String::new()); }

  pub fn remove_medicine(&mut self, index: usize) {
    if self.medicines.len() > 1 && index < self.medicines.len() {
      self.medicines.remove(index);
    }
  }

  // ── submission ──

  /// Build the prescription from the selected appointment. Blank medicine
  /// lines are dropped.
  pub fn begin_submit(&mut self) -> Option<Prescription> {
    if self.busy {
      return None;
    }
    self.errors = validate::prescription(self.selected().map(|a| a.id), &self.medicines);
    if !self.errors.is_valid() {
      return None;
    }
    let appointment = self.selected()?;
    let prescription = Prescription {
      id:            None,
      doctor_name:   self.doctor_name.clone(),
      patient_name:  appointment.patient_name.clone(),
      patient_email: appointment.patient_email.clone(),
      date:          appointment.date.clone(),
      medicines:     self
        .medicines
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect(),
      instructions:  self.instructions.trim().to_string(),
      issued:        true,
    };
    self.busy = true;
    Some(prescription)
  }

  pub fn finish_submit(&mut self, result: Result<()>) -> bool {
    self.busy = false;
    match result {
      Ok(()) => {
        self.medicines = vec![String::new()];
        self.instructions.clear();
        self.errors = Validation::default();
        self.notice = Some(Notice::success(ISSUED));
        true
      }
      Err(e) => {
        tracing::warn!(error = %e, "prescription rejected");
        self.notice = Some(Notice::error(e.user_message()));
        false
      }
    }
  }

  pub async fn submit(&mut self, service: &PrescriptionService) -> bool {
    let Some(prescription) = self.begin_submit() else {
      return false;
    };
    let result = service.issue(&prescription).await;
    self.finish_submit(result)
  }
}
