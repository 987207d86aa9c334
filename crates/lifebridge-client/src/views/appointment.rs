//! A single appointment, as opened from a doctor's schedule.

use lifebridge_core::model::{Appointment, AppointmentStatus};

use crate::{
  Result,
  services::AppointmentService,
  views::{Notice, Phase, optimistic::Optimistic},
};

#[derive(Debug)]
pub struct AppointmentDetail {
  id:        i64,
  phase:     Phase,
  record:    Option<Appointment>,
  in_flight: Option<Optimistic<Option<Appointment>>>,
  notice:    Option<Notice>,
}

impl AppointmentDetail {
  pub fn new(id: i64) -> Self {
    Self { id, phase: Phase::Idle, record: None, in_flight: None, notice: None }
  }

  pub fn id(&self) -> i64 { self.id }

  pub fn phase(&self) -> &Phase { &self.phase }

  pub fn record(&self) -> Option<&Appointment> { self.record.as_ref() }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  /// Whether a status change is waiting on the server.
  pub fn is_busy(&self) -> bool { self.in_flight.is_some() }

  pub fn begin_load(&mut self) { self.phase = Phase::Loading; }

  pub fn finish_load(&mut self, result: Result<Appointment>) {
    match result {
      Ok(a) => {
        self.record = Some(a);
        self.phase = Phase::Loaded;
      }
      Err(e) => {
        tracing::warn!(id = self.id, error = %e, "appointment load failed");
        self.phase = Phase::Error(e.user_message());
      }
    }
  }

  pub async fn load(&mut self, service: &AppointmentService) {
    self.begin_load();
    let result = service.get(self.id).await;
    self.finish_load(result);
  }

  /// Show the new status at once and return the request to send. Returns
  /// `None` when nothing changes.
  pub fn begin_status(&mut self, status: AppointmentStatus) -> Option<(i64, AppointmentStatus)> {
    if self.in_flight.is_some() || self.record.as_ref()?.status == status {
      return None;
    }
    self.in_flight = Some(Optimistic::apply(&mut self.record, |r| {
      if let Some(a) = r {
        a.status = status;
      }
    }));
    Some((self.id, status))
  }

  /// Returns `true` when the record should be re-fetched.
  pub fn finish_status(&mut self, result: Result<()>) -> bool {
    let Some(change) = self.in_flight.take() else {
      return false;
    };
    match result {
      Ok(()) => {
        change.commit();
        let status = self.record.as_ref().map(|a| a.status).unwrap_or_default();
        self.notice = Some(Notice::success(format!("Appointment marked {status}.")));
        true
      }
      Err(e) => {
        tracing::warn!(id = self.id, error = %e, "status update failed, rolling back");
        change.rollback(&mut self.record);
        self.notice = Some(Notice::error(e.user_message()));
        false
      }
    }
  }

  pub async fn set_status(&mut self, service: &AppointmentService, status: AppointmentStatus) -> bool {
    let Some((id, status)) = self.begin_status(status) else {
      return false;
    };
    let result = service.update_status(id, status).await;
    let ok = self.finish_status(result);
    if ok {
      self.load(service).await;
    }
    ok
  }
}
