//! Patient feedback form.

use lifebridge_core::{model::Feedback, validate};

use crate::{
  services::FeedbackService,
  views::{cycle_index, form::Form},
};

pub const THANKS: &str = "Thank you for your feedback!";

/// Rating is a 0–5 star widget in half steps; 0 means "not rated yet".
#[derive(Debug, Default)]
pub struct FeedbackForm {
  pub form: Form<Feedback>,
  doctors:  Vec<String>,
}

impl FeedbackForm {
  pub fn new() -> Self { Self::default() }

  pub fn doctors(&self) -> &[String] { &self.doctors }

  pub fn set_doctors(&mut self, doctors: Vec<String>) { self.doctors = doctors; }

  /// Cycle the doctor picker.
  pub fn cycle_doctor(&mut self, forward: bool) {
    let current = self.doctors.iter().position(|d| *d == self.form.value.doctor);
    if let Some(next) = cycle_index(self.doctors.len(), current, forward) {
      self.form.value.doctor = self.doctors[next].clone();
    }
  }

  /// Step the rating by half a star, clamped to 0..=5.
  pub fn nudge_rating(&mut self, up: bool) {
    let r = &mut self.form.value.rating;
    let step = if up { 0.5 } else { -0.5 };
    *r = (*r + step).clamp(0.0, validate::MAX_RATING);
  }

  pub fn begin_submit(&mut self) -> Option<Feedback> { self.form.begin(validate::feedback) }

  pub fn finish_submit(&mut self, result: crate::Result<()>) -> bool {
    self.form.finish(result, THANKS, Feedback::default()).is_some()
  }

  pub async fn submit(&mut self, service: &FeedbackService) -> bool {
    let Some(feedback) = self.begin_submit() else {
      return false;
    };
    let result = service.submit(&feedback).await;
    self.finish_submit(result)
  }
}
