//! Patient feedback. Created once, never mutated.

use std::future::Future;

use lifebridge_core::{model::Feedback, validate};

use crate::{ApiClient, Error, Result, services::Collection};

#[derive(Clone)]
pub struct FeedbackService {
  api: ApiClient,
}

impl FeedbackService {
  pub fn new(api: ApiClient) -> Self { Self { api } }

  /// `POST /api/feedback`. Invalid feedback is refused without a request.
  pub async fn submit(&self, feedback: &Feedback) -> Result<()> {
    let check = validate::feedback(feedback);
    if !check.is_valid() {
      return Err(Error::Invalid(check));
    }
    tracing::info!(doctor = %feedback.doctor, rating = feedback.rating, "submitting feedback");
    self.api.post_unit(&["api", "feedback"], feedback).await
  }

  /// `GET /api/feedback`
  pub async fn fetch_all(&self) -> Result<Vec<Feedback>> { self.api.get(&["api", "feedback"]).await }
}

impl Collection for FeedbackService {
  type Item = Feedback;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Feedback>>> + Send + '_ {
    FeedbackService::fetch_all(self)
  }
}
