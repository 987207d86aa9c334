//! Prescriptions. Issued once by a doctor; there is no edit path.

use std::future::Future;

use lifebridge_core::model::Prescription;

use crate::{ApiClient, Result, services::Collection};

#[derive(Clone)]
pub struct PrescriptionService {
  api: ApiClient,
}

impl PrescriptionService {
  pub fn new(api: ApiClient) -> Self { Self { api } }

  /// `POST /api/prescriptions/issue`
  pub async fn issue(&self, prescription: &Prescription) -> Result<()> {
    tracing::info!(
      patient = %prescription.patient_email,
      medicines = prescription.medicines.len(),
      "issuing prescription"
    );
    self
      .api
      .post_unit(&["api", "prescriptions", "issue"], prescription)
      .await
  }

  /// `GET /api/prescriptions/all`
  pub async fn fetch_all(&self) -> Result<Vec<Prescription>> {
    self.api.get(&["api", "prescriptions", "all"]).await
  }

  /// `GET /api/prescriptions/my-prescriptions`, scoped by the server to the
  /// authenticated patient.
  pub async fn fetch_mine(&self) -> Result<Vec<Prescription>> {
    self
      .api
      .get(&["api", "prescriptions", "my-prescriptions"])
      .await
  }
}

impl Collection for PrescriptionService {
  type Item = Prescription;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Prescription>>> + Send + '_ {
    PrescriptionService::fetch_all(self)
  }
}

/// The caller's own prescriptions, as a [`Collection`].
#[derive(Clone)]
pub struct MyPrescriptions(pub PrescriptionService);

impl Collection for MyPrescriptions {
  type Item = Prescription;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Prescription>>> + Send + '_ {
    self.0.fetch_mine()
  }
}
