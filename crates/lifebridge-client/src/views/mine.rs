//! Read-only lists of the caller's own records: my appointments, my
//! prescriptions, a doctor's schedule.
//!
//! Rows come from server-scoped endpoints; the subject claim is only shown.

use crate::{
  Result,
  services::Collection,
  views::{Phase, table::CrudTable},
};

pub struct MyRecords<C: Collection> {
  subject: Option<String>,
  empty:   &'static str,
  table:   CrudTable<C>,
}

impl<C: Collection> MyRecords<C> {
  pub fn new(subject: Option<String>, empty: &'static str) -> Self {
    Self { subject, empty, table: CrudTable::new() }
  }

  pub fn subject(&self) -> Option<&str> { self.subject.as_deref() }

  /// The empty-state text, once a load has come back with nothing.
  pub fn empty_message(&self) -> Option<&'static str> {
    (self.table.phase() == &Phase::Loaded && self.table.filtered().is_empty()).then_some(self.empty)
  }

  pub fn phase(&self) -> &Phase { self.table.phase() }

  pub fn begin_load(&mut self) { self.table.begin_load(); }

  pub fn finish_load(&mut self, result: Result<Vec<C::Item>>) { self.table.finish_load(result); }

  pub async fn load(&mut self, source: &C) { self.table.load(source).await; }

  /// Search, cursor and paging are shared with the admin tables.
  pub fn rows(&self) -> &CrudTable<C> { &self.table }

  pub fn rows_mut(&mut self) -> &mut CrudTable<C> { &mut self.table }

  pub fn selected(&self) -> Option<&C::Item> { self.table.selected() }
}

#[cfg(test)]
mod tests {
  use std::future::Future;

  use lifebridge_core::model::Prescription;

  use super::*;
  use crate::Error;

  struct Fixed(Vec<Prescription>);

  impl Collection for Fixed {
    type Item = Prescription;

    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Prescription>>> + Send + '_ {
      let rows = self.0.clone();
      async move { Ok(rows) }
    }
  }

  #[tokio::test]
  async fn empty_state_only_after_a_load() {
    let mut mine = MyRecords::<Fixed>::new(Some("ada@example.com".into()), "No prescriptions yet.");
    assert_eq!(mine.empty_message(), None);
    mine.load(&Fixed(Vec::new())).await;
    assert_eq!(mine.empty_message(), Some("No prescriptions yet."));
    assert_eq!(mine.subject(), Some("ada@example.com"));
  }

  #[tokio::test]
  async fn rows_are_listed_and_selectable() {
    let rx = Prescription {
      doctor_name: "Dr. Grey".into(),
      medicines: vec!["Ibuprofen 200mg".into()],
      issued: true,
      ..Default::default()
    };
    let mut mine = MyRecords::new(None, "none");
    mine.load(&Fixed(vec![rx.clone()])).await;
    assert_eq!(mine.empty_message(), None);
    assert_eq!(mine.selected(), Some(&rx));
  }

  #[test]
  fn failures_replace_the_list() {
    let mut mine = MyRecords::<Fixed>::new(None, "none");
    mine.begin_load();
    mine.finish_load(Err(Error::SessionExpired));
    assert_eq!(mine.phase(), &Phase::Error("Please log in again.".into()));
    assert_eq!(mine.empty_message(), None);
  }
}
