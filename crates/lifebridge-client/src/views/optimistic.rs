//! Optimistic local changes with rollback.

/// A snapshot taken before a local change, held until the server answers.
#[derive(Debug, Clone)]
pub struct Optimistic<T> {
  snapshot: T,
}

impl<T: Clone> Optimistic<T> {
  /// Snapshot `target`, then apply `change` to it.
  pub fn apply(target: &mut T, change: impl FnOnce(&mut T)) -> Self {
    let snapshot = target.clone();
    change(target);
    Self { snapshot }
  }

  /// Restore the snapshot.
  pub fn rollback(self, target: &mut T) { *target = self.snapshot; }

  /// Keep the change.
  pub fn commit(self) {}

  /// Commit on `Ok`, roll back on `Err`.
  pub fn settle<E>(self, target: &mut T, result: &Result<(), E>) {
    match result {
      Ok(()) => self.commit(),
      Err(_) => self.rollback(target),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rollback_restores_the_snapshot() {
    let mut rows = vec![1, 2, 3];
    let pending = Optimistic::apply(&mut rows, |r| r.retain(|x| *x != 2));
    assert_eq!(rows, [1, 3]);
    pending.rollback(&mut rows);
    assert_eq!(rows, [1, 2, 3]);
  }

  #[test]
  fn settle_keeps_successful_changes() {
    let mut name = String::from("old");
    let pending = Optimistic::apply(&mut name, |n| *n = "new".into());
    pending.settle(&mut name, &Ok::<(), ()>(()));
    assert_eq!(name, "new");

    let pending = Optimistic::apply(&mut name, |n| *n = "newer".into());
    pending.settle(&mut name, &Err::<(), _>("boom"));
    assert_eq!(name, "new");
  }
}
