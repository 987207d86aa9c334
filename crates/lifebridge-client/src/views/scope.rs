//! Screen lifetimes for background requests.
//!
//! A [`ViewScope`] owns every task a screen spawned. Tearing it down aborts
//! those tasks and bumps the generation, so any result that still makes it
//! into the channel is recognisably stale.

use std::future::Future;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

/// A task result stamped with the generation of the scope that spawned it.
#[derive(Debug)]
pub struct Tagged<M> {
  pub generation: u64,
  pub message:    M,
}

#[derive(Debug, Default)]
pub struct ViewScope {
  generation: u64,
  tasks:      Vec<JoinHandle<()>>,
}

impl ViewScope {
  pub fn new() -> Self { Self::default() }

  pub fn generation(&self) -> u64 { self.generation }

  /// Run `fut` on the runtime and send its output to `tx`, tagged with the
  /// current generation.
  pub fn spawn<M, F>(&mut self, tx: &UnboundedSender<Tagged<M>>, fut: F)
  where
    M: Send + 'static,
    F: Future<Output = M> + Send + 'static,
  {
    self.tasks.retain(|t| !t.is_finished());
    let generation = self.generation;
    let tx = tx.clone();
    self.tasks.push(tokio::spawn(async move {
      let message = fut.await;
      // The receiver is gone when the app is shutting down.
      let _ = tx.send(Tagged { generation, message });
    }));
  }

  /// Whether `tagged` came from a task spawned since the last teardown.
  pub fn accepts<M>(&self, tagged: &Tagged<M>) -> bool { tagged.generation == self.generation }

  /// Abort everything in flight and start a new generation.
  pub fn teardown(&mut self) {
    let aborted = self.tasks.len();
    for task in self.tasks.drain(..) {
      task.abort();
    }
    self.generation += 1;
    tracing::trace!(generation = self.generation, aborted, "view scope torn down");
  }
}

impl Drop for ViewScope {
  fn drop(&mut self) {
    for task in &self.tasks {
      task.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use tokio::sync::{mpsc, oneshot};

  use super::*;

  #[tokio::test]
  async fn results_from_the_current_generation_are_accepted() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut scope = ViewScope::new();
    scope.spawn(&tx, async { 7 });
    let got = rx.recv().await.unwrap();
    assert_eq!(got.message, 7);
    assert!(scope.accepts(&got));
  }

  #[tokio::test]
  async fn teardown_aborts_pending_work() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Tagged<u32>>();
    let (gate_tx, gate_rx) = oneshot::channel::<()>();
    let mut scope = ViewScope::new();
    scope.spawn(&tx, async move {
      let _ = gate_rx.await;
      1
    });
    scope.teardown();
    let _ = gate_tx.send(());
    drop(tx);
    // The aborted task dropped its sender without sending.
    assert!(rx.recv().await.is_none());
    assert_eq!(scope.generation(), 1);
  }

  #[test]
  fn stale_generations_are_rejected() {
    let mut scope = ViewScope::new();
    let old = Tagged { generation: scope.generation(), message: () };
    scope.teardown();
    assert!(!scope.accepts(&old));
  }
}
