//! The generic list screen: fetch, search, page, add, edit, delete.
//!
//! One [`CrudTable`] serves every entity; the per-entity differences live in
//! the [`CrudService`] it is driven with.

use lifebridge_core::{
  search,
  validate::{FormMode, Validation},
};

use crate::{
  Error, Result,
  services::{Collection, CrudService},
  views::{Notice, Phase, optimistic::Optimistic},
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rows-per-page choices offered by the list screens.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];

// ─── Mutations ───────────────────────────────────────────────────────────────

/// A write a table wants performed.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
  Register(T),
  Update { key: String, item: T },
  Remove { key: String },
}

impl<T> Mutation<T> {
  pub async fn run<S>(&self, service: &S) -> Result<()>
  where
    S: CrudService<Item = T>,
  {
    match self {
      Mutation::Register(item) => service.register(item).await,
      Mutation::Update { key, item } => service.update(key, item).await,
      Mutation::Remove { key } => service.remove(key).await,
    }
  }

  fn success_message(&self) -> &'static str {
    match self {
      Mutation::Register(_) => "Record added successfully.",
      Mutation::Update { .. } => "Record updated successfully.",
      Mutation::Remove { .. } => "Record deleted successfully.",
    }
  }
}

// ─── Modal ───────────────────────────────────────────────────────────────────

/// The add/edit form.
#[derive(Debug, Clone)]
pub struct Modal<T> {
  pub mode:   FormMode,
  pub form:   T,
  pub errors: Validation,
  key:        Option<String>,
}

impl<T> Modal<T> {
  /// The key of the row being edited.
  pub fn key(&self) -> Option<&str> { self.key.as_deref() }
}

struct InFlight<T> {
  change:  Optimistic<Vec<T>>,
  success: &'static str,
}

// ─── Table ───────────────────────────────────────────────────────────────────

pub struct CrudTable<S: Collection> {
  phase:          Phase,
  items:          Vec<S::Item>,
  search:         String,
  cursor:         usize,
  page_size:      usize,
  modal:          Option<Modal<S::Item>>,
  pending_delete: Option<String>,
  in_flight:      Option<InFlight<S::Item>>,
  notice:         Option<Notice>,
}

impl<S: Collection> Default for CrudTable<S> {
  fn default() -> Self { Self::with_page_size(DEFAULT_PAGE_SIZE) }
}

impl<S: Collection> CrudTable<S> {
  pub fn new() -> Self { Self::default() }

  pub fn with_page_size(page_size: usize) -> Self {
    Self {
      phase:          Phase::Idle,
      items:          Vec::new(),
      search:         String::new(),
      cursor:         0,
      page_size:      page_size.max(1),
      modal:          None,
      pending_delete: None,
      in_flight:      None,
      notice:         None,
    }
  }

  pub fn phase(&self) -> &Phase { &self.phase }

  pub fn items(&self) -> &[S::Item] { &self.items }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  /// A mutation has been sent and not yet answered.
  pub fn is_busy(&self) -> bool { self.in_flight.is_some() }

  // ── loading ──

  pub fn begin_load(&mut self) { self.phase = Phase::Loading; }

  pub fn finish_load(&mut self, result: Result<Vec<S::Item>>) {
    match result {
      Ok(items) => {
        tracing::debug!(rows = items.len(), "table loaded");
        self.items = items;
        self.phase = Phase::Loaded;
        self.clamp_cursor();
      }
      Err(e) => {
        tracing::warn!(error = %e, "table load failed");
        self.phase = Phase::Error(e.user_message());
      }
    }
  }

  pub async fn load(&mut self, service: &S) {
    self.begin_load();
    let result = service.fetch_all().await;
    self.finish_load(result);
  }

  // ── search and paging ──

  pub fn search(&self) -> &str { &self.search }

  pub fn set_search(&mut self, search: impl Into<String>) {
    self.search = search.into();
    self.cursor = 0;
  }

  pub fn push_search(&mut self, c: char) {
    self.search.push(c);
    self.cursor = 0;
  }

  pub fn pop_search(&mut self) {
    self.search.pop();
    self.cursor = 0;
  }

  /// Rows matching the current search, in server order.
  pub fn filtered(&self) -> Vec<&S::Item> { search::filter(&self.items, &self.search) }

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn selected(&self) -> Option<&S::Item> { self.filtered().get(self.cursor).copied() }

  pub fn move_cursor(&mut self, delta: isize) {
    let len = self.filtered().len();
    if len == 0 {
      self.cursor = 0;
      return;
    }
    self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
  }

  pub fn page_size(&self) -> usize { self.page_size }

  pub fn page(&self) -> usize { self.cursor / self.page_size }

  /// Step to the next of [`PAGE_SIZES`], wrapping. The cursor row stays put.
  pub fn cycle_page_size(&mut self) {
    self.page_size = PAGE_SIZES
      .iter()
      .copied()
      .find(|&size| size > self.page_size)
      .unwrap_or(PAGE_SIZES[0]);
  }

  pub fn page_count(&self) -> usize { self.filtered().len().div_ceil(self.page_size).max(1) }

  pub fn next_page(&mut self) {
    if self.page() + 1 < self.page_count() {
      self.cursor = (self.page() + 1) * self.page_size;
    }
    self.clamp_cursor();
  }

  pub fn prev_page(&mut self) {
    let page = self.page().saturating_sub(1);
    self.cursor = page * self.page_size;
  }

  /// The rows on the cursor's page, with the index of the first one.
  pub fn page_rows(&self) -> (usize, Vec<&S::Item>) {
    let start = self.page() * self.page_size;
    let rows = self
      .filtered()
      .into_iter()
      .skip(start)
      .take(self.page_size)
      .collect();
    (start, rows)
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── modal ──

  pub fn modal(&self) -> Option<&Modal<S::Item>> { self.modal.as_ref() }

  pub fn modal_mut(&mut self) -> Option<&mut Modal<S::Item>> { self.modal.as_mut() }

  pub fn open_add(&mut self, blank: S::Item) {
    self.modal = Some(Modal {
      mode:   FormMode::Add,
      form:   blank,
      errors: Validation::default(),
      key:    None,
    });
  }

  pub fn close_modal(&mut self) {
    if self.in_flight.is_none() {
      self.modal = None;
    }
  }

  pub fn pending_delete(&self) -> Option<&str> { self.pending_delete.as_deref() }

  pub fn cancel_delete(&mut self) {
    if self.in_flight.is_none() {
      self.pending_delete = None;
    }
  }
}

impl<S: CrudService> CrudTable<S> {
  /// Open the form seeded from the selected row.
  pub fn open_edit(&mut self) -> bool {
    let Some(row) = self.selected().cloned() else {
      return false;
    };
    self.modal = Some(Modal {
      mode:   FormMode::Edit,
      key:    Some(S::key(&row)),
      form:   row,
      errors: Validation::default(),
    });
    true
  }

  /// Validate the open form. On success the change is applied locally and
  /// the mutation to send is returned; on failure the field errors are set
  /// and nothing is returned.
  pub fn begin_submit(&mut self, service: &S) -> Option<Mutation<S::Item>> {
    if self.in_flight.is_some() {
      return None;
    }
    let modal = self.modal.as_mut()?;
    modal.errors = service.validate(&modal.form, modal.mode);
    if !modal.errors.is_valid() {
      return None;
    }

    let form = modal.form.clone();
    let mutation = match (modal.mode, modal.key.clone()) {
      (FormMode::Edit, Some(key)) => Mutation::Update { key, item: form },
      _ => Mutation::Register(form),
    };
    self.apply(&mutation);
    Some(mutation)
  }

  /// Ask for confirmation before deleting the selected row.
  pub fn request_delete(&mut self) -> bool {
    let Some(key) = self.selected().map(S::key) else {
      return false;
    };
    self.pending_delete = Some(key);
    true
  }

  /// The user confirmed; remove the row locally and return the mutation.
  pub fn begin_delete(&mut self) -> Option<Mutation<S::Item>> {
    if self.in_flight.is_some() {
      return None;
    }
    let key = self.pending_delete.clone()?;
    let mutation = Mutation::Remove { key };
    self.apply(&mutation);
    Some(mutation)
  }

  fn apply(&mut self, mutation: &Mutation<S::Item>) {
    let change = Optimistic::apply(&mut self.items, |items| match mutation {
      Mutation::Register(item) => items.push(item.clone()),
      Mutation::Update { key, item } => {
        if let Some(row) = items.iter_mut().find(|r| S::key(r) == *key) {
          *row = item.clone();
        }
      }
      Mutation::Remove { key } => items.retain(|r| S::key(r) != *key),
    });
    self.in_flight = Some(InFlight { change, success: mutation.success_message() });
    self.clamp_cursor();
  }

  /// Fold the server's answer back in. Returns `true` when the collection
  /// should now be re-fetched.
  pub fn finish_mutation(&mut self, result: Result<()>) -> bool {
    let Some(InFlight { change, success }) = self.in_flight.take() else {
      return false;
    };
    self.pending_delete = None;
    match result {
      Ok(()) => {
        change.commit();
        self.modal = None;
        self.notice = Some(Notice::success(success));
        self.phase = Phase::Loading;
        true
      }
      Err(e) => {
        tracing::warn!(error = %e, "mutation failed, rolling back");
        change.rollback(&mut self.items);
        self.clamp_cursor();
        if let (Error::Invalid(v), Some(modal)) = (&e, self.modal.as_mut()) {
          modal.errors = v.clone();
        }
        self.notice = Some(Notice::error(e.user_message()));
        false
      }
    }
  }

  /// Validate, send, and re-fetch on success.
  pub async fn submit(&mut self, service: &S) -> bool {
    let Some(mutation) = self.begin_submit(service) else {
      return false;
    };
    self.settle(service, mutation).await
  }

  /// Delete the row awaiting confirmation, then re-fetch.
  pub async fn confirm_delete(&mut self, service: &S) -> bool {
    let Some(mutation) = self.begin_delete() else {
      return false;
    };
    self.settle(service, mutation).await
  }

  async fn settle(&mut self, service: &S, mutation: Mutation<S::Item>) -> bool {
    let result = mutation.run(service).await;
    let refetch = self.finish_mutation(result);
    if refetch {
      self.load(service).await;
    }
    refetch
  }
}
