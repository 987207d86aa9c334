//! Paginated, searchable record tables and their add/edit/delete overlays.

use lifebridge_client::{
  services::{Collection, CrudService},
  views::{Phase, table::CrudTable},
};
use lifebridge_core::{
  model::{Appointment, Feedback, Person, Prescription},
  validate::FormMode,
};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
};

use super::{capitalize, centered, dim, forms};
use crate::fields::{self, Editable, FieldSpec};

// ─── Columns ──────────────────────────────────────────────────────────────────

/// How a record type lays itself out as a table row.
pub trait Columns {
  const HEADERS: &'static [&'static str];

  fn widths() -> Vec<Constraint>;

  fn cells(&self) -> Vec<String>;
}

impl Columns for Person {
  const HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Gender", "Born", "City"];

  fn widths() -> Vec<Constraint> {
    vec![
      Constraint::Percentage(22),
      Constraint::Percentage(28),
      Constraint::Length(12),
      Constraint::Length(8),
      Constraint::Length(11),
      Constraint::Min(8),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.full_name(),
      self.email.clone(),
      self.phone_number.clone(),
      self.gender.clone(),
      self.date_of_birth.clone(),
      self.city.clone(),
    ]
  }
}

impl Columns for Appointment {
  const HEADERS: &'static [&'static str] = &["#", "Patient", "Doctor", "Date", "Time", "Status"];

  fn widths() -> Vec<Constraint> {
    vec![
      Constraint::Length(5),
      Constraint::Percentage(28),
      Constraint::Percentage(28),
      Constraint::Length(11),
      Constraint::Length(6),
      Constraint::Min(9),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.patient_name.clone(),
      self.doctor_name.clone(),
      self.date.clone(),
      self.time.clone(),
      self.status.to_string(),
    ]
  }
}

impl Columns for Feedback {
  const HEADERS: &'static [&'static str] = &["Name", "Email", "Doctor", "Rating", "Comments"];

  fn widths() -> Vec<Constraint> {
    vec![
      Constraint::Percentage(18),
      Constraint::Percentage(22),
      Constraint::Percentage(18),
      Constraint::Length(12),
      Constraint::Min(10),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.name.clone(),
      self.email.clone(),
      self.doctor.clone(),
      fields::stars(self.rating),
      self.comments.clone(),
    ]
  }
}

impl Columns for Prescription {
  const HEADERS: &'static [&'static str] = &["Date", "Doctor", "Medicines", "Instructions"];

  fn widths() -> Vec<Constraint> {
    vec![
      Constraint::Length(11),
      Constraint::Percentage(22),
      Constraint::Percentage(38),
      Constraint::Min(10),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.date.clone(),
      self.doctor_name.clone(),
      self.medicines.join(", "),
      self.instructions.clone(),
    ]
  }
}

// ─── Table ────────────────────────────────────────────────────────────────────

/// Render `table` into `area`: search line, the cursor's page, and a footer.
pub fn draw<S>(
  f: &mut Frame,
  area: Rect,
  title: &str,
  table: &CrudTable<S>,
  search_active: bool,
  empty: &str,
) where
  S: Collection,
  S::Item: Columns,
{
  let shown = table.filtered().len();
  let total = table.items().len();

  // Title with count.
  let title = if search_active || !table.search().is_empty() {
    format!(" {title} ({shown}/{total}) ")
  } else {
    format!(" {title} ({total}) ")
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(dim());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let [search_area, body, footer] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
      .areas(inner);

  let search = if search_active {
    Paragraph::new(format!("/{}_", table.search())).style(Style::default().fg(Color::Yellow))
  } else if table.search().is_empty() {
    Paragraph::new("/ search").style(dim())
  } else {
    Paragraph::new(format!("/{}", table.search())).style(Style::default().fg(Color::Yellow))
  };
  f.render_widget(search, search_area);

  match table.phase() {
    Phase::Error(message) => {
      f.render_widget(
        Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)),
        body,
      );
    }
    Phase::Loading if total == 0 => f.render_widget(Paragraph::new("Loading…").style(dim()), body),
    _ if shown == 0 => f.render_widget(Paragraph::new(empty).style(dim()), body),
    _ => draw_rows(f, body, table),
  }

  let mut status = format!(
    "Page {}/{}  {shown} rows  {} per page",
    table.page() + 1,
    table.page_count(),
    table.page_size()
  );
  if table.is_busy() {
    status.push_str("  saving…");
  } else if table.phase().is_loading() {
    status.push_str("  refreshing…");
  }
  f.render_widget(Paragraph::new(status).style(dim()), footer);
}

fn draw_rows<S>(f: &mut Frame, area: Rect, table: &CrudTable<S>)
where
  S: Collection,
  S::Item: Columns,
{
  let (start, items) = table.page_rows();
  let rows: Vec<Row> = items.iter().map(|item| Row::new(item.cells())).collect();

  let mut state = TableState::default();
  state.select(Some(table.cursor().saturating_sub(start)));

  let header = Row::new(S::Item::HEADERS.iter().copied()).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  f.render_stateful_widget(
    Table::new(rows, S::Item::widths())
      .header(header)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}

// ─── Overlays ─────────────────────────────────────────────────────────────────

/// The delete confirmation and the add/edit form, whichever is open.
pub fn draw_overlays<S>(
  f: &mut Frame,
  area: Rect,
  table: &CrudTable<S>,
  noun: &str,
  focus: usize,
  layout: impl Fn(FormMode) -> Vec<FieldSpec>,
) where
  S: CrudService,
  S::Item: Editable,
{
  if let Some(key) = table.pending_delete() {
    let lines = vec![
      Line::from(format!("Delete {noun} {key}?")),
      Line::from(""),
      Line::from(Span::styled("y confirm   n cancel", dim())),
    ];
    let rect = centered(area, 56, 5);
    f.render_widget(Clear, rect);
    f.render_widget(
      Paragraph::new(lines).block(
        Block::default()
          .title(" Confirm delete ")
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Red)),
      ),
      rect,
    );
  }

  if let Some(modal) = table.modal() {
    let fields = layout(modal.mode);
    let title = match modal.mode {
      FormMode::Add => format!("Add {}", capitalize(noun)),
      FormMode::Edit => format!("Edit {}", capitalize(noun)),
    };
    forms::draw_form(f, area, &modal.form, forms::FormView {
      title: &title,
      fields: &fields,
      focus,
      errors: &modal.errors,
      busy: table.is_busy(),
    });
  }
}
