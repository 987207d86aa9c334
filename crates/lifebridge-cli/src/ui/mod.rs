//! TUI rendering for every screen.

pub mod forms;
pub mod profile;
pub mod records;
pub mod table;

use chrono::Local;
use lifebridge_client::views::{Notice, NoticeKind};
use lifebridge_core::validate::FormMode;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
  app::{App, Screen},
  fields,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(prompt) = &app.prompt {
    draw_prompt(f, area, prompt);
  }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}

pub fn dim() -> Style { Style::default().fg(Color::DarkGray) }

pub fn notice_style(notice: &Notice) -> Style {
  match notice.kind {
    NoticeKind::Success => Style::default().fg(Color::Green),
    NoticeKind::Error => Style::default().fg(Color::Red),
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut spans = vec![Span::styled(
    " LifeBridge ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (i, route) in app.menu().iter().enumerate() {
    let style = if *route == app.route {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!("F{} {}", i + 1, route.title()), style));
  }

  let who = app.role.map(|r| r.label()).unwrap_or("Guest");
  let right = Span::styled(format!("{who}  {date} "), dim());

  // Simple left-right header: pad the middle.
  let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right_width = right.content.chars().count();
  let pad = usize::from(area.width)
    .saturating_sub(left_width)
    .saturating_sub(right_width);
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match &app.screen {
    Screen::Home => draw_home(f, area),
    Screen::Login(view) => forms::draw_form(f, area, view, forms::FormView {
      title:  "Login",
      fields: &fields::LOGIN,
      focus:  app.focus,
      errors: view.errors(),
      busy:   view.is_busy(),
    }),
    Screen::Register(form) => {
      let layout = fields::person(lifebridge_core::model::PersonKind::Patients, FormMode::Add);
      forms::draw_form(f, area, &form.value, forms::FormView {
        title:  "Register as a patient",
        fields: &layout,
        focus:  app.focus,
        errors: form.errors(),
        busy:   form.is_busy(),
      })
    }
    Screen::Profile(view) => profile::draw(f, area, view, app.focus),
    Screen::People(kind, t) => {
      table::draw(f, area, &app.route.title(), t, app.search_active, "No records found.");
      table::draw_overlays(f, area, t, kind.noun(), app.focus, |mode| fields::person(*kind, mode));
    }
    Screen::Appointments(t) => {
      table::draw(f, area, "Appointments", t, app.search_active, "No records found.");
      table::draw_overlays(f, area, t, "appointment", app.focus, fields::appointment);
    }
    Screen::Feedbacks(t) => {
      table::draw(f, area, "Feedback", t, app.search_active, "No feedback yet.")
    }
    Screen::Schedule(list) => records::draw_list(f, area, "My schedule", list, app.search_active),
    Screen::Bookings(list) => {
      records::draw_list(f, area, "My appointments", list, app.search_active)
    }
    Screen::Prescriptions(list) => {
      records::draw_list(f, area, "My prescriptions", list, app.search_active)
    }
    Screen::Appointment(view) => records::draw_detail(f, area, view),
    Screen::Prescribe(form) => records::draw_prescribe(f, area, form, app.rx_focus),
    Screen::Booking(form) => forms::draw_form(f, area, &form.form.value, forms::FormView {
      title:  "Book an appointment",
      fields: &fields::BOOKING,
      focus:  app.focus,
      errors: form.form.errors(),
      busy:   form.form.is_busy(),
    }),
    Screen::Feedback(form) => forms::draw_form(f, area, &form.form.value, forms::FormView {
      title:  "Share your feedback",
      fields: &fields::FEEDBACK,
      focus:  app.focus,
      errors: form.form.errors(),
      busy:   form.form.is_busy(),
    }),
    Screen::NotFound(path) => draw_not_found(f, area, path),
  }
}

fn draw_home(f: &mut Frame, area: Rect) {
  let lines = vec![
    Line::from(Span::styled(
      "LifeBridge Hospital",
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from("Appointments, prescriptions and records in one place."),
    Line::from(""),
    Line::from(Span::styled("[l] log in   [r] register   [q] quit", dim())),
  ];
  let rect = centered(area, 60, lines.len() as u16 + 2);
  f.render_widget(
    Paragraph::new(lines)
      .centered()
      .block(Block::default().borders(Borders::ALL).border_style(dim())),
    rect,
  );
}

fn draw_not_found(f: &mut Frame, area: Rect, path: &str) {
  let lines = vec![
    Line::from(Span::styled(
      "404 - Page not found",
      Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(format!("Nothing lives at {path}.")),
    Line::from(Span::styled("Enter to go home", dim())),
  ];
  let rect = centered(area, 60, lines.len() as u16 + 2);
  f.render_widget(
    Paragraph::new(lines)
      .centered()
      .wrap(Wrap { trim: true })
      .block(Block::default().borders(Borders::ALL).border_style(dim())),
    rect,
  );
}

fn draw_prompt(f: &mut Frame, area: Rect, prompt: &str) {
  let rect = centered(area, 60, 3);
  f.render_widget(Clear, rect);
  f.render_widget(
    Paragraph::new(format!("{prompt}_")).block(
      Block::default()
        .title(" Go to path ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow)),
    ),
    rect,
  );
}

pub fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

/// The current screen's own notice, if it has one.
fn screen_notice(screen: &Screen) -> Option<&Notice> {
  match screen {
    Screen::Login(v) => v.notice(),
    Screen::Register(form) => form.notice(),
    Screen::Profile(v) => v.notice(),
    Screen::People(_, t) => t.notice(),
    Screen::Appointments(t) => t.notice(),
    Screen::Feedbacks(t) => t.notice(),
    Screen::Schedule(list) | Screen::Bookings(list) => list.rows().notice(),
    Screen::Prescriptions(list) => list.rows().notice(),
    Screen::Appointment(v) => v.notice(),
    Screen::Prescribe(form) => form.notice(),
    Screen::Booking(form) => form.form.notice(),
    Screen::Feedback(form) => form.form.notice(),
    Screen::Home | Screen::NotFound(_) => None,
  }
}

fn mode_and_hints(app: &App) -> (&'static str, &'static str) {
  if app.prompt.is_some() {
    return ("GO TO", "Type a path  Enter go  Esc cancel");
  }
  if app.search_active {
    return ("SEARCH", "Type to filter  Enter keep  Esc clear");
  }
  match &app.screen {
    Screen::Home => ("HOME", "l login  r register  Ctrl-G go to  q quit"),
    Screen::NotFound(_) => ("404", "Enter home  q quit"),
    Screen::Login(_) => ("LOGIN", "Tab next field  Enter log in  Esc back"),
    Screen::Register(_) => ("REGISTER", "Tab next field  ←→ choose  Enter register  Esc back"),
    Screen::Profile(v) if v.is_editing() => ("EDIT", "Tab next field  ←→ choose  Enter save  Esc cancel"),
    Screen::Profile(_) => ("PROFILE", "e edit  r reload  Ctrl-L log out  q quit"),
    Screen::People(_, t) if t.pending_delete().is_some() => ("DELETE", "y confirm  n cancel"),
    Screen::Appointments(t) if t.pending_delete().is_some() => ("DELETE", "y confirm  n cancel"),
    Screen::People(_, t) if t.modal().is_some() => ("FORM", "Tab next field  ←→ choose  Enter save  Esc cancel"),
    Screen::Appointments(t) if t.modal().is_some() => ("FORM", "Tab next field  ←→ choose  Enter save  Esc cancel"),
    Screen::People(..) | Screen::Appointments(_) => (
      "TABLE",
      "↑↓/jk move  [ ] page  s rows  / search  a add  e edit  d delete  r reload",
    ),
    Screen::Feedbacks(_) | Screen::Prescriptions(_) | Screen::Bookings(_) => {
      ("LIST", "↑↓/jk move  [ ] page  s rows  / search  r reload")
    }
    Screen::Schedule(_) => ("LIST", "↑↓/jk move  [ ] page  s rows  / search  Enter open  w prescribe"),
    Screen::Appointment(_) => ("DETAIL", "p/s/c/x set status  w prescribe  Esc back"),
    Screen::Prescribe(_) => ("PRESCRIBE", "↑↓ field  ←→ appointment  Ctrl-N add line  Ctrl-X drop line  Enter issue"),
    Screen::Booking(_) => ("BOOK", "Tab next field  ←→ doctor  Enter book"),
    Screen::Feedback(_) => ("FEEDBACK", "Tab next field  ←→ doctor/rating  Enter send"),
  }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = mode_and_hints(app);

  let notice = screen_notice(&app.screen).or(app.banner.as_ref());
  let (status, style) = match notice {
    Some(n) => (n.message.clone(), notice_style(n)),
    None => (hints.to_string(), dim()),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
