//! Session-bound screens: the caller's own lists, one appointment, and the
//! prescription pad.

use lifebridge_client::{
  services::Collection,
  views::{Phase, appointment::AppointmentDetail, mine::MyRecords, prescribe::PrescriptionForm},
};
use lifebridge_core::model::AppointmentStatus;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::{dim, table};
use crate::app::RxFocus;

pub fn draw_list<C>(f: &mut Frame, area: Rect, title: &str, list: &MyRecords<C>, search_active: bool)
where
  C: Collection,
  C::Item: table::Columns,
{
  let title = match list.subject() {
    Some(subject) => format!("{title}  {subject}"),
    None => title.to_string(),
  };
  let empty = list.empty_message().unwrap_or("No records found.");
  table::draw(f, area, &title, list.rows(), search_active, empty);
}

fn label(text: &str) -> Span<'static> {
  Span::styled(
    format!("{text:<16}"),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )
}

fn status_style(status: AppointmentStatus) -> Style {
  match status {
    AppointmentStatus::Pending => Style::default().fg(Color::Yellow),
    AppointmentStatus::Scheduled => Style::default().fg(Color::Blue),
    AppointmentStatus::Completed => Style::default().fg(Color::Green),
    AppointmentStatus::Cancelled => Style::default().fg(Color::Red),
  }
}

fn error_line(message: &str) -> Line<'static> {
  Line::from(Span::styled(format!("{:<16}{message}", ""), Style::default().fg(Color::Red)))
}

// ─── Appointment detail ───────────────────────────────────────────────────────

pub fn draw_detail(f: &mut Frame, area: Rect, view: &AppointmentDetail) {
  let block = Block::default()
    .title(format!(" Appointment #{} ", view.id()))
    .borders(Borders::ALL)
    .border_style(dim());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(a) = view.record() else {
    let text = match view.phase() {
      Phase::Error(message) => {
        Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
      }
      _ => Paragraph::new("Loading…").style(dim()),
    };
    f.render_widget(text, inner);
    return;
  };

  let mut lines = vec![
    Line::from(vec![label("Patient"), Span::raw(a.patient_name.clone())]),
    Line::from(vec![label("Patient email"), Span::raw(a.patient_email.clone())]),
    Line::from(vec![label("Doctor"), Span::raw(a.doctor_name.clone())]),
    Line::from(vec![label("Date"), Span::raw(a.date.clone())]),
    Line::from(vec![label("Time"), Span::raw(a.time.clone())]),
    Line::from(vec![
      label("Status"),
      Span::styled(a.status.to_string(), status_style(a.status).add_modifier(Modifier::BOLD)),
    ]),
  ];
  if view.is_busy() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Updating…", Style::default().fg(Color::Yellow))));
  }
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Prescription pad ─────────────────────────────────────────────────────────

pub fn draw_prescribe(f: &mut Frame, area: Rect, form: &PrescriptionForm, focus: RxFocus) {
  let block = Block::default()
    .title(" New prescription ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let focused = |target: RxFocus| -> Style {
    if focus == target {
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
      Style::default()
    }
  };

  let doctor = if form.doctor_name().is_empty() { "…" } else { form.doctor_name() };
  let mut lines = vec![Line::from(vec![label("Doctor"), Span::raw(doctor.to_string())])];

  let picker = match (form.phase(), form.selected()) {
    (Phase::Error(message), _) => {
      Span::styled(message.clone(), Style::default().fg(Color::Red))
    }
    (Phase::Loading, _) => Span::styled("Loading appointments…", dim()),
    (_, Some(a)) => Span::styled(
      format!("◂ #{} {} {} {} ▸", a.id, a.patient_name, a.date, a.time),
      focused(RxFocus::Appointment),
    ),
    (_, None) if form.appointments().is_empty() => {
      Span::styled("No appointments to prescribe for.", dim())
    }
    (_, None) => Span::styled("◂ select an appointment ▸", focused(RxFocus::Appointment)),
  };
  lines.push(Line::from(vec![label("Appointment"), picker]));
  if let Some(error) = form.errors().error("appointment") {
    lines.push(error_line(error));
  }

  lines.push(Line::from(""));
  for (i, medicine) in form.medicines.iter().enumerate() {
    let cursor = if focus == RxFocus::Medicine(i) { "_" } else { "" };
    let name = if i == 0 { "Medicines" } else { "" };
    lines.push(Line::from(vec![
      label(name),
      Span::styled(format!("{}. {medicine}{cursor}", i + 1), focused(RxFocus::Medicine(i))),
    ]));
  }
  if let Some(error) = form.errors().error("medicines") {
    lines.push(error_line(error));
  }

  lines.push(Line::from(""));
  let cursor = if focus == RxFocus::Instructions { "_" } else { "" };
  lines.push(Line::from(vec![
    label("Instructions"),
    Span::styled(format!("{}{cursor}", form.instructions), focused(RxFocus::Instructions)),
  ]));

  lines.push(Line::from(""));
  lines.push(if form.is_busy() {
    Line::from(Span::styled("Issuing…", Style::default().fg(Color::Yellow)))
  } else {
    Line::from(Span::styled("Enter issue  Esc back", dim()))
  });

  f.render_widget(Paragraph::new(lines), inner);
}
