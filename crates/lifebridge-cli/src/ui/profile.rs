//! The signed-in user's profile: a read-only card, or the edit form.

use lifebridge_client::views::{Phase, profile::ProfileView};
use lifebridge_core::validate::FormMode;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::{capitalize, dim, forms};
use crate::fields::{self, Editable};

pub fn draw(f: &mut Frame, area: Rect, view: &ProfileView, focus: usize) {
  let layout = fields::person(view.kind(), FormMode::Edit);

  if let Some(draft) = view.draft() {
    let title = format!("Edit {} profile", view.kind().noun());
    forms::draw_form(f, area, draft, forms::FormView {
      title: &title,
      fields: &layout,
      focus,
      errors: view.errors(),
      busy: view.is_busy(),
    });
    return;
  }

  let title = match view.subject() {
    Some(subject) => format!(" {} profile  {subject} ", capitalize(view.kind().noun())),
    None => format!(" {} profile ", capitalize(view.kind().noun())),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(dim());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(person) = view.record() else {
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
    Line::from(Span::styled(
      person.full_name(),
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
  ];
  for spec in &layout {
    let value = person.value(spec.key);
    lines.push(Line::from(vec![
      Span::styled(
        format!("{:<16}", spec.label),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      if value.is_empty() {
        Span::styled("—", dim())
      } else {
        Span::raw(value)
      },
    ]));
  }
  if view.is_busy() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Saving…", Style::default().fg(Color::Yellow))));
  }
  f.render_widget(Paragraph::new(lines), inner);
}
