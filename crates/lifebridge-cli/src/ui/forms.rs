//! Generic form rendering: one labelled row per field, inline errors.

use lifebridge_core::validate::Validation;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use super::{centered, dim};
use crate::fields::{Editable, FieldKind, FieldSpec};

const LABEL_WIDTH: usize = 18;

pub struct FormView<'a> {
  pub title:  &'a str,
  pub fields: &'a [FieldSpec],
  pub focus:  usize,
  pub errors: &'a Validation,
  pub busy:   bool,
}

/// Lines for every field of `target`, with errors under the fields they
/// belong to.
pub fn field_lines(target: &impl Editable, view: &FormView<'_>) -> Vec<Line<'static>> {
  let mut lines = Vec::new();
  for (i, spec) in view.fields.iter().enumerate() {
    let focused = i == view.focus;
    let raw = target.value(spec.key);
    let shown = match spec.kind {
      FieldKind::Secret => "•".repeat(raw.chars().count()),
      FieldKind::Choice(_) | FieldKind::Picker if raw.is_empty() => "◂ select ▸".to_string(),
      FieldKind::Choice(_) | FieldKind::Picker | FieldKind::Rating => format!("◂ {raw} ▸"),
      FieldKind::Text | FieldKind::ReadOnly => raw,
    };
    let cursor = if focused && matches!(spec.kind, FieldKind::Text | FieldKind::Secret) {
      "_"
    } else {
      ""
    };

    let label_style = if focused {
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let value_style = match spec.kind {
      FieldKind::ReadOnly => dim(),
      _ if focused => Style::default().add_modifier(Modifier::BOLD),
      _ => Style::default(),
    };

    lines.push(Line::from(vec![
      Span::styled(if focused { "▸ " } else { "  " }, label_style),
      Span::styled(format!("{:<LABEL_WIDTH$}", spec.label), label_style),
      Span::styled(format!("{shown}{cursor}"), value_style),
    ]));
    if let Some(error) = view.errors.error(spec.key) {
      lines.push(Line::from(Span::styled(
        format!("  {:<LABEL_WIDTH$}{error}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }
  lines
}

/// Render a centred form box into `area`.
pub fn draw_form(f: &mut Frame, area: Rect, target: &impl Editable, view: FormView<'_>) {
  let mut lines = field_lines(target, &view);
  lines.push(Line::from(""));
  lines.push(if view.busy {
    Line::from(Span::styled("  Submitting…", Style::default().fg(Color::Yellow)))
  } else {
    Line::from(Span::styled("  Enter submit  Esc cancel", dim()))
  });

  let rect = centered(area, 72, lines.len() as u16 + 2);
  f.render_widget(Clear, rect);
  f.render_widget(
    Paragraph::new(lines).block(
      Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan)),
    ),
    rect,
  );
}

#[cfg(test)]
mod tests {
  use lifebridge_client::views::login::LoginView;
  use lifebridge_core::validate;

  use super::*;
  use crate::fields::LOGIN;

  fn text(line: &Line) -> String { line.spans.iter().map(|s| s.content.as_ref()).collect() }

  #[test]
  fn secrets_are_masked_and_errors_follow_their_field() {
    let mut login = LoginView::new();
    login.email = "ada".into();
    login.password = "abc".into();
    let errors = validate::login(&login.email, &login.password);
    let view = FormView { title: "Login", fields: &LOGIN, focus: 1, errors: &errors, busy: false };
    let lines: Vec<String> = field_lines(&login, &view).iter().map(text).collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("ada"));
    assert!(lines[1].contains(errors.error("email").unwrap()));
    assert!(lines[2].contains("Password"));
    assert!(lines[2].contains("•••_"));
    assert!(!lines[2].contains("abc"));
    assert!(lines[3].contains(errors.error("password").unwrap()));
  }
}
