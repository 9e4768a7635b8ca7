use ratatui::{prelude::*, widgets::*};

use crate::app::forms::TextInput;
use crate::models::{MessageKind, Notice};

/// Renders a text input field
pub fn render_input<'a>(input: &TextInput, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Green)
    } else if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(input.display()).block(block)
}

/// Renders a read-only field in the same frame as an input
pub fn render_readonly<'a>(value: &str, title: &'a str) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    Paragraph::new(value.to_string())
        .style(Style::default().fg(Color::Gray))
        .block(block)
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Message kind color
pub fn notice_color(kind: MessageKind) -> Color {
    match kind {
        MessageKind::Success => Color::Green,
        MessageKind::Error => Color::Red,
        MessageKind::Info => Color::Cyan,
    }
}

/// One styled line for an optional inline message
pub fn notice_line(notice: Option<&Notice>) -> Line<'static> {
    match notice {
        Some(n) => Line::from(Span::styled(
            n.text.clone(),
            Style::default().fg(notice_color(n.kind)),
        )),
        None => Line::default(),
    }
}

/// A two-way choice rendered as `[ A ]  B`
pub fn choice_line<'a>(label: &'a str, options: &[&'a str], selected: usize) -> Line<'a> {
    let mut spans = vec![Span::styled(format!("{label}: "), Style::default().fg(Color::Gray))];
    for (i, option) in options.iter().enumerate() {
        if i == selected {
            spans.push(Span::styled(
                format!("[ {} ]", option),
                Style::default().fg(Color::Yellow).bold(),
            ));
        } else {
            spans.push(Span::styled(
                format!("  {}  ", option),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
