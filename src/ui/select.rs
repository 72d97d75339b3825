//! Topic and difficulty menus.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{Difficulty, Topic};

use super::{render_controls, title_line};

pub fn render_topics(frame: &mut Frame, area: Rect, app: &App) {
    let subtitle = format!(
        "Hai {}! Tahun {} · pilih topik",
        app.name(),
        app.grade().map_or(0, |g| g.value())
    );
    let items: Vec<String> = Topic::ALL.iter().map(|t| t.title().to_string()).collect();

    render_menu(frame, area, &subtitle, &items, app.topic_cursor());
}

pub fn render_difficulties(frame: &mut Frame, area: Rect, app: &App) {
    let subtitle = format!(
        "{} · pilih tahap",
        app.topic().map_or("", Topic::title)
    );
    let items: Vec<String> = Difficulty::ALL
        .iter()
        .map(|d| format!("{:<10} {} soalan", d.label(), d.question_count()))
        .collect();

    render_menu(frame, area, &subtitle, &items, app.difficulty_cursor());
}

fn render_menu(frame: &mut Frame, area: Rect, subtitle: &str, items: &[String], selected: usize) {
    let height = u16::try_from(items.len() * 2 + 6).unwrap_or(u16::MAX);
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let mut lines = vec![
        Line::from(""),
        title_line().alignment(Alignment::Center),
        Line::from(subtitle.fg(Color::DarkGray)).alignment(Alignment::Center),
        Line::from(""),
    ];

    for (index, item) in items.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(item.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[3], "j/k pilih  ·  enter teruskan  ·  esc kembali");
}
