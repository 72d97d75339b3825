//! Name entry and grade selection.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::models::Grade;

use super::{render_controls, title_line};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let mut content = vec![
        Line::from(""),
        title_line(),
        Line::from("Latihan Matematik KSSR Sekolah Rendah".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Nama Pelajar: ", Style::default().fg(Color::White)),
            Span::styled(app.name(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    match app.name_error() {
        Some(err) => content.push(Line::from(Span::styled(err, Style::default().fg(Color::Red)))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(""));
    content.push(Line::from("Pilih Tahun / Darjah:".fg(Color::White)));
    content.push(Line::from(""));
    content.push(grade_line(app.grade_cursor()));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[3], "taip nama  ·  ←/→ tahun  ·  enter mula  ·  esc keluar");
}

fn grade_line(cursor: usize) -> Line<'static> {
    let spans: Vec<Span> = Grade::all()
        .enumerate()
        .map(|(index, grade)| {
            if index == cursor {
                Span::styled(
                    format!(" [Tahun {}] ", grade),
                    Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
                )
            } else {
                Span::styled(format!("  Tahun {}  ", grade), Style::default().fg(Color::Gray))
            }
        })
        .collect();
    Line::from(spans)
}
