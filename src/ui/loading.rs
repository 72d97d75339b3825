use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

use super::{render_controls, title_line};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let spinner = SPINNER[app.ticks() % SPINNER.len()];
    let content = vec![
        Line::from(""),
        title_line(),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {}", spinner, app.loading_message()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from("Sila tunggu sebentar".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[3], "esc batal  ·  q keluar");
}
