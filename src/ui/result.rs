use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, QuizSession, percentage, result_message};

use super::render_controls;

const QUESTION_PREVIEW_LENGTH: usize = 45;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let body = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_score_summary(frame, chunks[0], app, session);
    render_question_breakdown(frame, body[0], session, app.result_scroll());
    render_leaderboard(frame, body[1], app);
    render_controls(frame, chunks[2], "j/k skrol  ·  r ulang  ·  h menu utama  ·  q keluar");
}

fn get_grade_color(percentage: u32) -> Color {
    match percentage {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, app: &App, session: &QuizSession) {
    let score = session.score();
    let total = session.total();
    let percentage = percentage(score, total);

    let content = vec![
        Line::from(Span::styled(
            "KEPUTUSAN",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("{} · Tahun {}", app.name(), app.grade().map_or(0, |g| g.value())),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({}%)", score, total, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(result_message(percentage).fg(Color::White)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, session: &QuizSession, scroll: usize) {
    let lines: Vec<Line> = session
        .answers()
        .iter()
        .zip(session.questions().iter())
        .enumerate()
        .map(|(index, (answer, question))| {
            let is_correct = answer.is_some_and(|a| question.is_correct(a));
            let (symbol, color) = if is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_question(&question.question_text),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(widget, area);
}

fn render_leaderboard(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Papan Pendahulu · {} ",
        app.topic().map(|t| t.title()).unwrap_or_default()
    );

    let lines: Vec<Line> = if app.leaderboard().is_empty() {
        vec![Line::from("Belum ada rekod.".fg(Color::DarkGray))]
    } else {
        app.leaderboard()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let is_you = app.saved_id() == Some(record.id.as_str());
                let style = if is_you {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::Gray)
                };

                Line::from(vec![
                    Span::styled(format!("{:2}. ", index + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{:<16} ", record.name), style),
                    Span::styled(
                        format!("{:>3}/{:<3} {:>3}% ", record.score, record.total_questions, record.percentage()),
                        style,
                    ),
                    Span::styled(record.difficulty.label(), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::LEFT)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
