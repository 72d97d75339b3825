use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Explanation, QuizSession};

use super::render_controls;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app, session);
    render_notice(frame, chunks[1], session);
    render_question_text(frame, chunks[2], session);
    render_options(frame, chunks[3], session);
    render_feedback(frame, chunks[4], session);

    let controls = if session.answered_wrong() {
        "e penjelasan  ·  enter seterusnya  ·  esc menu"
    } else if session.current_answer().is_some() {
        "enter seterusnya  ·  esc menu"
    } else {
        "j/k pilih  ·  enter jawab  ·  esc menu"
    };
    render_controls(frame, chunks[5], controls);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, session: &QuizSession) {
    let left = format!(
        "{} · Tahun {} · {}",
        app.name(),
        app.grade().map_or(0, |g| g.value()),
        app.topic().map(|t| t.title()).unwrap_or_default()
    );
    let right = format!("Soalan {}/{}", session.current_number(), session.total());

    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]).split(area);
    frame.render_widget(Paragraph::new(left).fg(Color::DarkGray), halves[0]);
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        halves[1],
    );
}

fn render_notice(frame: &mut Frame, area: Rect, session: &QuizSession) {
    if session.is_fallback() {
        let widget = Paragraph::new("Perkhidmatan soalan tidak dapat dihubungi. Ini soalan percubaan.")
            .fg(Color::Yellow)
            .italic();
        frame.render_widget(widget, area);
    }
}

fn render_question_text(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let question = session.current_question();
    let mut lines = vec![Line::from(Span::styled(
        question.question_text.as_str(),
        Style::default().fg(Color::White).bold(),
    ))];

    if question.has_diagram() {
        lines.push(Line::from(
            "(Soalan ini disertakan gambar rajah)".fg(Color::DarkGray),
        ));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let question = session.current_question();
    let answer = session.current_answer();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == session.selected_option();
        let style = match answer {
            None if is_selected => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
            Some(_) if question.is_correct(index) => Style::default().fg(Color::Green).bold(),
            Some(given) if given == index => Style::default().fg(Color::Red).bold(),
            Some(_) => Style::default().fg(Color::DarkGray),
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let Some(given) = session.current_answer() else {
        return;
    };

    let question = session.current_question();
    let mut lines = if question.is_correct(given) {
        vec![Line::from(Span::styled(
            "Betul! Syabas!",
            Style::default().fg(Color::Green).bold(),
        ))]
    } else {
        vec![Line::from(vec![
            Span::styled("Salah. ", Style::default().fg(Color::Red).bold()),
            Span::styled("Jawapan betul: ", Style::default().fg(Color::Gray)),
            Span::styled(
                question.correct_option().unwrap_or_default(),
                Style::default().fg(Color::Green),
            ),
        ])]
    };

    match session.current_explanation() {
        Some(Explanation::Loading) => {
            lines.push(Line::from("Cikgu sedang menulis penjelasan...".fg(Color::Yellow)));
        }
        Some(Explanation::Ready { text, fallback }) => {
            let color = if *fallback { Color::DarkGray } else { Color::White };
            lines.push(Line::from(Span::styled(text.as_str(), Style::default().fg(color))));
        }
        None => {}
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
