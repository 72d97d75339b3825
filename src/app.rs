use std::collections::HashMap;

use crate::generation::Outcome;
use crate::models::{Difficulty, Grade, NewScore, Question, ScoreRecord, Topic};

pub const NAME_MAX_LENGTH: usize = 24;
pub const MISSING_NAME_ERROR: &str = "Sila masukkan nama adik dahulu ya!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Name entry and grade selection.
    Welcome,
    TopicSelect,
    DifficultySelect,
    Loading,
    Quiz,
    Result,
}

/// Side effects the event loop performs for the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Generate {
        request_id: u64,
        topic: Topic,
        grade: Grade,
        mode: Difficulty,
    },
    Explain {
        question_id: u64,
        question: String,
        answer: String,
        grade: Grade,
    },
    SaveScore(NewScore),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    Loading,
    Ready { text: String, fallback: bool },
}

/// One run through a question set.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    selected: usize,
    answers: Vec<Option<usize>>,
    explanations: HashMap<u64, Explanation>,
    fallback: bool,
}

impl QuizSession {
    fn new(outcome: Outcome<Vec<Question>>) -> Self {
        let fallback = outcome.is_fallback();
        let questions = outcome.into_inner();
        let answers = vec![None; questions.len()];

        Self {
            questions,
            current: 0,
            selected: 0,
            answers,
            explanations: HashMap::new(),
            fallback,
        }
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn current_number(&self) -> usize {
        self.current + 1
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_option(&self) -> usize {
        self.selected
    }

    /// Answer given to the current question, if any.
    pub fn current_answer(&self) -> Option<usize> {
        self.answers[self.current]
    }

    /// The current question has been answered, incorrectly.
    pub fn answered_wrong(&self) -> bool {
        self.current_answer()
            .is_some_and(|answer| !self.current_question().is_correct(answer))
    }

    pub fn current_explanation(&self) -> Option<&Explanation> {
        self.explanations.get(&self.current_question().id)
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| answer.is_some_and(|a| question.is_correct(a)))
            .count()
    }

    fn option_count(&self) -> usize {
        self.current_question().options.len().max(1)
    }
}

pub struct App {
    pub screen: Screen,
    name: String,
    name_error: Option<String>,
    grade_cursor: usize,
    topic_cursor: usize,
    difficulty_cursor: usize,
    grade: Option<Grade>,
    topic: Option<Topic>,
    mode: Option<Difficulty>,
    next_request_id: u64,
    pending_request: Option<u64>,
    session: Option<QuizSession>,
    leaderboard: Vec<ScoreRecord>,
    saved_id: Option<String>,
    result_scroll: usize,
    ticks: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            name: String::new(),
            name_error: None,
            grade_cursor: 0,
            topic_cursor: 0,
            difficulty_cursor: 0,
            grade: None,
            topic: None,
            mode: None,
            next_request_id: 1,
            pending_request: None,
            session: None,
            leaderboard: Vec::new(),
            saved_id: None,
            result_scroll: 0,
            ticks: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_error(&self) -> Option<&str> {
        self.name_error.as_deref()
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn mode(&self) -> Option<Difficulty> {
        self.mode
    }

    pub fn grade_cursor(&self) -> usize {
        self.grade_cursor
    }

    pub fn topic_cursor(&self) -> usize {
        self.topic_cursor
    }

    pub fn difficulty_cursor(&self) -> usize {
        self.difficulty_cursor
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn leaderboard(&self) -> &[ScoreRecord] {
        &self.leaderboard
    }

    /// Id of the record saved for the session just finished.
    pub fn saved_id(&self) -> Option<&str> {
        self.saved_id.as_deref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    // Welcome

    pub fn name_push(&mut self, c: char) {
        if self.name.chars().count() < NAME_MAX_LENGTH && !c.is_control() {
            self.name.push(c);
            self.name_error = None;
        }
    }

    pub fn name_pop(&mut self) {
        self.name.pop();
    }

    pub fn select_next_grade(&mut self) {
        self.grade_cursor = (self.grade_cursor + 1) % usize::from(Grade::MAX);
    }

    pub fn select_previous_grade(&mut self) {
        let count = usize::from(Grade::MAX);
        self.grade_cursor = (self.grade_cursor + count - 1) % count;
    }

    /// Accept the highlighted grade. Requires a name.
    pub fn confirm_grade(&mut self) -> bool {
        if self.name.trim().is_empty() {
            self.name_error = Some(MISSING_NAME_ERROR.to_string());
            return false;
        }

        self.grade = Grade::all().nth(self.grade_cursor);
        self.topic = None;
        self.mode = None;
        self.screen = Screen::TopicSelect;
        true
    }

    // Topic

    pub fn select_next_topic(&mut self) {
        self.topic_cursor = (self.topic_cursor + 1) % Topic::ALL.len();
    }

    pub fn select_previous_topic(&mut self) {
        let count = Topic::ALL.len();
        self.topic_cursor = (self.topic_cursor + count - 1) % count;
    }

    pub fn confirm_topic(&mut self) {
        self.topic = Some(Topic::ALL[self.topic_cursor]);
        self.mode = None;
        self.screen = Screen::DifficultySelect;
    }

    /// Back to grade selection, keeping the name.
    pub fn back_to_welcome(&mut self) {
        self.grade = None;
        self.topic = None;
        self.mode = None;
        self.screen = Screen::Welcome;
    }

    // Difficulty

    pub fn select_next_difficulty(&mut self) {
        self.difficulty_cursor = (self.difficulty_cursor + 1) % Difficulty::ALL.len();
    }

    pub fn select_previous_difficulty(&mut self) {
        let count = Difficulty::ALL.len();
        self.difficulty_cursor = (self.difficulty_cursor + count - 1) % count;
    }

    pub fn confirm_difficulty(&mut self) -> Option<Action> {
        self.start_quiz(Difficulty::ALL[self.difficulty_cursor])
    }

    pub fn back_to_topics(&mut self) {
        self.topic = None;
        self.mode = None;
        self.screen = Screen::TopicSelect;
    }

    fn start_quiz(&mut self, mode: Difficulty) -> Option<Action> {
        let (grade, topic) = (self.grade?, self.topic?);
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        self.mode = Some(mode);
        self.pending_request = Some(request_id);
        self.session = None;
        self.screen = Screen::Loading;

        Some(Action::Generate {
            request_id,
            topic,
            grade,
            mode,
        })
    }

    /// Message for the loading screen.
    pub fn loading_message(&self) -> String {
        match (self.mode, self.topic) {
            (Some(mode), Some(topic)) => format!(
                "Sedang menjana {} soalan {} untuk topik {}...",
                mode.question_count(),
                mode,
                topic
            ),
            _ => "Sedang menjana soalan...".to_string(),
        }
    }

    /// Leave the loading screen. The request keeps running; its result is dropped.
    pub fn cancel_loading(&mut self) {
        self.pending_request = None;
        self.mode = None;
        self.screen = Screen::DifficultySelect;
    }

    /// Deliver a generated question set. Results for superseded requests are dropped.
    pub fn questions_ready(&mut self, request_id: u64, outcome: Outcome<Vec<Question>>) {
        if self.pending_request != Some(request_id) || self.screen != Screen::Loading {
            tracing::debug!("Discarding stale question set {}", request_id);
            return;
        }

        self.pending_request = None;
        if outcome.value().is_empty() {
            // Clients never return an empty set; treat it like a cancelled load.
            self.screen = Screen::DifficultySelect;
            return;
        }

        self.session = Some(QuizSession::new(outcome));
        self.screen = Screen::Quiz;
    }

    // Quiz

    pub fn select_next_option(&mut self) {
        if let Some(session) = self.session.as_mut().filter(|s| s.current_answer().is_none()) {
            session.selected = (session.selected + 1) % session.option_count();
        }
    }

    pub fn select_previous_option(&mut self) {
        if let Some(session) = self.session.as_mut().filter(|s| s.current_answer().is_none()) {
            let count = session.option_count();
            session.selected = (session.selected + count - 1) % count;
        }
    }

    /// Lock in the highlighted option. Once answered a question cannot change.
    pub fn submit_answer(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let current = session.current;
            if session.answers[current].is_none() {
                session.answers[current] = Some(session.selected);
            }
        }
    }

    /// Move on after an answered question. Finishing the set moves to results
    /// and asks for the score to be saved.
    pub fn next_question(&mut self) -> Option<Action> {
        let session = self.session.as_mut()?;
        session.current_answer()?;

        if session.current + 1 < session.questions.len() {
            session.current += 1;
            session.selected = 0;
            return None;
        }

        let score = NewScore {
            name: self.name.clone(),
            grade: self.grade?,
            topic: self.topic?,
            difficulty: self.mode?,
            score: u32::try_from(session.score()).unwrap_or(u32::MAX),
            total_questions: u32::try_from(session.total()).unwrap_or(u32::MAX),
        };

        self.leaderboard.clear();
        self.saved_id = None;
        self.result_scroll = 0;
        self.screen = Screen::Result;
        Some(Action::SaveScore(score))
    }

    /// Ask for an explanation of the current question after a wrong answer.
    pub fn request_explanation(&mut self) -> Option<Action> {
        let grade = self.grade?;
        let session = self.session.as_mut()?;
        if !session.answered_wrong() {
            return None;
        }

        let question = session.current_question();
        let question_id = question.id;
        if session.explanations.contains_key(&question_id) {
            return None;
        }

        let action = Action::Explain {
            question_id,
            question: question.question_text.clone(),
            answer: question.correct_option().unwrap_or_default().to_string(),
            grade,
        };
        session.explanations.insert(question_id, Explanation::Loading);
        Some(action)
    }

    pub fn explanation_ready(&mut self, question_id: u64, outcome: Outcome<String>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(slot) = session.explanations.get_mut(&question_id) {
            let fallback = outcome.is_fallback();
            *slot = Explanation::Ready {
                text: outcome.into_inner(),
                fallback,
            };
        }
    }

    // Result

    pub fn show_leaderboard(&mut self, saved: Option<ScoreRecord>, board: Vec<ScoreRecord>) {
        self.saved_id = saved.map(|record| record.id);
        self.leaderboard = board;
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self
            .session
            .as_ref()
            .map_or(0, |s| s.total().saturating_sub(1));
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Fresh question set for the same topic and mode.
    pub fn restart(&mut self) -> Option<Action> {
        let mode = self.mode?;
        self.start_quiz(mode)
    }

    /// Back to the first screen with everything cleared.
    pub fn home(&mut self) {
        *self = Self {
            next_request_id: self.next_request_id,
            ..Self::new()
        };
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Encouragement shown on the results screen.
pub fn result_message(percentage: u32) -> &'static str {
    match percentage {
        100..=u32::MAX => "Hebat! Pemenang Matematik Sejati!",
        80..=99 => "Syabas! Usaha yang sangat baik!",
        50..=79 => "Boleh tahan! Cuba lagi untuk cemerlang.",
        _ => "Jangan putus asa, belajar dari kesilapan!",
    }
}

pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((score as f64 / total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fallback_question;

    fn question(id: u64, correct: usize) -> Question {
        Question {
            id,
            question_text: format!("Soalan {}", id),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer_index: correct,
            difficulty: Difficulty::Mudah,
            svg: None,
        }
    }

    fn app_at_difficulty() -> App {
        let mut app = App::new();
        for c in "Aina".chars() {
            app.name_push(c);
        }
        app.select_next_grade();
        app.select_next_grade();
        assert!(app.confirm_grade());
        app.select_next_topic();
        app.confirm_topic();
        app
    }

    fn app_in_quiz(questions: Vec<Question>) -> App {
        let mut app = app_at_difficulty();
        let Some(Action::Generate { request_id, .. }) = app.confirm_difficulty() else {
            panic!("expected a generate action");
        };
        app.questions_ready(request_id, Outcome::Fresh(questions));
        app
    }

    #[test]
    fn test_grade_requires_name() {
        let mut app = App::new();
        assert!(!app.confirm_grade());
        assert_eq!(app.name_error(), Some(MISSING_NAME_ERROR));
        assert_eq!(app.screen, Screen::Welcome);

        app.name_push('Z');
        assert_eq!(app.name_error(), None);
        assert!(app.confirm_grade());
        assert_eq!(app.grade(), Grade::new(1).ok());
        assert_eq!(app.screen, Screen::TopicSelect);
    }

    #[test]
    fn test_difficulty_starts_generation() {
        let mut app = app_at_difficulty();
        app.select_next_difficulty();

        let action = app.confirm_difficulty();
        assert_eq!(
            action,
            Some(Action::Generate {
                request_id: 1,
                topic: Topic::Pecahan,
                grade: Grade::new(3).unwrap(),
                mode: Difficulty::Sederhana,
            })
        );
        assert_eq!(app.screen, Screen::Loading);
        assert!(app.loading_message().contains("30 soalan Sederhana"));
    }

    #[test]
    fn test_stale_question_set_is_ignored() {
        let mut app = app_at_difficulty();
        app.confirm_difficulty();
        app.questions_ready(99, Outcome::Fresh(vec![question(1, 0)]));
        assert_eq!(app.screen, Screen::Loading);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_cancelled_load_drops_late_result() {
        let mut app = app_at_difficulty();
        let Some(Action::Generate { request_id, .. }) = app.confirm_difficulty() else {
            panic!("expected a generate action");
        };
        app.cancel_loading();
        app.questions_ready(request_id, Outcome::Fresh(vec![question(1, 0)]));

        assert_eq!(app.screen, Screen::DifficultySelect);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_answer_is_locked_and_scored() {
        let mut app = app_in_quiz(vec![question(1, 1), question(2, 0)]);

        app.select_next_option();
        app.submit_answer();
        app.select_next_option();
        app.submit_answer();
        let session = app.session().unwrap();
        assert_eq!(session.current_answer(), Some(1));
        assert_eq!(session.selected_option(), 1);

        assert_eq!(app.next_question(), None);
        app.select_next_option();
        app.submit_answer();

        let Some(Action::SaveScore(score)) = app.next_question() else {
            panic!("expected the score to be saved");
        };
        assert_eq!(score.score, 1);
        assert_eq!(score.total_questions, 2);
        assert_eq!(score.name, "Aina");
        assert_eq!(app.screen, Screen::Result);
    }

    #[test]
    fn test_cannot_skip_unanswered_question() {
        let mut app = app_in_quiz(vec![question(1, 0), question(2, 0)]);
        assert_eq!(app.next_question(), None);
        assert_eq!(app.session().unwrap().current_number(), 1);
    }

    #[test]
    fn test_explanation_requested_once_per_question() {
        let mut app = app_in_quiz(vec![question(7, 2)]);
        assert_eq!(app.request_explanation(), None);

        app.submit_answer();
        let action = app.request_explanation();
        assert_eq!(
            action,
            Some(Action::Explain {
                question_id: 7,
                question: "Soalan 7".to_string(),
                answer: "C".to_string(),
                grade: Grade::new(3).unwrap(),
            })
        );
        assert_eq!(app.request_explanation(), None);

        app.explanation_ready(7, Outcome::Fallback("semak buku".to_string()));
        assert_eq!(
            app.session().unwrap().current_explanation(),
            Some(&Explanation::Ready {
                text: "semak buku".to_string(),
                fallback: true
            })
        );
    }

    #[test]
    fn test_no_explanation_after_correct_answer() {
        let mut app = app_in_quiz(vec![question(4, 0)]);
        app.submit_answer();

        let session = app.session().unwrap();
        assert_eq!(session.current_answer(), Some(0));
        assert!(!session.answered_wrong());
        assert_eq!(app.request_explanation(), None);
        assert_eq!(app.session().unwrap().current_explanation(), None);
    }

    #[test]
    fn test_fallback_set_is_flagged() {
        let mut app = app_at_difficulty();
        let Some(Action::Generate { request_id, grade, .. }) = app.confirm_difficulty() else {
            panic!("expected a generate action");
        };
        app.questions_ready(request_id, Outcome::Fallback(vec![fallback_question(1, grade)]));

        let session = app.session().unwrap();
        assert!(session.is_fallback());
        assert_eq!(session.total(), 1);
    }

    #[test]
    fn test_home_clears_everything() {
        let mut app = app_in_quiz(vec![question(1, 0)]);
        app.home();
        assert_eq!(app.screen, Screen::Welcome);
        assert_eq!(app.name(), "");
        assert!(app.session().is_none());
        assert!(app.grade().is_none());
    }

    #[test]
    fn test_result_messages() {
        assert_eq!(percentage(7, 10), 70);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(result_message(100), "Hebat! Pemenang Matematik Sejati!");
        assert_eq!(result_message(80), "Syabas! Usaha yang sangat baik!");
        assert_eq!(result_message(50), "Boleh tahan! Cuba lagi untuk cemerlang.");
        assert_eq!(result_message(49), "Jangan putus asa, belajar dari kesilapan!");
    }
}
