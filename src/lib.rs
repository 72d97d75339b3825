//! # matematik-pintar
//!
//! A terminal mathematics quiz for Malaysian primary-school pupils (KSSR).
//! Questions come from a generative content service, scores go to a local
//! leaderboard.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use matematik_pintar::{Config, Quiz, QuizError, Services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::from_env();
//!     let services = Services::from_config(&config)?;
//!
//!     Quiz::new(services).run().await
//! }
//! ```

mod app;
pub mod config;
mod error;
pub mod generation;
pub mod leaderboard;
pub mod logging;
pub mod models;
pub mod provider;
pub mod retry;
pub mod terminal;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub use app::{Action, App, Explanation, QuizSession, Screen};
pub use config::Config;
pub use error::QuizError;
pub use generation::{ExplanationClient, Outcome, QuestionClient};
pub use leaderboard::{JsonFileStore, Leaderboard, MemoryStore, ScoreStore};
pub use models::{Difficulty, Grade, NewScore, Question, ScoreRecord, Topic};
pub use provider::{ContentProvider, GeminiProvider, GenerationRequest, ProviderError};
pub use retry::{RetryPolicy, Retryable, with_retry};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The clients and store the quiz works with.
pub struct Services {
    pub questions: QuestionClient,
    pub explanations: ExplanationClient,
    pub leaderboard: Leaderboard,
}

impl Services {
    pub fn new(provider: Arc<dyn ContentProvider>, policy: RetryPolicy, leaderboard: Leaderboard) -> Self {
        Self {
            questions: QuestionClient::new(Arc::clone(&provider), policy),
            explanations: ExplanationClient::new(provider, policy),
            leaderboard,
        }
    }

    /// Gemini provider and a JSON leaderboard in the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        if config.api_key.is_none() {
            tracing::warn!("No API key configured; every quiz will use the fallback question");
        }

        let provider = GeminiProvider::new(&config.api_base, &config.model, config.api_key.clone())?;
        let store = JsonFileStore::in_dir(&config.data_dir);
        tracing::info!(
            "Using model {} with leaderboard at {}",
            provider.model(),
            store.path().display()
        );

        Ok(Self::new(Arc::new(provider), config.retry, Leaderboard::new(store)))
    }
}

/// Results delivered by background tasks.
#[derive(Debug)]
enum AppEvent {
    QuestionsReady {
        request_id: u64,
        outcome: Outcome<Vec<Question>>,
    },
    ExplanationReady {
        question_id: u64,
        outcome: Outcome<String>,
    },
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
    services: Arc<Services>,
}

impl Quiz {
    pub fn new(services: Services) -> Self {
        Self {
            app: App::new(),
            services: Arc::new(services),
        }
    }

    /// Run the quiz in the terminal until the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &self.services).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    services: &Arc<Services>,
) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    loop {
        drain_events(app, &mut rx);
        terminal.draw(|frame| ui::render(frame, app))?;
        app.tick();

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match handle_input(app, key.code) {
                Some(Action::Quit) => break,
                Some(action) => dispatch(action, app, services, &tx),
                None => {}
            }
        }
    }

    Ok(())
}

fn drain_events(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            AppEvent::QuestionsReady { request_id, outcome } => {
                app.questions_ready(request_id, outcome);
            }
            AppEvent::ExplanationReady { question_id, outcome } => {
                app.explanation_ready(question_id, outcome);
            }
        }
    }
}

/// Carry out an action. Provider calls run in the background; the leaderboard
/// is local and answered inline.
fn dispatch(action: Action, app: &mut App, services: &Arc<Services>, tx: &UnboundedSender<AppEvent>) {
    match action {
        Action::Generate {
            request_id,
            topic,
            grade,
            mode,
        } => {
            let services = Arc::clone(services);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = services
                    .questions
                    .generate(topic, grade, mode.question_count(), mode)
                    .await;
                let _ = tx.send(AppEvent::QuestionsReady { request_id, outcome });
            });
        }
        Action::Explain {
            question_id,
            question,
            answer,
            grade,
        } => {
            let services = Arc::clone(services);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = services.explanations.explain(&question, &answer, grade).await;
                let _ = tx.send(AppEvent::ExplanationReady { question_id, outcome });
            });
        }
        Action::SaveScore(score) => {
            let (grade, topic) = (score.grade, score.topic);
            let saved = services.leaderboard.save_score(score);
            let board = services.leaderboard.top(grade, topic);
            app.show_leaderboard(saved, board);
        }
        Action::Quit => {}
    }
}

fn handle_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key),
        Screen::TopicSelect => handle_topic_input(app, key),
        Screen::DifficultySelect => handle_difficulty_input(app, key),
        Screen::Loading => handle_loading_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char(c) => app.name_push(c),
        KeyCode::Backspace => app.name_pop(),
        KeyCode::Right | KeyCode::Tab => app.select_next_grade(),
        KeyCode::Left | KeyCode::BackTab => app.select_previous_grade(),
        KeyCode::Enter => {
            app.confirm_grade();
        }
        KeyCode::Esc => return Some(Action::Quit),
        _ => {}
    }
    None
}

fn handle_topic_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_topic(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_topic(),
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm_topic(),
        KeyCode::Esc => app.back_to_welcome(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Action::Quit),
        _ => {}
    }
    None
}

fn handle_difficulty_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_difficulty(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_difficulty(),
        KeyCode::Enter | KeyCode::Char(' ') => return app.confirm_difficulty(),
        KeyCode::Esc => app.back_to_topics(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Action::Quit),
        _ => {}
    }
    None
}

fn handle_loading_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc => app.cancel_loading(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Action::Quit),
        _ => {}
    }
    None
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Option<Action> {
    let answered = app.session().is_some_and(|s| s.current_answer().is_some());

    match key {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Enter | KeyCode::Char(' ') if answered => return app.next_question(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char('e') | KeyCode::Char('E') => return app.request_explanation(),
        KeyCode::Esc => app.home(),
        _ => {}
    }
    None
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => return app.restart(),
        KeyCode::Char('h') | KeyCode::Char('H') => app.home(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Action::Quit),
        _ => {}
    }
    None
}
