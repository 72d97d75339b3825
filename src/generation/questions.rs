use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Difficulty, Grade, Question, Topic};
use crate::provider::{ContentProvider, GenerationRequest};
use crate::retry::{RetryPolicy, with_retry};

use super::Outcome;
use super::prompt::{QUESTION_TEMPERATURE, question_prompt, question_schema};

/// Why a provider payload could not become a question set.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("provider returned no text")]
    Empty,

    #[error("payload is not a question array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload contained no usable question")]
    NoUsableQuestion,
}

/// A question as the provider sends it, before validation and id assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    question_text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer_index: Option<i64>,
    #[serde(default)]
    difficulty: Difficulty,
    svg: Option<String>,
}

impl RawQuestion {
    /// Validate and assign an id; `next_id` is only called for a usable question.
    fn into_question(self, next_id: impl FnOnce() -> u64) -> Option<Question> {
        let text = self.question_text.trim();
        if text.is_empty() || self.options.is_empty() {
            return None;
        }

        let index = usize::try_from(self.correct_answer_index?).ok()?;
        if index >= self.options.len() {
            return None;
        }

        Some(Question {
            id: next_id(),
            question_text: text.to_string(),
            options: self.options,
            correct_answer_index: index,
            difficulty: self.difficulty,
            svg: self.svg.filter(|svg| !svg.trim().is_empty()),
        })
    }
}

/// Parse a provider payload, dropping elements that break the question invariants.
///
/// `next_id` is called once per kept question.
pub fn parse_questions(
    text: &str,
    mut next_id: impl FnMut() -> u64,
) -> Result<Vec<Question>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let total = raw.len();

    let questions: Vec<Question> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawQuestion>(value).ok())
        .filter_map(|raw| raw.into_question(&mut next_id))
        .collect();

    if questions.len() < total {
        tracing::warn!("Dropped {} malformed question(s) out of {}", total - questions.len(), total);
    }

    if questions.is_empty() {
        return Err(ParseError::NoUsableQuestion);
    }

    Ok(questions)
}

/// The single question served when generation fails.
pub fn fallback_question(id: u64, grade: Grade) -> Question {
    Question {
        id,
        question_text: format!(
            "Maaf, Cikgu Syafiq sedang sibuk. Soalan percubaan untuk Tahun {}: 5 + 5 = ?",
            grade
        ),
        options: ["8", "10", "12", "15"].map(String::from).to_vec(),
        correct_answer_index: 1,
        difficulty: Difficulty::Mudah,
        svg: None,
    }
}

/// Generates question sets for a quiz session.
pub struct QuestionClient {
    provider: Arc<dyn ContentProvider>,
    policy: RetryPolicy,
    next_id: AtomicU64,
}

impl QuestionClient {
    pub fn new(provider: Arc<dyn ContentProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Ask the provider for `count` questions. Never fails: on any error a
    /// one-question fallback set is returned.
    pub async fn generate(
        &self,
        topic: Topic,
        grade: Grade,
        count: usize,
        mode: Difficulty,
    ) -> Outcome<Vec<Question>> {
        tracing::info!("Generating {} {} questions for Tahun {} / {}", count, mode, grade, topic);

        let request = GenerationRequest::json(
            question_prompt(topic, grade, count, mode),
            question_schema(),
            QUESTION_TEMPERATURE,
        );

        let response = with_retry(self.policy, || self.provider.generate(&request)).await;

        let parsed = match response {
            Ok(Some(text)) => parse_questions(&text, || self.allocate_id()),
            Ok(None) => Err(ParseError::Empty),
            Err(err) => {
                tracing::error!("Question generation failed: {}", err);
                return Outcome::Fallback(vec![fallback_question(self.allocate_id(), grade)]);
            }
        };

        match parsed {
            Ok(questions) => {
                tracing::info!("Received {} questions", questions.len());
                Outcome::Fresh(questions)
            }
            Err(err) => {
                tracing::error!("Unusable question payload: {}", err);
                Outcome::Fallback(vec![fallback_question(self.allocate_id(), grade)])
            }
        }
    }
}
