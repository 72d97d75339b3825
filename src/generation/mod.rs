//! Question and explanation clients.
//!
//! Both clients hide provider failures behind an [`Outcome`]: the caller always
//! gets something to show, and can tell whether it is the canned fallback.

mod explanation;
mod prompt;
mod questions;

pub use explanation::{ExplanationClient, BUSY_EXPLANATION, EMPTY_EXPLANATION, FALLBACK_EXPLANATION};
pub use questions::{ParseError, QuestionClient, fallback_question, parse_questions};

/// Result of a call that degrades instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Content produced by the provider.
    Fresh(T),
    /// Static content used because the provider could not deliver.
    Fallback(T),
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Fresh(value) | Outcome::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Fresh(value) | Outcome::Fallback(value) => value,
        }
    }
}
