use std::sync::Arc;

use crate::models::Grade;
use crate::provider::{ContentProvider, GenerationRequest};
use crate::retry::{RetryPolicy, Retryable, with_retry};

use super::Outcome;
use super::prompt::explanation_prompt;

/// Shown when the provider answered with no text.
pub const EMPTY_EXPLANATION: &str = "Maaf, tiada penjelasan dapat dijana buat masa ini.";
/// Shown when the provider stayed overloaded through every retry.
pub const BUSY_EXPLANATION: &str =
    "Cikgu Syafiq sedang sibuk sekarang. Cuba minta penjelasan sekali lagi sebentar nanti.";
/// Shown for every other failure.
pub const FALLBACK_EXPLANATION: &str = "Sila semak buku teks anda untuk jalan kerja yang lengkap.";

pub struct ExplanationClient {
    provider: Arc<dyn ContentProvider>,
    policy: RetryPolicy,
}

impl ExplanationClient {
    pub fn new(provider: Arc<dyn ContentProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Short worked explanation for the correct answer of a question.
    pub async fn explain(&self, question: &str, answer: &str, grade: Grade) -> Outcome<String> {
        let request = GenerationRequest::text(explanation_prompt(question, answer, grade));

        match with_retry(self.policy, || self.provider.generate(&request)).await {
            Ok(Some(text)) => Outcome::Fresh(text.trim().to_string()),
            Ok(None) => Outcome::Fallback(EMPTY_EXPLANATION.to_string()),
            Err(err) if err.is_retryable() => {
                tracing::warn!("Explanation gave up after retries: {}", err);
                Outcome::Fallback(BUSY_EXPLANATION.to_string())
            }
            Err(err) => {
                tracing::error!("Explanation failed: {}", err);
                Outcome::Fallback(FALLBACK_EXPLANATION.to_string())
            }
        }
    }
}
