use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use matematik_pintar::generation::{BUSY_EXPLANATION, EMPTY_EXPLANATION, FALLBACK_EXPLANATION};
use matematik_pintar::{
    ContentProvider, Difficulty, ExplanationClient, GenerationRequest, Grade, Outcome, ProviderError,
    QuestionClient, RetryPolicy, Topic,
};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

type Reply = Result<Option<String>, ProviderError>;

/// Plays back canned replies in order and records every request it sees.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerationRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn generate(&self, request: &GenerationRequest) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::MissingApiKey))
    }
}

fn busy() -> Reply {
    Err(ProviderError::Status {
        status: 503,
        message: "The model is overloaded.".into(),
    })
}

fn bad_request() -> Reply {
    Err(ProviderError::Status {
        status: 400,
        message: "API key not valid.".into(),
    })
}

fn grade(value: u8) -> Grade {
    Grade::new(value).unwrap()
}

const TWO_QUESTIONS: &str = r#"[
    {"questionText": "3 + 4 = ?", "options": ["5", "6", "7", "8"], "correctAnswerIndex": 2},
    {"questionText": "Berapakah 10 - 6?", "options": ["4", "3", "2", "6"], "correctAnswerIndex": 0,
     "svg": "<svg></svg>"}
]"#;

#[tokio::test]
async fn test_questions_from_provider() {
    let provider = ScriptedProvider::new(vec![Ok(Some(TWO_QUESTIONS.to_string()))]);
    let client = QuestionClient::new(provider.clone(), RetryPolicy::default());

    let outcome = client.generate(Topic::Nombor, grade(2), 10, Difficulty::Mudah).await;

    assert!(!outcome.is_fallback());
    let questions = outcome.into_inner();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].correct_option(), Some("7"));
    assert_eq!(questions[0].difficulty, Difficulty::Mudah);
    assert!(questions[1].has_diagram());
    assert_ne!(questions[0].id, questions[1].id);
    assert_eq!(provider.calls(), 1);

    let request = provider.last_request();
    assert!(request.response_schema.is_some());
    assert!(request.prompt.contains("10"));
    assert!(request.prompt.contains("Tahun 2"));
}

#[tokio::test(start_paused = true)]
async fn test_questions_retry_through_busy_provider() {
    let provider = ScriptedProvider::new(vec![busy(), busy(), Ok(Some(TWO_QUESTIONS.to_string()))]);
    let client = QuestionClient::new(provider.clone(), RetryPolicy::default());

    let start = Instant::now();
    let outcome = client.generate(Topic::Pecahan, grade(4), 30, Difficulty::Sederhana).await;

    assert!(!outcome.is_fallback());
    assert_eq!(provider.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(2000 + 4000));
}

#[tokio::test(start_paused = true)]
async fn test_questions_fall_back_after_exhausting_retries() {
    let provider = ScriptedProvider::new(vec![busy(), busy(), busy(), busy(), busy()]);
    let client = QuestionClient::new(provider.clone(), RetryPolicy::default());

    let start = Instant::now();
    let outcome = client.generate(Topic::Wang, grade(3), 10, Difficulty::Mudah).await;

    assert_eq!(provider.calls(), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(14_000));

    let Outcome::Fallback(questions) = outcome else {
        panic!("expected the fallback question");
    };
    assert_eq!(questions.len(), 1);
    assert!(questions[0].question_text.contains("Tahun 3"));
    assert_eq!(questions[0].correct_option(), Some("10"));
}

#[tokio::test(start_paused = true)]
async fn test_questions_do_not_retry_permanent_errors() {
    let provider = ScriptedProvider::new(vec![bad_request(), Ok(Some(TWO_QUESTIONS.to_string()))]);
    let client = QuestionClient::new(provider.clone(), RetryPolicy::default());

    let start = Instant::now();
    let outcome = client.generate(Topic::Masa, grade(5), 10, Difficulty::Sukar).await;

    assert!(outcome.is_fallback());
    assert_eq!(provider.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_questions_fall_back_on_unusable_payload() {
    for reply in [
        Ok(None),
        Ok(Some("not json".to_string())),
        Ok(Some("[]".to_string())),
        Ok(Some(r#"[{"questionText": "?", "options": ["1"], "correctAnswerIndex": 3}]"#.to_string())),
    ] {
        let provider = ScriptedProvider::new(vec![reply]);
        let client = QuestionClient::new(provider.clone(), RetryPolicy::default());

        let outcome = client.generate(Topic::Data, grade(6), 10, Difficulty::Mudah).await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.value().len(), 1);
        assert_eq!(provider.calls(), 1);
    }
}

#[tokio::test]
async fn test_explanation_from_provider() {
    let provider = ScriptedProvider::new(vec![Ok(Some("  7 tolak 3 ialah 4.  \n".to_string()))]);
    let client = ExplanationClient::new(provider.clone(), RetryPolicy::default());

    let outcome = client.explain("7 - 3 = ?", "4", grade(1)).await;

    assert_eq!(outcome, Outcome::Fresh("7 tolak 3 ialah 4.".to_string()));
    let request = provider.last_request();
    assert!(request.response_schema.is_none());
    assert!(request.prompt.contains("7 - 3 = ?"));
}

#[tokio::test]
async fn test_explanation_without_text() {
    let provider = ScriptedProvider::new(vec![Ok(None)]);
    let client = ExplanationClient::new(provider, RetryPolicy::default());

    let outcome = client.explain("1 + 1 = ?", "2", grade(1)).await;

    assert_eq!(outcome, Outcome::Fallback(EMPTY_EXPLANATION.to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_explanation_busy_after_retries() {
    let provider = ScriptedProvider::new(vec![busy(), busy(), busy(), busy()]);
    let client = ExplanationClient::new(provider.clone(), RetryPolicy::default());

    let outcome = client.explain("1 + 1 = ?", "2", grade(1)).await;

    assert_eq!(outcome, Outcome::Fallback(BUSY_EXPLANATION.to_string()));
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn test_explanation_permanent_failure() {
    let provider = ScriptedProvider::new(vec![bad_request()]);
    let client = ExplanationClient::new(provider.clone(), RetryPolicy::default());

    let outcome = client.explain("1 + 1 = ?", "2", grade(1)).await;

    assert_eq!(outcome, Outcome::Fallback(FALLBACK_EXPLANATION.to_string()));
    assert_eq!(provider.calls(), 1);
}
