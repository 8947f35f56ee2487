use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::{QuestionDraft, QuestionRecord, QuizRequest};

use crate::error::GenerationError;

const SYSTEM_PROMPT: &str = "You are a quiz generator that creates multiple-choice questions. \
    Reply with a JSON object of the form {\"questions\": [{\"question\": \"...\", \
    \"options\": [\"...\", \"...\", \"...\", \"...\"], \"correctAnswers\": [\"...\"]}]}. \
    Every question has exactly 4 options, and correctAnswers is a non-empty subset of options.";

/// Upper bound on a single generation round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces an ordered list of validated questions for a quiz request.
///
/// One request/response round trip per call; no retry or streaming. A failed
/// call yields no partial data.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generate questions for the request.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the provider call fails or its reply
    /// violates the question invariants.
    async fn generate(&self, request: &QuizRequest) -> Result<Vec<QuestionRecord>, GenerationError>;
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// `QuizGenerator` backed by an OpenAI-compatible chat-completions endpoint
/// in JSON mode.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl OpenAiGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn request_chat(&self, prompt: &str) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("generator request failed with status {status}");
            return Err(GenerationError::HttpStatus(status));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl QuizGenerator for OpenAiGenerator {
    async fn generate(&self, request: &QuizRequest) -> Result<Vec<QuestionRecord>, GenerationError> {
        tracing::debug!(
            topic = request.topic(),
            count = request.question_count(),
            "requesting quiz questions"
        );

        let reply = self.request_chat(&request.prompt()).await?;
        let questions = parse_questions(&reply)?;

        tracing::debug!(count = questions.len(), "generated quiz questions");
        Ok(questions)
    }
}

/// Parse a JSON generator reply into validated question records.
fn parse_questions(reply: &str) -> Result<Vec<QuestionRecord>, GenerationError> {
    let payload: QuizPayload = serde_json::from_str(reply)?;
    if payload.questions.is_empty() {
        return Err(GenerationError::NoQuestions);
    }

    payload
        .questions
        .into_iter()
        .map(|question| question.into_draft().validate().map_err(GenerationError::from))
        .collect()
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuizPayload {
    questions: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    question: String,
    options: Vec<String>,
    correct_answers: Vec<String>,
}

impl QuestionPayload {
    fn into_draft(self) -> QuestionDraft {
        QuestionDraft {
            prompt: self.question,
            options: self.options,
            correct_options: self.correct_answers,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
