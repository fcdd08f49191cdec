//! Issue summarization through the Gemini `generateContent` API.
//!
//! # Architecture
//!
//! - [`AskAsync`]: send text to a language model, get text back
//! - [`GeminiClient`]: REST implementation of [`AskAsync`]
//! - [`Summarizer`]: the capability the pipeline holds; either a client or the
//!   reason it is unavailable
//!
//! Requests are not retried. A failed call means no summary for this run.

use crate::config::GeminiSettings;
use crate::error::SummaryError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Prompt placed before the issue bundle text.
pub const SUMMARY_PROMPT: &str = "다음은 커뮤니티의 주요 이슈 게시물들을 모아놓은 텍스트입니다. \
전체 내용을 핵심만 간추려 3~5 문장의 완성된 문단으로 요약해주세요.\n\n---[원문]---\n";

/// Async text-in, text-out model call.
pub trait AskAsync {
    /// Send `text` to the model and return its reply.
    async fn ask(&self, text: &str) -> Result<String, SummaryError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }
}

impl AskAsync for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<String, SummaryError> {
        let t0 = Instant::now();
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        };

        let response = self.client.post(self.endpoint()).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini call rejected");
            return Err(SummaryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| SummaryError::EmptyResponse(format!("{e}: {}", truncate_for_log(&body, 300))))?;
        let reply = parsed
            .text()
            .ok_or_else(|| SummaryError::EmptyResponse(truncate_for_log(&body, 300)))?;

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, chars = reply.chars().count(), "Gemini call succeeded");
        Ok(reply)
    }
}

/// Summarization capability held by the pipeline.
#[derive(Debug, Clone)]
pub enum Summarizer {
    Gemini(GeminiClient),
    /// Not configured; the reason is logged when the step is skipped.
    Unavailable(String),
}

impl Summarizer {
    pub fn from_settings(settings: &GeminiSettings, client: Client) -> Self {
        match &settings.api_key {
            Some(key) => Summarizer::Gemini(GeminiClient::new(
                client,
                key.clone(),
                settings.model.clone(),
            )),
            None => Summarizer::Unavailable("GEMINI_API_KEY is not set".to_string()),
        }
    }

    /// Summarize an issue bundle in 3 to 5 sentences.
    pub async fn summarize(&self, issue_text: &str) -> Result<String, SummaryError> {
        match self {
            Summarizer::Gemini(client) => client.ask(&format!("{SUMMARY_PROMPT}{issue_text}")).await,
            Summarizer::Unavailable(reason) => Err(SummaryError::Unavailable(reason.clone())),
        }
    }
}
