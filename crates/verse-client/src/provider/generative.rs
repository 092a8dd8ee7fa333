use async_trait::async_trait;
use chrono::NaiveDate;
use sanctuary_core::reference::Reference;
use sanctuary_core::verse::Verse;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{check_status, http_client, transport, VerseProvider};
use crate::error::AttemptError;
use crate::Result;

/// Generative model asked to answer with `{"verse": .., "reference": ..}`.
pub struct GenerativeProvider {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersePayload {
    verse: String,
    reference: String,
}

impl GenerativeProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    async fn generate(&self, prompt: String) -> std::result::Result<Verse, AttemptError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        debug!(model = %self.model, "sending generate request");
        let response = self
            .http
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        check_status(response.status())?;

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| AttemptError::Permanent(format!("unreadable response: {e}")))?;
        parse_envelope(envelope)
    }
}

fn parse_envelope(envelope: Envelope) -> std::result::Result<Verse, AttemptError> {
    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| AttemptError::Permanent("response has no candidate text".to_string()))?;

    let payload: VersePayload = serde_json::from_str(strip_fence(&text))
        .map_err(|e| AttemptError::Permanent(format!("candidate is not a verse object: {e}")))?;
    if payload.verse.trim().is_empty() || payload.reference.trim().is_empty() {
        return Err(AttemptError::Permanent(
            "candidate has an empty verse or reference".to_string(),
        ));
    }
    Ok(Verse::new(payload.reference.trim(), payload.verse.trim()))
}

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl VerseProvider for GenerativeProvider {
    fn name(&self) -> &'static str {
        "generative"
    }

    #[instrument(skip(self, reference), fields(reference = %reference))]
    async fn lookup(&self, reference: &Reference) -> std::result::Result<Verse, AttemptError> {
        self.generate(format!(
            "Return the text of {reference} as a JSON object with the keys \
             \"verse\" (the verse text) and \"reference\" (the book, chapter and verse)."
        ))
        .await
    }

    #[instrument(skip(self))]
    async fn daily(&self, date: NaiveDate) -> std::result::Result<Verse, AttemptError> {
        self.generate(format!(
            "Suggest an encouraging Bible verse for {}. Return a JSON object with the \
             keys \"verse\" (the verse text) and \"reference\" (the book, chapter and verse).",
            date.format("%B %-d, %Y")
        ))
        .await
    }
}
