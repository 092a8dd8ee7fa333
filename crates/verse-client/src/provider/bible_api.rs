use async_trait::async_trait;
use sanctuary_core::reference::Reference;
use sanctuary_core::verse::Verse;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{check_status, http_client, transport, VerseProvider};
use crate::error::AttemptError;
use crate::Result;

/// Plain JSON scripture API: `GET {base_url}/{reference}?translation=..`.
pub struct BibleApiProvider {
    http: reqwest::Client,
    base_url: String,
    translation: String,
}

#[derive(Debug, Deserialize)]
struct BibleApiBody {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BibleApiProvider {
    pub fn new(base_url: impl Into<String>, translation: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            translation: translation.into(),
        })
    }

    fn url_for(&self, reference: &Reference) -> String {
        format!("{}/{}", self.base_url, reference.url_path())
    }
}

#[async_trait]
impl VerseProvider for BibleApiProvider {
    fn name(&self) -> &'static str {
        "bible-api"
    }

    #[instrument(skip(self, reference), fields(reference = %reference))]
    async fn lookup(&self, reference: &Reference) -> std::result::Result<Verse, AttemptError> {
        let response = self
            .http
            .get(self.url_for(reference))
            .query(&[("translation", self.translation.as_str())])
            .send()
            .await
            .map_err(transport)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AttemptError::Permanent(format!("{reference} was not found")));
        }
        check_status(response.status())?;

        let body: BibleApiBody = response
            .json()
            .await
            .map_err(|e| AttemptError::Permanent(format!("unreadable response: {e}")))?;
        debug!("received verse body");

        if let Some(message) = body.error {
            return Err(AttemptError::Permanent(message));
        }
        match (body.reference, body.text) {
            (Some(reference), Some(text)) if !text.trim().is_empty() => {
                Ok(Verse::new(reference, text.trim()))
            }
            _ => Err(AttemptError::Permanent(
                "response is missing reference or text".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn john_3_16() -> Reference {
        Reference::parse("John 3:16").unwrap()
    }

    #[tokio::test]
    async fn lookup_parses_reference_and_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::UrlEncoded("translation".into(), "kjv".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reference":"John 3:16","text":"For God so loved the world...\n"}"#)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        let verse = provider.lookup(&john_3_16()).await.unwrap();
        assert_eq!(verse, Verse::new("John 3:16", "For God so loved the world..."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        assert_eq!(
            provider.lookup(&john_3_16()).await,
            Err(AttemptError::RateLimited)
        );
    }

    #[tokio::test]
    async fn server_error_is_a_retryable_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        let err = provider.lookup(&john_3_16()).await.unwrap_err();
        assert_eq!(err, AttemptError::Status(502));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn error_payload_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":"not found"}"#)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        assert_eq!(
            provider.lookup(&john_3_16()).await,
            Err(AttemptError::Permanent("not found".into()))
        );
    }

    #[tokio::test]
    async fn not_found_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":"not found"}"#)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        assert_eq!(
            provider.lookup(&john_3_16()).await,
            Err(AttemptError::Permanent("John 3:16 was not found".into()))
        );
    }

    #[tokio::test]
    async fn missing_text_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/john+3:16")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"reference":"John 3:16"}"#)
            .create_async()
            .await;

        let provider = BibleApiProvider::new(server.url(), "kjv").unwrap();
        let err = provider.lookup(&john_3_16()).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let provider = BibleApiProvider::new("http://127.0.0.1:9", "kjv").unwrap();
        let err = provider.lookup(&john_3_16()).await.unwrap_err();
        assert!(matches!(err, AttemptError::Transport(_)), "{err:?}");
    }
}
