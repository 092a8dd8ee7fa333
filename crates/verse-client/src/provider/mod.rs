//! Remote verse sources.

mod bible_api;
mod generative;

pub use bible_api::BibleApiProvider;
pub use generative::GenerativeProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use sanctuary_core::config::ProviderConfig;
use sanctuary_core::reference::Reference;
use sanctuary_core::verse::{daily_verse, Verse};

use crate::error::{AttemptError, VerseClientError};
use crate::Result;

/// One attempt against a remote verse source.
///
/// Implementations make exactly one outbound call per method invocation and
/// classify its failure; retrying is the caller's concern.
#[async_trait]
pub trait VerseProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, reference: &Reference) -> std::result::Result<Verse, AttemptError>;

    /// Verse of the day. Defaults to looking up the built-in pick for `date`.
    async fn daily(&self, date: NaiveDate) -> std::result::Result<Verse, AttemptError> {
        let pick = daily_verse(&[], date);
        let reference = Reference::parse(&pick.reference)
            .map_err(|e| AttemptError::Permanent(e.to_string()))?;
        self.lookup(&reference).await
    }
}

/// Build the provider named in config.
pub fn from_config(cfg: &ProviderConfig) -> Result<Box<dyn VerseProvider>> {
    match cfg {
        ProviderConfig::BibleApi {
            base_url,
            translation,
        } => Ok(Box::new(BibleApiProvider::new(base_url, translation)?)),
        ProviderConfig::Generative {
            base_url,
            model,
            api_key_env,
        } => {
            let api_key = std::env::var(api_key_env)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| VerseClientError::MissingApiKey(api_key_env.clone()))?;
            Ok(Box::new(GenerativeProvider::new(base_url, model, api_key)?))
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("sanctuary/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .build()?)
}

pub(crate) fn transport(err: reqwest::Error) -> AttemptError {
    AttemptError::Transport(err.to_string())
}

/// Map a non-2xx response to an attempt error.
pub(crate) fn check_status(status: reqwest::StatusCode) -> std::result::Result<(), AttemptError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(AttemptError::from_status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bible_api_is_built_from_default_config() {
        let provider = from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "bible-api");
    }

    #[test]
    fn generative_requires_api_key() {
        let cfg = ProviderConfig::Generative {
            base_url: "http://localhost".into(),
            model: "m".into(),
            api_key_env: "SANCTUARY_TEST_KEY_THAT_IS_NEVER_SET".into(),
        };
        match from_config(&cfg) {
            Err(VerseClientError::MissingApiKey(var)) => {
                assert_eq!(var, "SANCTUARY_TEST_KEY_THAT_IS_NEVER_SET")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a missing key error"),
        }
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
        assert_eq!(
            check_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            Err(AttemptError::RateLimited)
        );
        assert_eq!(
            check_status(reqwest::StatusCode::SERVICE_UNAVAILABLE),
            Err(AttemptError::Status(503))
        );
    }
}
