use chrono::NaiveDate;
use sanctuary_core::config::Config;
use sanctuary_core::reference::Reference;
use sanctuary_core::verse::{daily_verse, Verse};
use tracing::{info, warn};

use crate::guard::{OverlapPolicy, RequestGuard};
use crate::provider::{self, VerseProvider};
use crate::retry::{execute_with_retry, RetryPolicy};
use crate::Result;

/// Verse lookups with validation, overlap guarding and retry.
pub struct VerseService {
    provider: Box<dyn VerseProvider>,
    policy: RetryPolicy,
    guard: RequestGuard,
}

impl VerseService {
    pub fn new(provider: Box<dyn VerseProvider>, policy: RetryPolicy, overlap: OverlapPolicy) -> Self {
        Self {
            provider,
            policy,
            guard: RequestGuard::new(overlap),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            provider::from_config(&config.provider)?,
            RetryPolicy::from(&config.retry),
            OverlapPolicy::default(),
        ))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Look up a user-entered reference.
    ///
    /// The reference is corrected and validated before anything is sent, so a
    /// malformed input never reaches the provider.
    pub async fn lookup(&self, raw: &str) -> Result<Verse> {
        let reference = Reference::parse(raw)?;
        let ticket = self.guard.begin()?;

        let provider = self.provider.as_ref();
        let target = &reference;
        let verse = execute_with_retry(&self.policy, ticket.token(), move |_| {
            provider.lookup(target)
        })
        .await?;

        info!(reference = %reference, provider = provider.name(), "verse retrieved");
        Ok(verse)
    }

    /// Ask the provider for the verse of the day.
    pub async fn daily(&self, date: NaiveDate) -> Result<Verse> {
        let ticket = self.guard.begin()?;
        let provider = self.provider.as_ref();
        let verse =
            execute_with_retry(&self.policy, ticket.token(), move |_| provider.daily(date)).await?;
        info!(reference = %verse.reference, provider = provider.name(), "daily verse retrieved");
        Ok(verse)
    }

    /// Verse of the day, falling back to the local rotation when the provider
    /// cannot answer.
    pub async fn daily_or_fallback(&self, date: NaiveDate, configured: &[Verse]) -> Verse {
        match self.daily(date).await {
            Ok(verse) => verse,
            Err(e) => {
                warn!(error = %e, "daily verse unavailable, using local rotation");
                daily_verse(configured, date)
            }
        }
    }

    /// Abandon the in-flight request, if any.
    pub fn cancel_pending(&self) -> bool {
        self.guard.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AttemptError, RetryError, VerseClientError};
    use async_trait::async_trait;
    use sanctuary_core::SanctuaryError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Answers from a queue; the last answer repeats. Optionally never
    /// answers its first call.
    struct MockProvider {
        steps: Mutex<VecDeque<std::result::Result<Verse, AttemptError>>>,
        calls: Arc<AtomicUsize>,
        hang_first: bool,
    }

    impl MockProvider {
        fn new(steps: Vec<std::result::Result<Verse, AttemptError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                steps: Mutex::new(steps.into()),
                calls: Arc::clone(&calls),
                hang_first: false,
            };
            (provider, calls)
        }

        fn hanging(mut self) -> Self {
            self.hang_first = true;
            self
        }
    }

    #[async_trait]
    impl VerseProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn lookup(&self, _reference: &Reference) -> std::result::Result<Verse, AttemptError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang_first && call == 0 {
                std::future::pending::<()>().await;
            }
            let mut steps = self.steps.lock().unwrap();
            if steps.len() > 1 {
                steps.pop_front().unwrap()
            } else {
                steps.front().cloned().unwrap()
            }
        }
    }

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
            jitter: Duration::ZERO,
        }
    }

    fn john() -> Verse {
        Verse::new("John 3:16", "For God so loved the world")
    }

    #[tokio::test]
    async fn invalid_reference_never_reaches_provider() {
        let (provider, calls) = MockProvider::new(vec![Ok(john())]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);

        let err = service.lookup("Johnn 3").await.unwrap_err();
        assert!(matches!(
            err,
            VerseClientError::Reference(SanctuaryError::InvalidReference(_))
        ));
        let err = service.lookup("").await.unwrap_err();
        assert!(matches!(
            err,
            VerseClientError::Reference(SanctuaryError::EmptyReference)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn misspelled_reference_is_corrected_and_fetched() {
        let (provider, calls) = MockProvider::new(vec![Ok(john())]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);
        assert_eq!(service.lookup("jhon 3:16").await.unwrap(), john());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_is_retried_then_succeeds() {
        let (provider, calls) =
            MockProvider::new(vec![Err(AttemptError::RateLimited), Ok(john())]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);
        assert_eq!(service.lookup("John 3:16").await.unwrap(), john());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!service.guard.in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_surfaces_retry_error() {
        let (provider, calls) = MockProvider::new(vec![Err(AttemptError::Status(503))]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);
        let err = service.lookup("John 3:16").await.unwrap_err();
        assert!(matches!(
            err,
            VerseClientError::Retry(RetryError::Exhausted { attempts: 5, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn reject_refuses_overlapping_lookup() {
        let (provider, _) = MockProvider::new(vec![Ok(john())]);
        let service = VerseService::new(
            Box::new(provider.hanging()),
            quick_policy(),
            OverlapPolicy::Reject,
        );

        let first = service.lookup("John 3:16");
        let second = async {
            tokio::task::yield_now().await;
            let outcome = service.lookup("Psalms 23:1").await;
            assert!(service.cancel_pending());
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(second, Err(VerseClientError::Busy)));
        assert!(matches!(
            first,
            Err(VerseClientError::Retry(RetryError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn supersede_cancels_pending_lookup() {
        let (provider, calls) = MockProvider::new(vec![Ok(john())]);
        let service = VerseService::new(
            Box::new(provider.hanging()),
            quick_policy(),
            OverlapPolicy::Supersede,
        );

        let first = service.lookup("John 3:16");
        let second = async {
            tokio::task::yield_now().await;
            service.lookup("John 3:16").await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(
            first,
            Err(VerseClientError::Retry(RetryError::Cancelled))
        ));
        assert_eq!(second.unwrap(), john());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!service.guard.in_flight());
    }

    #[tokio::test]
    async fn daily_falls_back_to_local_rotation() {
        let (provider, _) =
            MockProvider::new(vec![Err(AttemptError::Permanent("not found".into()))]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let own = vec![Verse::new("Micah 6:8", "do justly, and to love mercy")];

        assert_eq!(service.daily_or_fallback(date, &own).await, own[0]);
    }

    #[tokio::test]
    async fn daily_uses_provider_when_available() {
        let (provider, calls) = MockProvider::new(vec![Ok(john())]);
        let service = VerseService::new(Box::new(provider), quick_policy(), OverlapPolicy::Reject);
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(service.daily_or_fallback(date, &[]).await, john());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn from_default_config_uses_bible_api() {
        let service = VerseService::from_config(&Config::new("Grace")).unwrap();
        assert_eq!(service.provider_name(), "bible-api");
        assert_eq!(service.policy, RetryPolicy::default());
    }
}
