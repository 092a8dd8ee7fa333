//! `verse-client`: resilient verse retrieval for the site.
//!
//! # Architecture
//!
//! ```text
//! VerseService::lookup("jhon 3:16")
//!     │  correct + validate (sanctuary_core::reference), before any I/O
//!     ▼
//! RequestGuard    ← one lookup in flight; reject or supersede the next
//!     │
//!     ▼
//! execute_with_retry
//!     │  sequential attempts, exponential backoff + jitter,
//!     │  abandoned as soon as the CancellationToken fires
//!     ▼
//! dyn VerseProvider ← BibleApiProvider | GenerativeProvider
//!     │
//!     ▼
//! Verse { reference, text }
//! ```

pub mod error;
pub mod guard;
pub mod provider;
pub mod retry;
pub mod service;

pub use error::{AttemptError, RetryError, VerseClientError};
pub use guard::{OverlapPolicy, RequestGuard, Ticket};
pub use provider::{BibleApiProvider, GenerativeProvider, VerseProvider};
pub use retry::{execute_with_retry, RetryPolicy};
pub use service::VerseService;

pub use tokio_util::sync::CancellationToken;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, VerseClientError>;
