use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::VerseClientError;
use crate::Result;

/// What to do when a lookup starts while another is still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Refuse the new lookup with [`VerseClientError::Busy`].
    #[default]
    Reject,
    /// Cancel the running lookup and let the new one proceed.
    Supersede,
}

/// Admits at most one logical request at a time.
#[derive(Debug, Default)]
pub struct RequestGuard {
    policy: OverlapPolicy,
    current: Mutex<Option<(u64, CancellationToken)>>,
    next_id: AtomicU64,
}

impl RequestGuard {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            current: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Claim the slot. The returned ticket releases it on drop.
    pub fn begin(&self) -> Result<Ticket<'_>> {
        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((id, token)) = slot.as_ref() {
            match self.policy {
                OverlapPolicy::Reject => return Err(VerseClientError::Busy),
                OverlapPolicy::Supersede => {
                    debug!(superseded = id, "cancelling in-flight lookup");
                    token.cancel();
                }
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        *slot = Some((id, token.clone()));
        Ok(Ticket {
            guard: self,
            id,
            token,
        })
    }

    pub fn in_flight(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Cancel whatever lookup currently holds the slot.
    pub fn cancel(&self) -> bool {
        let slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn release(&self, id: u64) {
        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
        }
    }
}

/// Holds the guard's slot for one lookup.
#[derive(Debug)]
pub struct Ticket<'a> {
    guard: &'a RequestGuard,
    id: u64,
    token: CancellationToken,
}

impl Ticket<'_> {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.guard.release(self.id);
    }
}
