//! Monotonic request-token counter for "last request wins".

use crate::types::RequestToken;
use std::sync::atomic::{AtomicU64, Ordering};

/// Mints [`RequestToken`]s and remembers which one is current.
///
/// Only the owning orchestrator writes the counter. Invalidation bumps it
/// without handing out a token, so every outstanding token becomes stale.
#[derive(Debug, Default)]
pub struct RequestTokens {
    current: AtomicU64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new token and make it current.
    pub fn mint(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Make every previously minted token stale.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `token` is still the most recently minted, non-invalidated one.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }

    pub fn current(&self) -> RequestToken {
        RequestToken(self.current.load(Ordering::SeqCst))
    }
}
