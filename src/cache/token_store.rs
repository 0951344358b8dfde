use chrono::{TimeDelta, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::token::Token;
use crate::error::Result;

type RefreshFuture = Shared<BoxFuture<'static, Result<Token>>>;

/// Holds the session token and coordinates its refresh.
///
/// At most one sign-in is in flight per store: callers that find the token
/// stale while a refresh is running await that same refresh instead of
/// starting their own.
pub struct TokenStore {
    token: RwLock<Token>,
    in_flight: Mutex<Option<RefreshFuture>>,
    refresh_window: TimeDelta,
}

impl TokenStore {
    pub fn new(refresh_window_ms: u64) -> Self {
        Self::with_token(Token::empty(), refresh_window_ms)
    }

    pub fn with_token(token: Token, refresh_window_ms: u64) -> Self {
        Self {
            token: RwLock::new(token),
            in_flight: Mutex::new(None),
            refresh_window: TimeDelta::milliseconds(i64::try_from(refresh_window_ms).unwrap_or(i64::MAX)),
        }
    }

    pub fn refresh_window(&self) -> TimeDelta {
        self.refresh_window
    }

    pub async fn snapshot(&self) -> Token {
        self.token.read().await.clone()
    }

    pub async fn is_stale(&self) -> bool {
        self.token.read().await.is_stale(Utc::now(), self.refresh_window)
    }

    /// Commit a confirmed token. An older acquisition never replaces a newer one.
    pub async fn record(&self, fresh: &Token) {
        let mut token = self.token.write().await;
        if token.is_empty() || fresh.acquired_at >= token.acquired_at {
            token.record(fresh.bearer_value.clone(), fresh.acquired_at);
        }
    }

    /// The current token if still fresh, otherwise the outcome of the shared refresh.
    pub async fn fresh_token<F>(&self, sign_in: F) -> Result<Token>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Token>>,
    {
        if let Some(token) = self.current_if_fresh().await {
            return Ok(token);
        }
        self.join_refresh(sign_in, true).await
    }

    /// Refresh regardless of staleness, still sharing any sign-in already running.
    pub async fn refresh<F>(&self, sign_in: F) -> Result<Token>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Token>>,
    {
        self.join_refresh(sign_in, false).await
    }

    async fn current_if_fresh(&self) -> Option<Token> {
        let token = self.token.read().await;
        (!token.is_stale(Utc::now(), self.refresh_window)).then(|| token.clone())
    }

    async fn join_refresh<F>(&self, sign_in: F, only_if_stale: bool) -> Result<Token>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Token>>,
    {
        let refresh = {
            let mut slot = self.in_flight.lock().await;
            // a finished refresh left behind by a waiter that went away before committing
            if let Some(finished) = slot.as_ref().and_then(|running| running.peek().cloned()) {
                *slot = None;
                if let Ok(token) = finished {
                    self.record(&token).await;
                }
            }
            match slot.as_ref() {
                Some(running) => {
                    debug!("joining in-flight token refresh");
                    running.clone()
                }
                None => {
                    // a refresh may have completed between the staleness check and here
                    if only_if_stale {
                        if let Some(token) = self.current_if_fresh().await {
                            return Ok(token);
                        }
                    }
                    debug!("starting token refresh");
                    let running = sign_in().shared();
                    *slot = Some(running.clone());
                    running
                }
            }
        };

        let outcome = refresh.clone().await;
        if let Ok(token) = &outcome {
            self.record(token).await;
        }

        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().is_some_and(|running| running.ptr_eq(&refresh)) {
            *slot = None;
        }

        outcome
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("refresh_window", &self.refresh_window)
            .finish_non_exhaustive()
    }
}
