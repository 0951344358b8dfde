use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::HeaderValue;
use tracing::debug;

use crate::auth::Authenticator;
use crate::cache::token::Token;
use crate::cache::token_store::TokenStore;
use crate::error::{NfieldError, Result};
use crate::transport::{RequestDescriptor, Transport, TransportResponse};
use crate::utils::constants::{AUTHORIZATION_SCHEME, TRIGGER_ON_DEMAND};

/// Sends requests with a valid token attached, signing in first when the held
/// token is stale. Cloning shares the token store.
pub struct RequestDispatcher<T> {
    authenticator: Authenticator<T>,
    tokens: Arc<TokenStore>,
}

impl<T> Clone for RequestDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<T> std::fmt::Debug for RequestDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RequestDispatcher<T> {
    pub fn new(authenticator: Authenticator<T>, tokens: Arc<TokenStore>) -> Self {
        Self { authenticator, tokens }
    }

    pub fn authenticator(&self) -> &Authenticator<T> {
        &self.authenticator
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// The held token when fresh, otherwise the result of the shared refresh.
    pub async fn ensure_token(&self) -> Result<Token> {
        self.tokens
            .fresh_token(|| self.authenticator.acquire_owned(TRIGGER_ON_DEMAND))
            .await
    }

    /// Sign in now, whatever the token's age.
    pub async fn refresh_now(&self, trigger: &'static str) -> Result<Token> {
        self.tokens
            .refresh(|| self.authenticator.acquire_owned(trigger))
            .await
    }

    /// Refresh if needed, authorize, send. A refresh failure aborts before the
    /// payload goes out; whatever the service answers is returned untouched.
    pub async fn dispatch(&self, mut request: RequestDescriptor) -> Result<TransportResponse> {
        let token = self.ensure_token().await?;
        request.headers.insert(AUTHORIZATION, authorization_value(&token)?);

        let metrics = self.authenticator.metrics();
        let method = request.method.to_string();
        debug!(method = %method, path = %request.path, "dispatching request");

        let timer = metrics
            .dispatch_duration
            .with_label_values(&[method.as_str()])
            .start_timer();
        let outcome = self.authenticator.transport().send(request).await;
        timer.observe_duration();

        let status = match &outcome {
            Ok(response) => response.status.as_str().to_owned(),
            Err(e) => e.reason().to_owned(),
        };
        metrics
            .dispatched_requests
            .with_label_values(&[method.as_str(), status.as_str()])
            .inc();

        outcome
    }
}

fn authorization_value(token: &Token) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("{AUTHORIZATION_SCHEME} {}", token.bearer_value))
        .map_err(|_| NfieldError::InvalidToken("token is not a valid header value".to_owned()))?;
    value.set_sensitive(true);
    Ok(value)
}
