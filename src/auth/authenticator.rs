use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use http::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::credentials::Credentials;
use crate::cache::token::Token;
use crate::error::{NfieldError, Result};
use crate::observability::metrics::Metrics;
use crate::operations::SIGN_IN;
use crate::params::SchemaRegistry;
use crate::transport::Transport;
use crate::utils::constants::{SIGN_IN_MESSAGE_FIELD, SIGN_IN_TOKEN_FIELD};

/// Raw outcome of one sign-in exchange.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub status: StatusCode,
    pub body: Value,
}

impl SignInResult {
    /// Accept only a 200 carrying `AuthenticationToken`; anything else is a rejection.
    pub fn into_token(self, now: DateTime<Utc>) -> Result<Token> {
        if self.status != StatusCode::OK {
            return Err(NfieldError::AuthenticationFailed {
                status: self.status.as_u16(),
                message: failure_message(self.status, &self.body),
            });
        }

        self.body
            .get(SIGN_IN_TOKEN_FIELD)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(|token| Token::new(token.to_owned(), now))
            .ok_or_else(|| NfieldError::AuthenticationFailed {
                status: self.status.as_u16(),
                message: format!("response carries no {SIGN_IN_TOKEN_FIELD}"),
            })
    }
}

fn failure_message(status: StatusCode, body: &Value) -> String {
    match body.get(SIGN_IN_MESSAGE_FIELD).and_then(Value::as_str) {
        Some(message) => message.to_owned(),
        None => match body {
            Value::String(text) if !text.is_empty() => text.clone(),
            _ => status.canonical_reason().unwrap_or("sign-in rejected").to_owned(),
        },
    }
}

/// One `POST v1/SignIn`. No retries; the token store is left untouched.
pub async fn sign_in<T: Transport>(
    transport: &T,
    schemas: &SchemaRegistry,
    credentials: &Credentials,
) -> Result<SignInResult> {
    let params = schemas.normalize(SIGN_IN.schema, &credentials.to_raw())?;
    let request = SIGN_IN.descriptor(&params)?;

    debug!("issuing sign-in");
    let response = transport.send(request).await?;
    Ok(SignInResult {
        status: response.status,
        body: response.body,
    })
}

/// Binds a transport and credentials so sign-ins can be started from anywhere,
/// including detached refresh futures.
pub struct Authenticator<T> {
    transport: Arc<T>,
    schemas: &'static SchemaRegistry,
    credentials: Arc<Credentials>,
    metrics: Arc<Metrics>,
}

impl<T> Clone for Authenticator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            schemas: self.schemas,
            credentials: self.credentials.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T: Transport> Authenticator<T> {
    pub fn new(
        transport: Arc<T>,
        schemas: &'static SchemaRegistry,
        credentials: Arc<Credentials>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            transport,
            schemas,
            credentials,
            metrics,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn schemas(&self) -> &'static SchemaRegistry {
        self.schemas
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Sign in and turn the answer into a token stamped with the time it arrived.
    pub async fn acquire(&self, trigger: &str) -> Result<Token> {
        self.metrics.sign_in_requests.inc();

        let outcome = sign_in(self.transport.as_ref(), self.schemas, &self.credentials)
            .await
            .and_then(|result| result.into_token(Utc::now()));

        match &outcome {
            Ok(_) => {
                self.metrics.token_refreshes.with_label_values(&[trigger]).inc();
                debug!(trigger, "sign-in succeeded");
            }
            Err(e) => {
                self.metrics.sign_in_failures.with_label_values(&[e.reason()]).inc();
                warn!(trigger, "sign-in failed: {e}");
            }
        }
        outcome
    }

    /// Detached form of [`Authenticator::acquire`] for the single-flight slot.
    pub fn acquire_owned(&self, trigger: &'static str) -> BoxFuture<'static, Result<Token>> {
        let authenticator = self.clone();
        async move { authenticator.acquire(trigger).await }.boxed()
    }
}
