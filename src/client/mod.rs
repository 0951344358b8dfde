//! Client module
//!
//! `NfieldClient` holds settings and a transport. `connect` signs in and hands
//! back a `ConnectedClient`, which runs every catalog operation through the
//! normalizer and the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::auth::{Authenticator, Credentials};
use crate::cache::token::Token;
use crate::cache::token_store::TokenStore;
use crate::config::proc_validator::validate_settings;
use crate::config::settings::{ClientSettings, SettingsOverrides};
use crate::dispatch::{PersistentRefresher, RequestDispatcher};
use crate::error::{NfieldError, Result};
use crate::observability::metrics::Metrics;
use crate::operations::{Operation, SIGN_IN};
use crate::params::{builtin_schemas, NormalizedParameters, OperationParams, SchemaRegistry};
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::utils::constants::{TRIGGER_CONNECT, TRIGGER_ON_DEMAND};

pub mod handles;

pub use handles::{DefaultTexts, SurveyFieldwork};

/// Unconnected client: settings plus the transport requests will go through.
pub struct NfieldClient<T = HttpTransport> {
    settings: ClientSettings,
    transport: Arc<T>,
}

impl<T> Clone for NfieldClient<T> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            transport: self.transport.clone(),
        }
    }
}

impl<T> std::fmt::Debug for NfieldClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfieldClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl NfieldClient<HttpTransport> {
    /// Client for the public API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(ClientSettings::default())
    }

    pub fn with_settings(settings: ClientSettings) -> Result<Self> {
        check_settings(&settings)?;
        let transport = HttpTransport::new(&settings)?;
        Ok(Self {
            settings,
            transport: Arc::new(transport),
        })
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let settings = ClientSettings::from_yaml_str(content)?;
        Ok(Self::with_settings(settings)?)
    }

    /// A new client whose settings are this client's merged with `overrides`.
    pub fn defaults(&self, overrides: SettingsOverrides) -> Result<Self> {
        Self::with_settings(self.settings.merged_with(overrides))
    }
}

impl<T: Transport> NfieldClient<T> {
    /// Client over a caller-supplied transport. Transport-level settings
    /// (base URL, headers, timeout) are the transport's business.
    pub fn with_transport(settings: ClientSettings, transport: T) -> Result<Self> {
        check_settings(&settings)?;
        Ok(Self {
            settings,
            transport: Arc::new(transport),
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Sign in and return a session bound to `credentials`.
    ///
    /// Empty credential fields are rejected before anything is sent; a rejected
    /// sign-in yields `AuthenticationFailed`.
    pub async fn connect(&self, credentials: Credentials) -> Result<ConnectedClient<T>> {
        let schemas = builtin_schemas()?;
        let metrics = Arc::new(
            Metrics::new().map_err(|e| NfieldError::configuration(format!("metrics registry: {e}")))?,
        );

        schemas
            .normalize(SIGN_IN.schema, &credentials.to_raw())
            .inspect_err(|_| {
                metrics
                    .normalization_failures
                    .with_label_values(&[SIGN_IN.schema])
                    .inc()
            })?;

        let authenticator = Authenticator::new(self.transport.clone(), schemas, Arc::new(credentials), metrics);
        let tokens = Arc::new(TokenStore::new(self.settings.refresh_window_ms));
        let dispatcher = RequestDispatcher::new(authenticator, tokens);

        dispatcher.refresh_now(TRIGGER_CONNECT).await?;
        info!(base_url = %self.settings.base_url, "connected");

        let client = ConnectedClient {
            refresher: PersistentRefresher::new(dispatcher.clone()),
            dispatcher,
        };

        let persistent = &self.settings.persistent_refresh;
        if persistent.enabled {
            client.start_persistent_refresh(Duration::from_millis(persistent.interval_ms), |e| {
                warn!("persistent token refresh failed: {e}")
            });
        }

        Ok(client)
    }
}

fn check_settings(settings: &ClientSettings) -> Result<()> {
    validate_settings(settings).map_err(|errors| {
        NfieldError::configuration(format!(
            "settings are not valid, total errors: {}: {}",
            errors.len(),
            errors.join("; ")
        ))
    })
}

/// A signed-in session. All calls share one token; the persistent refresher,
/// when started, keeps it renewed in the background.
pub struct ConnectedClient<T = HttpTransport> {
    dispatcher: RequestDispatcher<T>,
    refresher: PersistentRefresher<T>,
}

impl<T> std::fmt::Debug for ConnectedClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedClient")
            .field("dispatcher", &self.dispatcher)
            .field("refresher", &self.refresher)
            .finish()
    }
}

impl<T: Transport> ConnectedClient<T> {
    /// Run `operation` with untyped parameters: an object, or a bare string or
    /// number for operations with a single required field.
    pub async fn call(&self, operation: &Operation, raw: Value) -> Result<TransportResponse> {
        let params = self.normalize(operation, &raw)?;
        let request = operation.descriptor(&params)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn execute<P: OperationParams>(&self, params: &P) -> Result<TransportResponse> {
        let raw = params.to_raw()?;
        self.call(&P::operation(), raw).await
    }

    pub fn survey_fieldwork(&self) -> SurveyFieldwork<'_, T> {
        SurveyFieldwork::new(self)
    }

    pub fn default_texts(&self) -> DefaultTexts<'_, T> {
        DefaultTexts::new(self)
    }

    /// Current token, refreshed first when stale.
    pub async fn token(&self) -> Result<Token> {
        self.dispatcher.ensure_token().await
    }

    /// Sign in again regardless of the token's age.
    pub async fn refresh_token(&self) -> Result<Token> {
        self.dispatcher.refresh_now(TRIGGER_ON_DEMAND).await
    }

    /// What the session holds right now, without refreshing.
    pub async fn token_snapshot(&self) -> Token {
        self.dispatcher.tokens().snapshot().await
    }

    pub fn start_persistent_refresh<F>(&self, interval: Duration, on_error: F) -> bool
    where
        F: Fn(NfieldError) + Send + Sync + 'static,
    {
        self.refresher.start(interval, on_error)
    }

    pub fn stop_persistent_refresh(&self) -> bool {
        self.refresher.stop()
    }

    pub fn is_persistent_refresh_running(&self) -> bool {
        self.refresher.is_running()
    }

    pub fn metrics(&self) -> &Metrics {
        self.dispatcher.authenticator().metrics()
    }

    pub fn schemas(&self) -> &'static SchemaRegistry {
        self.dispatcher.authenticator().schemas()
    }

    fn normalize(&self, operation: &Operation, raw: &Value) -> Result<NormalizedParameters> {
        self.schemas()
            .normalize(operation.schema, raw)
            .inspect_err(|_| {
                self.metrics()
                    .normalization_failures
                    .with_label_values(&[operation.schema])
                    .inc()
            })
    }
}
