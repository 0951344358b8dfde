//! Shared constants and invariants

pub const DEFAULT_BASE_URL: &str = "https://api.nfieldmr.com/";

/// Tokens are re-acquired after 12 minutes; the service invalidates them after 15.
pub const DEFAULT_REFRESH_WINDOW_MS: u64 = 12 * 60 * 1000;
pub const SERVICE_TOKEN_LIFETIME_MS: u64 = 15 * 60 * 1000;
pub const DEFAULT_PERSISTENT_REFRESH_INTERVAL_MS: u64 = DEFAULT_REFRESH_WINDOW_MS;

pub const AUTHORIZATION_SCHEME: &str = "Basic";
pub const SIGN_IN_TOKEN_FIELD: &str = "AuthenticationToken";
pub const SIGN_IN_MESSAGE_FIELD: &str = "Message";

/// Pseudo-field reported when the request parameters themselves are unusable.
pub const REQUEST_PARAMS_FIELD: &str = "requestParams";

// Refresh triggers (metric labels)
pub const TRIGGER_CONNECT: &str = "connect";
pub const TRIGGER_ON_DEMAND: &str = "on_demand";
pub const TRIGGER_PERSISTENT: &str = "persistent";
