use chrono::{DateTime, TimeDelta, Utc};

/// Bearer credential handed out by sign-in, stamped with when it was obtained.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub bearer_value: String,
    pub acquired_at: DateTime<Utc>,
}

impl Token {
    pub fn new(bearer_value: String, acquired_at: DateTime<Utc>) -> Self {
        Self { bearer_value, acquired_at }
    }

    /// A client that never signed in.
    pub fn empty() -> Self {
        Self {
            bearer_value: String::new(),
            acquired_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bearer_value.is_empty()
    }

    /// Stale when empty, or older than `refresh_window` at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, refresh_window: TimeDelta) -> bool {
        self.is_empty() || now.signed_duration_since(self.acquired_at) > refresh_window
    }

    /// Overwrite in place with a freshly confirmed value.
    pub fn record(&mut self, bearer_value: String, now: DateTime<Utc>) {
        self.bearer_value = bearer_value;
        self.acquired_at = now;
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::empty()
    }
}

// the bearer value never reaches logs
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("bearer_value", &if self.is_empty() { "<empty>" } else { "<redacted>" })
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}
