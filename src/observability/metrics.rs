use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

const METRICS_PREFIX: &str = "nfield";

/// Counters for one client. Each client owns its registry, so several clients
/// in one process never collide on registration.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Sign-in
    pub sign_in_requests: IntCounter,
    pub sign_in_failures: IntCounterVec,
    pub token_refreshes: IntCounterVec,

    // Dispatch
    pub dispatched_requests: IntCounterVec,
    pub dispatch_duration: HistogramVec,

    // Normalizer
    pub normalization_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some(METRICS_PREFIX.into()), None)?;

        let metrics = Self {
            sign_in_requests: IntCounter::new("sign_in_requests_total", "Sign-in exchanges issued")?,
            sign_in_failures: IntCounterVec::new(Opts::new("sign_in_failures_total", "Sign-in failures by reason"), &["reason"])?,
            token_refreshes: IntCounterVec::new(Opts::new("token_refreshes_total", "Tokens committed by trigger"), &["trigger"])?,

            dispatched_requests: IntCounterVec::new(Opts::new("dispatched_requests_total", "Authenticated requests by method and status"), &["method", "status"])?,
            dispatch_duration: HistogramVec::new(
                HistogramOpts::new("dispatch_duration_seconds", "Authenticated request duration seconds")
                    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
                &["method"],
            )?,

            normalization_failures: IntCounterVec::new(Opts::new("normalization_failures_total", "Rejected request parameters by schema"), &["schema"])?,

            registry,
        };

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.sign_in_requests.clone()))?;
        reg.register(Box::new(metrics.sign_in_failures.clone()))?;
        reg.register(Box::new(metrics.token_refreshes.clone()))?;
        reg.register(Box::new(metrics.dispatched_requests.clone()))?;
        reg.register(Box::new(metrics.dispatch_duration.clone()))?;
        reg.register(Box::new(metrics.normalization_failures.clone()))?;

        Ok(metrics)
    }

    /// Text exposition of everything in this client's registry.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}
