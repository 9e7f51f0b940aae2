use thiserror::Error;

/// Unified error type for the entire variant-insights-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Forecasting ─────────────────────────────────────────────────
    #[error("Insufficient data for prediction: need at least {required} distinct days, got {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("Invalid forecast horizon: {0} days")]
    InvalidHorizon(u32),

    // ── Chart construction ──────────────────────────────────────────
    #[error("Insufficient fields for {chart_type} chart: {reason}")]
    InsufficientFields { chart_type: String, reason: String },

    // ── Input validation ────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Rate limit exceeded ({0}), wait before making another request")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

impl CoreError {
    /// Shorthand used by the chart builders, which report failures inline.
    pub fn insufficient_fields(chart_type: impl ToString, reason: impl Into<String>) -> Self {
        CoreError::InsufficientFields {
            chart_type: chart_type.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // The Gemini API key travels in the query string; never let it reach logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
