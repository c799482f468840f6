//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Kinds
//!
//! - **ParseError**: no valid JSON recoverable from model output
//! - **ProviderError**: transport/auth/quota failure from one backend
//! - **NoProviderAvailable**: every configured backend unavailable (fatal to generation)
//! - **PublishAttemptError**: repository host rejected one operation (pipeline
//!   advances; reported on the result, never raised)
//! - **LocalSave**: filesystem write failed after remote strategies (fatal)
//!
//! Lower-level transport errors are translated into these kinds at each
//! component boundary, keeping the original message.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Provider failure categories, used for logging and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Backend or model unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Backend answered with an unexpected body
    ParseError,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Error classifier for provider failures
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code returned by an AI backend
    pub fn classify_http_status(status: u16) -> ErrorCategory {
        match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Classify a transport-level failure (no HTTP response received)
    pub fn classify_transport(err: &reqwest::Error) -> ErrorCategory {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        }
    }
}

// =============================================================================
// Response Parse Error
// =============================================================================

/// Why a model response could not be turned into structured data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Response was empty or whitespace only
    EmptyInput,
    /// No JSON value could be recovered from the cleaned text
    Unparseable,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no text to parse"),
            Self::Unparseable => write!(f, "failed to parse model JSON response"),
        }
    }
}

/// Structured data could not be recovered from a raw model response
#[derive(Debug, Error)]
#[error("{kind} (content preview: {})", preview(.raw))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Cleaned text the extractor last worked on
    pub raw: String,
    #[source]
    pub cause: Option<serde_json::Error>,
}

impl ParseError {
    pub fn empty() -> Self {
        Self {
            kind: ParseErrorKind::EmptyInput,
            raw: String::new(),
            cause: None,
        }
    }

    pub fn unparseable(raw: impl Into<String>, cause: serde_json::Error) -> Self {
        Self {
            kind: ParseErrorKind::Unparseable,
            raw: raw.into(),
            cause: Some(cause),
        }
    }
}

fn preview(raw: &str) -> String {
    const LIMIT: usize = 200;
    if raw.chars().count() <= LIMIT {
        raw.to_string()
    } else {
        format!("{}...", raw.chars().take(LIMIT).collect::<String>())
    }
}

// =============================================================================
// Provider Error
// =============================================================================

/// Failure reported by one AI backend
#[derive(Debug, Clone, Error)]
#[error("[{provider}:{category}] {message}")]
pub struct ProviderError {
    /// Backend that produced the error
    pub provider: String,
    /// HTTP status, when the backend answered at all
    pub status: Option<u16>,
    pub message: String,
    pub category: ErrorCategory,
}

impl ProviderError {
    /// Non-2xx answer from the backend
    pub fn http(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            provider: provider.into(),
            status: Some(status),
            message: format!("API error ({}): {}", status, body),
            category: ErrorClassifier::classify_http_status(status),
        }
    }

    /// Request never produced a response
    pub fn transport(provider: impl Into<String>, err: &reqwest::Error) -> Self {
        Self {
            provider: provider.into(),
            status: err.status().map(|s| s.as_u16()),
            message: format!("request failed: {}", err),
            category: ErrorClassifier::classify_transport(err),
        }
    }

    /// 2xx answer whose body did not have the expected shape
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: None,
            message: message.into(),
            category: ErrorCategory::ParseError,
        }
    }

    /// Backend was used without a credential
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: None,
            message: "provider not initialized: no credential configured".to_string(),
            category: ErrorCategory::Auth,
        }
    }
}

// =============================================================================
// Publish Attempt Error
// =============================================================================

/// Failure classes for repository host operations (logging only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishFailureKind {
    /// Not found / forbidden / unauthorized: permission or configuration issue
    Permission,
    /// Resource already exists at the target
    Conflict,
    /// Host rejected the request payload
    Validation,
    /// Network trouble or server-side failure
    Transient,
}

impl PublishFailureKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401) | Some(403) | Some(404) => Self::Permission,
            Some(409) => Self::Conflict,
            Some(422) => Self::Validation,
            _ => Self::Transient,
        }
    }
}

impl std::fmt::Display for PublishFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permission => write!(f, "permission"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Transient => write!(f, "transient"),
        }
    }
}

/// Repository host rejected a specific operation
#[derive(Debug, Clone, Error)]
#[error("{operation} failed ({kind}): {message}")]
pub struct PublishAttemptError {
    /// Host operation that failed, e.g. "put file"
    pub operation: String,
    pub status: Option<u16>,
    pub kind: PublishFailureKind,
    pub message: String,
}

impl PublishAttemptError {
    pub fn new(operation: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status,
            kind: PublishFailureKind::from_status(status),
            message: message.into(),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum BlogError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Generation Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Structured output from a specific backend could not be decoded
    #[error("{provider} returned unusable JSON: {source}")]
    ProviderResponse {
        provider: String,
        #[source]
        source: ParseError,
    },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No AI provider available (tried: {}). Configure GEMINI_API_KEY, GITHUB_TOKEN or an OpenAI-compatible key", .tried.join(", "))]
    NoProviderAvailable { tried: Vec<String> },

    // -------------------------------------------------------------------------
    // Publish Errors
    // -------------------------------------------------------------------------
    #[error("Local save failed for {}: {source}", .path.display())]
    LocalSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Ambient Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

pub type Result<T> = std::result::Result<T, BlogError>;

impl BlogError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
