use std::fmt;
use std::time::{Duration, Instant};

/// Why an attempt did not produce an acceptable record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// The proxy answered with a non-200 status
    HttpStatus(u16),

    /// The request never produced a response (connect, timeout, decode)
    Transport(String),

    /// The proxy answered 200 but the page content was empty
    EmptyContent,

    /// The page looked in stock but no price could be parsed
    MissingPrice,
}

impl RetryReason {
    /// Returns true if the fetch itself failed
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::HttpStatus(_) | Self::Transport(_))
    }
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "API request failed with status {}", code),
            Self::Transport(error) => write!(f, "request failed: {}", error),
            Self::EmptyContent => write!(f, "Empty HTML content"),
            Self::MissingPrice => write!(f, "In stock but no price found"),
        }
    }
}

/// Ephemeral state for one fetch attempt
///
/// Lives only inside the retry loop; it is handed to the reporter but
/// never persisted.
#[derive(Debug, Clone)]
pub struct AttemptContext {
    /// The normalized URL sent to the proxy
    pub url: String,

    /// 1-based attempt number
    pub attempt: u32,

    pub max_attempts: u32,

    /// Why the previous attempt was retried, if this is a retry
    pub retry_reason: Option<RetryReason>,

    started_at: Instant,
}

impl AttemptContext {
    /// Creates the context for the first attempt on a URL
    pub fn first(url: &str, max_attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            attempt: 1,
            max_attempts,
            retry_reason: None,
            started_at: Instant::now(),
        }
    }

    /// Creates the context for the attempt following this one
    pub fn next(&self, reason: RetryReason) -> Self {
        Self {
            url: self.url.clone(),
            attempt: self.attempt + 1,
            max_attempts: self.max_attempts,
            retry_reason: Some(reason),
            started_at: Instant::now(),
        }
    }

    /// Returns true if no attempt is left after this one
    pub fn is_last(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Time spent in this attempt so far
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
