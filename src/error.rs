//! # Aggregation Error Types
//!
//! Structured error handling for the build log aggregation core using
//! thiserror for typed variants instead of `Box<dyn Error>` patterns.
//!
//! Every variant carries enough context (activity/run identity, source URL)
//! to be actionable without a retry by this core; retries, if any, are a
//! caller policy. A failed build pod is never an error here, it is reported
//! as a warning line through the log writer.

use thiserror::Error;

/// Errors surfaced by the build log aggregation core
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("pipeline activity not found: {name} in namespace {namespace}")]
    ActivityNotFound { name: String, namespace: String },

    #[error("platform query failed during {operation}: {message}")]
    PlatformQuery { operation: String, message: String },

    #[error("the build pods for {build} have been garbage collected and the log was not found in the long term storage bucket")]
    LogsUnavailable { build: String },

    #[error("timed out waiting for {waiting_for} after {iterations} iterations")]
    WaitTimeout { waiting_for: String, iterations: u32 },

    #[error("failed to read persisted logs from {url}: {message}")]
    PersistedFetch { url: String, message: String },

    #[error("log writer failed: {message}")]
    Writer { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl AggregationError {
    /// Whether this is the terminal "no live pods ever matched" condition.
    ///
    /// Callers branch on this to read the bucket-stored copy of the logs
    /// instead of treating the aggregation call as a hard failure.
    pub fn is_logs_unavailable(&self) -> bool {
        matches!(self, AggregationError::LogsUnavailable { .. })
    }

    /// Convenience constructor for store query failures
    pub fn platform_query(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AggregationError::PlatformQuery {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregationError>;
