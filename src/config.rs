//! # Aggregator Configuration
//!
//! Timing bounds for the aggregation loop. Every suspension point in the
//! core (the container-start poll, the completion-tracking loop, the
//! persisted-log read) is bounded by one of these values, so a stuck
//! platform call cannot hold a caller indefinitely.

use std::time::Duration;

use crate::constants::defaults;
use crate::error::{AggregationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Interval between pod polls while waiting for a container to start
    pub poll_interval: Duration,
    /// Upper bound on waiting for a single container to start
    pub container_start_timeout: Duration,
    /// Upper bound on completion-tracking loop iterations
    pub max_wait_iterations: u32,
    /// Deadline for reading a persisted log object from the bucket
    pub persisted_fetch_timeout: Duration,
    /// Namespace build resources live in
    pub namespace: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            container_start_timeout: Duration::from_secs(defaults::CONTAINER_START_TIMEOUT_SECS),
            max_wait_iterations: defaults::MAX_WAIT_ITERATIONS,
            persisted_fetch_timeout: Duration::from_secs(defaults::PERSISTED_FETCH_TIMEOUT_SECS),
            namespace: defaults::NAMESPACE.to_string(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(interval) = std::env::var("BUILDLOG_POLL_INTERVAL_MS") {
            let ms: u64 = interval.parse().map_err(|e| {
                AggregationError::Configuration {
                    message: format!("Invalid poll_interval_ms: {e}"),
                }
            })?;
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Ok(timeout) = std::env::var("BUILDLOG_CONTAINER_START_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|e| {
                AggregationError::Configuration {
                    message: format!("Invalid container_start_timeout_secs: {e}"),
                }
            })?;
            config.container_start_timeout = Duration::from_secs(secs);
        }

        if let Ok(iterations) = std::env::var("BUILDLOG_MAX_WAIT_ITERATIONS") {
            config.max_wait_iterations = iterations.parse().map_err(|e| {
                AggregationError::Configuration {
                    message: format!("Invalid max_wait_iterations: {e}"),
                }
            })?;
        }

        if let Ok(timeout) = std::env::var("BUILDLOG_PERSISTED_FETCH_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|e| {
                AggregationError::Configuration {
                    message: format!("Invalid persisted_fetch_timeout_secs: {e}"),
                }
            })?;
            config.persisted_fetch_timeout = Duration::from_secs(secs);
        }

        if let Ok(namespace) = std::env::var("BUILDLOG_NAMESPACE") {
            config.namespace = namespace;
        }

        Ok(config)
    }
}
