//! # Persisted Log Fetcher
//!
//! Fallback path for builds whose pods were reclaimed before every log was
//! captured: reads the archived copy a log-shipping sidecar left in
//! long-term storage and emits it through the same writer abstraction the
//! live path uses.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::constants::defaults;
use crate::error::{AggregationError, Result};
use crate::stores::{BucketCredentialResolver, ObjectFetcher};
use crate::writer::LogWriter;

/// Bounded reader of archived build logs
pub struct PersistedLogFetcher {
    credentials: Arc<dyn BucketCredentialResolver>,
    objects: Arc<dyn ObjectFetcher>,
    timeout: Duration,
}

impl PersistedLogFetcher {
    /// Create a fetcher with the default read deadline
    pub fn new(
        credentials: Arc<dyn BucketCredentialResolver>,
        objects: Arc<dyn ObjectFetcher>,
    ) -> Self {
        Self {
            credentials,
            objects,
            timeout: Duration::from_secs(defaults::PERSISTED_FETCH_TIMEOUT_SECS),
        }
    }

    /// Create a fetcher with a custom read deadline
    pub fn with_timeout(
        credentials: Arc<dyn BucketCredentialResolver>,
        objects: Arc<dyn ObjectFetcher>,
        timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            objects,
            timeout,
        }
    }

    /// Read the archived log object at `logs_url` and write it once,
    /// atomically, through the writer.
    ///
    /// The credential resolver is handed to the object fetcher rather than
    /// consulted up front, so storage backends that need no auth never
    /// trigger a credential lookup. Failures carry the source URL.
    #[instrument(skip(self, writer))]
    pub async fn fetch(&self, logs_url: &str, writer: &dyn LogWriter) -> Result<()> {
        let read = self
            .objects
            .read(logs_url, self.timeout, self.credentials.as_ref());

        let data = tokio::time::timeout(self.timeout, read)
            .await
            .map_err(|_| AggregationError::PersistedFetch {
                url: logs_url.to_string(),
                message: format!("read did not complete within {:?}", self.timeout),
            })?
            .map_err(|e| AggregationError::PersistedFetch {
                url: logs_url.to_string(),
                message: e.to_string(),
            })?;

        debug!(url = %logs_url, bytes = data.len(), "read persisted log object");
        writer.write_line(&String::from_utf8_lossy(&data)).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::stores::BucketAccess;
    use crate::writer::BufferLogWriter;

    struct StaticResolver {
        resolutions: Mutex<u32>,
    }

    #[async_trait]
    impl BucketCredentialResolver for StaticResolver {
        async fn resolve_bucket_access(&self) -> Result<BucketAccess> {
            *self.resolutions.lock() += 1;
            Ok(BucketAccess {
                token: "signed-token".to_string(),
            })
        }
    }

    struct StaticFetcher {
        body: Vec<u8>,
        needs_auth: bool,
    }

    #[async_trait]
    impl ObjectFetcher for StaticFetcher {
        async fn read(
            &self,
            _url: &str,
            _deadline: Duration,
            credentials: &dyn BucketCredentialResolver,
        ) -> Result<Vec<u8>> {
            if self.needs_auth {
                credentials.resolve_bucket_access().await?;
            }
            Ok(self.body.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ObjectFetcher for FailingFetcher {
        async fn read(
            &self,
            url: &str,
            _deadline: Duration,
            _credentials: &dyn BucketCredentialResolver,
        ) -> Result<Vec<u8>> {
            Err(AggregationError::PersistedFetch {
                url: url.to_string(),
                message: "403 Forbidden".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_writes_archived_log_once() {
        let resolver = Arc::new(StaticResolver {
            resolutions: Mutex::new(0),
        });
        let fetcher = PersistedLogFetcher::new(
            resolver.clone(),
            Arc::new(StaticFetcher {
                body: b"line one\nline two\n".to_vec(),
                needs_auth: true,
            }),
        );
        let writer = BufferLogWriter::new();

        fetcher
            .fetch("gs://logs/acme/widgets/master/7.log", &writer)
            .await
            .unwrap();

        assert_eq!(writer.lines(), vec!["line one\nline two\n".to_string()]);
        assert_eq!(*resolver.resolutions.lock(), 1);
    }

    #[tokio::test]
    async fn test_credentials_resolved_lazily() {
        let resolver = Arc::new(StaticResolver {
            resolutions: Mutex::new(0),
        });
        let fetcher = PersistedLogFetcher::new(
            resolver.clone(),
            Arc::new(StaticFetcher {
                body: b"public".to_vec(),
                needs_auth: false,
            }),
        );

        fetcher
            .fetch("https://logs.example.com/7.log", &BufferLogWriter::new())
            .await
            .unwrap();

        // backend needed no auth, so no credential lookup happened
        assert_eq!(*resolver.resolutions.lock(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_source_url() {
        let fetcher = PersistedLogFetcher::new(
            Arc::new(StaticResolver {
                resolutions: Mutex::new(0),
            }),
            Arc::new(FailingFetcher),
        );

        let err = fetcher
            .fetch("gs://logs/missing.log", &BufferLogWriter::new())
            .await
            .unwrap_err();

        match err {
            AggregationError::PersistedFetch { url, .. } => {
                assert_eq!(url, "gs://logs/missing.log");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
