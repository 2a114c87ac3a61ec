//! # Platform Collaborator Traits
//!
//! Defines the narrow capability traits through which the aggregation core
//! consumes the orchestration platform and long-term log storage. Concrete
//! implementations (platform API clients, bucket readers) live outside this
//! crate; tests provide in-memory fakes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BuildPod, PipelineActivity, PipelineRun};

/// Equality-match label selector for store queries.
///
/// Collected as key/value pairs rather than a pre-joined string so fakes
/// and the pod selection predicate can evaluate it against a label map
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    matches: Vec<(String, String)>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality requirement
    pub fn equals(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.matches.push((key.into(), value.into()));
        self
    }

    /// The selector's requirements as key/value pairs
    pub fn requirements(&self) -> &[(String, String)] {
        &self.matches
    }

    /// Whether every requirement is satisfied by the given label map
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        self.matches
            .iter()
            .all(|(k, v)| labels.get(k).map(String::as_str) == Some(v.as_str()))
    }

    /// Copy of this selector with one requirement key renamed.
    ///
    /// The activity and run resources spell the repository label
    /// differently, so the same logical filter has to be re-keyed per
    /// resource kind before querying.
    pub fn rename_key(&self, from: &str, to: &str) -> Self {
        Self {
            matches: self
                .matches
                .iter()
                .map(|(k, v)| {
                    let key = if k == from { to.to_string() } else { k.clone() };
                    (key, v.clone())
                })
                .collect(),
        }
    }

    /// Platform query string form, `key=value,key=value`
    pub fn to_query_string(&self) -> String {
        self.matches
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Access to the pipeline activity record collection
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// List activities in a namespace matching the selector
    async fn list(&self, namespace: &str, selector: &LabelSelector)
        -> Result<Vec<PipelineActivity>>;
}

/// Access to the orchestration platform's pipeline run collection
#[async_trait]
pub trait PipelineRunStore: Send + Sync {
    /// List runs in a namespace matching the selector
    async fn list(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<PipelineRun>>;
}

/// Access to the orchestration platform's build pod collection
#[async_trait]
pub trait BuildPodStore: Send + Sync {
    /// List every build pod in a namespace.
    ///
    /// Deliberately unfiltered: matching against the target activity is
    /// done pod-by-pod by the completion tracker, which also has to notice
    /// pods belonging to runs it has not seen before.
    async fn list(&self, namespace: &str) -> Result<Vec<BuildPod>>;

    /// Fetch a single pod's current state, used while polling for a
    /// container to start
    async fn get(&self, namespace: &str, name: &str) -> Result<BuildPod>;
}

/// Credential material for reading the log storage bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketAccess {
    /// Bearer token or signing key, backend-specific
    pub token: String,
}

/// Resolves credentials for the long-term log storage bucket.
///
/// Only consulted on the persisted-log fallback path, and then only when
/// the storage backend actually requires auth, so no credentials are
/// requested for backends that need none.
#[async_trait]
pub trait BucketCredentialResolver: Send + Sync {
    async fn resolve_bucket_access(&self) -> Result<BucketAccess>;
}

/// Bounded read of an object from long-term storage
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Read the full object at `url` within `deadline`.
    ///
    /// Implementations consult `credentials` lazily, only if the backend
    /// requires auth for the given URL.
    async fn read(
        &self,
        url: &str,
        deadline: Duration,
        credentials: &dyn BucketCredentialResolver,
    ) -> Result<Vec<u8>>;
}
