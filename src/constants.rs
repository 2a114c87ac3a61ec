//! # System Constants
//!
//! Label keys, parameter names and default timing values that define the
//! operational boundaries of the build log aggregation core.
//!
//! The activity and run resources carry the same identity attributes but do
//! not agree on every label key, so both spellings live here rather than
//! being scattered through the correlation code.

/// Identity and metadata label keys shared by activities, runs and build pods
pub mod labels {
    /// Owner (organisation) of the repository being built
    pub const OWNER: &str = "owner";
    /// Repository label key on pipeline activities
    pub const REPOSITORY: &str = "repository";
    /// Repository label key on pipeline runs (legacy spelling)
    pub const REPO_LEGACY: &str = "repo";
    /// Branch being built
    pub const BRANCH: &str = "branch";
    /// Build number, as a string
    pub const BUILD: &str = "build";
    /// Optional disambiguation context for runs sharing an identity
    pub const CONTEXT: &str = "context";

    /// Human-readable stage name carried on build pods
    pub const STAGE_NAME: &str = "pipeline.io/stage-name";
    /// Name of the pipeline run a build pod belongs to
    pub const RUN_NAME: &str = "pipeline.io/run-name";
}

/// Declared run parameter names
pub mod params {
    /// Parameter carrying the build number on runs created before the
    /// `build` label existed
    pub const BUILD_ID: &str = "build_id";
}

/// Default timing values for the aggregation loop
pub mod defaults {
    /// Interval between pod status polls while waiting for a container to start
    pub const POLL_INTERVAL_MS: u64 = 1000;
    /// Upper bound on waiting for a single container to start
    pub const CONTAINER_START_TIMEOUT_SECS: u64 = 60;
    /// Upper bound on completion-tracking loop iterations
    pub const MAX_WAIT_ITERATIONS: u32 = 120;
    /// Deadline for reading a persisted log object from the bucket
    pub const PERSISTED_FETCH_TIMEOUT_SECS: u64 = 20;
    /// Namespace build resources live in unless configured otherwise
    pub const NAMESPACE: &str = "builds";
}
