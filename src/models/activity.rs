//! # Pipeline Activity Model
//!
//! The logical record of one pipeline build, keyed by owner, repository,
//! branch and build number.
//!
//! ## Overview
//!
//! A `PipelineActivity` is created by an external controller when a pipeline
//! is triggered and evolves independently of the orchestration platform's
//! run resources. The aggregation core correlates the two collections
//! through the canonical activity name derived from the shared identity
//! attributes; it never writes activities back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::correlate;

/// Lifecycle phase of a pipeline activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Aborted,
}

/// Represents one logical pipeline build.
///
/// The identity attributes mirror the labels carried by the orchestration
/// platform's run resources, which is what makes the correlation between
/// the two independently-evolving collections possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineActivity {
    /// Resource name of the activity
    pub name: String,
    /// Namespace the build resources live in
    pub namespace: String,
    /// Owner (organisation) of the repository
    pub git_owner: String,
    /// Repository being built
    pub git_repository: String,
    /// Branch being built
    pub git_branch: String,
    /// Build number, as a string
    pub build: String,
    /// Current lifecycle phase
    pub status: ActivityStatus,
    /// Resource labels as recorded by the controller
    pub labels: HashMap<String, String>,
    /// When the activity was created
    pub created_at: DateTime<Utc>,
}

impl PipelineActivity {
    /// Canonical identity key for this activity,
    /// `owner/repository/branch #build`, case-normalized.
    ///
    /// Recomputed on demand; two resources with the same key refer to the
    /// same logical build.
    pub fn canonical_name(&self) -> String {
        correlate::canonical_activity_name(
            &self.git_owner,
            &self.git_repository,
            &self.git_branch,
            &self.build,
        )
    }
}
