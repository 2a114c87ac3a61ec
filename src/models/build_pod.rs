//! # Build Pod Model
//!
//! The execution unit hosting one pipeline run's containers, plus the
//! identity attributes extracted from its labels.
//!
//! ## Overview
//!
//! Each build pod belongs to exactly one pipeline run and carries an
//! ordered list of containers, one per pipeline stage step. Containers
//! start in declared order as the platform schedules them, so log
//! aggregation walks them front to back, waiting for each to start before
//! streaming it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::labels;

/// Lifecycle phase of a build pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

/// A container within a build pod, mapped to one pipeline stage step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodContainer {
    /// Container name
    pub name: String,
    /// Whether the container has started producing output
    pub started: bool,
}

/// A build pod as observed from the orchestration platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPod {
    /// Pod name
    pub name: String,
    /// Namespace the pod runs in
    pub namespace: String,
    /// Pod labels, including identity, stage and run-name keys
    pub labels: HashMap<String, String>,
    /// Current lifecycle phase
    pub phase: PodPhase,
    /// Containers in declared order
    pub containers: Vec<PodContainer>,
    /// When the pod was created
    pub created_at: DateTime<Utc>,
}

impl BuildPod {
    /// Value of a label, or the empty string when absent
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("")
    }

    /// Human-readable stage name this pod executes
    pub fn stage_name(&self) -> &str {
        self.label(labels::STAGE_NAME)
    }

    /// Name of the pipeline run this pod belongs to
    pub fn run_name(&self) -> &str {
        self.label(labels::RUN_NAME)
    }

    /// Whether the container at `idx` has started
    pub fn container_started(&self, idx: usize) -> bool {
        self.containers.get(idx).map(|c| c.started).unwrap_or(false)
    }
}

/// Identity attributes of a build pod, extracted from its labels.
///
/// This is what the completion tracker matches against a pipeline
/// activity's attributes to decide whether a pod belongs to the build
/// being aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPodInfo {
    pub organisation: String,
    pub repository: String,
    pub branch: String,
    pub build: String,
    /// Name of the owning pipeline run
    pub pipeline_run: String,
}

impl BuildPodInfo {
    /// Extract the identity attributes from a pod's labels.
    ///
    /// Missing labels become empty strings, which simply never match an
    /// activity; pods from unrelated workloads fall out of the selection
    /// this way.
    pub fn from_pod(pod: &BuildPod) -> Self {
        Self {
            organisation: pod.label(labels::OWNER).to_string(),
            repository: pod.label(labels::REPOSITORY).to_string(),
            branch: pod.label(labels::BRANCH).to_string(),
            build: pod.label(labels::BUILD).to_string(),
            pipeline_run: pod.run_name().to_string(),
        }
    }
}
