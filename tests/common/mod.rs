//! In-memory fake stores and resource builders for aggregation tests.
//!
//! Provides fake implementations of the platform collaborator traits so
//! the aggregation core can be exercised without a real orchestration
//! platform. Pods can be scheduled to appear only after a number of list
//! queries, which is how tests simulate runs whose pods are created while
//! the completion loop is already polling.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;

use buildlog_core::config::AggregatorConfig;
use buildlog_core::error::{AggregationError, Result};
use buildlog_core::models::{
    ActivityStatus, BuildPod, PipelineActivity, PipelineRun, PodContainer, PodPhase,
};
use buildlog_core::stores::{ActivityStore, BuildPodStore, LabelSelector, PipelineRunStore};

pub mod labels {
    pub use buildlog_core::constants::labels::*;
}

/// Fake activity store backed by a vector
#[derive(Default)]
pub struct InMemoryActivityStore {
    activities: Mutex<Vec<PipelineActivity>>,
}

impl InMemoryActivityStore {
    pub fn with(activities: Vec<PipelineActivity>) -> Arc<Self> {
        Arc::new(Self {
            activities: Mutex::new(activities),
        })
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn list(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<PipelineActivity>> {
        Ok(self
            .activities
            .lock()
            .iter()
            .filter(|a| a.namespace == namespace && selector.matches(&a.labels))
            .cloned()
            .collect())
    }
}

/// Fake run store backed by a vector
#[derive(Default)]
pub struct InMemoryRunStore {
    runs: Mutex<Vec<PipelineRun>>,
}

impl InMemoryRunStore {
    pub fn with(runs: Vec<PipelineRun>) -> Arc<Self> {
        Arc::new(Self {
            runs: Mutex::new(runs),
        })
    }
}

#[async_trait]
impl PipelineRunStore for InMemoryRunStore {
    async fn list(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<PipelineRun>> {
        Ok(self
            .runs
            .lock()
            .iter()
            .filter(|r| r.namespace == namespace && selector.matches(&r.labels))
            .cloned()
            .collect())
    }
}

/// Fake pod store whose pods can appear after a number of list queries
#[derive(Default)]
pub struct InMemoryPodStore {
    pods: Mutex<Vec<BuildPod>>,
    /// Pods that become visible once `list` has been called N times
    appearing: Mutex<Vec<(u32, BuildPod)>>,
    list_calls: Mutex<u32>,
}

impl InMemoryPodStore {
    pub fn with(pods: Vec<BuildPod>) -> Arc<Self> {
        Arc::new(Self {
            pods: Mutex::new(pods),
            ..Self::default()
        })
    }

    /// Make `pod` visible starting from the `after`-th list query
    pub fn appear_after(&self, after: u32, pod: BuildPod) {
        self.appearing.lock().push((after, pod));
    }

    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock()
    }
}

#[async_trait]
impl BuildPodStore for InMemoryPodStore {
    async fn list(&self, namespace: &str) -> Result<Vec<BuildPod>> {
        let calls = {
            let mut calls = self.list_calls.lock();
            *calls += 1;
            *calls
        };
        {
            let mut appearing = self.appearing.lock();
            let mut pods = self.pods.lock();
            let (ready, waiting): (Vec<_>, Vec<_>) = appearing
                .drain(..)
                .partition(|(after, _)| *after <= calls);
            pods.extend(ready.into_iter().map(|(_, pod)| pod));
            *appearing = waiting;
        }
        Ok(self
            .pods
            .lock()
            .iter()
            .filter(|p| p.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<BuildPod> {
        self.pods
            .lock()
            .iter()
            .find(|p| p.namespace == namespace && p.name == name)
            .cloned()
            .ok_or_else(|| {
                AggregationError::platform_query("get build pod", format!("pod {name} not found"))
            })
    }
}

/// Activity for `owner/repo/branch #build` with matching labels
pub fn activity(owner: &str, repo: &str, branch: &str, build: &str) -> PipelineActivity {
    PipelineActivity {
        name: format!("{owner}-{repo}-{branch}-{build}"),
        namespace: "builds".to_string(),
        git_owner: owner.to_string(),
        git_repository: repo.to_string(),
        git_branch: branch.to_string(),
        build: build.to_string(),
        status: ActivityStatus::Running,
        labels: HashMap::from([
            (labels::OWNER.to_string(), owner.to_string()),
            (labels::REPOSITORY.to_string(), repo.to_string()),
            (labels::BRANCH.to_string(), branch.to_string()),
            (labels::BUILD.to_string(), build.to_string()),
        ]),
        created_at: Utc::now(),
    }
}

/// Run labeled for `owner/repo/branch #build`, `age_mins` old
pub fn run(
    name: &str,
    owner: &str,
    repo: &str,
    branch: &str,
    build: &str,
    age_mins: i64,
) -> PipelineRun {
    PipelineRun {
        name: name.to_string(),
        namespace: "builds".to_string(),
        labels: HashMap::from([
            (labels::OWNER.to_string(), owner.to_string()),
            (labels::REPO_LEGACY.to_string(), repo.to_string()),
            (labels::BRANCH.to_string(), branch.to_string()),
            (labels::BUILD.to_string(), build.to_string()),
        ]),
        params: vec![],
        created_at: Utc::now() - ChronoDuration::minutes(age_mins),
    }
}

/// Running pod for `owner/repo/branch #build` with started containers
#[allow(clippy::too_many_arguments)]
pub fn pod(
    name: &str,
    run_name: &str,
    stage: &str,
    owner: &str,
    repo: &str,
    branch: &str,
    build: &str,
    containers: &[&str],
    age_mins: i64,
) -> BuildPod {
    BuildPod {
        name: name.to_string(),
        namespace: "builds".to_string(),
        labels: HashMap::from([
            (labels::OWNER.to_string(), owner.to_string()),
            (labels::REPOSITORY.to_string(), repo.to_string()),
            (labels::BRANCH.to_string(), branch.to_string()),
            (labels::BUILD.to_string(), build.to_string()),
            (labels::STAGE_NAME.to_string(), stage.to_string()),
            (labels::RUN_NAME.to_string(), run_name.to_string()),
        ]),
        phase: PodPhase::Running,
        containers: containers
            .iter()
            .map(|c| PodContainer {
                name: (*c).to_string(),
                started: true,
            })
            .collect(),
        created_at: Utc::now() - ChronoDuration::minutes(age_mins),
    }
}

/// Aggregator configuration with test-friendly bounds
pub fn fast_config(max_wait_iterations: u32) -> AggregatorConfig {
    AggregatorConfig {
        poll_interval: Duration::from_millis(2),
        container_start_timeout: Duration::from_millis(200),
        max_wait_iterations,
        persisted_fetch_timeout: Duration::from_millis(200),
        namespace: "builds".to_string(),
    }
}
