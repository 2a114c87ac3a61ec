//! # Completion Tracker
//!
//! ## Architecture: At-Most-Once Log Aggregation Across Runs
//!
//! The `LogAggregator` component drives the streaming loop across every
//! pipeline run belonging to one activity. The two resource collections
//! evolve independently under eventual consistency, so the run list is
//! re-queried on every iteration: runs that appear after polling begins are
//! picked up, and the call-local logged-run set guarantees each run is
//! streamed at most once while the loop invariant guarantees none is
//! silently skipped.
//!
//! ## Key Behaviors
//!
//! - **Fresh run query per iteration**: runs created mid-aggregation are
//!   discovered and streamed
//! - **Oldest pod first**: pods are sorted ascending by creation time so
//!   earlier stages stream before later ones within an iteration
//! - **At-most-once**: a run already marked logged is never streamed again,
//!   even while it remains visible across iterations
//! - **Bounded**: the loop is ceilinged by the configured iteration limit;
//!   exhausting it without ever matching a pod yields the distinct
//!   garbage-collected condition that tells the caller to read the
//!   bucket-stored copy instead

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::aggregation::{matcher, streamer};
use crate::config::AggregatorConfig;
use crate::constants::labels;
use crate::error::{AggregationError, Result};
use crate::models::{BuildPodInfo, PipelineActivity};
use crate::stores::{ActivityStore, BuildPodStore, LabelSelector, PipelineRunStore};
use crate::writer::LogWriter;

/// Build log aggregation component
pub struct LogAggregator {
    activities: Arc<dyn ActivityStore>,
    runs: Arc<dyn PipelineRunStore>,
    pods: Arc<dyn BuildPodStore>,
    config: AggregatorConfig,
}

impl LogAggregator {
    /// Create a new aggregator with default configuration
    pub fn new(
        activities: Arc<dyn ActivityStore>,
        runs: Arc<dyn PipelineRunStore>,
        pods: Arc<dyn BuildPodStore>,
    ) -> Self {
        Self {
            activities,
            runs,
            pods,
            config: AggregatorConfig::default(),
        }
    }

    /// Create a new aggregator with custom configuration
    pub fn with_config(
        activities: Arc<dyn ActivityStore>,
        runs: Arc<dyn PipelineRunStore>,
        pods: Arc<dyn BuildPodStore>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            activities,
            runs,
            pods,
            config,
        }
    }

    /// List the pipelines that have both an activity record and at least
    /// one run, most recent run first.
    ///
    /// Returns the disambiguated pipeline names for selection and the
    /// lookup from name to activity. The `filters` selector is applied to
    /// both collections; the legacy `repo` key is translated to
    /// `repository` for the activity query, since the two resource kinds
    /// spell that label differently.
    #[instrument(skip(self))]
    pub async fn active_pipelines(
        &self,
        namespace: &str,
        filters: &LabelSelector,
    ) -> Result<(Vec<String>, HashMap<String, PipelineActivity>)> {
        let activity_selector = filters.rename_key(labels::REPO_LEGACY, labels::REPOSITORY);
        let activities = self.activities.list(namespace, &activity_selector).await?;
        let runs = self.runs.list(namespace, filters).await?;

        debug!(
            namespace = %namespace,
            activities = activities.len(),
            runs = runs.len(),
            "matching pipeline runs to activities"
        );

        Ok(matcher::match_runs_to_activities(activities, runs))
    }

    /// Stream the logs of the pipeline with the given disambiguated name.
    ///
    /// Convenience flow chaining matching, selection and streaming;
    /// surfaces `ActivityNotFound` when no such pipeline exists.
    #[instrument(skip(self, writer))]
    pub async fn stream_logs_by_name(
        &self,
        namespace: &str,
        pipeline_name: &str,
        filters: &LabelSelector,
        writer: &dyn LogWriter,
    ) -> Result<()> {
        let (_, by_name) = self.active_pipelines(namespace, filters).await?;
        let activity =
            by_name
                .get(pipeline_name)
                .ok_or_else(|| AggregationError::ActivityNotFound {
                    name: pipeline_name.to_string(),
                    namespace: namespace.to_string(),
                })?;
        self.stream_build_logs(activity, pipeline_name, writer).await
    }

    /// Names of the runs currently implementing an activity
    async fn pipeline_run_names(&self, activity: &PipelineActivity) -> Result<Vec<String>> {
        let selector = LabelSelector::new()
            .equals(labels::OWNER, &activity.git_owner)
            .equals(labels::REPO_LEGACY, &activity.git_repository)
            .equals(labels::BRANCH, &activity.git_branch)
            .equals(labels::BUILD, &activity.build);

        let runs = self.runs.list(&activity.namespace, &selector).await?;
        Ok(runs.into_iter().map(|run| run.name).collect())
    }

    /// Stream the live build pod logs of every run belonging to the
    /// activity through the provided writer.
    ///
    /// Loops until every discovered run has been logged, re-querying the
    /// run list each iteration, bounded by the configured iteration
    /// ceiling. Returns [`AggregationError::LogsUnavailable`] when no pod
    /// ever matched the activity — the pods have been garbage collected
    /// and the caller should read the long-term storage copy via
    /// [`PersistedLogFetcher`](crate::aggregation::PersistedLogFetcher).
    #[instrument(skip(self, activity, writer), fields(activity = %activity.name, namespace = %activity.namespace))]
    pub async fn stream_build_logs(
        &self,
        activity: &PipelineActivity,
        build_name: &str,
        writer: &dyn LogWriter,
    ) -> Result<()> {
        let mut run_names = self.pipeline_run_names(activity).await?;
        let mut logged: HashMap<String, bool> = HashMap::new();
        let mut found_logs = false;
        let mut iterations = 0u32;

        while run_names.len() > logged.len() {
            if iterations >= self.config.max_wait_iterations {
                if found_logs {
                    return Err(AggregationError::WaitTimeout {
                        waiting_for: format!("logs of {build_name}"),
                        iterations,
                    });
                }
                warn!(
                    build = %build_name,
                    iterations = iterations,
                    "iteration ceiling reached without finding any build pod"
                );
                break;
            }
            iterations += 1;

            let mut pods = self.pods.list(&activity.namespace).await?;
            pods.sort_by(|a, b| a.created_at.cmp(&b.created_at));

            let mut runs_seen = HashMap::new();
            for pod in pods {
                let info = BuildPodInfo::from_pod(&pod);
                let seen = logged.contains_key(&info.pipeline_run);

                if !seen
                    && info.organisation == activity.git_owner
                    && info.repository == activity.git_repository
                    && info.branch.to_lowercase() == activity.git_branch.to_lowercase()
                    && info.build == activity.build
                {
                    runs_seen.insert(info.pipeline_run.clone(), true);
                    found_logs = true;
                    streamer::stream_pod_logs(
                        self.pods.as_ref(),
                        &activity.namespace,
                        pod,
                        build_name,
                        writer,
                        &self.config,
                    )
                    .await?;
                }
            }

            run_names = self.pipeline_run_names(activity).await?;
            if runs_seen.is_empty() {
                // nothing matched this round; let the platform catch up
                tokio::time::sleep(self.config.poll_interval).await;
            }
            logged.extend(runs_seen);
        }

        if !found_logs {
            return Err(AggregationError::LogsUnavailable {
                build: build_name.to_string(),
            });
        }

        info!(
            build = %build_name,
            runs_logged = logged.len(),
            iterations = iterations,
            "finished streaming build logs"
        );
        Ok(())
    }
}
