//! # Live Log Streamer
//!
//! Streams one matched build pod's containers in declared order, waiting
//! for each container to start before piping its output through the
//! caller's writer.
//!
//! ## Container Wait State Machine
//!
//! Each container moves `NotStarted → Starting → Started`, with `Failed`
//! reachable from either of the first two states when the owning pod's
//! phase is failed. A failed pod is not an aggregation error: the failure
//! is announced as a warning line through the writer and the pod's
//! remaining containers are skipped, since they will never start.
//!
//! The poll while `Starting` re-gets the pod at the configured interval
//! and is bounded by the configured container-start deadline, so an
//! indefinitely-pending pod surfaces as a timeout instead of holding the
//! caller forever.

use tracing::{debug, warn};

use crate::config::AggregatorConfig;
use crate::error::{AggregationError, Result};
use crate::models::{BuildPod, PodPhase};
use crate::stores::BuildPodStore;
use crate::writer::LogWriter;

/// Observed state of one container while waiting to stream it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerWaitState {
    /// Container has not reported started yet
    NotStarted,
    /// Polling the pod for the container to start
    Starting,
    /// Container is producing output and can be streamed
    Started,
    /// The owning pod failed before the container started
    Failed,
}

/// Wait until the container at `idx` has started, or its pod has failed.
///
/// Returns the freshest observation of the pod together with the terminal
/// wait state. The pod is re-fetched at `config.poll_interval` while the
/// container is starting, bounded by `config.container_start_timeout`.
pub async fn wait_for_container_start(
    pods: &dyn BuildPodStore,
    namespace: &str,
    pod: BuildPod,
    idx: usize,
    writer: &dyn LogWriter,
    config: &AggregatorConfig,
) -> Result<(BuildPod, ContainerWaitState)> {
    let mut state = ContainerWaitState::NotStarted;

    if pod.phase == PodPhase::Failed {
        warn!(pod = %pod.name, "pod has failed");
        writer
            .write_line(&format!("pod {} has failed", pod.name))
            .await?;
        return Ok((pod, ContainerWaitState::Failed));
    }
    if pod.container_started(idx) {
        return Ok((pod, ContainerWaitState::Started));
    }

    let container_name = pod
        .containers
        .get(idx)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    if let Err(e) = writer
        .write_line(&format!(
            "waiting for pod {} container {container_name} to start...",
            pod.name
        ))
        .await
    {
        warn!(error = %e, "There was a problem writing a single line into the log writer");
    }
    debug!(
        pod = %pod.name,
        container = %container_name,
        state = ?state,
        "polling for container start"
    );
    state = ContainerWaitState::Starting;

    let deadline = tokio::time::Instant::now() + config.container_start_timeout;
    let mut iterations = 0u32;
    loop {
        tokio::time::sleep(config.poll_interval).await;
        iterations += 1;
        if tokio::time::Instant::now() >= deadline {
            return Err(AggregationError::WaitTimeout {
                waiting_for: format!("pod {} container {container_name}", pod.name),
                iterations,
            });
        }

        let current = pods.get(namespace, &pod.name).await?;
        if current.phase == PodPhase::Failed {
            warn!(pod = %current.name, "pod has failed");
            writer
                .write_line(&format!("pod {} has failed", current.name))
                .await?;
            return Ok((current, ContainerWaitState::Failed));
        }
        if current.container_started(idx) {
            debug!(
                pod = %current.name,
                container = %container_name,
                state = ?state,
                "container started"
            );
            return Ok((current, ContainerWaitState::Started));
        }
    }
}

/// Stream every container of a matched pod in declared order.
///
/// Emits a header line per container before handing the pod/container pair
/// to the writer's streaming capability, which blocks until the container's
/// output is exhausted.
pub(crate) async fn stream_pod_logs(
    pods: &dyn BuildPodStore,
    namespace: &str,
    pod: BuildPod,
    build_name: &str,
    writer: &dyn LogWriter,
    config: &AggregatorConfig,
) -> Result<()> {
    let stage_name = pod.stage_name().to_string();
    let mut pod = pod;

    for idx in 0..pod.containers.len() {
        let (current, state) =
            wait_for_container_start(pods, namespace, pod, idx, writer, config).await?;
        pod = current;

        if state == ContainerWaitState::Failed {
            // the remaining containers of a failed pod will never start
            break;
        }

        let Some(container) = pod.containers.get(idx).cloned() else {
            break;
        };
        writer
            .write_line(&format!(
                "Showing logs for build {build_name} stage {stage_name} and container {}",
                container.name
            ))
            .await?;
        writer.stream_log(namespace, &pod, &container).await?;
    }

    Ok(())
}
