//! # Build Log Data Layer
//!
//! Read-only models for the three resource kinds the aggregation core
//! observes: pipeline activities (the logical build record), pipeline runs
//! (the orchestration platform's instantiation of a build) and build pods
//! (the execution units hosting a run's containers).
//!
//! These models are populated by the platform-facing store implementations;
//! this core never mutates them.

pub mod activity;
pub mod build_pod;
pub mod pipeline_run;

// Re-export core models for easy access
pub use activity::{ActivityStatus, PipelineActivity};
pub use build_pod::{BuildPod, BuildPodInfo, PodContainer, PodPhase};
pub use pipeline_run::{PipelineRun, RunParam};
