#![allow(clippy::doc_markdown)] // Allow technical terms like URLs and label keys in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Buildlog Core Rust
//!
//! High-performance Rust core for CI/CD build log aggregation.
//!
//! ## Overview
//!
//! Given a logical pipeline build (a [`PipelineActivity`](models::PipelineActivity)),
//! this crate locates the orchestration-platform run(s) implementing it,
//! streams logs from their live build pods as containers start, and — when
//! the pods have been reclaimed before every log was captured — falls back
//! to the durable copy a log-shipping sidecar left in bucket storage.
//!
//! The hard part is correlating two independently-evolving resource
//! collections under eventual consistency: tolerating pods that have not
//! started yet, detecting pods that will never start or no longer exist,
//! and guaranteeing every run is logged at most once while none is
//! silently skipped.
//!
//! ## Architecture
//!
//! The core consumes the platform through narrow capability traits
//! ([`stores`]) and emits through a dual-capability [`writer`], so the
//! surrounding CLI/UI owns transport, auth and formatting while this crate
//! owns the correlation and completion logic.
//!
//! ## Module Organization
//!
//! - [`models`] - Read-only data layer for activities, runs and build pods
//! - [`stores`] - Platform and storage collaborator traits
//! - [`writer`] - Log output capability with discard/buffer variants
//! - [`aggregation`] - Correlation, matching, streaming, completion
//!   tracking and the persisted-log fallback
//! - [`config`] - Timing bounds for every blocking call
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use buildlog_core::aggregation::LogAggregator;
//! use buildlog_core::stores::LabelSelector;
//! use buildlog_core::writer::NullLogWriter;
//!
//! # async fn example(
//! #     activities: Arc<dyn buildlog_core::stores::ActivityStore>,
//! #     runs: Arc<dyn buildlog_core::stores::PipelineRunStore>,
//! #     pods: Arc<dyn buildlog_core::stores::BuildPodStore>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = LogAggregator::new(activities, runs, pods);
//!
//! // List selectable pipelines, most recent run first
//! let (names, by_name) = aggregator
//!     .active_pipelines("builds", &LabelSelector::new())
//!     .await?;
//!
//! if let Some(name) = names.first() {
//!     let activity = &by_name[name];
//!     let writer = NullLogWriter;
//!     match aggregator.stream_build_logs(activity, name, &writer).await {
//!         Err(e) if e.is_logs_unavailable() => {
//!             // pods were garbage collected; read the bucket copy instead
//!         }
//!         other => other?,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod stores;
pub mod writer;

pub use aggregation::{ContainerWaitState, LogAggregator, PersistedLogFetcher};
pub use config::AggregatorConfig;
pub use error::{AggregationError, Result};
pub use models::{
    ActivityStatus, BuildPod, BuildPodInfo, PipelineActivity, PipelineRun, PodContainer, PodPhase,
    RunParam,
};
pub use stores::{
    ActivityStore, BucketAccess, BucketCredentialResolver, BuildPodStore, LabelSelector,
    ObjectFetcher, PipelineRunStore,
};
pub use writer::{BufferLogWriter, LogWriter, NullLogWriter};
