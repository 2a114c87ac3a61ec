//! # Build Log Aggregation Engine
//!
//! The core of the build log system: correlates the pipeline activity
//! collection with the orchestration platform's run collection, streams
//! live build pod logs as containers start, and falls back to the
//! bucket-stored copy when the pods are gone.
//!
//! ## Core Components
//!
//! - **correlate**: derives the canonical activity name both resource kinds
//!   share, absorbing the legacy repository label and build-number
//!   parameter quirks
//! - **matcher**: joins activities and runs on the canonical name, most
//!   recent run first, disambiguating same-name collisions by context
//! - **streamer**: waits for each container of a matched pod to start and
//!   pipes its output through the caller's [`LogWriter`](crate::writer::LogWriter)
//! - **tracker**: drives the streaming loop across every run of one
//!   activity, guaranteeing each run is logged at most once and none is
//!   silently skipped
//! - **persisted**: bounded read of the archived log object for builds
//!   whose pods have been garbage collected

pub mod correlate;
pub mod matcher;
pub mod persisted;
pub mod streamer;
pub mod tracker;

pub use matcher::match_runs_to_activities;
pub use persisted::PersistedLogFetcher;
pub use streamer::ContainerWaitState;
pub use tracker::LogAggregator;
