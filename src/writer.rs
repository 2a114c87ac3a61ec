//! # Log Writer Capability
//!
//! The dual-capability writer abstraction log aggregation emits through:
//! single buffered lines (headers, warnings, persisted log dumps) and
//! blocking streams of a live container's output.
//!
//! It is the implementer's responsibility to route the output through the
//! corresponding medium; the CLI forwards to the terminal, the UI to a
//! websocket. This crate ships the discard and buffer-to-memory variants,
//! the latter for tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::models::{BuildPod, PodContainer};

/// Sink for aggregated build log output
#[async_trait]
pub trait LogWriter: Send + Sync {
    /// Write a single line of output
    async fn write_line(&self, line: &str) -> Result<()>;

    /// Stream a live container's output until it is exhausted.
    ///
    /// This call is expected to block (in the async sense) for as long as
    /// the container keeps producing output, returning once the stream
    /// ends or errors.
    async fn stream_log(
        &self,
        namespace: &str,
        pod: &BuildPod,
        container: &PodContainer,
    ) -> Result<()>;
}

/// Writer that discards everything
#[derive(Debug, Default)]
pub struct NullLogWriter;

#[async_trait]
impl LogWriter for NullLogWriter {
    async fn write_line(&self, _line: &str) -> Result<()> {
        Ok(())
    }

    async fn stream_log(
        &self,
        _namespace: &str,
        _pod: &BuildPod,
        _container: &PodContainer,
    ) -> Result<()> {
        Ok(())
    }
}

/// Writer that records everything in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct BufferLogWriter {
    lines: Mutex<Vec<String>>,
    streamed: Mutex<Vec<String>>,
}

impl BufferLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// `namespace/pod/container` triples streamed so far, in order
    pub fn streamed(&self) -> Vec<String> {
        self.streamed.lock().clone()
    }
}

#[async_trait]
impl LogWriter for BufferLogWriter {
    async fn write_line(&self, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    async fn stream_log(
        &self,
        namespace: &str,
        pod: &BuildPod,
        container: &PodContainer,
    ) -> Result<()> {
        self.streamed
            .lock()
            .push(format!("{namespace}/{}/{}", pod.name, container.name));
        Ok(())
    }
}
