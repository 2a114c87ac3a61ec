//! # Pipeline Run Model
//!
//! The orchestration platform's runtime instantiation of a pipeline
//! execution. Owned by the platform; this core only observes it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{labels, params};

/// A declared run parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParam {
    pub name: String,
    pub value: String,
}

/// A pipeline run as observed from the orchestration platform.
///
/// Identity labels mirror the activity's attributes, with two historical
/// quirks this core has to absorb: the repository label may use the legacy
/// `repo` spelling, and runs created before the `build` label existed carry
/// the build number in a `build_id` parameter instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Resource name of the run
    pub name: String,
    /// Namespace the run was created in
    pub namespace: String,
    /// Resource labels, including the identity attributes
    pub labels: HashMap<String, String>,
    /// Declared parameters
    pub params: Vec<RunParam>,
    /// When the run was created
    pub created_at: DateTime<Utc>,
}

impl PipelineRun {
    /// Value of a label, or the empty string when absent
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("")
    }

    /// The run's disambiguation context label, empty when none was set
    pub fn context(&self) -> &str {
        self.label(labels::CONTEXT)
    }

    /// Build number from the modern `build` label, without legacy recovery
    pub fn build_label(&self) -> &str {
        self.label(labels::BUILD)
    }

    /// Build number recovered from the legacy `build_id` parameter.
    ///
    /// Returns the empty string when the run declares no such parameter.
    pub fn legacy_build_number(&self) -> String {
        let mut build_number = String::new();
        for param in &self.params {
            if param.name == params::BUILD_ID {
                build_number = param.value.clone();
            }
        }
        build_number
    }
}
