//! # Activity Name Correlation
//!
//! Pure derivation of the canonical identity key shared by pipeline
//! activities and pipeline runs, `owner/repository/branch #build`,
//! case-normalized.
//!
//! These functions never fail: missing attributes produce a degenerate key
//! that simply won't correlate with anything, which is the correct outcome
//! for resources that are still being populated or belong to unrelated
//! workloads.

use std::collections::HashMap;

use crate::constants::labels;
use crate::models::PipelineRun;

/// Canonical identity key from explicit attributes
pub fn canonical_activity_name(owner: &str, repository: &str, branch: &str, build: &str) -> String {
    format!("{owner}/{repository}/{branch} #{build}").to_lowercase()
}

/// Canonical identity key from a resource's label map.
///
/// The repository label is spelled `repo` on runs and `repository` on
/// activities; when the modern key is empty the legacy one is substituted.
pub fn activity_name_from_labels(
    resource_labels: &HashMap<String, String>,
    build_number: &str,
) -> String {
    let get = |key: &str| {
        resource_labels
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    };
    let mut repository = get(labels::REPOSITORY);
    if repository.is_empty() {
        repository = get(labels::REPO_LEGACY);
    }
    canonical_activity_name(get(labels::OWNER), repository, get(labels::BRANCH), build_number)
}

/// Canonical identity key for a pipeline run, recovering the build number
/// from the legacy `build_id` parameter when the `build` label is absent
pub fn run_activity_name(run: &PipelineRun) -> String {
    let mut build_number = run.build_label().to_string();
    if build_number.is_empty() {
        build_number = run.legacy_build_number();
    }
    activity_name_from_labels(&run.labels, &build_number)
}

/// Disambiguated name for a run that collides with another on the
/// canonical key. An empty context leaves the base name unchanged.
pub fn disambiguated_name(base: &str, context: &str) -> String {
    if context.is_empty() {
        base.to_string()
    } else {
        format!("{base} {context}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::RunParam;

    fn run_labels(repo_key: &str) -> HashMap<String, String> {
        HashMap::from([
            (labels::OWNER.to_string(), "Acme".to_string()),
            (repo_key.to_string(), "Widgets".to_string()),
            (labels::BRANCH.to_string(), "Master".to_string()),
        ])
    }

    #[test]
    fn test_name_is_lowercased() {
        assert_eq!(
            canonical_activity_name("Acme", "Widgets", "Master", "7"),
            "acme/widgets/master #7"
        );
    }

    #[test]
    fn test_legacy_repo_label_fallback() {
        let modern = activity_name_from_labels(&run_labels(labels::REPOSITORY), "7");
        let legacy = activity_name_from_labels(&run_labels(labels::REPO_LEGACY), "7");
        assert_eq!(modern, legacy);
        assert_eq!(modern, "acme/widgets/master #7");
    }

    #[test]
    fn test_empty_inputs_yield_degenerate_key() {
        let name = activity_name_from_labels(&HashMap::new(), "");
        assert_eq!(name, "// #");
    }

    #[test]
    fn test_run_name_recovers_legacy_build_number() {
        let run = PipelineRun {
            name: "widgets-run-1".to_string(),
            namespace: "builds".to_string(),
            labels: run_labels(labels::REPO_LEGACY),
            params: vec![RunParam {
                name: "build_id".to_string(),
                value: "42".to_string(),
            }],
            created_at: Utc::now(),
        };
        assert_eq!(run_activity_name(&run), "acme/widgets/master #42");
    }

    #[test]
    fn test_modern_build_label_wins_over_param() {
        let mut labels_map = run_labels(labels::REPO_LEGACY);
        labels_map.insert(labels::BUILD.to_string(), "42".to_string());
        let run = PipelineRun {
            name: "widgets-run-1".to_string(),
            namespace: "builds".to_string(),
            labels: labels_map,
            params: vec![RunParam {
                name: "build_id".to_string(),
                value: "99".to_string(),
            }],
            created_at: Utc::now(),
        };
        assert_eq!(run_activity_name(&run), "acme/widgets/master #42");
    }

    #[test]
    fn test_disambiguation_appends_context() {
        assert_eq!(
            disambiguated_name("acme/widgets/master #7", "pr-checks"),
            "acme/widgets/master #7 pr-checks"
        );
        assert_eq!(
            disambiguated_name("acme/widgets/master #7", ""),
            "acme/widgets/master #7"
        );
    }
}
