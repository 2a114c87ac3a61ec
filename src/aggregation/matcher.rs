//! # Activity/Run Matcher
//!
//! Joins the pipeline activity collection and the orchestration platform's
//! run collection on the canonical activity name, producing the ordered
//! list of names a caller can present for selection and the lookup from
//! name to activity record.
//!
//! Runs are ordered most recent first so active builds top any selection
//! UI. Runs with no matching activity are silently skipped: under eventual
//! consistency that only means the record has not been created yet or was
//! already pruned, not that anything is wrong.

use std::collections::HashMap;

use crate::aggregation::correlate;
use crate::models::{PipelineActivity, PipelineRun};

/// Match pipeline runs to their activities.
///
/// Returns the disambiguated names ordered by run creation time descending
/// and the map from name to activity record. Activities are indexed by
/// canonical name last-write-wins; a run whose canonical name collides
/// with another's gets its context label appended, and the activity is
/// re-indexed in the output under the enriched name. Lookups go through a
/// stable index so that several same-name runs with different contexts all
/// resolve to the record.
pub fn match_runs_to_activities(
    activities: Vec<PipelineActivity>,
    mut runs: Vec<PipelineRun>,
) -> (Vec<String>, HashMap<String, PipelineActivity>) {
    let mut by_name: HashMap<String, PipelineActivity> = HashMap::new();
    for activity in activities {
        by_name.insert(activity.canonical_name(), activity);
    }
    let index = by_name.clone();

    runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut names = Vec::new();
    for run in &runs {
        let canonical = correlate::run_activity_name(run);
        if let Some(activity) = index.get(&canonical) {
            let enriched = correlate::disambiguated_name(&canonical, run.context());
            by_name.remove(&canonical);
            by_name.insert(enriched.clone(), activity.clone());
            names.push(enriched);
        }
    }

    (names, by_name)
}
