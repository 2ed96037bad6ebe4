use std::collections::{HashMap, HashSet};

use shared_types::{RunSummary, RunTimeline};

use super::aggregates::{aggregate_forest, summarize_forest};
use super::timeline::expand_all;
use super::tree::build_tree_with_diagnostics;
use super::types::{ForestSummary, TraceAggregates, TraceNode, TreeDiagnostics};

/// State behind the workflow view
///
/// The forest is rebuilt from scratch on every timeline fetch; only the
/// selection and expansion survive a refresh.
#[derive(Clone, Debug, Default)]
pub struct WorkflowViewState {
    pub runs: Vec<RunSummary>,
    pub selected_run_id: Option<String>,
    pub timeline: Option<RunTimeline>,
    pub forest: Vec<TraceNode>,
    pub summary: ForestSummary,
    pub aggregates: HashMap<String, TraceAggregates>,
    pub expanded: HashSet<String>,
    pub selected_trace_id: Option<String>,
    pub loading: bool,
    /// Timeline fetch failure for the selected run
    pub error: Option<String>,
    /// Run list fetch failure; leaves the timeline alone
    pub runs_error: Option<String>,
    loaded_run_id: Option<String>,
}

impl WorkflowViewState {
    /// Store a fresh run list; picks the newest run when nothing is selected.
    pub fn apply_runs(&mut self, runs: Vec<RunSummary>) {
        if self.selected_run_id.is_none() {
            self.selected_run_id = runs.first().map(|run| run.run_id.clone());
            self.loading = self.selected_run_id.is_some();
        }
        self.runs = runs;
        self.runs_error = None;
    }

    pub fn apply_runs_error(&mut self, message: String) {
        self.runs_error = Some(message);
    }

    /// Returns `false` when the run was already selected.
    pub fn select_run(&mut self, run_id: &str) -> bool {
        if self.selected_run_id.as_deref() == Some(run_id) {
            return false;
        }
        self.selected_run_id = Some(run_id.to_string());
        self.timeline = None;
        self.forest.clear();
        self.summary = ForestSummary::default();
        self.aggregates.clear();
        self.expanded.clear();
        self.selected_trace_id = None;
        self.loading = true;
        self.error = None;
        true
    }

    /// Rebuild the tree from a fetched timeline.
    ///
    /// Returns `None` without touching state when the response belongs to a
    /// run that is no longer selected.
    pub fn apply_timeline(
        &mut self,
        mut timeline: RunTimeline,
        auto_expand: bool,
    ) -> Option<TreeDiagnostics> {
        if self.selected_run_id.as_deref() != Some(timeline.run_id.as_str()) {
            return None;
        }

        let (forest, diagnostics) =
            build_tree_with_diagnostics(&timeline.traces, &timeline.artifacts);
        let expandable = expand_all(&forest);

        let first_load = self.loaded_run_id.as_deref() != Some(timeline.run_id.as_str());
        if first_load {
            self.expanded = if auto_expand {
                expandable
            } else {
                HashSet::new()
            };
        } else {
            self.expanded.retain(|trace_id| expandable.contains(trace_id));
        }

        if let Some(selected) = self.selected_trace_id.as_deref() {
            let still_present = forest
                .iter()
                .flat_map(|root| root.descendants())
                .any(|node| node.trace_id() == selected);
            if !still_present {
                self.selected_trace_id = None;
            }
        }

        self.summary = summarize_forest(&forest);
        self.aggregates = aggregate_forest(&forest);
        self.forest = forest;
        timeline.traces.clear();
        timeline.artifacts.clear();
        self.timeline = Some(timeline);
        self.loaded_run_id = self.selected_run_id.clone();
        self.loading = false;
        self.error = None;
        Some(diagnostics)
    }

    pub fn apply_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn toggle_expanded(&mut self, trace_id: &str) {
        if !self.expanded.remove(trace_id) {
            self.expanded.insert(trace_id.to_string());
        }
    }

    pub fn select_trace(&mut self, trace_id: &str) {
        if self.selected_trace_id.as_deref() == Some(trace_id) {
            self.selected_trace_id = None;
        } else {
            self.selected_trace_id = Some(trace_id.to_string());
        }
    }

    pub fn expand_everything(&mut self) {
        self.expanded = expand_all(&self.forest);
    }

    pub fn collapse_everything(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{TraceRecord, TraceStatus, TraceType};

    fn run(id: &str) -> RunSummary {
        RunSummary {
            run_id: id.to_string(),
            ..RunSummary::default()
        }
    }

    fn timeline(run_id: &str, records: Vec<TraceRecord>) -> RunTimeline {
        RunTimeline {
            run_id: run_id.to_string(),
            status: TraceStatus::Running,
            traces: records,
            ..RunTimeline::default()
        }
    }

    fn record(id: &str, parent: Option<&str>, second: u32) -> TraceRecord {
        TraceRecord {
            parent_trace_id: parent.map(ToString::to_string),
            start_time: Some(format!("2026-02-20T10:00:{second:02}Z")),
            ..TraceRecord::new(id, TraceType::Agent)
        }
    }

    fn nested() -> Vec<TraceRecord> {
        vec![
            record("root", None, 0),
            record("child", Some("root"), 1),
            record("leaf", Some("child"), 2),
        ]
    }

    #[test]
    fn test_first_run_is_selected_automatically() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-b"), run("run-a")]);
        assert_eq!(state.selected_run_id.as_deref(), Some("run-b"));
        assert!(state.loading);

        state.apply_runs(vec![run("run-c"), run("run-b")]);
        assert_eq!(state.selected_run_id.as_deref(), Some("run-b"));
    }

    #[test]
    fn test_stale_timeline_is_discarded() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-a"), run("run-b")]);
        assert!(state.select_run("run-b"));

        assert!(state.apply_timeline(timeline("run-a", nested()), true).is_none());
        assert!(state.forest.is_empty());
        assert!(state.loading);

        let diagnostics = state.apply_timeline(timeline("run-b", nested()), true).unwrap();
        assert!(diagnostics.is_clean());
        assert_eq!(state.summary.node_count, 3);
        assert!(!state.loading);
        assert!(state.timeline.as_ref().unwrap().traces.is_empty());
    }

    #[test]
    fn test_expansion_survives_refresh() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-a")]);
        state.apply_timeline(timeline("run-a", nested()), true);
        assert_eq!(state.expanded.len(), 2);

        state.toggle_expanded("child");
        state.select_trace("leaf");
        state.apply_timeline(timeline("run-a", nested()), true);
        assert!(state.expanded.contains("root"));
        assert!(!state.expanded.contains("child"));
        assert_eq!(state.selected_trace_id.as_deref(), Some("leaf"));

        let shrunk = vec![record("root", None, 0), record("child", Some("root"), 1)];
        state.apply_timeline(timeline("run-a", shrunk), true);
        assert!(state.selected_trace_id.is_none());
        assert!(state.expanded.contains("root"));
    }

    #[test]
    fn test_auto_expand_off_starts_collapsed() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-a")]);
        state.apply_timeline(timeline("run-a", nested()), false);
        assert!(state.expanded.is_empty());

        state.expand_everything();
        assert_eq!(state.expanded.len(), 2);
        state.collapse_everything();
        assert!(state.expanded.is_empty());
    }

    #[test]
    fn test_run_list_failure_leaves_timeline_load_alone() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-a")]);
        assert!(state.loading);

        state.apply_runs_error("Request failed: offline".to_string());
        assert!(state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.runs_error.as_deref(), Some("Request failed: offline"));

        state.apply_timeline(timeline("run-a", nested()), true);
        assert!(!state.loading);
        assert_eq!(state.summary.node_count, 3);

        state.apply_runs(vec![run("run-a")]);
        assert!(state.runs_error.is_none());
    }

    #[test]
    fn test_error_clears_loading() {
        let mut state = WorkflowViewState::default();
        state.apply_runs(vec![run("run-a")]);
        state.apply_error("HTTP error: 500".to_string());
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("HTTP error: 500"));
    }
}
