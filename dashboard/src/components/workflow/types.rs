use serde::Serialize;
use shared_types::{Artifact, TraceRecord, TraceStatus, TraceType};

// ── Constants ────────────────────────────────────────────────────────────────

pub const WORKFLOW_SLOW_DURATION_MS: i64 = 5_000;
pub const WORKFLOW_MIN_BAR_WIDTH_PCT: f32 = 0.6;
pub const WORKFLOW_INDENT_PX: usize = 16;

// ── Trace tree ───────────────────────────────────────────────────────────────

/// A trace record placed in the reconstructed tree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceNode {
    #[serde(flatten)]
    pub record: TraceRecord,
    /// `end_time - start_time`, `None` while running or when unparseable
    pub duration_ms: Option<i64>,
    pub children: Vec<TraceNode>,
    pub artifacts: Vec<Artifact>,
}

impl TraceNode {
    pub fn trace_id(&self) -> &str {
        &self.record.trace_id
    }

    pub fn trace_type(&self) -> TraceType {
        self.record.trace_type
    }

    pub fn status(&self) -> TraceStatus {
        self.record.status
    }

    /// Pre-order walk over this node and all of its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a TraceNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TraceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Everything the builder had to repair while building a forest
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDiagnostics {
    pub duplicate_ids: Vec<String>,
    pub dangling_parents: Vec<String>,
    pub broken_cycles: Vec<String>,
    pub orphan_artifacts: Vec<String>,
    /// Later copies of an artifact id already attached
    pub duplicate_artifacts: Vec<String>,
    pub unparseable_starts: Vec<String>,
    /// Traces whose `end_time` is earlier than their `start_time`
    pub inverted_durations: Vec<String>,
}

impl TreeDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.dangling_parents.is_empty()
            && self.broken_cycles.is_empty()
            && self.orphan_artifacts.is_empty()
            && self.duplicate_artifacts.is_empty()
            && self.unparseable_starts.is_empty()
            && self.inverted_durations.is_empty()
    }
}

// ── Aggregates ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceAggregates {
    pub tool_calls: usize,
    pub model_calls: usize,
    pub artifacts: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForestSummary {
    pub node_count: usize,
    pub root_count: usize,
    pub max_depth: usize,
    pub running: usize,
    pub errors: usize,
    pub tool_calls: usize,
    pub model_calls: usize,
    pub artifacts: usize,
}

// ── Timeline rows ────────────────────────────────────────────────────────────

/// Time span covered by a forest, in epoch millis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl RunWindow {
    pub fn span_ms(&self) -> i64 {
        (self.end_ms - self.start_ms).max(1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRow {
    pub trace_id: String,
    pub name: String,
    pub trace_type: TraceType,
    pub status: TraceStatus,
    pub symbol: Option<String>,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub duration_ms: Option<i64>,
    pub artifact_count: usize,
    /// Bar start relative to the run window, 0..=100
    pub offset_pct: f32,
    /// Bar width relative to the run window, 0..=100
    pub width_pct: f32,
}
