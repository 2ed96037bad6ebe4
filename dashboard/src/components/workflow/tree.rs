//! Trace tree reconstruction
//!
//! Turns the flat trace records of one workflow run into a forest of
//! [`TraceNode`]s. Records are first placed in an arena keyed by trace id,
//! parent edges are wired in a second pass, and the output tree is assembled
//! bottom-up. Nothing here recurses, so deep or malformed inputs cannot blow
//! the stack or loop forever.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use shared_types::{Artifact, TraceRecord};

use super::types::{TraceNode, TreeDiagnostics};

// ── Time helpers ─────────────────────────────────────────────────────────────

/// Missing or unparseable timestamps sort after every parsed one.
pub fn compare_start_times(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `end - start`, negative when the clocks disagree.
pub fn duration_between_ms(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<i64> {
    let start = start?;
    let end = end?;
    Some((end - start).num_milliseconds())
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Build the trace forest for one run.
///
/// Roots and every child list are ordered by start time (stable on ties).
/// Dangling or cyclic parent links turn the record into a root, duplicate
/// ids keep their first occurrence, and artifacts that match no node are
/// dropped. Never panics on malformed input.
pub fn build_tree(records: &[TraceRecord], artifacts: &[Artifact]) -> Vec<TraceNode> {
    build_tree_with_diagnostics(records, artifacts).0
}

/// Same as [`build_tree`], also reporting what had to be repaired.
pub fn build_tree_with_diagnostics(
    records: &[TraceRecord],
    artifacts: &[Artifact],
) -> (Vec<TraceNode>, TreeDiagnostics) {
    let mut diagnostics = TreeDiagnostics::default();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut arena: Vec<&TraceRecord> = Vec::with_capacity(records.len());
    for record in records {
        if index.contains_key(record.trace_id.as_str()) {
            diagnostics.duplicate_ids.push(record.trace_id.clone());
            continue;
        }
        index.insert(record.trace_id.as_str(), arena.len());
        arena.push(record);
    }

    let starts: Vec<Option<DateTime<Utc>>> =
        arena.iter().map(|record| record.started_at()).collect();
    for (record, start) in arena.iter().zip(&starts) {
        if start.is_none() {
            diagnostics.unparseable_starts.push(record.trace_id.clone());
        }
    }

    let mut parents: Vec<Option<usize>> = vec![None; arena.len()];
    for (idx, record) in arena.iter().enumerate() {
        let Some(parent_id) = record
            .parent_trace_id
            .as_deref()
            .filter(|parent_id| !parent_id.is_empty())
        else {
            continue;
        };
        let Some(&parent_idx) = index.get(parent_id) else {
            diagnostics.dangling_parents.push(record.trace_id.clone());
            continue;
        };
        if creates_cycle(&parents, idx, parent_idx) {
            diagnostics.broken_cycles.push(record.trace_id.clone());
            continue;
        }
        parents[idx] = Some(parent_idx);
    }

    // Indices are pushed in arena order, so the stable sort below keeps input
    // order on equal start times.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); arena.len()];
    let mut roots = Vec::new();
    for (idx, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent_idx) => children[*parent_idx].push(idx),
            None => roots.push(idx),
        }
    }
    let by_start = |a: &usize, b: &usize| compare_start_times(starts[*a], starts[*b]);
    roots.sort_by(by_start);
    for siblings in &mut children {
        siblings.sort_by(by_start);
    }

    let mut owned = distribute_artifacts(&arena, &index, artifacts, &mut diagnostics);

    let mut order = Vec::with_capacity(arena.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(children[idx].iter().rev().copied());
    }

    // Reverse pre-order visits every child before its parent.
    let mut built: Vec<Option<TraceNode>> = (0..arena.len()).map(|_| None).collect();
    for &idx in order.iter().rev() {
        let node_children = children[idx]
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        let mut record = arena[idx].clone();
        record.artifacts = Vec::new();
        let duration_ms = duration_between_ms(starts[idx], record.ended_at());
        if duration_ms.is_some_and(|ms| ms < 0) {
            diagnostics.inverted_durations.push(record.trace_id.clone());
        }
        built[idx] = Some(TraceNode {
            record,
            duration_ms,
            children: node_children,
            artifacts: std::mem::take(&mut owned[idx]),
        });
    }

    let forest = roots
        .iter()
        .filter_map(|root| built[*root].take())
        .collect();
    (forest, diagnostics)
}

/// Would linking `child` under `candidate` close a loop?
///
/// Only already-committed edges are followed; they always form a forest, so
/// the walk ends at a root.
fn creates_cycle(parents: &[Option<usize>], child: usize, candidate: usize) -> bool {
    let mut cursor = Some(candidate);
    while let Some(current) = cursor {
        if current == child {
            return true;
        }
        cursor = parents[current];
    }
    false
}

fn distribute_artifacts(
    arena: &[&TraceRecord],
    index: &HashMap<&str, usize>,
    artifacts: &[Artifact],
    diagnostics: &mut TreeDiagnostics,
) -> Vec<Vec<Artifact>> {
    let embedded = arena.iter().flat_map(|record| {
        record.artifacts.iter().map(move |artifact| {
            let mut artifact = artifact.clone();
            if artifact.trace_id.is_none() {
                artifact.trace_id = Some(record.trace_id.clone());
            }
            artifact
        })
    });

    let mut owned: Vec<Vec<Artifact>> = vec![Vec::new(); arena.len()];
    let mut seen: HashSet<String> = HashSet::new();
    for artifact in artifacts.iter().cloned().chain(embedded) {
        if !seen.insert(artifact.artifact_id.clone()) {
            diagnostics.duplicate_artifacts.push(artifact.artifact_id);
            continue;
        }
        let owner = artifact
            .trace_id
            .as_deref()
            .and_then(|trace_id| index.get(trace_id))
            .or_else(|| {
                artifact
                    .parent_trace_id
                    .as_deref()
                    .and_then(|parent_id| index.get(parent_id))
            })
            .copied();
        match owner {
            Some(idx) => owned[idx].push(artifact),
            None => diagnostics.orphan_artifacts.push(artifact.artifact_id),
        }
    }

    for node_artifacts in &mut owned {
        node_artifacts.sort_by(|a, b| compare_start_times(a.created(), b.created()));
    }
    owned
}
