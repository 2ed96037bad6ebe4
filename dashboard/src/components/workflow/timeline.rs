use std::collections::HashSet;

use super::types::{RunWindow, TimelineRow, TraceNode, WORKFLOW_MIN_BAR_WIDTH_PCT};

// ── Run window ───────────────────────────────────────────────────────────────

/// Earliest parsed start to latest parsed end (or start, for running steps).
pub fn run_window(forest: &[TraceNode]) -> Option<RunWindow> {
    let mut start_ms: Option<i64> = None;
    let mut end_ms: Option<i64> = None;
    for node in forest.iter().flat_map(|root| root.descendants()) {
        let started = node.record.started_at().map(|dt| dt.timestamp_millis());
        let ended = node.record.ended_at().map(|dt| dt.timestamp_millis());
        if let Some(started) = started {
            start_ms = Some(start_ms.map_or(started, |current| current.min(started)));
        }
        if let Some(latest) = ended.or(started) {
            end_ms = Some(end_ms.map_or(latest, |current| current.max(latest)));
        }
    }
    Some(RunWindow {
        start_ms: start_ms?,
        end_ms: end_ms?,
    })
}

fn bar_geometry(node: &TraceNode, window: Option<RunWindow>) -> (f32, f32) {
    let Some(window) = window else {
        return (0.0, 100.0);
    };
    let Some(started) = node.record.started_at().map(|dt| dt.timestamp_millis()) else {
        return (0.0, 0.0);
    };
    // Running steps stretch to the end of the window.
    let ended = node
        .record
        .ended_at()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(window.end_ms)
        .max(started);
    let span = window.span_ms() as f32;
    let offset = ((started - window.start_ms) as f32 / span * 100.0).clamp(0.0, 100.0);
    let width = ((ended - started) as f32 / span * 100.0)
        .max(WORKFLOW_MIN_BAR_WIDTH_PCT)
        .min(100.0 - offset);
    (offset, width.max(0.0))
}

// ── Flattening ───────────────────────────────────────────────────────────────

/// Visible rows of the timeline, in display order.
///
/// Children are only emitted under nodes whose id is in `expanded`.
pub fn flatten_timeline(forest: &[TraceNode], expanded: &HashSet<String>) -> Vec<TimelineRow> {
    let window = run_window(forest);
    let mut rows = Vec::new();
    let mut stack: Vec<(&TraceNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        let is_expanded = expanded.contains(node.trace_id());
        let (offset_pct, width_pct) = bar_geometry(node, window);
        rows.push(TimelineRow {
            trace_id: node.trace_id().to_string(),
            name: display_name(node),
            trace_type: node.trace_type(),
            status: node.status(),
            symbol: node.record.symbol.clone(),
            depth,
            has_children: !node.children.is_empty(),
            expanded: is_expanded,
            duration_ms: node.duration_ms,
            artifact_count: node.artifacts.len(),
            offset_pct,
            width_pct,
        });
        if is_expanded {
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    rows
}

/// Ids of every node that has children.
pub fn expand_all(forest: &[TraceNode]) -> HashSet<String> {
    forest
        .iter()
        .flat_map(|root| root.descendants())
        .filter(|node| !node.children.is_empty())
        .map(|node| node.trace_id().to_string())
        .collect()
}

pub fn find_node<'a>(forest: &'a [TraceNode], trace_id: &str) -> Option<&'a TraceNode> {
    forest
        .iter()
        .flat_map(|root| root.descendants())
        .find(|node| node.trace_id() == trace_id)
}

pub fn display_name(node: &TraceNode) -> String {
    if node.record.name.trim().is_empty() {
        format!("{} {}", node.trace_type().as_str(), node.trace_id())
    } else {
        node.record.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::workflow::tree::build_tree;
    use shared_types::{TraceRecord, TraceType};

    fn record(id: &str, parent: Option<&str>, start: u32, end: Option<u32>) -> TraceRecord {
        TraceRecord {
            parent_trace_id: parent.map(ToString::to_string),
            name: id.to_uppercase(),
            start_time: Some(format!("2026-02-20T10:00:{start:02}Z")),
            end_time: end.map(|end| format!("2026-02-20T10:00:{end:02}Z")),
            ..TraceRecord::new(id, TraceType::Node)
        }
    }

    fn forest() -> Vec<TraceNode> {
        build_tree(
            &[
                record("root", None, 0, Some(40)),
                record("a", Some("root"), 10, Some(20)),
                record("a1", Some("a"), 12, Some(14)),
                record("b", Some("root"), 30, None),
            ],
            &[],
        )
    }

    #[test]
    fn test_collapsed_forest_shows_roots_only() {
        let rows = flatten_timeline(&forest(), &HashSet::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trace_id, "root");
        assert!(rows[0].has_children);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn test_expand_all_emits_preorder_with_depth() {
        let forest = forest();
        let rows = flatten_timeline(&forest, &expand_all(&forest));
        let order: Vec<(&str, usize)> = rows
            .iter()
            .map(|row| (row.trace_id.as_str(), row.depth))
            .collect();
        assert_eq!(order, vec![("root", 0), ("a", 1), ("a1", 2), ("b", 1)]);
    }

    #[test]
    fn test_bar_geometry_relative_to_window() {
        let forest = forest();
        let window = run_window(&forest).unwrap();
        assert_eq!(window.span_ms(), 40_000);

        let rows = flatten_timeline(&forest, &expand_all(&forest));
        let a = rows.iter().find(|row| row.trace_id == "a").unwrap();
        assert!((a.offset_pct - 25.0).abs() < 0.01);
        assert!((a.width_pct - 25.0).abs() < 0.01);

        let running = rows.iter().find(|row| row.trace_id == "b").unwrap();
        assert!((running.offset_pct - 75.0).abs() < 0.01);
        assert!((running.width_pct - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_find_node_and_display_name() {
        let forest = forest();
        let node = find_node(&forest, "a1").unwrap();
        assert_eq!(display_name(node), "A1");
        assert!(find_node(&forest, "zzz").is_none());
        assert!(run_window(&[]).is_none());
    }
}
