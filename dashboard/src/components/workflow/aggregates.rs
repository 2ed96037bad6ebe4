use std::collections::HashMap;

use shared_types::{TraceStatus, TraceType};

use super::types::{ForestSummary, TraceAggregates, TraceNode};

// ── Per-node counts ──────────────────────────────────────────────────────────

/// Tool calls in this subtree, the node itself included.
pub fn tool_call_count(node: &TraceNode) -> usize {
    count_of_type(node, TraceType::ToolCall)
}

/// Model calls in this subtree, the node itself included.
pub fn model_call_count(node: &TraceNode) -> usize {
    count_of_type(node, TraceType::ModelCall)
}

/// Artifacts owned by this node and all of its descendants.
pub fn artifact_count(node: &TraceNode) -> usize {
    node.descendants().map(|n| n.artifacts.len()).sum()
}

fn count_of_type(node: &TraceNode, trace_type: TraceType) -> usize {
    node.descendants()
        .filter(|n| n.trace_type() == trace_type)
        .count()
}

// ── Memoized pass ────────────────────────────────────────────────────────────

/// Aggregates for every node of the forest, keyed by trace id.
///
/// One post-order pass; each subtree is summed once instead of walking it
/// again for every ancestor.
pub fn aggregate_forest(forest: &[TraceNode]) -> HashMap<String, TraceAggregates> {
    let mut out: HashMap<String, TraceAggregates> = HashMap::new();
    let mut stack: Vec<(&TraceNode, bool)> = forest.iter().rev().map(|node| (node, false)).collect();

    while let Some((node, children_done)) = stack.pop() {
        if !children_done {
            stack.push((node, true));
            stack.extend(node.children.iter().rev().map(|child| (child, false)));
            continue;
        }

        let mut totals = TraceAggregates {
            tool_calls: usize::from(node.trace_type() == TraceType::ToolCall),
            model_calls: usize::from(node.trace_type() == TraceType::ModelCall),
            artifacts: node.artifacts.len(),
        };
        for child in &node.children {
            if let Some(child_totals) = out.get(child.trace_id()) {
                totals.tool_calls += child_totals.tool_calls;
                totals.model_calls += child_totals.model_calls;
                totals.artifacts += child_totals.artifacts;
            }
        }
        out.insert(node.trace_id().to_string(), totals);
    }

    out
}

// ── Run header summary ───────────────────────────────────────────────────────

pub fn summarize_forest(forest: &[TraceNode]) -> ForestSummary {
    let mut summary = ForestSummary {
        root_count: forest.len(),
        ..ForestSummary::default()
    };

    let mut stack: Vec<(&TraceNode, usize)> = forest.iter().map(|node| (node, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        summary.node_count += 1;
        summary.max_depth = summary.max_depth.max(depth);
        summary.artifacts += node.artifacts.len();
        match node.status() {
            TraceStatus::Running => summary.running += 1,
            TraceStatus::Error => summary.errors += 1,
            _ => {}
        }
        match node.trace_type() {
            TraceType::ToolCall => summary.tool_calls += 1,
            TraceType::ModelCall => summary.model_calls += 1,
            _ => {}
        }
        stack.extend(node.children.iter().map(|child| (child, depth + 1)));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::workflow::tree::build_tree;
    use shared_types::{Artifact, TraceRecord};

    fn record(id: &str, parent: Option<&str>, trace_type: TraceType, second: u32) -> TraceRecord {
        TraceRecord {
            parent_trace_id: parent.map(ToString::to_string),
            start_time: Some(format!("2026-02-20T10:00:{second:02}Z")),
            status: TraceStatus::Success,
            ..TraceRecord::new(id, trace_type)
        }
    }

    fn chart(id: &str, trace_id: &str) -> Artifact {
        Artifact {
            artifact_id: id.to_string(),
            trace_id: Some(trace_id.to_string()),
            artifact_type: "chart".to_string(),
            ..Artifact::default()
        }
    }

    fn sample_forest() -> Vec<TraceNode> {
        let mut failing = record("tool-2", Some("agent"), TraceType::ToolCall, 5);
        failing.status = TraceStatus::Error;
        failing.error = Some("exchange timeout".to_string());
        let mut pending = record("model-2", Some("agent"), TraceType::ModelCall, 6);
        pending.status = TraceStatus::Running;

        let records = vec![
            record("run", None, TraceType::Workflow, 0),
            record("agent", Some("run"), TraceType::Agent, 1),
            record("model-1", Some("agent"), TraceType::ModelCall, 2),
            record("tool-1", Some("model-1"), TraceType::ToolCall, 3),
            failing,
            pending,
            record("side", None, TraceType::ToolCall, 9),
        ];
        let artifacts = vec![chart("a-1", "tool-1"), chart("a-2", "agent"), chart("a-3", "side")];
        build_tree(&records, &artifacts)
    }

    #[test]
    fn test_counts_include_self_and_descendants() {
        let forest = sample_forest();
        let run = &forest[0];
        let agent = &run.children[0];
        let tool = &agent.children[0].children[0];

        assert_eq!(tool_call_count(run), 2);
        assert_eq!(model_call_count(run), 2);
        assert_eq!(artifact_count(run), 2);
        assert_eq!(tool_call_count(tool), 1);
        assert_eq!(model_call_count(tool), 0);
        assert_eq!(artifact_count(agent), 2);
        assert_eq!(tool_call_count(&forest[1]), 1);
    }

    #[test]
    fn test_memoized_pass_matches_direct_counts() {
        let forest = sample_forest();
        let memo = aggregate_forest(&forest);

        assert_eq!(memo.len(), 7);
        for node in forest.iter().flat_map(|root| root.descendants()) {
            let totals = memo[node.trace_id()];
            assert_eq!(totals.tool_calls, tool_call_count(node), "{}", node.trace_id());
            assert_eq!(totals.model_calls, model_call_count(node), "{}", node.trace_id());
            assert_eq!(totals.artifacts, artifact_count(node), "{}", node.trace_id());
        }
    }

    #[test]
    fn test_forest_summary() {
        let summary = summarize_forest(&sample_forest());
        assert_eq!(
            summary,
            ForestSummary {
                node_count: 7,
                root_count: 2,
                max_depth: 4,
                running: 1,
                errors: 1,
                tool_calls: 3,
                model_calls: 2,
                artifacts: 3,
            }
        );
        assert_eq!(summarize_forest(&[]), ForestSummary::default());
    }
}
