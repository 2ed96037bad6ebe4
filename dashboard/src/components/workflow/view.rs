use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use shared_types::{Artifact, RunSummary, TraceStatus, TraceType};

use crate::api::{fetch_run_timeline, fetch_workflow_runs, workflow_artifact_url};
use crate::settings::load_settings;

use super::aggregates::{artifact_count, model_call_count, tool_call_count};
use super::parsers::{payload_entries, payload_str, pretty_json};
use super::state::WorkflowViewState;
use super::styles::WORKFLOW_VIEW_STYLES;
use super::timeline::{display_name, find_node, flatten_timeline};
use super::types::{
    TimelineRow, TraceNode, TreeDiagnostics, WORKFLOW_INDENT_PX, WORKFLOW_SLOW_DURATION_MS,
};

// ── Formatting helpers ───────────────────────────────────────────────────────

pub fn format_relative_time(timestamp: &str) -> String {
    let Some(dt) = shared_types::parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };
    let now = js_sys::Date::now() as i64;
    let diff_secs = ((now - dt.timestamp_millis()) / 1000).max(0);
    match diff_secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", diff_secs / 60),
        3600..=86399 => format!("{}h ago", diff_secs / 3600),
        _ => format!("{}d ago", diff_secs / 86400),
    }
}

pub fn format_duration_short(ms: i64) -> String {
    if ms < 0 {
        return format!("-{}", format_duration_short(ms.saturating_neg()));
    }
    if ms >= 60_000 {
        format!("{}m {:02}s", ms / 60_000, (ms % 60_000) / 1_000)
    } else if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{ms}ms")
    }
}

fn status_class(status: TraceStatus) -> &'static str {
    match status {
        TraceStatus::Running => "wf-status wf-status--running",
        TraceStatus::Success => "wf-status wf-status--success",
        TraceStatus::Error => "wf-status wf-status--error",
        TraceStatus::Unknown => "wf-status",
    }
}

fn bar_class(status: TraceStatus) -> &'static str {
    match status {
        TraceStatus::Running => "wf-bar wf-bar--running",
        TraceStatus::Success => "wf-bar wf-bar--success",
        TraceStatus::Error => "wf-bar wf-bar--error",
        TraceStatus::Unknown => "wf-bar",
    }
}

fn type_badge(trace_type: TraceType) -> &'static str {
    match trace_type {
        TraceType::Workflow => "WF",
        TraceType::Node => "ND",
        TraceType::Agent => "AG",
        TraceType::ModelCall => "LLM",
        TraceType::ToolCall => "TL",
        TraceType::Artifact => "ART",
        TraceType::Unknown => "?",
    }
}

fn report_tree_diagnostics(run_id: &str, diagnostics: &TreeDiagnostics) {
    if diagnostics.is_clean() {
        return;
    }
    if !diagnostics.duplicate_ids.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: dropped duplicate trace ids {:?}",
            diagnostics.duplicate_ids
        );
    }
    if !diagnostics.dangling_parents.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: promoted traces with unknown parents to roots {:?}",
            diagnostics.dangling_parents
        );
    }
    if !diagnostics.broken_cycles.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: broke cyclic parent links at {:?}",
            diagnostics.broken_cycles
        );
    }
    if !diagnostics.orphan_artifacts.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: dropped artifacts with no owning trace {:?}",
            diagnostics.orphan_artifacts
        );
    }
    if !diagnostics.duplicate_artifacts.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: ignored repeated artifact ids {:?}",
            diagnostics.duplicate_artifacts
        );
    }
    if !diagnostics.inverted_durations.is_empty() {
        dioxus_logger::tracing::warn!(
            "run {run_id}: traces ending before they start {:?}",
            diagnostics.inverted_durations
        );
    }
    if !diagnostics.unparseable_starts.is_empty() {
        dioxus_logger::tracing::debug!(
            "run {run_id}: traces without a usable start_time {:?}",
            diagnostics.unparseable_starts
        );
    }
}

async fn load_selected_timeline(mut state: Signal<WorkflowViewState>) {
    let Some(run_id) = state.read().selected_run_id.clone() else {
        return;
    };
    let auto_expand = load_settings().auto_expand;
    match fetch_run_timeline(&run_id).await {
        Ok(timeline) => {
            if let Some(diagnostics) = state.write().apply_timeline(timeline, auto_expand) {
                report_tree_diagnostics(&run_id, &diagnostics);
            }
        }
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to load timeline for {run_id}: {e}");
            if state.read().selected_run_id.as_deref() == Some(run_id.as_str()) {
                state.write().apply_error(e);
            }
        }
    }
}

async fn refresh_runs(mut state: Signal<WorkflowViewState>) {
    let limit = load_settings().run_list_limit;
    match fetch_workflow_runs(limit).await {
        Ok(runs) => state.write().apply_runs(runs),
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to fetch workflow runs: {e}");
            state.write().apply_runs_error(e);
        }
    }
}

// ── WorkflowView component ───────────────────────────────────────────────────

#[component]
pub fn WorkflowView() -> Element {
    let mut state = use_signal(WorkflowViewState::default);
    let mut poll_started = use_signal(|| false);
    let poll_alive = use_hook(|| Rc::new(Cell::new(true)));

    {
        let poll_alive = poll_alive.clone();
        use_drop(move || poll_alive.set(false));
    }

    {
        let poll_alive = poll_alive.clone();
        use_effect(move || {
            if poll_started() {
                return;
            }
            poll_started.set(true);

            let poll_alive = poll_alive.clone();
            spawn(async move {
                while poll_alive.get() {
                    refresh_runs(state).await;
                    load_selected_timeline(state).await;
                    let interval = load_settings().poll_interval_ms;
                    TimeoutFuture::new(interval).await;
                }
            });
        });
    }

    let snapshot = state.read();
    let rows = flatten_timeline(&snapshot.forest, &snapshot.expanded);
    let selected_node = snapshot
        .selected_trace_id
        .as_deref()
        .and_then(|trace_id| find_node(&snapshot.forest, trace_id))
        .cloned();
    let runs = snapshot.runs.clone();
    let selected_run_id = snapshot.selected_run_id.clone();
    let summary = snapshot.summary.clone();
    let run_status = snapshot.timeline.as_ref().map(|timeline| timeline.status);
    let run_symbols = snapshot
        .timeline
        .as_ref()
        .map(|timeline| timeline.symbols.join(", "))
        .unwrap_or_default();
    let run_duration = snapshot.timeline.as_ref().and_then(|timeline| timeline.duration_ms);
    let loading = snapshot.loading;
    let error = snapshot.error.clone();
    let runs_error = snapshot.runs_error.clone();
    let selected_trace_id = snapshot.selected_trace_id.clone();
    drop(snapshot);
    let has_rows = !rows.is_empty();

    rsx! {
        style { {WORKFLOW_VIEW_STYLES} }
        div { class: "wf-container",
            RunList {
                runs,
                error: runs_error,
                selected_run_id: selected_run_id.clone(),
                on_select: move |run_id: String| {
                    if state.write().select_run(&run_id) {
                        spawn(async move {
                            load_selected_timeline(state).await;
                        });
                    }
                },
            }
            div { class: "wf-main",
                div { class: "wf-header",
                    div {
                        h3 { class: "wf-title",
                            {selected_run_id.clone().unwrap_or_else(|| "No run selected".to_string())}
                        }
                        if !run_symbols.is_empty() {
                            p { class: "wf-subtitle", "{run_symbols}" }
                        }
                    }
                    div { class: "wf-pills",
                        if let Some(status) = run_status {
                            span { class: status_class(status), "{status.as_str()}" }
                        }
                        if let Some(duration) = run_duration {
                            span { class: "wf-pill", {format_duration_short(duration)} }
                        }
                        span { class: "wf-pill", "{summary.node_count} steps" }
                        span { class: "wf-pill", "{summary.model_calls} model calls" }
                        span { class: "wf-pill", "{summary.tool_calls} tool calls" }
                        span { class: "wf-pill", "{summary.artifacts} artifacts" }
                        if summary.errors > 0 {
                            span { class: "wf-pill wf-pill--error", "{summary.errors} failed" }
                        }
                        button {
                            class: "wf-button",
                            onclick: move |_| state.write().expand_everything(),
                            "Expand all"
                        }
                        button {
                            class: "wf-button",
                            onclick: move |_| state.write().collapse_everything(),
                            "Collapse"
                        }
                    }
                }
                if let Some(message) = error {
                    div { class: "wf-error", "{message}" }
                }
                if loading && !has_rows {
                    div { class: "wf-empty", "Loading timeline…" }
                } else if !has_rows {
                    div { class: "wf-empty", "No traces recorded for this run yet." }
                }
                div { class: "wf-timeline",
                    {rows.into_iter().map(|row| {
                        let key = row.trace_id.clone();
                        let selected = selected_trace_id.as_deref() == Some(key.as_str());
                        rsx! {
                            TimelineRowView {
                                key: "{key}",
                                selected,
                                row,
                                on_toggle: move |trace_id: String| state.write().toggle_expanded(&trace_id),
                                on_select: move |trace_id: String| state.write().select_trace(&trace_id),
                            }
                        }
                    })}
                }
            }
            if let Some(node) = selected_node {
                NodeDetail {
                    node,
                    on_close: move |_| state.write().selected_trace_id = None,
                }
            }
        }
    }
}

// ── Run list ─────────────────────────────────────────────────────────────────

#[component]
fn RunList(
    runs: Vec<RunSummary>,
    error: Option<String>,
    selected_run_id: Option<String>,
    on_select: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "wf-sidebar",
            h4 { class: "wf-sidebar-title", "Runs" }
            if let Some(message) = error {
                div { class: "wf-error wf-error--compact", "{message}" }
            }
            if runs.is_empty() {
                p { class: "wf-muted", "No workflow runs yet." }
            }
            for run in &runs {
                button {
                    key: "{run.run_id}",
                    class: if selected_run_id.as_deref() == Some(run.run_id.as_str()) {
                        "wf-run wf-run--active"
                    } else {
                        "wf-run"
                    },
                    onclick: {
                        let run_id = run.run_id.clone();
                        move |_| on_select.call(run_id.clone())
                    },
                    div { class: "wf-run-head",
                        span { class: status_class(run.status) }
                        span { class: "wf-run-id", title: "{run.run_id}", "{run.run_id}" }
                    }
                    div { class: "wf-run-meta",
                        if let Some(started) = run.start_time.as_deref() {
                            span { {format_relative_time(started)} }
                        }
                        if !run.symbols.is_empty() {
                            span { {run.symbols.join(", ")} }
                        }
                    }
                    div { class: "wf-run-meta",
                        span { "{run.model_call_count} llm" }
                        span { "{run.tool_call_count} tools" }
                        if run.artifact_count > 0 {
                            span { "{run.artifact_count} charts" }
                        }
                    }
                }
            }
        }
    }
}

// ── Timeline row ─────────────────────────────────────────────────────────────

#[component]
fn TimelineRowView(
    row: TimelineRow,
    selected: bool,
    on_toggle: EventHandler<String>,
    on_select: EventHandler<String>,
) -> Element {
    let indent = row.depth * WORKFLOW_INDENT_PX;
    let row_class = if selected { "wf-row wf-row--selected" } else { "wf-row" };
    let caret = match (row.has_children, row.expanded) {
        (false, _) => " ",
        (true, true) => "▾",
        (true, false) => "▸",
    };
    let duration_label = row.duration_ms.map(format_duration_short).unwrap_or_else(|| {
        if row.status == TraceStatus::Running {
            "running".to_string()
        } else {
            "–".to_string()
        }
    });
    let slow = row.duration_ms.unwrap_or_default() > WORKFLOW_SLOW_DURATION_MS;
    let bar_style = format!(
        "left: {:.2}%; width: {:.2}%;",
        row.offset_pct, row.width_pct
    );
    let toggle_id = row.trace_id.clone();
    let select_id = row.trace_id.clone();

    rsx! {
        div {
            class: "{row_class}",
            onclick: move |_| on_select.call(select_id.clone()),
            div { class: "wf-row-label", style: "padding-left: {indent}px;",
                button {
                    class: "wf-caret",
                    disabled: !row.has_children,
                    onclick: move |evt| {
                        evt.stop_propagation();
                        on_toggle.call(toggle_id.clone());
                    },
                    "{caret}"
                }
                span { class: "wf-type", {type_badge(row.trace_type)} }
                span { class: "wf-name", "{row.name}" }
                if let Some(symbol) = row.symbol.as_deref() {
                    span { class: "wf-symbol", "{symbol}" }
                }
                if row.artifact_count > 0 {
                    span { class: "wf-symbol", "📈 {row.artifact_count}" }
                }
            }
            div { class: "wf-row-track",
                div {
                    class: bar_class(row.status),
                    style: "{bar_style}",
                }
            }
            span {
                class: if slow { "wf-duration wf-duration--slow" } else { "wf-duration" },
                "{duration_label}"
            }
        }
    }
}

// ── Node detail ──────────────────────────────────────────────────────────────

#[component]
fn NodeDetail(node: TraceNode, on_close: EventHandler<()>) -> Element {
    let title = display_name(&node);
    let status = node.status();
    let tool_calls = tool_call_count(&node);
    let model_calls = model_call_count(&node);
    let artifacts_total = artifact_count(&node);
    let duration = node
        .duration_ms
        .map(format_duration_short)
        .unwrap_or_else(|| "–".to_string());
    let started = node.record.start_time.clone().unwrap_or_default();
    let ended = node.record.end_time.clone().unwrap_or_default();
    let entries = payload_entries(&node.record.payload);
    let payload_raw = pretty_json(&serde_json::Value::Object(node.record.payload.clone()));

    rsx! {
        aside { class: "wf-detail",
            div { class: "wf-detail-head",
                h4 { "{title}" }
                button { class: "wf-button", onclick: move |_| on_close.call(()), "Close" }
            }
            div { class: "wf-pills",
                span { class: status_class(status), "{status.as_str()}" }
                span { class: "wf-pill", "{node.trace_type().as_str()}" }
                span { class: "wf-pill", "{duration}" }
            }
            if let Some(error) = node.record.error.as_deref() {
                pre { class: "wf-error", "{error}" }
            }
            dl { class: "wf-facts",
                dt { "Trace" }
                dd { "{node.trace_id()}" }
                if let Some(model) = payload_str(&node.record.payload, "model") {
                    dt { "Model" }
                    dd { "{model}" }
                }
                if let Some(symbol) = node.record.symbol.as_deref() {
                    dt { "Symbol" }
                    dd { "{symbol}" }
                }
                dt { "Started" }
                dd { "{started}" }
                dt { "Ended" }
                dd { "{ended}" }
                dt { "Subtree" }
                dd { "{model_calls} model · {tool_calls} tool · {artifacts_total} artifacts" }
            }
            if !node.artifacts.is_empty() {
                h5 { "Artifacts" }
                div { class: "wf-artifacts",
                    for artifact in node.artifacts.iter().cloned() {
                        ArtifactThumb { key: "{artifact.artifact_id}", artifact }
                    }
                }
            }
            if !entries.is_empty() {
                h5 { "Payload" }
                dl { class: "wf-facts",
                    for (key, value) in entries {
                        div { key: "{key}", class: "wf-fact",
                            dt { "{key}" }
                            dd { "{value}" }
                        }
                    }
                }
                details { class: "wf-raw",
                    summary { "Raw payload" }
                    pre { "{payload_raw}" }
                }
            }
        }
    }
}

#[component]
fn ArtifactThumb(artifact: Artifact) -> Element {
    let url = workflow_artifact_url(&artifact.artifact_id);
    let caption = [
        artifact.symbol.clone(),
        artifact.interval.clone(),
        Some(artifact.artifact_type.clone()).filter(|t| !t.is_empty()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ");

    rsx! {
        figure { class: "wf-artifact",
            if artifact.is_image() {
                a { href: "{url}", target: "_blank",
                    img { src: "{url}", alt: "{caption}", loading: "lazy" }
                }
            } else {
                a { href: "{url}", target: "_blank", "{artifact.artifact_id}" }
            }
            figcaption { "{caption}" }
        }
    }
}
