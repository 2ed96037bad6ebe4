use gloo_net::http::Request;
use serde::Deserialize;
use shared_types::{RunListResponse, RunSummary, RunTimeline};
use std::sync::OnceLock;

use crate::settings::load_settings;

pub const RUN_LIST_MAX_LIMIT: u32 = 200;

/// Detect the API base URL from the current environment
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (API serves static files)
fn detect_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8080".to_string()
    } else {
        "".to_string()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// API base URL; a non-empty override from the dashboard settings wins.
pub fn api_base() -> String {
    let settings = load_settings();
    match settings.api_base_override.as_deref().map(str::trim) {
        Some(base) if !base.is_empty() => base.trim_end_matches('/').to_string(),
        _ => API_BASE_CACHE.get_or_init(detect_api_base).clone(),
    }
}

fn encode_path_segment(raw: &str) -> String {
    js_sys::encode_uri_component(raw)
        .as_string()
        .unwrap_or_else(|| raw.to_string())
}

pub fn describe_error_body(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        return format!("HTTP error: {status}");
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            return format!("HTTP error: {status} ({error})");
        }
        if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
            return format!("HTTP error: {status} ({message})");
        }
    }

    format!("HTTP error: {status} ({body})")
}

async fn describe_http_error(response: gloo_net::http::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    describe_error_body(status, &body)
}

// ── Workflow runs ────────────────────────────────────────────────────────────

/// `/workflow/runs` answers either a bare array or `{ "runs": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RunsPayload {
    Bare(Vec<RunSummary>),
    Wrapped(RunListResponse),
}

pub fn parse_runs_body(body: &str) -> Result<Vec<RunSummary>, String> {
    match serde_json::from_str::<RunsPayload>(body) {
        Ok(RunsPayload::Bare(runs)) => Ok(runs),
        Ok(RunsPayload::Wrapped(list)) => Ok(list.runs),
        Err(e) => Err(format!("Failed to parse JSON: {e}")),
    }
}

pub fn runs_path(limit: u32) -> String {
    format!("/workflow/runs?limit={}", limit.clamp(1, RUN_LIST_MAX_LIMIT))
}

pub async fn fetch_workflow_runs(limit: u32) -> Result<Vec<RunSummary>, String> {
    let url = format!("{}{}", api_base(), runs_path(limit));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;
    if !response.ok() {
        return Err(describe_http_error(response).await);
    }
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {e}"))?;
    parse_runs_body(&body)
}

pub async fn fetch_run_timeline(run_id: &str) -> Result<RunTimeline, String> {
    let url = format!(
        "{}/workflow/runs/{}/timeline",
        api_base(),
        encode_path_segment(run_id)
    );

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;
    if !response.ok() {
        return Err(describe_http_error(response).await);
    }
    response
        .json::<RunTimeline>()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))
}

/// Artifact blobs are binary images; the browser fetches them via `<img src>`.
pub fn workflow_artifact_url(artifact_id: &str) -> String {
    format!(
        "{}/workflow/artifacts/{}",
        api_base(),
        encode_path_segment(artifact_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runs_body_accepts_both_shapes() {
        let bare = r#"[{"run_id":"run-1","status":"success","trace_count":4}]"#;
        let runs = parse_runs_body(bare).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].trace_count, 4);

        let wrapped = r#"{"runs":[{"run_id":"run-2"},{"run_id":"run-3"}]}"#;
        let runs = parse_runs_body(wrapped).unwrap();
        let ids: Vec<&str> = runs.iter().map(|run| run.run_id.as_str()).collect();
        assert_eq!(ids, vec!["run-2", "run-3"]);

        assert!(parse_runs_body("<html>").is_err());
    }

    #[test]
    fn test_runs_path_clamps_limit() {
        assert_eq!(runs_path(0), "/workflow/runs?limit=1");
        assert_eq!(runs_path(25), "/workflow/runs?limit=25");
        assert_eq!(runs_path(5_000), "/workflow/runs?limit=200");
    }

    #[test]
    fn test_describe_error_body() {
        assert_eq!(describe_error_body(502, "  "), "HTTP error: 502");
        assert_eq!(
            describe_error_body(404, r#"{"error":"run not found"}"#),
            "HTTP error: 404 (run not found)"
        );
        assert_eq!(
            describe_error_body(500, r#"{"message":"db down"}"#),
            "HTTP error: 500 (db down)"
        );
        assert_eq!(describe_error_body(503, "busy"), "HTTP error: 503 (busy)");
    }
}
