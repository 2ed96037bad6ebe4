//! Shared types between the trading backend and the dashboard
//!
//! These are the shapes the workflow endpoints emit:
//! - `GET /workflow/runs` -> [`RunListResponse`]
//! - `GET /workflow/runs/{run_id}/timeline` -> [`RunTimeline`]
//!
//! Serializable with serde for JSON over HTTP. TypeScript bindings are
//! regenerated by the `ts-rs` export tests.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Trace Records
// ============================================================================

/// Kind of work a trace record describes
///
/// Unrecognized values decode as `"unknown"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub enum TraceType {
    Workflow,
    Node,
    Agent,
    ModelCall,
    ToolCall,
    Artifact,
    /// Anything the backend emits that this build does not know yet
    #[default]
    #[serde(other)]
    Unknown,
}

impl TraceType {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceType::Workflow => "workflow",
            TraceType::Node => "node",
            TraceType::Agent => "agent",
            TraceType::ModelCall => "model_call",
            TraceType::ToolCall => "tool_call",
            TraceType::Artifact => "artifact",
            TraceType::Unknown => "unknown",
        }
    }
}

/// Lifecycle state of a trace or run
///
/// Unrecognized values decode as `"unknown"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub enum TraceStatus {
    Running,
    Success,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TraceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceStatus::Running => "running",
            TraceStatus::Success => "success",
            TraceStatus::Error => "error",
            TraceStatus::Unknown => "unknown",
        }
    }
}

/// One unit of work within a workflow run
///
/// Records arrive flat; `parent_trace_id` links them into a tree on the
/// client side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub struct TraceRecord {
    /// Unique within one run
    pub trace_id: String,

    /// `None` for roots
    #[serde(default)]
    pub parent_trace_id: Option<String>,

    #[serde(default)]
    pub run_id: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub trace_type: TraceType,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Trading pair this step concerns (e.g. "BTCUSDT")
    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub start_time: Option<String>,

    /// `None` while the step is still running
    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TraceStatus,

    #[serde(default)]
    pub error: Option<String>,

    /// Opaque step payload (prompt, tool args, decision, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    #[ts(type = "Record<string, unknown>")]
    pub payload: serde_json::Map<String, serde_json::Value>,

    /// Artifacts some backends embed directly on the record
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub artifacts: Vec<Artifact>,
}

impl TraceRecord {
    pub fn new(trace_id: impl Into<String>, trace_type: TraceType) -> Self {
        Self {
            trace_id: trace_id.into(),
            trace_type,
            ..Self::default()
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time.as_deref().and_then(parse_timestamp)
    }

    pub fn is_running(&self) -> bool {
        self.status == TraceStatus::Running || self.end_time.is_none()
    }
}

// ============================================================================
// Artifacts
// ============================================================================

/// Side-product of a trace step, typically a chart image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub struct Artifact {
    pub artifact_id: String,

    /// Owning trace
    #[serde(default)]
    pub trace_id: Option<String>,

    /// Used when `trace_id` does not resolve
    #[serde(default)]
    pub parent_trace_id: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub artifact_type: String,

    #[serde(default)]
    pub symbol: Option<String>,

    /// Chart interval (e.g. "15m")
    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Artifact {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self.artifact_type.as_str(),
            "chart" | "image" | "png" | "chart_image"
        )
    }
}

// ============================================================================
// Runs
// ============================================================================

/// Row of `GET /workflow/runs`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub struct RunSummary {
    pub run_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TraceStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbols: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trace_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_call_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_call_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_count: u32,
}

impl RunSummary {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub struct RunListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub runs: Vec<RunSummary>,
}

/// Body of `GET /workflow/runs/{run_id}/timeline`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../dashboard/src/types/generated.ts")]
pub struct RunTimeline {
    pub run_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TraceStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbols: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traces: Vec<TraceRecord>,
    /// Artifacts listed separately from the records
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<Artifact>,
}

// ============================================================================
// Timestamps
// ============================================================================

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a backend timestamp
///
/// Accepts RFC 3339, a naive `YYYY-MM-DD HH:MM:SS[.fff]` (read as UTC), or
/// epoch milliseconds as a digit string. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis = raw.parse::<i64>().ok()?;
        return Utc.timestamp_millis_opt(millis).single();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_record_deserialization() {
        let json = serde_json::json!({
            "trace_id": "t-1",
            "parent_trace_id": null,
            "type": "tool_call",
            "name": "fetch_klines",
            "symbol": "BTCUSDT",
            "start_time": "2026-02-20T10:00:00Z",
            "end_time": "2026-02-20T10:00:01.250Z",
            "status": "success",
            "payload": {"interval": "15m", "limit": 200}
        });

        let record: TraceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.trace_type, TraceType::ToolCall);
        assert_eq!(record.status, TraceStatus::Success);
        assert_eq!(record.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(record.payload.get("limit"), Some(&serde_json::json!(200)));
        assert!(record.artifacts.is_empty());
        assert!(!record.is_running());
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail() {
        let json = serde_json::json!({
            "trace_id": "t-2",
            "type": "retriever",
            "status": "cancelled"
        });

        let record: TraceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.trace_type, TraceType::Unknown);
        assert_eq!(record.status, TraceStatus::Unknown);
        assert!(record.payload.is_empty());
        assert!(record.is_running());
    }

    #[test]
    fn test_timeline_with_embedded_artifacts() {
        let json = serde_json::json!({
            "run_id": "run-1",
            "status": "running",
            "symbols": ["ETHUSDT"],
            "traces": [{
                "trace_id": "t-1",
                "type": "agent",
                "artifacts": [{"artifact_id": "a-1", "type": "chart", "interval": "1h"}]
            }]
        });

        let timeline: RunTimeline = serde_json::from_value(json).unwrap();
        assert_eq!(timeline.traces.len(), 1);
        assert!(timeline.artifacts.is_empty());
        let artifact = &timeline.traces[0].artifacts[0];
        assert_eq!(artifact.artifact_id, "a-1");
        assert!(artifact.trace_id.is_none());
        assert!(artifact.is_image());
    }

    #[test]
    fn test_run_list_defaults_counts() {
        let json = r#"{"runs":[{"run_id":"run-9","status":"error"}]}"#;
        let list: RunListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.runs[0].status, TraceStatus::Error);
        assert_eq!(list.runs[0].tool_call_count, 0);
        assert!(list.runs[0].symbols.is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2026-02-20T10:00:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2026-02-20T08:00:00+00:00");

        let naive = parse_timestamp("2026-02-20 10:00:00.500").unwrap();
        assert_eq!(naive.timestamp_millis() % 1_000, 500);

        let epoch = parse_timestamp("1771581600000").unwrap();
        assert_eq!(epoch.timestamp_millis(), 1_771_581_600_000);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("10:00").is_none());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let json = serde_json::json!({
            "run_id": "run-7",
            "status": null,
            "symbols": null,
            "artifacts": null,
            "traces": [
                {"trace_id": "ok", "type": "agent"},
                {
                    "trace_id": "t",
                    "type": null,
                    "name": null,
                    "status": null,
                    "payload": null,
                    "artifacts": null
                },
                {
                    "trace_id": "u",
                    "artifacts": [{"artifact_id": "a-1", "type": null}]
                }
            ]
        });

        let timeline: RunTimeline = serde_json::from_value(json).unwrap();
        assert_eq!(timeline.status, TraceStatus::Unknown);
        assert!(timeline.symbols.is_empty());
        assert!(timeline.artifacts.is_empty());
        assert_eq!(timeline.traces.len(), 3);

        let nulled = &timeline.traces[1];
        assert_eq!(nulled.trace_type, TraceType::Unknown);
        assert_eq!(nulled.status, TraceStatus::Unknown);
        assert!(nulled.name.is_empty());
        assert!(nulled.payload.is_empty());
        assert!(nulled.artifacts.is_empty());
        assert!(timeline.traces[2].artifacts[0].artifact_type.is_empty());

        let runs = r#"{"runs":[{"run_id":"r","status":null,"symbols":null,"trace_count":null}]}"#;
        let list: RunListResponse = serde_json::from_str(runs).unwrap();
        assert_eq!(list.runs[0].trace_count, 0);
        assert!(list.runs[0].symbols.is_empty());
        let list: RunListResponse = serde_json::from_str(r#"{"runs":null}"#).unwrap();
        assert!(list.runs.is_empty());
    }

    #[test]
    fn test_ts_bindings_document_unknown_fallback() {
        let cfg = ts_rs::Config::new();
        for (decl, docs) in [
            (TraceType::decl(&cfg), TraceType::docs()),
            (TraceStatus::decl(&cfg), TraceStatus::docs()),
        ] {
            assert!(decl.contains("\"unknown\""), "{decl}");
            assert!(docs.unwrap_or_default().contains("Unrecognized values"));
        }
    }

    #[test]
    fn test_trace_type_round_trip_names() {
        for trace_type in [TraceType::ModelCall, TraceType::ToolCall, TraceType::Workflow] {
            let json = serde_json::to_string(&trace_type).unwrap();
            assert_eq!(json, format!("\"{}\"", trace_type.as_str()));
        }
    }
}
