use dioxus::prelude::*;

use crate::settings::{
    clear_settings, load_settings, persist_settings, DashboardSettings, MAX_RUN_LIST_LIMIT,
};

/// Whole seconds typed into the poll field, as milliseconds.
pub fn parse_poll_seconds(raw: &str) -> Option<u32> {
    let seconds = raw.trim().parse::<u32>().ok()?;
    Some(seconds.saturating_mul(1_000))
}

pub fn parse_run_limit(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|limit| *limit > 0)
}

#[component]
pub fn SettingsView() -> Element {
    let mut draft = use_signal(load_settings);
    let mut status = use_signal(|| None::<String>);

    let current = draft();
    let poll_seconds = current.poll_interval_ms / 1_000;
    let api_base = current.api_base_override.clone().unwrap_or_default();

    rsx! {
        div { class: "settings-form",
            h3 { style: "margin: 0;", "Settings" }
            label {
                "API base URL (blank to auto-detect)"
                input {
                    r#type: "text",
                    placeholder: "http://localhost:8080",
                    value: "{api_base}",
                    oninput: move |e: FormEvent| {
                        let value = e.value();
                        draft.write().api_base_override = Some(value);
                    },
                }
            }
            label {
                "Poll interval (seconds)"
                input {
                    r#type: "number",
                    min: "1",
                    value: "{poll_seconds}",
                    oninput: move |e: FormEvent| {
                        if let Some(ms) = parse_poll_seconds(&e.value()) {
                            draft.write().poll_interval_ms = ms;
                        }
                    },
                }
            }
            label {
                "Runs to list (max {MAX_RUN_LIST_LIMIT})"
                input {
                    r#type: "number",
                    min: "1",
                    value: "{current.run_list_limit}",
                    oninput: move |e: FormEvent| {
                        if let Some(limit) = parse_run_limit(&e.value()) {
                            draft.write().run_list_limit = limit;
                        }
                    },
                }
            }
            label { style: "flex-direction: row; align-items: center;",
                input {
                    r#type: "checkbox",
                    checked: current.auto_expand,
                    onchange: move |e: FormEvent| draft.write().auto_expand = e.checked(),
                }
                "Expand every step when a run opens"
            }
            div { class: "settings-actions",
                button {
                    class: "wf-button",
                    onclick: move |_| {
                        let normalized = draft().normalized();
                        match persist_settings(&normalized) {
                            Ok(()) => {
                                draft.set(normalized);
                                status.set(Some("Saved".to_string()));
                            }
                            Err(e) => {
                                dioxus_logger::tracing::error!("Failed to save settings: {e}");
                                status.set(Some(e));
                            }
                        }
                    },
                    "Save"
                }
                button {
                    class: "wf-button",
                    onclick: move |_| {
                        if let Err(e) = clear_settings() {
                            dioxus_logger::tracing::warn!("Failed to clear settings: {e}");
                        }
                        draft.set(DashboardSettings::default());
                        status.set(Some("Restored defaults".to_string()));
                    },
                    "Reset"
                }
                if let Some(message) = status() {
                    span { class: "settings-status", "{message}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_seconds_input() {
        assert_eq!(parse_poll_seconds(" 15 "), Some(15_000));
        assert_eq!(parse_poll_seconds("0"), Some(0));
        assert_eq!(parse_poll_seconds("-3"), None);
        assert_eq!(parse_poll_seconds("fast"), None);
        assert_eq!(parse_poll_seconds(&u32::MAX.to_string()), Some(u32::MAX));
    }

    #[test]
    fn test_run_limit_input_rejects_zero() {
        assert_eq!(parse_run_limit("25"), Some(25));
        assert_eq!(parse_run_limit("0"), None);
        assert_eq!(parse_run_limit(""), None);
    }
}
