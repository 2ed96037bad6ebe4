use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use dashboard::components::styles::DASHBOARD_STYLES;
use dashboard::{SettingsView, WorkflowView};

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Workflow,
    Settings,
}

#[component]
fn App() -> Element {
    let mut tab = use_signal(|| Tab::Workflow);
    let tab_class = move |which: Tab| {
        if tab() == which {
            "dash-tab dash-tab--active"
        } else {
            "dash-tab"
        }
    };

    rsx! {
        style { {DASHBOARD_STYLES} }
        div { class: "dash-shell",
            nav { class: "dash-nav",
                span { class: "dash-nav-title", "Workflow Traces" }
                button {
                    class: tab_class(Tab::Workflow),
                    onclick: move |_| tab.set(Tab::Workflow),
                    "Runs"
                }
                button {
                    class: tab_class(Tab::Settings),
                    onclick: move |_| tab.set(Tab::Settings),
                    "Settings"
                }
            }
            div { class: "dash-body",
                match tab() {
                    Tab::Workflow => rsx! { WorkflowView {} },
                    Tab::Settings => rsx! { SettingsView {} },
                }
            }
        }
    }
}
