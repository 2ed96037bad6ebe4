pub const DASHBOARD_STYLES: &str = r#"
:root {
    --bg-primary: #0f172a;
    --bg-secondary: #111827;
    --border-color: #334155;
    --text-primary: #f8fafc;
    --text-secondary: #94a3b8;
    --accent-bg: #1d4ed8;
}

body {
    margin: 0;
    background: var(--bg-primary);
    color: var(--text-primary);
    font-family: Inter, system-ui, -apple-system, sans-serif;
}

.dash-shell {
    display: flex;
    flex-direction: column;
    height: 100vh;
}

.dash-nav {
    display: flex;
    align-items: center;
    gap: 0.4rem;
    padding: 0.45rem 0.9rem;
    background: var(--bg-secondary);
    border-bottom: 1px solid var(--border-color);
}

.dash-nav-title {
    font-weight: 700;
    margin-right: 0.8rem;
}

.dash-body {
    flex: 1;
    min-height: 0;
}

.wf-button,
.dash-tab {
    background: color-mix(in srgb, var(--bg-primary) 75%, var(--accent-bg) 25%);
    border: 1px solid color-mix(in srgb, var(--border-color) 50%, var(--accent-bg) 50%);
    color: var(--text-primary);
    border-radius: 0.45rem;
    padding: 0.28rem 0.55rem;
    font-size: 0.72rem;
    cursor: pointer;
}

.dash-tab--active {
    border-color: #60a5fa;
    font-weight: 700;
}

.settings-form {
    display: flex;
    flex-direction: column;
    gap: 0.7rem;
    max-width: 460px;
    padding: 1rem;
}

.settings-form label {
    display: flex;
    flex-direction: column;
    gap: 0.25rem;
    font-size: 0.78rem;
    color: var(--text-secondary);
}

.settings-form input[type="text"],
.settings-form input[type="number"] {
    background: var(--bg-secondary);
    border: 1px solid var(--border-color);
    border-radius: 0.35rem;
    color: var(--text-primary);
    padding: 0.35rem 0.5rem;
}

.settings-actions {
    display: flex;
    gap: 0.45rem;
    align-items: center;
}

.settings-status {
    font-size: 0.72rem;
    color: var(--text-secondary);
}
"#;
