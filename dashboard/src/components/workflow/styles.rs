pub const WORKFLOW_VIEW_STYLES: &str = r#"
.wf-container {
    display: flex;
    height: 100%;
    overflow: hidden;
}

.wf-sidebar {
    width: 250px;
    flex-shrink: 0;
    overflow-y: auto;
    border-right: 1px solid var(--border-color, #334155);
    background: #0b1222;
    padding: 0.6rem;
    display: flex;
    flex-direction: column;
    gap: 0.35rem;
}

.wf-sidebar-title {
    margin: 0 0 0.3rem 0;
    color: var(--text-primary, #f8fafc);
}

.wf-run {
    text-align: left;
    border: 1px solid var(--border-color, #1f2a44);
    border-radius: 0.45rem;
    background: var(--bg-primary, #0f172a);
    color: var(--text-secondary, #cbd5e1);
    padding: 0.4rem 0.5rem;
    cursor: pointer;
}

.wf-run--active {
    border-color: #60a5fa;
    background: color-mix(in srgb, var(--bg-primary, #0f172a) 70%, #1d4ed8 30%);
}

.wf-run-head {
    display: flex;
    align-items: center;
    gap: 0.35rem;
}

.wf-run-id {
    font-family: ui-monospace, monospace;
    font-size: 0.74rem;
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
}

.wf-run-meta {
    display: flex;
    gap: 0.5rem;
    font-size: 0.66rem;
    color: var(--text-secondary, #94a3b8);
    margin-top: 0.15rem;
}

.wf-main {
    flex: 1;
    min-width: 0;
    display: flex;
    flex-direction: column;
    overflow: hidden;
}

.wf-header {
    display: flex;
    justify-content: space-between;
    align-items: flex-start;
    gap: 0.6rem;
    padding: 0.7rem 0.9rem;
    border-bottom: 1px solid var(--border-color, #334155);
}

.wf-title {
    margin: 0;
    font-size: 0.95rem;
    font-family: ui-monospace, monospace;
}

.wf-subtitle {
    margin: 0.15rem 0 0 0;
    font-size: 0.75rem;
    color: var(--text-secondary, #9ca3af);
}

.wf-pills {
    display: flex;
    flex-wrap: wrap;
    justify-content: flex-end;
    align-items: center;
    gap: 0.35rem;
}

.wf-pill {
    border: 1px solid var(--border-color, #334155);
    background: var(--bg-primary, #0f172a);
    color: var(--text-secondary, #cbd5e1);
    border-radius: 999px;
    font-size: 0.68rem;
    padding: 0.2rem 0.45rem;
    white-space: nowrap;
}

.wf-pill--error {
    border-color: #ef4444;
    color: #fecaca;
}

.wf-status {
    display: inline-block;
    min-width: 0.55rem;
    min-height: 0.55rem;
    border-radius: 999px;
    background: #94a3b8;
    font-size: 0.66rem;
    padding: 0 0.35rem;
    color: #0f172a;
}

.wf-status--running { background: #f59e0b; }
.wf-status--success { background: #22c55e; }
.wf-status--error { background: #ef4444; color: #fff; }

.wf-timeline {
    flex: 1;
    overflow-y: auto;
    padding: 0.35rem 0;
}

.wf-row {
    display: grid;
    grid-template-columns: minmax(260px, 38%) 1fr 72px;
    align-items: center;
    gap: 0.5rem;
    padding: 0.18rem 0.9rem;
    cursor: pointer;
    font-size: 0.76rem;
}

.wf-row:hover {
    background: color-mix(in srgb, var(--bg-primary, #0f172a) 80%, #334155 20%);
}

.wf-row--selected {
    background: color-mix(in srgb, var(--bg-primary, #0f172a) 70%, #1d4ed8 30%);
}

.wf-row-label {
    display: flex;
    align-items: center;
    gap: 0.3rem;
    min-width: 0;
}

.wf-caret {
    width: 1.1rem;
    border: none;
    background: transparent;
    color: var(--text-secondary, #94a3b8);
    cursor: pointer;
    padding: 0;
}

.wf-type {
    font-size: 0.6rem;
    font-weight: 700;
    color: #93c5fd;
    min-width: 1.9rem;
}

.wf-name {
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
    color: var(--text-primary, #f8fafc);
}

.wf-symbol {
    font-size: 0.64rem;
    color: #fcd34d;
    white-space: nowrap;
}

.wf-row-track {
    position: relative;
    height: 0.7rem;
    border-radius: 0.2rem;
    background: color-mix(in srgb, var(--bg-primary, #0f172a) 85%, #334155 15%);
}

.wf-bar {
    position: absolute;
    top: 0;
    bottom: 0;
    border-radius: 0.2rem;
    background: #64748b;
}

.wf-bar--running {
    background: repeating-linear-gradient(45deg, #f59e0b, #f59e0b 4px, #b45309 4px, #b45309 8px);
}
.wf-bar--success { background: #22c55e; }
.wf-bar--error { background: #ef4444; }

.wf-duration {
    text-align: right;
    font-family: ui-monospace, monospace;
    color: var(--text-secondary, #94a3b8);
}

.wf-duration--slow {
    color: #fbbf24;
    font-weight: 700;
}

.wf-detail {
    width: 340px;
    flex-shrink: 0;
    overflow-y: auto;
    border-left: 1px solid var(--border-color, #334155);
    padding: 0.7rem;
    font-size: 0.76rem;
}

.wf-detail-head {
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.wf-detail-head h4 {
    margin: 0;
}

.wf-facts {
    display: grid;
    grid-template-columns: max-content 1fr;
    gap: 0.2rem 0.6rem;
    margin: 0.6rem 0;
}

.wf-fact {
    display: contents;
}

.wf-facts dt {
    color: var(--text-secondary, #94a3b8);
}

.wf-facts dd {
    margin: 0;
    word-break: break-word;
    font-family: ui-monospace, monospace;
}

.wf-artifacts {
    display: grid;
    grid-template-columns: repeat(2, 1fr);
    gap: 0.4rem;
}

.wf-artifact {
    margin: 0;
}

.wf-artifact img {
    width: 100%;
    border-radius: 0.3rem;
    border: 1px solid var(--border-color, #334155);
}

.wf-artifact figcaption {
    font-size: 0.64rem;
    color: var(--text-secondary, #94a3b8);
}

.wf-raw pre {
    max-height: 280px;
    overflow: auto;
}

.wf-error {
    margin: 0.5rem 0.9rem;
    padding: 0.45rem 0.6rem;
    border: 1px solid #ef4444;
    border-radius: 0.4rem;
    background: color-mix(in srgb, #7f1d1d 40%, transparent);
    color: #fecaca;
    white-space: pre-wrap;
}

.wf-error--compact {
    margin: 0 0 0.3rem 0;
    font-size: 0.7rem;
}

.wf-empty,
.wf-muted {
    color: var(--text-secondary, #94a3b8);
    font-size: 0.78rem;
    padding: 0.8rem 0.9rem;
}
"#;
