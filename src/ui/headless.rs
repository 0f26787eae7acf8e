//! Headless front end: one run, rendered as text

use crate::backend::OutcomeSource;
use crate::ui::display::PanelView;
use crate::ui::state::{RunResolution, SimulationPanel};

/// What a headless run prints and how it ends
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub resolution: RunResolution,
    pub stdout: String,
    /// Status line for stderr when the run failed
    pub stderr: Option<String>,
}

impl HeadlessReport {
    /// Process should exit non-zero
    pub fn failed(&self) -> bool {
        self.resolution == RunResolution::Failed
    }
}

/// Perform exactly one run against `source`
///
/// With `json_only` stdout carries just the outcome dump, or nothing when
/// the run left no outcome to show.
pub async fn run_once<S: OutcomeSource>(source: &S, json_only: bool) -> HeadlessReport {
    let mut panel = SimulationPanel::new();
    let resolution = panel.start_simulation(source).await;
    let view = PanelView::from_panel(&panel);

    let stdout = if json_only {
        view.outcome
            .as_ref()
            .map(|outcome| format!("{}\n", outcome.json_dump))
            .unwrap_or_default()
    } else {
        view.to_plain_text()
    };

    let stderr = (resolution == RunResolution::Failed).then(|| view.status.clone());

    HeadlessReport {
        resolution,
        stdout,
        stderr,
    }
}
