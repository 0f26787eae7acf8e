//! Simulation panel state
//!
//! The panel owns three pieces of view state: `status`, `loading` and
//! `outcome`. A run is split into a synchronous prologue (`begin_run`) and
//! epilogue (`finish_run`) so the draw loop can keep redrawing while the
//! request is in flight.

use crate::backend::{CallOutcome, OutcomeSource};
use crate::core::error::Result;

pub const STATUS_IDLE: &str = "Idle";
pub const STATUS_CALLING: &str = "Bot is calling...";
pub const STATUS_FINISHED: &str = "Call Finished";
pub const STATUS_ERROR: &str = "Error connecting to server";

/// Identifies the run a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened when a result was handed to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResolution {
    Finished,
    Failed,
    /// Panel was torn down or a newer run owns it
    Ignored,
}

/// The cold-call simulation panel
#[derive(Debug)]
pub struct SimulationPanel {
    status: String,
    loading: bool,
    outcome: Option<CallOutcome>,
    generation: u64,
    mounted: bool,
}

impl Default for SimulationPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationPanel {
    pub fn new() -> Self {
        Self {
            status: STATUS_IDLE.to_string(),
            loading: false,
            outcome: None,
            generation: 0,
            mounted: true,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn outcome(&self) -> Option<&CallOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The start button is disabled exactly while a run is in flight
    pub fn button_enabled(&self) -> bool {
        !self.loading
    }

    /// Start a run: mark loading, clear the previous outcome, show the calling status
    ///
    /// Returns `None` while a run is already in flight or after teardown.
    pub fn begin_run(&mut self) -> Option<RunTicket> {
        if !self.mounted {
            return None;
        }
        if self.loading {
            tracing::debug!(generation = self.generation, "Start ignored, run in flight");
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.outcome = None;
        self.status = STATUS_CALLING.to_string();

        Some(RunTicket {
            generation: self.generation,
        })
    }

    /// Apply the result of the run identified by `ticket`
    pub fn finish_run(&mut self, ticket: RunTicket, result: Result<CallOutcome>) -> RunResolution {
        if !self.mounted || ticket.generation != self.generation || !self.loading {
            tracing::debug!(
                generation = ticket.generation,
                mounted = self.mounted,
                "Dropping result of a run the panel no longer owns"
            );
            return RunResolution::Ignored;
        }

        let resolution = match result {
            Ok(outcome) => {
                tracing::info!(
                    generation = ticket.generation,
                    qualified = outcome.qualified(),
                    empty = outcome.is_empty(),
                    "Run finished"
                );
                self.outcome = (!outcome.is_empty()).then_some(outcome);
                self.status = STATUS_FINISHED.to_string();
                RunResolution::Finished
            }
            Err(e) => {
                tracing::error!(generation = ticket.generation, error = %e, "Error running simulation");
                self.status = STATUS_ERROR.to_string();
                RunResolution::Failed
            }
        };

        self.loading = false;
        resolution
    }

    /// Perform one complete run against `source`
    pub async fn start_simulation<S: OutcomeSource>(&mut self, source: &S) -> RunResolution {
        let Some(ticket) = self.begin_run() else {
            return RunResolution::Ignored;
        };
        tracing::info!(generation = ticket.generation, endpoint = %source.describe(), "Run started");

        let result = source.run_bot().await;
        self.finish_run(ticket, result)
    }

    /// Tear the panel down. Results arriving afterwards are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DashboardError;
    use serde_json::json;

    fn outcome(qualified: bool) -> CallOutcome {
        CallOutcome::from_value(json!({
            "qualified": qualified,
            "reasoning": "r",
            "next_step": "n"
        }))
    }

    #[test]
    fn test_initial_state() {
        let panel = SimulationPanel::new();
        assert_eq!(panel.status(), "Idle");
        assert!(!panel.is_loading());
        assert!(panel.button_enabled());
        assert!(panel.outcome().is_none());
    }

    #[test]
    fn test_begin_run_enters_loading() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        assert_eq!(ticket.generation(), 1);
        assert_eq!(panel.status(), "Bot is calling...");
        assert!(panel.is_loading());
        assert!(!panel.button_enabled());
    }

    #[test]
    fn test_begin_run_while_loading_is_refused() {
        let mut panel = SimulationPanel::new();
        let first = panel.begin_run().unwrap();
        assert!(panel.begin_run().is_none());

        // The first run still owns the panel
        assert_eq!(panel.finish_run(first, Ok(outcome(true))), RunResolution::Finished);
    }

    #[test]
    fn test_success_stores_outcome() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        let resolution = panel.finish_run(ticket, Ok(outcome(true)));

        assert_eq!(resolution, RunResolution::Finished);
        assert_eq!(panel.status(), "Call Finished");
        assert!(!panel.is_loading());
        assert!(panel.outcome().unwrap().qualified());
    }

    #[test]
    fn test_failure_sets_error_status() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        let resolution = panel.finish_run(
            ticket,
            Err(DashboardError::HttpStatus {
                status: 500,
                body: "boom".into(),
            }),
        );

        assert_eq!(resolution, RunResolution::Failed);
        assert_eq!(panel.status(), "Error connecting to server");
        assert!(!panel.is_loading());
        assert!(panel.outcome().is_none());
    }

    #[test]
    fn test_second_run_clears_previous_outcome() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        panel.finish_run(ticket, Ok(outcome(true)));
        assert!(panel.outcome().is_some());

        let ticket = panel.begin_run().unwrap();
        assert!(panel.outcome().is_none());
        assert_eq!(panel.status(), "Bot is calling...");

        panel.finish_run(ticket, Ok(outcome(false)));
        assert!(!panel.outcome().unwrap().qualified());
    }

    #[test]
    fn test_falsy_json_finishes_without_outcome_block() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        let resolution = panel.finish_run(ticket, Ok(CallOutcome::from_value(json!(null))));

        assert_eq!(resolution, RunResolution::Finished);
        assert_eq!(panel.status(), "Call Finished");
        assert!(!panel.is_loading());
        assert!(panel.outcome().is_none());
    }

    #[test]
    fn test_result_after_unmount_is_ignored() {
        let mut panel = SimulationPanel::new();
        let ticket = panel.begin_run().unwrap();
        panel.unmount();

        assert_eq!(panel.finish_run(ticket, Ok(outcome(true))), RunResolution::Ignored);
        assert!(panel.outcome().is_none());
        assert_eq!(panel.status(), "Bot is calling...");
        assert!(panel.begin_run().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut panel = SimulationPanel::new();
        let stale = panel.begin_run().unwrap();
        panel.finish_run(stale, Ok(outcome(true)));

        let current = panel.begin_run().unwrap();
        assert_eq!(panel.finish_run(stale, Ok(outcome(false))), RunResolution::Ignored);
        assert!(panel.is_loading());

        assert_eq!(panel.finish_run(current, Ok(outcome(false))), RunResolution::Finished);
    }
}
