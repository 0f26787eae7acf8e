//! UI module - terminal panel for triggering and inspecting runs

pub mod display;
pub mod headless;
pub mod state;
pub mod terminal;

pub use display::{OutcomeView, PanelView};
pub use headless::{run_once, HeadlessReport};
pub use state::{RunResolution, RunTicket, SimulationPanel};
pub use terminal::{run_interactive, App, Control};
