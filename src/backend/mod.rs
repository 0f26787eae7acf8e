//! Bot server access: the run request and its decoded outcome

pub mod client;
pub mod outcome;

pub use client::{BackendClient, OutcomeSource};
pub use outcome::CallOutcome;
