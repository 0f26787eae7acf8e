//! CloudSave Dashboard - trigger simulated cold calls and inspect their outcome

pub mod backend;
pub mod core;
pub mod ui;
