//! Orchestration layer.
//!
//! `run_controller` owns the phase sequence and the browser resources;
//! `workspace` owns the recreate-then-delete directory lifecycle. Everything
//! below this layer handles a single order or a single capability.

pub mod run_controller;
pub mod workspace;

pub use run_controller::App;
pub use workspace::Workspace;
