//! Core comparator workflow: form state, controller and front-end commands

/// Line commands that drive the controller from a terminal.
pub mod command;
/// The comparator form controller and its submission workflow.
pub mod controller;
/// Editable form state with the compare-list invariants.
pub mod form;
/// User-visible notifications produced by the controller.
pub mod notify;
