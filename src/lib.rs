//! kubenav library
//!
//! Core functionality for the kubenav CLI: the navigation state machine,
//! the picker and lister seams, the operation registry, and the background
//! session registry. The binary is a thin wrapper; tests drive everything
//! through this crate.

pub mod cli;
pub mod config;
pub mod kube;
pub mod models;
pub mod nav;
pub mod ops;
pub mod picker;
pub mod sessions;

// Re-export commonly used types for convenience
pub use models::{KIND_REGISTRY, KindEntry, find_kind, kind_names};
pub use nav::{ActionDispatcher, NavLevel, NavState, Navigator, OpDispatcher};
pub use picker::{PickRequest, PickResult, Picker, PickerError};
