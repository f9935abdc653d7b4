//! Model layer
//!
//! Rust types describing the resource kinds the navigator can browse.

pub mod kind;

pub use kind::{KIND_REGISTRY, KindEntry, find_kind, kind_names};
