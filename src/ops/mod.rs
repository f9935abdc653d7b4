//! Resource operations
//!
//! Extensible system for side-effecting operations on cluster resources.
//! Operations are trait objects held in a registry; dispatch is a lookup by
//! resource kind plus hotkey (or action-menu label), so adding a kind or an
//! operation is a data change, not a new inheritance branch.

pub mod api;
pub mod kubectl;

use anyhow::Result;
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::models::KindEntry;
use crate::picker::Picker;

pub use api::{DeleteOperation, RolloutRestartOperation, ScaleOperation};
pub use kubectl::{
    DescribeOperation, EditOperation, ExecOperation, FollowLogsOperation, LogsOperation,
    PortForwardOperation, RolloutUndoOperation,
};

/// The object an operation acts on
#[derive(Debug, Clone)]
pub struct OpTarget {
    pub kind: &'static KindEntry,
    pub namespace: String,
    pub name: String,
}

impl OpTarget {
    /// "kind name in namespace" phrasing used in messages
    pub fn describe(&self) -> String {
        format!(
            "{} {} in {}",
            self.kind.display_name, self.name, self.namespace
        )
    }
}

/// What an operation produced
pub enum OpOutcome {
    /// Side effect finished (or was refused); nothing to track
    Done,
    /// A detached background process for the session registry to own
    Spawned {
        descriptor: String,
        log_path: PathBuf,
        child: tokio::process::Child,
    },
}

/// Line-oriented user input for operations that need a parameter
/// (replica count, port pair)
pub trait UserInput {
    /// Prompt and read one line; `None` means empty input or closed stdin
    fn line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads from the process stdin
pub struct StdinInput;

impl UserInput for StdinInput {
    fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        eprint!("{}: ", prompt);
        std::io::stderr().flush()?;
        let mut buf = String::new();
        let read = std::io::stdin().lock().read_line(&mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Execution context handed to operations
pub struct OpContext<'a> {
    pub client: &'a kube::Client,
    pub config: &'a Config,
    pub picker: &'a mut dyn Picker,
    pub input: &'a mut dyn UserInput,
}

/// Trait for operations on a selected resource
#[async_trait(?Send)]
pub trait ResourceOperation {
    /// Execute the operation on the given target
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome>;

    /// Picker hotkey bound to this operation ("alt-x", ...)
    fn hotkey(&self) -> &'static str;

    /// Human-readable name, also the action-menu label
    fn label(&self) -> &'static str;

    /// Whether this operation requires user confirmation
    fn requires_confirmation(&self) -> bool;

    /// Confirmation message to show to the user
    fn confirmation_message(&self, target: &OpTarget) -> String;

    /// Whether this operation changes cluster state (blocked in readOnly)
    fn is_mutating(&self) -> bool;

    /// Whether this operation is valid for the given resource kind
    fn is_valid_for(&self, kind: &KindEntry) -> bool;
}

/// Registry of all available operations
pub struct OperationRegistry {
    operations: Vec<Box<dyn ResourceOperation>>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Registry with the standard operations; Describe first so it becomes
    /// the default action-menu entry
    pub fn new() -> Self {
        Self {
            operations: vec![
                Box::new(DescribeOperation),
                Box::new(EditOperation),
                Box::new(DeleteOperation),
                Box::new(LogsOperation),
                Box::new(FollowLogsOperation),
                Box::new(ExecOperation),
                Box::new(PortForwardOperation),
                Box::new(ScaleOperation),
                Box::new(RolloutRestartOperation),
                Box::new(RolloutUndoOperation),
            ],
        }
    }

    /// Find an operation valid for `kind` by hotkey or label
    pub fn find(&self, kind: &KindEntry, key: &str) -> Option<&dyn ResourceOperation> {
        self.operations
            .iter()
            .map(|op| &**op)
            .find(|op| {
                op.is_valid_for(kind)
                    && (op.hotkey() == key || op.label().eq_ignore_ascii_case(key))
            })
    }

    /// Operations valid for a kind, in registry order
    pub fn valid_for(&self, kind: &KindEntry) -> Vec<&dyn ResourceOperation> {
        self.operations
            .iter()
            .map(|op| &**op)
            .filter(|op| op.is_valid_for(kind))
            .collect()
    }

    /// Hotkeys valid for a kind, for the picker's expect list
    pub fn hotkeys_for(&self, kind: &KindEntry) -> Vec<&'static str> {
        self.valid_for(kind).iter().map(|op| op.hotkey()).collect()
    }

    /// Action-menu labels for a kind (default action first)
    pub fn labels_for(&self, kind: &KindEntry) -> Vec<String> {
        self.valid_for(kind)
            .iter()
            .map(|op| op.label().to_string())
            .collect()
    }

    /// Header line naming each hotkey, "Alt-D:Describe | ..." style
    pub fn header_for(&self, kind: &KindEntry) -> String {
        let mut parts: Vec<String> = self
            .valid_for(kind)
            .iter()
            .map(|op| format!("{}:{}", display_hotkey(op.hotkey()), op.label()))
            .collect();
        parts.push("Esc:Back".to_string());
        parts.join(" | ")
    }
}

/// "alt-x" -> "Alt-X" for header display
fn display_hotkey(hotkey: &str) -> String {
    hotkey
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
