//! Interactive picker abstraction
//!
//! A picker turns a list of candidate strings into a user choice. The
//! production implementation shells out to `fzf`; tests substitute scripted
//! implementations. The Navigator only sees the `Picker` trait.

mod fzf;

pub use fzf::FzfPicker;

use thiserror::Error;

/// Key name reported for a plain accept
pub const KEY_ENTER: &str = "enter";
/// Key name reported for cancellation (escape, Ctrl-C, empty input)
pub const KEY_ESC: &str = "esc";

/// A single pick interaction
#[derive(Debug, Clone)]
pub struct PickRequest {
    /// Prompt text shown at the input line (without the trailing "> ")
    pub prompt: String,
    /// Candidates, displayed in exactly this order
    pub items: Vec<String>,
    /// Optional header lines above the list
    pub header: Option<String>,
    /// Optional preview command template ({} is the highlighted item)
    pub preview: Option<String>,
    /// Hotkeys beyond plain accept/cancel that the caller recognizes
    pub extra_keys: Vec<String>,
}

impl PickRequest {
    pub fn new(prompt: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            items,
            header: None,
            preview: None,
            extra_keys: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    pub fn with_extra_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of a pick interaction
///
/// Invariant: `value` is `None` iff the user cancelled or no items existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickResult {
    /// Which input triggered the selection ("enter", "esc", or a hotkey)
    pub key: String,
    /// The selected item, if any
    pub value: Option<String>,
}

impl PickResult {
    /// The cancellation result: `(key="esc", value=None)`
    pub fn esc() -> Self {
        Self {
            key: KEY_ESC.to_string(),
            value: None,
        }
    }

    pub fn accepted(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// True when the user backed out (or nothing was selectable)
    pub fn cancelled(&self) -> bool {
        self.value.is_none()
    }
}

/// Errors from the picker, distinct from user cancellation
///
/// Cancellation is NOT an error: it comes back as a `PickResult` with
/// `value=None`. These variants cover real failures only.
#[derive(Debug, Error)]
pub enum PickerError {
    /// The picker binary could not be started at all (typically not in PATH)
    #[error("picker binary '{0}' could not be started; is it installed?")]
    Spawn(String),

    /// The picker exited abnormally for a reason other than cancellation
    #[error("picker exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    /// I/O failure while feeding or draining the picker process
    #[error("picker I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking interactive selection
///
/// Contract: an empty `items` list returns `(key="esc", value=None)`
/// immediately, without any interactive session. Implementations spawn at
/// most one foreground session per call and release the terminal before
/// returning.
#[cfg_attr(test, mockall::automock)]
pub trait Picker {
    fn pick(&mut self, request: &PickRequest) -> Result<PickResult, PickerError>;
}
