//! fzf subprocess adapter
//!
//! Drives one foreground fzf session per pick: candidates on stdin, styling
//! and key bindings as flags, stdout parsed as `[hotkey\n]selection\n`.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::schema::PickerConfig;

use super::{KEY_ENTER, KEY_ESC, PickRequest, PickResult, Picker, PickerError};

/// Exit status fzf uses for user cancellation (Esc / Ctrl-C / Ctrl-G)
const FZF_CANCEL_STATUS: i32 = 130;

/// Interactive picker backed by the fzf binary
pub struct FzfPicker {
    program: String,
    style: PickerConfig,
}

impl FzfPicker {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            program: config.path.clone(),
            style: config.clone(),
        }
    }

    /// Styling flags shared by every invocation
    fn style_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--layout={}", self.style.layout),
            format!("--border={}", self.style.border),
            format!("--margin={}", self.style.margin),
        ];
        // BTreeMap iteration keeps the argv deterministic
        for (name, value) in &self.style.colors {
            args.push("--color".to_string());
            args.push(format!("{}:{}", name, value));
        }
        args
    }

    /// Full argv for a request (without the program name)
    ///
    /// "esc" is always in the expect list so cancellation at the picker is
    /// reported as a key rather than a bare non-zero exit.
    pub fn build_args(&self, request: &PickRequest) -> Vec<String> {
        let mut args = self.style_args();

        args.push("--prompt".to_string());
        args.push(format!("{}> ", request.prompt));

        if let Some(ref header) = request.header {
            args.push("--header".to_string());
            args.push(header.clone());
        }

        if let Some(ref preview) = request.preview {
            args.push("--preview".to_string());
            args.push(preview.clone());
        }

        let mut expect = vec![KEY_ESC.to_string()];
        expect.extend(request.extra_keys.iter().cloned());
        args.push(format!("--expect={}", expect.join(",")));

        args
    }
}

impl Picker for FzfPicker {
    fn pick(&mut self, request: &PickRequest) -> Result<PickResult, PickerError> {
        // Contract: empty input short-circuits without an interactive session
        if request.items.is_empty() {
            tracing::debug!("picker skipped: no items for prompt '{}'", request.prompt);
            return Ok(PickResult::esc());
        }

        let args = self.build_args(request);
        tracing::debug!("spawning {} with {} items", self.program, request.items.len());

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PickerError::Spawn(self.program.clone())
                } else {
                    PickerError::Io(e)
                }
            })?;

        {
            // stdin handle must drop so fzf sees EOF on the candidate list
            let mut stdin = child.stdin.take().ok_or_else(|| {
                PickerError::Io(std::io::Error::other("picker stdin unavailable"))
            })?;
            stdin.write_all(request.items.join("\n").as_bytes())?;
            stdin.write_all(b"\n")?;
        }

        let output = child.wait_with_output()?;
        // A signal-terminated picker (no exit code) counts as cancellation
        let status = output.status.code().unwrap_or(FZF_CANCEL_STATUS);

        if status == FZF_CANCEL_STATUS {
            return Ok(PickResult::esc());
        }
        if status != 0 {
            return Err(PickerError::Failed {
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_output(&stdout))
    }
}

/// Parse fzf stdout produced under `--expect`
///
/// Format: first line is the accepting key (empty for plain enter),
/// second line is the selection. Escape reported through the expect list
/// means cancel regardless of any highlighted item.
fn parse_output(stdout: &str) -> PickResult {
    let mut lines = stdout.lines();

    let first = match lines.next() {
        Some(line) => line,
        None => return PickResult::esc(),
    };
    let second = lines.next().filter(|line| !line.is_empty());

    if first == KEY_ESC {
        return PickResult::esc();
    }

    if first.is_empty() {
        return match second {
            Some(selection) => PickResult::accepted(KEY_ENTER, selection),
            None => PickResult::esc(),
        };
    }

    match second {
        Some(selection) => PickResult {
            key: first.to_string(),
            value: Some(selection.to_string()),
        },
        // A single bare line is a selection accepted with enter
        None => PickResult::accepted(KEY_ENTER, first),
    }
}
