//! Confirmation and dry-run flows
//!
//! Destructive operations never run off an implicit default: a single
//! delete needs an explicit "yes" pick, and a batch delete (namespace)
//! shows the affected count with a dry-run preview first.
//!
//! Invariant: the count displayed equals the length of the item list the
//! caller subsequently acts on.

use crate::picker::{PickRequest, Picker, PickerError};

/// Outcome of a batch confirmation
#[derive(Debug, PartialEq, Eq)]
pub enum BatchDecision {
    Confirmed,
    Cancelled,
}

/// Explicit yes/no confirmation for a single destructive operation
///
/// "no" is listed first so a blind accept is safe.
pub fn confirm_single(picker: &mut dyn Picker, message: &str) -> Result<bool, PickerError> {
    let request = PickRequest::new("Confirm", vec!["no".to_string(), "yes".to_string()])
        .with_header(message.to_string());
    let result = picker.pick(&request)?;
    Ok(result.value.as_deref() == Some("yes"))
}

/// Batch confirmation with dry-run preview
///
/// Loops until the user confirms or cancels; picking "dry-run" prints every
/// affected item and re-prompts.
pub fn confirm_batch(
    picker: &mut dyn Picker,
    action: &str,
    items: &[String],
) -> Result<BatchDecision, PickerError> {
    let yes = format!("yes - {} ({} item(s) affected)", action, items.len());
    loop {
        let request = PickRequest::new(
            "Confirm",
            vec!["no".to_string(), "dry-run".to_string(), yes.clone()],
        )
        .with_header(format!("{} will affect {} item(s)", action, items.len()));

        let result = picker.pick(&request)?;
        match result.value.as_deref() {
            Some("dry-run") => {
                eprintln!("[DRY RUN] {} would affect {} item(s):", action, items.len());
                for item in items {
                    eprintln!("  {}", item);
                }
            }
            Some(choice) if choice == yes => return Ok(BatchDecision::Confirmed),
            _ => return Ok(BatchDecision::Cancelled),
        }
    }
}
