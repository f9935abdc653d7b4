//! Background session registry
//!
//! Detached processes the navigator starts but does not block on (log
//! follows, port-forwards) are tracked here as explicit handles rather than
//! as a naming convention against the OS process table. The registry is
//! owned and mutated only by the navigator's control loop.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::process::Child;

/// One detached background process
pub struct Session {
    /// Registry-assigned identifier, unique within this run
    pub id: String,
    /// Human-readable description ("follow logs media/nginx", ...)
    pub descriptor: String,
    /// File receiving the process output; attach tails this
    pub log_path: PathBuf,
    /// When the session was spawned
    pub started: DateTime<Utc>,
    child: Child,
}

/// Registry of live background sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
    counter: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly spawned child; returns its assigned id
    pub fn register(&mut self, descriptor: String, log_path: PathBuf, child: Child) -> String {
        self.counter += 1;
        let id = format!("s{}", self.counter);
        tracing::info!("session {} started: {}", id, descriptor);
        self.sessions.push(Session {
            id: id.clone(),
            descriptor,
            log_path,
            started: Utc::now(),
            child,
        });
        id
    }

    /// Drop entries whose process has already exited
    pub fn reap(&mut self) {
        self.sessions.retain_mut(|session| {
            match session.child.try_wait() {
                Ok(Some(status)) => {
                    tracing::info!(
                        "session {} ({}) exited with {}",
                        session.id,
                        session.descriptor,
                        status
                    );
                    false
                }
                Ok(None) => true,
                Err(e) => {
                    tracing::warn!("session {}: could not poll child: {}", session.id, e);
                    true
                }
            }
        });
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    /// Display rows for the picker, in start order
    pub fn display_rows(&self) -> Vec<String> {
        self.sessions
            .iter()
            .map(|session| {
                format!(
                    "{}  {}  (started {})",
                    session.id,
                    session.descriptor,
                    session.started.format("%H:%M:%S")
                )
            })
            .collect()
    }

    /// Extract the session id from a display row
    pub fn id_from_row(row: &str) -> Option<&str> {
        row.split_whitespace().next()
    }

    /// Kill one session and remove it from the registry
    pub async fn terminate(&mut self, id: &str) -> Result<()> {
        let index = self
            .sessions
            .iter()
            .position(|session| session.id == id)
            .with_context(|| format!("No such session: {}", id))?;
        let mut session = self.sessions.remove(index);
        session
            .child
            .kill()
            .await
            .with_context(|| format!("Failed to kill session {}", id))?;
        tracing::info!("session {} ({}) terminated", id, session.descriptor);
        Ok(())
    }

    /// Kill everything still running; called on shutdown
    pub async fn shutdown(&mut self) {
        for session in &mut self.sessions {
            if let Err(e) = session.child.kill().await {
                tracing::warn!("session {}: kill failed on shutdown: {}", session.id, e);
            } else {
                tracing::info!(
                    "session {} ({}) stopped on shutdown",
                    session.id,
                    session.descriptor
                );
            }
        }
        self.sessions.clear();
    }
}

/// Create the output file for a new background session
///
/// Files are named after the session purpose and left in the data dir so
/// output survives the navigator exiting.
pub fn create_session_log(prefix: &str) -> Result<(std::fs::File, PathBuf)> {
    let dir = crate::config::paths::session_log_dir();
    crate::config::paths::ensure_dir(&dir)
        .with_context(|| format!("Failed to create session log dir {}", dir.display()))?;

    let file = tempfile::Builder::new()
        .prefix(&format!("{}-", prefix))
        .suffix(".log")
        .tempfile_in(&dir)
        .context("Failed to create session log file")?;
    let (file, path) = file
        .keep()
        .context("Failed to persist session log file")?;
    Ok((file, path))
}
