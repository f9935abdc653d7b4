//! kubectl-backed interactive operations
//!
//! Operations that need a terminal (describe, edit, exec, logs) or a
//! long-lived child process (follow logs, port-forward) shell out to
//! kubectl. Foreground children inherit the terminal and the loop suspends
//! until they finish; detached children are handed back to the session
//! registry via `OpOutcome::Spawned`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::Stdio;

use crate::models::KindEntry;
use crate::picker::PickRequest;

use super::{OpContext, OpOutcome, OpTarget, ResourceOperation};

/// Shells probed for an interactive exec, in preference order
const EXEC_SHELLS: &[&str] = &["bash", "sh", "ash"];

/// Run a terminal-inheriting child and wait for it
///
/// A signal-terminated child (Ctrl-C during a log tail) is not an error.
pub(crate) fn run_foreground(program: &str, args: &[String]) -> Result<()> {
    tracing::debug!("running {} {}", program, args.join(" "));
    let status = std::process::Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", program))?;

    match status.code() {
        Some(0) | None => Ok(()),
        Some(code) => Err(anyhow::anyhow!("{} exited with status {}", program, code)),
    }
}

/// Hold the screen until the user has read the output
fn pause_for_enter() {
    eprint!("\nPress Enter to continue...");
    let mut buf = String::new();
    let _ = std::io::stdin().lock().read_line(&mut buf);
}

/// Spawn a detached child with its output captured to a session log file
///
/// The child gets its own process group so a Ctrl-C aimed at the foreground
/// loop leaves it running.
fn spawn_detached(
    program: &str,
    args: &[String],
    log_prefix: &str,
) -> Result<(PathBuf, tokio::process::Child)> {
    let (file, path) = crate::sessions::create_session_log(log_prefix)?;
    let stderr = file
        .try_clone()
        .context("Failed to clone session log handle")?;

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(file)
        .stderr(stderr);
    #[cfg(unix)]
    cmd.process_group(0);

    tracing::debug!("spawning detached {} {}", program, args.join(" "));
    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn {}", program))?;
    Ok((path, child))
}

/// Describe operation - the default action for every kind
pub struct DescribeOperation;

#[async_trait(?Send)]
impl ResourceOperation for DescribeOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let args = vec![
            "describe".to_string(),
            target.kind.plural.to_string(),
            target.name.clone(),
            "-n".to_string(),
            target.namespace.clone(),
        ];
        run_foreground(&ctx.config.kubectl_path, &args)?;
        pause_for_enter();
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-d"
    }

    fn label(&self) -> &'static str {
        "Describe"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Describe {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        false
    }

    fn is_valid_for(&self, _kind: &KindEntry) -> bool {
        true
    }
}

/// Edit operation - opens the resource in $EDITOR via kubectl
pub struct EditOperation;

#[async_trait(?Send)]
impl ResourceOperation for EditOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let args = vec![
            "edit".to_string(),
            target.kind.plural.to_string(),
            target.name.clone(),
            "-n".to_string(),
            target.namespace.clone(),
        ];
        run_foreground(&ctx.config.kubectl_path, &args)?;
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-e"
    }

    fn label(&self) -> &'static str {
        "Edit"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Edit {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        true
    }

    fn is_valid_for(&self, _kind: &KindEntry) -> bool {
        true
    }
}

/// Logs operation - foreground tail of pod logs
pub struct LogsOperation;

#[async_trait(?Send)]
impl ResourceOperation for LogsOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let args = vec![
            "logs".to_string(),
            target.name.clone(),
            "-n".to_string(),
            target.namespace.clone(),
            "--all-containers".to_string(),
            format!("--tail={}", ctx.config.logger.tail),
        ];
        run_foreground(&ctx.config.kubectl_path, &args)?;
        pause_for_enter();
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-l"
    }

    fn label(&self) -> &'static str {
        "Logs"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Show logs for {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        false
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        kind.display_name == "Pod"
    }
}

/// Follow-logs operation - detached log stream into a session
pub struct FollowLogsOperation;

#[async_trait(?Send)]
impl ResourceOperation for FollowLogsOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let args = vec![
            "logs".to_string(),
            target.name.clone(),
            "-n".to_string(),
            target.namespace.clone(),
            "-f".to_string(),
            "--all-containers".to_string(),
            format!("--tail={}", ctx.config.logger.tail),
            format!("--since={}s", ctx.config.logger.since_seconds),
        ];
        let (log_path, child) = spawn_detached(
            &ctx.config.kubectl_path,
            &args,
            &format!("logs-{}", target.name),
        )?;
        Ok(OpOutcome::Spawned {
            descriptor: format!("follow logs {}/{}", target.namespace, target.name),
            log_path,
            child,
        })
    }

    fn hotkey(&self) -> &'static str {
        "alt-f"
    }

    fn label(&self) -> &'static str {
        "Follow logs"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Follow logs for {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        false
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        kind.display_name == "Pod"
    }
}

/// Exec operation - interactive shell inside a pod container
pub struct ExecOperation;

impl ExecOperation {
    /// Container names from the pod spec
    async fn containers(ctx: &OpContext<'_>, target: &OpTarget) -> Result<Vec<String>> {
        let api: Api<Pod> = Api::namespaced(ctx.client.clone(), &target.namespace);
        let pod = api
            .get(&target.name)
            .await
            .with_context(|| format!("Failed to fetch {}", target.describe()))?;
        Ok(pod
            .spec
            .map(|spec| spec.containers.into_iter().map(|c| c.name).collect())
            .unwrap_or_default())
    }

    /// Probe for a usable shell and start it interactively
    fn start_shell(ctx: &OpContext<'_>, target: &OpTarget, container: &str) -> Result<()> {
        for shell in EXEC_SHELLS {
            let probe = std::process::Command::new(&ctx.config.kubectl_path)
                .args([
                    "exec",
                    &target.name,
                    "-n",
                    &target.namespace,
                    "-c",
                    container,
                    "--",
                    shell,
                    "-c",
                    "true",
                ])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            if matches!(probe, Ok(status) if status.success()) {
                eprintln!("Starting '{}' in {}/{}", shell, target.name, container);
                let args = vec![
                    "exec".to_string(),
                    "-it".to_string(),
                    target.name.clone(),
                    "-n".to_string(),
                    target.namespace.clone(),
                    "-c".to_string(),
                    container.to_string(),
                    "--".to_string(),
                    shell.to_string(),
                ];
                return run_foreground(&ctx.config.kubectl_path, &args);
            }
        }
        Err(anyhow::anyhow!(
            "No suitable shell found in container {} (tried {})",
            container,
            EXEC_SHELLS.join(", ")
        ))
    }
}

#[async_trait(?Send)]
impl ResourceOperation for ExecOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let containers = Self::containers(ctx, target).await?;
        if containers.is_empty() {
            return Err(anyhow::anyhow!("No containers in {}", target.describe()));
        }

        let container = if containers.len() == 1 {
            containers[0].clone()
        } else {
            let request = PickRequest::new("Container", containers);
            let picked = ctx.picker.pick(&request)?;
            match picked.value {
                Some(name) => name,
                None => {
                    eprintln!("No container selected");
                    return Ok(OpOutcome::Done);
                }
            }
        };

        Self::start_shell(ctx, target, &container)?;
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-c"
    }

    fn label(&self) -> &'static str {
        "Exec shell"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Open a shell in {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        true
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        kind.display_name == "Pod"
    }
}

/// Rollout-undo operation - reverts a workload to a previous revision
pub struct RolloutUndoOperation;

#[async_trait(?Send)]
impl ResourceOperation for RolloutUndoOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let mut args = vec![
            "rollout".to_string(),
            "undo".to_string(),
            format!("{}/{}", target.kind.plural, target.name),
            "-n".to_string(),
            target.namespace.clone(),
        ];
        // Empty input means "previous revision", kubectl's own default
        if let Some(revision) = ctx.input.line("Revision (empty for previous)")? {
            let revision: u32 = revision
                .parse()
                .with_context(|| format!("Revision must be a number, got '{}'", revision))?;
            args.push(format!("--to-revision={}", revision));
        }
        run_foreground(&ctx.config.kubectl_path, &args)?;
        eprintln!("Rollout undo issued for {}", target.name);
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-u"
    }

    fn label(&self) -> &'static str {
        "Rollout undo"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Undo the last rollout of {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        true
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        matches!(
            kind.display_name,
            "Deployment" | "StatefulSet" | "DaemonSet"
        )
    }
}

/// Port-forward operation - detached forward into a session
pub struct PortForwardOperation;

#[async_trait(?Send)]
impl ResourceOperation for PortForwardOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let Some(local) = ctx.input.line("Local port")? else {
            eprintln!("No local port given");
            return Ok(OpOutcome::Done);
        };
        let Some(remote) = ctx.input.line("Target port")? else {
            eprintln!("No target port given");
            return Ok(OpOutcome::Done);
        };
        let local: u16 = local
            .parse()
            .with_context(|| format!("Local port must be a number, got '{}'", local))?;
        let remote: u16 = remote
            .parse()
            .with_context(|| format!("Target port must be a number, got '{}'", remote))?;

        let args = vec![
            "port-forward".to_string(),
            format!("{}/{}", target.kind.plural, target.name),
            format!("{}:{}", local, remote),
            "-n".to_string(),
            target.namespace.clone(),
        ];
        let (log_path, child) = spawn_detached(
            &ctx.config.kubectl_path,
            &args,
            &format!("pf-{}", target.name),
        )?;
        Ok(OpOutcome::Spawned {
            descriptor: format!(
                "port-forward {}/{} {}:{}",
                target.namespace, target.name, local, remote
            ),
            log_path,
            child,
        })
    }

    fn hotkey(&self) -> &'static str {
        "alt-p"
    }

    fn label(&self) -> &'static str {
        "Port-forward"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Port-forward to {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        false
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        matches!(kind.display_name, "Pod" | "Service")
    }
}
