//! API-backed operations
//!
//! Operations that go through the Kubernetes API client directly: delete,
//! scale, rollout restart.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{DeleteParams, Patch, PatchParams};
use serde_json::json;

use crate::kube::api::namespaced_api;
use crate::models::KindEntry;

use super::{OpContext, OpOutcome, OpTarget, ResourceOperation};

/// Delete operation - removes a resource
pub struct DeleteOperation;

#[async_trait(?Send)]
impl ResourceOperation for DeleteOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        tracing::debug!("deleting {}", target.describe());

        let api = namespaced_api(ctx.client, target.kind, &target.namespace);

        // Verify the resource exists so a stale menu row fails clearly
        api.get(&target.name)
            .await
            .with_context(|| format!("{} not found", target.describe()))?;

        api.delete(&target.name, &DeleteParams::default())
            .await
            .with_context(|| format!("Failed to delete {}", target.describe()))?;

        tracing::info!("deleted {}", target.describe());
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-x"
    }

    fn label(&self) -> &'static str {
        "Delete"
    }

    fn requires_confirmation(&self) -> bool {
        true
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Delete {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        true
    }

    fn is_valid_for(&self, _kind: &KindEntry) -> bool {
        true
    }
}

/// Scale operation - sets the replica count
pub struct ScaleOperation;

#[async_trait(?Send)]
impl ResourceOperation for ScaleOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        let Some(raw) = ctx.input.line("Replicas")? else {
            eprintln!("No replica count given, {} left unchanged", target.name);
            return Ok(OpOutcome::Done);
        };
        let replicas: u32 = raw
            .parse()
            .with_context(|| format!("Replica count must be a number, got '{}'", raw))?;

        tracing::debug!("scaling {} to {}", target.describe(), replicas);

        let api = namespaced_api(ctx.client, target.kind, &target.namespace);
        let patch = json!({
            "spec": {
                "replicas": replicas
            }
        });

        api.patch(&target.name, &PatchParams::default(), &Patch::Merge(patch))
            .await
            .with_context(|| format!("Failed to scale {}", target.describe()))?;

        tracing::info!("scaled {} to {}", target.describe(), replicas);
        eprintln!("Scaled {} to {} replica(s)", target.name, replicas);
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-s"
    }

    fn label(&self) -> &'static str {
        "Scale"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Scale {}?", target.describe())
    }

    fn is_mutating(&self) -> bool {
        true
    }

    fn is_valid_for(&self, kind: &KindEntry) -> bool {
        matches!(kind.display_name, "Deployment" | "StatefulSet")
    }
}

/// Rollout restart operation - patches the pod template annotation that
/// triggers a rolling restart
pub struct RolloutRestartOperation;

#[async_trait(?Send)]
impl ResourceOperation for RolloutRestartOperation {
    async fn execute(&self, ctx: &mut OpContext<'_>, target: &OpTarget) -> Result<OpOutcome> {
        tracing::debug!("rollout restart {}", target.describe());

        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let api = namespaced_api(ctx.client, target.kind, &target.namespace);
        let patch = json!({
            "spec": {
                "template": {
                    "metadata": {
                        "annotations": {
                            "kubectl.kubernetes.io/restartedAt": now
                        }
                    }
                }
            }
        });

        api.patch(&target.name, &PatchParams::default(), &Patch::Merge(patch))
            .await
            .with_context(|| format!("Failed to restart {}", target.describe()))?;

        tracing::info!("rollout restart issued for {}", target.describe());
        eprintln!("Rollout restart issued for {}", target.name);
        Ok(OpOutcome::Done)
    }

    fn hotkey(&self) -> &'static str {
        "alt-r"
    }

    fn label(&self) -> &'static str {
        "Rollout restart"
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, target: &OpTarget) -> String {
        format!("Restart {}?", target.describe())
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
