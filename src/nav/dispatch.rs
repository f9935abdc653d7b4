//! Action dispatch seam
//!
//! The Navigator talks to operations through `ActionDispatcher`, which is
//! pure capability data plus an async run call. Tests substitute recording
//! fakes; production wires the operation registry to a cluster client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::Api;
use kube::api::DeleteParams;

use crate::config::Config;
use crate::kube::{KubeLister, Lister};
use crate::models::{KIND_REGISTRY, KindEntry};
use crate::ops::{OpContext, OpOutcome, OpTarget, OperationRegistry, UserInput};
use crate::picker::Picker;

/// Capability lookup and side-effect execution for the Navigator
#[async_trait(?Send)]
pub trait ActionDispatcher {
    /// Hotkeys recognized at the resource level for this kind
    fn resource_hotkeys(&self, kind: &'static KindEntry) -> Vec<&'static str>;

    /// Header line naming the hotkeys
    fn resource_header(&self, kind: &'static KindEntry) -> String;

    /// Action-menu labels (default action first)
    fn action_labels(&self, kind: &'static KindEntry) -> Vec<String>;

    /// Whether the operation behind `key` needs explicit confirmation
    fn requires_confirmation(&self, kind: &'static KindEntry, key: &str) -> bool;

    /// Confirmation message for the operation behind `key`
    fn confirmation_message(
        &self,
        kind: &'static KindEntry,
        key: &str,
        target: &OpTarget,
    ) -> String;

    /// Run the operation bound to `key` (hotkey or action label)
    async fn run(
        &mut self,
        key: &str,
        target: &OpTarget,
        picker: &mut dyn Picker,
        input: &mut dyn UserInput,
    ) -> Result<OpOutcome>;

    /// Open the namespace object in the editor
    async fn edit_namespace(&mut self, namespace: &str) -> Result<()>;

    /// Delete a namespace (callers confirm first)
    async fn delete_namespace(&mut self, namespace: &str) -> Result<()>;

    /// Everything in the namespace, as `plural/name` rows, for the dry-run
    /// report shown before a namespace delete
    async fn namespace_report(&self, namespace: &str) -> Result<Vec<String>>;
}

/// Production dispatcher: operation registry + cluster client
pub struct OpDispatcher {
    client: kube::Client,
    config: Config,
    registry: OperationRegistry,
}

impl OpDispatcher {
    pub fn new(client: kube::Client, config: Config) -> Self {
        Self {
            client,
            config,
            registry: OperationRegistry::new(),
        }
    }

    fn refused_read_only(&self, what: &str) {
        tracing::info!("read-only mode refused '{}'", what);
        eprintln!("Read-only mode: {} refused", what);
    }
}

#[async_trait(?Send)]
impl ActionDispatcher for OpDispatcher {
    fn resource_hotkeys(&self, kind: &'static KindEntry) -> Vec<&'static str> {
        self.registry.hotkeys_for(kind)
    }

    fn resource_header(&self, kind: &'static KindEntry) -> String {
        self.registry.header_for(kind)
    }

    fn action_labels(&self, kind: &'static KindEntry) -> Vec<String> {
        self.registry.labels_for(kind)
    }

    fn requires_confirmation(&self, kind: &'static KindEntry, key: &str) -> bool {
        self.registry
            .find(kind, key)
            .map(|op| op.requires_confirmation())
            .unwrap_or(false)
    }

    fn confirmation_message(
        &self,
        kind: &'static KindEntry,
        key: &str,
        target: &OpTarget,
    ) -> String {
        self.registry
            .find(kind, key)
            .map(|op| op.confirmation_message(target))
            .unwrap_or_else(|| format!("Proceed with {}?", target.describe()))
    }

    async fn run(
        &mut self,
        key: &str,
        target: &OpTarget,
        picker: &mut dyn Picker,
        input: &mut dyn UserInput,
    ) -> Result<OpOutcome> {
        let op = self
            .registry
            .find(target.kind, key)
            .with_context(|| {
                format!(
                    "No operation bound to '{}' for {}",
                    key, target.kind.display_name
                )
            })?;

        if op.is_mutating() && self.config.read_only {
            self.refused_read_only(op.label());
            return Ok(OpOutcome::Done);
        }

        let mut ctx = OpContext {
            client: &self.client,
            config: &self.config,
            picker,
            input,
        };
        op.execute(&mut ctx, target).await
    }

    async fn edit_namespace(&mut self, namespace: &str) -> Result<()> {
        if self.config.read_only {
            self.refused_read_only("Edit namespace");
            return Ok(());
        }
        let args = vec![
            "edit".to_string(),
            "namespace".to_string(),
            namespace.to_string(),
        ];
        crate::ops::kubectl::run_foreground(&self.config.kubectl_path, &args)
    }

    async fn delete_namespace(&mut self, namespace: &str) -> Result<()> {
        if self.config.read_only {
            self.refused_read_only("Delete namespace");
            return Ok(());
        }
        tracing::debug!("deleting namespace {}", namespace);
        let api: Api<Namespace> = Api::all(self.client.clone());
        api.delete(namespace, &DeleteParams::default())
            .await
            .with_context(|| format!("Failed to delete namespace {}", namespace))?;
        tracing::info!("deleted namespace {}", namespace);
        Ok(())
    }

    async fn namespace_report(&self, namespace: &str) -> Result<Vec<String>> {
        let lister = KubeLister::new(self.client.clone());
        let mut items = Vec::new();
        for entry in KIND_REGISTRY {
            match lister.resources(entry, namespace).await {
                Ok(names) => {
                    items.extend(
                        names
                            .into_iter()
                            .map(|name| format!("{}/{}", entry.plural, name)),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "namespace report: listing {} in {} failed: {:#}",
                        entry.plural,
                        namespace,
                        e
                    );
                }
            }
        }
        Ok(items)
    }
}
