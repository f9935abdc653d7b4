//! Resource name enumeration
//!
//! The `Lister` trait is the read-only seam between the Navigator and the
//! cluster: given a navigation position it produces candidate names for the
//! picker. The production implementation talks to the API server; tests
//! substitute mocks.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};

use crate::models::KindEntry;

/// Namespace sentinel meaning "list across all namespaces"
pub const ALL_NAMESPACES: &str = "all";

/// Read-only enumeration of candidate names for a menu level
///
/// An empty result is valid and distinct from an error. Callers decide how
/// to surface errors; the Navigator logs them and shows an empty menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Lister: Send + Sync {
    /// Namespace names, in API server order
    async fn namespaces(&self) -> Result<Vec<String>>;

    /// Resource names of `kind` in `namespace`
    ///
    /// With the `"all"` sentinel, rows are `namespace/name` so the result
    /// stays unambiguous across namespaces.
    async fn resources(&self, kind: &'static KindEntry, namespace: &str) -> Result<Vec<String>>;
}

/// Lister backed by the cluster API
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for KubeLister {
    async fn namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .context("Failed to list namespaces")?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    async fn resources(&self, kind: &'static KindEntry, namespace: &str) -> Result<Vec<String>> {
        let params = ListParams::default();

        if namespace == ALL_NAMESPACES {
            let api = super::api::all_namespaces_api(&self.client, kind);
            let list = api
                .list(&params)
                .await
                .with_context(|| format!("Failed to list {} across namespaces", kind.plural))?;
            return Ok(list
                .items
                .iter()
                .map(|obj| {
                    format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())
                })
                .collect());
        }

        let api = super::api::namespaced_api(&self.client, kind, namespace);
        let list = api.list(&params).await.with_context(|| {
            format!("Failed to list {} in namespace {}", kind.plural, namespace)
        })?;
        Ok(list.items.iter().map(|obj| obj.name_any()).collect())
    }
}
