//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides a configured
//! client for use throughout the application.
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment variables
//! (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY` and their lowercase variants).
//! Internal cluster hosts are added to NO_PROXY automatically so a homelab
//! API server on a private address is never routed through a proxy.

pub mod api;
pub mod lister;

pub use lister::{KubeLister, Lister};

use anyhow::Result;
use kube::{Client, Config};
use url::Url;

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer().await?;

    let cluster_url = config.cluster_url.to_string();
    if let Ok(url) = Url::parse(&cluster_url) {
        if let Some(host) = url.host_str() {
            ensure_no_proxy_bypass(host);
        }
    }

    let client = Client::try_from(config)?;
    Ok(client)
}

/// Add an internal cluster host to NO_PROXY if it is not already covered
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let upper = std::env::var("NO_PROXY").unwrap_or_default();
    let lower = std::env::var("no_proxy").unwrap_or_default();
    let current = if !upper.is_empty() { upper } else { lower };

    if no_proxy_contains(&current, host) {
        return;
    }

    let updated = if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    };

    tracing::debug!("adding '{}' to NO_PROXY", host);
    // SAFETY: set_var is unsafe in Rust 2024 due to potential data races.
    // This runs once during single-threaded startup, before the runtime
    // spawns any worker threads that read the proxy variables.
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// Check if a host looks like an internal/private endpoint
///
/// Covers the addresses homelab API servers actually use: RFC1918 ranges,
/// loopback, and internal TLDs.
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || host == "localhost"
        || host == "127.0.0.1"
        || host == "::1"
    {
        return true;
    }

    host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".cluster.local")
        || host.ends_with(".svc.cluster.local")
        || host.ends_with(".home.arpa")
}

/// Check if NO_PROXY already covers the host (exact, suffix, and
/// `.domain` wildcard patterns)
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| {
            if pattern == host {
                return true;
            }
            if let Some(suffix) = pattern.strip_prefix('.') {
                if host == suffix || host.ends_with(&format!(".{}", suffix)) {
                    return true;
                }
            }
            host.ends_with(&format!(".{}", pattern))
        })
}

/// Get the current Kubernetes context name from kubeconfig
pub async fn get_context() -> Result<String> {
    let kubeconfig_path = std::env::var("KUBECONFIG").ok().or_else(|| {
        let home = std::env::var("HOME").ok()?;
        Some(format!("{}/.kube/config", home))
    });

    if let Some(path) = kubeconfig_path {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            for line in contents.lines() {
                if line.trim().starts_with("current-context:") {
                    if let Some(context) = line.split(':').nth(1) {
                        return Ok(context.trim().to_string());
                    }
                }
            }
        }
    }

    // In-cluster or otherwise contextless config
    Ok("default".to_string())
}
