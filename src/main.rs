//! kubenav - an fzf-driven terminal navigator for Kubernetes resources
//!
//! Lists namespaces and resources through the Kubernetes API, presents them
//! through fzf, and dispatches describe/edit/delete/exec/logs/port-forward
//! style operations on the selection.

use anyhow::{Context, Result};
use clap::Parser;

use kubenav::cli;
use kubenav::config::ConfigLoader;
use kubenav::kube::{self, KubeLister};
use kubenav::models::find_kind;
use kubenav::nav::{Navigator, OpDispatcher};
use kubenav::ops::StdinInput;
use kubenav::picker::FzfPicker;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Config subcommands never touch the cluster
    if let Some(cli::Command::Config { subcommand }) = args.command {
        return cli::handle_config_command(subcommand);
    }

    // Print the log location before the picker takes the terminal
    let log_file = cli::init_logging(args.debug);
    if let Some(ref path) = log_file {
        eprintln!("Debug logging enabled. Logs written to: {}", path.display());
    }

    let mut config = ConfigLoader::load().unwrap_or_else(|_| ConfigLoader::load_defaults());
    if args.read_only {
        config.read_only = true;
    }
    tracing::debug!(
        "configuration loaded: readOnly={}, picker={}",
        config.read_only,
        config.picker.path
    );

    let kind = match args.kind.as_deref() {
        Some(name) => Some(
            find_kind(name)
                .with_context(|| format!("Unknown resource kind: {}", name))?,
        ),
        None => None,
    };

    tracing::debug!("initializing Kubernetes client");
    let client = kube::create_client()
        .await
        .context("Failed to connect to the cluster (check kubeconfig and credentials)")?;
    let context = kube::get_context().await?;
    tracing::info!("connected to context {}", context);
    eprintln!("Context: {}", context);

    // Swallow SIGINT in the navigator itself: Ctrl-C terminates the
    // foreground child (picker, kubectl), while detached sessions run in
    // their own process group and keep going.
    tokio::spawn(async {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                break;
            }
            tracing::debug!("SIGINT received");
        }
    });

    let namespace = args.namespace.clone().or_else(|| {
        (!config.default_namespace.is_empty()).then(|| config.default_namespace.clone())
    });

    let lister = KubeLister::new(client.clone());
    let picker = FzfPicker::new(&config.picker);
    let dispatcher = OpDispatcher::new(client, config.clone());

    let mut navigator = Navigator::new(lister, picker, dispatcher, Box::new(StdinInput), config);
    navigator.preseed(namespace, kind);
    navigator.run().await
}
