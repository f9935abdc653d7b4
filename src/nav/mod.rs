//! Navigator control loop
//!
//! Drives the namespace -> resource kind -> resource -> action hierarchy:
//! ask the Lister for candidates, hand them to the Picker, interpret the
//! returned (key, selection) pair, and either descend a level, dispatch a
//! side effect, or unwind one level. One synchronous loop; the only
//! suspension points are the remote listing call, the interactive picker,
//! and the dispatched operation itself.
//!
//! Failure containment: a listing error becomes an empty menu, a failed
//! operation or non-cancel picker failure is reported and the loop resumes
//! at the same level. The only fatal error below startup is a missing
//! picker binary.

pub mod confirm;
pub mod dispatch;
pub mod state;

pub use dispatch::{ActionDispatcher, OpDispatcher};
pub use state::{NavLevel, NavState};

use anyhow::Result;

use crate::config::Config;
use crate::kube::Lister;
use crate::kube::lister::ALL_NAMESPACES;
use crate::models::{KindEntry, find_kind, kind_names};
use crate::ops::{OpOutcome, OpTarget, UserInput};
use crate::picker::{PickRequest, Picker, PickerError};
use crate::sessions::SessionRegistry;

/// The interactive resource navigator
pub struct Navigator<L, P, D> {
    lister: L,
    picker: P,
    dispatcher: D,
    input: Box<dyn UserInput>,
    config: Config,
    state: NavState,
    sessions: SessionRegistry,
}

/// Convert a picker outcome into loop policy: cancellation is a result,
/// a missing binary is fatal, anything else aborts the current pick only.
fn contain_picker<T>(result: Result<T, PickerError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error @ PickerError::Spawn(_)) => Err(error.into()),
        Err(error) => {
            tracing::error!("picker failed: {}", error);
            eprintln!("Picker failed: {}", error);
            Ok(None)
        }
    }
}

/// Resolve a picked row into an operation target
///
/// In all-namespaces mode rows are `namespace/name`; otherwise the current
/// namespace applies.
fn split_target(kind: &'static KindEntry, namespace: &str, row: &str) -> OpTarget {
    if namespace == ALL_NAMESPACES {
        if let Some((ns, name)) = row.split_once('/') {
            return OpTarget {
                kind,
                namespace: ns.to_string(),
                name: name.to_string(),
            };
        }
    }
    OpTarget {
        kind,
        namespace: namespace.to_string(),
        name: row.to_string(),
    }
}

impl<L, P, D> Navigator<L, P, D>
where
    L: Lister,
    P: Picker + 'static,
    D: ActionDispatcher,
{
    pub fn new(
        lister: L,
        picker: P,
        dispatcher: D,
        input: Box<dyn UserInput>,
        config: Config,
    ) -> Self {
        Self {
            lister,
            picker,
            dispatcher,
            input,
            config,
            state: NavState::new(),
            sessions: SessionRegistry::new(),
        }
    }

    /// Pre-seed the navigation stack from CLI flags / config defaults
    pub fn preseed(&mut self, namespace: Option<String>, kind: Option<&'static KindEntry>) {
        if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
            self.state.enter_namespace(ns);
            if let Some(entry) = kind {
                self.state.enter_kind(entry);
            }
        } else if kind.is_some() {
            tracing::warn!("--kind without a namespace is ignored");
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Run the loop until the user cancels out of the namespace level
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("navigator started");
        loop {
            self.sessions.reap();
            match self.state.next_level() {
                NavLevel::Namespace => {
                    if !self.step_namespace().await? {
                        break;
                    }
                }
                NavLevel::ResourceType => self.step_kind().await?,
                NavLevel::Resource => self.step_resource().await?,
                NavLevel::Action => self.step_action().await?,
            }
        }

        if !self.sessions.is_empty() {
            eprintln!("Stopping {} background session(s)", self.sessions.len());
        }
        self.sessions.shutdown().await;
        tracing::info!("navigator finished");
        Ok(())
    }

    /// Namespace level; returns false when the user exits the program
    async fn step_namespace(&mut self) -> Result<bool> {
        let mut items = vec![ALL_NAMESPACES.to_string()];
        match self.lister.namespaces().await {
            Ok(names) => items.extend(names),
            Err(error) => {
                tracing::error!("listing namespaces failed: {:#}", error);
                eprintln!("Listing namespaces failed: {:#}", error);
            }
        }

        let request = PickRequest::new("Namespace", items)
            .with_header("Alt-E:Edit | Alt-X:Delete | Esc:Exit")
            .with_preview(format!(
                "{} get pods -n {{}} --no-headers",
                self.config.kubectl_path
            ))
            .with_extra_keys(["alt-e", "alt-x"]);

        let Some(result) = contain_picker(self.picker.pick(&request))? else {
            return Ok(true);
        };
        let Some(namespace) = result.value else {
            eprintln!("Exiting.");
            return Ok(false);
        };

        match result.key.as_str() {
            "alt-e" => {
                if namespace == ALL_NAMESPACES {
                    eprintln!("Pick a concrete namespace to edit");
                } else if let Err(error) = self.dispatcher.edit_namespace(&namespace).await {
                    tracing::error!("edit namespace {} failed: {:#}", namespace, error);
                    eprintln!("Edit failed: {:#}", error);
                }
            }
            "alt-x" => self.delete_namespace_flow(&namespace).await?,
            _ => self.state.enter_namespace(namespace),
        }
        Ok(true)
    }

    /// Batch delete with count + dry-run preview before any confirmation
    async fn delete_namespace_flow(&mut self, namespace: &str) -> Result<()> {
        if namespace == ALL_NAMESPACES {
            eprintln!("Refusing to delete across all namespaces");
            return Ok(());
        }

        let report = match self.dispatcher.namespace_report(namespace).await {
            Ok(items) => items,
            Err(error) => {
                tracing::error!("namespace report for {} failed: {:#}", namespace, error);
                eprintln!("Cannot enumerate namespace contents, delete aborted: {:#}", error);
                return Ok(());
            }
        };

        let action = format!("delete namespace {}", namespace);
        let Some(decision) =
            contain_picker(confirm::confirm_batch(&mut self.picker, &action, &report))?
        else {
            return Ok(());
        };

        if decision == confirm::BatchDecision::Confirmed {
            match self.dispatcher.delete_namespace(namespace).await {
                Ok(()) => eprintln!(
                    "Namespace {} deleted ({} item(s) removed with it)",
                    namespace,
                    report.len()
                ),
                Err(error) => {
                    tracing::error!("delete namespace {} failed: {:#}", namespace, error);
                    eprintln!("Delete failed: {:#}", error);
                }
            }
        }
        Ok(())
    }

    /// Resource kind level
    async fn step_kind(&mut self) -> Result<()> {
        let request = PickRequest::new("Resource Type", kind_names())
            .with_header("Enter:Select | Alt-S:Sessions | Esc:Back")
            .with_extra_keys(["alt-s"]);

        let Some(result) = contain_picker(self.picker.pick(&request))? else {
            return Ok(());
        };

        if result.cancelled() {
            // Policy: leaving the kind level clears the namespace so
            // re-entry re-lists namespaces
            self.state.pop();
            return Ok(());
        }

        if result.key == "alt-s" {
            self.browse_sessions().await?;
            return Ok(());
        }

        let name = result.value.unwrap_or_default();
        match find_kind(&name) {
            Some(entry) => self.state.enter_kind(entry),
            None => eprintln!("Unknown resource kind: {}", name),
        }
        Ok(())
    }

    /// Resource level
    async fn step_resource(&mut self) -> Result<()> {
        let Some(kind) = self.state.kind() else {
            self.state.pop();
            return Ok(());
        };
        let namespace = self.state.namespace().unwrap_or_default().to_string();

        let items = match self.lister.resources(kind, &namespace).await {
            Ok(items) => items,
            Err(error) => {
                tracing::error!(
                    "listing {} in {} failed: {:#}",
                    kind.plural,
                    namespace,
                    error
                );
                eprintln!("Listing {} failed: {:#}", kind.plural, error);
                Vec::new()
            }
        };
        if items.is_empty() {
            eprintln!("No {} found in namespace {}", kind.plural, namespace);
        }

        let hotkeys = self.dispatcher.resource_hotkeys(kind);
        let mut request = PickRequest::new(kind.display_name, items)
            .with_header(self.dispatcher.resource_header(kind))
            .with_extra_keys(hotkeys.iter().copied());
        if namespace != ALL_NAMESPACES {
            request = request.with_preview(format!(
                "{} describe {}/{{}} -n {}",
                self.config.kubectl_path, kind.plural, namespace
            ));
        }

        let Some(result) = contain_picker(self.picker.pick(&request))? else {
            return Ok(());
        };
        let Some(row) = result.value else {
            self.state.pop();
            return Ok(());
        };

        if hotkeys.contains(&result.key.as_str()) {
            let target = split_target(kind, &namespace, &row);
            self.confirm_and_dispatch(&result.key, target).await?;
            // Stay at this level; the next iteration re-lists
            return Ok(());
        }

        // Plain enter and unrecognized keys both descend
        self.state.enter_resource(row);
        Ok(())
    }

    /// Action menu level
    async fn step_action(&mut self) -> Result<()> {
        let (Some(kind), Some(namespace), Some(row)) = (
            self.state.kind(),
            self.state.namespace().map(str::to_string),
            self.state.resource().map(str::to_string),
        ) else {
            self.state.pop();
            return Ok(());
        };

        let target = split_target(kind, &namespace, &row);
        let request = PickRequest::new("Action", self.dispatcher.action_labels(kind))
            .with_header(format!(
                "{} {} in {}",
                kind.display_name, target.name, target.namespace
            ))
            .with_preview(format!(
                "{} get {}/{} -n {} -o yaml",
                self.config.kubectl_path, kind.plural, target.name, target.namespace
            ));

        let Some(result) = contain_picker(self.picker.pick(&request))? else {
            return Ok(());
        };
        let Some(label) = result.value else {
            self.state.pop();
            return Ok(());
        };

        self.confirm_and_dispatch(&label, target).await?;
        // Unwind to the resource list so mutated state is re-listed
        self.state.pop();
        Ok(())
    }

    /// Confirm if required, run the operation, contain its errors
    async fn confirm_and_dispatch(&mut self, key: &str, target: OpTarget) -> Result<()> {
        if self.dispatcher.requires_confirmation(target.kind, key) {
            let message = self.dispatcher.confirmation_message(target.kind, key, &target);
            match contain_picker(confirm::confirm_single(&mut self.picker, &message))? {
                Some(true) => {}
                _ => {
                    eprintln!("Cancelled.");
                    return Ok(());
                }
            }
        }

        match self
            .dispatcher
            .run(key, &target, &mut self.picker, self.input.as_mut())
            .await
        {
            Ok(OpOutcome::Done) => {}
            Ok(OpOutcome::Spawned {
                descriptor,
                log_path,
                child,
            }) => {
                let id = self.sessions.register(descriptor.clone(), log_path, child);
                eprintln!("Started background session {}: {}", id, descriptor);
            }
            Err(error) => {
                tracing::error!(
                    "operation '{}' on {} failed: {:#}",
                    key,
                    target.describe(),
                    error
                );
                eprintln!("Operation failed: {:#}", error);
            }
        }
        Ok(())
    }

    /// Session browser: attach (tail the log file) or terminate
    async fn browse_sessions(&mut self) -> Result<()> {
        loop {
            self.sessions.reap();
            let rows = self.sessions.display_rows();
            if rows.is_empty() {
                eprintln!("No active background sessions");
                return Ok(());
            }

            let request = PickRequest::new("Sessions", rows)
                .with_header("Enter:Attach | Alt-X:Terminate | Esc:Back")
                .with_extra_keys(["alt-x"]);
            let Some(result) = contain_picker(self.picker.pick(&request))? else {
                return Ok(());
            };
            let Some(row) = result.value else {
                return Ok(());
            };
            let Some(id) = SessionRegistry::id_from_row(&row).map(str::to_string) else {
                continue;
            };

            if result.key == "alt-x" {
                if let Err(error) = self.sessions.terminate(&id).await {
                    eprintln!("Terminate failed: {:#}", error);
                }
                continue;
            }

            if let Some(session) = self.sessions.get(&id) {
                eprintln!(
                    "Attaching to {} (Ctrl-C detaches, session keeps running)",
                    session.descriptor
                );
                let args = vec!["-f".to_string(), session.log_path.display().to_string()];
                if let Err(error) = crate::ops::kubectl::run_foreground("tail", &args) {
                    eprintln!("Attach failed: {:#}", error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::lister::MockLister;
    use crate::picker::{KEY_ENTER, PickResult};
    use async_trait::async_trait;

    struct ScriptedPicker {
        answers: Vec<PickResult>,
    }

    impl Picker for ScriptedPicker {
        fn pick(&mut self, request: &PickRequest) -> Result<PickResult, PickerError> {
            if request.items.is_empty() {
                return Ok(PickResult::esc());
            }
            if self.answers.is_empty() {
                return Ok(PickResult::esc());
            }
            Ok(self.answers.remove(0))
        }
    }

    struct NoInput;

    impl UserInput for NoInput {
        fn line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    /// Dispatcher with no hotkeys and a single inert action
    #[derive(Default)]
    struct InertDispatcher;

    #[async_trait(?Send)]
    impl ActionDispatcher for InertDispatcher {
        fn resource_hotkeys(&self, _kind: &'static KindEntry) -> Vec<&'static str> {
            vec![]
        }

        fn resource_header(&self, _kind: &'static KindEntry) -> String {
            String::new()
        }

        fn action_labels(&self, _kind: &'static KindEntry) -> Vec<String> {
            vec!["Describe".to_string()]
        }

        fn requires_confirmation(&self, _kind: &'static KindEntry, _key: &str) -> bool {
            false
        }

        fn confirmation_message(
            &self,
            _kind: &'static KindEntry,
            _key: &str,
            target: &OpTarget,
        ) -> String {
            target.describe()
        }

        async fn run(
            &mut self,
            _key: &str,
            _target: &OpTarget,
            _picker: &mut dyn Picker,
            _input: &mut dyn UserInput,
        ) -> Result<OpOutcome> {
            Ok(OpOutcome::Done)
        }

        async fn edit_namespace(&mut self, _namespace: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_namespace(&mut self, _namespace: &str) -> Result<()> {
            Ok(())
        }

        async fn namespace_report(&self, _namespace: &str) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_split_target_all_namespaces_rows() {
        let kind = find_kind("pod").unwrap();
        let target = split_target(kind, ALL_NAMESPACES, "media/nginx-7f4b6");
        assert_eq!(target.namespace, "media");
        assert_eq!(target.name, "nginx-7f4b6");
    }

    #[test]
    fn test_split_target_plain_namespace() {
        let kind = find_kind("pod").unwrap();
        let target = split_target(kind, "media", "nginx-7f4b6");
        assert_eq!(target.namespace, "media");
        assert_eq!(target.name, "nginx-7f4b6");
    }

    #[tokio::test]
    async fn test_namespace_listing_error_yields_usable_menu_and_exit() {
        let mut lister = MockLister::new();
        lister
            .expect_namespaces()
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        // The "all" sentinel is still offered; user cancels out
        let picker = ScriptedPicker {
            answers: vec![PickResult::esc()],
        };
        let mut nav = Navigator::new(
            lister,
            picker,
            InertDispatcher::default(),
            Box::new(NoInput),
            Config::default(),
        );
        nav.run().await.unwrap();
        assert_eq!(nav.state().depth(), 0);
    }

    #[tokio::test]
    async fn test_enter_descends_and_next_listing_uses_picked_namespace() {
        let mut lister = MockLister::new();
        lister
            .expect_namespaces()
            .returning(|| Ok(vec!["ns-a".to_string(), "ns-b".to_string()]));
        lister
            .expect_resources()
            .withf(|kind, namespace| kind.display_name == "Pod" && namespace == "ns-b")
            .returning(|_, _| Ok(vec![]));

        let picker = ScriptedPicker {
            answers: vec![
                PickResult::accepted(KEY_ENTER, "ns-b"),
                PickResult::accepted(KEY_ENTER, "Pod"),
                // Pod listing is empty -> picker short-circuits to esc,
                // then the script runs out and everything unwinds
            ],
        };
        let mut nav = Navigator::new(
            lister,
            picker,
            InertDispatcher::default(),
            Box::new(NoInput),
            Config::default(),
        );
        nav.run().await.unwrap();
        assert_eq!(nav.state().depth(), 0);
    }
}
