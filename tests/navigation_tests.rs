//! Tests for navigation flow consistency
//!
//! Ensures the menu loop descends and unwinds one level at a time, re-lists
//! after side effects, and survives listing and operation failures. All
//! collaborators are scripted fakes; nothing here touches a cluster.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use kubenav::config::Config;
use kubenav::kube::Lister;
use kubenav::models::{KindEntry, find_kind};
use kubenav::nav::{ActionDispatcher, Navigator};
use kubenav::ops::{OpOutcome, OpTarget, UserInput};
use kubenav::picker::{PickRequest, PickResult, Picker, PickerError};

/// Lister serving canned data and recording every call
struct FakeLister {
    namespaces: Vec<String>,
    resources: HashMap<(String, String), Vec<String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeLister {
    fn new(namespaces: &[&str]) -> Self {
        Self {
            namespaces: namespaces.iter().map(|s| s.to_string()).collect(),
            resources: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_resources(mut self, plural: &str, namespace: &str, names: &[&str]) -> Self {
        self.resources.insert(
            (plural.to_string(), namespace.to_string()),
            names.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl Lister for FakeLister {
    async fn namespaces(&self) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push("namespaces".to_string());
        Ok(self.namespaces.clone())
    }

    async fn resources(&self, kind: &'static KindEntry, namespace: &str) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", kind.plural, namespace));
        Ok(self
            .resources
            .get(&(kind.plural.to_string(), namespace.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Picker replaying a fixed script, honoring the empty-input contract and
/// recording every request it is shown
struct ScriptedPicker {
    script: VecDeque<PickResult>,
    requests: Rc<RefCell<Vec<PickRequest>>>,
    interactive_picks: Rc<RefCell<usize>>,
}

impl ScriptedPicker {
    fn new(script: Vec<PickResult>) -> Self {
        Self {
            script: script.into(),
            requests: Rc::new(RefCell::new(Vec::new())),
            interactive_picks: Rc::new(RefCell::new(0)),
        }
    }

    fn requests(&self) -> Rc<RefCell<Vec<PickRequest>>> {
        self.requests.clone()
    }

    fn interactive_picks(&self) -> Rc<RefCell<usize>> {
        self.interactive_picks.clone()
    }
}

impl Picker for ScriptedPicker {
    fn pick(&mut self, request: &PickRequest) -> Result<PickResult, PickerError> {
        self.requests.borrow_mut().push(request.clone());
        if request.items.is_empty() {
            // Contract: no interactive session on empty input
            return Ok(PickResult::esc());
        }
        *self.interactive_picks.borrow_mut() += 1;
        Ok(self.script.pop_front().unwrap_or_else(PickResult::esc))
    }
}

/// Dispatcher with configurable hotkeys, recording runs and optionally
/// failing specific keys
struct RecordingDispatcher {
    hotkeys: Vec<&'static str>,
    confirm_keys: Vec<&'static str>,
    fail_keys: Vec<&'static str>,
    runs: Rc<RefCell<Vec<String>>>,
}

impl RecordingDispatcher {
    fn new(hotkeys: Vec<&'static str>) -> Self {
        Self {
            hotkeys,
            confirm_keys: Vec::new(),
            fail_keys: Vec::new(),
            runs: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn confirming(mut self, keys: Vec<&'static str>) -> Self {
        self.confirm_keys = keys;
        self
    }

    fn failing(mut self, keys: Vec<&'static str>) -> Self {
        self.fail_keys = keys;
        self
    }

    fn runs(&self) -> Rc<RefCell<Vec<String>>> {
        self.runs.clone()
    }
}

#[async_trait(?Send)]
impl ActionDispatcher for RecordingDispatcher {
    fn resource_hotkeys(&self, _kind: &'static KindEntry) -> Vec<&'static str> {
        self.hotkeys.clone()
    }

    fn resource_header(&self, _kind: &'static KindEntry) -> String {
        "Esc:Back".to_string()
    }

    fn action_labels(&self, _kind: &'static KindEntry) -> Vec<String> {
        vec!["Describe".to_string(), "Delete".to_string()]
    }

    fn requires_confirmation(&self, _kind: &'static KindEntry, key: &str) -> bool {
        self.confirm_keys.iter().any(|k| *k == key)
    }

    fn confirmation_message(
        &self,
        _kind: &'static KindEntry,
        _key: &str,
        target: &OpTarget,
    ) -> String {
        format!("Delete {}?", target.name)
    }

    async fn run(
        &mut self,
        key: &str,
        target: &OpTarget,
        _picker: &mut dyn Picker,
        _input: &mut dyn UserInput,
    ) -> Result<OpOutcome> {
        self.runs
            .borrow_mut()
            .push(format!("{} {}/{}", key, target.namespace, target.name));
        if self.fail_keys.iter().any(|k| *k == key) {
            anyhow::bail!("simulated API error");
        }
        Ok(OpOutcome::Done)
    }

    async fn edit_namespace(&mut self, namespace: &str) -> Result<()> {
        self.runs
            .borrow_mut()
            .push(format!("edit-namespace {}", namespace));
        Ok(())
    }

    async fn delete_namespace(&mut self, namespace: &str) -> Result<()> {
        self.runs
            .borrow_mut()
            .push(format!("delete-namespace {}", namespace));
        Ok(())
    }

    async fn namespace_report(&self, _namespace: &str) -> Result<Vec<String>> {
        Ok(vec!["pods/a".to_string(), "pods/b".to_string()])
    }
}

struct NoInput;

impl UserInput for NoInput {
    fn line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn enter(value: &str) -> PickResult {
    PickResult::accepted("enter", value)
}

fn key(key: &str, value: &str) -> PickResult {
    PickResult::accepted(key, value)
}

fn prompts(requests: &Rc<RefCell<Vec<PickRequest>>>) -> Vec<String> {
    requests.borrow().iter().map(|r| r.prompt.clone()).collect()
}

#[tokio::test]
async fn test_enter_descends_one_level_and_lists_picked_namespace() {
    let lister = FakeLister::new(&["ns-a", "ns-b"]).with_resources("pods", "ns-b", &["p1", "p2"]);
    let calls = lister.calls();
    let picker = ScriptedPicker::new(vec![enter("ns-b"), enter("Pod")]);
    let requests = picker.requests();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec![]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.run().await.unwrap();

    // The pods listing after the pick used namespace ns-b
    assert!(calls.lock().unwrap().contains(&"pods:ns-b".to_string()));
    // Each accepted pick descended exactly one level
    let seen = prompts(&requests);
    assert_eq!(&seen[..3], &["Namespace", "Resource Type", "Pod"]);
    assert_eq!(nav.state().depth(), 0, "loop unwinds fully before exit");
}

#[tokio::test]
async fn test_empty_listing_short_circuits_and_pops_one_level() {
    let lister = FakeLister::new(&["empty-ns"]); // no pods registered
    let calls = lister.calls();
    let picker = ScriptedPicker::new(vec![enter("empty-ns"), enter("Pod")]);
    let requests = picker.requests();
    let interactive = picker.interactive_picks();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec![]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.run().await.unwrap();

    // The pods listing was attempted, came back empty, and the picker was
    // not driven interactively for it
    assert!(calls.lock().unwrap().contains(&"pods:empty-ns".to_string()));
    let recorded = requests.borrow();
    let empty_requests: Vec<_> = recorded.iter().filter(|r| r.items.is_empty()).collect();
    assert_eq!(empty_requests.len(), 1);
    assert_eq!(empty_requests[0].prompt, "Pod");
    assert_eq!(
        *interactive.borrow(),
        recorded.len() - 1,
        "the empty listing never drove an interactive pick"
    );
    drop(recorded);

    // Cancel popped exactly one level: kind menu comes right back
    let seen = prompts(&requests);
    assert_eq!(
        &seen[..4],
        &["Namespace", "Resource Type", "Pod", "Resource Type"]
    );
}

#[tokio::test]
async fn test_cancel_at_kind_level_clears_namespace_and_relists() {
    let lister = FakeLister::new(&["ns-a"]);
    let calls = lister.calls();
    // Enter ns-a, then cancel out of the kind menu, then exit
    let picker = ScriptedPicker::new(vec![enter("ns-a"), PickResult::esc()]);
    let requests = picker.requests();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec![]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.run().await.unwrap();

    let seen = prompts(&requests);
    assert_eq!(&seen[..3], &["Namespace", "Resource Type", "Namespace"]);
    // Namespaces were re-listed, not reused
    let listing_calls = calls.lock().unwrap();
    assert_eq!(
        listing_calls
            .iter()
            .filter(|c| c.as_str() == "namespaces")
            .count(),
        2
    );
}

#[tokio::test]
async fn test_relisting_after_pick_then_cancel_is_idempotent() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["p1", "p2", "p3"]);
    let picker = ScriptedPicker::new(vec![
        enter("media"),
        enter("Pod"),
        PickResult::esc(), // cancel out of the pod list
        enter("Pod"),      // descend again
    ]);
    let requests = picker.requests();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec![]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.run().await.unwrap();

    let recorded = requests.borrow();
    let pod_lists: Vec<_> = recorded.iter().filter(|r| r.prompt == "Pod").collect();
    assert_eq!(pod_lists.len(), 2);
    assert_eq!(
        pod_lists[0].items, pod_lists[1].items,
        "same items in the same order on re-listing"
    );
}

#[tokio::test]
async fn test_failed_delete_is_contained_and_level_relists() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["nginx"]);
    let calls = lister.calls();
    let dispatcher = RecordingDispatcher::new(vec!["alt-x"])
        .confirming(vec!["alt-x"])
        .failing(vec!["alt-x"]);
    let runs = dispatcher.runs();

    let picker = ScriptedPicker::new(vec![
        enter("media"),
        enter("Pod"),
        key("alt-x", "nginx"),
        enter("yes"), // confirmation
    ]);

    let mut nav = Navigator::new(lister, picker, dispatcher, Box::new(NoInput), Config::default());
    nav.run().await.unwrap();

    assert_eq!(runs.borrow().as_slice(), ["alt-x media/nginx"]);
    // A fresh listing call followed the failed delete
    let listing_calls = calls.lock().unwrap();
    assert_eq!(
        listing_calls
            .iter()
            .filter(|c| c.as_str() == "pods:media")
            .count(),
        2,
        "resource level re-lists after a failed side effect"
    );
}

#[tokio::test]
async fn test_destructive_hotkey_needs_explicit_confirmation() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["nginx"]);
    let dispatcher = RecordingDispatcher::new(vec!["alt-x"]).confirming(vec!["alt-x"]);
    let runs = dispatcher.runs();

    // Confirmation answered "no": nothing must run
    let picker = ScriptedPicker::new(vec![
        enter("media"),
        enter("Pod"),
        key("alt-x", "nginx"),
        enter("no"),
    ]);

    let mut nav = Navigator::new(lister, picker, dispatcher, Box::new(NoInput), Config::default());
    nav.run().await.unwrap();

    assert!(runs.borrow().is_empty(), "declined delete must not execute");
}

#[tokio::test]
async fn test_unrecognized_key_is_treated_as_enter() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["nginx"]);
    // "alt-z" is not in the dispatcher's hotkey set
    let picker = ScriptedPicker::new(vec![enter("media"), enter("Pod"), key("alt-z", "nginx")]);
    let requests = picker.requests();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec!["alt-x"]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.run().await.unwrap();

    let seen = prompts(&requests);
    assert!(
        seen.contains(&"Action".to_string()),
        "unknown key descends like enter, reaching the action menu"
    );
}

#[tokio::test]
async fn test_action_menu_dispatch_returns_to_resource_list() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["nginx"]);
    let dispatcher = RecordingDispatcher::new(vec![]);
    let runs = dispatcher.runs();

    let picker = ScriptedPicker::new(vec![
        enter("media"),
        enter("Pod"),
        enter("nginx"),
        enter("Describe"),
    ]);
    let requests = picker.requests();

    let mut nav = Navigator::new(lister, picker, dispatcher, Box::new(NoInput), Config::default());
    nav.run().await.unwrap();

    assert_eq!(runs.borrow().as_slice(), ["Describe media/nginx"]);
    // After the action the loop is back on the pod list
    let seen = prompts(&requests);
    let action_pos = seen.iter().position(|p| p == "Action").unwrap();
    assert_eq!(seen[action_pos + 1], "Pod");
}

#[tokio::test]
async fn test_namespace_delete_goes_through_batch_confirmation() {
    let lister = FakeLister::new(&["media"]);
    let dispatcher = RecordingDispatcher::new(vec![]);
    let runs = dispatcher.runs();

    // The report has 2 items; accept the exact "yes" entry
    let picker = ScriptedPicker::new(vec![
        key("alt-x", "media"),
        enter("yes - delete namespace media (2 item(s) affected)"),
    ]);
    let requests = picker.requests();

    let mut nav = Navigator::new(lister, picker, dispatcher, Box::new(NoInput), Config::default());
    nav.run().await.unwrap();

    assert_eq!(runs.borrow().as_slice(), ["delete-namespace media"]);
    let recorded = requests.borrow();
    let confirm = recorded.iter().find(|r| r.prompt == "Confirm").unwrap();
    assert!(confirm.header.as_ref().unwrap().contains("2 item(s)"));
}

#[tokio::test]
async fn test_preseed_starts_at_resource_level() {
    let lister = FakeLister::new(&["media"]).with_resources("pods", "media", &["nginx"]);
    let picker = ScriptedPicker::new(vec![]);
    let requests = picker.requests();

    let mut nav = Navigator::new(
        lister,
        picker,
        RecordingDispatcher::new(vec![]),
        Box::new(NoInput),
        Config::default(),
    );
    nav.preseed(Some("media".to_string()), find_kind("po"));
    nav.run().await.unwrap();

    let seen = prompts(&requests);
    assert_eq!(seen[0], "Pod", "preseeded stack skips the outer menus");
}
