//! Navigation state
//!
//! The menu hierarchy is a fixed, linear stack discipline:
//! namespace -> resource kind -> resource -> action. `NavState` tracks how
//! deep the user has descended and which identity fields are set.
//!
//! Invariant: stack depth equals the number of identity fields set, and
//! popping a level clears its field so re-entry re-lists instead of reusing
//! stale data. The action level is positional only (no identity field), so
//! it is never pushed.

use crate::models::KindEntry;

/// Menu levels, ordered from shallowest to deepest
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavLevel {
    Namespace,
    ResourceType,
    Resource,
    Action,
}

/// Current navigation position
#[derive(Default)]
pub struct NavState {
    stack: Vec<NavLevel>,
    namespace: Option<String>,
    kind: Option<&'static KindEntry>,
    resource: Option<String>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The level the loop should present next
    pub fn next_level(&self) -> NavLevel {
        match self.stack.len() {
            0 => NavLevel::Namespace,
            1 => NavLevel::ResourceType,
            2 => NavLevel::Resource,
            _ => NavLevel::Action,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn kind(&self) -> Option<&'static KindEntry> {
        self.kind
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn enter_namespace(&mut self, namespace: String) {
        debug_assert_eq!(self.next_level(), NavLevel::Namespace);
        self.namespace = Some(namespace);
        self.stack.push(NavLevel::Namespace);
        debug_assert!(self.invariant_holds());
    }

    pub fn enter_kind(&mut self, kind: &'static KindEntry) {
        debug_assert_eq!(self.next_level(), NavLevel::ResourceType);
        self.kind = Some(kind);
        self.stack.push(NavLevel::ResourceType);
        debug_assert!(self.invariant_holds());
    }

    pub fn enter_resource(&mut self, name: String) {
        debug_assert_eq!(self.next_level(), NavLevel::Resource);
        self.resource = Some(name);
        self.stack.push(NavLevel::Resource);
        debug_assert!(self.invariant_holds());
    }

    /// Unwind exactly one level, clearing its identity field
    ///
    /// Returns the level that was left, or `None` at the top.
    pub fn pop(&mut self) -> Option<NavLevel> {
        let level = self.stack.pop()?;
        match level {
            NavLevel::Namespace => self.namespace = None,
            NavLevel::ResourceType => self.kind = None,
            NavLevel::Resource => self.resource = None,
            NavLevel::Action => {}
        }
        debug_assert!(self.invariant_holds());
        Some(level)
    }

    /// Stack depth matches the set identity fields
    pub fn invariant_holds(&self) -> bool {
        let fields = [
            self.namespace.is_some(),
            self.kind.is_some(),
            self.resource.is_some(),
        ];
        let set = fields.iter().filter(|&&present| present).count();
        // Fields must be set in order: a kind without a namespace is invalid
        let ordered = !fields
            .iter()
            .skip_while(|&&present| present)
            .any(|&present| present);
        self.stack.len() == set && ordered
    }
}
