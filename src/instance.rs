//! Task instances: argument bindings and collaborator-fed data flow.

use std::collections::{BTreeMap, BTreeSet};

use crate::slots::SlotPath;
use crate::system::TaskModelId;

/// Which end of a data-flow connection the instance occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlowDirection {
    /// The instance produces data on this connection.
    Source,
    /// The instance consumes data on this connection.
    Sink,
}

/// One externally visible data-flow connection touching an instance.
///
/// Flow links are recorded by the plan graph that owns connections; this
/// crate only consults them (for `using_slot` and merge decisions), it
/// never derives them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlowLink {
    /// The slot the connection exercises.
    pub slot: SlotPath,
    /// Whether the instance is the source or the sink.
    pub direction: FlowDirection,
    /// The peer task the connection reaches.
    pub peer: String,
    /// The port name on the peer.
    pub port: String,
}

/// A task instance under plan construction.
///
/// Argument bindings stay mutable until the instance is committed; the
/// flow-link set mirrors the collaborator plan graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInstance {
    model: TaskModelId,
    arguments: BTreeMap<String, String>,
    flow: BTreeSet<FlowLink>,
}

impl TaskInstance {
    /// Creates an instance of `model` with no bound arguments.
    #[must_use]
    pub fn new(model: TaskModelId) -> Self {
        Self { model, arguments: BTreeMap::new(), flow: BTreeSet::new() }
    }

    /// Builder-style argument binding.
    #[must_use]
    pub fn with_argument(mut self, name: &str, value: &str) -> Self {
        self.bind(name, value);
        self
    }

    /// The instance's task model.
    #[must_use]
    pub fn model(&self) -> TaskModelId {
        self.model
    }

    /// Binds (or rebinds) an argument.
    pub fn bind(&mut self, name: &str, value: &str) {
        self.arguments.insert(name.to_string(), value.to_string());
    }

    /// The bound value of an argument, if any.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }

    /// All bound arguments.
    #[must_use]
    pub fn arguments(&self) -> &BTreeMap<String, String> {
        &self.arguments
    }

    /// Records a data-flow connection reported by the plan graph.
    pub fn add_flow_link(&mut self, link: FlowLink) {
        self.flow.insert(link);
    }

    /// Removes a data-flow connection (the plan graph dropped it).
    pub fn remove_flow_link(&mut self, link: &FlowLink) {
        self.flow.remove(link);
    }

    /// The recorded data-flow connections.
    #[must_use]
    pub fn flow_links(&self) -> &BTreeSet<FlowLink> {
        &self.flow
    }

    /// True iff the slot at `path` is exercised by an active data-flow
    /// connection.
    #[must_use]
    pub fn using_slot(&self, path: &str) -> bool {
        let path = SlotPath::parse(path);
        self.flow.iter().any(|link| link.slot == path)
    }
}
