//! Gate identity.
//!
//! Every gate keeps its own window. State is stored and looked up under a
//! [`GateId`], so two gates with different ids never affect each other even
//! when they share a store.

use std::borrow::Borrow;
use std::fmt;

/// Key under which a gate's state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(String);

impl GateId {
    /// Create an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        GateId(id.into())
    }

    /// Id for a gate placed as a node inside a workflow.
    ///
    /// Renders as `"{workflow_id}/{node_name}"`, so a node keeps its state
    /// across executions of the same workflow. A `/` or `%` inside either
    /// part is written as `%2F` or `%25`, so the separator stays unique.
    pub fn for_node(workflow_id: &str, node_name: &str) -> Self {
        GateId(format!(
            "{}/{}",
            escape_segment(workflow_id),
            escape_segment(node_name)
        ))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GateId {
    fn from(id: &str) -> Self {
        GateId::new(id)
    }
}

impl From<String> for GateId {
    fn from(id: String) -> Self {
        GateId(id)
    }
}

impl Borrow<str> for GateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
