//! Argument trees.
//!
//! A command's argument paths form a tree stored as an arena: nodes live in
//! one `Vec` and refer to their children by [`NodeId`]. The root is the
//! command itself and carries the command-level permission, actions and
//! delay.
//!
//! A node's kind follows from its name alone:
//!
//! - `[name]` is a dynamic placeholder, validated against its declared type
//!   and bound to the raw input.
//! - `{name}` is a static placeholder, matching `name` case-insensitively.
//! - anything else is a literal, matching only the exact key.

mod matcher;
mod types;

pub use matcher::{MatchOutcome, Resolution};
pub use types::ArgumentType;

use crate::spec::{ActionSet, DelaySpec, NodeDefinition};
use indexmap::IndexMap;
use std::sync::Arc;

/// Stable handle to a node inside its [`ArgumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The command node.
    pub const ROOT: Self = Self(0);
}

/// Kind of a node, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Literal,
    /// Static placeholder with its unwrapped name.
    Static(&'a str),
    /// Dynamic placeholder with its unwrapped name.
    Dynamic(&'a str),
}

impl<'a> NodeKind<'a> {
    pub fn of(name: &'a str) -> Self {
        if let Some(inner) = name.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Self::Dynamic(inner)
        } else if let Some(inner) = name.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Self::Static(inner)
        } else {
            Self::Literal
        }
    }
}

/// One segment of the argument tree.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    permission: Option<String>,
    permission_message: Option<String>,
    value_type: Option<String>,
    type_error: Option<String>,
    actions: Option<Arc<ActionSet>>,
    delay: Option<Arc<DelaySpec>>,
    children: IndexMap<String, NodeId>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind<'_> {
        NodeKind::of(&self.name)
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn permission_message(&self) -> Option<&str> {
        self.permission_message.as_deref()
    }

    /// Declared type text, as written.
    pub fn value_type(&self) -> Option<&str> {
        self.value_type.as_deref()
    }

    /// Parsed declared type.
    pub fn argument_type(&self) -> ArgumentType {
        ArgumentType::from_declared(self.value_type.as_deref())
    }

    pub fn type_error(&self) -> Option<&str> {
        self.type_error.as_deref()
    }

    pub fn actions(&self) -> Option<&Arc<ActionSet>> {
        self.actions.as_ref()
    }

    pub fn delay(&self) -> Option<&Arc<DelaySpec>> {
        self.delay.as_ref()
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True if landing here runs something.
    pub fn is_executable(&self) -> bool {
        self.actions.is_some() || self.delay.is_some()
    }
}

/// Immutable argument tree of one command.
#[derive(Debug, Clone)]
pub struct ArgumentTree {
    nodes: Vec<Node>,
}

impl ArgumentTree {
    /// Builds the tree rooted at `root`, named after the command.
    pub fn build(name: &str, root: &NodeDefinition) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.push(name, root);
        tree
    }

    fn push(&mut self, name: &str, definition: &NodeDefinition) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            permission: definition.permission.clone(),
            permission_message: definition.permission_message.clone(),
            value_type: definition.value_type.clone(),
            type_error: definition.type_error.clone(),
            actions: definition.actions.clone().filter(|a| !a.is_empty()).map(Arc::new),
            delay: definition.delay.clone().filter(|d| !d.is_empty()).map(Arc::new),
            children: IndexMap::new(),
        });

        for (child_name, child) in &definition.arguments {
            let child_id = self.push(child_name, child);
            self.nodes[id.0].children.insert(child_name.clone(), child_id);
        }
        id
    }

    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Node behind `id`. Ids only come from this tree, so lookups cannot miss.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indented outline of every path, one line per node.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.describe_into(NodeId::ROOT, 0, &mut lines);
        lines
    }

    fn describe_into(&self, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        let node = self.node(id);
        let mut line = format!("{}{}", "  ".repeat(depth), node.name);
        if let NodeKind::Dynamic(_) = node.kind() {
            line.push_str(&format!(" <{}>", node.argument_type()));
        }
        if let Some(permission) = node.permission() {
            line.push_str(&format!(" (permission: {})", permission));
        }
        if let Some(actions) = node.actions() {
            let kinds: Vec<&str> = actions.iter().map(|(kind, _)| kind).collect();
            line.push_str(&format!(" actions: {}", kinds.join(", ")));
        }
        if let Some(delay) = node.delay() {
            line.push_str(&format!(" delay: {}s", delay.length_secs()));
        }
        lines.push(line);
        for (_, child) in node.children() {
            self.describe_into(child, depth + 1, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::CommandSpec;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(NodeKind::of("reload"), NodeKind::Literal);
        assert_eq!(NodeKind::of("{confirm}"), NodeKind::Static("confirm"));
        assert_eq!(NodeKind::of("[target]"), NodeKind::Dynamic("target"));
        assert_eq!(NodeKind::of("[broken"), NodeKind::Literal);
        assert_eq!(NodeKind::of("["), NodeKind::Literal);
    }

    #[test]
    fn test_arena_layout_and_order() {
        let spec = CommandSpec::from_yaml_str(
            "kit",
            r#"
arguments:
  zeta:
    actions: {message: [z]}
  alpha:
    arguments:
      "[n]":
        type: integer
        actions: {message: [n]}
"#,
        )
        .unwrap();

        let tree = spec.tree();
        assert_eq!(tree.len(), 4);
        let names: Vec<&str> = tree.root().children().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let (_, alpha) = tree.root().children().nth(1).unwrap();
        let alpha = tree.node(alpha);
        assert!(!alpha.is_executable());
        let (_, n) = alpha.children().next().unwrap();
        assert_eq!(tree.node(n).argument_type(), ArgumentType::Integer);
    }

    #[test]
    fn test_empty_actions_are_not_executable() {
        let spec = CommandSpec::from_yaml_str("x", "actions: {}\ndelay: {}\n").unwrap();
        assert!(!spec.tree().root().is_executable());
    }

    #[test]
    fn test_describe() {
        let spec = CommandSpec::from_yaml_str(
            "warp",
            r#"
permission: warp.use
arguments:
  "[target]":
    type: online_player
    actions: {message: [hi]}
"#,
        )
        .unwrap();
        assert_eq!(
            spec.tree().describe(),
            vec![
                "warp (permission: warp.use)".to_string(),
                "  [target] <online_player> actions: message".to_string(),
            ]
        );
    }
}
