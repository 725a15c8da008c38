//! Path matching and tab suggestions over an [`ArgumentTree`].

use super::{ArgumentTree, NodeId, NodeKind};
use crate::bindings::Bindings;
use crate::host::CommandSender;
use crate::identity::IdentityResolver;
use crate::spec::{ActionSet, DelaySpec};
use std::sync::Arc;

/// Token in a type-error template replaced by the offending input.
const INPUT_TOKEN: &str = "%input%";

/// A path that resolved to something executable.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Node the path landed on.
    pub node: NodeId,
    pub actions: Option<Arc<ActionSet>>,
    pub delay: Option<Arc<DelaySpec>>,
    pub bindings: Bindings,
}

/// Result of matching an argument path.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Resolved(Resolution),
    /// The path is a valid prefix, or matches nothing in particular; the
    /// caller answers with the usage message.
    UsagePrefixIncomplete,
    /// A segment failed the type of the only dynamic placeholder there.
    InvalidArgument(String),
    /// A node on the path requires a permission the sender lacks. Carries
    /// the node's (or the command's) permission message, if configured.
    PermissionDenied(Option<String>),
}

impl ArgumentTree {
    /// Matches `args` segment by segment, checking permissions on the way.
    ///
    /// The root permission is checked before any segment is consumed. Each
    /// segment is matched against the current node's children: exact
    /// literal key first, then static placeholders (case-insensitive), then
    /// dynamic placeholders whose type accepts it, in declaration order.
    pub fn match_path<A: AsRef<str>>(
        &self,
        args: &[A],
        sender: &dyn CommandSender,
        identity: &IdentityResolver,
    ) -> MatchOutcome {
        if let Some(denied) = self.deny(NodeId::ROOT, sender) {
            return denied;
        }

        let mut bindings = Bindings::for_sender(sender.name());
        let mut current = NodeId::ROOT;

        for arg in args {
            let arg = arg.as_ref();
            let Some(next) = self.find_child(current, arg, identity) else {
                return self.unmatched(current, arg);
            };
            if let Some(denied) = self.deny(next, sender) {
                return denied;
            }

            let node = self.node(next);
            if !matches!(node.kind(), NodeKind::Literal) {
                bindings.insert(node.name(), arg);
            }
            current = next;
        }

        let node = self.node(current);
        if !node.is_executable() {
            return MatchOutcome::UsagePrefixIncomplete;
        }
        MatchOutcome::Resolved(Resolution {
            node: current,
            actions: node.actions().cloned(),
            delay: node.delay().cloned(),
            bindings,
        })
    }

    /// Completions for the last segment of `args`.
    ///
    /// Walks every segment but the last like [`match_path`](Self::match_path)
    /// and stops with nothing on a miss, a leaf, or a node the sender may
    /// not use. Children the sender may not use are never offered.
    pub fn suggest<A: AsRef<str>>(
        &self,
        args: &[A],
        sender: &dyn CommandSender,
        identity: &IdentityResolver,
    ) -> Vec<String> {
        let Some((partial, walked)) = args.split_last() else {
            return Vec::new();
        };

        let mut current = NodeId::ROOT;
        for arg in walked {
            let Some(next) = self.find_child(current, arg.as_ref(), identity) else {
                return Vec::new();
            };
            if !self.node(next).has_children() || self.deny(next, sender).is_some() {
                return Vec::new();
            }
            current = next;
        }

        let partial = partial.as_ref().to_lowercase();
        let mut suggestions = Vec::new();
        for (key, child) in self.node(current).children() {
            if self.deny(child, sender).is_some() {
                continue;
            }
            let node = self.node(child);
            match node.kind() {
                NodeKind::Dynamic(_) => {
                    suggestions.extend(node.argument_type().suggestions(&partial, identity));
                }
                NodeKind::Static(name) => {
                    if name.to_lowercase().starts_with(&partial) {
                        suggestions.push(name.to_string());
                    }
                }
                NodeKind::Literal => {
                    if key.to_lowercase().starts_with(&partial) {
                        suggestions.push(key.to_string());
                    }
                }
            }
        }
        suggestions
    }

    fn find_child(&self, current: NodeId, arg: &str, identity: &IdentityResolver) -> Option<NodeId> {
        let node = self.node(current);
        if let Some(&exact) = node.children.get(arg) {
            return Some(exact);
        }

        let lowered = arg.to_lowercase();
        let static_match = node.children().find(|&(_, child)| {
            matches!(self.node(child).kind(), NodeKind::Static(name) if name.to_lowercase() == lowered)
        });
        if let Some((_, child)) = static_match {
            return Some(child);
        }

        node.children()
            .find(|&(_, child)| {
                let child = self.node(child);
                matches!(child.kind(), NodeKind::Dynamic(_))
                    && child.argument_type().validate(arg, identity)
            })
            .map(|(_, child)| child)
    }

    /// Outcome for a segment no child accepted.
    fn unmatched(&self, current: NodeId, arg: &str) -> MatchOutcome {
        let mut dynamic = self
            .node(current)
            .children()
            .map(|(_, child)| self.node(child))
            .filter(|child| matches!(child.kind(), NodeKind::Dynamic(_)));

        match (dynamic.next(), dynamic.next()) {
            (Some(expected), None) => {
                let template = expected.type_error().map_or_else(
                    || format!("&cInvalid input for <{}>.", expected.value_type().unwrap_or("text")),
                    str::to_string,
                );
                MatchOutcome::InvalidArgument(template.replace(INPUT_TOKEN, arg))
            }
            _ => MatchOutcome::UsagePrefixIncomplete,
        }
    }

    fn deny(&self, id: NodeId, sender: &dyn CommandSender) -> Option<MatchOutcome> {
        let node = self.node(id);
        let permission = node.permission()?;
        if sender.has_permission(permission) {
            return None;
        }
        let message = node.permission_message().or_else(|| self.root().permission_message());
        Some(MatchOutcome::PermissionDenied(message.map(str::to_string)))
    }
}
