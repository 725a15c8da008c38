//! Specification document model and the immutable command it builds.

use super::error::{Result, SpecError};
use crate::duration::parse_duration;
use crate::tree::ArgumentTree;
use crate::value::{Value, opt_scalar};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Ordered mapping from action kind to its payload.
///
/// Entries run in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ActionSet {
    entries: IndexMap<String, Value>,
}

impl ActionSet {
    /// Creates an empty action set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping earlier entries in front.
    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        self.entries.insert(kind.into(), payload.into());
        self
    }

    /// Iterates `(kind, payload)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(kind, payload)| (kind.as_str(), payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Phased execution block: a countdown with optional per-second actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DelaySpec {
    /// Countdown length, e.g. `"5 seconds"`.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub length: Option<String>,

    /// Actions run on every tick while the countdown is pending.
    #[serde(default, rename = "per_second-actions", alias = "per_second_actions")]
    pub per_second_actions: Option<ActionSet>,
}

impl DelaySpec {
    /// Countdown length in whole seconds; malformed lengths count as zero.
    pub fn length_secs(&self) -> u64 {
        self.length.as_deref().map_or(0, |text| parse_duration(text).as_secs())
    }

    /// True when the block carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.length.is_none() && self.per_second_actions.as_ref().is_none_or(ActionSet::is_empty)
    }
}

/// One argument node as written in a specification unit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeDefinition {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub permission: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub permission_message: Option<String>,

    /// Declared type of a `[dynamic]` placeholder.
    #[serde(default, rename = "type", deserialize_with = "opt_scalar")]
    pub value_type: Option<String>,

    /// Message shown when input fails the declared type; `%input%` is replaced.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub type_error: Option<String>,

    #[serde(default)]
    pub actions: Option<ActionSet>,

    #[serde(default)]
    pub delay: Option<DelaySpec>,

    #[serde(default)]
    pub arguments: IndexMap<String, NodeDefinition>,
}

/// A whole specification unit (one file).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandDefinition {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub permission: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub permission_message: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub usage_message: Option<String>,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub cost: f64,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub cooldown: Option<String>,

    #[serde(default)]
    pub actions: Option<ActionSet>,

    #[serde(default)]
    pub delay: Option<DelaySpec>,

    #[serde(default)]
    pub arguments: IndexMap<String, NodeDefinition>,
}

impl CommandDefinition {
    /// The root of the argument tree: the command's own permission,
    /// actions, delay and children.
    pub(crate) fn root_node(&self) -> NodeDefinition {
        NodeDefinition {
            permission: self.permission.clone(),
            permission_message: self.permission_message.clone(),
            value_type: None,
            type_error: None,
            actions: self.actions.clone(),
            delay: self.delay.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

/// An immutable, fully built command.
///
/// A reload never mutates a `CommandSpec`; it builds a new set and swaps it
/// in, so anything still holding an `Arc<CommandSpec>` sees a stable tree.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    usage_message: Option<String>,
    aliases: Vec<String>,
    cost: f64,
    cooldown: Option<String>,
    tree: ArgumentTree,
    source: Option<PathBuf>,
}

impl CommandSpec {
    /// Builds a command from its parsed definition.
    pub fn from_definition(name: &str, definition: &CommandDefinition) -> Result<Self> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SpecError::InvalidDefinition(format!(
                "command name '{}' must be a single non-empty word",
                name
            )));
        }
        if !definition.cost.is_finite() {
            return Err(SpecError::InvalidDefinition(format!(
                "cost of '{}' is not a finite number",
                name
            )));
        }
        if let Some(alias) = definition.aliases.iter().find(|a| a.is_empty() || a.contains(' ')) {
            return Err(SpecError::InvalidDefinition(format!(
                "alias '{}' of '{}' must be a single non-empty word",
                alias, name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            usage_message: definition.usage_message.clone(),
            aliases: definition.aliases.clone(),
            cost: definition.cost.max(0.0),
            cooldown: definition.cooldown.clone().filter(|c| !c.trim().is_empty()),
            tree: ArgumentTree::build(name, &definition.root_node()),
            source: None,
        })
    }

    /// Parses a YAML unit.
    pub fn from_yaml_str(name: &str, text: &str) -> Result<Self> {
        let definition: CommandDefinition = serde_yaml::from_str(text)?;
        Self::from_definition(name, &definition)
    }

    /// Parses a TOML unit.
    pub fn from_toml_str(name: &str, text: &str) -> Result<Self> {
        let definition: CommandDefinition = toml::from_str(text)?;
        Self::from_definition(name, &definition)
    }

    #[must_use]
    pub(crate) fn with_source(mut self, source: &Path) -> Self {
        self.source = Some(source.to_path_buf());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Permission required to run the command at all.
    pub fn permission(&self) -> Option<&str> {
        self.tree.root().permission()
    }

    pub fn permission_message(&self) -> Option<&str> {
        self.tree.root().permission_message()
    }

    /// Usage message, defaulting to `/<name>`.
    pub fn usage(&self) -> String {
        self.usage_message.clone().unwrap_or_else(|| format!("/{}", self.name))
    }

    /// Monetary cost per invocation (never negative).
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Raw cooldown string as written.
    pub fn cooldown(&self) -> Option<&str> {
        self.cooldown.as_deref()
    }

    /// Parsed cooldown; zero when absent or malformed.
    pub fn cooldown_duration(&self) -> Duration {
        self.cooldown.as_deref().map_or(Duration::ZERO, parse_duration)
    }

    pub fn tree(&self) -> &ArgumentTree {
        &self.tree
    }

    /// File this command was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
