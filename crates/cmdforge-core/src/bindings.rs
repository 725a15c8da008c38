//! Placeholder bindings and textual substitution.

use crate::value::Value;
use std::collections::BTreeMap;

/// Binding key always present: the sender's display name.
pub const SENDER: &str = "{sender}";

/// Binding key injected during phased execution ticks.
pub const SECONDS_REMAINING: &str = "{seconds_remaining}";

/// Placeholder keys (including their brackets) mapped to bound text.
///
/// Keys are kept sorted so substitution is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for a sender: `{sender}` only.
    pub fn for_sender(name: &str) -> Self {
        let mut bindings = Self::new();
        bindings.insert(SENDER, name);
        bindings
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Copy with one more binding.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut bindings = self.clone();
        bindings.insert(key, value);
        bindings
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces every occurrence of every key in `text`.
    ///
    /// Single left-to-right pass: at each position the longest matching key
    /// wins, and inserted text is never scanned again.
    pub fn apply(&self, text: &str) -> String {
        if self.values.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        'scan: while !rest.is_empty() {
            let mut best: Option<(&str, &str)> = None;
            for (key, value) in &self.values {
                if !key.is_empty()
                    && rest.starts_with(key.as_str())
                    && best.is_none_or(|(k, _)| key.len() > k.len())
                {
                    best = Some((key.as_str(), value.as_str()));
                }
            }
            if let Some((key, value)) = best {
                out.push_str(value);
                rest = &rest[key.len()..];
                continue 'scan;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
        out
    }
}

/// Rebuilds `value` with every string leaf substituted.
pub fn substitute(value: &Value, bindings: &Bindings) -> Value {
    match value {
        Value::String(s) => Value::String(bindings.apply(s)),
        Value::List(items) => Value::List(items.iter().map(|item| substitute(item, bindings)).collect()),
        Value::Map(map) => Value::Map(
            map.iter().map(|(key, item)| (key.clone(), substitute(item, bindings))).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sender_and_seconds() {
        let bindings = Bindings::for_sender("Alice").with(SECONDS_REMAINING, "7");
        assert_eq!(
            bindings.apply("Hello {sender}, {seconds_remaining}s left"),
            "Hello Alice, 7s left"
        );
    }

    #[test]
    fn test_replacement_not_rescanned() {
        let mut bindings = Bindings::new();
        bindings.insert("[a]", "[b]");
        bindings.insert("[b]", "boom");
        assert_eq!(bindings.apply("[a] [b]"), "[b] boom");
    }

    #[test]
    fn test_repeated_and_unbound_tokens() {
        let bindings = Bindings::for_sender("Bob");
        assert_eq!(bindings.apply("{sender}{sender} {other}"), "BobBob {other}");
    }

    #[test]
    fn test_multibyte_text() {
        let bindings = Bindings::for_sender("Zoë");
        assert_eq!(bindings.apply("§a→ {sender} ←"), "§a→ Zoë ←");
    }

    #[test]
    fn test_substitute_nested() {
        let value: Value =
            serde_yaml::from_str("who: \"{sender}\"\nlines: [\"hi {sender}\", \"plain\"]\n")
                .unwrap();
        let out = substitute(&value, &Bindings::for_sender("Alice"));
        assert_eq!(out.get_str("who"), Some("Alice"));
        assert_eq!(out.get("lines").and_then(Value::lines), Some(vec!["hi Alice", "plain"]));
    }
}
