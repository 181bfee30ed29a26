//! Rule identifiers, severities and rule values.

use crate::error::ModelError;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Severity level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule is disabled.
    Off,
    /// Violations are reported but do not fail the run.
    Warn,
    /// Violations fail the run.
    Error,
}

impl Severity {
    /// Parses a severity from a document value: a keyword or 0, 1, 2.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownSeverity`] for anything else.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => s.parse(),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(Self::Off),
                Some(1) => Ok(Self::Warn),
                Some(2) => Ok(Self::Error),
                _ => Err(ModelError::UnknownSeverity {
                    value: n.to_string(),
                }),
            },
            other => Err(ModelError::UnknownSeverity {
                value: other.to_string(),
            }),
        }
    }

    /// Returns the numeric form used by the engine (0, 1, 2).
    #[must_use]
    pub fn as_number(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Warn => 1,
            Self::Error => 2,
        }
    }
}

impl FromStr for Severity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ModelError::UnknownSeverity {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A validated rule identifier such as `semi`, `import/extensions` or
/// `@typescript-eslint/no-shadow`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new rule name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty, contains whitespace, or has an
    /// empty segment around a `/`.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyRuleName);
        }
        let bare = name.strip_prefix('@').unwrap_or(name);
        if name.chars().any(char::is_whitespace) || bare.split('/').any(str::is_empty) {
            return Err(ModelError::InvalidRuleName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the plugin namespace, if the rule belongs to a plugin.
    ///
    /// `import/extensions` → `import`, `@typescript-eslint/semi` →
    /// `@typescript-eslint`, `@scope/plugin/rule` → `@scope/plugin`.
    #[must_use]
    pub fn plugin(&self) -> Option<&str> {
        let (namespace, _) = self.0.rsplit_once('/')?;
        Some(namespace)
    }
}

impl Borrow<str> for RuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RuleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Severity plus rule-specific options.
///
/// Disabling a rule discards its options; an enabled rule carries the
/// options in the order they were written.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    /// Rule is disabled.
    Off,
    /// Rule reports warnings with the given options.
    Warn(Vec<Value>),
    /// Rule reports errors with the given options.
    Error(Vec<Value>),
}

impl RuleValue {
    /// Builds a value from a severity and its options.
    #[must_use]
    pub fn new(severity: Severity, options: Vec<Value>) -> Self {
        match severity {
            Severity::Off => Self::Off,
            Severity::Warn => Self::Warn(options),
            Severity::Error => Self::Error(options),
        }
    }

    /// Parses `severity` or `[severity, ...options]`.
    ///
    /// # Errors
    ///
    /// Returns error on an empty sequence, a non-severity head, or any other
    /// value shape.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(_) | Value::Number(_) => {
                Ok(Self::new(Severity::from_value(value)?, vec![]))
            }
            Value::Array(items) => {
                let (head, options) =
                    items
                        .split_first()
                        .ok_or_else(|| ModelError::MalformedRuleValue {
                            reason: "empty sequence, expected [severity, ...options]".to_string(),
                        })?;
                Ok(Self::new(Severity::from_value(head)?, options.to_vec()))
            }
            other => Err(ModelError::MalformedRuleValue {
                reason: format!("expected severity or [severity, ...options], got `{other}`"),
            }),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Off => Severity::Off,
            Self::Warn(_) => Severity::Warn,
            Self::Error(_) => Severity::Error,
        }
    }

    /// Returns the options (empty for [`RuleValue::Off`]).
    #[must_use]
    pub fn options(&self) -> &[Value] {
        match self {
            Self::Off => &[],
            Self::Warn(options) | Self::Error(options) => options,
        }
    }

    /// Returns `true` unless the rule is off.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl Serialize for RuleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let options = self.options();
        if options.is_empty() {
            return self.severity().serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(options.len() + 1))?;
        seq.serialize_element(&self.severity())?;
        for option in options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options();
        if options.is_empty() {
            return write!(f, "{}", self.severity());
        }
        write!(f, "[{}", self.severity())?;
        for option in options {
            write!(f, ", {option}")?;
        }
        write!(f, "]")
    }
}

/// A mapping of rule names to values, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeMap<RuleName, RuleValue>);

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a rule, returning the value it replaced.
    pub fn insert(&mut self, name: RuleName, value: RuleValue) -> Option<RuleValue> {
        self.0.insert(name, value)
    }

    /// Gets a rule value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleValue> {
        self.0.get(name)
    }

    /// Returns `true` if the rule is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no rules are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleName, &RuleValue)> {
        self.0.iter()
    }

    /// Lays `other` on top of `self`.
    ///
    /// Each rule in `other` replaces the whole entry for that name; options
    /// are never merged. Returns how many existing entries were replaced.
    pub fn overlay(&mut self, other: &RuleSet) -> usize {
        let mut replaced = 0;
        for (name, value) in &other.0 {
            if let Some(previous) = self.0.insert(name.clone(), value.clone()) {
                tracing::trace!(rule = %name, from = %previous, to = %value, "rule replaced");
                replaced += 1;
            }
        }
        replaced
    }
}

impl FromIterator<(RuleName, RuleValue)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (RuleName, RuleValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
