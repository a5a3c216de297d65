//! Conditional activation.
//!
//! A node carrying [`DependencyRule`]s only takes part in validation when
//! every rule holds against the raw input. An inactive node is skipped
//! entirely: it produces no errors and no output.
//!
//! Rule paths resolve through a chain of scopes, one per enclosing object
//! being validated, innermost first. The first scope that has the path's
//! head segment as a key is where the lookup starts; the remaining segments
//! walk down from there. A path that resolves nowhere yields "absent".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::path::{DependencyPath, FieldPath};

/// A condition checked against the value a dependency path resolves to.
///
/// `None`/absent is distinct from an explicit `null` only for
/// [`Equals`](Self::Equals), [`NotEquals`](Self::NotEquals) and
/// [`OneOf`](Self::OneOf); the other conditions treat both the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    /// Value equals the given value.
    Equals { value: Value },
    /// Value is absent or differs from the given value.
    NotEquals { value: Value },
    /// Value is one of the given values.
    OneOf { values: Vec<Value> },
    /// Value, rendered as text, matches the regex. Strings match as-is,
    /// numbers and booleans by their JSON text. Anything else never matches.
    Matches { pattern: String },
    /// Value is present and not null.
    IsSet,
    /// Value is absent or null.
    IsAbsent,
    /// Value is boolean true.
    IsTrue,
    /// Value is boolean false.
    IsFalse,
    /// Numeric value is greater than the threshold.
    GreaterThan { value: f64 },
    /// Numeric value is less than the threshold.
    LessThan { value: f64 },
    /// A named predicate from the [`PredicateRegistry`] accepts the value.
    Predicate { name: String },
}

/// A single dependency: look up `field`, check it against `condition`.
///
/// Serializes flat, e.g. `{"field": "option", "condition": "matches", "pattern": "uri"}`.
/// `path` is accepted as an alias for `field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    #[serde(alias = "path")]
    pub field: DependencyPath,
    #[serde(flatten)]
    pub condition: Condition,
}

impl DependencyRule {
    pub fn new(field: impl Into<DependencyPath>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    pub fn equals(field: impl Into<DependencyPath>, value: impl Into<Value>) -> Self {
        Self::new(
            field,
            Condition::Equals {
                value: value.into(),
            },
        )
    }

    pub fn not_equals(field: impl Into<DependencyPath>, value: impl Into<Value>) -> Self {
        Self::new(
            field,
            Condition::NotEquals {
                value: value.into(),
            },
        )
    }

    pub fn one_of<V: Into<Value>>(
        field: impl Into<DependencyPath>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(
            field,
            Condition::OneOf {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn matches(field: impl Into<DependencyPath>, pattern: impl Into<String>) -> Self {
        Self::new(
            field,
            Condition::Matches {
                pattern: pattern.into(),
            },
        )
    }

    pub fn is_set(field: impl Into<DependencyPath>) -> Self {
        Self::new(field, Condition::IsSet)
    }

    pub fn is_absent(field: impl Into<DependencyPath>) -> Self {
        Self::new(field, Condition::IsAbsent)
    }

    pub fn is_true(field: impl Into<DependencyPath>) -> Self {
        Self::new(field, Condition::IsTrue)
    }

    pub fn is_false(field: impl Into<DependencyPath>) -> Self {
        Self::new(field, Condition::IsFalse)
    }

    pub fn greater_than(field: impl Into<DependencyPath>, value: f64) -> Self {
        Self::new(field, Condition::GreaterThan { value })
    }

    pub fn less_than(field: impl Into<DependencyPath>, value: f64) -> Self {
        Self::new(field, Condition::LessThan { value })
    }

    /// Defer to a predicate registered under `name` at build time.
    pub fn predicate(field: impl Into<DependencyPath>, name: impl Into<String>) -> Self {
        Self::new(field, Condition::Predicate { name: name.into() })
    }

    /// Resolve the rule's regex or predicate and check its path.
    pub(crate) fn compile(
        &self,
        registry: &PredicateRegistry,
        at: &FieldPath,
    ) -> Result<ActivationRule, SchemaError> {
        if self.field.is_malformed() {
            return Err(SchemaError::EmptyDependencyPath {
                path: at.to_string(),
                dependency: self.field.to_string(),
            });
        }

        let test = match &self.condition {
            Condition::Matches { pattern } => {
                let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                    path: at.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Test::Matches(regex)
            }
            Condition::Predicate { name } => {
                let predicate =
                    registry
                        .get(name)
                        .cloned()
                        .ok_or_else(|| SchemaError::UnknownPredicate {
                            path: at.to_string(),
                            name: name.clone(),
                        })?;
                Test::Predicate(predicate)
            }
            _ => Test::Declarative,
        };

        Ok(ActivationRule {
            rule: self.clone(),
            test,
        })
    }
}

/// A predicate usable from [`Condition::Predicate`].
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// Named predicates available to dependency rules while a schema is built.
///
/// Definitions reference predicates by name so they stay serializable; the
/// build step swaps each name for the function registered here.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Predicate>,
}

impl PredicateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Register a predicate (builder-style, consuming).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.register(name, predicate);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[derive(Clone)]
enum Test {
    Declarative,
    Matches(Regex),
    Predicate(Predicate),
}

/// A dependency rule ready for evaluation.
#[derive(Clone)]
pub(crate) struct ActivationRule {
    pub(crate) rule: DependencyRule,
    test: Test,
}

impl fmt::Debug for ActivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActivationRule").field(&self.rule).finish()
    }
}

impl ActivationRule {
    pub(crate) fn is_satisfied(&self, scopes: &Scopes<'_>) -> bool {
        let value = scopes.resolve(&self.rule.field);
        match &self.test {
            Test::Matches(regex) => match value {
                Some(Value::String(s)) => regex.is_match(s),
                Some(v @ (Value::Number(_) | Value::Bool(_))) => regex.is_match(&v.to_string()),
                _ => false,
            },
            Test::Predicate(predicate) => predicate(value),
            Test::Declarative => evaluate(&self.rule.condition, value),
        }
    }
}

fn evaluate(condition: &Condition, value: Option<&Value>) -> bool {
    let present = value.filter(|v| !v.is_null());
    match condition {
        Condition::Equals { value: expected } => value == Some(expected),
        Condition::NotEquals { value: expected } => value != Some(expected),
        Condition::OneOf { values } => value.is_some_and(|v| values.contains(v)),
        Condition::IsSet => present.is_some(),
        Condition::IsAbsent => present.is_none(),
        Condition::IsTrue => present.and_then(Value::as_bool) == Some(true),
        Condition::IsFalse => present.and_then(Value::as_bool) == Some(false),
        Condition::GreaterThan { value: threshold } => present
            .and_then(Value::as_f64)
            .is_some_and(|n| n > *threshold),
        Condition::LessThan { value: threshold } => present
            .and_then(Value::as_f64)
            .is_some_and(|n| n < *threshold),
        // compiled into dedicated tests
        Condition::Matches { .. } | Condition::Predicate { .. } => false,
    }
}

/// Objects enclosing the node being validated, outermost first.
#[derive(Debug, Default)]
pub(crate) struct Scopes<'a> {
    stack: Vec<&'a Map<String, Value>>,
}

impl<'a> Scopes<'a> {
    pub(crate) fn push(&mut self, scope: &'a Map<String, Value>) {
        self.stack.push(scope);
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn resolve(&self, path: &DependencyPath) -> Option<&'a Value> {
        let (head, rest) = path.segments().split_first()?;
        let start = self.stack.iter().rev().find_map(|scope| scope.get(head))?;
        DependencyPath::lookup_from(rest, start)
    }
}
