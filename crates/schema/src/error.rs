//! Error types.
//!
//! Validation never stops at the first problem: every failure becomes a
//! [`ValidationError`] and the whole set travels as [`ValidationErrors`].
//! Problems with a schema definition itself surface once, from the build
//! step, as [`SchemaError`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{FieldPath, PathSegment};
use crate::tree::ErrorTree;

/// Outcome of validating a value: the cleaned output, or every error found.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Machine-readable category of a validation failure.
///
/// Serialized names are part of the wire contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Value has the wrong JSON type for its node.
    #[serde(rename = "invalid_type")]
    InvalidType,
    /// Value is absent, null, or an empty required string.
    #[serde(rename = "required")]
    Required,
    /// Value is below a lower bound (length or magnitude).
    #[serde(rename = "min")]
    Min,
    /// Value is above an upper bound (length or magnitude).
    #[serde(rename = "max")]
    Max,
    /// String does not match its pattern.
    #[serde(rename = "pattern")]
    Pattern,
    /// Value is not one of the allowed enum members.
    #[serde(rename = "invalid_enum_value")]
    InvalidEnumValue,
    /// Caller supplied a value for a read-only field.
    #[serde(rename = "readOnly")]
    ReadOnly,
    /// Catch-all for failures without a more specific code.
    #[serde(rename = "validation_error")]
    ValidationError,
}

impl ErrorCode {
    /// The serialized name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::Required => "required",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pattern => "pattern",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::ReadOnly => "readOnly",
            Self::ValidationError => "validation_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
///
/// `path` is relative to wherever the error currently sits: it is empty where
/// the error is raised and gains a segment each time it passes up through an
/// object field or array element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: FieldPath,
    pub code: ErrorCode,
    pub message: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    /// A root-level error with no detail fields.
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: FieldPath::root(),
            code,
            message: message.into(),
            expected: None,
            received: None,
            value: None,
        }
    }

    /// Wrong JSON type. `received` records the JSON type name of the input.
    pub fn invalid_type(
        expected: &str,
        received: Option<&Value>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorCode::InvalidType, message)
            .with_expected(expected)
            .with_received(json_type_name(received))
    }

    /// Missing or empty required value.
    pub fn required(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::Required, message)
    }

    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    #[must_use]
    pub fn with_received(mut self, received: impl Into<Value>) -> Self {
        self.received = Some(received.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: FieldPath) -> Self {
        self.path = path;
        self
    }

    /// Prefix the path with an enclosing field or index.
    #[must_use]
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.prepend(segment);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// JSON type name of a raw value, `"undefined"` when absent.
#[must_use]
pub fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// A non-empty, ordered collection of validation failures.
///
/// Errors appear in the order the walk found them: object fields in
/// declaration order, array elements by index, constraint checks in a fixed
/// per-kind order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

#[allow(clippy::len_without_is_empty)] // never empty
impl ValidationErrors {
    /// A collection holding one error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// `None` when `errors` is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first error found.
    #[must_use]
    pub fn first(&self) -> &ValidationError {
        &self.errors[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every error from `other`, keeping order.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Prefix every error path with an enclosing field or index.
    #[must_use]
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        let segment = segment.into();
        for error in &mut self.errors {
            error.path.prepend(segment.clone());
        }
        self
    }

    /// Flat `"a.b: message"` lines; root errors render as the bare message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Error codes in order.
    #[must_use]
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Errors whose path equals `path` exactly.
    pub fn at<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| &e.path == path)
    }

    /// Nest the errors by path; see [`ErrorTree`].
    #[must_use]
    pub fn error_tree(&self) -> ErrorTree {
        ErrorTree::from_errors(&self.errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Failure from the throwing parse entry points.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input failed validation.
    #[error("validation failed with {n} error(s):\n{0}", n = .0.len())]
    Validation(ValidationErrors),

    /// The validated output could not be converted into the requested type.
    #[error("validated value does not fit the target type: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl ParseError {
    /// Broad error category for grouping in logs and metrics.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::Validation(_) => "validation",
            Self::Deserialize(_) => "serialization",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError.as_str(),
            Self::Deserialize(_) => "deserialize_error",
        }
    }

    /// The validation errors, if this is a validation failure.
    #[must_use]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Deserialize(_) => None,
        }
    }
}

impl From<ValidationErrors> for ParseError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A schema definition that cannot be built.
///
/// `path` is the location of the offending node inside the definition,
/// rendered the same way as a [`FieldPath`] (`(root)` for the top node).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A pattern does not compile.
    #[error("invalid pattern `{pattern}` at `{path}`: {reason}")]
    InvalidPattern {
        path: String,
        pattern: String,
        reason: String,
    },

    /// An enum with no members.
    #[error("enum at `{path}` has no values")]
    EmptyEnum { path: String },

    /// A default value the node could never produce.
    #[error("invalid default at `{path}`: {reason}")]
    InvalidDefault { path: String, reason: String },

    /// A lower bound above its upper bound.
    #[error("invalid bounds at `{path}`: min {min} is greater than max {max}")]
    InvalidBounds {
        path: String,
        min: String,
        max: String,
    },

    /// A constraint rule that makes no sense for the node's kind.
    #[error("rule `{rule}` does not apply to {kind} at `{path}`")]
    InapplicableRule {
        path: String,
        rule: String,
        kind: String,
    },

    /// A dependency rule with an empty path or an empty segment.
    #[error("malformed dependency path `{dependency}` at `{path}`")]
    EmptyDependencyPath { path: String, dependency: String },

    /// A predicate condition naming nothing in the registry.
    #[error("unknown predicate `{name}` at `{path}`")]
    UnknownPredicate { path: String, name: String },
}

impl SchemaError {
    /// Broad error category for grouping in logs and metrics.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::InvalidPattern { .. } => "format",
            Self::EmptyEnum { .. } => "definition",
            Self::InvalidDefault { .. } => "value",
            Self::InvalidBounds { .. } => "definition",
            Self::InapplicableRule { .. } => "definition",
            Self::EmptyDependencyPath { .. } => "dependency",
            Self::UnknownPredicate { .. } => "dependency",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidPattern { .. } => "SCHEMA_INVALID_PATTERN",
            Self::EmptyEnum { .. } => "SCHEMA_EMPTY_ENUM",
            Self::InvalidDefault { .. } => "SCHEMA_INVALID_DEFAULT",
            Self::InvalidBounds { .. } => "SCHEMA_INVALID_BOUNDS",
            Self::InapplicableRule { .. } => "SCHEMA_INAPPLICABLE_RULE",
            Self::EmptyDependencyPath { .. } => "SCHEMA_EMPTY_DEPENDENCY_PATH",
            Self::UnknownPredicate { .. } => "SCHEMA_UNKNOWN_PREDICATE",
        }
    }

    /// Location of the offending node.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidPattern { path, .. }
            | Self::EmptyEnum { path }
            | Self::InvalidDefault { path, .. }
            | Self::InvalidBounds { path, .. }
            | Self::InapplicableRule { path, .. }
            | Self::EmptyDependencyPath { path, .. }
            | Self::UnknownPredicate { path, .. } => path,
        }
    }
}
