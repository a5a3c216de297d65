//! The validation walk.
//!
//! The walk follows the schema tree and the input in lockstep, so recursion
//! depth is bounded by the schema, never by the input. Errors are raised
//! with an empty path and prefixed on the way back up.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::dependency::Scopes;
use crate::error::{ErrorCode, ValidationError, ValidationErrors, ValidationResult};
use crate::node::{ArrayNode, Bound, EnumNode, NodeKind, NumberNode, ObjectNode, SchemaNode, StringNode};
use crate::path::FieldPath;

/// Validate `value` against `root`. `Ok(None)` means an absent output.
pub(crate) fn run<'a>(
    root: &'a SchemaNode,
    value: Option<&'a Value>,
) -> ValidationResult<Option<Value>> {
    Walker::default().visit(root, value, false)
}

#[derive(Default)]
struct Walker<'a> {
    scopes: Scopes<'a>,
    /// Location of the node being visited, for tracing only.
    path: FieldPath,
}

fn is_missing(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

fn message(custom: &Option<String>, fallback: &'static str) -> Cow<'static, str> {
    match custom {
        Some(text) => Cow::Owned(text.clone()),
        None => Cow::Borrowed(fallback),
    }
}

fn finish(errors: Vec<ValidationError>, output: Value) -> ValidationResult<Option<Value>> {
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(Some(output)),
    }
}

impl<'a> Walker<'a> {
    /// `defaulted` is set once a `Default` wrapper has substituted the value
    /// being checked, so read-only checks let it through.
    fn visit(
        &mut self,
        node: &'a SchemaNode,
        value: Option<&'a Value>,
        defaulted: bool,
    ) -> ValidationResult<Option<Value>> {
        if !node.activation.iter().all(|rule| rule.is_satisfied(&self.scopes)) {
            tracing::trace!(path = %self.path, "dependencies not met, node skipped");
            return Ok(None);
        }

        match (&node.kind, value.filter(|v| !v.is_null())) {
            (NodeKind::Nullable(inner), _) => match value {
                Some(Value::Null) => Ok(Some(Value::Null)),
                _ => self.visit(inner, value, defaulted),
            },
            (NodeKind::Optional(inner), _) => {
                if is_missing(value) && !inner.has_default() {
                    Ok(None)
                } else {
                    self.visit(inner, value, defaulted)
                }
            }
            (NodeKind::Default(d), _) => {
                if is_missing(value) {
                    self.visit(&d.inner, Some(&d.value), true)
                } else {
                    self.visit(&d.inner, value, defaulted)
                }
            }
            (_, None) if node.required => {
                let fallback = required_message(node);
                Err(ValidationError::required(message(&node.required_message, fallback)).into())
            }
            (_, None) => Ok(value.cloned()),
            (NodeKind::String(s), Some(present)) => check_string(node, s, present, defaulted),
            (NodeKind::Number(n), Some(present)) => check_number(n, present),
            (NodeKind::Boolean, Some(present)) => check_boolean(present),
            (NodeKind::Enum(e), Some(present)) => check_enum(e, present),
            (NodeKind::Array(a), Some(present)) => self.array(a, present, defaulted),
            (NodeKind::Object(o), Some(present)) => self.object(o, present, defaulted),
        }
    }

    fn array(
        &mut self,
        node: &'a ArrayNode,
        value: &'a Value,
        defaulted: bool,
    ) -> ValidationResult<Option<Value>> {
        let Value::Array(items) = value else {
            return Err(ValidationError::invalid_type("array", Some(value), "Invalid array").into());
        };

        let mut errors = Vec::new();
        check_length(
            items.len(),
            node.min_length.as_ref(),
            node.max_length.as_ref(),
            ("Array is too short", "Array is too long"),
            &mut errors,
        );

        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push(index);
            let result = self.visit(&node.items, Some(item), defaulted);
            self.path.pop();
            match result {
                Ok(item) => output.push(item.unwrap_or(Value::Null)),
                Err(e) => errors.extend(e.prefixed(index)),
            }
        }

        finish(errors, Value::Array(output))
    }

    fn object(
        &mut self,
        node: &'a ObjectNode,
        value: &'a Value,
        defaulted: bool,
    ) -> ValidationResult<Option<Value>> {
        let Value::Object(input) = value else {
            return Err(ValidationError::invalid_type("object", Some(value), "Invalid object").into());
        };

        self.scopes.push(input);
        let mut errors = Vec::new();
        let mut output = Map::new();
        for (key, field) in &node.fields {
            self.path.push(key.as_str());
            let result = self.visit(field, input.get(key), defaulted);
            self.path.pop();
            match result {
                Ok(Some(v)) => {
                    output.insert(key.clone(), v);
                }
                Ok(None) => {}
                Err(e) => errors.extend(e.prefixed(key.as_str())),
            }
        }
        self.scopes.pop();

        finish(errors, Value::Object(output))
    }
}

fn required_message(node: &SchemaNode) -> &'static str {
    match node.kind {
        NodeKind::String(_) => "String is required",
        NodeKind::Number(_) => "Number is required",
        NodeKind::Boolean => "Boolean is required",
        NodeKind::Enum(_) => "Enum value is required",
        NodeKind::Array(_) => "Array is required",
        NodeKind::Object(_) => "Object is required",
        _ => "Required",
    }
}

fn check_string(
    node: &SchemaNode,
    s: &StringNode,
    value: &Value,
    defaulted: bool,
) -> ValidationResult<Option<Value>> {
    let Value::String(text) = value else {
        return Err(ValidationError::invalid_type("string", Some(value), "Invalid string").into());
    };

    let mut errors = Vec::new();
    if let Some(pattern) = &s.pattern {
        if !pattern.regex.is_match(text) {
            errors.push(
                ValidationError::new(
                    ErrorCode::Pattern,
                    message(&pattern.message, "Invalid format"),
                )
                .with_expected(pattern.source.clone())
                .with_value(text.clone()),
            );
        }
    }
    if node.required && text.is_empty() {
        errors.push(ValidationError::required(message(
            &node.required_message,
            "String is required",
        )));
    }
    check_length(
        text.chars().count(),
        s.min_length.as_ref(),
        s.max_length.as_ref(),
        ("String is too short", "String is too long"),
        &mut errors,
    );
    if let Some(read_only) = &s.read_only {
        if !defaulted {
            errors.push(
                ValidationError::new(
                    ErrorCode::ReadOnly,
                    message(&read_only.message, "String is read-only"),
                )
                .with_value(text.clone()),
            );
        }
    }

    finish(errors, value.clone())
}

fn check_length(
    len: usize,
    min: Option<&Bound<usize>>,
    max: Option<&Bound<usize>>,
    (too_short, too_long): (&'static str, &'static str),
    errors: &mut Vec<ValidationError>,
) {
    if let Some(min) = min.filter(|b| len < b.limit) {
        errors.push(
            ValidationError::new(ErrorCode::Min, message(&min.message, too_short))
                .with_expected(min.limit)
                .with_received(len),
        );
    }
    if let Some(max) = max.filter(|b| len > b.limit) {
        errors.push(
            ValidationError::new(ErrorCode::Max, message(&max.message, too_long))
                .with_expected(max.limit)
                .with_received(len),
        );
    }
}

fn check_number(n: &NumberNode, value: &Value) -> ValidationResult<Option<Value>> {
    let Some(number) = value.as_f64() else {
        return Err(ValidationError::invalid_type("number", Some(value), "Invalid number").into());
    };

    let mut errors = Vec::new();
    if let Some(min) = n.min.as_ref().filter(|b| number < b.limit) {
        errors.push(
            ValidationError::new(ErrorCode::Min, message(&min.message, "Number is too small"))
                .with_expected(min.limit)
                .with_value(value.clone()),
        );
    }
    if let Some(max) = n.max.as_ref().filter(|b| number > b.limit) {
        errors.push(
            ValidationError::new(ErrorCode::Max, message(&max.message, "Number is too large"))
                .with_expected(max.limit)
                .with_value(value.clone()),
        );
    }
    finish(errors, value.clone())
}

fn check_boolean(value: &Value) -> ValidationResult<Option<Value>> {
    if value.is_boolean() {
        Ok(Some(value.clone()))
    } else {
        Err(ValidationError::invalid_type("boolean", Some(value), "Invalid boolean").into())
    }
}

fn check_enum(e: &EnumNode, value: &Value) -> ValidationResult<Option<Value>> {
    let member = value
        .as_str()
        .is_some_and(|v| e.values.iter().any(|m| m == v));
    if member {
        return Ok(Some(value.clone()));
    }
    Err(ValidationError::new(
        ErrorCode::InvalidEnumValue,
        message(&e.message, "Invalid enum value"),
    )
    .with_expected(e.values.clone())
    .with_received(value.clone())
    .into())
}
