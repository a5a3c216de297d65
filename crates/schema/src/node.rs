//! The frozen schema tree.
//!
//! [`SchemaDef::build`] compiles a definition into a [`Schema`]: patterns
//! and dependency rules are compiled once, bounds and enum defaults are
//! checked, and children are shared behind `Arc`. Nothing on a built schema
//! can be mutated.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::def::SchemaDef;
use crate::dependency::{ActivationRule, DependencyRule, PredicateRegistry};
use crate::descriptor::{self, Descriptor};
use crate::error::{ParseError, SchemaError, ValidationResult};
use crate::kind::{SchemaKind, StringKind};
use crate::metadata::NodeMeta;
use crate::path::FieldPath;
use crate::types::*;
use crate::validate;
use crate::validation::ValidationRule;

/// A built, immutable schema. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Schema {
    root: Arc<SchemaNode>,
}

impl Schema {
    pub(crate) fn compile(def: SchemaDef, registry: &PredicateRegistry) -> Result<Self, SchemaError> {
        let mut path = FieldPath::root();
        let root = compile_node(def, registry, &mut path)?;
        tracing::trace!(kind = ?root.kind(), "schema built");
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        self.root.kind()
    }

    /// Validate `value`, collecting every error.
    ///
    /// `None` stands for an absent value. An absent output (an optional root
    /// with no input) comes back as `Value::Null`.
    pub fn safe_parse<'a>(&self, value: impl Into<Option<&'a Value>>) -> ValidationResult<Value> {
        let result = validate::run(&self.root, value.into());
        match &result {
            Ok(_) => tracing::debug!(kind = ?self.kind(), "input valid"),
            Err(errors) => tracing::debug!(
                kind = ?self.kind(),
                errors = errors.len(),
                "input invalid"
            ),
        }
        result.map(|output| output.unwrap_or(Value::Null))
    }

    /// Like [`safe_parse`](Self::safe_parse), with the error wrapped in a
    /// [`ParseError`].
    pub fn parse<'a>(&self, value: impl Into<Option<&'a Value>>) -> Result<Value, ParseError> {
        Ok(self.safe_parse(value)?)
    }

    /// Validate, then deserialize the cleaned output into `T`.
    pub fn parse_as<'a, T: DeserializeOwned>(
        &self,
        value: impl Into<Option<&'a Value>>,
    ) -> Result<T, ParseError> {
        let output = self.parse(value)?;
        serde_json::from_value(output).map_err(ParseError::Deserialize)
    }

    /// Project the schema into a serializable descriptor. Recomputed on
    /// every call.
    #[must_use]
    pub fn descriptor(&self) -> Descriptor {
        descriptor::describe(&self.root)
    }
}

/// One node of a built schema.
#[derive(Debug)]
pub struct SchemaNode {
    pub(crate) kind: NodeKind,
    pub(crate) required: bool,
    pub(crate) required_message: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) activation: Vec<ActivationRule>,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    String(StringNode),
    Number(NumberNode),
    Boolean,
    Enum(EnumNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Optional(Arc<SchemaNode>),
    Nullable(Arc<SchemaNode>),
    Default(DefaultNode),
}

/// A limit plus its optional custom message.
#[derive(Debug, Clone)]
pub(crate) struct Bound<T> {
    pub(crate) limit: T,
    pub(crate) message: Option<String>,
}

#[derive(Debug)]
pub(crate) struct CompiledPattern {
    pub(crate) source: String,
    pub(crate) regex: Regex,
    pub(crate) message: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ReadOnly {
    pub(crate) message: Option<String>,
}

#[derive(Debug)]
pub(crate) struct StringNode {
    pub(crate) kind: StringKind,
    pub(crate) placeholder: Option<String>,
    pub(crate) datalist: Vec<String>,
    pub(crate) pattern: Option<CompiledPattern>,
    pub(crate) min_length: Option<Bound<usize>>,
    pub(crate) max_length: Option<Bound<usize>>,
    pub(crate) read_only: Option<ReadOnly>,
}

#[derive(Debug)]
pub(crate) struct NumberNode {
    pub(crate) min: Option<Bound<f64>>,
    pub(crate) max: Option<Bound<f64>>,
}

#[derive(Debug)]
pub(crate) struct EnumNode {
    pub(crate) values: Vec<String>,
    pub(crate) message: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ArrayNode {
    pub(crate) items: Arc<SchemaNode>,
    pub(crate) min_length: Option<Bound<usize>>,
    pub(crate) max_length: Option<Bound<usize>>,
}

#[derive(Debug)]
pub(crate) struct ObjectNode {
    pub(crate) fields: IndexMap<String, Arc<SchemaNode>>,
}

#[derive(Debug)]
pub(crate) struct DefaultNode {
    pub(crate) inner: Arc<SchemaNode>,
    pub(crate) value: Value,
}

impl SchemaNode {
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        match &self.kind {
            NodeKind::String(_) => SchemaKind::String,
            NodeKind::Number(_) => SchemaKind::Number,
            NodeKind::Boolean => SchemaKind::Boolean,
            NodeKind::Enum(_) => SchemaKind::Enum,
            NodeKind::Array(_) => SchemaKind::Array,
            NodeKind::Object(_) => SchemaKind::Object,
            NodeKind::Optional(_) => SchemaKind::Optional,
            NodeKind::Nullable(_) => SchemaKind::Nullable,
            NodeKind::Default(_) => SchemaKind::Default,
        }
    }

    /// The wrapped node, for wrapper kinds.
    #[must_use]
    pub fn inner(&self) -> Option<&SchemaNode> {
        match &self.kind {
            NodeKind::Optional(inner) | NodeKind::Nullable(inner) => Some(inner.as_ref()),
            NodeKind::Default(d) => Some(d.inner.as_ref()),
            _ => None,
        }
    }

    /// This node followed by every node it wraps, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &SchemaNode> {
        std::iter::successors(Some(self), |node| node.inner())
    }

    /// The first non-wrapper node in the chain.
    #[must_use]
    pub fn innermost(&self) -> &SchemaNode {
        self.chain().last().unwrap_or(self)
    }

    /// Whether the input must be present: false when an `optional` wrapper
    /// is in the chain or the innermost node is not required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.innermost().required && !self.chain().any(|n| matches!(n.kind, NodeKind::Optional(_)))
    }

    /// Whether explicit null is accepted.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.chain().any(|n| matches!(n.kind, NodeKind::Nullable(_)))
    }

    /// The outermost default in the chain.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.chain().find_map(|n| match &n.kind {
            NodeKind::Default(d) => Some(&d.value),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value().is_some()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Dependency rules declared on this node (not on nodes it wraps).
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyRule> {
        self.activation.iter().map(|a| &a.rule)
    }

    /// Named child of the innermost object node.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match &self.innermost().kind {
            NodeKind::Object(o) => o.fields.get(name).map(Arc::as_ref),
            _ => None,
        }
    }

    /// Fields of the innermost object node, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        let fields = match &self.innermost().kind {
            NodeKind::Object(o) => Some(o.fields.iter()),
            _ => None,
        };
        fields
            .into_iter()
            .flatten()
            .map(|(name, node)| (name.as_str(), node.as_ref()))
    }

    /// Item schema of the innermost array node.
    #[must_use]
    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.innermost().kind {
            NodeKind::Array(a) => Some(a.items.as_ref()),
            _ => None,
        }
    }

    /// Members of the innermost enum node.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.innermost().kind {
            NodeKind::Enum(e) => Some(&e.values),
            _ => None,
        }
    }

    /// Preset of the innermost string node.
    #[must_use]
    pub fn string_kind(&self) -> Option<StringKind> {
        match &self.innermost().kind {
            NodeKind::String(s) => Some(s.kind),
            _ => None,
        }
    }
}

fn compile_node(
    def: SchemaDef,
    registry: &PredicateRegistry,
    path: &mut FieldPath,
) -> Result<SchemaNode, SchemaError> {
    let (meta, kind) = match def {
        SchemaDef::String(StringDef {
            meta,
            kind,
            placeholder,
            datalist,
            validation,
        }) => {
            let node = compile_string(kind, placeholder, datalist, validation, path)?;
            (meta, NodeKind::String(node))
        }
        SchemaDef::Number(NumberDef { meta, validation }) => {
            (meta, NodeKind::Number(compile_number(validation, path)?))
        }
        SchemaDef::Boolean(BooleanDef { meta }) => (meta, NodeKind::Boolean),
        SchemaDef::Enum(EnumDef {
            meta,
            values,
            message,
        }) => {
            if values.is_empty() {
                return Err(SchemaError::EmptyEnum {
                    path: path.to_string(),
                });
            }
            (meta, NodeKind::Enum(EnumNode { values, message }))
        }
        SchemaDef::Array(ArrayDef {
            meta,
            items,
            validation,
        }) => {
            let (min_length, max_length) = length_bounds(validation, "array", path)?;
            path.push("items");
            let items = compile_node(*items, registry, path);
            path.pop();
            let node = ArrayNode {
                items: Arc::new(items?),
                min_length,
                max_length,
            };
            (meta, NodeKind::Array(node))
        }
        SchemaDef::Object(ObjectDef { meta, fields }) => {
            let mut compiled = IndexMap::with_capacity(fields.len());
            for (name, field) in fields {
                path.push(name.as_str());
                let node = compile_node(field, registry, path);
                path.pop();
                compiled.insert(name, Arc::new(node?));
            }
            (meta, NodeKind::Object(ObjectNode { fields: compiled }))
        }
        SchemaDef::Optional(WrapperDef { meta, mut inner }) => {
            // an optional leaf never rejects empty input
            inner.innermost_mut().meta_mut().required = false;
            let inner = compile_wrapped(*inner, &meta, registry, path)?;
            (meta, NodeKind::Optional(Arc::new(inner)))
        }
        SchemaDef::Nullable(WrapperDef { meta, inner }) => {
            let inner = compile_wrapped(*inner, &meta, registry, path)?;
            (meta, NodeKind::Nullable(Arc::new(inner)))
        }
        SchemaDef::Default(DefaultDef { meta, value, inner }) => {
            let inner = compile_wrapped(*inner, &meta, registry, path)?;
            check_default(&inner, &value, path)?;
            let node = DefaultNode {
                inner: Arc::new(inner),
                value,
            };
            (meta, NodeKind::Default(node))
        }
    };

    let activation = meta
        .depends_on
        .iter()
        .map(|rule| rule.compile(registry, path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SchemaNode {
        kind,
        required: meta.required,
        required_message: meta.required_message,
        description: meta.description,
        activation,
    })
}

/// Compile a wrapped definition, pushing the wrapper's required settings
/// down to the innermost node where the required check runs.
fn compile_wrapped(
    mut inner: SchemaDef,
    wrapper: &NodeMeta,
    registry: &PredicateRegistry,
    path: &mut FieldPath,
) -> Result<SchemaNode, SchemaError> {
    let leaf = inner.innermost_mut().meta_mut();
    if !wrapper.required {
        leaf.required = false;
    }
    if let Some(message) = &wrapper.required_message {
        leaf.required_message = Some(message.clone());
    }
    compile_node(inner, registry, path)
}

fn compile_string(
    kind: StringKind,
    placeholder: Option<String>,
    datalist: Vec<String>,
    validation: Vec<ValidationRule>,
    path: &FieldPath,
) -> Result<StringNode, SchemaError> {
    let mut pattern = None;
    let mut min_length = None;
    let mut max_length = None;
    let mut read_only = None;

    for rule in validation {
        match rule {
            ValidationRule::MinLength { length, message } => {
                min_length = Some(Bound {
                    limit: length,
                    message,
                });
            }
            ValidationRule::MaxLength { length, message } => {
                max_length = Some(Bound {
                    limit: length,
                    message,
                });
            }
            ValidationRule::Pattern {
                pattern: source,
                message,
            } => pattern = Some(compile_pattern(source, message, path)?),
            ValidationRule::ReadOnly { message } => read_only = Some(ReadOnly { message }),
            other => return Err(inapplicable(&other, "string", path)),
        }
    }

    if let (None, Some(source)) = (&pattern, kind.pattern()) {
        pattern = Some(compile_pattern(source.to_owned(), None, path)?);
    }
    check_bounds(min_length.as_ref(), max_length.as_ref(), path)?;

    Ok(StringNode {
        kind,
        placeholder: placeholder.or_else(|| kind.placeholder().map(str::to_owned)),
        datalist,
        pattern,
        min_length,
        max_length,
        read_only,
    })
}

fn compile_number(
    validation: Vec<ValidationRule>,
    path: &FieldPath,
) -> Result<NumberNode, SchemaError> {
    let mut min = None;
    let mut max = None;
    for rule in validation {
        match rule {
            ValidationRule::Min { value, message } => {
                min = Some(Bound {
                    limit: value,
                    message,
                });
            }
            ValidationRule::Max { value, message } => {
                max = Some(Bound {
                    limit: value,
                    message,
                });
            }
            other => return Err(inapplicable(&other, "number", path)),
        }
    }
    check_bounds(min.as_ref(), max.as_ref(), path)?;
    Ok(NumberNode { min, max })
}

type LengthBounds = (Option<Bound<usize>>, Option<Bound<usize>>);

fn length_bounds(
    validation: Vec<ValidationRule>,
    kind: &str,
    path: &FieldPath,
) -> Result<LengthBounds, SchemaError> {
    let mut min = None;
    let mut max = None;
    for rule in validation {
        match rule {
            ValidationRule::MinLength { length, message } => {
                min = Some(Bound {
                    limit: length,
                    message,
                });
            }
            ValidationRule::MaxLength { length, message } => {
                max = Some(Bound {
                    limit: length,
                    message,
                });
            }
            other => return Err(inapplicable(&other, kind, path)),
        }
    }
    check_bounds(min.as_ref(), max.as_ref(), path)?;
    Ok((min, max))
}

fn compile_pattern(
    source: String,
    message: Option<String>,
    path: &FieldPath,
) -> Result<CompiledPattern, SchemaError> {
    match Regex::new(&source) {
        Ok(regex) => Ok(CompiledPattern {
            source,
            regex,
            message,
        }),
        Err(e) => Err(SchemaError::InvalidPattern {
            path: path.to_string(),
            pattern: source,
            reason: e.to_string(),
        }),
    }
}

fn check_bounds<T: PartialOrd + ToString>(
    min: Option<&Bound<T>>,
    max: Option<&Bound<T>>,
    path: &FieldPath,
) -> Result<(), SchemaError> {
    match (min, max) {
        (Some(min), Some(max)) if min.limit > max.limit => Err(SchemaError::InvalidBounds {
            path: path.to_string(),
            min: min.limit.to_string(),
            max: max.limit.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_default(inner: &SchemaNode, value: &Value, path: &FieldPath) -> Result<(), SchemaError> {
    if let NodeKind::Enum(e) = &inner.innermost().kind {
        let member = value.as_str().is_some_and(|v| e.values.iter().any(|m| m == v));
        if !member {
            return Err(SchemaError::InvalidDefault {
                path: path.to_string(),
                reason: "Default value must be one of the enum values".into(),
            });
        }
    }
    Ok(())
}

fn inapplicable(rule: &ValidationRule, kind: &str, path: &FieldPath) -> SchemaError {
    SchemaError::InapplicableRule {
        path: path.to_string(),
        rule: rule.name().to_owned(),
        kind: kind.to_owned(),
    }
}
