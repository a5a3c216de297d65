use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dependency::{DependencyRule, PredicateRegistry};
use crate::error::SchemaError;
use crate::kind::SchemaKind;
use crate::metadata::NodeMeta;
use crate::node::Schema;
use crate::types::*;

/// A schema definition, tagged by type.
///
/// Definitions are plain data: build them with the functions in
/// [`builder`](crate::builder) or deserialize them from a document, then
/// call [`build`](Self::build) to get a frozen [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaDef {
    String(StringDef),
    Number(NumberDef),
    Boolean(BooleanDef),
    Enum(EnumDef),
    Array(ArrayDef),
    Object(ObjectDef),
    Optional(WrapperDef),
    Nullable(WrapperDef),
    Default(DefaultDef),
}

macro_rules! delegate_meta {
    ($self:ident, $($ref:tt)+) => {
        match $self {
            Self::String(d) => $($ref)+ d.meta,
            Self::Number(d) => $($ref)+ d.meta,
            Self::Boolean(d) => $($ref)+ d.meta,
            Self::Enum(d) => $($ref)+ d.meta,
            Self::Array(d) => $($ref)+ d.meta,
            Self::Object(d) => $($ref)+ d.meta,
            Self::Optional(d) | Self::Nullable(d) => $($ref)+ d.meta,
            Self::Default(d) => $($ref)+ d.meta,
        }
    };
}

impl SchemaDef {
    /// The node kind.
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::String(_) => SchemaKind::String,
            Self::Number(_) => SchemaKind::Number,
            Self::Boolean(_) => SchemaKind::Boolean,
            Self::Enum(_) => SchemaKind::Enum,
            Self::Array(_) => SchemaKind::Array,
            Self::Object(_) => SchemaKind::Object,
            Self::Optional(_) => SchemaKind::Optional,
            Self::Nullable(_) => SchemaKind::Nullable,
            Self::Default(_) => SchemaKind::Default,
        }
    }

    /// Settings of this node (not of the node it wraps).
    #[must_use]
    pub fn meta(&self) -> &NodeMeta {
        delegate_meta!(self, &)
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        delegate_meta!(self, &mut)
    }

    /// The wrapped definition, for wrapper kinds.
    #[must_use]
    pub fn inner(&self) -> Option<&SchemaDef> {
        match self {
            Self::Optional(d) | Self::Nullable(d) => Some(&d.inner),
            Self::Default(d) => Some(&d.inner),
            _ => None,
        }
    }

    /// The first non-wrapper definition in the chain.
    #[must_use]
    pub fn innermost(&self) -> &SchemaDef {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }

    pub fn innermost_mut(&mut self) -> &mut SchemaDef {
        match self {
            Self::Optional(d) | Self::Nullable(d) => d.inner.innermost_mut(),
            Self::Default(d) => d.inner.innermost_mut(),
            other => other,
        }
    }

    /// Child definitions: the wrapped node, array items, or object fields.
    #[must_use]
    pub fn children(&self) -> Vec<&SchemaDef> {
        match self {
            Self::Optional(d) | Self::Nullable(d) => vec![&*d.inner],
            Self::Default(d) => vec![&*d.inner],
            Self::Array(d) => vec![&*d.items],
            Self::Object(d) => d.fields.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the innermost node rejects absent values.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.innermost().meta().required
    }

    /// Freeze the definition into a [`Schema`], with no predicates available.
    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::compile(self, &PredicateRegistry::default())
    }

    /// Freeze the definition, resolving predicate conditions from `registry`.
    pub fn build_with(self, registry: &PredicateRegistry) -> Result<Schema, SchemaError> {
        Schema::compile(self, registry)
    }
}

macro_rules! impl_from_def {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for SchemaDef {
                fn from(def: $ty) -> Self {
                    Self::$variant(def)
                }
            }
        )+
    };
}

impl_from_def!(
    String(StringDef),
    Number(NumberDef),
    Boolean(BooleanDef),
    Enum(EnumDef),
    Array(ArrayDef),
    Object(ObjectDef),
    Default(DefaultDef),
);

/// Composition operators available on every definition.
///
/// Each operator returns a [`SchemaDef`], so they chain:
/// `string().optional().nullable()`.
pub trait SchemaDefExt: Into<SchemaDef> + Sized {
    /// Absent or null input yields an absent output instead of an error.
    /// The innermost node is not required once built, so empty strings pass.
    fn optional(self) -> SchemaDef {
        SchemaDef::Optional(WrapperDef::new(self))
    }

    /// Explicit null is accepted and kept.
    fn nullable(self) -> SchemaDef {
        SchemaDef::Nullable(WrapperDef::new(self))
    }

    /// Absent or null input is replaced by `value` before validation.
    fn with_default(self, value: impl Into<Value>) -> SchemaDef {
        SchemaDef::Default(DefaultDef::new(self, value))
    }

    /// Replace the `required` message on the innermost node.
    fn required_with_message(self, message: impl Into<String>) -> SchemaDef {
        let mut def = self.into();
        let meta = def.innermost_mut().meta_mut();
        meta.required = true;
        meta.required_message = Some(message.into());
        def
    }

    /// Let the innermost node accept absent or null input.
    fn not_required(self) -> SchemaDef {
        let mut def = self.into();
        def.innermost_mut().meta_mut().required = false;
        def
    }

    /// Only validate this node when every rule holds.
    fn depends_on(self, rules: impl IntoIterator<Item = DependencyRule>) -> SchemaDef {
        let mut def = self.into();
        def.meta_mut().depends_on.extend(rules);
        def
    }

    /// Attach a human-readable description.
    fn describe(self, text: impl Into<String>) -> SchemaDef {
        let mut def = self.into();
        def.meta_mut().description = Some(text.into());
        def
    }

    /// Freeze into a [`Schema`]; see [`SchemaDef::build`].
    fn build(self) -> Result<Schema, SchemaError> {
        SchemaDef::build(self.into())
    }

    /// Freeze with predicates; see [`SchemaDef::build_with`].
    fn build_with(self, registry: &PredicateRegistry) -> Result<Schema, SchemaError> {
        SchemaDef::build_with(self.into(), registry)
    }
}

impl<T: Into<SchemaDef>> SchemaDefExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{boolean, enumeration, number, object, string};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn kind_matches_variant() {
        let cases: Vec<(SchemaDef, SchemaKind)> = vec![
            (string().into(), SchemaKind::String),
            (number().into(), SchemaKind::Number),
            (boolean().into(), SchemaKind::Boolean),
            (enumeration(["a"]).into(), SchemaKind::Enum),
            (object().into(), SchemaKind::Object),
            (string().optional(), SchemaKind::Optional),
            (string().nullable(), SchemaKind::Nullable),
            (string().with_default("x"), SchemaKind::Default),
        ];
        for (def, kind) in cases {
            assert_eq!(def.kind(), kind);
        }
    }

    #[test]
    fn required_propagates_to_innermost() {
        let def = string().optional().nullable().not_required();
        assert!(!def.is_required());
        // the wrappers themselves are untouched
        assert!(def.meta().required);

        let def = string()
            .with_default("x")
            .required_with_message("Name is required");
        assert_eq!(
            def.innermost().meta().required_message.as_deref(),
            Some("Name is required")
        );
    }

    #[test]
    fn depends_on_attaches_to_outermost() {
        let def = string()
            .optional()
            .depends_on([DependencyRule::equals("mode", "advanced")]);
        assert_eq!(def.meta().depends_on.len(), 1);
        assert!(def.innermost().meta().depends_on.is_empty());
    }

    #[test]
    fn children_per_kind() {
        let def: SchemaDef = object()
            .field("a", string())
            .field("b", number())
            .into();
        assert_eq!(def.children().len(), 2);
        assert_eq!(string().optional().children().len(), 1);
        assert!(SchemaDef::from(boolean()).children().is_empty());
    }

    #[test]
    fn serde_round_trip_tree() {
        let def: SchemaDef = object()
            .field("option", enumeration(["uri", "login"]).with_default("uri"))
            .field(
                "uri",
                string()
                    .min_length(1)
                    .depends_on([DependencyRule::matches("option", "uri")]),
            )
            .field("port", number().range(1.0, 65535.0).optional())
            .describe("Redis")
            .into();

        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["type"], json!("object"));
        assert_eq!(json["description"], json!("Redis"));
        assert_eq!(json["fields"]["option"]["type"], json!("default"));
        assert_eq!(json["fields"]["option"]["value"], json!("uri"));
        assert_eq!(json["fields"]["uri"]["depends_on"][0]["condition"], json!("matches"));

        let back: SchemaDef = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn builders_build_without_conversion() {
        let schema = object().field("a", string()).build().unwrap();
        assert_eq!(schema.kind(), SchemaKind::Object);
        assert_eq!(schema.parse(&json!({"a": "x"})).unwrap(), json!({"a": "x"}));

        let schema = crate::builder::array(number())
            .build_with(&PredicateRegistry::default())
            .unwrap();
        assert_eq!(schema.parse(&json!([1, 2])).unwrap(), json!([1, 2]));

        assert!(string().min_length(3).max_length(1).build().is_err());
    }
}
