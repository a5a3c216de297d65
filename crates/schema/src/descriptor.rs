//! Serializable projection of a schema for form renderers.
//!
//! A descriptor is what a UI needs to draw an input for each node: the HTML
//! input type, the effective required flag, constraints, defaults and the
//! dependency rules deciding when a field is shown.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::dependency::DependencyRule;
use crate::kind::{InputType, StringKind};
use crate::node::{NodeKind, SchemaNode};

/// Settings every descriptor carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldInfo {
    /// False when an `optional` wrapper is in the chain or the node is not
    /// required.
    pub required: bool,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<DependencyRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub kind: StringKind,
    #[serde(flatten)]
    pub field: FieldInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(flatten)]
    pub field: FieldInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(flatten)]
    pub field: FieldInfo,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(flatten)]
    pub field: FieldInfo,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(flatten)]
    pub field: FieldInfo,
    /// Always exactly one element: the item descriptor.
    pub items: Vec<Descriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDescriptor {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(flatten)]
    pub field: FieldInfo,
    pub properties: IndexMap<String, Descriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Descriptor of one node, shaped by its innermost kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Descriptor {
    String(StringDescriptor),
    Number(NumberDescriptor),
    Boolean(BooleanDescriptor),
    Select(SelectDescriptor),
    Array(ArrayDescriptor),
    Object(ObjectDescriptor),
}

impl Descriptor {
    #[must_use]
    pub fn input_type(&self) -> InputType {
        match self {
            Self::String(d) => d.input_type,
            Self::Number(d) => d.input_type,
            Self::Boolean(d) => d.input_type,
            Self::Select(d) => d.input_type,
            Self::Array(d) => d.input_type,
            Self::Object(d) => d.input_type,
        }
    }

    #[must_use]
    pub fn field(&self) -> &FieldInfo {
        match self {
            Self::String(d) => &d.field,
            Self::Number(d) => &d.field,
            Self::Boolean(d) => &d.field,
            Self::Select(d) => &d.field,
            Self::Array(d) => &d.field,
            Self::Object(d) => &d.field,
        }
    }

    /// Property descriptor, for objects.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Descriptor> {
        match self {
            Self::Object(d) => d.properties.get(name),
            _ => None,
        }
    }

    /// Render as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub(crate) fn describe(node: &SchemaNode) -> Descriptor {
    let mut field = FieldInfo::default();
    let mut optional = false;
    let mut default = None;

    for link in node.chain() {
        field
            .depends_on
            .extend(link.activation.iter().map(|a| a.rule.clone()));
        if field.description.is_none() {
            field.description.clone_from(&link.description);
        }
        match &link.kind {
            NodeKind::Optional(_) => optional = true,
            NodeKind::Nullable(_) => field.nullable = true,
            NodeKind::Default(d) if default.is_none() => default = Some(d.value.clone()),
            _ => {}
        }
    }

    let leaf = node.innermost();
    field.required = leaf.required && !optional;

    match &leaf.kind {
        NodeKind::String(s) => Descriptor::String(StringDescriptor {
            input_type: s.kind.input_type(),
            kind: s.kind,
            field,
            placeholder: s.placeholder.clone(),
            pattern: s.pattern.as_ref().map(|p| p.source.clone()),
            min: s.min_length.as_ref().map(|b| b.limit),
            max: s.max_length.as_ref().map(|b| b.limit),
            read_only: s.read_only.is_some(),
            value: default,
            data_list: s.datalist.clone(),
        }),
        NodeKind::Number(n) => Descriptor::Number(NumberDescriptor {
            input_type: InputType::Number,
            field,
            min: n.min.as_ref().map(|b| b.limit),
            max: n.max.as_ref().map(|b| b.limit),
            value: default,
        }),
        NodeKind::Boolean => Descriptor::Boolean(BooleanDescriptor {
            input_type: InputType::Checkbox,
            field,
            checked: default.as_ref().and_then(Value::as_bool).unwrap_or(false),
        }),
        NodeKind::Enum(e) => Descriptor::Select(SelectDescriptor {
            input_type: InputType::Select,
            field,
            options: e.values.clone(),
            value: default,
        }),
        NodeKind::Array(a) => Descriptor::Array(ArrayDescriptor {
            input_type: InputType::Array,
            field,
            items: vec![describe(&a.items)],
            min_length: a.min_length.as_ref().map(|b| b.limit),
            max_length: a.max_length.as_ref().map(|b| b.limit),
            value: default,
        }),
        NodeKind::Object(o) => Descriptor::Object(ObjectDescriptor {
            input_type: InputType::Object,
            field,
            properties: o
                .fields
                .iter()
                .map(|(name, child)| (name.clone(), describe(child)))
                .collect(),
            value: default,
        }),
        // innermost() never stops on a wrapper
        NodeKind::Optional(inner) | NodeKind::Nullable(inner) => describe(inner),
        NodeKind::Default(d) => describe(&d.inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{array, boolean, enumeration, number, object, password, string};
    use crate::def::SchemaDefExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn string_descriptor() {
        let schema = password()
            .min_length(8)
            .describe("Account password")
            .build()
            .unwrap();
        assert_eq!(
            schema.descriptor().to_value(),
            json!({
                "type": "password",
                "kind": "password",
                "required": true,
                "nullable": false,
                "description": "Account password",
                "min": 8
            })
        );
    }

    #[test]
    fn wrappers_shape_the_field_info() {
        let schema = string().with_default("x").optional().nullable().build().unwrap();
        let descriptor = schema.descriptor();
        let field = descriptor.field();
        assert!(!field.required);
        assert!(field.nullable);
        match descriptor {
            Descriptor::String(d) => assert_eq!(d.value, Some(json!("x"))),
            other => panic!("expected string descriptor, got {other:?}"),
        }
    }

    #[test]
    fn checkbox_select_and_number() {
        let schema = object()
            .field("tls", boolean().with_default(true))
            .field("level", enumeration(["A", "B"]).with_default("B"))
            .field("port", number().range(1.0, 65535.0))
            .build()
            .unwrap();
        assert_eq!(
            schema.descriptor().to_value(),
            json!({
                "type": "object",
                "required": true,
                "nullable": false,
                "properties": {
                    "tls": {"type": "checkbox", "required": true, "nullable": false, "checked": true},
                    "level": {
                        "type": "select", "required": true, "nullable": false,
                        "options": ["A", "B"], "value": "B"
                    },
                    "port": {
                        "type": "number", "required": true, "nullable": false,
                        "min": 1.0, "max": 65535.0
                    }
                }
            })
        );
    }

    #[test]
    fn array_has_single_item_descriptor() {
        let schema = array(number()).min_length(1).build().unwrap();
        match schema.descriptor() {
            Descriptor::Array(d) => {
                assert_eq!(d.items.len(), 1);
                assert_eq!(d.items[0].input_type(), InputType::Number);
                assert_eq!(d.min_length, Some(1));
                assert_eq!(d.max_length, None);
            }
            other => panic!("expected array descriptor, got {other:?}"),
        }
    }

    #[test]
    fn dependencies_are_exposed() {
        let schema = object()
            .field("option", enumeration(["uri", "login"]))
            .field(
                "uri",
                string()
                    .optional()
                    .depends_on([DependencyRule::matches("option", "uri")]),
            )
            .build()
            .unwrap();
        let descriptor = schema.descriptor();
        let uri = descriptor.property("uri").unwrap();
        assert_eq!(
            uri.field().depends_on,
            vec![DependencyRule::matches("option", "uri")]
        );
        assert_eq!(
            uri.to_value()["depends_on"],
            json!([{"field": "option", "condition": "matches", "pattern": "uri"}])
        );
    }

    #[test]
    fn properties_keep_declaration_order() {
        let schema = object()
            .field("z", string())
            .field("a", string())
            .field("m", string())
            .build()
            .unwrap();
        let json = serde_json::to_string(&schema.descriptor()).unwrap();
        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\"").unwrap();
        let m = json.find("\"m\"").unwrap();
        assert!(z < a && a < m);
    }
}
