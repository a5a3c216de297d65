use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::def::SchemaDef;
use crate::metadata::NodeMeta;

/// Decorates another schema; used for `optional` and `nullable`.
///
/// `meta.required` and `meta.required_message` on a wrapper apply to the
/// innermost node when the schema is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    pub inner: Box<SchemaDef>,
}

impl WrapperDef {
    #[must_use]
    pub fn new(inner: impl Into<SchemaDef>) -> Self {
        Self {
            meta: NodeMeta::default(),
            inner: Box::new(inner.into()),
        }
    }
}

/// Substitutes `value` when the input is absent or null, then validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    pub value: Value,

    pub inner: Box<SchemaDef>,
}

impl DefaultDef {
    #[must_use]
    pub fn new(inner: impl Into<SchemaDef>, value: impl Into<Value>) -> Self {
        Self {
            meta: NodeMeta::default(),
            value: value.into(),
            inner: Box::new(inner.into()),
        }
    }
}
