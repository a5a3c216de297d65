use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::def::SchemaDef;
use crate::metadata::NodeMeta;

/// A fixed set of named child schemas.
///
/// Field order is declaration order; it drives error order, output key
/// order and descriptor property order. Keys not declared here are
/// stripped from the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    #[serde(default)]
    pub fields: IndexMap<String, SchemaDef>,
}

impl ObjectDef {
    /// Add or replace a field (builder-style).
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: impl Into<SchemaDef>) -> Self {
        self.fields.insert(name.into(), def.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaDef> {
        self.fields.get(name)
    }
}
