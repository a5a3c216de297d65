use serde::{Deserialize, Serialize};

use crate::def::SchemaDef;
use crate::metadata::NodeMeta;
use crate::validation::ValidationRule;

/// A homogeneous list: every element is validated against `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    pub items: Box<SchemaDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
}

impl ArrayDef {
    #[must_use]
    pub fn new(items: impl Into<SchemaDef>) -> Self {
        Self {
            meta: NodeMeta::default(),
            items: Box::new(items.into()),
            validation: Vec::new(),
        }
    }

    #[must_use]
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Minimum element count.
    #[must_use]
    pub fn min_length(self, length: usize) -> Self {
        self.rule(ValidationRule::min_length(length))
    }

    #[must_use]
    pub fn min_length_with_message(self, length: usize, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::min_length(length).with_message(message))
    }

    /// Maximum element count.
    #[must_use]
    pub fn max_length(self, length: usize) -> Self {
        self.rule(ValidationRule::max_length(length))
    }

    #[must_use]
    pub fn max_length_with_message(self, length: usize, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::max_length(length).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberDef;
    use serde_json::json;

    #[test]
    fn serializes_items_inline() {
        let def = ArrayDef::new(NumberDef::default()).min_length(1);
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "items": {"type": "number"},
                "validation": [{"rule": "min_length", "length": 1}]
            })
        );
    }
}
