use serde::{Deserialize, Serialize};

use crate::metadata::NodeMeta;
use crate::validation::ValidationRule;

/// A numeric node. Any JSON number passes the type check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
}

impl NumberDef {
    #[must_use]
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    #[must_use]
    pub fn min(self, value: f64) -> Self {
        self.rule(ValidationRule::min(value))
    }

    #[must_use]
    pub fn min_with_message(self, value: f64, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::min(value).with_message(message))
    }

    #[must_use]
    pub fn max(self, value: f64) -> Self {
        self.rule(ValidationRule::max(value))
    }

    #[must_use]
    pub fn max_with_message(self, value: f64, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::max(value).with_message(message))
    }

    /// Inclusive range.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.validation.extend(ValidationRule::range(min, max));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn range_adds_both_bounds() {
        let def = NumberDef::default().range(1.0, 65535.0);
        assert_eq!(def.validation, ValidationRule::range(1.0, 65535.0));
    }

    #[test]
    fn serde_round_trip() {
        let def = NumberDef::default().min_with_message(0.0, "must be positive");
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(
            json,
            json!({"validation": [{"rule": "min", "value": 0.0, "message": "must be positive"}]})
        );
        let back: NumberDef = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
