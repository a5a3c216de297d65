use serde::{Deserialize, Serialize};

use crate::metadata::NodeMeta;

/// A closed set of string values, matched exactly and case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    pub values: Vec<String>,

    /// Replaces the default `invalid_enum_value` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnumDef {
    #[must_use]
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_sensitive() {
        let def = EnumDef::new(["Level1", "Level2"]);
        assert!(def.contains("Level1"));
        assert!(!def.contains("level1"));
    }
}
