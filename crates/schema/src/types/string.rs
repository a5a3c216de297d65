use serde::{Deserialize, Serialize};

use crate::kind::StringKind;
use crate::metadata::NodeMeta;
use crate::validation::ValidationRule;

/// A string node, optionally preconfigured by a [`StringKind`] preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringDef {
    #[serde(flatten)]
    pub meta: NodeMeta,

    #[serde(default, skip_serializing_if = "is_plain_text")]
    pub kind: StringKind,

    /// Overrides the preset placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Suggested values offered by the input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datalist: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_plain_text(kind: &StringKind) -> bool {
    *kind == StringKind::Text
}

impl StringDef {
    #[must_use]
    pub fn new(kind: StringKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Attach any rule (builder-style).
    #[must_use]
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    #[must_use]
    pub fn min_length(self, length: usize) -> Self {
        self.rule(ValidationRule::min_length(length))
    }

    #[must_use]
    pub fn min_length_with_message(self, length: usize, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::min_length(length).with_message(message))
    }

    #[must_use]
    pub fn max_length(self, length: usize) -> Self {
        self.rule(ValidationRule::max_length(length))
    }

    #[must_use]
    pub fn max_length_with_message(self, length: usize, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::max_length(length).with_message(message))
    }

    /// Require a match. Replaces the preset pattern, if any.
    #[must_use]
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.rule(ValidationRule::pattern(pattern))
    }

    #[must_use]
    pub fn pattern_with_message(
        self,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.rule(ValidationRule::pattern(pattern).with_message(message))
    }

    #[must_use]
    pub fn read_only(self) -> Self {
        self.rule(ValidationRule::read_only())
    }

    #[must_use]
    pub fn read_only_with_message(self, message: impl Into<String>) -> Self {
        self.rule(ValidationRule::read_only().with_message(message))
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn datalist<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.datalist = values.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_rules_in_order() {
        let def = StringDef::default()
            .min_length(2)
            .pattern_with_message("^[a-z]+$", "lowercase only")
            .read_only();
        assert_eq!(
            def.validation,
            vec![
                ValidationRule::min_length(2),
                ValidationRule::pattern("^[a-z]+$").with_message("lowercase only"),
                ValidationRule::read_only(),
            ]
        );
    }

    #[test]
    fn text_kind_is_omitted() {
        let def = StringDef::default().placeholder("name");
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({"placeholder": "name"})
        );

        let url = StringDef::new(StringKind::Url);
        assert_eq!(serde_json::to_value(&url).unwrap(), json!({"kind": "url"}));
    }
}
