use serde::{Deserialize, Serialize};

use crate::dependency::DependencyRule;

/// Settings shared by every schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Whether an absent or null value is an error. On by default.
    #[serde(default = "required_default", skip_serializing_if = "is_required_default")]
    pub required: bool,

    /// Replaces the default `required` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,

    /// Human-readable description, carried into descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rules that must all hold for the node to be validated at all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<DependencyRule>,
}

fn required_default() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_required_default(required: &bool) -> bool {
    *required
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self {
            required: true,
            required_message: None,
            description: None,
            depends_on: Vec::new(),
        }
    }
}
