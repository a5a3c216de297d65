use serde::{Deserialize, Serialize};

use crate::metadata::NodeMeta;

/// A boolean node. Only `true` and `false` pass; there is no coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanDef {
    #[serde(flatten)]
    pub meta: NodeMeta,
}
