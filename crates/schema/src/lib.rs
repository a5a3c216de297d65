//! Composable data schemas with conditional fields.
//!
//! A schema is a tree of nodes (strings, numbers, booleans, enums, arrays,
//! objects and the `optional`/`nullable`/`default` wrappers). Definitions
//! ([`SchemaDef`](def::SchemaDef)) are plain serde data; building one yields
//! a frozen [`Schema`](node::Schema) that validates JSON input, collects
//! every error with its path, strips undeclared keys, and skips fields whose
//! dependency rules do not hold. The same schema projects into a
//! [`Descriptor`](descriptor::Descriptor) for form renderers.

pub mod builder;
pub mod def;
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod metadata;
pub mod node;
pub mod path;
pub mod tree;
pub mod types;
mod validate;
pub mod validation;

pub mod prelude {
    pub use crate::builder::*;
    pub use crate::def::{SchemaDef, SchemaDefExt};
    pub use crate::dependency::{Condition, DependencyRule, PredicateRegistry};
    pub use crate::descriptor::{Descriptor, FieldInfo};
    pub use crate::error::{
        ErrorCode, ParseError, SchemaError, ValidationError, ValidationErrors, ValidationResult,
    };
    pub use crate::kind::{InputType, SchemaKind, StringKind};
    pub use crate::metadata::NodeMeta;
    pub use crate::node::{Schema, SchemaNode};
    pub use crate::path::{DependencyPath, FieldPath, PathSegment};
    pub use crate::tree::ErrorTree;
    pub use crate::validation::ValidationRule;

    pub use crate::types::*;
}
