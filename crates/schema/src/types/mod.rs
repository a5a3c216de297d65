//! Serializable schema definitions, one struct per node variant.

mod array;
mod boolean;
mod enumeration;
mod number;
mod object;
mod string;
mod wrapper;

pub use array::ArrayDef;
pub use boolean::BooleanDef;
pub use enumeration::EnumDef;
pub use number::NumberDef;
pub use object::ObjectDef;
pub use string::StringDef;
pub use wrapper::{DefaultDef, WrapperDef};
