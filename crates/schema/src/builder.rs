//! Constructor functions for every definition kind.
//!
//! ```
//! use trellis_schema::prelude::*;
//!
//! let schema = object()
//!     .field("host", string().min_length(1))
//!     .field("port", number().range(1.0, 65535.0).with_default(6379))
//!     .build()
//!     .unwrap();
//! assert!(schema.safe_parse(&serde_json::json!({"host": "localhost"})).is_ok());
//! ```

use crate::def::SchemaDef;
use crate::kind::StringKind;
use crate::types::{ArrayDef, BooleanDef, EnumDef, NumberDef, ObjectDef, StringDef};

macro_rules! string_presets {
    ($($(#[$doc:meta])* $name:ident => $kind:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name() -> StringDef {
                StringDef::new(StringKind::$kind)
            }
        )+
    };
}

string_presets! {
    /// A plain text string.
    string => Text,
    password => Password,
    url => Url,
    email => Email,
    uuid => Uuid,
    /// A UUID wrapped in braces.
    guid => Guid,
    /// A US zip code, five digits with an optional `-1234` suffix.
    zip_code => ZipCode,
    street_address => StreetAddress,
    phone => Phone,
    /// A decimal with optional thousands separators, as text.
    string_number => StringNumber,
    hex_color => HexColor,
    mac_address => MacAddress,
    ipv4 => Ipv4,
    ipv6 => Ipv6,
    /// `MM/DD/YYYY`.
    date => Date,
    /// `YYYY-MM-DDTHH:MM`, as produced by a `datetime-local` input.
    datetime_local => DatetimeLocal,
    /// ISO 8601 date and time with an optional offset.
    datetime => IsoDatetime,
    html => Html,
    xml => Xml,
}

#[must_use]
pub fn number() -> NumberDef {
    NumberDef::default()
}

#[must_use]
pub fn boolean() -> BooleanDef {
    BooleanDef::default()
}

/// A closed set of string values.
#[must_use]
pub fn enumeration<S: Into<String>>(values: impl IntoIterator<Item = S>) -> EnumDef {
    EnumDef::new(values)
}

/// A homogeneous list; every element is validated against `items`.
#[must_use]
pub fn array(items: impl Into<SchemaDef>) -> ArrayDef {
    ArrayDef::new(items)
}

/// An empty object; add fields with [`ObjectDef::field`].
#[must_use]
pub fn object() -> ObjectDef {
    ObjectDef::default()
}
