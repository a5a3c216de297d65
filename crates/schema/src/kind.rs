use serde::{Deserialize, Serialize};

/// The kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Enum,
    Array,
    Object,
    Optional,
    Nullable,
    Default,
}

impl SchemaKind {
    /// Whether the kind wraps another node rather than checking a value itself.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Self::Optional | Self::Nullable | Self::Default)
    }

    /// Whether the kind holds child nodes.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }
}

/// HTML input type a node renders as in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Password,
    Url,
    Email,
    Date,
    DatetimeLocal,
    Number,
    Checkbox,
    Select,
    Array,
    Object,
}

/// String presets.
///
/// A preset bundles the HTML input type, a default pattern and a placeholder.
/// An explicit pattern on the node replaces the preset pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringKind {
    #[default]
    Text,
    Password,
    Url,
    Email,
    Uuid,
    Guid,
    ZipCode,
    StreetAddress,
    Phone,
    StringNumber,
    HexColor,
    MacAddress,
    Ipv4,
    Ipv6,
    Date,
    DatetimeLocal,
    IsoDatetime,
    Html,
    Xml,
}

impl StringKind {
    /// Every preset, in declaration order.
    pub const ALL: &'static [StringKind] = &[
        Self::Text,
        Self::Password,
        Self::Url,
        Self::Email,
        Self::Uuid,
        Self::Guid,
        Self::ZipCode,
        Self::StreetAddress,
        Self::Phone,
        Self::StringNumber,
        Self::HexColor,
        Self::MacAddress,
        Self::Ipv4,
        Self::Ipv6,
        Self::Date,
        Self::DatetimeLocal,
        Self::IsoDatetime,
        Self::Html,
        Self::Xml,
    ];

    /// The HTML input type the preset renders as.
    #[must_use]
    pub fn input_type(&self) -> InputType {
        match self {
            Self::Password => InputType::Password,
            Self::Url => InputType::Url,
            Self::Email => InputType::Email,
            Self::Date => InputType::Date,
            Self::DatetimeLocal => InputType::DatetimeLocal,
            _ => InputType::Text,
        }
    }

    /// The built-in pattern, if the preset has one.
    #[must_use]
    pub fn pattern(&self) -> Option<&'static str> {
        let pattern = match self {
            Self::Text | Self::Password => return None,
            Self::Url => {
                r"^[a-zA-Z][a-zA-Z0-9+.-]*://(?:[^\s:@/]+(?::[^\s@/]*)?@)?(?:\[[0-9a-fA-F:.]+\]|[^\s:/?#\[\]@]+)(?::\d+)?(?:/[^\s?#]*)?(?:\?[^\s#]*)?(?:#\S*)?$"
            }
            Self::Email => {
                r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$"
            }
            Self::Uuid => {
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-5][0-9a-fA-F]{3}-[089abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$"
            }
            Self::Guid => {
                r"^\{?[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}?$"
            }
            Self::ZipCode => r"^[0-9]{5}(?:-[0-9]{4})?$",
            Self::StreetAddress => r"^\d+ [a-zA-Z0-9\s]+,? [a-zA-Z]+,? [A-Z]{2} [0-9]{5,6}$",
            Self::Phone => {
                r"^\+?\d{1,4}?[-.\s]?\(?\d{1,3}?\)?[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}$"
            }
            Self::StringNumber => {
                r"^-?(?:0|[1-9](?:\d{0,2}(?:,\d{3})+|\d*))(?:\.\d+)?$"
            }
            Self::HexColor => r"^#?(?:[a-fA-F0-9]{6}|[a-fA-F0-9]{3})$",
            Self::MacAddress => r"^(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$",
            Self::Ipv4 => {
                r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$"
            }
            Self::Ipv6 => {
                r"^(?:(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|(?:[0-9a-fA-F]{1,4}:){1,7}:|(?:[0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|(?:[0-9a-fA-F]{1,4}:){1,5}(?::[0-9a-fA-F]{1,4}){1,2}|(?:[0-9a-fA-F]{1,4}:){1,4}(?::[0-9a-fA-F]{1,4}){1,3}|(?:[0-9a-fA-F]{1,4}:){1,3}(?::[0-9a-fA-F]{1,4}){1,4}|(?:[0-9a-fA-F]{1,4}:){1,2}(?::[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:(?::[0-9a-fA-F]{1,4}){1,6}|:(?:(?::[0-9a-fA-F]{1,4}){1,7}|:)|fe80:(?::[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]+|::(?:ffff(?::0{1,4})?:)?(?:(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])\.){3}(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])|(?:[0-9a-fA-F]{1,4}:){1,4}:(?:(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])\.){3}(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9]))$"
            }
            Self::Date => r"^(?:0[1-9]|1[0-2])/(?:0[1-9]|[12][0-9]|3[01])/(?:19|20)\d\d$",
            Self::DatetimeLocal => {
                r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])T(?:[01][0-9]|2[0-3]):[0-5][0-9]$"
            }
            Self::IsoDatetime => {
                r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?$"
            }
            Self::Html => r#"<(?:"[^"]*"['"]*|'[^']*'['"]*|[^'">])+>"#,
            Self::Xml => r"<([A-Za-z_][\w.-]*)[^>]*>[^<]*</[A-Za-z_][\w.-]*>",
        };
        Some(pattern)
    }

    /// The placeholder shown in an empty input.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        Some(match self {
            Self::Text | Self::Password => return None,
            Self::Url => "https://example.com",
            Self::Email => "user@example.com",
            Self::Uuid => "123e4567-e89b-12d3-a456-426614174000",
            Self::Guid => "{123e4567-e89b-12d3-a456-426614174000}",
            Self::ZipCode => "12345",
            Self::StreetAddress => "1234 Main St, City, ST 12345",
            Self::Phone => "+1 (555) 555-5555",
            Self::StringNumber => "1,234.56",
            Self::HexColor => "#ffffff",
            Self::MacAddress => "00:00:00:00:00:00",
            Self::Ipv4 => "127.0.0.1",
            Self::Ipv6 => "::1",
            Self::Date => "MM/DD/YYYY",
            Self::DatetimeLocal => "YYYY-MM-DDTHH:MM",
            Self::IsoDatetime => "YYYY-MM-DDTHH:MM:SSZ",
            Self::Html => "<tag>",
            Self::Xml => "<tag>value</tag>",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use rstest::rstest;

    #[test]
    fn every_preset_pattern_compiles() {
        for kind in StringKind::ALL {
            if let Some(pattern) = kind.pattern() {
                assert!(
                    Regex::new(pattern).is_ok(),
                    "pattern for {kind:?} should compile"
                );
            }
        }
    }

    #[test]
    fn placeholders_satisfy_their_own_pattern() {
        let skip = [StringKind::Date, StringKind::DatetimeLocal, StringKind::IsoDatetime];
        for kind in StringKind::ALL {
            if skip.contains(kind) {
                continue;
            }
            if let (Some(pattern), Some(placeholder)) = (kind.pattern(), kind.placeholder()) {
                let re = Regex::new(pattern).unwrap();
                assert!(re.is_match(placeholder), "{kind:?} placeholder {placeholder:?}");
            }
        }
    }

    #[rstest]
    #[case(StringKind::Url, "https://user:pw@example.com:8080/a/b?q=1#frag", true)]
    #[case(StringKind::Url, "redis://localhost:6379", true)]
    #[case(StringKind::Url, "not a url", false)]
    #[case(StringKind::Email, "someone@example.org", true)]
    #[case(StringKind::Email, "someone@", false)]
    #[case(StringKind::Uuid, "550e8400-e29b-41d4-a716-446655440000", true)]
    #[case(StringKind::Uuid, "550e8400e29b41d4a716446655440000", false)]
    #[case(StringKind::ZipCode, "12345-6789", true)]
    #[case(StringKind::ZipCode, "1234", false)]
    #[case(StringKind::HexColor, "#abc", true)]
    #[case(StringKind::HexColor, "#abcd", false)]
    #[case(StringKind::MacAddress, "01-23-45-67-89-ab", true)]
    #[case(StringKind::Ipv4, "192.168.1.255", true)]
    #[case(StringKind::Ipv4, "256.1.1.1", false)]
    #[case(StringKind::Ipv6, "2001:db8::ff00:42:8329", true)]
    #[case(StringKind::Ipv6, "2001:db8:::1", false)]
    #[case(StringKind::StringNumber, "-1,234,567.89", true)]
    #[case(StringKind::StringNumber, "01", false)]
    #[case(StringKind::Date, "12/31/1999", true)]
    #[case(StringKind::Date, "13/01/2000", false)]
    #[case(StringKind::DatetimeLocal, "2024-02-29T23:59", true)]
    #[case(StringKind::IsoDatetime, "2024-02-29T23:59:01.123Z", true)]
    #[case(StringKind::IsoDatetime, "2024-02-29 23:59", false)]
    #[case(StringKind::Xml, "<name>value</name>", true)]
    #[case(StringKind::Html, "plain text", false)]
    fn preset_patterns(#[case] kind: StringKind, #[case] input: &str, #[case] expected: bool) {
        let re = Regex::new(kind.pattern().unwrap()).unwrap();
        assert_eq!(re.is_match(input), expected, "{kind:?} on {input:?}");
    }

    #[test]
    fn input_types() {
        assert_eq!(StringKind::Text.input_type(), InputType::Text);
        assert_eq!(StringKind::Password.input_type(), InputType::Password);
        assert_eq!(StringKind::Uuid.input_type(), InputType::Text);
        assert_eq!(StringKind::DatetimeLocal.input_type(), InputType::DatetimeLocal);
        assert_eq!(
            serde_json::to_value(InputType::DatetimeLocal).unwrap(),
            serde_json::json!("datetime-local")
        );
    }

    #[test]
    fn wrapper_and_container_kinds() {
        assert!(SchemaKind::Optional.is_wrapper());
        assert!(SchemaKind::Default.is_wrapper());
        assert!(!SchemaKind::String.is_wrapper());
        assert!(SchemaKind::Object.is_container());
        assert!(!SchemaKind::Enum.is_container());
    }
}
