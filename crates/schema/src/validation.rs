use serde::{Deserialize, Serialize};

/// A declarative constraint attached to a schema node.
///
/// Rules are pure data: a definition carries them as a list, and the build
/// step folds the list into the node's compiled constraints. When the same
/// rule appears twice the later one wins, so `.min_length(3).min_length(5)`
/// means "at least 5". Every rule can replace its default message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    /// String length (in characters) or array length must be at least `length`.
    MinLength {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// String length (in characters) or array length must be at most `length`.
    MaxLength {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// String must match the given regex pattern.
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Numeric value must be >= `value`.
    Min {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Numeric value must be <= `value`.
    Max {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The caller may not supply a value; only a default may fill it.
    ReadOnly {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    /// Require a minimum length.
    #[must_use]
    pub fn min_length(length: usize) -> Self {
        Self::MinLength {
            length,
            message: None,
        }
    }

    /// Require a maximum length.
    #[must_use]
    pub fn max_length(length: usize) -> Self {
        Self::MaxLength {
            length,
            message: None,
        }
    }

    /// Require a string to match a regex pattern.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: None,
        }
    }

    /// Require a numeric minimum (inclusive).
    #[must_use]
    pub fn min(value: f64) -> Self {
        Self::Min {
            value,
            message: None,
        }
    }

    /// Require a numeric maximum (inclusive).
    #[must_use]
    pub fn max(value: f64) -> Self {
        Self::Max {
            value,
            message: None,
        }
    }

    /// Reject caller-supplied values.
    #[must_use]
    pub fn read_only() -> Self {
        Self::ReadOnly { message: None }
    }

    /// Require a numeric value within an inclusive range.
    ///
    /// Returns a pair of `[Min, Max]` rules.
    #[must_use]
    pub fn range(min: f64, max: f64) -> Vec<Self> {
        vec![Self::min(min), Self::max(max)]
    }

    /// Replace the default failure message.
    #[must_use]
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Pattern { message, .. }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::ReadOnly { message } => message,
        };
        *slot = Some(text.into());
        self
    }

    /// The custom message, if one was set.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Pattern { message, .. }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::ReadOnly { message } => message.as_deref(),
        }
    }

    /// The serialized tag, used in build errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinLength { .. } => "min_length",
            Self::MaxLength { .. } => "max_length",
            Self::Pattern { .. } => "pattern",
            Self::Min { .. } => "min",
            Self::Max { .. } => "max",
            Self::ReadOnly { .. } => "read_only",
        }
    }
}
