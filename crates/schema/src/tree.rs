//! Nested error rendering.
//!
//! An [`ErrorTree`] mirrors the shape of the input: each node holds the
//! messages raised exactly at that location under `_errors`, plus one child
//! per path segment below it.
//!
//! ```text
//! {"_errors": [], "redis": {"_errors": [], "host": {"_errors": ["String is required"]}}}
//! ```
//!
//! Rendered child keys that start with `_` gain one extra leading `_`, so a
//! field named `_errors` renders as `__errors` and never replaces the
//! node's own list.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Key under which a node's own messages are rendered.
pub const ERRORS_KEY: &str = "_errors";

/// Validation messages grouped by location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    errors: Vec<String>,
    children: IndexMap<String, ErrorTree>,
}

impl ErrorTree {
    /// Group `errors` by path. Children appear in first-seen order.
    #[must_use]
    pub fn from_errors<'a>(errors: impl IntoIterator<Item = &'a ValidationError>) -> Self {
        let mut root = Self::default();
        for error in errors {
            let node = error.path.iter().fold(&mut root, |node, segment| {
                node.children.entry(segment.to_string()).or_default()
            });
            node.errors.push(error.message.to_string());
        }
        root
    }

    /// Messages raised exactly at this node.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Child node for a field name or array index.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&ErrorTree> {
        self.children.get(segment)
    }

    /// Child nodes in first-seen order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ErrorTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Follow a sequence of segments down the tree.
    #[must_use]
    pub fn get(&self, segments: &[&str]) -> Option<&ErrorTree> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Whether no messages exist anywhere in the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.values().all(ErrorTree::is_empty)
    }

    /// Render as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            ERRORS_KEY.to_owned(),
            Value::Array(self.errors.iter().cloned().map(Value::String).collect()),
        );
        for (key, child) in &self.children {
            map.insert(rendered_key(key).into_owned(), child.to_value());
        }
        Value::Object(map)
    }
}

/// Key under which a child is rendered; see the module docs.
fn rendered_key(segment: &str) -> Cow<'_, str> {
    if segment.starts_with('_') {
        Cow::Owned(format!("_{segment}"))
    } else {
        Cow::Borrowed(segment)
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len() + 1))?;
        map.serialize_entry(ERRORS_KEY, &self.errors)?;
        for (key, child) in &self.children {
            map.serialize_entry(&rendered_key(key), child)?;
        }
        map.end()
    }
}
