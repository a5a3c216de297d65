//! Positional paths.
//!
//! Two kinds of path live here:
//!
//! - [`FieldPath`] locates a value inside validated input. Errors carry one;
//!   it starts empty where the error originates and gains a prefix segment at
//!   every enclosing object or array frame on the way up.
//! - [`DependencyPath`] is the dot-addressed reference a dependency rule uses
//!   to look up a raw sibling or ancestor value (`"redis.option"`).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

/// One step in a [`FieldPath`]: an object key or an array index.
///
/// Serializes untagged, so a path renders as `["servers", 0, "url"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position inside an array.
    Index(usize),
    /// Field name inside an object.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// Location of a value relative to the root of the validated input.
///
/// Most paths are shallow, so up to four segments are stored inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl FieldPath {
    /// The empty path, pointing at the root value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this path points at the root value.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments. Same as [`is_root`](Self::is_root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Append a segment at the innermost end.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Remove the innermost segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Insert a segment at the outermost end.
    pub fn prepend(&mut self, segment: impl Into<PathSegment>) {
        self.segments.insert(0, segment.into());
    }

    /// Append a segment (builder-style, consuming).
    #[must_use]
    pub fn with(mut self, segment: impl Into<PathSegment>) -> Self {
        self.push(segment);
        self
    }

    /// Render as an RFC 6901 JSON pointer (`/servers/0/url`).
    #[must_use]
    pub fn to_json_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Index(i) => out.push_str(&i.to_string()),
                PathSegment::Key(k) => out.push_str(&k.replace('~', "~0").replace('/', "~1")),
            }
        }
        out
    }

    /// Iterate over the segments, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FieldPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Dot-separated reference to a raw value, used by dependency rules.
///
/// `"redis.option"` parses into the segments `["redis", "option"]`.
/// Numeric segments also index into arrays (`"servers.0.url"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DependencyPath {
    segments: Vec<String>,
}

impl DependencyPath {
    /// Parse a dotted path. Empty segments are kept so the build step can
    /// reject them with a precise error.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self {
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    /// The segments in lookup order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The first segment, used to pick the scope the lookup starts from.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Whether the path is empty or has an empty segment (`"a..b"`).
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.segments.is_empty() || self.segments.iter().any(String::is_empty)
    }

    /// Walk `segments` down from `value`. Missing keys, out-of-range indexes
    /// and stepping into a scalar all resolve to `None`.
    #[must_use]
    pub fn lookup_from<'a>(segments: &[String], value: &'a Value) -> Option<&'a Value> {
        segments.iter().try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

impl fmt::Display for DependencyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<String> for DependencyPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&str> for DependencyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<DependencyPath> for String {
    fn from(path: DependencyPath) -> Self {
        path.segments.join(".")
    }
}
