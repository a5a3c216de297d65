//! Loading schema and input documents.
//!
//! Documents are JSON, or YAML when the file name ends in `.yaml`/`.yml`.
//! `-` reads from stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use trellis_schema::def::SchemaDef;
use trellis_schema::node::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn decode<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    let name = if is_stdin(path) {
        "stdin".to_owned()
    } else {
        path.display().to_string()
    };
    match Format::detect(path) {
        Format::Json => serde_json::from_str(text).with_context(|| format!("invalid JSON in {name}")),
        Format::Yaml => serde_yaml::from_str(text).with_context(|| format!("invalid YAML in {name}")),
    }
}

/// Read a schema document and build it.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = read_source(path)?;
    let def: SchemaDef = decode(path, &text)?;
    let schema = def
        .build()
        .with_context(|| format!("schema {} does not build", path.display()))?;
    tracing::debug!(path = %path.display(), kind = ?schema.kind(), "schema loaded");
    Ok(schema)
}

/// Read an input document. Empty input stands for an absent value.
pub fn load_input(path: &Path) -> Result<Option<Value>> {
    let text = read_source(path)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    decode(path, &text).map(Some)
}
