//! Document parsers for the supported file formats
//!
//! Turns raw JSON or YAML text into a `serde_json::Value` tree:
//! - JSON via serde_json
//! - YAML via serde_yaml, with mapping keys normalised to strings

use crate::document::SpecModel;
use crate::error::{ModelError, ModelResult};
use serde_json::Value;
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for converting document text into a tree
///
/// Implement this trait to add support for new file formats.
pub trait DocumentParser: Send + Sync + 'static {
    /// Parse content string into a document tree
    ///
    /// # Errors
    /// Returns a syntax error when the text is not valid for this format
    fn parse(&self, content: &str) -> ModelResult<Value>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
    }
}

/// Registry of parsers, searched in registration order
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(JsonParser);
        registry.register(YamlParser);
        registry
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser
    pub fn register<P: DocumentParser>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn DocumentParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }

    /// Read and parse a document file
    ///
    /// # Errors
    /// Unknown extension, IO failure or syntax error
    pub fn load(&self, path: &Path) -> ModelResult<Value> {
        let parser = self.find_for_path(path).ok_or_else(|| {
            ModelError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;

        let text = std::fs::read_to_string(path).map_err(|e| ModelError::io_error(path, e))?;
        parser.parse(&text).map_err(|e| match e {
            ModelError::SyntaxError { message, .. } => ModelError::syntax_error(path, message),
            other => other,
        })
    }
}

/// Load a document file and build its [`SpecModel`]
///
/// # Errors
/// Any load error, then any structural error
pub fn load_model(path: impl AsRef<Path>) -> ModelResult<SpecModel> {
    let path = path.as_ref();
    let doc = ParserRegistry::default().load(path)?;
    tracing::info!(path = %path.display(), "document loaded");
    SpecModel::from_value(doc)
}
