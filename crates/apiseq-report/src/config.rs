//! Analysis configuration
//!
//! Loaded from TOML; every field has a default so a partial file is fine:
//!
//! ```toml
//! pretty_json = true
//!
//! [synthesis]
//! max_orderings = 5040
//! max_plans = 10000
//! max_property_depth = 32
//! parallel = true
//! ```

use apiseq_sequence::SynthesisConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult};

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Synthesis caps and fan-out
    pub synthesis: SynthesisConfig,
    /// Indent exported JSON
    pub pretty_json: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            synthesis: SynthesisConfig::default(),
            pretty_json: true,
        }
    }
}

impl AnalysisConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`AnalysisError::Config`] on malformed TOML, unknown keys or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> AnalysisResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AnalysisError::config("<inline>", e))?;
        config
            .synthesis
            .validate()
            .map_err(|e| AnalysisError::config("<inline>", e))?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`AnalysisError::Config`] when the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::config(path, e))?;
        let config = Self::from_toml_str(&text).map_err(|err| match err {
            AnalysisError::Config { message, .. } => AnalysisError::config(path, message),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// With ordering cap
    #[inline]
    #[must_use]
    pub fn with_max_orderings(mut self, max: usize) -> Self {
        self.synthesis = self.synthesis.with_max_orderings(max);
        self
    }

    /// With plan cap
    #[inline]
    #[must_use]
    pub fn with_max_plans(mut self, max: usize) -> Self {
        self.synthesis = self.synthesis.with_max_plans(max);
        self
    }

    /// With property walk bound
    #[inline]
    #[must_use]
    pub fn with_max_property_depth(mut self, depth: usize) -> Self {
        self.synthesis = self.synthesis.with_max_property_depth(depth);
        self
    }

    /// With parallel fan-out on or off
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.synthesis = self.synthesis.with_parallel(parallel);
        self
    }

    /// With indented JSON on or off
    #[inline]
    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }
}
