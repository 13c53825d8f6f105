//! End-to-end analysis: document → graph → CRUD → sequences → report

use apiseq_graph::GraphBuilder;
use apiseq_model::{load_model, SpecModel};
use apiseq_sequence::{CrudMap, SequenceSynthesizer};
use std::path::{Path, PathBuf};

use crate::assembler::{crud_view, endpoint_view, object_usage};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::views::Report;

/// File name of the object usage view
pub const OBJECT_LIST_FILE: &str = "object_list.json";
/// File name of the CRUD view
pub const OBJECT_CRUD_FILE: &str = "object_crud.json";
/// File name of the sequence plan view
pub const ENDPOINT_LIST_FILE: &str = "endpoint_list.json";

/// Runs the analysis pipeline
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer
    #[inline]
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse an already built model
    ///
    /// # Errors
    /// Returns [`AnalysisError::Sequence`] if the synthesis configuration is
    /// invalid. Unresolved references never fail the run.
    pub fn analyze(&self, model: &SpecModel) -> AnalysisResult<Report> {
        self.config.synthesis.validate()?;
        let info = model.info().clone();
        let span = tracing::info_span!("analyze", api = %info.name, version = %info.version);
        let _guard = span.enter();

        let graph = tracing::info_span!("graph").in_scope(|| GraphBuilder::new(model).build());
        let crud = tracing::info_span!("crud").in_scope(|| CrudMap::classify(&graph));
        let plans = tracing::info_span!("synthesis").in_scope(|| {
            SequenceSynthesizer::new(self.config.synthesis).synthesize_all(&graph, &crud)
        });

        let overruns: Vec<String> = plans
            .iter()
            .filter(|(_, plan)| plan.truncated)
            .map(|(key, _)| key.to_string())
            .collect();
        if !overruns.is_empty() {
            tracing::warn!(count = overruns.len(), "endpoints hit a synthesis cap");
        }

        let report = Report {
            info,
            object_list: object_usage(&graph),
            object_crud: crud_view(&crud),
            endpoint_list: endpoint_view(&plans),
            overruns,
        };
        tracing::info!(
            objects = report.object_count(),
            endpoints = report.endpoint_count(),
            unresolved = report.unresolved_endpoints().len(),
            "analysis complete"
        );
        Ok(report)
    }

    /// Load a JSON or YAML document and analyse it
    ///
    /// # Errors
    /// Returns [`AnalysisError::Model`] when the file cannot be loaded or
    /// lacks `info.title`, `info.version` or a 3.0/3.1 `openapi` field.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> AnalysisResult<Report> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading document");
        let model = load_model(path)?;
        self.analyze(&model)
    }

    /// Write the three views into `dir` and return the written paths
    ///
    /// # Errors
    /// Returns [`AnalysisError::Export`] if a file cannot be written.
    pub fn export(&self, report: &Report, dir: impl AsRef<Path>) -> AnalysisResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| AnalysisError::Export {
            path: dir.to_path_buf(),
            source,
        })?;

        let views = [
            (OBJECT_LIST_FILE, self.to_json(&report.object_list)?),
            (OBJECT_CRUD_FILE, self.to_json(&report.object_crud)?),
            (ENDPOINT_LIST_FILE, self.to_json(&report.endpoint_list)?),
        ];

        let mut written = Vec::with_capacity(views.len());
        for (name, text) in views {
            let path = dir.join(name);
            std::fs::write(&path, text).map_err(|source| AnalysisError::Export {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "view written");
            written.push(path);
        }
        Ok(written)
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> AnalysisResult<String> {
        let text = if self.config.pretty_json {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}
