//! Generation run report types.

use crate::generate::ModelOutcome;
use crate::phase::{ModelPhase, RunPhase};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Models in generation order.
    pub order: Vec<String>,
    /// Per-model results of the primary pass.
    pub models: Vec<ModelReport>,
    /// Fields resolved by the post-compute pass.
    pub fixes: Vec<FieldFix>,
    /// Deferred fields (`Model.field`) still unresolved at the end.
    pub unresolved: Vec<String>,
    /// Last phase reached.
    pub phase: RunPhase,
}

impl GenerationReport {
    /// Create an empty report for a freshly built graph.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            models: Vec::new(),
            fixes: Vec::new(),
            unresolved: Vec::new(),
            phase: RunPhase::GraphBuilt,
        }
    }

    /// Get the report of a model.
    pub fn model(&self, name: &str) -> Option<&ModelReport> {
        self.models.iter().find(|m| m.model == name)
    }

    /// Get the total number of rows created.
    pub fn total_created(&self) -> usize {
        self.models.iter().map(|m| m.created).sum()
    }

    /// Get the total number of rows skipped.
    pub fn total_skipped(&self) -> usize {
        self.models.iter().map(|m| m.skipped).sum()
    }

    /// Get the total number of rows updated by the post-compute pass.
    pub fn total_updated(&self) -> usize {
        self.fixes.iter().map(|f| f.updated).sum()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Generation Report: {}\n\
             ==================\n\
             Order: {}\n\
             Created: {}\n\
             Skipped: {}\n\
             Post-compute updates: {}\n",
            self.phase,
            self.order.join(" -> "),
            self.total_created(),
            self.total_skipped(),
            self.total_updated()
        );

        if !self.models.is_empty() {
            summary.push_str("\nModels:\n");
            for model in &self.models {
                summary.push_str(&format!(
                    "- {}: {}/{} created, {} skipped ({})\n",
                    model.model, model.created, model.requested, model.skipped, model.phase
                ));
            }
        }

        if !self.unresolved.is_empty() {
            summary.push_str("\nUnresolved:\n");
            for field in &self.unresolved {
                summary.push_str(&format!("- {field}\n"));
            }
        }

        summary
    }
}

impl Default for GenerationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary-pass result of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReport {
    pub model: String,
    pub requested: usize,
    pub created: usize,
    pub skipped: usize,
    pub deferred: Vec<String>,
    pub phase: ModelPhase,
}

impl From<&ModelOutcome> for ModelReport {
    fn from(outcome: &ModelOutcome) -> Self {
        Self {
            model: outcome.model.clone(),
            requested: outcome.requested,
            created: outcome.created.len(),
            skipped: outcome.skipped.len(),
            deferred: outcome.deferred.clone(),
            phase: outcome.phase,
        }
    }
}

/// Post-compute result of one deferred field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFix {
    pub model: String,
    pub field: String,
    /// Rows saved with a new value or new links.
    pub updated: usize,
    /// Rows the store refused to save.
    pub failed: usize,
}
