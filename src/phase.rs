//! Run and per-model phase enumerations.

use serde::{Deserialize, Serialize};

/// Phase of a whole generation run.
///
/// ```text
/// GraphBuilt ─┬─> CycleDetected (abort)
///             └─> OrderEstablished -> PerModelPass -> PostcomputePass -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// Dependency graph assembled from the selected models.
    GraphBuilt,

    /// Required relations form a cycle. Nothing is generated.
    CycleDetected,

    /// Models sorted so that dependencies come first.
    OrderEstablished,

    /// Rows being composed model by model.
    PerModelPass,

    /// Deferred fields being resolved against the full store.
    PostcomputePass,

    /// All phases completed.
    Done,
}

impl RunPhase {
    /// Get the string representation of this phase.
    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::GraphBuilt => "graph_built",
            RunPhase::CycleDetected => "cycle_detected",
            RunPhase::OrderEstablished => "order_established",
            RunPhase::PerModelPass => "per_model_pass",
            RunPhase::PostcomputePass => "postcompute_pass",
            RunPhase::Done => "done",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of one model within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelPhase {
    Unstarted,
    /// Every field mapped to a value source or deferred.
    FieldsClassified,
    /// Candidate pools built.
    PoolsBuilt,
    /// Composed rows handed to the store.
    InstancesPersisted,
    /// Some fields wait for the post-compute pass.
    DeferredPending,
    Done,
}

impl ModelPhase {
    /// Get the string representation of this phase.
    pub fn as_str(&self) -> &str {
        match self {
            ModelPhase::Unstarted => "unstarted",
            ModelPhase::FieldsClassified => "fields_classified",
            ModelPhase::PoolsBuilt => "pools_built",
            ModelPhase::InstancesPersisted => "instances_persisted",
            ModelPhase::DeferredPending => "deferred_pending",
            ModelPhase::Done => "done",
        }
    }
}

impl std::fmt::Display for ModelPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
