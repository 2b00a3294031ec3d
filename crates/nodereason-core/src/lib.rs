//! Nodereason Core - Ranking of scheduling failure reasons
//!
//! This crate provides:
//! - Priority classification of failure reason text
//! - Count-annotated, priority-ordered reason rendering
//! - Tenant visibility checks for hidden taint keys
//! - Aggregation of per-node failures into a summary message

pub mod error;
pub mod input;
pub mod reason;
pub mod rules;
pub mod summary;
pub mod taints;

// Re-export commonly used types
pub use error::{ReasonError, Result};
pub use input::{counts_from_json, counts_from_yaml, is_yaml, load_counts};
pub use reason::{build_reasons, to_sorted_strings, Reason, Reasons};
pub use rules::{classify_priority, PriorityRule, PriorityRules, DEFAULT_PRIORITY};
pub use summary::{FailureSummary, HIDDEN_TAINT_REASON};
pub use taints::{HiddenTaints, HIDDEN_TAINTS_ENV, TENANT_MARKER};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::Taint;
