use crate::reason::Reasons;
use crate::taints::HiddenTaints;
use k8s_openapi::api::core::v1::Taint;
use std::collections::HashMap;
use tracing::debug;

/// Reason reported in place of a taint hidden from the namespace
pub const HIDDEN_TAINT_REASON: &str = "node(s) had taints that the pod didn't tolerate";

/// Aggregates per-node failure messages for one pod
#[derive(Debug, Clone)]
pub struct FailureSummary<'a> {
    namespace: String,
    hidden: &'a HiddenTaints,
    counts: HashMap<String, u64>,
}

impl<'a> FailureSummary<'a> {
    /// Start a summary for a pod in the given namespace
    pub fn new(namespace: impl Into<String>, hidden: &'a HiddenTaints) -> Self {
        Self {
            namespace: namespace.into(),
            hidden,
            counts: HashMap::new(),
        }
    }

    /// Count one node that failed with the given message
    pub fn record(&mut self, message: impl Into<String>) {
        *self.counts.entry(message.into()).or_insert(0) += 1;
    }

    /// Count one node whose taint the pod does not tolerate
    pub fn record_untolerated_taint(&mut self, taint: &Taint) {
        if self.hidden.is_hidden_taint(&self.namespace, &taint.key) {
            debug!(
                namespace = %self.namespace,
                key = %taint.key,
                "Hiding taint from tenant-facing reason"
            );
            self.record(HIDDEN_TAINT_REASON);
            return;
        }

        self.record(format!(
            "node(s) had taint {{{}: {}}}, that the pod didn't tolerate",
            taint.key,
            taint.value.as_deref().unwrap_or_default()
        ));
    }

    /// Accumulated `text -> count` mapping
    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    /// Reason collection built from the recorded failures
    pub fn reasons(&self) -> Reasons {
        Reasons::from_counts(&self.counts)
    }

    /// Render `0/<total_nodes> nodes are available: <reasons>.`
    pub fn message(&self, total_nodes: usize) -> String {
        let reasons = self.reasons().to_sorted_strings();
        if reasons.is_empty() {
            return format!("0/{} nodes are available.", total_nodes);
        }
        format!(
            "0/{} nodes are available: {}.",
            total_nodes,
            reasons.join(", ")
        )
    }
}
