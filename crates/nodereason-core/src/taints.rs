use crate::error::{ReasonError, Result};
use std::collections::HashSet;
use std::env::{self, VarError};
use tracing::info;

/// Environment variable listing taint keys hidden from tenants
pub const HIDDEN_TAINTS_ENV: &str = "CW_HIDDEN_TAINTS";

/// Namespaces containing this marker are tenant namespaces
pub const TENANT_MARKER: &str = "tenant";

/// Taint keys that must not appear in tenant-facing reasons.
///
/// Resolved once at startup and handed to whatever needs the visibility
/// check; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenTaints {
    keys: HashSet<String>,
}

impl HiddenTaints {
    /// Exact set of keys, with no implicit entries
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list of keys.
    ///
    /// Entries are split verbatim with no trimming, and empty entries are
    /// kept: `""` parses to a set holding only the empty key.
    pub fn parse(value: &str) -> Self {
        Self::from_keys(value.split(','))
    }

    /// Load from [`HIDDEN_TAINTS_ENV`], treating an unset variable as empty
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(HIDDEN_TAINTS_ENV)
    }

    fn from_env_var(name: &str) -> Result<Self> {
        let value = match env::var(name) {
            Ok(value) => value,
            Err(VarError::NotPresent) => String::new(),
            Err(VarError::NotUnicode(_)) => return Err(ReasonError::invalid_environment(name)),
        };

        let hidden = Self::parse(&value);
        info!(variable = name, keys = hidden.len(), "Loaded hidden taint keys");
        Ok(hidden)
    }

    /// Whether a taint key should be hidden from the given namespace.
    ///
    /// Only namespaces containing [`TENANT_MARKER`] are ever filtered.
    pub fn is_hidden_taint(&self, namespace: &str, key: &str) -> bool {
        if !namespace.contains(TENANT_MARKER) {
            return false;
        }
        self.keys.contains(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
