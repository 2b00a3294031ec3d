use crate::error::{ReasonError, Result};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// `text -> count` mapping that rejects repeated reason text
struct UniqueCounts(HashMap<String, u64>);

impl<'de> Deserialize<'de> for UniqueCounts {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = UniqueCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of reason text to count")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut counts = HashMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((text, count)) = map.next_entry::<String, u64>()? {
                    match counts.entry(text) {
                        Entry::Occupied(entry) => {
                            return Err(de::Error::custom(format!(
                                "duplicate reason `{}`",
                                entry.key()
                            )));
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(count);
                        }
                    }
                }
                Ok(UniqueCounts(counts))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Parse a JSON `text -> count` document; repeated reason text is an error
pub fn counts_from_json(data: &str) -> Result<HashMap<String, u64>> {
    serde_json::from_str::<UniqueCounts>(data)
        .map(|counts| counts.0)
        .map_err(|e| ReasonError::parse_error("JSON", e.to_string()))
}

/// Parse a YAML `text -> count` document
pub fn counts_from_yaml(data: &str) -> Result<HashMap<String, u64>> {
    serde_yaml::from_str(data).map_err(|e| ReasonError::parse_error("YAML", e.to_string()))
}

/// Load reason counts from a file (`.yaml`/`.yml` as YAML, anything else as JSON)
pub fn load_counts(path: &Path) -> Result<HashMap<String, u64>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ReasonError::read_error(path.display().to_string(), e))?;

    let counts = if is_yaml(path) {
        counts_from_yaml(&data)?
    } else {
        counts_from_json(&data)?
    };

    debug!(path = %path.display(), reasons = counts.len(), "Loaded reason counts");
    Ok(counts)
}

/// Whether the path has a YAML extension
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
