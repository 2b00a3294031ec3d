use crate::rules::{default_rules, PriorityRules};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A scheduling failure reason with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Raw diagnostic message
    pub text: String,
    /// Priority derived from the text (lower sorts first)
    pub priority: u32,
    /// Number of nodes reporting this reason
    pub count: u64,
}

impl Reason {
    /// Create a reason classified by the default rule table
    pub fn new(text: impl Into<String>, count: u64) -> Self {
        Self::with_rules(text, count, default_rules())
    }

    /// Create a reason classified by a custom rule table
    pub fn with_rules(text: impl Into<String>, count: u64, rules: &PriorityRules) -> Self {
        let text = text.into();
        let priority = rules.classify(&text);
        Self {
            text,
            priority,
            count,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.text)
    }
}

/// Collection of reasons, unordered until sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reasons(Vec<Reason>);

impl Reasons {
    /// Build one reason per entry of a `text -> count` mapping
    pub fn from_counts(counts: &HashMap<String, u64>) -> Self {
        Self::from_counts_with(counts, default_rules())
    }

    /// Same as [`Reasons::from_counts`] with a custom rule table
    pub fn from_counts_with(counts: &HashMap<String, u64>, rules: &PriorityRules) -> Self {
        counts
            .iter()
            .map(|(text, count)| Reason::with_rules(text.clone(), *count, rules))
            .collect()
    }

    /// Sort in place by ascending priority.
    ///
    /// Equal priorities are ordered by text, so the result does not depend on
    /// the iteration order of the mapping the reasons were built from.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.text.cmp(&b.text))
        });
    }

    /// Sort, then render each reason as `"<count> <text>"`
    pub fn to_sorted_strings(&mut self) -> Vec<String> {
        self.sort();
        self.0.iter().map(Reason::to_string).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reason> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Reason> for Reasons {
    fn from_iter<T: IntoIterator<Item = Reason>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Reasons {
    type Item = Reason;
    type IntoIter = std::vec::IntoIter<Reason>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Reasons {
    type Item = &'a Reason;
    type IntoIter = std::slice::Iter<'a, Reason>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build the reason collection for a `text -> count` mapping
pub fn build_reasons(counts: &HashMap<String, u64>) -> Reasons {
    Reasons::from_counts(counts)
}

/// Sort reasons by priority and render them as `"<count> <text>"`
pub fn to_sorted_strings(reasons: &mut Reasons) -> Vec<String> {
    reasons.to_sorted_strings()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries
            .iter()
            .map(|(text, count)| (text.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_sorted_strings_by_priority() {
        let input = counts(&[
            ("Insufficient memory.", 3),
            ("1/1 nodes are available: taints", 2),
            ("volume node affinity conflict", 1),
        ]);

        let mut reasons = build_reasons(&input);
        assert_eq!(
            to_sorted_strings(&mut reasons),
            vec![
                "1 volume node affinity conflict",
                "3 Insufficient memory.",
                "2 1/1 nodes are available: taints",
            ]
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let entries = [
            ("Insufficient memory.", 3),
            ("1/1 nodes are available: taints", 2),
            ("volume node affinity conflict", 1),
        ];
        let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [1, 0, 2]];

        let expected = vec![
            "1 volume node affinity conflict".to_string(),
            "3 Insufficient memory.".to_string(),
            "2 1/1 nodes are available: taints".to_string(),
        ];

        for order in orders {
            let mut input = HashMap::new();
            for i in order {
                let (text, count) = entries[i];
                input.insert(text.to_string(), count);
            }
            let mut reasons = build_reasons(&input);
            assert_eq!(reasons.to_sorted_strings(), expected);

            // Same result when the collection itself arrives in a different order
            let mut reversed: Reasons = build_reasons(&input).into_iter().rev().collect();
            assert_eq!(reversed.to_sorted_strings(), expected);
        }
    }

    #[test]
    fn test_build_preserves_texts_and_counts() {
        let input = counts(&[
            ("Insufficient cpu.", 4),
            ("node(s) had taints that the pod didn't tolerate", 0),
            ("something else", 7),
        ]);

        let reasons = build_reasons(&input);
        assert_eq!(reasons.len(), input.len());

        for (text, count) in &input {
            let matching: Vec<&Reason> = reasons.iter().filter(|r| &r.text == text).collect();
            assert_eq!(matching.len(), 1);
            assert_eq!(matching[0].count, *count);
        }
    }

    #[test]
    fn test_priorities_assigned_on_build() {
        let reasons = build_reasons(&counts(&[("Insufficient cpu.", 1)]));
        assert_eq!(reasons.iter().next().map(|r| r.priority), Some(6));
    }

    #[test]
    fn test_empty_input() {
        let mut reasons = build_reasons(&HashMap::new());
        assert!(reasons.is_empty());
        assert!(reasons.to_sorted_strings().is_empty());
    }

    #[test]
    fn test_ties_ordered_by_text() {
        let input = counts(&[
            ("zone unavailable", 1),
            ("already bound", 2),
            ("missing label", 3),
        ]);

        let mut reasons = build_reasons(&input);
        assert_eq!(
            reasons.to_sorted_strings(),
            vec!["2 already bound", "3 missing label", "1 zone unavailable"]
        );
    }

    #[test]
    fn test_sorting_sorted_is_idempotent() {
        let input = counts(&[
            ("node(s) didn't match node affinity", 2),
            ("Insufficient cpu.", 1),
            ("had volume node affinity conflict", 5),
            ("unknown", 9),
        ]);

        let mut reasons = build_reasons(&input);
        let first = reasons.to_sorted_strings();
        let second = reasons.to_sorted_strings();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_rules_on_build() {
        let rules = PriorityRules::new(Vec::new(), 50).with_rule("ports", 3);
        let mut reasons = Reasons::from_counts_with(
            &counts(&[("Insufficient memory.", 1), ("didn't have free ports", 2)]),
            &rules,
        );

        assert_eq!(
            reasons.to_sorted_strings(),
            vec!["2 didn't have free ports", "1 Insufficient memory."]
        );
    }

    #[test]
    fn test_reason_display() {
        let reason = Reason::new("Insufficient memory.", 12);
        assert_eq!(reason.priority, 5);
        assert_eq!(reason.to_string(), "12 Insufficient memory.");
    }
}
