use std::sync::OnceLock;
use tracing::debug;

/// Priority given to reason text that matches no rule
pub const DEFAULT_PRIORITY: u32 = 99;

/// A single substring rule (lower priority sorts first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityRule {
    /// Case-sensitive substring the reason text must contain
    pub pattern: String,
    /// Priority assigned on match
    pub priority: u32,
}

impl PriorityRule {
    /// Create a new rule
    pub fn new(pattern: impl Into<String>, priority: u32) -> Self {
        Self {
            pattern: pattern.into(),
            priority,
        }
    }

    /// Whether the rule applies to the given reason text
    pub fn matches(&self, text: &str) -> bool {
        text.contains(self.pattern.as_str())
    }
}

/// Ordered rule table, evaluated first-match-wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityRules {
    rules: Vec<PriorityRule>,
    fallback: u32,
}

impl PriorityRules {
    /// Create a rule table with the given fallback priority
    pub fn new(rules: Vec<PriorityRule>, fallback: u32) -> Self {
        Self { rules, fallback }
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, pattern: impl Into<String>, priority: u32) -> Self {
        self.rules.push(PriorityRule::new(pattern, priority));
        self
    }

    /// Priority of the first matching rule, or the fallback
    pub fn classify(&self, text: &str) -> u32 {
        match self.rules.iter().find(|rule| rule.matches(text)) {
            Some(rule) => {
                debug!(pattern = %rule.pattern, priority = rule.priority, "Classified reason");
                rule.priority
            }
            None => self.fallback,
        }
    }

    pub fn rules(&self) -> &[PriorityRule] {
        &self.rules
    }

    pub fn fallback(&self) -> u32 {
        self.fallback
    }
}

impl Default for PriorityRules {
    /// Volume problems first, then memory, CPU, affinity and taints
    fn default() -> Self {
        Self::new(
            vec![
                PriorityRule::new("volume", 1),
                PriorityRule::new("Insufficient memory", 5),
                PriorityRule::new("Insufficient cpu", 6),
                PriorityRule::new("node affinity", 10),
                PriorityRule::new("taints", 20),
            ],
            DEFAULT_PRIORITY,
        )
    }
}

/// Shared default rule table
pub fn default_rules() -> &'static PriorityRules {
    static RULES: OnceLock<PriorityRules> = OnceLock::new();
    RULES.get_or_init(PriorityRules::default)
}

/// Classify reason text against the default rule table (0-100, lower is more important)
pub fn classify_priority(text: &str) -> u32 {
    default_rules().classify(text)
}
