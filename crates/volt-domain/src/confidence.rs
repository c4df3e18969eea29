//! Source identity and static confidence ranking

use serde::Serialize;
use std::fmt;

/// Static per-source precedence used to arbitrate field conflicts
///
/// Structured data is more reliable than prose, which is more reliable than
/// a natural-language search answer. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    /// Natural-language fallback search
    Low,
    /// Encyclopedia summary
    Medium,
    /// Structured knowledge graph
    High,
}

impl Confidence {
    /// Get the confidence name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an external metadata source (e.g. "wikidata")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Create a source identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);

        let mut ranks = vec![Confidence::Low, Confidence::High, Confidence::Medium];
        ranks.sort_by(|a, b| b.cmp(a));
        assert_eq!(ranks, vec![Confidence::High, Confidence::Medium, Confidence::Low]);
    }

    #[test]
    fn test_source_id_display() {
        let id = SourceId::from("wikidata");
        assert_eq!(id.to_string(), "wikidata");
        assert_eq!(id.as_str(), "wikidata");
    }
}
