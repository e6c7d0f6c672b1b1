use serde::{Deserialize, Serialize};

/// An established correspondence between a schema field and a header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchedPair {
    pub expected: String,
    pub observed: String,
}

impl MatchedPair {
    pub fn new(expected: impl Into<String>, observed: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            observed: observed.into(),
        }
    }
}

/// Field/header correspondence for one uploaded manifest.
///
/// `expected` holds schema fields still waiting for a header, `observed`
/// holds headers nobody claimed. A name lives in exactly one of the residual
/// list or `matched`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    #[serde(default)]
    pub expected: Vec<String>,
    #[serde(default)]
    pub observed: Vec<String>,
    #[serde(default)]
    pub matched: Vec<MatchedPair>,
    /// Every required field is matched.
    #[serde(default)]
    pub valid: bool,
    /// Shown fields and headers are both left over.
    #[serde(default)]
    pub has_unmatched: bool,
    /// Whether the review UI should ask for manual matching.
    #[serde(default)]
    pub shown: bool,
    /// Set when the mapping was edited after content was last structured.
    #[serde(default)]
    pub rebuild: bool,
}

impl MappingResult {
    pub fn expected_for_observed(&self, observed: &str) -> Option<&str> {
        self.matched
            .iter()
            .find(|pair| pair.observed == observed)
            .map(|pair| pair.expected.as_str())
    }

    pub fn observed_for_expected(&self, expected: &str) -> Option<&str> {
        self.matched
            .iter()
            .find(|pair| pair.expected == expected)
            .map(|pair| pair.observed.as_str())
    }

    pub fn is_matched(&self, expected: &str) -> bool {
        self.observed_for_expected(expected).is_some()
    }

    pub fn matched_expected(&self) -> impl Iterator<Item = &str> {
        self.matched.iter().map(|pair| pair.expected.as_str())
    }

    pub fn matched_observed(&self) -> impl Iterator<Item = &str> {
        self.matched.iter().map(|pair| pair.observed.as_str())
    }
}
