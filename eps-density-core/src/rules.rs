//! Density Classification Rules
//!
//! Fixed, ordered rule table mapping content-type tags to a density. The
//! first group whose pattern occurs in the input wins; no match means no
//! decision and the downstream default stays in place.

use serde::{Deserialize, Serialize};

use crate::types::DensityDecision;

pub const CONTENT_TYPE_DRAWINGS: &str = "eaton:resources/technical-resources/drawings";
pub const CONTENT_TYPE_WIRING_DIAGRAMS: &str =
    "eaton:resources/technical-resources/wiring-diagrams";
pub const CONTENT_TYPE_TIME_CURRENT_CURVES: &str =
    "eaton:resources/technical-resources/time-current-curves";
pub const CONTENT_TYPE_ILLUSTRATIONS: &str = "eaton:resources/marketing-resources/illustrations";
pub const CONTENT_TYPE_PRODUCT_SPECIFICATION_GUIDES: &str =
    "eaton:resources/technical-resources/product-specification-guides";

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleGroup {
    pub decision: DensityDecision,
    pub patterns: &'static [&'static str],
}

/// Evaluated top to bottom. Order is part of the contract.
pub const RULE_TABLE: [RuleGroup; 2] = [
    RuleGroup {
        decision: DensityDecision::Dpi1000,
        patterns: &[
            CONTENT_TYPE_DRAWINGS,
            CONTENT_TYPE_WIRING_DIAGRAMS,
            CONTENT_TYPE_TIME_CURRENT_CURVES,
        ],
    },
    RuleGroup {
        decision: DensityDecision::Dpi300,
        patterns: &[
            CONTENT_TYPE_ILLUSTRATIONS,
            CONTENT_TYPE_PRODUCT_SPECIFICATION_GUIDES,
        ],
    },
];

/// How tag values are compared against the rule patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Substring containment on the concatenated tag text.
    ///
    /// A pattern formed across the boundary of two adjacent tags still
    /// matches. Kept as the default because existing workflows depend on it.
    #[default]
    Substring,
    /// Each tag compared individually for exact equality. Opt-in.
    ExactTag,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::ExactTag => "exact_tag",
        }
    }
}

/// Which rule fired, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub decision: DensityDecision,
    pub pattern: &'static str,
}

/// Pure classifier over content-type tags.
pub struct DensityClassifier;

impl DensityClassifier {
    /// Classify concatenated tag text by substring containment.
    pub fn classify(tag_text: &str) -> Option<DensityDecision> {
        Self::explain(tag_text).map(|m| m.decision)
    }

    /// Same as `classify`, also reporting the first pattern that matched.
    pub fn explain(tag_text: &str) -> Option<RuleMatch> {
        RULE_TABLE.iter().find_map(|group| {
            group
                .patterns
                .iter()
                .find(|pattern| tag_text.contains(**pattern))
                .map(|pattern| RuleMatch {
                    decision: group.decision,
                    pattern: *pattern,
                })
        })
    }

    /// Classify individual tags by exact equality, keeping group precedence.
    pub fn classify_exact<S: AsRef<str>>(tags: &[S]) -> Option<DensityDecision> {
        Self::explain_exact(tags).map(|m| m.decision)
    }

    pub fn explain_exact<S: AsRef<str>>(tags: &[S]) -> Option<RuleMatch> {
        RULE_TABLE.iter().find_map(|group| {
            group
                .patterns
                .iter()
                .find(|pattern| tags.iter().any(|tag| tag.as_ref() == **pattern))
                .map(|pattern| RuleMatch {
                    decision: group.decision,
                    pattern: *pattern,
                })
        })
    }

    /// Classify a set of tag values under the given mode.
    ///
    /// `Substring` concatenates the values first, exactly as the host
    /// property reader does.
    pub fn classify_tags<S: AsRef<str>>(tags: &[S], mode: MatchMode) -> Option<RuleMatch> {
        match mode {
            MatchMode::Substring => {
                let text: String = tags.iter().map(AsRef::as_ref).collect();
                Self::explain(&text)
            }
            MatchMode::ExactTag => Self::explain_exact(tags),
        }
    }
}
