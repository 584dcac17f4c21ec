//! Retrieval confidence classification

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::candidate::{CandidateSet, RetrievedCandidate};
use crate::domain::catalog::ToolOperation;

/// Configuration for retrieval classification.
///
/// Injected at construction so tests can exercise arbitrary threshold
/// combinations without touching process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of entries requested from the vector store
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Scores below this are treated as no match
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f32,
    /// Boundary between high and medium reported confidence
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f32,
    /// Accepted for configuration compatibility; the current policy never
    /// branches on it and produces no third verdict
    #[serde(default = "default_ambiguity_threshold")]
    pub ambiguity_threshold: f32,
}

fn default_top_k() -> usize {
    5
}

fn default_low_threshold() -> f32 {
    0.5
}

fn default_high_threshold() -> f32 {
    0.7
}

fn default_ambiguity_threshold() -> f32 {
    0.15
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
            ambiguity_threshold: default_ambiguity_threshold(),
        }
    }
}

/// Confidence outcome of one retrieval attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Confident,
    NoMatch,
}

/// Shading of a confident verdict, derived from the high threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
}

/// Outcome of classifying a ranked similarity list
#[derive(Debug, Clone)]
pub struct Classification {
    pub verdict: Verdict,
    pub candidates: CandidateSet,
    /// Top similarity score after sanitization (0.0 for an empty list)
    pub top_score: f32,
    pub confidence_level: Option<ConfidenceLevel>,
}

impl Classification {
    /// Top score rounded for display
    pub fn confidence(&self) -> f32 {
        (self.top_score * 100.0).round() / 100.0
    }

    pub fn is_confident(&self) -> bool {
        self.verdict == Verdict::Confident
    }
}

/// Turns a ranked similarity list into a verdict and a candidate set
#[derive(Debug, Clone)]
pub struct RetrievalClassifier {
    config: RetrievalConfig,
}

impl RetrievalClassifier {
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Classify a ranked list of resolved operations with their scores.
    ///
    /// Never fails on well-formed input: malformed scores (NaN or outside
    /// [0, 1]) are clamped to 0.0 and logged. The candidate set keeps every
    /// entry at or above the low threshold, not only the top one; the
    /// generator is expected to select among them.
    pub fn classify(&self, ranked: Vec<(ToolOperation, f32)>) -> Classification {
        let sanitized: Vec<(ToolOperation, f32)> = ranked
            .into_iter()
            .map(|(operation, score)| {
                let score = sanitize_score(&operation, score);
                (operation, score)
            })
            .collect();

        let top_score = sanitized.first().map(|(_, score)| *score).unwrap_or(0.0);

        if sanitized.is_empty() || top_score < self.config.low_threshold {
            return Classification {
                verdict: Verdict::NoMatch,
                candidates: CandidateSet::empty(),
                top_score,
                confidence_level: None,
            };
        }

        let candidates: Vec<RetrievedCandidate> = sanitized
            .into_iter()
            .enumerate()
            .filter(|(_, (_, score))| *score >= self.config.low_threshold)
            .map(|(rank, (operation, score))| RetrievedCandidate {
                operation,
                score,
                rank,
            })
            .collect();

        let confidence_level = if top_score >= self.config.high_threshold {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        };

        Classification {
            verdict: Verdict::Confident,
            candidates: CandidateSet::new(candidates),
            top_score,
            confidence_level: Some(confidence_level),
        }
    }
}

fn sanitize_score(operation: &ToolOperation, score: f32) -> f32 {
    if score.is_nan() || !(0.0..=1.0).contains(&score) {
        warn!(
            operation = %operation.id,
            score,
            "Malformed similarity score, treating as 0.0"
        );
        0.0
    } else {
        score
    }
}
