//! Semantic retrieval over the tool catalog

mod candidate;
mod classifier;
mod query;
mod search;

pub use candidate::{CandidateSet, RetrievedCandidate};
pub use classifier::{
    Classification, ConfidenceLevel, RetrievalClassifier, RetrievalConfig, Verdict,
};
pub use query::compose_query;
pub use search::{ScoredPoint, VectorSearch};

#[cfg(test)]
pub use candidate::fixtures;
#[cfg(test)]
pub use search::mock;
