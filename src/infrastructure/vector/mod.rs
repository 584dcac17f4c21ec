//! Vector store implementations

mod qdrant;

pub use qdrant::QdrantVectorSearch;
