//! Workflow documents, versions, and result validation

mod document;
mod validator;
mod version;

pub use document::{DocumentDefect, NodeConnection, WorkflowDocument, WorkflowNode};
pub use validator::{ResultValidator, ValidatorConfig};
pub use version::WorkflowVersion;

#[cfg(test)]
pub use document::fixtures;
