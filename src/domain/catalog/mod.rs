//! Tool operation catalog

mod entity;
mod index;

pub use entity::{
    OperationId, OperationKind, OperationSummary, ParameterField, ToolOperation, ToolSummary,
};
pub use index::CatalogIndex;
