pub mod catalog;
pub mod errors;
pub mod field;
pub mod loader;
pub mod relationship_graph;

// Re-export commonly used types
pub use catalog::FieldCatalog;
pub use errors::{CatalogError, GraphError};
pub use field::{FieldDefinition, DEFAULT_SYSTEM, SYSTEM_A, SYSTEM_B};
pub use relationship_graph::{RelationshipEdge, RelationshipGraph};
