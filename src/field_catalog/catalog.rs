use std::path::Path;

use super::errors::CatalogError;
use super::field::{FieldDefinition, DEFAULT_SYSTEM};
use super::loader;
use super::relationship_graph::RelationshipGraph;

/// The loaded field mappings together with the relationship graph derived
/// from them. Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
    graph: RelationshipGraph,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        let graph = RelationshipGraph::build(&fields);
        FieldCatalog { fields, graph }
    }

    /// Load the catalog from a CSV mapping file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let fields = loader::load_fields_from_path(path)?;
        Ok(Self::new(fields))
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields, or only those carrying an alias for `system`.
    ///
    /// An empty system name and `"default"` both mean no filter. Unknown
    /// systems yield nothing.
    pub fn get_all_fields(&self, system: &str) -> Vec<&FieldDefinition> {
        if system.is_empty() || system == DEFAULT_SYSTEM {
            return self.fields.iter().collect();
        }

        self.fields
            .iter()
            .filter(|field| field.has_alias_for(system))
            .collect()
    }

    pub fn find_field(&self, table_name: &str, column_name: &str) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|f| f.table_name == table_name && f.column_name == column_name)
    }
}
