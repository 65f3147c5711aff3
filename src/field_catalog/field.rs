use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// System identifier for the first alias column of the mapping file
pub const SYSTEM_A: &str = "system_a";
/// System identifier for the second alias column of the mapping file
pub const SYSTEM_B: &str = "system_b";
/// The pseudo-system that means "no system filter"
pub const DEFAULT_SYSTEM: &str = "default";

/// A single column mapping loaded from the field mapping source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub column_name: String,
    pub table_name: String,
    /// Alias of this column in each external system, keyed by system identifier.
    /// Systems with an empty alias are not present.
    pub system_aliases: BTreeMap<String, String>,
    pub description: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl FieldDefinition {
    pub fn new(
        column_name: impl Into<String>,
        table_name: impl Into<String>,
        description: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        FieldDefinition {
            column_name: column_name.into(),
            table_name: table_name.into(),
            system_aliases: BTreeMap::new(),
            description: description.into(),
            field_type: field_type.into(),
            join_key: None,
            foreign_table: None,
            foreign_key: None,
        }
    }

    /// Add an alias for `system`. Empty aliases are ignored.
    pub fn with_alias(mut self, system: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !alias.is_empty() {
            self.system_aliases.insert(system.into(), alias);
        }
        self
    }

    /// Declare a foreign key from this column to `foreign_table.foreign_key`.
    pub fn with_foreign_key(
        mut self,
        foreign_table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.foreign_table = non_empty(foreign_table.into());
        self.foreign_key = non_empty(foreign_key.into());
        self
    }

    pub fn with_join_key(mut self, join_key: impl Into<String>) -> Self {
        self.join_key = non_empty(join_key.into());
        self
    }

    pub fn alias_for(&self, system: &str) -> Option<&str> {
        self.system_aliases.get(system).map(String::as_str)
    }

    pub fn has_alias_for(&self, system: &str) -> bool {
        self.alias_for(system).is_some()
    }

    /// Name of this field as known by `system`, falling back to the column name
    pub fn name_for_system(&self, system: &str) -> &str {
        self.alias_for(system).unwrap_or(&self.column_name)
    }

    /// The foreign table and key, if this field declares a complete foreign key
    pub fn foreign_reference(&self) -> Option<(&str, &str)> {
        match (&self.foreign_table, &self.foreign_key) {
            (Some(table), Some(key)) => Some((table.as_str(), key.as_str())),
            _ => None,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
