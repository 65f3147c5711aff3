use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::field_catalog::{FieldDefinition, DEFAULT_SYSTEM};

/// Request body for POST /api/v1/generate-query
#[derive(Debug, Deserialize, Validate)]
pub struct QueryRequest {
    /// Free-text description of the wanted data
    #[validate(custom(function = "validate_description"))]
    pub description: String,

    /// System whose field aliases should be reported (defaults to "default")
    pub system: Option<String>,

    /// Maximum number of rows; 0 or absent means no LIMIT clause
    pub limit: Option<u32>,
}

impl QueryRequest {
    pub fn system(&self) -> &str {
        match self.system.as_deref() {
            Some(system) if !system.is_empty() => system,
            _ => DEFAULT_SYSTEM,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(0)
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("description is required".into());
        return Err(error);
    }
    Ok(())
}

/// Query string for GET /api/v1/fields
#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub system: Option<String>,
}

/// Field as exposed by the listing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldInfo {
    pub column_name: String,
    pub table_name: String,
    pub system_a_field: String,
    pub system_b_field: String,
    pub description: String,
    pub field_type: String,
    pub join_key: String,
    pub foreign_table: String,
    pub foreign_key: String,
}

impl From<&FieldDefinition> for FieldInfo {
    fn from(field: &FieldDefinition) -> Self {
        use crate::field_catalog::{SYSTEM_A, SYSTEM_B};

        FieldInfo {
            column_name: field.column_name.clone(),
            table_name: field.table_name.clone(),
            system_a_field: field.alias_for(SYSTEM_A).unwrap_or_default().to_string(),
            system_b_field: field.alias_for(SYSTEM_B).unwrap_or_default().to_string(),
            description: field.description.clone(),
            field_type: field.field_type.clone(),
            join_key: field.join_key.clone().unwrap_or_default(),
            foreign_table: field.foreign_table.clone().unwrap_or_default(),
            foreign_key: field.foreign_key.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldInfo>,
}

/// Error body for every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    /// "InvalidRequest", "ValidationError", "NoMatches", "NotFound", "NoPathFound"
    pub error_type: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, error_type: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            error_type: error_type.into(),
        }
    }
}
