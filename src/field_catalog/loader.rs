//! CSV loading for field mapping files.
//!
//! Expected layout (header row first, always skipped):
//!
//! ```text
//! column_name,table_name,system_a_fieldmap,system_b_fieldmap,field_description,field_type,join_key,foreign_table,foreign_key
//! email,users,usr_email,EmailAddr,User email address,string,,,
//! user_id,orders,ord_uid,CustomerRef,User who placed the order,int,user_id,users,user_id
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::errors::CatalogError;
use super::field::{FieldDefinition, SYSTEM_A, SYSTEM_B};

/// Number of columns a mapping record must carry
pub const FIELD_RECORD_WIDTH: usize = 9;

/// Load field definitions from a CSV file on disk.
pub fn load_fields_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FieldDefinition>, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let fields = load_fields_from_reader(file)?;
    log::info!("Loaded {} fields from {}", fields.len(), path.display());
    Ok(fields)
}

/// Load field definitions from any CSV byte source.
///
/// Records with fewer than [`FIELD_RECORD_WIDTH`] columns, and records the CSV
/// reader cannot decode, are skipped with a warning.
pub fn load_fields_from_reader<R: Read>(reader: R) -> Result<Vec<FieldDefinition>, CatalogError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    // A source whose header cannot be decoded is not a mapping file at all
    rdr.headers()?;

    let mut fields = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable CSV row at line {}: {}", line, e);
                continue;
            }
        };

        match field_from_record(&record) {
            Some(field) => fields.push(field),
            None => log::warn!("Skipping invalid CSV row at line {}: {:?}", line, record),
        }
    }

    Ok(fields)
}

fn field_from_record(record: &StringRecord) -> Option<FieldDefinition> {
    if record.len() < FIELD_RECORD_WIDTH {
        return None;
    }

    let column = |i: usize| record.get(i).unwrap_or_default().to_string();

    let field = FieldDefinition::new(column(0), column(1), column(4), column(5))
        .with_alias(SYSTEM_A, column(2))
        .with_alias(SYSTEM_B, column(3))
        .with_join_key(column(6))
        .with_foreign_key(column(7), column(8));

    Some(field)
}
