//! Integration tests - exercise the catalog, generator and HTTP layers together
//!
//! Everything runs in-process against the sample `field_mappings.csv`; no
//! server socket or external database is needed.

mod catalog_loading_tests;
mod http_api_tests;
mod query_generation_tests;

use std::path::PathBuf;

/// Path of the sample catalog shipped at the repository root
pub fn sample_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("field_mappings.csv")
}
