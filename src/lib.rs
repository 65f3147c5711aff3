//! fieldsql - plain-language to SQL over a field mapping catalog
//!
//! This crate turns free-text descriptions of wanted data into SQL through:
//! - A field catalog loaded from a CSV mapping file
//! - A table relationship graph built from declared foreign keys
//! - Keyword-based field matching and intent detection
//! - Shortest-path join planning and SQL assembly
//! - An HTTP API over the whole pipeline

pub mod config;
pub mod field_catalog;
pub mod query_generator;
pub mod server;
