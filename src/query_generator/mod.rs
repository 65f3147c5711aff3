//! Description-to-SQL pipeline.
//!
//! ```text
//! description ─┬─> intent::classify ──────────────────────────────┐
//!              └─> keywords::extract_keywords                     │
//!                     └─> field_matcher (FieldCatalog)            │
//!                            └─> join_planner (RelationshipGraph) │
//!                                   └─> sql_builder <─────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::field_catalog::{FieldCatalog, RelationshipEdge, DEFAULT_SYSTEM};

mod errors;
pub mod field_matcher;
pub mod intent;
pub mod join_planner;
pub mod keywords;
pub mod sql_builder;

pub use errors::QueryGeneratorError;
pub use field_matcher::{FieldMatcher, FuzzyExpander, MatchedField};
pub use intent::{classify, QueryIntent};
pub use keywords::extract_keywords;
pub use sql_builder::{build_query, calculate_confidence, QueryPlan};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 30.0;
pub const DEFAULT_MAX_MATCHES: usize = 10;

/// Tuning knobs for field matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Minimum score (0-100) a field needs to be used
    pub threshold: f64,
    pub max_matches: usize,
    /// Expand keywords with near-spellings from the catalog before scoring
    pub fuzzy: bool,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            max_matches: DEFAULT_MAX_MATCHES,
            fuzzy: false,
        }
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub query: String,
    pub matched_fields: Vec<MatchedField>,
    pub joins_used: Vec<RelationshipEdge>,
    /// 0-100
    pub confidence: f64,
    pub processing_time_ms: u64,
}

pub struct QueryGenerator {
    catalog: Arc<FieldCatalog>,
    settings: MatchSettings,
    fuzzy: Option<FuzzyExpander>,
}

impl QueryGenerator {
    pub fn new(catalog: Arc<FieldCatalog>, settings: MatchSettings) -> Self {
        let fuzzy = settings.fuzzy.then(|| {
            let expander = FuzzyExpander::from_catalog(&catalog);
            log::info!(
                "Fuzzy keyword matching enabled ({} description words)",
                expander.vocabulary_size()
            );
            expander
        });
        QueryGenerator {
            catalog,
            settings,
            fuzzy,
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Generate SQL for `description`.
    ///
    /// `system` only affects the `system_field` reported for each match; the
    /// SQL always uses catalog column names. A `limit` of 0 means no LIMIT.
    pub fn generate(
        &self,
        description: &str,
        system: &str,
        limit: u32,
    ) -> Result<GeneratedQuery, QueryGeneratorError> {
        let start_time = Instant::now();

        if description.trim().is_empty() {
            return Err(QueryGeneratorError::EmptyDescription);
        }

        let keywords = extract_keywords(description);
        let (intent, distinct) = classify(description);
        log::debug!("Query intent: {} (distinct: {})", intent, distinct);

        let scoring_keywords = match &self.fuzzy {
            Some(expander) => expander.expand(&keywords),
            None => keywords,
        };

        let mut matched_fields = FieldMatcher::new(&self.catalog).find_matches(
            &scoring_keywords,
            self.settings.threshold,
            self.settings.max_matches,
        );
        if matched_fields.is_empty() {
            log::info!("No matching fields for description: {:?}", description);
            return Err(QueryGeneratorError::NoMatches);
        }

        if !system.is_empty() && system != DEFAULT_SYSTEM {
            self.attach_system_names(&mut matched_fields, system);
        }

        let (query, joins_used) = build_query(
            self.catalog.graph(),
            &matched_fields,
            intent,
            distinct,
            limit,
        )?;
        let confidence = calculate_confidence(&matched_fields);

        log::info!(
            "Generated {} query over {} field(s) with {} join(s), confidence {:.1}",
            intent,
            matched_fields.len(),
            joins_used.len(),
            confidence
        );

        Ok(GeneratedQuery {
            query,
            matched_fields,
            joins_used,
            confidence,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn attach_system_names(&self, matches: &mut [MatchedField], system: &str) {
        for m in matches {
            m.system_field = self
                .catalog
                .find_field(&m.table_name, &m.column_name)
                .filter(|field| field.has_alias_for(system))
                .map(|field| field.name_for_system(system).to_string());
        }
    }
}
