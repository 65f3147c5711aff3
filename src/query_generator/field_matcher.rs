//! Field scoring against extracted keywords.
//!
//! A field's score is the percentage of keywords that occur (as substrings,
//! case-insensitively) in its description. Optionally the keyword list can be
//! widened with near-spellings of words that occur in the catalog's
//! descriptions before scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::field_catalog::{FieldCatalog, FieldDefinition};

/// Maximum number of fuzzy variants added per keyword
pub const MAX_FUZZY_VARIANTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedField {
    pub column_name: String,
    pub table_name: String,
    pub field_description: String,
    /// 0-100
    pub match_score: f64,
    /// Name of the field in the requested system, when it has an alias there
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_field: Option<String>,
}

impl MatchedField {
    pub fn from_field(field: &FieldDefinition, match_score: f64) -> Self {
        MatchedField {
            column_name: field.column_name.clone(),
            table_name: field.table_name.clone(),
            field_description: field.description.clone(),
            match_score,
            system_field: None,
        }
    }

    /// `table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_name, self.column_name)
    }
}

/// Percentage (0-100) of `keywords` contained in `description`.
pub fn match_score(description: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let description = description.to_lowercase();
    let matched = keywords
        .iter()
        .filter(|keyword| description.contains(&keyword.to_lowercase()))
        .count();

    matched as f64 / keywords.len() as f64 * 100.0
}

pub struct FieldMatcher<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> FieldMatcher<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        FieldMatcher { catalog }
    }

    /// Score every catalog field and return those scoring at least
    /// `threshold`, best first, at most `max_results` of them. A field no
    /// keyword occurs in is never a match, even at threshold 0.
    ///
    /// Fields with equal scores keep their catalog order.
    pub fn find_matches(
        &self,
        keywords: &[String],
        threshold: f64,
        max_results: usize,
    ) -> Vec<MatchedField> {
        let mut matches: Vec<MatchedField> = self
            .catalog
            .fields()
            .iter()
            .filter_map(|field| {
                let score = match_score(&field.description, keywords);
                (score > 0.0 && score >= threshold)
                    .then(|| MatchedField::from_field(field, score))
            })
            .collect();

        matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        matches.truncate(max_results);

        log::debug!(
            "Matched {} fields for {} keywords (threshold {})",
            matches.len(),
            keywords.len(),
            threshold
        );
        matches
    }
}

/// Near-spelling expansion of keywords against the words used in field
/// descriptions.
#[derive(Debug, Clone, Default)]
pub struct FuzzyExpander {
    vocabulary: BTreeSet<String>,
}

impl FuzzyExpander {
    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        let vocabulary = catalog
            .fields()
            .iter()
            .flat_map(|field| {
                field
                    .description
                    .to_lowercase()
                    .split_whitespace()
                    .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|word| !word.is_empty())
            .collect();

        FuzzyExpander { vocabulary }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Return `keywords` followed by up to [`MAX_FUZZY_VARIANTS`] variants
    /// per keyword. The input slice is left untouched.
    pub fn expand(&self, keywords: &[String]) -> Vec<String> {
        let mut expanded = keywords.to_vec();

        for keyword in keywords {
            let max_distance = max_edit_distance(keyword);
            let mut candidates: Vec<(usize, &String)> = self
                .vocabulary
                .iter()
                .filter(|word| *word != keyword)
                .map(|word| (strsim::levenshtein(keyword, word), word))
                .filter(|(distance, _)| *distance <= max_distance)
                .collect();

            // Vocabulary iteration is already alphabetical; stable sort keeps it for ties
            candidates.sort_by_key(|(distance, _)| *distance);

            expanded.extend(
                candidates
                    .into_iter()
                    .take(MAX_FUZZY_VARIANTS)
                    .map(|(_, word)| word.clone()),
            );
        }

        if expanded.len() > keywords.len() {
            log::debug!("Fuzzy-expanded keywords: {:?}", expanded);
        }
        expanded
    }
}

fn max_edit_distance(keyword: &str) -> usize {
    if keyword.chars().count() <= 5 {
        1
    } else {
        2
    }
}
