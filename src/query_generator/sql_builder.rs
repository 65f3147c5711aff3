//! SQL assembly from matched fields, intent and planned joins.
//!
//! Clause order is fixed: SELECT, FROM, JOIN*, WHERE, GROUP BY, LIMIT.
//! WHERE is never produced since filters are not inferred from descriptions.
//!
//! Tables are aliased by the first letter of their name. Two tables starting
//! with the same letter get the same alias; columns are always referenced by
//! their full table name, so the aliases are informational only.

use crate::field_catalog::{RelationshipEdge, RelationshipGraph};

use super::errors::QueryGeneratorError;
use super::field_matcher::MatchedField;
use super::intent::QueryIntent;
use super::join_planner;

/// Number of matched fields at which confidence stops being penalised
const FULL_EVIDENCE_MATCHES: f64 = 3.0;

/// Everything needed to render one query. Built per request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub intent: QueryIntent,
    pub distinct: bool,
    /// Required tables in order of first appearance in the matches; the
    /// first one is the primary table
    pub tables: Vec<String>,
    pub joins: Vec<RelationshipEdge>,
    /// 0 means no LIMIT clause
    pub limit: u32,
}

impl QueryPlan {
    pub fn new(
        graph: &RelationshipGraph,
        matches: &[MatchedField],
        intent: QueryIntent,
        distinct: bool,
        limit: u32,
    ) -> Result<Self, QueryGeneratorError> {
        if matches.is_empty() {
            return Err(QueryGeneratorError::NoMatches);
        }

        let tables = required_tables(matches);
        let joins = match tables.split_first() {
            Some((primary, others)) if !others.is_empty() => {
                join_planner::plan_joins(graph, primary, others)?
            }
            _ => Vec::new(),
        };

        Ok(QueryPlan {
            intent,
            distinct,
            tables,
            joins,
            limit,
        })
    }

    fn primary_table(&self) -> &str {
        &self.tables[0]
    }
}

/// Distinct table names in order of first appearance.
pub fn required_tables(matches: &[MatchedField]) -> Vec<String> {
    let mut tables: Vec<String> = Vec::new();
    for m in matches {
        if !tables.contains(&m.table_name) {
            tables.push(m.table_name.clone());
        }
    }
    tables
}

/// First character of the lower-cased table name.
pub fn table_alias(table: &str) -> String {
    table
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Render the plan to a single-line SQL string. `matches` must be the
/// non-empty matches the plan was built from.
fn render_sql(plan: &QueryPlan, matches: &[MatchedField]) -> String {
    let first = matches[0].qualified_name();

    let select_clause = match plan.intent {
        QueryIntent::Count => format!("COUNT({})", first),
        QueryIntent::Group => format!("{}, COUNT(*)", first),
        QueryIntent::Select => {
            let columns = matches
                .iter()
                .map(MatchedField::qualified_name)
                .collect::<Vec<_>>()
                .join(", ");
            if plan.distinct {
                format!("DISTINCT {}", columns)
            } else {
                columns
            }
        }
    };

    let primary = plan.primary_table();
    let mut sql = format!(
        "SELECT {} FROM {} {}",
        select_clause,
        primary,
        table_alias(primary)
    );

    let mut joined: Vec<&str> = vec![primary];
    for join in &plan.joins {
        if joined.contains(&join.to.as_str()) {
            continue;
        }
        sql.push_str(&format!(
            " JOIN {} {} ON {}",
            join.to,
            table_alias(&join.to),
            join.condition
        ));
        joined.push(&join.to);
    }

    if plan.intent == QueryIntent::Group {
        sql.push_str(&format!(" GROUP BY {}", first));
    }

    if plan.limit > 0 {
        sql.push_str(&format!(" LIMIT {}", plan.limit));
    }

    sql
}

/// Build the SQL for `matches` and return it with the joins it uses.
pub fn build_query(
    graph: &RelationshipGraph,
    matches: &[MatchedField],
    intent: QueryIntent,
    distinct: bool,
    limit: u32,
) -> Result<(String, Vec<RelationshipEdge>), QueryGeneratorError> {
    let plan = QueryPlan::new(graph, matches, intent, distinct, limit)?;
    let sql = render_sql(&plan, matches);
    Ok((sql, plan.joins))
}

/// Mean match score, scaled down when fewer than three fields matched.
/// Returns 0-100.
pub fn calculate_confidence(matches: &[MatchedField]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }

    let count = matches.len() as f64;
    let mean = matches.iter().map(|m| m.match_score).sum::<f64>() / count;
    mean * (count / FULL_EVIDENCE_MATCHES).min(1.0)
}
