//! Join planning for multi-table queries.
//!
//! Every secondary table is connected to the primary table by its own
//! shortest path, and the union of those paths is used. This is a star around
//! the primary table, not a minimum Steiner tree: when two secondary tables
//! are close to each other but far from the primary, more joins are produced
//! than strictly necessary.

use std::collections::HashSet;

use crate::field_catalog::{GraphError, RelationshipEdge, RelationshipGraph};

/// Union of the shortest paths from `primary` to each of `others`,
/// deduplicated by join condition.
pub fn plan_joins<S: AsRef<str>>(
    graph: &RelationshipGraph,
    primary: &str,
    others: &[S],
) -> Result<Vec<RelationshipEdge>, GraphError> {
    let mut all_joins = Vec::new();
    for table in others {
        let path = graph.find_join_path(primary, table.as_ref())?;
        log::debug!(
            "Join path {} -> {}: {} hop(s)",
            primary,
            table.as_ref(),
            path.len()
        );
        all_joins.extend(path);
    }

    Ok(deduplicate_joins(all_joins))
}

/// Drop joins whose condition string has already been seen.
///
/// The first occurrence, with its direction, is kept. Two different foreign
/// keys between the same pair of tables have different conditions and are
/// therefore both kept.
pub fn deduplicate_joins(joins: Vec<RelationshipEdge>) -> Vec<RelationshipEdge> {
    let mut seen = HashSet::new();
    joins
        .into_iter()
        .filter(|join| seen.insert(join.condition.clone()))
        .collect()
}
