//! Table relationship graph used for JOIN path discovery.
//!
//! Nodes are table names, edges are foreign keys declared in the field mapping
//! source. The graph is undirected: every declaration is stored in both
//! directions, each direction carrying the same join condition. Neighbors are
//! kept in name order so traversal (and therefore the chosen path when several
//! shortest paths exist) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::errors::GraphError;
use super::field::FieldDefinition;

/// A JOIN between two tables, oriented from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub from: String,
    pub to: String,
    /// `"<table>.<column> = <foreign_table>.<foreign_key>"`, identical for both directions
    pub condition: String,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    adjacency: BTreeMap<String, BTreeMap<String, RelationshipEdge>>,
}

impl RelationshipGraph {
    /// Build the graph from every field that declares a foreign table and key.
    ///
    /// When several fields declare a relationship between the same pair of
    /// tables, the last one wins.
    pub fn build<'a>(fields: impl IntoIterator<Item = &'a FieldDefinition>) -> Self {
        let mut graph = RelationshipGraph::default();

        for field in fields {
            let Some((foreign_table, foreign_key)) = field.foreign_reference() else {
                continue;
            };

            let condition = format!(
                "{}.{} = {}.{}",
                field.table_name, field.column_name, foreign_table, foreign_key
            );
            graph.insert_edge(&field.table_name, foreign_table, condition);
        }

        log::info!(
            "Built relationship graph with {} tables",
            graph.adjacency.len()
        );
        graph
    }

    fn insert_edge(&mut self, table: &str, foreign_table: &str, condition: String) {
        self.adjacency.entry(table.to_string()).or_default().insert(
            foreign_table.to_string(),
            RelationshipEdge {
                from: table.to_string(),
                to: foreign_table.to_string(),
                condition: condition.clone(),
            },
        );
        self.adjacency.entry(foreign_table.to_string()).or_default().insert(
            table.to_string(),
            RelationshipEdge {
                from: foreign_table.to_string(),
                to: table.to_string(),
                condition,
            },
        );
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.adjacency.contains_key(table)
    }

    pub fn table_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&RelationshipEdge> {
        self.adjacency.get(from).and_then(|neighbors| neighbors.get(to))
    }

    pub fn neighbors(&self, table: &str) -> impl Iterator<Item = &RelationshipEdge> {
        self.adjacency
            .get(table)
            .into_iter()
            .flat_map(|neighbors| neighbors.values())
    }

    /// Find the shortest JOIN path from `from_table` to `to_table`.
    ///
    /// Returns an empty path when both tables are the same, even if the table
    /// takes part in no relationship.
    pub fn find_join_path(
        &self,
        from_table: &str,
        to_table: &str,
    ) -> Result<Vec<RelationshipEdge>, GraphError> {
        if from_table == to_table {
            return Ok(Vec::new());
        }

        for table in [from_table, to_table] {
            if !self.contains_table(table) {
                return Err(GraphError::TableNotFound {
                    table: table.to_string(),
                });
            }
        }

        let path = self.bfs_shortest_path(from_table, to_table)?;

        Ok(path
            .windows(2)
            .filter_map(|pair| self.edge(pair[0], pair[1]).cloned())
            .collect())
    }

    /// Breadth-first search over table names; returns the visited tables from
    /// `start` to `end` inclusive.
    fn bfs_shortest_path<'a>(
        &'a self,
        start: &'a str,
        end: &str,
    ) -> Result<Vec<&'a str>, GraphError> {
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        let mut parents: HashMap<&str, &str> = HashMap::new();
        parents.insert(start, start);

        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut path = vec![current];
                let mut node = current;
                while node != start {
                    node = parents[node];
                    path.push(node);
                }
                path.reverse();
                return Ok(path);
            }

            for neighbor in self.neighbors(current) {
                let next = neighbor.to.as_str();
                if !parents.contains_key(next) {
                    parents.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        Err(GraphError::NoPathFound {
            from: start.to_string(),
            to: end.to_string(),
        })
    }
}
