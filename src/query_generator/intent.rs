//! Query shape detection from lexical cues in the description.

use serde::{Deserialize, Serialize};
use std::fmt;

const COUNT_CUES: [&str; 3] = ["count", "how many", "number of"];
const GROUP_CUES: [&str; 3] = ["group", "grouped", "per"];
const DISTINCT_CUES: [&str; 3] = ["distinct", "unique", "different"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryIntent {
    Select,
    Count,
    Group,
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryIntent::Select => write!(f, "SELECT"),
            QueryIntent::Count => write!(f, "COUNT"),
            QueryIntent::Group => write!(f, "GROUP"),
        }
    }
}

/// Classify a description into a query intent plus a DISTINCT flag.
///
/// COUNT cues win over GROUP cues, and both force `distinct` to false. Cues
/// are plain substring checks, so "per" also fires inside "paper".
pub fn classify(description: &str) -> (QueryIntent, bool) {
    let desc = description.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| desc.contains(cue));

    if has_any(&COUNT_CUES) {
        return (QueryIntent::Count, false);
    }

    if has_any(&GROUP_CUES) {
        return (QueryIntent::Group, false);
    }

    (QueryIntent::Select, has_any(&DISTINCT_CUES))
}
