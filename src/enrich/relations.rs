//! Relation name → record field mapping.

use std::collections::HashMap;

/// Relation names understood by default, each mapped to the field of the
/// same name.
const DEFAULT_RELATIONS: &[&str] = &[
    // people
    "homeworld",
    "films",
    "starships",
    "species",
    "vehicles",
    // planets
    "residents",
    // films
    "characters",
    "planets",
    // starships / vehicles
    "pilots",
];

/// Read-only mapping from a caller-facing relation name (e.g. `homeworld`)
/// to the record field holding its locator(s).
///
/// Built once at startup and shared; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RelationMap {
    fields: HashMap<String, String>,
}

impl RelationMap {
    /// Build a map from `(relation, field)` pairs.
    pub fn new<I, N, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(n, f)| (n.into(), f.into()))
                .collect(),
        }
    }

    /// Field backing `relation`, or `None` for an unknown relation.
    pub fn field_for(&self, relation: &str) -> Option<&str> {
        self.fields.get(relation).map(String::as_str)
    }

    /// Known relation names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RelationMap {
    fn default() -> Self {
        Self::new(DEFAULT_RELATIONS.iter().map(|name| (*name, *name)))
    }
}
