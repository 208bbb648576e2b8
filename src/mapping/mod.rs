//! Mapping-document model types.
//!
//! The mapping document is produced externally (by a schema-introspection
//! tool) and consumed read-only here: `fields` binds each logical report
//! field to a physical column and a join path, `joins` describes how each
//! table alias is reached. See [`loader`] for reading documents from disk.

pub mod loader;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use loader::{load_mapping, LoadError, LoadResult};

/// The external `{fields, joins}` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// Logical field name to resolution descriptor.
    pub fields: IndexMap<String, FieldResolution>,

    /// Join alias to join descriptor.
    pub joins: IndexMap<String, JoinDescriptor>,
}

/// How one logical field resolves to a physical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResolution {
    /// Display label. Informational only.
    #[serde(default)]
    pub label: Option<String>,

    /// Declared SQL column type. Informational only.
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,

    /// How to reach the field's table: a join alias looked up in `joins`,
    /// or an inline descriptor overriding the table-level join for this
    /// field only. Absence is a mapping defect caught at build time.
    #[serde(default)]
    pub join: Option<JoinSource>,

    /// Physical column name in the joined table.
    pub field: String,

    /// Output column alias; unique within one compiled statement.
    pub alias: String,

    /// Secondary join used when the displayed value lives one hop further
    /// than `join` (resolving a foreign key to a human-readable label).
    #[serde(default)]
    pub rel_join: Option<RelJoin>,
}

/// The `join` attribute of a field: an alias or an inline override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JoinSource {
    /// A key into the document's `joins` map.
    Alias(String),
    /// A full descriptor local to this field.
    Inline(JoinDescriptor),
}

/// How one table alias is introduced into a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDescriptor {
    #[serde(rename = "type")]
    pub join_type: JoinType,

    /// Physical table name.
    pub table: String,

    /// Alias under which the table is joined; must equal the map key.
    pub alias: String,

    /// Column in `table` on the right side of the ON predicate.
    pub on: String,

    /// Alias of the table this join depends on. Joined first if missing.
    pub model: String,

    /// Column in `model`'s table on the left side of the ON predicate.
    pub field: String,

    /// Column projected when this descriptor is reached through a
    /// field's `rel_join`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Join flavor, as spelled in the document (`LEFT`, `INNER`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Left,
    Inner,
    Right,
    Full,
    Cross,
}

/// A field's secondary display join.
///
/// Unlike [`JoinDescriptor`] it carries no `model`/`field` pair - the
/// dependency edge is synthesized from the field's own dotted name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelJoin {
    #[serde(rename = "type")]
    pub join_type: JoinType,

    /// Physical table holding the display value.
    pub table: String,

    /// Alias under which the display table is joined.
    pub alias: String,

    /// Column in `table` the foreign key points at.
    pub on: String,

    /// Column projected in place of the raw foreign key.
    pub display: String,
}

impl MappingDocument {
    /// Look up a logical field's resolution descriptor.
    pub fn resolution(&self, field: &str) -> Option<&FieldResolution> {
        self.fields.get(field)
    }

    /// Look up a join descriptor by alias.
    pub fn join(&self, alias: &str) -> Option<&JoinDescriptor> {
        self.joins.get(alias)
    }

    /// Validate document consistency against a default table alias.
    ///
    /// Checks the invariants the builder relies on: field `join` aliases
    /// exist, every `model` is resolvable, map keys match descriptor
    /// aliases, and the join dependency graph is acyclic. The builder does
    /// not call this - it reports the same defects lazily as it meets them.
    pub fn validate(&self, default_alias: &str) -> Result<(), Vec<MappingError>> {
        let mut errors = Vec::new();

        for (name, resolution) in &self.fields {
            if let Some(JoinSource::Alias(alias)) = &resolution.join {
                if !self.joins.contains_key(alias) {
                    errors.push(MappingError::DanglingFieldJoin {
                        field: name.clone(),
                        join: alias.clone(),
                    });
                }
            }
        }

        for (key, descriptor) in &self.joins {
            if &descriptor.alias != key {
                errors.push(MappingError::AliasMismatch {
                    key: key.clone(),
                    alias: descriptor.alias.clone(),
                });
            }
            if descriptor.model != default_alias && !self.joins.contains_key(&descriptor.model) {
                errors.push(MappingError::DanglingModel {
                    alias: key.clone(),
                    model: descriptor.model.clone(),
                });
            }
        }

        self.check_cycles(default_alias, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Walk each alias's `model` chain looking for a loop.
    fn check_cycles(&self, default_alias: &str, errors: &mut Vec<MappingError>) {
        let mut reported: HashSet<Vec<String>> = HashSet::new();
        for start in self.joins.keys() {
            let mut seen: Vec<&str> = Vec::new();
            let mut current = start.as_str();
            while current != default_alias {
                if let Some(from) = seen.iter().position(|s| *s == current) {
                    let nodes: Vec<String> = seen[from..].iter().map(|s| s.to_string()).collect();
                    // A cycle is reachable from every alias on it; report it once.
                    if reported.insert(canonical_rotation(&nodes)) {
                        let mut cycle = nodes;
                        cycle.push(current.to_string());
                        errors.push(MappingError::JoinCycle { cycle });
                    }
                    break;
                }
                seen.push(current);
                match self.joins.get(current) {
                    Some(descriptor) => current = descriptor.model.as_str(),
                    // Dangling model, reported separately
                    None => break,
                }
            }
        }
    }
}

/// Rotate a cycle so its smallest alias leads.
fn canonical_rotation(nodes: &[String]) -> Vec<String> {
    let pivot = nodes
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut rotated = Vec::with_capacity(nodes.len());
    rotated.extend_from_slice(&nodes[pivot..]);
    rotated.extend_from_slice(&nodes[..pivot]);
    rotated
}

/// A consistency defect found by [`MappingDocument::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A field's `join` names an alias absent from `joins`.
    DanglingFieldJoin { field: String, join: String },

    /// A join's `model` is neither the default alias nor a known join.
    DanglingModel { alias: String, model: String },

    /// A join map key differs from its descriptor's `alias`.
    AliasMismatch { key: String, alias: String },

    /// The `model` chain loops back on itself.
    JoinCycle { cycle: Vec<String> },
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::DanglingFieldJoin { field, join } => {
                write!(f, "Field '{}' references undefined join '{}'", field, join)
            }
            MappingError::DanglingModel { alias, model } => {
                write!(f, "Join '{}' depends on undefined table '{}'", alias, model)
            }
            MappingError::AliasMismatch { key, alias } => {
                write!(f, "Join key '{}' does not match its alias '{}'", key, alias)
            }
            MappingError::JoinCycle { cycle } => {
                write!(f, "Join dependency cycle: {}", cycle.join(" -> "))
            }
        }
    }
}

impl std::error::Error for MappingError {}
