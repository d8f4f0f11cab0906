//! Cardinality markers for relation ends.
//!
//! The source end belongs to the table holding the foreign key, the target
//! end to the referenced table.

use crate::schema::RelationType;
use schemars::JsonSchema;
use serde::Serialize;

/// Marker drawn at one end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Single bar
    One,
    /// Crow's foot
    Many,
}

impl Marker {
    fn from_many(is_many: bool) -> Self {
        if is_many {
            Marker::Many
        } else {
            Marker::One
        }
    }
}

/// Marker pair plus short label for a relation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CardinalityMarkers {
    pub source: Marker,
    pub target: Marker,
    pub label: &'static str,
}

impl CardinalityMarkers {
    pub fn for_relation(relation_type: RelationType) -> Self {
        let source_many = matches!(
            relation_type,
            RelationType::ManyToOne | RelationType::ManyToMany
        );
        let target_many = matches!(
            relation_type,
            RelationType::OneToMany | RelationType::ManyToMany
        );

        Self {
            source: Marker::from_many(source_many),
            target: Marker::from_many(target_many),
            label: relation_label(relation_type),
        }
    }

    /// Mermaid erDiagram relationship notation, source entity on the left
    pub fn as_mermaid(self) -> &'static str {
        match (self.source, self.target) {
            (Marker::One, Marker::One) => "||--||",
            (Marker::One, Marker::Many) => "||--o{",
            (Marker::Many, Marker::One) => "}o--||",
            (Marker::Many, Marker::Many) => "}o--o{",
        }
    }

    /// Graphviz arrow shape names as (tail, head)
    pub fn as_dot_arrows(self) -> (&'static str, &'static str) {
        let shape = |m: Marker| match m {
            Marker::One => "tee",
            Marker::Many => "crow",
        };
        (shape(self.source), shape(self.target))
    }
}

pub fn relation_label(relation_type: RelationType) -> &'static str {
    match relation_type {
        RelationType::OneToOne => "1:1",
        RelationType::OneToMany => "1:N",
        RelationType::ManyToOne => "N:1",
        RelationType::ManyToMany => "M:N",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_table() {
        let cases = [
            (RelationType::OneToOne, Marker::One, Marker::One, "1:1"),
            (RelationType::OneToMany, Marker::One, Marker::Many, "1:N"),
            (RelationType::ManyToOne, Marker::Many, Marker::One, "N:1"),
            (RelationType::ManyToMany, Marker::Many, Marker::Many, "M:N"),
        ];
        for (rt, source, target, label) in cases {
            let m = CardinalityMarkers::for_relation(rt);
            assert_eq!(m.source, source, "{}", rt);
            assert_eq!(m.target, target, "{}", rt);
            assert_eq!(m.label, label);
        }
    }

    #[test]
    fn test_mermaid_notation() {
        let m = CardinalityMarkers::for_relation(RelationType::ManyToOne);
        assert_eq!(m.as_mermaid(), "}o--||");
    }
}
