//! Relationship resolution and weight accumulation.
//!
//! For each element in the [`ElementIndex`], the resolver snapshots its
//! incident relationships, applies the relation-kind filter, resolves a
//! direction per relationship shape, and accumulates the resulting weight
//! contributions into a [`ChordMatrix`].

use chordal_core::{EndRef, RelationEnds, Relationship};
use log::{debug, trace};

use crate::{collect::ElementIndex, config::ANY, matrix::ChordMatrix};

/// Relation kinds whose filter must match exactly, because substring
/// matching would also pick up their specializations.
const EXACT_ONLY_KINDS: &[&str] = &["Dependency"];

/// The relation-kind predicate applied before direction resolution.
#[derive(Debug, Clone)]
pub struct RelationFilter {
    criteria: String,
}

impl RelationFilter {
    /// Creates a filter for the given relation criteria.
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
        }
    }

    /// A filter that matches every relationship.
    pub fn any() -> Self {
        Self::new(ANY)
    }

    /// Whether a relationship passes this filter.
    ///
    /// `Any` matches everything. Compound kind strings match by substring
    /// containment (an `InterfaceRealization` passes a `Realization`
    /// filter), except for the base kinds in [`EXACT_ONLY_KINDS`], which
    /// must match exactly so their specializations stay excluded.
    pub fn matches(&self, relationship: &Relationship) -> bool {
        if self.criteria == ANY {
            return true;
        }
        let kind = relationship.kind();
        if EXACT_ONLY_KINDS.contains(&self.criteria.as_str()) {
            return kind == self.criteria;
        }
        kind == self.criteria || kind.contains(&self.criteria)
    }
}

/// Builds the weighted adjacency matrix for the given element index.
///
/// Direction resolution per shape:
///
/// - *Member-end*: source is the element typing the first end, target the
///   second; processed only when the visited element is the source, so a
///   relationship whose endpoints are both in the index contributes once.
/// - *Directed*: source is the first of the source set, target the first of
///   the target set; same visited-is-source guard.
/// - *Symmetric*: no direction, no guard; every other participant present
///   in the index receives a visited → other contribution. When both
///   endpoints are visited the accumulation double-counts, by convention.
///
/// Endpoints that cannot be resolved to a member of the index are silently
/// dropped.
pub fn build_matrix(index: &ElementIndex, filter: &RelationFilter) -> ChordMatrix {
    let mut matrix = ChordMatrix::new(index.clone());

    for (position, element) in index.iter().enumerate() {
        // Snapshot first: the host may mutate the incident list mid-pass.
        for relationship in element.relationships() {
            if !filter.matches(&relationship) {
                trace!(
                    kind = relationship.kind(),
                    criteria:? = filter;
                    "Relationship filtered out"
                );
                continue;
            }
            match relationship.ends().clone() {
                RelationEnds::MemberEnds { first, second } => {
                    accumulate_directed(&mut matrix, index, position, &first, &second, relationship);
                }
                RelationEnds::Directed { sources, targets } => {
                    if let (Some(source), Some(target)) = (sources.first(), targets.first()) {
                        accumulate_directed(&mut matrix, index, position, source, target, relationship);
                    }
                }
                RelationEnds::Symmetric { participants } => {
                    accumulate_symmetric(&mut matrix, index, position, &participants, relationship);
                }
            }
        }
    }

    debug!(size = matrix.size(); "Matrix built");
    matrix
}

fn accumulate_directed(
    matrix: &mut ChordMatrix,
    index: &ElementIndex,
    visited: usize,
    source: &EndRef,
    target: &EndRef,
    relationship: Relationship,
) {
    let Some(source_element) = source.resolve() else {
        return;
    };
    // Process only from the source endpoint, so the relationship is not
    // accumulated a second time when the target is visited.
    if index.position(source_element.id()) != Some(visited) {
        return;
    }
    let Some(target_element) = target.resolve() else {
        return;
    };
    let Some(target_position) = index.position(target_element.id()) else {
        // Out of filter scope; contribution dropped.
        return;
    };
    matrix.add_directed(visited, target_position, relationship);
}

fn accumulate_symmetric(
    matrix: &mut ChordMatrix,
    index: &ElementIndex,
    visited: usize,
    participants: &[EndRef],
    relationship: Relationship,
) {
    for participant in participants {
        let Some(other) = participant.resolve() else {
            continue;
        };
        let Some(other_position) = index.position(other.id()) else {
            continue;
        };
        if other_position == visited {
            continue;
        }
        matrix.add_symmetric(visited, other_position, relationship.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordal_core::{Element, Id};
    use float_cmp::assert_approx_eq;

    fn class(id: &str) -> Element {
        Element::new(Id::new(id), id, "Class")
    }

    fn indexed(elements: &[Element]) -> ElementIndex {
        elements.iter().cloned().collect()
    }

    fn attach_member_end(id: &str, kind: &str, a: &Element, b: &Element) -> Relationship {
        let rel = Relationship::between(Id::new(id), kind, a, b);
        a.attach_relationship(rel.clone());
        b.attach_relationship(rel.clone());
        rel
    }

    fn attach_symmetric(id: &str, kind: &str, participants: &[&Element]) -> Relationship {
        let rel = Relationship::new(
            Id::new(id),
            kind,
            RelationEnds::Symmetric {
                participants: participants.iter().map(|e| EndRef::new(e)).collect(),
            },
        );
        for participant in participants {
            participant.attach_relationship(rel.clone());
        }
        rel
    }

    #[test]
    fn test_member_end_contributes_once_both_directions() {
        let elements = vec![class("r0"), class("r1"), class("r2")];
        attach_member_end("r_assoc", "Association", &elements[0], &elements[1]);

        let matrix = build_matrix(&indexed(&elements), &RelationFilter::any());

        // Scenario A from the chord accumulation conventions.
        assert_eq!(matrix.names().len(), 3);
        assert_approx_eq!(f64, matrix.weight(0, 1), 1.0);
        assert_approx_eq!(f64, matrix.weight(1, 0), 1.0);
        for (i, row) in matrix.weights().iter().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                let expected = if (i, j) == (0, 1) || (i, j) == (1, 0) {
                    1.0
                } else {
                    0.0
                };
                assert_approx_eq!(f64, w, expected);
            }
        }
    }

    #[test]
    fn test_directed_shape_uses_first_source_and_target() {
        let elements = vec![class("d0"), class("d1")];
        let rel = Relationship::new(
            Id::new("d_dep"),
            "Dependency",
            RelationEnds::Directed {
                sources: vec![EndRef::new(&elements[1])],
                targets: vec![EndRef::new(&elements[0])],
            },
        );
        elements[0].attach_relationship(rel.clone());
        elements[1].attach_relationship(rel.clone());

        let matrix = build_matrix(&indexed(&elements), &RelationFilter::any());

        assert_approx_eq!(f64, matrix.weight(0, 1), 1.0);
        assert_approx_eq!(f64, matrix.weight(1, 0), 1.0);
        // True direction recorded as the primary navigation key.
        assert!(matrix.navigation().resolve(1, 0).is_some());
        assert_eq!(matrix.navigation().resolve(1, 0).unwrap()[0], rel);
    }

    #[test]
    fn test_symmetric_double_counts_when_both_visited() {
        let elements = vec![class("s0"), class("s1")];
        attach_symmetric("s_conn", "Connector", &[&elements[0], &elements[1]]);

        let matrix = build_matrix(&indexed(&elements), &RelationFilter::any());

        // One contribution per visited endpoint; intentional double-count.
        assert_approx_eq!(f64, matrix.weight(0, 1), 1.0);
        assert_approx_eq!(f64, matrix.weight(1, 0), 1.0);
        assert!(matrix.navigation().resolve(0, 1).is_some());
    }

    #[test]
    fn test_symmetric_single_visited_endpoint() {
        let in_index = class("sv0");
        let outside = class("sv_out");
        attach_symmetric("sv_conn", "Connector", &[&in_index, &outside]);

        let matrix = build_matrix(&indexed(std::slice::from_ref(&in_index)), &RelationFilter::any());

        // The peer is out of scope; its contribution is dropped silently.
        assert_eq!(matrix.size(), 1);
        assert_approx_eq!(f64, matrix.weight(0, 0), 0.0);
    }

    #[test]
    fn test_out_of_scope_target_dropped() {
        let a = class("os_a");
        let b = class("os_b");
        attach_member_end("os_rel", "Association", &a, &b);

        let matrix = build_matrix(&indexed(std::slice::from_ref(&a)), &RelationFilter::any());

        assert_eq!(matrix.size(), 1);
        assert_approx_eq!(f64, matrix.weight(0, 0), 0.0);
        assert!(matrix.navigation().is_empty());
    }

    #[test]
    fn test_dependency_filter_excludes_specializations() {
        let elements = vec![class("f0"), class("f1"), class("f2")];
        attach_member_end("f_usage", "Usage", &elements[0], &elements[1]);
        attach_member_end("f_dep", "Dependency", &elements[0], &elements[2]);

        let matrix = build_matrix(&indexed(&elements), &RelationFilter::new("Dependency"));

        // Usage is conceptually a dependency specialization but must not match.
        assert_approx_eq!(f64, matrix.weight(0, 1), 0.0);
        assert_approx_eq!(f64, matrix.weight(0, 2), 1.0);
    }

    #[test]
    fn test_compound_kind_matches_by_substring() {
        let elements = vec![class("c0"), class("c1")];
        attach_member_end(
            "c_real",
            "InterfaceRealization",
            &elements[0],
            &elements[1],
        );

        let matches = build_matrix(&indexed(&elements), &RelationFilter::new("Realization"));
        let misses = build_matrix(&indexed(&elements), &RelationFilter::new("Generalization"));

        assert_approx_eq!(f64, matches.weight(0, 1), 1.0);
        assert_approx_eq!(f64, misses.weight(0, 1), 0.0);
    }
}
