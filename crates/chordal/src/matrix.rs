//! Weighted adjacency matrix and navigation index.
//!
//! [`ChordMatrix`] is the product of one refresh pass: a square weight grid
//! over the collected [`ElementIndex`], plus the [`NavigationIndex`] that maps
//! matrix coordinates back to the relationships that contributed to them.
//! The trio is rebuilt wholesale every refresh and treated as an immutable
//! value once built; click-through resolution always reads a complete,
//! self-consistent snapshot.

use std::collections::HashMap;

use chordal_core::{Element, Relationship};

use crate::collect::ElementIndex;

/// Maps coordinate pairs back to the relationships that contributed weight.
///
/// Directed contributions are recorded under their true-direction key only;
/// [`NavigationIndex::resolve`] falls back to the reversed key so that a
/// click on either half of a ribbon finds the underlying relationships.
#[derive(Debug, Clone, Default)]
pub struct NavigationIndex {
    entries: HashMap<(usize, usize), Vec<Relationship>>,
}

impl NavigationIndex {
    /// Records a contributing relationship under the given coordinate key.
    ///
    /// Contributions are accumulated, not deduplicated; a key may end up
    /// holding more than one relationship.
    pub fn record(&mut self, source: usize, target: usize, relationship: Relationship) {
        self.entries
            .entry((source, target))
            .or_default()
            .push(relationship);
    }

    /// Resolves a coordinate pair to its contributing relationships.
    ///
    /// Tries the key as given first, then the reversed key.
    pub fn resolve(&self, source: usize, target: usize) -> Option<&[Relationship]> {
        self.entries
            .get(&(source, target))
            .or_else(|| self.entries.get(&(target, source)))
            .map(Vec::as_slice)
    }

    /// Iterates all coordinate keys currently recorded.
    pub fn keys(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds the index through an old-coordinate → new-coordinate map.
    ///
    /// Keys that reference a coordinate absent from the map (a removed
    /// element, on either axis) are dropped.
    pub(crate) fn remap(&self, positions: &HashMap<usize, usize>) -> NavigationIndex {
        let mut remapped = NavigationIndex::default();
        for (&(source, target), relationships) in &self.entries {
            if let (Some(&new_source), Some(&new_target)) =
                (positions.get(&source), positions.get(&target))
            {
                remapped
                    .entries
                    .insert((new_source, new_target), relationships.clone());
            }
        }
        remapped
    }
}

/// The weighted adjacency representation of one refresh pass.
///
/// Invariants: the weight grid is square with size equal to the element
/// index length, weights are non-negative, and every navigation key refers
/// to coordinates inside the grid.
#[derive(Debug, Clone)]
pub struct ChordMatrix {
    index: ElementIndex,
    weights: Vec<Vec<f64>>,
    navigation: NavigationIndex,
}

impl ChordMatrix {
    /// Creates a zero-weight matrix over the given element index.
    pub fn new(index: ElementIndex) -> Self {
        let size = index.len();
        Self {
            index,
            weights: vec![vec![0.0; size]; size],
            navigation: NavigationIndex::default(),
        }
    }

    pub(crate) fn from_parts(
        index: ElementIndex,
        weights: Vec<Vec<f64>>,
        navigation: NavigationIndex,
    ) -> Self {
        debug_assert_eq!(index.len(), weights.len());
        debug_assert!(weights.iter().all(|row| row.len() == index.len()));
        Self {
            index,
            weights,
            navigation,
        }
    }

    /// Number of elements (and matrix rows/columns).
    pub fn size(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Borrow the underlying element index.
    pub fn element_index(&self) -> &ElementIndex {
        &self.index
    }

    /// The element at a matrix coordinate.
    pub fn element(&self, position: usize) -> Option<&Element> {
        self.index.element(position)
    }

    /// Display names in coordinate order.
    pub fn names(&self) -> Vec<String> {
        self.index.names()
    }

    /// Borrow the full weight grid.
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// The accumulated weight at one cell.
    pub fn weight(&self, source: usize, target: usize) -> f64 {
        self.weights[source][target]
    }

    /// Borrow the navigation index.
    pub fn navigation(&self) -> &NavigationIndex {
        &self.navigation
    }

    /// Total incident weight for a coordinate: row sum plus column sum.
    ///
    /// Zero total weight makes the element an orphan.
    pub fn incident_weight(&self, position: usize) -> f64 {
        let row: f64 = self.weights[position].iter().sum();
        let column: f64 = self.weights.iter().map(|r| r[position]).sum();
        row + column
    }

    /// Adds a directed contribution: weight in both matrix directions, one
    /// navigation record under the true-direction key.
    ///
    /// Writing both directions makes ribbon size reflect total connection
    /// strength regardless of direction; the navigation key still records
    /// which way the relationship actually points.
    pub(crate) fn add_directed(
        &mut self,
        source: usize,
        target: usize,
        relationship: Relationship,
    ) {
        self.weights[source][target] += 1.0;
        self.weights[target][source] += 1.0;
        self.navigation.record(source, target, relationship);
    }

    /// Adds a symmetric contribution: weight in the visited direction only.
    ///
    /// Symmetric shapes are processed once per visited endpoint, so the
    /// reverse cell receives its own contribution when the other endpoint is
    /// visited. Both endpoints in the index therefore double-count, which is
    /// the intended convention.
    pub(crate) fn add_symmetric(
        &mut self,
        source: usize,
        target: usize,
        relationship: Relationship,
    ) {
        self.weights[source][target] += 1.0;
        self.navigation.record(source, target, relationship);
    }
}
