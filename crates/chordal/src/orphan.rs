//! Orphan filtering and coordinate reindexing.
//!
//! An orphan is an element with zero total incident weight. When the
//! visualization hides orphans, the matrix, name list, and navigation index
//! must all be rebuilt against the compacted coordinates in one pass; a
//! partially-remapped trio would let a click resolve to the wrong element.

use std::collections::HashMap;

use log::debug;

use crate::{
    collect::ElementIndex,
    matrix::{ChordMatrix, NavigationIndex},
};

/// Removes elements with no incident weight and reindexes the remainder.
///
/// Retained elements keep their relative order. Navigation keys that
/// reference a removed coordinate on either axis are dropped. When nothing
/// is removed, the matrix is returned unchanged.
pub fn without_orphans(matrix: ChordMatrix) -> ChordMatrix {
    let retained: Vec<usize> = (0..matrix.size())
        .filter(|&position| matrix.incident_weight(position) > 0.0)
        .collect();

    if retained.len() == matrix.size() {
        return matrix;
    }

    debug!(
        removed = matrix.size() - retained.len(),
        retained = retained.len();
        "Filtering orphans"
    );

    // old coordinate -> compacted coordinate
    let positions: HashMap<usize, usize> = retained
        .iter()
        .enumerate()
        .map(|(new, &old)| (old, new))
        .collect();

    let index: ElementIndex = retained
        .iter()
        .filter_map(|&old| matrix.element(old).cloned())
        .collect();

    let weights: Vec<Vec<f64>> = retained
        .iter()
        .map(|&row| retained.iter().map(|&col| matrix.weight(row, col)).collect())
        .collect();

    let navigation: NavigationIndex = matrix.navigation().remap(&positions);

    ChordMatrix::from_parts(index, weights, navigation)
}
