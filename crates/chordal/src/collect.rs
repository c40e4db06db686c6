//! Element collection: walking a container for visualization candidates.
//!
//! The collector walks a context container's owned-element tree, filtering by
//! a declared type predicate and an optional recursion flag, and produces the
//! [`ElementIndex`] whose positions become the matrix coordinates.

use chordal_core::{Concept, Element, Id};
use indexmap::IndexMap;
use log::debug;

use crate::config::ANY;

/// The ordered element sequence chosen for the current visualization.
///
/// Position in the sequence is the matrix coordinate. Invariants: no
/// duplicate elements; order is the order of first discovery during
/// collection (a container's own children before nested children,
/// depth-first).
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    entries: IndexMap<Id, Element>,
}

impl ElementIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element at the next position unless it is already present.
    ///
    /// Returns `true` when the element was newly inserted.
    pub fn insert(&mut self, element: Element) -> bool {
        match self.entries.entry(element.id()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(element);
                true
            }
        }
    }

    /// Returns the matrix coordinate of the element with the given id.
    pub fn position(&self, id: Id) -> Option<usize> {
        self.entries.get_index_of(&id)
    }

    /// Returns the element at the given matrix coordinate.
    pub fn element(&self, position: usize) -> Option<&Element> {
        self.entries.get_index(position).map(|(_, element)| element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates elements in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.entries.values()
    }

    /// Display names in coordinate order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|element| element.display_name())
            .collect()
    }
}

impl FromIterator<Element> for ElementIndex {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut index = ElementIndex::new();
        for element in iter {
            index.insert(element);
        }
        index
    }
}

/// The element-type predicate applied during collection.
#[derive(Debug, Clone)]
pub struct ElementFilter {
    type_name: String,
    include_subtypes: bool,
}

impl ElementFilter {
    /// Creates a filter for the given type name.
    pub fn new(type_name: impl Into<String>, include_subtypes: bool) -> Self {
        Self {
            type_name: type_name.into(),
            include_subtypes,
        }
    }

    /// A filter that matches every element.
    pub fn any() -> Self {
        Self::new(ANY, true)
    }

    /// Whether an element passes this filter.
    ///
    /// `Any` matches everything. An exact kind-string match always passes.
    /// With subtype inclusion enabled, the well-known type names match via a
    /// concept capability check, because specialized variants report a
    /// different kind string than their base concept; other type names fall
    /// back to substring containment against the kind string.
    pub fn matches(&self, element: &Element) -> bool {
        if self.type_name == ANY {
            return true;
        }
        if element.kind() == self.type_name {
            return true;
        }
        if !self.include_subtypes {
            return false;
        }
        match Concept::from_filter_value(&self.type_name) {
            Some(concept) => element.is_a(concept),
            None => element.kind().contains(&self.type_name),
        }
    }
}

/// Collects the [`ElementIndex`] for one refresh pass.
///
/// The walk is pre-order: the context's own children come before nested
/// children, siblings keep their existing order, and recursion descends into
/// every owned container to unbounded depth. Each container's children are
/// snapshotted before iteration so that concurrent host mutation cannot
/// invalidate the walk. An empty result is a valid, reportable outcome.
pub fn collect_elements(context: &Element, filter: &ElementFilter, recursive: bool) -> ElementIndex {
    let mut index = ElementIndex::new();
    collect_into(context, filter, recursive, &mut index);
    debug!(context = context.id().to_string(), count = index.len(); "Collected elements");
    index
}

fn collect_into(
    container: &Element,
    filter: &ElementFilter,
    recursive: bool,
    index: &mut ElementIndex,
) {
    let children = container.children();
    for child in &children {
        if filter.matches(child) {
            index.insert(child.clone());
        }
    }
    if recursive {
        for child in &children {
            if child.is_container() {
                collect_into(child, filter, recursive, index);
            }
        }
    }
}
