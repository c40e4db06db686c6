//! Opaque element handles into the host model tree.
//!
//! An [`Element`] is a cheap-clone view of one node in the externally-owned
//! object model: it reports a stable identity, a derived display name, a kind
//! string, and a closed set of well-known [`Concept`]s it satisfies. Owned
//! children and incident relationships are read through snapshots so that a
//! walk never iterates a live collection while the host mutates it.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};

use crate::{identifier::Id, relation::Relationship};

/// Well-known element concepts used for subtype matching.
///
/// Stereotyped or specialized model elements report a kind string of their
/// own (for example `Block`), yet still satisfy one of these base concepts.
/// Matching against a concept is a capability check, not a string compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Concept {
    Class,
    Package,
    Interface,
    Component,
}

impl Concept {
    /// Maps a well-known filter value to its concept, if it names one.
    pub fn from_filter_value(value: &str) -> Option<Self> {
        match value {
            "Class" => Some(Concept::Class),
            "Package" => Some(Concept::Package),
            "Interface" => Some(Concept::Interface),
            "Component" => Some(Concept::Component),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ElementInner {
    id: Id,
    name: String,
    kind: String,
    concepts: Vec<Concept>,
    children: RefCell<Vec<Element>>,
    relationships: RefCell<Vec<Relationship>>,
    annotations: RefCell<Vec<String>>,
}

/// A handle to one node in the host model graph.
///
/// Handles are cheap to clone and compare by identity. The pipeline only
/// reads through them; the mutators exist for the model owner (and for the
/// document loader and tests).
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    /// Create a new element with no satisfied concepts.
    pub fn new(id: Id, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_concepts(id, name, kind, Vec::new())
    }

    /// Create a new element that satisfies the given well-known concepts.
    pub fn with_concepts(
        id: Id,
        name: impl Into<String>,
        kind: impl Into<String>,
        concepts: Vec<Concept>,
    ) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                id,
                name: name.into(),
                kind: kind.into(),
                concepts,
                children: RefCell::new(Vec::new()),
                relationships: RefCell::new(Vec::new()),
                annotations: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Get the element identifier.
    pub fn id(&self) -> Id {
        self.inner.id
    }

    /// Returns the display text for this element.
    ///
    /// Uses the model-reported name if present, otherwise falls back to the
    /// identifier string.
    pub fn display_name(&self) -> String {
        if self.inner.name.is_empty() {
            self.inner.id.to_string()
        } else {
            self.inner.name.clone()
        }
    }

    /// The kind string this element reports (e.g. `Class`, `Block`).
    pub fn kind(&self) -> &str {
        &self.inner.kind
    }

    /// Capability check: does this element satisfy the given base concept?
    pub fn is_a(&self, concept: Concept) -> bool {
        self.inner.concepts.contains(&concept)
    }

    /// Whether this element owns any children.
    pub fn is_container(&self) -> bool {
        !self.inner.children.borrow().is_empty()
    }

    /// Snapshot of the element's owned children.
    ///
    /// The snapshot is taken atomically under the borrow, so callers can
    /// iterate it while the host mutates the underlying collection.
    pub fn children(&self) -> Vec<Element> {
        self.inner.children.borrow().clone()
    }

    /// Snapshot of the relationships incident to this element.
    pub fn relationships(&self) -> Vec<Relationship> {
        self.inner.relationships.borrow().clone()
    }

    /// Snapshot of the free-text annotation slots owned by this element.
    pub fn annotations(&self) -> Vec<String> {
        self.inner.annotations.borrow().clone()
    }

    /// Adds an owned child element.
    pub fn add_child(&self, child: Element) {
        self.inner.children.borrow_mut().push(child);
    }

    /// Registers a relationship as incident to this element.
    pub fn attach_relationship(&self, relationship: Relationship) {
        self.inner.relationships.borrow_mut().push(relationship);
    }

    /// Appends a free-text annotation slot.
    pub fn add_annotation(&self, text: impl Into<String>) {
        self.inner.annotations.borrow_mut().push(text.into());
    }

    /// Replaces the annotation slot at `index`.
    ///
    /// Out-of-range indices are ignored; annotation slots are owned by the
    /// host document and may disappear between snapshot and write.
    pub fn replace_annotation(&self, index: usize, text: impl Into<String>) {
        let mut annotations = self.inner.annotations.borrow_mut();
        if let Some(slot) = annotations.get_mut(index) {
            *slot = text.into();
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<ElementInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<ElementInner>) -> Self {
        Self { inner }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let named = Element::new(Id::new("e1"), "Billing", "Class");
        let unnamed = Element::new(Id::new("e2"), "", "Class");

        assert_eq!(named.display_name(), "Billing");
        assert_eq!(unnamed.display_name(), "e2");
    }

    #[test]
    fn test_concept_capability_check() {
        let block = Element::with_concepts(Id::new("b"), "Engine", "Block", vec![Concept::Class]);

        assert_eq!(block.kind(), "Block");
        assert!(block.is_a(Concept::Class));
        assert!(!block.is_a(Concept::Package));
    }

    #[test]
    fn test_children_snapshot_is_detached() {
        let parent = Element::new(Id::new("p"), "Parent", "Package");
        parent.add_child(Element::new(Id::new("c1"), "First", "Class"));

        let snapshot = parent.children();
        parent.add_child(Element::new(Id::new("c2"), "Second", "Class"));

        // The snapshot must not observe mutation that happened after it was taken.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(parent.children().len(), 2);
    }

    #[test]
    fn test_replace_annotation_ignores_out_of_range() {
        let diagram = Element::new(Id::new("d"), "Overview", "Diagram");
        diagram.add_annotation("note");
        diagram.replace_annotation(5, "ignored");

        assert_eq!(diagram.annotations(), vec!["note".to_string()]);
    }
}
