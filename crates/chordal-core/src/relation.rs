//! Typed relationship handles and their direction shapes.
//!
//! A [`Relationship`] connects elements in one of three shapes:
//!
//! - *Member-end*: exactly two typed ends; direction runs first end → second end.
//! - *Directed*: explicit source and target sets; direction runs first source →
//!   first target.
//! - *Symmetric*: an unordered participant set with no inherent direction.
//!
//! Direction resolution downstream is a single exhaustive match over
//! [`RelationEnds`], not a trait hierarchy.
//!
//! Endpoints are held as weak references ([`EndRef`]). The host model owns its
//! elements through the containment tree; relationships are back-edges and must
//! not keep endpoints alive on their own. An endpoint whose element has been
//! removed from the model simply fails to resolve.

use std::{
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    element::{Element, ElementInner},
    identifier::Id,
};

/// A weak reference to a relationship endpoint.
#[derive(Clone)]
pub struct EndRef(Weak<ElementInner>);

impl EndRef {
    /// Creates an endpoint reference to the given element.
    pub fn new(element: &Element) -> Self {
        Self(element.downgrade())
    }

    /// Resolves the endpoint back to its element.
    ///
    /// Returns `None` when the element no longer exists in the host model.
    pub fn resolve(&self) -> Option<Element> {
        self.0.upgrade().map(Element::from_inner)
    }
}

impl fmt::Debug for EndRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Some(element) => write!(f, "EndRef({})", element.id()),
            None => write!(f, "EndRef(<dropped>)"),
        }
    }
}

/// The three direction shapes a relationship can take.
#[derive(Debug, Clone)]
pub enum RelationEnds {
    /// Exactly two typed ends; direction = first → second.
    MemberEnds { first: EndRef, second: EndRef },

    /// Explicit non-empty source and target sets; direction = first source →
    /// first target.
    Directed {
        sources: Vec<EndRef>,
        targets: Vec<EndRef>,
    },

    /// Unordered participants; every pair is a bidirectional contribution.
    Symmetric { participants: Vec<EndRef> },
}

#[derive(Debug)]
struct RelationshipInner {
    id: Id,
    kind: String,
    ends: RelationEnds,
}

/// A handle to one typed edge in the host model graph.
///
/// Handles are cheap to clone and compare by identity.
#[derive(Clone)]
pub struct Relationship {
    inner: Rc<RelationshipInner>,
}

impl Relationship {
    /// Create a relationship with the given kind string and end shape.
    pub fn new(id: Id, kind: impl Into<String>, ends: RelationEnds) -> Self {
        Self {
            inner: Rc::new(RelationshipInner {
                id,
                kind: kind.into(),
                ends,
            }),
        }
    }

    /// Convenience constructor for the member-end shape.
    pub fn between(id: Id, kind: impl Into<String>, first: &Element, second: &Element) -> Self {
        Self::new(
            id,
            kind,
            RelationEnds::MemberEnds {
                first: EndRef::new(first),
                second: EndRef::new(second),
            },
        )
    }

    /// Get the relationship identifier.
    pub fn id(&self) -> Id {
        self.inner.id
    }

    /// The kind string this relationship reports (e.g. `Association`).
    pub fn kind(&self) -> &str {
        &self.inner.kind
    }

    /// Borrow the relationship's end shape.
    pub fn ends(&self) -> &RelationEnds {
        &self.inner.ends
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Relationship {}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("ends", &self.inner.ends)
            .finish()
    }
}
