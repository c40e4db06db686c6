//! Chordal Core Types and Definitions
//!
//! This crate provides the foundational types for the Chordal visualization
//! pipeline. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Elements**: Opaque handles into the host model tree ([`element` module])
//! - **Relationships**: Typed connections between elements in one of three
//!   direction shapes ([`relation` module])
//!
//! Chordal never owns the model it visualizes. The handles defined here are
//! cheap-clone views into an externally-owned object model; the pipeline
//! reads and indexes them but never creates, mutates, or destroys model
//! content on its own.

pub mod element;
pub mod identifier;
pub mod relation;

pub use element::{Concept, Element};
pub use identifier::Id;
pub use relation::{EndRef, RelationEnds, Relationship};
