//! Model document loader.
//!
//! The CLI runs the pipeline headlessly, so the host model is described in a
//! small JSON document: one root element tree plus a flat relationship list
//! referencing element ids. The loader turns the document into live
//! `chordal-core` handles with relationships attached to every participant.

use std::collections::HashMap;

use serde::Deserialize;

use chordal::ChordError;
use chordal_core::{Concept, Element, EndRef, Id, RelationEnds, Relationship};

/// A model document: the root container and the relationships among the
/// elements it owns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    pub root: ElementDoc,
    #[serde(default)]
    pub relationships: Vec<RelationshipDoc>,
}

/// One element in the document tree.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDoc {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub children: Vec<ElementDoc>,
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// One relationship, in exactly one of the three end shapes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDoc {
    #[serde(default)]
    pub id: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub member_ends: Option<[String; 2]>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ModelDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ChordError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the live model and returns its root element.
    ///
    /// # Errors
    ///
    /// [`ChordError::Model`] for duplicate element ids, relationships that
    /// reference unknown ids, or relationships with no recognizable shape.
    pub fn build(&self) -> Result<Element, ChordError> {
        let mut by_id = HashMap::new();
        let root = build_element(&self.root, &mut by_id)?;

        for (n, doc) in self.relationships.iter().enumerate() {
            let id = match &doc.id {
                Some(id) => Id::new(id),
                None => Id::new(&format!("relationship-{n}")),
            };
            let (ends, involved) = resolve_ends(doc, &by_id)?;
            let relationship = Relationship::new(id, doc.kind.clone(), ends);
            for element in involved {
                element.attach_relationship(relationship.clone());
            }
        }

        Ok(root)
    }
}

fn build_element(
    doc: &ElementDoc,
    by_id: &mut HashMap<String, Element>,
) -> Result<Element, ChordError> {
    if by_id.contains_key(&doc.id) {
        return Err(ChordError::Model(format!("duplicate element id: {}", doc.id)));
    }
    let element = Element::with_concepts(
        Id::new(&doc.id),
        doc.name.clone(),
        doc.kind.clone(),
        doc.concepts.clone(),
    );
    for annotation in &doc.annotations {
        element.add_annotation(annotation.clone());
    }
    by_id.insert(doc.id.clone(), element.clone());
    for child in &doc.children {
        element.add_child(build_element(child, by_id)?);
    }
    Ok(element)
}

fn resolve_ends(
    doc: &RelationshipDoc,
    by_id: &HashMap<String, Element>,
) -> Result<(RelationEnds, Vec<Element>), ChordError> {
    let lookup = |id: &String| -> Result<Element, ChordError> {
        by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ChordError::Model(format!("unknown element id in relationship: {id}")))
    };

    if let Some([first, second]) = &doc.member_ends {
        let first = lookup(first)?;
        let second = lookup(second)?;
        let ends = RelationEnds::MemberEnds {
            first: EndRef::new(&first),
            second: EndRef::new(&second),
        };
        return Ok((ends, vec![first, second]));
    }

    if !doc.sources.is_empty() && !doc.targets.is_empty() {
        let sources: Vec<Element> = doc.sources.iter().map(&lookup).collect::<Result<_, _>>()?;
        let targets: Vec<Element> = doc.targets.iter().map(&lookup).collect::<Result<_, _>>()?;
        let involved: Vec<Element> = sources.iter().chain(targets.iter()).cloned().collect();
        let ends = RelationEnds::Directed {
            sources: sources.iter().map(EndRef::new).collect(),
            targets: targets.iter().map(EndRef::new).collect(),
        };
        return Ok((ends, involved));
    }

    if !doc.participants.is_empty() {
        let participants: Vec<Element> = doc
            .participants
            .iter()
            .map(&lookup)
            .collect::<Result<_, _>>()?;
        let ends = RelationEnds::Symmetric {
            participants: participants.iter().map(EndRef::new).collect(),
        };
        return Ok((ends, participants));
    }

    Err(ChordError::Model(format!(
        "relationship of kind {} has no member ends, sources/targets, or participants",
        doc.kind
    )))
}
