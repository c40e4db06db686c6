//! Settings codec: persisting the visualization configuration.
//!
//! The active [`VisualizationConfig`] is serialized to a small JSON document
//! and stored as an opaque blob inside one of the diagram element's free-text
//! annotation slots, tagged with a recognizable prefix. On load, the first
//! tagged slot wins; a missing or malformed payload silently falls back to
//! defaults. Every field is optional on read so that payloads written by
//! older versions keep working.

use chordal_core::Element;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::VisualizationConfig, error::ChordError};

/// Fixed literal prefix identifying a Chordal settings blob.
pub const SETTINGS_PREFIX: &str = "chordal-settings:";

/// The persisted settings document.
///
/// All fields are optional: a field absent from a stored payload keeps the
/// current in-memory value when the patch is applied. `contextElementId` is
/// written only when the context is explicitly overridden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_element_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_subtypes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_implied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_orphans: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
}

impl SettingsPatch {
    /// Captures the full configuration as a patch.
    pub fn from_config(config: &VisualizationConfig) -> Self {
        Self {
            context_element_id: config.context.as_ref().map(|c| c.id().to_string()),
            recursive: Some(config.recursive),
            element_type: Some(config.element_type.clone()),
            include_subtypes: Some(config.include_subtypes),
            relation_criteria: Some(config.relation_criteria.clone()),
            show_implied: Some(config.show_implied),
            depth: Some(config.depth),
            show_orphans: Some(config.show_orphans),
            show_labels: Some(config.show_labels),
            show_legend: Some(config.show_legend),
        }
    }

    /// Applies the patch onto a configuration; absent fields keep the
    /// configuration's current values.
    ///
    /// `resolve_context` turns a persisted context element id back into a
    /// live element; when it fails, the context override is left untouched.
    pub fn apply(
        &self,
        config: &mut VisualizationConfig,
        resolve_context: impl Fn(&str) -> Option<Element>,
    ) {
        if let Some(id) = &self.context_element_id {
            if let Some(element) = resolve_context(id) {
                config.context = Some(element);
            }
        }
        if let Some(recursive) = self.recursive {
            config.recursive = recursive;
        }
        if let Some(element_type) = &self.element_type {
            config.element_type = element_type.clone();
        }
        if let Some(include_subtypes) = self.include_subtypes {
            config.include_subtypes = include_subtypes;
        }
        if let Some(relation_criteria) = &self.relation_criteria {
            config.relation_criteria = relation_criteria.clone();
        }
        if let Some(show_implied) = self.show_implied {
            config.show_implied = show_implied;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(show_orphans) = self.show_orphans {
            config.show_orphans = show_orphans;
        }
        if let Some(show_labels) = self.show_labels {
            config.show_labels = show_labels;
        }
        if let Some(show_legend) = self.show_legend {
            config.show_legend = show_legend;
        }
    }
}

/// Encodes a configuration into a prefixed settings blob.
pub fn encode(config: &VisualizationConfig) -> Result<String, ChordError> {
    let json = serde_json::to_string(&SettingsPatch::from_config(config))?;
    Ok(format!("{SETTINGS_PREFIX}{json}"))
}

/// Decodes a settings blob, if it carries the prefix and parses.
///
/// A malformed payload is recovered by returning `None`; the caller keeps
/// its defaults and the user never sees an error.
pub fn decode(blob: &str) -> Option<SettingsPatch> {
    let json = blob.strip_prefix(SETTINGS_PREFIX)?;
    match serde_json::from_str(json) {
        Ok(patch) => Some(patch),
        Err(err) => {
            debug!(err:?; "Ignoring malformed settings blob");
            None
        }
    }
}

/// Loads the settings patch from the first tagged annotation slot of the
/// diagram element, if any.
pub fn load(diagram: &Element) -> Option<SettingsPatch> {
    diagram
        .annotations()
        .iter()
        .find_map(|annotation| decode(annotation))
}

/// Stores the configuration into the diagram element's annotation slots.
///
/// Replaces the first tagged slot in place, or appends a new slot when none
/// exists yet.
pub fn store(diagram: &Element, config: &VisualizationConfig) -> Result<(), ChordError> {
    let blob = encode(config)?;
    let existing = diagram
        .annotations()
        .iter()
        .position(|annotation| annotation.starts_with(SETTINGS_PREFIX));
    match existing {
        Some(index) => diagram.replace_annotation(index, blob),
        None => diagram.add_annotation(blob),
    }
    Ok(())
}
