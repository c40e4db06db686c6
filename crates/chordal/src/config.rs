//! Visualization configuration.
//!
//! [`VisualizationConfig`] carries the filter and display settings that drive
//! one refresh pass. It is created with the defaults the configuration form
//! starts from, mutated only by the host UI, and round-tripped through the
//! settings codec in [`crate::settings`].

use chordal_core::Element;

/// The filter value that matches everything, for both element types and
/// relation criteria.
pub const ANY: &str = "Any";

/// Filter and display configuration for the chord visualization.
///
/// `show_implied` and `depth` are reserved extension points: they are
/// persisted and round-tripped but not yet consumed by matrix building.
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    /// Explicit context override. `None` means the default context (the
    /// diagram's owner) is used.
    pub context: Option<Element>,
    /// Descend into nested containers during collection.
    pub recursive: bool,
    /// Element-type filter value (e.g. `Any`, `Class`, `Block`).
    pub element_type: String,
    /// Match specialized variants of well-known types via capability checks.
    pub include_subtypes: bool,
    /// Relation-kind filter value (e.g. `Any`, `Dependency`).
    pub relation_criteria: String,
    /// Reserved; persisted but not consumed.
    pub show_implied: bool,
    /// Reserved; persisted but not consumed.
    pub depth: u32,
    /// Keep elements with no incident weight in the diagram.
    pub show_orphans: bool,
    /// Display arc labels in the rendering surface.
    pub show_labels: bool,
    /// Display the legend in the rendering surface.
    pub show_legend: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            context: None,
            recursive: false,
            element_type: ANY.to_string(),
            include_subtypes: true,
            relation_criteria: ANY.to_string(),
            show_implied: false,
            depth: 1,
            show_orphans: true,
            show_labels: true,
            show_legend: false,
        }
    }
}

impl VisualizationConfig {
    /// Whether the context has been explicitly overridden by the user.
    pub fn is_context_overridden(&self) -> bool {
        self.context.is_some()
    }

    /// Resolves the effective context for collection: the explicit override
    /// if set, otherwise the given default.
    pub fn effective_context<'a>(&'a self, default: &'a Element) -> &'a Element {
        self.context.as_ref().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordal_core::Id;

    #[test]
    fn test_defaults_match_configuration_form() {
        let config = VisualizationConfig::default();

        assert!(config.context.is_none());
        assert!(!config.recursive);
        assert_eq!(config.element_type, ANY);
        assert!(config.include_subtypes);
        assert_eq!(config.relation_criteria, ANY);
        assert!(!config.show_implied);
        assert_eq!(config.depth, 1);
        assert!(config.show_orphans);
        assert!(config.show_labels);
        assert!(!config.show_legend);
    }

    #[test]
    fn test_effective_context_prefers_override() {
        let owner = Element::new(Id::new("owner"), "Owner", "Package");
        let other = Element::new(Id::new("other"), "Other", "Package");

        let mut config = VisualizationConfig::default();
        assert_eq!(config.effective_context(&owner).id(), owner.id());

        config.context = Some(other.clone());
        assert_eq!(config.effective_context(&owner).id(), other.id());
        assert!(config.is_context_overridden());
    }
}
