//! Configuration loading for the Chordal CLI.
//!
//! The CLI layers the visualization configuration: built-in defaults, then
//! the optional TOML configuration file, then individual command-line
//! overrides. The TOML file uses the same optional-field document as the
//! persisted settings blob, so a file written from a saved diagram works
//! unchanged.

use std::fs;

use log::debug;

use chordal::{ChordError, config::VisualizationConfig, settings::SettingsPatch};

use crate::args::Args;

/// Resolves the effective visualization configuration for this invocation.
pub fn load_config(args: &Args) -> Result<VisualizationConfig, ChordError> {
    let mut config = VisualizationConfig::default();

    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)?;
        let patch: SettingsPatch = toml::from_str(&text)
            .map_err(|err| ChordError::Model(format!("invalid configuration file: {err}")))?;
        debug!(config_path = path; "Applying configuration file");
        // Context ids only make sense inside a live host document.
        patch.apply(&mut config, |_| None);
    }

    if let Some(element_type) = &args.element_type {
        config.element_type = element_type.clone();
    }
    if let Some(relation) = &args.relation {
        config.relation_criteria = relation.clone();
    }
    if args.recursive {
        config.recursive = true;
    }
    if args.hide_orphans {
        config.show_orphans = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args() -> Args {
        Args {
            input: "model.json".to_string(),
            output: "chord.json".to_string(),
            config: None,
            element_type: None,
            relation: None,
            recursive: false,
            hide_orphans: false,
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = load_config(&base_args()).unwrap();
        assert_eq!(config.element_type, "Any");
        assert!(config.show_orphans);
    }

    #[test]
    fn test_config_file_then_flag_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "elementType = \"Class\"\nrecursive = true").unwrap();

        let mut args = base_args();
        args.config = Some(file.path().to_string_lossy().to_string());
        args.element_type = Some("Interface".to_string());

        let config = load_config(&args).unwrap();
        // The flag wins over the file; the file wins over the default.
        assert_eq!(config.element_type, "Interface");
        assert!(config.recursive);
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "recursive = \"not a bool\"").unwrap();

        let mut args = base_args();
        args.config = Some(file.path().to_string_lossy().to_string());

        assert!(load_config(&args).is_err());
    }
}
