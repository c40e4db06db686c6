//! CLI logic for the Chordal extraction driver.
//!
//! Runs one headless extraction pass: load a model document, apply the
//! visualization configuration, collect and resolve, and write the chord
//! payload JSON that a rendering surface would otherwise receive over the
//! bridge.

pub mod document;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use chordal::{
    ChordError,
    collect::{ElementFilter, collect_elements},
    orphan::without_orphans,
    payload::{ChordPayload, PayloadOptions},
    resolve::{RelationFilter, build_matrix},
};

use document::ModelDocument;

/// Run the Chordal CLI application
///
/// This function loads the model document, runs the extraction pipeline
/// once, and writes the resulting payload to the output file.
///
/// # Errors
///
/// Returns `ChordError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Model document errors
/// - Payload serialization errors
pub fn run(args: &Args) -> Result<(), ChordError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing model document"
    );

    let visualization = config::load_config(args)?;

    let text = fs::read_to_string(&args.input)?;
    let root = ModelDocument::from_json(&text)?.build()?;

    let filter = ElementFilter::new(&visualization.element_type, visualization.include_subtypes);
    let index = collect_elements(&root, &filter, visualization.recursive);

    if index.is_empty() {
        // A valid outcome, not an error: report it instead of writing an
        // empty diagram.
        warn!(input_path = args.input; "No elements match the current filters; nothing written");
        return Ok(());
    }

    let matrix = build_matrix(&index, &RelationFilter::new(&visualization.relation_criteria));
    let matrix = if visualization.show_orphans {
        matrix
    } else {
        without_orphans(matrix)
    };

    let payload = ChordPayload::new(
        &matrix,
        PayloadOptions {
            show_labels: visualization.show_labels,
            show_legend: visualization.show_legend,
        },
    );
    fs::write(&args.output, payload.to_json()?)?;

    info!(
        output_file = args.output,
        elements = matrix.size();
        "Chord payload written"
    );

    Ok(())
}
