//! Outbound JSON payload pushed to the rendering surface.

use serde::Serialize;

use crate::{error::ChordError, matrix::ChordMatrix};

/// Display options forwarded to the chart alongside the data.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadOptions {
    pub show_labels: bool,
    pub show_legend: bool,
}

/// The payload shape the rendering surface consumes.
///
/// `matrix` is square with `names.len()` rows; the rendering side never sees
/// element handles, only names, weights, and coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct ChordPayload {
    names: Vec<String>,
    matrix: Vec<Vec<f64>>,
    options: PayloadOptions,
}

impl ChordPayload {
    /// Builds the payload for a finished matrix.
    pub fn new(matrix: &ChordMatrix, options: PayloadOptions) -> Self {
        Self {
            names: matrix.names(),
            matrix: matrix.weights().to_vec(),
            options,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Serializes the payload to the JSON string sent over the bridge.
    pub fn to_json(&self) -> Result<String, ChordError> {
        Ok(serde_json::to_string(self)?)
    }
}
