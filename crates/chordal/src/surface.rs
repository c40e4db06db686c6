//! The rendering surface interface.
//!
//! The surface is a message-passing peer: an embedded browser-like engine
//! that loads the chart markup, accepts JSON payload pushes, and reports
//! load-lifecycle and click-through events back on its own thread. Chordal
//! only ever talks to it through [`RenderSurface`]; booting the engine goes
//! through a [`SurfaceFactory`] so hosts and tests can supply their own.
//!
//! All events cross threads as plain data over an `mpsc` channel and must be
//! drained on the host UI thread before they touch shared state.

use std::sync::mpsc::Sender;

use crate::error::ChordError;

/// Location reported for the neutral blank page.
pub const BLANK_LOCATION: &str = "about:blank";

/// Location reported once the prepared chart markup is loaded.
pub const CHART_LOCATION: &str = "chordal://chart";

/// Options for booting the rendering engine.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Activation credential for the embedded engine. Booting without one is
    /// a fatal configuration error.
    pub license_key: Option<String>,
}

/// Events originating on the rendering surface's thread.
///
/// Everything here is plain data; resolution against the element and
/// navigation indices happens only after re-dispatch onto the host thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A page finished loading; `location` tells blank apart from content.
    LoadFinished { location: String },

    /// Click-through on an arc: an element coordinate.
    SelectElement(usize),

    /// Click-through on a ribbon: a source/target coordinate pair.
    SelectRelationship(usize, usize),

    /// Log message from the in-surface script.
    Log(String),
}

/// The rendering surface as seen by the orchestrator.
///
/// Implementations wrap the embedded engine's browser instance. All methods
/// are fire-and-forget from the host's perspective; outcomes come back as
/// [`SurfaceEvent`]s.
pub trait RenderSurface {
    /// Whether the surface's content frame is available for direct loads.
    fn has_frame(&self) -> bool;

    /// Loads the neutral blank page.
    fn load_blank(&self);

    /// Loads the prepared chart markup.
    fn load_markup(&self, markup: &str);

    /// Injects the bidirectional messaging bridge into the loaded content.
    fn install_bridge(&self);

    /// Pushes a chord payload JSON string to the chart.
    fn push_payload(&self, json: &str);

    /// Shows an in-surface notice instead of a chart (e.g. "no elements").
    fn show_notice(&self, message: &str);

    /// Releases the browser instance. Must be idempotent.
    fn dispose(&self);
}

/// Boots rendering surfaces.
pub trait SurfaceFactory {
    /// Creates the engine and browser instance.
    ///
    /// `events` is the channel the surface uses to report lifecycle and
    /// click-through events; implementations keep the sender and emit from
    /// their own thread.
    ///
    /// # Errors
    ///
    /// [`ChordError::Activation`] when the engine's activation precondition
    /// is not satisfied; [`ChordError::Surface`] for other boot failures.
    fn boot(
        &self,
        options: &EngineOptions,
        events: Sender<SurfaceEvent>,
    ) -> Result<Box<dyn RenderSurface>, ChordError>;
}

/// The prepared chart markup loaded into the surface.
///
/// The chart script itself lives with the rendering engine; this page only
/// hosts it and the bridge endpoints.
pub fn chart_markup() -> String {
    "<!DOCTYPE html><html><head><title>Chordal</title></head>\
     <body><div id=\"chart\"></div></body></html>"
        .to_string()
}
