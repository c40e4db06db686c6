//! Chordal - chord-diagram extraction for typed model graphs.
//!
//! Chordal extracts a typed subgraph from an externally-owned object model,
//! transforms it into a weighted adjacency representation suited to a
//! chord-style relationship visualization, and synchronizes that
//! representation with an asynchronously-loading rendering surface.
//!
//! The pipeline for one refresh pass:
//!
//! 1. [`collect::collect_elements`] walks the context container under the
//!    element-type filter and produces the ordered [`collect::ElementIndex`].
//! 2. [`resolve::build_matrix`] resolves relationship directions and
//!    accumulates weights into a [`matrix::ChordMatrix`].
//! 3. [`orphan::without_orphans`] optionally removes zero-weight elements and
//!    reindexes the result.
//! 4. The [`payload::ChordPayload`] JSON is pushed to the surface, guarded by
//!    the [`handshake::Orchestrator`] so nothing is sent before the surface
//!    is ready.
//!
//! [`ChordView`] is the host-facing facade wiring the pieces together.

pub mod collect;
pub mod config;
pub mod handshake;
pub mod matrix;
pub mod orphan;
pub mod payload;
pub mod resolve;
pub mod settings;
pub mod surface;

mod error;

pub use chordal_core as core;
pub use error::ChordError;

use std::{
    rc::Rc,
    sync::mpsc::{Receiver, channel},
};

use log::{debug, info, warn};

use chordal_core::{Element, Relationship};

use collect::{ElementFilter, collect_elements};
use config::VisualizationConfig;
use handshake::Orchestrator;
use matrix::ChordMatrix;
use payload::{ChordPayload, PayloadOptions};
use resolve::{RelationFilter, build_matrix};
use surface::{EngineOptions, SurfaceEvent, SurfaceFactory, chart_markup};

/// Notice shown in the surface when the collection pass matches nothing.
const EMPTY_NOTICE: &str = "No elements match the current filters.";

/// Host-supplied target for click-through navigation.
///
/// Called on the host thread, after re-dispatch, with handles resolved
/// through the current snapshot.
pub trait NavigationSink {
    /// Open the element in the host UI.
    fn open_element(&self, element: &Element);

    /// Open the relationship in the host UI.
    fn open_relationship(&self, relationship: &Relationship);
}

/// The chord visualization attached to one diagram.
///
/// Owns the configuration, the rendering handshake, and the current
/// immutable view snapshot. All methods must be called on the host UI
/// thread; surface events are drained onto that thread via
/// [`ChordView::pump_events`].
pub struct ChordView {
    diagram: Element,
    default_context: Element,
    config: VisualizationConfig,
    orchestrator: Orchestrator,
    events: Receiver<SurfaceEvent>,
    sink: Box<dyn NavigationSink>,
    current: Option<Rc<ChordMatrix>>,
}

impl ChordView {
    /// Boots the rendering surface and starts loading the chart markup.
    ///
    /// `diagram` owns the persisted settings annotation slots;
    /// `default_context` (the diagram's owner) is used for collection until
    /// the user overrides the context. Persisted settings are loaded before
    /// the first refresh.
    ///
    /// # Errors
    ///
    /// [`ChordError::Activation`] when the rendering engine's activation
    /// precondition fails; this is fatal and not retried.
    pub fn new(
        diagram: Element,
        default_context: Element,
        factory: &dyn SurfaceFactory,
        options: &EngineOptions,
        sink: Box<dyn NavigationSink>,
    ) -> Result<Self, ChordError> {
        let (sender, events) = channel();
        let surface = factory.boot(options, sender)?;
        let mut orchestrator = Orchestrator::new(surface);

        let mut config = VisualizationConfig::default();
        if let Some(patch) = settings::load(&diagram) {
            debug!("Applying persisted settings");
            patch.apply(&mut config, |id| find_element(&default_context, id));
        }

        orchestrator.begin_load(chart_markup());

        Ok(Self {
            diagram,
            default_context,
            config,
            orchestrator,
            events,
            sink,
            current: None,
        })
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    /// Mutable access for the configuration form.
    pub fn config_mut(&mut self) -> &mut VisualizationConfig {
        &mut self.config
    }

    /// The current view snapshot, if a refresh has produced one.
    pub fn current_matrix(&self) -> Option<&Rc<ChordMatrix>> {
        self.current.as_ref()
    }

    pub fn handshake_state(&self) -> handshake::HandshakeState {
        self.orchestrator.state()
    }

    /// Runs one full extraction pass and pushes the result to the surface.
    ///
    /// The push is dropped when the surface is not ready; the pass itself
    /// still completes and swaps in a fresh snapshot, and the settings are
    /// persisted. An empty collection is not an error: it clears the
    /// snapshot and shows an in-surface notice instead of a chart.
    pub fn refresh(&mut self) -> Result<(), ChordError> {
        let context = self.config.effective_context(&self.default_context).clone();
        info!(
            context = context.id().to_string(),
            element_type = self.config.element_type,
            relation_criteria = self.config.relation_criteria;
            "Refreshing chord view"
        );

        let filter = ElementFilter::new(&self.config.element_type, self.config.include_subtypes);
        let index = collect_elements(&context, &filter, self.config.recursive);

        if index.is_empty() {
            info!("No elements matched the filter");
            self.current = None;
            self.orchestrator.show_notice(EMPTY_NOTICE);
            settings::store(&self.diagram, &self.config)?;
            return Ok(());
        }

        let matrix = build_matrix(&index, &RelationFilter::new(&self.config.relation_criteria));
        let matrix = if self.config.show_orphans {
            matrix
        } else {
            orphan::without_orphans(matrix)
        };

        let payload = ChordPayload::new(
            &matrix,
            PayloadOptions {
                show_labels: self.config.show_labels,
                show_legend: self.config.show_legend,
            },
        );
        let json = payload.to_json()?;

        // Swap the snapshot wholesale; click-through resolution only ever
        // sees a complete matrix/navigation pair.
        self.current = Some(Rc::new(matrix));
        self.orchestrator.push_payload(&json);

        settings::store(&self.diagram, &self.config)?;
        Ok(())
    }

    /// Drains pending surface events onto the host thread and handles them.
    pub fn pump_events(&mut self) -> Result<(), ChordError> {
        let pending: Vec<SurfaceEvent> = self.events.try_iter().collect();
        for event in pending {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Handles one surface event. Must be called on the host thread.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Result<(), ChordError> {
        if self.orchestrator.state() == handshake::HandshakeState::Disposed {
            return Ok(());
        }
        match event {
            SurfaceEvent::LoadFinished { location } => {
                if self.orchestrator.handle_load_finished(&location) {
                    // Exactly one automatic refresh on entering Ready.
                    self.refresh()?;
                }
            }
            SurfaceEvent::SelectElement(index) => self.select_element(index),
            SurfaceEvent::SelectRelationship(source, target) => {
                self.select_relationship(source, target);
            }
            SurfaceEvent::Log(message) => debug!(message = message; "Surface log"),
        }
        Ok(())
    }

    /// Releases the rendering surface. Idempotent.
    pub fn dispose(&mut self) {
        self.orchestrator.dispose();
        self.current = None;
    }

    fn select_element(&self, index: usize) {
        let Some(matrix) = &self.current else {
            warn!(index = index; "Click-through with no current snapshot");
            return;
        };
        match matrix.element(index) {
            Some(element) => self.sink.open_element(element),
            None => warn!(index = index; "Element index out of range"),
        }
    }

    fn select_relationship(&self, source: usize, target: usize) {
        let Some(matrix) = &self.current else {
            warn!(source = source, target = target; "Click-through with no current snapshot");
            return;
        };
        if source >= matrix.size() || target >= matrix.size() {
            warn!(source = source, target = target; "Relationship coordinates out of range");
            return;
        }
        match matrix.navigation().resolve(source, target) {
            Some(relationships) => {
                if let Some(relationship) = relationships.first() {
                    self.sink.open_relationship(relationship);
                }
            }
            None => warn!(source = source, target = target; "No relationship at coordinates"),
        }
    }
}

/// Finds an element by persisted id string, searching the context tree.
fn find_element(root: &Element, id: &str) -> Option<Element> {
    if root.id() == id {
        return Some(root.clone());
    }
    for child in root.children() {
        if let Some(found) = find_element(&child, id) {
            return Some(found);
        }
    }
    None
}
