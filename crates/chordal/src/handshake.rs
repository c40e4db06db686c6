//! The rendering handshake state machine.
//!
//! The rendering surface loads asynchronously; pushing data at it before the
//! chart markup and bridge are in place would disappear into the void (or
//! worse, race the blank placeholder page). The [`Orchestrator`] owns the
//! surface and guards every outbound push behind an explicit state machine:
//!
//! ```text
//! Booting -> BlankSettled -> ContentLoading -> Ready -> Disposed
//! ```
//!
//! Transitions happen only here, and only on the host thread; surface events
//! are re-dispatched before they reach [`Orchestrator::handle_load_finished`].
//!
//! A payload push attempted while not `Ready` is dropped, not queued. The
//! next explicit refresh, or the single automatic post-ready refresh, is
//! what eventually delivers current data; staleness is acceptable, queuing
//! complexity is not.

use log::{debug, info, warn};

use crate::surface::{BLANK_LOCATION, RenderSurface};

/// Lifecycle states of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Engine and browser instance created; nothing loaded yet.
    Booting,
    /// The neutral blank page finished loading; markup load can proceed.
    BlankSettled,
    /// The prepared chart markup is loading.
    ContentLoading,
    /// Content loaded and bridge injected; pushes are delivered.
    Ready,
    /// Torn down; every subsequent call is a no-op.
    Disposed,
}

/// Owns the rendering surface and its load lifecycle.
pub struct Orchestrator {
    surface: Box<dyn RenderSurface>,
    state: HandshakeState,
    prepared_markup: Option<String>,
}

impl Orchestrator {
    /// Wraps a freshly booted surface; the engine boot itself (including the
    /// activation precondition) belongs to the surface factory.
    pub fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self {
            surface,
            state: HandshakeState::Booting,
            prepared_markup: None,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == HandshakeState::Ready
    }

    /// Starts loading the prepared chart markup.
    ///
    /// When the surface's content frame is not yet available, a neutral
    /// blank page is loaded first and the markup is held back until the
    /// blank page's load-finished signal arrives.
    pub fn begin_load(&mut self, markup: String) {
        if self.state == HandshakeState::Disposed {
            return;
        }
        if self.surface.has_frame() {
            self.surface.load_markup(&markup);
            self.state = HandshakeState::ContentLoading;
        } else {
            debug!("Content frame not available; settling blank page first");
            self.prepared_markup = Some(markup);
            self.surface.load_blank();
        }
    }

    /// Handles a load-finished signal from the surface.
    ///
    /// Returns `true` when the surface just became ready; the caller owes
    /// the surface exactly one automatic refresh in response.
    pub fn handle_load_finished(&mut self, location: &str) -> bool {
        if self.state == HandshakeState::Disposed {
            // Late callback racing teardown; the engine is gone.
            return false;
        }
        if location == BLANK_LOCATION {
            if self.state == HandshakeState::Booting {
                self.state = HandshakeState::BlankSettled;
                if let Some(markup) = self.prepared_markup.take() {
                    self.surface.load_markup(&markup);
                    self.state = HandshakeState::ContentLoading;
                }
            }
            return false;
        }
        if self.state == HandshakeState::Ready {
            return false;
        }
        info!(location = location; "Rendering surface ready");
        self.state = HandshakeState::Ready;
        self.surface.install_bridge();
        true
    }

    /// Pushes a payload JSON string, if the surface is ready.
    ///
    /// Not-ready pushes are dropped and logged; they are never queued.
    pub fn push_payload(&self, json: &str) {
        if self.is_ready() {
            self.surface.push_payload(json);
        } else {
            warn!(state:? = self.state; "Surface not ready; payload dropped");
        }
    }

    /// Shows an in-surface notice, if the surface is ready.
    pub fn show_notice(&self, message: &str) {
        if self.is_ready() {
            self.surface.show_notice(message);
        } else {
            warn!(state:? = self.state; "Surface not ready; notice dropped");
        }
    }

    /// Releases the surface. Idempotent; safe from any state.
    pub fn dispose(&mut self) {
        if self.state == HandshakeState::Disposed {
            return;
        }
        self.surface.dispose();
        self.state = HandshakeState::Disposed;
        self.prepared_markup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CHART_LOCATION, chart_markup, testing::MockSurface};

    fn orchestrator(frame_available: bool) -> (Orchestrator, MockSurface) {
        let surface = MockSurface::new(frame_available);
        (Orchestrator::new(Box::new(surface.clone())), surface)
    }

    #[test]
    fn test_direct_load_when_frame_available() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.begin_load(chart_markup());

        assert_eq!(orchestrator.state(), HandshakeState::ContentLoading);
        assert_eq!(surface.recorded.borrow().blank_loads, 0);
        assert_eq!(surface.recorded.borrow().markup_loads, 1);
    }

    #[test]
    fn test_blank_settle_path() {
        let (mut orchestrator, surface) = orchestrator(false);
        orchestrator.begin_load(chart_markup());

        // Markup held back until the blank page settles.
        assert_eq!(orchestrator.state(), HandshakeState::Booting);
        assert_eq!(surface.recorded.borrow().blank_loads, 1);
        assert_eq!(surface.recorded.borrow().markup_loads, 0);

        let ready = orchestrator.handle_load_finished(BLANK_LOCATION);
        assert!(!ready);
        assert_eq!(orchestrator.state(), HandshakeState::ContentLoading);
        assert_eq!(surface.recorded.borrow().markup_loads, 1);
    }

    #[test]
    fn test_ready_only_on_content_location() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.begin_load(chart_markup());

        assert!(!orchestrator.handle_load_finished(BLANK_LOCATION));
        assert_ne!(orchestrator.state(), HandshakeState::Ready);

        assert!(orchestrator.handle_load_finished(CHART_LOCATION));
        assert_eq!(orchestrator.state(), HandshakeState::Ready);
        assert_eq!(surface.recorded.borrow().bridge_installs, 1);
    }

    #[test]
    fn test_ready_is_entered_once() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.begin_load(chart_markup());

        assert!(orchestrator.handle_load_finished(CHART_LOCATION));
        assert!(!orchestrator.handle_load_finished(CHART_LOCATION));
        assert_eq!(surface.recorded.borrow().bridge_installs, 1);
    }

    #[test]
    fn test_push_dropped_until_ready() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.begin_load(chart_markup());

        orchestrator.push_payload("{\"names\":[]}");
        assert!(surface.recorded.borrow().payloads.is_empty());

        orchestrator.handle_load_finished(CHART_LOCATION);
        orchestrator.push_payload("{\"names\":[]}");
        assert_eq!(surface.recorded.borrow().payloads.len(), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.dispose();
        orchestrator.dispose();

        assert_eq!(orchestrator.state(), HandshakeState::Disposed);
        assert_eq!(surface.recorded.borrow().disposals, 1);
    }

    #[test]
    fn test_callback_after_dispose_no_ops() {
        let (mut orchestrator, surface) = orchestrator(true);
        orchestrator.begin_load(chart_markup());
        orchestrator.dispose();

        assert!(!orchestrator.handle_load_finished(CHART_LOCATION));
        assert_eq!(orchestrator.state(), HandshakeState::Disposed);
        assert_eq!(surface.recorded.borrow().bridge_installs, 0);

        orchestrator.begin_load(chart_markup());
        assert_eq!(surface.recorded.borrow().markup_loads, 1);
    }
}
