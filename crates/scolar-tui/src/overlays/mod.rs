//! Modal overlays.
//!
//! Overlays temporarily take over keyboard input. Each one is
//! self-contained: it owns its state, key handler, and render function.
//!
//! - `login.rs`: credential entry, shown at startup and after a forced
//!   disconnect
//! - `record_form.rs`: create/edit form for the resource screens, plus the
//!   QR check-in entry form
//! - `render_utils.rs`: shared popup rendering helpers

pub mod login;
pub mod record_form;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use login::LoginOverlay;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use record_form::FormOverlay;

use crate::effects::UiEffect;
use crate::state::TuiState;

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self {
            transition: OverlayTransition::Stay,
            effects: Vec::new(),
        }
    }

    pub fn close() -> Self {
        Self {
            transition: OverlayTransition::Close,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Login(LoginOverlay),
    Form(FormOverlay),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Login(o) => o.render(frame, area),
            Overlay::Form(o) => o.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Login(o) => o.handle_key(tui, key),
            Overlay::Form(o) => o.handle_key(tui, key),
        }
    }

    /// True for the login overlay, which must not be dismissed while the
    /// session is unauthenticated.
    pub fn is_login(&self) -> bool {
        matches!(self, Overlay::Login(_))
    }
}
