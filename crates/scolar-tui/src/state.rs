//! Application state.
//!
//! State tree:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── screen: Resource          (active tab)
//! │   ├── screens: [ScreenState; 5] (rows + selection per resource)
//! │   ├── feedback: FeedbackState   (confirm / error / success surfaces)
//! │   ├── task_seq: TaskSeq
//! │   ├── tasks: Tasks
//! │   └── authenticated: bool
//! └── overlay: Option<Overlay>      (login, record form)
//! ```
//!
//! Only the reducer in `update.rs` mutates this tree; the runtime reads it
//! to render and executes the effects the reducer returns.

use crate::common::{TaskId, TaskKind, TaskSeq, Tasks};
use crate::feedback::FeedbackState;
use crate::overlays::{LoginOverlay, Overlay};
use crate::resources::{Resource, Rows};

/// Rows and cursor for one resource screen.
#[derive(Debug, Default)]
pub struct ScreenState {
    /// None until the first successful load.
    pub rows: Option<Rows>,
    pub selected: usize,
}

impl ScreenState {
    /// Installs freshly loaded rows, keeping the cursor in bounds.
    pub fn set_rows(&mut self, rows: Rows) {
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        self.rows = Some(rows);
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.rows.as_ref().map_or(0, Rows::len);
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len - 1;
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(last);
    }
}

#[derive(Debug)]
pub struct TuiState {
    pub should_quit: bool,
    /// The active tab.
    pub screen: Resource,
    /// One slot per resource, indexed by `Resource::index`.
    pub screens: [ScreenState; 5],
    pub feedback: FeedbackState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// False until a login succeeds; reset by a forced disconnect.
    pub authenticated: bool,
}

impl TuiState {
    pub fn screen_state(&self, resource: Resource) -> &ScreenState {
        &self.screens[resource.index()]
    }

    pub fn screen_state_mut(&mut self, resource: Resource) -> &mut ScreenState {
        &mut self.screens[resource.index()]
    }

    pub fn current(&self) -> &ScreenState {
        self.screen_state(self.screen)
    }

    /// Allocates a task id and marks the slot running.
    pub fn start_task(&mut self, kind: TaskKind) -> TaskId {
        let id = self.task_seq.next_id();
        self.tasks.state_mut(kind).on_started(id);
        id
    }

    /// Drops everything tied to the old session.
    pub fn reset_session(&mut self) {
        self.authenticated = false;
        self.screens = Default::default();
        self.feedback = FeedbackState::default();
        self.tasks = Tasks::default();
    }
}

#[derive(Debug)]
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Starts unauthenticated, with the login overlay up.
    pub fn new() -> Self {
        Self {
            tui: TuiState {
                should_quit: false,
                screen: Resource::Students,
                screens: Default::default(),
                feedback: FeedbackState::default(),
                task_seq: TaskSeq::default(),
                tasks: Tasks::default(),
                authenticated: false,
            },
            overlay: Some(Overlay::Login(LoginOverlay::open())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use scolar_types::Teacher;

    use super::*;

    fn teachers(n: usize) -> Rows {
        Rows::Teachers(
            (0..n)
                .map(|i| Teacher {
                    id: i as u64 + 1,
                    first_name: format!("T{i}"),
                    last_name: "Lastname".to_string(),
                    email: format!("t{i}@example.org"),
                    phone: "0612345678".to_string(),
                    speciality: "maths".to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_selection_clamped_on_reload() {
        let mut screen = ScreenState::default();
        screen.set_rows(teachers(5));
        screen.selected = 4;

        // A shorter reload pulls the cursor back in bounds.
        screen.set_rows(teachers(2));
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut screen = ScreenState::default();
        screen.set_rows(teachers(3));

        screen.move_selection(1);
        screen.move_selection(1);
        screen.move_selection(1);
        assert_eq!(screen.selected, 2);
        screen.move_selection(-5);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_new_state_starts_at_login() {
        let app = AppState::new();
        assert!(!app.tui.authenticated);
        assert!(app.overlay.as_ref().is_some_and(Overlay::is_login));
    }
}
