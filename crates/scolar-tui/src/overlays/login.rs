//! Credential entry overlay.
//!
//! Shown at startup and whenever the session is disconnected. It cannot be
//! dismissed: the console has nothing to show without a session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::render_utils::{InputHint, popup_area, popup_block, render_error_line, render_field_line, render_hints};
use super::OverlayUpdate;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct LoginOverlay {
    pub username: String,
    pub password: String,
    /// Present when the account must set a new password on first login.
    pub new_password: Option<String>,
    focus: usize,
    pub error: Option<String>,
}

impl LoginOverlay {
    pub fn open() -> Self {
        Self::default()
    }

    /// Reopens after a failed attempt, keeping the username.
    pub fn reopen(username: String, error: String) -> Self {
        Self {
            username,
            error: Some(error),
            ..Self::default()
        }
    }

    /// Switches to the first-login flow, which also sets a new password.
    pub fn require_new_password(&mut self) {
        if self.new_password.is_none() {
            self.new_password = Some(String::new());
        }
    }

    fn field_count(&self) -> usize {
        if self.new_password.is_some() { 3 } else { 2 }
    }

    fn focused_value(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.username,
            1 => &mut self.password,
            _ => self.new_password.as_mut().unwrap_or(&mut self.password),
        }
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter) {
            self.error = None;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => OverlayUpdate::stay().with_effects(vec![UiEffect::Quit]),
            KeyCode::Char('n') if ctrl => {
                self.require_new_password();
                OverlayUpdate::stay()
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.field_count();
                OverlayUpdate::stay()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.field_count() - 1) % self.field_count();
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                if tui.tasks.login.is_running() {
                    self.error = Some("Signing in...".to_string());
                    return OverlayUpdate::stay();
                }
                if self.username.trim().is_empty() || self.password.is_empty() {
                    self.error = Some("Username and password are required".to_string());
                    return OverlayUpdate::stay();
                }
                if self.new_password.as_ref().is_some_and(String::is_empty) {
                    self.error = Some("New password is required".to_string());
                    return OverlayUpdate::stay();
                }
                let task = tui.start_task(TaskKind::Login);
                OverlayUpdate::stay().with_effects(vec![UiEffect::SubmitLogin {
                    task,
                    username: self.username.trim().to_string(),
                    password: self.password.clone(),
                    new_password: self.new_password.clone(),
                }])
            }
            KeyCode::Backspace => {
                self.focused_value().pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.focused_value().push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = if self.new_password.is_some() { 9 } else { 8 };
        let popup = popup_area(area, 52, height);
        let inner = popup_block(frame, popup, "Sign in", Color::Cyan);

        let row = |i: u16| Rect::new(inner.x, inner.y + i, inner.width, 1);
        render_field_line(frame, row(0), "Username", &self.username, false, self.focus == 0);
        render_field_line(frame, row(1), "Password", &self.password, true, self.focus == 1);
        let mut next = 2;
        if let Some(new_password) = &self.new_password {
            render_field_line(frame, row(next), "New password", new_password, true, self.focus == 2);
            next += 1;
        }
        render_error_line(frame, row(next + 1), self.error.as_deref());

        let hints = [
            InputHint::new("Enter", "sign in"),
            InputHint::new("Ctrl+N", "first login"),
            InputHint::new("Ctrl+C", "quit"),
        ];
        render_hints(frame, inner, &hints, Color::Cyan);
    }
}
