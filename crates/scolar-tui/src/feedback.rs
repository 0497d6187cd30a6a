//! Confirm / error / success feedback surfaces.
//!
//! Three independent surfaces that can be mounted at the same time, each
//! holding at most one pending request (a new request overwrites the old
//! one; there is no queue):
//!
//! - Confirm: stays up until the user accepts or declines. Accepting
//!   yields the pending action for the reducer to turn into an effect.
//! - Error / Success: auto-dismiss after [`NOTICE_DISMISS`] unless the
//!   pointer is hovering the notice; the timer is suspended while hovered
//!   and restarts from zero when the pointer leaves. Manual close always
//!   works immediately.
//!
//! Timers are plain deadlines owned by the notice and advanced by the
//! runtime tick with an explicit `now`, so they are unit-testable and
//! cannot leak across remounts.

use std::cell::Cell;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use scolar_client::Outcome;

use crate::resources::Resource;

/// How long an error/success notice stays up without hover.
pub const NOTICE_DISMISS: Duration = Duration::from_millis(2000);

/// The action a confirm surface is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { resource: Resource, record_id: u64 },
    Logout,
}

/// A pending confirmation. No auto-dismiss timer.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// A transient error or success notice.
#[derive(Debug)]
pub struct NoticeState {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    /// Status code shown alongside the message for support purposes.
    pub code: Option<u16>,
    deadline: Instant,
    hovered: bool,
    /// Last rendered rect, for pointer hit-testing (set during render).
    pub area: Cell<Rect>,
}

impl NoticeState {
    fn new(kind: NoticeKind, title: String, message: String, code: Option<u16>, now: Instant) -> Self {
        Self {
            kind,
            title,
            message,
            code,
            deadline: now + NOTICE_DISMISS,
            hovered: false,
            area: Cell::new(Rect::default()),
        }
    }

    /// True when the notice should be dismissed at `now`.
    ///
    /// Hover suspends expiry entirely; the deadline is re-armed on leave.
    pub fn expired(&self, now: Instant) -> bool {
        !self.hovered && now >= self.deadline
    }

    /// Feeds a pointer position; manages the hover pause.
    pub fn pointer_at(&mut self, column: u16, row: u16, now: Instant) {
        let inside = hit(self.area.get(), column, row);
        if inside && !self.hovered {
            self.hovered = true;
        } else if !inside && self.hovered {
            // Restart from zero once the pointer leaves.
            self.hovered = false;
            self.deadline = now + NOTICE_DISMISS;
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// The three feedback surfaces of one screen.
#[derive(Debug, Default)]
pub struct FeedbackState {
    pub confirm: Option<ConfirmState>,
    pub error: Option<NoticeState>,
    pub success: Option<NoticeState>,
}

impl FeedbackState {
    /// Raises a confirmation request (overwrites any pending one).
    pub fn ask(&mut self, title: impl Into<String>, message: impl Into<String>, action: PendingAction) {
        self.confirm = Some(ConfirmState {
            title: title.into(),
            message: message.into(),
            action,
        });
    }

    /// Accepts the pending confirmation, yielding its action.
    pub fn accept(&mut self) -> Option<PendingAction> {
        self.confirm.take().map(|c| c.action)
    }

    /// Declines the pending confirmation without running its action.
    pub fn decline(&mut self) {
        self.confirm = None;
    }

    /// Raises an error notice (overwrites any visible one).
    pub fn show_error(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        code: Option<u16>,
        now: Instant,
    ) {
        self.error = Some(NoticeState::new(
            NoticeKind::Error,
            title.into(),
            message.into(),
            code,
            now,
        ));
    }

    /// Raises a success notice (overwrites any visible one).
    pub fn show_success(&mut self, title: impl Into<String>, message: impl Into<String>, now: Instant) {
        self.success = Some(NoticeState::new(
            NoticeKind::Success,
            title.into(),
            message.into(),
            None,
            now,
        ));
    }

    /// Reports a mutation outcome as exactly one feedback request.
    pub fn report(&mut self, verb: &str, outcome: &Outcome, now: Instant) {
        if outcome.is_success() {
            self.show_success(format!("{} complete", capitalize(verb)), outcome.message(), now);
        } else {
            self.show_error(
                format!("Could not {verb}"),
                outcome.message(),
                Some(outcome.code()),
                now,
            );
        }
    }

    /// Advances auto-dismiss timers.
    pub fn tick(&mut self, now: Instant) {
        if self.error.as_ref().is_some_and(|n| n.expired(now)) {
            self.error = None;
        }
        if self.success.as_ref().is_some_and(|n| n.expired(now)) {
            self.success = None;
        }
    }

    /// Routes a pointer move to both notices.
    pub fn pointer_at(&mut self, column: u16, row: u16, now: Instant) {
        if let Some(notice) = &mut self.error {
            notice.pointer_at(column, row, now);
        }
        if let Some(notice) = &mut self.success {
            notice.pointer_at(column, row, now);
        }
    }

    /// Manual close: hides both notices immediately, hover or not.
    pub fn close_notices(&mut self) {
        self.error = None;
        self.success = None;
    }

    pub fn any_notice_visible(&self) -> bool {
        self.error.is_some() || self.success.is_some()
    }
}

fn capitalize(verb: &str) -> String {
    let mut chars = verb.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
