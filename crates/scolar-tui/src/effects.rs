//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! network calls or spawns tasks directly.

use crate::common::TaskId;
use crate::resources::{RecordDraft, Resource};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch the rows for a resource screen.
    LoadList { task: TaskId, resource: Resource },

    /// Create or update a record from a form draft.
    SubmitRecord { task: TaskId, draft: RecordDraft },

    /// Delete one record (already confirm-gated by the reducer).
    DeleteRecord {
        task: TaskId,
        resource: Resource,
        record_id: u64,
    },

    /// Attempt a login (or first login when `new_password` is set).
    SubmitLogin {
        task: TaskId,
        username: String,
        password: String,
        new_password: Option<String>,
    },

    /// Explicit logout: disconnect the session.
    Logout,
}
