//! Events consumed by the reducer.

use scolar_client::Outcome;

use crate::common::TaskId;
use crate::resources::{Resource, Rows};

/// Everything that can happen to the console.
#[derive(Debug)]
pub enum UiEvent {
    /// Frame cadence; drives feedback auto-dismiss timers.
    Tick,
    /// Raw terminal input (keys, mouse, resize).
    Terminal(crossterm::event::Event),
    /// A list load finished.
    ListLoaded {
        id: TaskId,
        resource: Resource,
        result: Result<Rows, String>,
    },
    /// A mutation finished; the outcome still needs reporting.
    MutationFinished {
        id: TaskId,
        resource: Resource,
        /// Verb for the feedback title ("delete", "save", "check-in").
        verb: &'static str,
        result: Result<Outcome, String>,
    },
    /// A login attempt finished.
    LoginFinished {
        id: TaskId,
        result: Result<Outcome, String>,
    },
    /// The session guard disconnected the session (forced logout).
    Disconnected,
}
