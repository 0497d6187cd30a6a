//! Full-screen console UI for Scolar.
//!
//! Elm-style split: `state` holds data, `update` is the reducer, `effects`
//! are the commands it returns, and `runtime` executes them against the
//! API client. Overlays (login, record form) take over keyboard input;
//! feedback surfaces (confirm / error / success) are independent of the
//! overlay slot and may be mounted simultaneously.

pub mod common;
pub mod effects;
pub mod events;
pub mod feedback;
pub mod overlays;
pub mod render;
pub mod resources;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use runtime::ConsoleRuntime;
use scolar_client::ApiClient;

/// Runs the interactive admin console.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the event loop fails.
pub fn run_console(client: ApiClient) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `scolar qr` or `scolar login` for non-interactive use."
        );
    }

    let mut runtime = ConsoleRuntime::new(client)?;
    runtime.run()
}
