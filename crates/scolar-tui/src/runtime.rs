//! Console runtime: owns the terminal, runs the event loop, executes
//! effects.
//!
//! All side effects happen here. The reducer stays pure and produces
//! effects; async results come back through an inbox channel that the
//! loop drains each frame. A watcher task turns the session store's
//! disconnect signal into a [`UiEvent::Disconnected`] so a forced logout
//! reaches the reducer no matter which call triggered it.

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use scolar_client::ApiClient;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::resources::{RecordDraft, Resource, Rows};
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame cadence while something is in flight (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll cadence when idle. Notices still dismiss on time: their deadline
/// check runs on every tick, and 100ms of slack on a 2s timer is invisible.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;

/// Full-screen console runtime.
///
/// Terminal state is restored on drop, panic, and Ctrl+C.
pub struct ConsoleRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiClient,
    inbox_tx: UiEventSender,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
}

impl ConsoleRuntime {
    /// Sets up the terminal and initial state.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be configured.
    pub fn new(client: ApiClient) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(),
            client,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the event loop until quit.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        self.spawn_disconnect_watcher();

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        let _ = terminal::restore_terminal();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Input and async results repaint immediately, not on the
                // next idle tick.
                dirty = true;
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(frame, &self.state))?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast cadence only while async work is pending or a notice timer
        // is counting down.
        let tick_interval = if self.state.tui.tasks.is_any_running()
            || self.state.tui.feedback.any_notice_visible()
        {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Forwards the session's disconnect signal into the inbox. Re-armed
    /// after each new login so every session gets a watcher.
    fn spawn_disconnect_watcher(&self) {
        let session = self.client.session().clone();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            loop {
                session.disconnect_signal().cancelled().await;
                if tx.send(UiEvent::Disconnected).is_err() {
                    return;
                }
                // Wait for the next login to arm a fresh signal.
                while session.is_disconnected() {
                    if tx.is_closed() {
                        return;
                    }
                    tokio::time::sleep(IDLE_POLL_DURATION).await;
                }
            }
        });
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a pure async handler and posts its result to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let _ = tx.send(f(client).await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::Logout => {
                // The watcher turns this into a Disconnected event.
                self.client.session().disconnect();
            }
            UiEffect::LoadList { task, resource } => {
                self.spawn_effect(move |client| async move {
                    let result = load_rows(&client, resource).await;
                    UiEvent::ListLoaded {
                        id: task,
                        resource,
                        result: result.map_err(|e| format!("{e:#}")),
                    }
                });
            }
            UiEffect::SubmitRecord { task, draft } => {
                let resource = draft.resource();
                let verb = submit_verb(&draft);
                self.spawn_effect(move |client| async move {
                    let result = submit_record(&client, &draft).await;
                    UiEvent::MutationFinished {
                        id: task,
                        resource,
                        verb,
                        result: result.map_err(|e| format!("{e:#}")),
                    }
                });
            }
            UiEffect::DeleteRecord {
                task,
                resource,
                record_id,
            } => {
                self.spawn_effect(move |client| async move {
                    let result = delete_record(&client, resource, record_id).await;
                    UiEvent::MutationFinished {
                        id: task,
                        resource,
                        verb: "delete",
                        result: result.map_err(|e| format!("{e:#}")),
                    }
                });
            }
            UiEffect::SubmitLogin {
                task,
                username,
                password,
                new_password,
            } => {
                self.spawn_effect(move |client| async move {
                    let result = match &new_password {
                        Some(new_password) => {
                            client.first_login(&username, &password, new_password).await
                        }
                        None => client.login(&username, &password).await,
                    };
                    UiEvent::LoginFinished {
                        id: task,
                        result: result.map_err(|e| format!("{e:#}")),
                    }
                });
            }
        }
    }
}

impl Drop for ConsoleRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

async fn load_rows(client: &ApiClient, resource: Resource) -> Result<Rows> {
    Ok(match resource {
        Resource::Students => Rows::Students(client.list_students().await?),
        Resource::Teachers => Rows::Teachers(client.list_teachers().await?),
        Resource::Formations => Rows::Formations(client.list_formations().await?),
        Resource::Payments => Rows::Payments(client.list_payments().await?),
        Resource::Attendance => Rows::Attendance(client.list_attendance().await?),
    })
}

fn submit_verb(draft: &RecordDraft) -> &'static str {
    match draft {
        RecordDraft::Scan(_) => "check in",
        RecordDraft::Payment(_) | RecordDraft::Attendance(_) => "record",
        _ if draft.is_update() => "update",
        _ => "create",
    }
}

async fn submit_record(
    client: &ApiClient,
    draft: &RecordDraft,
) -> Result<scolar_client::Outcome> {
    match draft {
        RecordDraft::Student(student) if draft.is_update() => client.update_student(student).await,
        RecordDraft::Student(student) => client.create_student(student).await,
        RecordDraft::Teacher(teacher) if draft.is_update() => client.update_teacher(teacher).await,
        RecordDraft::Teacher(teacher) => client.create_teacher(teacher).await,
        RecordDraft::Formation(formation) if draft.is_update() => {
            client.update_formation(formation).await
        }
        RecordDraft::Formation(formation) => client.create_formation(formation).await,
        RecordDraft::Payment(payment) => client.record_payment(payment).await,
        RecordDraft::Attendance(record) => client.record_attendance(record).await,
        RecordDraft::Scan(scan) => client.scan_checkin(scan).await,
    }
}

async fn delete_record(
    client: &ApiClient,
    resource: Resource,
    id: u64,
) -> Result<scolar_client::Outcome> {
    match resource {
        Resource::Students => client.delete_student(id).await,
        Resource::Teachers => client.delete_teacher(id).await,
        Resource::Formations => client.delete_formation(id).await,
        Resource::Payments => client.delete_payment(id).await,
        Resource::Attendance => client.delete_attendance(id).await,
    }
}
