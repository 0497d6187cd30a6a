//! The reducer.
//!
//! Takes the current state and one event, mutates state, and returns the
//! effects the runtime should execute. All session, task, and feedback
//! bookkeeping happens here; the runtime stays a dumb executor.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::feedback::PendingAction;
use crate::overlays::{FormOverlay, LoginOverlay, Overlay, OverlayTransition};
use crate::resources::Resource;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.feedback.tick(Instant::now());
            Vec::new()
        }
        UiEvent::Terminal(event) => handle_terminal(app, event),
        UiEvent::ListLoaded {
            id,
            resource,
            result,
        } => {
            if !app.tui.tasks.list_load.finish_if_active(id) {
                return Vec::new();
            }
            match result {
                Ok(rows) => app.tui.screen_state_mut(resource).set_rows(rows),
                Err(message) => {
                    app.tui
                        .feedback
                        .show_error("Could not load", message, None, Instant::now());
                }
            }
            Vec::new()
        }
        UiEvent::MutationFinished {
            id,
            resource,
            verb,
            result,
        } => {
            if !app.tui.tasks.mutation.finish_if_active(id) {
                return Vec::new();
            }
            match result {
                Ok(outcome) => {
                    let succeeded = outcome.is_success();
                    app.tui.feedback.report(verb, &outcome, Instant::now());
                    if succeeded {
                        // Refetch so the table reflects the change.
                        return vec![load(app, resource)];
                    }
                }
                Err(message) => {
                    app.tui.feedback.show_error(
                        format!("Could not {verb}"),
                        message,
                        None,
                        Instant::now(),
                    );
                }
            }
            Vec::new()
        }
        UiEvent::LoginFinished { id, result } => {
            if !app.tui.tasks.login.finish_if_active(id) {
                return Vec::new();
            }
            match result {
                Ok(outcome) if outcome.is_success() => {
                    tracing::info!("login succeeded");
                    app.tui.authenticated = true;
                    app.overlay = None;
                    app.tui
                        .feedback
                        .show_success("Signed in", "Welcome back.", Instant::now());
                    vec![load(app, app.tui.screen)]
                }
                Ok(outcome) => {
                    login_failed(app, outcome.message());
                    Vec::new()
                }
                Err(message) => {
                    login_failed(app, message);
                    Vec::new()
                }
            }
        }
        UiEvent::Disconnected => {
            // Forced logout: back to the login overlay, silently. The
            // feedback surfaces are part of the dropped session.
            tracing::info!("session disconnected, returning to login");
            app.tui.reset_session();
            if !app.overlay.as_ref().is_some_and(Overlay::is_login) {
                app.overlay = Some(Overlay::Login(LoginOverlay::open()));
            }
            Vec::new()
        }
    }
}

fn login_failed(app: &mut AppState, message: String) {
    if let Some(Overlay::Login(login)) = app.overlay.as_mut() {
        login.error = Some(message);
    } else {
        app.overlay = Some(Overlay::Login(LoginOverlay::reopen(String::new(), message)));
    }
}

/// Starts a list load for `resource`.
fn load(app: &mut AppState, resource: Resource) -> UiEffect {
    let task = app.tui.start_task(TaskKind::ListLoad);
    UiEffect::LoadList { task, resource }
}

fn handle_terminal(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            if matches!(
                mouse.kind,
                MouseEventKind::Moved | MouseEventKind::Drag(_)
            ) {
                app.tui
                    .feedback
                    .pointer_at(mouse.column, mouse.row, Instant::now());
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // The confirm surface outranks everything else on screen.
    if app.tui.feedback.confirm.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => match app.tui.feedback.accept() {
                Some(PendingAction::Delete {
                    resource,
                    record_id,
                }) => {
                    let task = app.tui.start_task(TaskKind::Mutation);
                    vec![UiEffect::DeleteRecord {
                        task,
                        resource,
                        record_id,
                    }]
                }
                Some(PendingAction::Logout) => vec![UiEffect::Logout],
                None => Vec::new(),
            },
            KeyCode::Char('n') | KeyCode::Esc => {
                app.tui.feedback.decline();
                Vec::new()
            }
            _ => Vec::new(),
        };
    }

    // Esc closes notices before anything else gets the key.
    if key.code == KeyCode::Esc && app.tui.feedback.any_notice_visible() {
        app.tui.feedback.close_notices();
        return Vec::new();
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&mut app.tui, key);
        if matches!(update.transition, OverlayTransition::Close) {
            app.overlay = None;
        }
        if update.effects.iter().any(|e| matches!(e, UiEffect::Quit)) {
            app.tui.should_quit = true;
        }
        return update.effects;
    }

    if !app.tui.authenticated {
        // No overlay and no session: nothing to act on.
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('q') => {
            app.tui.should_quit = true;
            vec![UiEffect::Quit]
        }
        KeyCode::Char('c') if ctrl => {
            app.tui.should_quit = true;
            vec![UiEffect::Quit]
        }
        KeyCode::Tab => switch_screen(app, 1),
        KeyCode::BackTab => switch_screen(app, -1),
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            jump_to(app, Resource::ALL[index])
        }
        KeyCode::Char('r') => vec![load(app, app.tui.screen)],
        KeyCode::Char('j') | KeyCode::Down => {
            let screen = app.tui.screen;
            app.tui.screen_state_mut(screen).move_selection(1);
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let screen = app.tui.screen;
            app.tui.screen_state_mut(screen).move_selection(-1);
            Vec::new()
        }
        KeyCode::Char('n') => {
            app.overlay = Some(Overlay::Form(FormOverlay::create(app.tui.screen)));
            Vec::new()
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            let screen = app.tui.current();
            if let Some(rows) = &screen.rows {
                if let Some(form) = FormOverlay::edit(rows, screen.selected) {
                    app.overlay = Some(Overlay::Form(form));
                }
            }
            Vec::new()
        }
        KeyCode::Char('d') => {
            ask_delete(app);
            Vec::new()
        }
        KeyCode::Char('c') if app.tui.screen == Resource::Attendance => {
            app.overlay = Some(Overlay::Form(FormOverlay::check_in()));
            Vec::new()
        }
        KeyCode::Char('s') => {
            app.tui.feedback.ask(
                "Sign out",
                "End this session and return to the login screen?",
                PendingAction::Logout,
            );
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn ask_delete(app: &mut AppState) {
    let resource = app.tui.screen;
    let screen = app.tui.current();
    let Some(rows) = &screen.rows else {
        return;
    };
    let Some(record_id) = rows.id_at(screen.selected) else {
        return;
    };
    let label = rows.label_at(screen.selected).unwrap_or_default();
    app.tui.feedback.ask(
        format!("Delete {}", resource.noun()),
        format!("Delete {label}? This cannot be undone."),
        PendingAction::Delete {
            resource,
            record_id,
        },
    );
}

fn switch_screen(app: &mut AppState, delta: isize) -> Vec<UiEffect> {
    let count = Resource::ALL.len() as isize;
    let index = (app.tui.screen.index() as isize + delta).rem_euclid(count) as usize;
    jump_to(app, Resource::ALL[index])
}

fn jump_to(app: &mut AppState, resource: Resource) -> Vec<UiEffect> {
    app.tui.screen = resource;
    // First visit fetches; revisits reuse what is already loaded.
    if app.tui.screen_state(resource).rows.is_none() && !app.tui.tasks.list_load.is_running() {
        return vec![load(app, resource)];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use scolar_client::Outcome;
    use scolar_types::Student;

    use super::*;
    use crate::resources::Rows;

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn authenticated_app() -> AppState {
        let mut app = AppState::new();
        app.tui.authenticated = true;
        app.overlay = None;
        app
    }

    fn one_student() -> Rows {
        Rows::Students(vec![Student {
            id: 7,
            first_name: "Amina".to_string(),
            last_name: "Haddad".to_string(),
            email: "amina@example.org".to_string(),
            phone: "0612345678".to_string(),
            birth_date: None,
            formation_ids: vec![],
        }])
    }

    #[test]
    fn test_delete_is_confirm_gated() {
        let mut app = authenticated_app();
        app.tui
            .screen_state_mut(Resource::Students)
            .set_rows(one_student());

        // 'd' raises the confirm, no effect yet.
        let effects = update(&mut app, key(KeyCode::Char('d')));
        assert!(effects.is_empty());
        assert!(app.tui.feedback.confirm.is_some());

        // Declining runs nothing.
        let effects = update(&mut app, key(KeyCode::Char('n')));
        assert!(effects.is_empty());
        assert!(app.tui.feedback.confirm.is_none());

        // Accepting produces exactly one delete effect.
        update(&mut app, key(KeyCode::Char('d')));
        let effects = update(&mut app, key(KeyCode::Char('y')));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::DeleteRecord {
                resource: Resource::Students,
                record_id: 7,
                ..
            }]
        ));
    }

    #[test]
    fn test_successful_mutation_reports_and_reloads() {
        let mut app = authenticated_app();
        let id = app.tui.start_task(TaskKind::Mutation);

        let effects = update(
            &mut app,
            UiEvent::MutationFinished {
                id,
                resource: Resource::Students,
                verb: "delete",
                result: Ok(Outcome::classify(200, None)),
            },
        );
        assert!(app.tui.feedback.success.is_some());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadList {
                resource: Resource::Students,
                ..
            }]
        ));
    }

    #[test]
    fn test_rejected_mutation_raises_error_with_code() {
        let mut app = authenticated_app();
        let id = app.tui.start_task(TaskKind::Mutation);

        let effects = update(
            &mut app,
            UiEvent::MutationFinished {
                id,
                resource: Resource::Students,
                verb: "save",
                result: Ok(Outcome::classify(
                    422,
                    Some("phone: invalid format".to_string()),
                )),
            },
        );
        assert!(effects.is_empty());
        let error = app.tui.feedback.error.as_ref().unwrap();
        assert_eq!(error.code, Some(422));
        assert_eq!(error.message, "phone: invalid format");
        assert!(app.tui.feedback.success.is_none());
    }

    #[test]
    fn test_stale_task_result_is_dropped() {
        let mut app = authenticated_app();
        let stale = app.tui.start_task(TaskKind::ListLoad);
        let _current = app.tui.start_task(TaskKind::ListLoad);

        update(
            &mut app,
            UiEvent::ListLoaded {
                id: stale,
                resource: Resource::Students,
                result: Ok(one_student()),
            },
        );
        assert!(app.tui.screen_state(Resource::Students).rows.is_none());
        assert!(app.tui.tasks.list_load.is_running());
    }

    #[test]
    fn test_disconnect_resets_to_login_without_error() {
        let mut app = authenticated_app();
        app.tui
            .screen_state_mut(Resource::Students)
            .set_rows(one_student());

        let effects = update(&mut app, UiEvent::Disconnected);
        assert!(effects.is_empty());
        assert!(!app.tui.authenticated);
        assert!(app.overlay.as_ref().is_some_and(Overlay::is_login));
        // Silent return: no error surface from the dropped session.
        assert!(!app.tui.feedback.any_notice_visible());
        assert!(app.tui.screen_state(Resource::Students).rows.is_none());
    }

    #[test]
    fn test_login_success_closes_overlay_and_loads() {
        let mut app = AppState::new();
        let id = app.tui.start_task(TaskKind::Login);

        let effects = update(
            &mut app,
            UiEvent::LoginFinished {
                id,
                result: Ok(Outcome::classify(200, None)),
            },
        );
        assert!(app.tui.authenticated);
        assert!(app.overlay.is_none());
        assert!(matches!(effects.as_slice(), [UiEffect::LoadList { .. }]));
    }

    #[test]
    fn test_login_failure_surfaces_in_overlay() {
        let mut app = AppState::new();
        let id = app.tui.start_task(TaskKind::Login);

        update(
            &mut app,
            UiEvent::LoginFinished {
                id,
                result: Ok(Outcome::classify(422, Some("bad credentials".to_string()))),
            },
        );
        assert!(!app.tui.authenticated);
        let Some(Overlay::Login(login)) = &app.overlay else {
            panic!("login overlay expected");
        };
        assert_eq!(login.error.as_deref(), Some("bad credentials"));
    }

    #[test]
    fn test_screen_switch_loads_once() {
        let mut app = authenticated_app();

        let effects = update(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.tui.screen, Resource::Teachers);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadList {
                resource: Resource::Teachers,
                ..
            }]
        ));

        // Finish the load, leave, come back: no refetch.
        let UiEffect::LoadList { task, .. } = effects[0] else {
            unreachable!()
        };
        update(
            &mut app,
            UiEvent::ListLoaded {
                id: task,
                resource: Resource::Teachers,
                result: Ok(Rows::Teachers(vec![])),
            },
        );
        update(&mut app, key(KeyCode::Char('1')));
        let effects = update(&mut app, key(KeyCode::Char('2')));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_failed_list_load_shows_error_notice() {
        let mut app = authenticated_app();
        let id = app.tui.start_task(TaskKind::ListLoad);

        update(
            &mut app,
            UiEvent::ListLoaded {
                id,
                resource: Resource::Payments,
                result: Err("connection refused".to_string()),
            },
        );
        let error = app.tui.feedback.error.as_ref().unwrap();
        assert_eq!(error.message, "connection refused");
        assert_eq!(error.code, None);
    }

    #[test]
    fn test_esc_closes_notice_before_anything_else() {
        let mut app = authenticated_app();
        app.tui
            .feedback
            .show_error("Could not load", "boom", None, Instant::now());

        update(&mut app, key(KeyCode::Esc));
        assert!(!app.tui.feedback.any_notice_visible());
    }
}
