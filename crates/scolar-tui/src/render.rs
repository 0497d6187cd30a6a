//! Frame rendering.
//!
//! Draws the tab header, the active resource table, the footer hints, and
//! the feedback surfaces. Notices record the rect they were drawn into so
//! the reducer can hit-test pointer moves against them.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::common::truncate_with_ellipsis;
use crate::feedback::{ConfirmState, NoticeKind, NoticeState};
use crate::resources::{Resource, Rows};
use crate::state::AppState;

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.area();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_tabs(frame, header, app.tui.screen);
    render_table(frame, body, app);
    render_footer(frame, footer, app);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area);
    }

    // Feedback renders above overlays: a forced disconnect must not hide
    // a visible notice, and the confirm outranks everything.
    if let Some(notice) = &app.tui.feedback.success {
        render_notice(frame, area, notice, 0);
    }
    if let Some(notice) = &app.tui.feedback.error {
        render_notice(frame, area, notice, 1);
    }
    if let Some(confirm) = &app.tui.feedback.confirm {
        render_confirm(frame, area, confirm);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Resource) {
    let titles = Resource::ALL
        .iter()
        .enumerate()
        .map(|(i, r)| format!(" {} {} ", i + 1, r.title()));
    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &AppState) {
    let text = if app.overlay.is_some() {
        String::new()
    } else if app.tui.tasks.is_any_running() {
        "working...".to_string()
    } else {
        let mut hints = vec![
            "j/k move", "n new", "e edit", "d delete", "r reload", "Tab screen",
        ];
        if app.tui.screen == Resource::Attendance {
            hints.insert(4, "c check-in");
        }
        hints.push("s sign out");
        hints.push("q quit");
        hints.join("  ")
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}

fn render_table(frame: &mut Frame, area: Rect, app: &AppState) {
    let screen = app.tui.current();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.tui.screen.title()));

    let Some(rows) = &screen.rows else {
        let hint = if app.tui.authenticated {
            "loading..."
        } else {
            ""
        };
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    if rows.is_empty() {
        frame.render_widget(Paragraph::new("no records").block(block), area);
        return;
    }

    let (header, widths, body) = table_contents(rows, area.width);
    let header = Row::new(header.iter().map(|h| Cell::from(*h)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = body.into_iter().enumerate().map(|(i, cells)| {
        let row = Row::new(cells.into_iter().map(Cell::from));
        if i == screen.selected {
            row.style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            row
        }
    });

    let table = Table::new(body, widths).header(header).block(block);
    frame.render_widget(table, area);
}

type TableContents = (Vec<&'static str>, Vec<Constraint>, Vec<Vec<String>>);

fn table_contents(rows: &Rows, width: u16) -> TableContents {
    let text_width = (width as usize).saturating_sub(4) / 4;
    let cut = |s: &str| truncate_with_ellipsis(s, text_width);
    match rows {
        Rows::Students(list) => (
            vec!["ID", "Name", "Email", "Phone", "Born"],
            vec![
                Constraint::Length(6),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Length(16),
                Constraint::Length(10),
            ],
            list.iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        cut(&s.display_name()),
                        cut(&s.email),
                        s.phone.clone(),
                        s.birth_date.map(|d| d.to_string()).unwrap_or_default(),
                    ]
                })
                .collect(),
        ),
        Rows::Teachers(list) => (
            vec!["ID", "Name", "Email", "Phone", "Speciality"],
            vec![
                Constraint::Length(6),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Length(16),
                Constraint::Fill(1),
            ],
            list.iter()
                .map(|t| {
                    vec![
                        t.id.to_string(),
                        cut(&t.display_name()),
                        cut(&t.email),
                        t.phone.clone(),
                        cut(&t.speciality),
                    ]
                })
                .collect(),
        ),
        Rows::Formations(list) => (
            vec!["ID", "Title", "Teacher", "Start", "End", "Monthly", "Cap"],
            vec![
                Constraint::Length(6),
                Constraint::Fill(2),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(5),
            ],
            list.iter()
                .map(|f| {
                    vec![
                        f.id.to_string(),
                        cut(&f.title),
                        f.teacher_id.map(|id| id.to_string()).unwrap_or_default(),
                        f.start_date.to_string(),
                        f.end_date.to_string(),
                        money(f.monthly_price_cents),
                        f.capacity.map(|c| c.to_string()).unwrap_or_default(),
                    ]
                })
                .collect(),
        ),
        Rows::Payments(list) => (
            vec!["ID", "Student", "Formation", "Amount", "Method", "Paid", "Period"],
            vec![
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
            list.iter()
                .map(|p| {
                    vec![
                        p.id.to_string(),
                        p.student_id.to_string(),
                        p.formation_id.to_string(),
                        money(p.amount_cents),
                        format!("{:?}", p.method).to_lowercase(),
                        p.paid_on.to_string(),
                        p.period.clone(),
                    ]
                })
                .collect(),
        ),
        Rows::Attendance(list) => (
            vec!["ID", "Student", "Formation", "Date", "Status", "Via"],
            vec![
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(6),
            ],
            list.iter()
                .map(|a| {
                    vec![
                        a.id.to_string(),
                        a.student_id.to_string(),
                        a.formation_id.to_string(),
                        a.date.to_string(),
                        a.status.label().to_string(),
                        if a.via_scan { "scan" } else { "manual" }.to_string(),
                    ]
                })
                .collect(),
        ),
    }
}

fn money(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Bottom-right notice card. `slot` stacks multiple notices upward.
fn render_notice(frame: &mut Frame, area: Rect, notice: &NoticeState, slot: u16) {
    let width = 44.min(area.width.saturating_sub(2));
    let height = 4;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub((height + 1) * (slot + 1) + 1));
    let card = Rect::new(x, y, width, height);
    notice.area.set(card);

    let color = match notice.kind {
        NoticeKind::Error => Color::Red,
        NoticeKind::Success => Color::Green,
    };
    let title = match notice.code {
        Some(code) => format!(" {} ({code}) ", notice.title),
        None => format!(" {} ", notice.title),
    };

    frame.render_widget(Clear, card);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let message = truncate_with_ellipsis(&notice.message, (inner.width as usize) * 2);
    frame.render_widget(
        Paragraph::new(message).wrap(ratatui::widgets::Wrap { trim: true }),
        inner,
    );
}

fn render_confirm(frame: &mut Frame, area: Rect, confirm: &ConfirmState) {
    use crate::overlays::render_utils::{popup_area, popup_block, render_hints, InputHint};

    let popup = popup_area(area, 50, 6);
    let inner = popup_block(frame, popup, &confirm.title, Color::Red);

    let body = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(confirm.message.as_str())
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true }),
        body,
    );

    let hints = [InputHint::new("y", "confirm"), InputHint::new("n", "cancel")];
    render_hints(frame, inner, &hints, Color::Red);
}
