//! Create/edit form overlay for the resource screens.
//!
//! One generic form drives all five resources plus the QR check-in entry.
//! Format checks run client-side before submit; the server remains the
//! authority and its rejections come back through the error notice.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use scolar_client::services::attendance::ScanRequest;
use scolar_types::{
    validate, AttendanceRecord, AttendanceStatus, Formation, Payment, PaymentMethod, Student,
    Teacher,
};

use super::render_utils::{InputHint, popup_area, popup_block, render_error_line, render_field_line, render_hints};
use super::OverlayUpdate;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::resources::{RecordDraft, Resource, Rows};
use crate::state::TuiState;

/// What a field holds, for input filtering and pre-submit checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Email,
    Phone,
    Date,
    /// Date that may be left blank.
    OptionalDate,
    /// `YYYY-MM` billing period.
    Period,
    /// Numeric record id.
    Id,
    /// Numeric value that may be left blank.
    OptionalNumber,
    /// Decimal amount, stored as cents.
    Money,
    /// One of a fixed set, cycled with Left/Right.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone)]
struct Field {
    label: &'static str,
    kind: FieldKind,
    value: String,
}

impl Field {
    fn new(label: &'static str, kind: FieldKind) -> Self {
        let value = match kind {
            FieldKind::Choice(options) => options.first().copied().unwrap_or("").to_string(),
            _ => String::new(),
        };
        Self { label, kind, value }
    }

    fn with(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Problem description when the value does not fit the kind.
    fn check(&self) -> Option<String> {
        let value = self.value.trim();
        let problem = match self.kind {
            FieldKind::Text if value.is_empty() => "required",
            FieldKind::Email if !validate::looks_like_email(value) => "invalid format",
            FieldKind::Phone if !validate::looks_like_phone(value) => "invalid format",
            FieldKind::Date if !validate::looks_like_iso_date(value) => "expected YYYY-MM-DD",
            FieldKind::OptionalDate
                if !value.is_empty() && !validate::looks_like_iso_date(value) =>
            {
                "expected YYYY-MM-DD"
            }
            FieldKind::Period if !validate::looks_like_period(value) => "expected YYYY-MM",
            FieldKind::Id if value.parse::<u64>().is_err() => "expected a numeric id",
            FieldKind::OptionalNumber if !value.is_empty() && value.parse::<u64>().is_err() => {
                "expected a number"
            }
            FieldKind::Money if parse_cents(value).is_none() => "expected an amount",
            _ => return None,
        };
        Some(format!("{}: {problem}", self.label.to_lowercase()))
    }

    fn date(&self) -> NaiveDate {
        // Only called after check() passed.
        NaiveDate::parse_from_str(self.value.trim(), "%Y-%m-%d").unwrap_or_default()
    }

    fn id(&self) -> u64 {
        self.value.trim().parse().unwrap_or(0)
    }
}

/// Parses a decimal money amount ("120" or "120.50") into cents.
fn parse_cents(value: &str) -> Option<i64> {
    let value = value.trim();
    let (whole, frac) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };
    // Digits only in the whole part: amounts are never negative.
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) || frac.len() > 2 {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = if frac.is_empty() {
        0
    } else if frac.chars().all(|c| c.is_ascii_digit()) {
        frac.parse::<i64>().ok()? * if frac.len() == 1 { 10 } else { 1 }
    } else {
        return None;
    };
    Some(whole * 100 + frac)
}

/// Formats cents back into the decimal form the field edits.
fn fmt_cents(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("{}", cents / 100)
    } else {
        format!("{}.{:02}", cents / 100, (cents % 100).abs())
    }
}

#[derive(Debug)]
pub struct FormOverlay {
    resource: Resource,
    /// Non-zero when editing an existing record.
    record_id: u64,
    /// True for the QR check-in entry form.
    scan: bool,
    /// Enrollments carried through a student edit unchanged.
    enrolled: Vec<u64>,
    fields: Vec<Field>,
    focus: usize,
    pub error: Option<String>,
}

const METHODS: &[&str] = &["cash", "card", "transfer", "cheque"];
const STATUSES: &[&str] = &["present", "absent", "late", "excused"];

impl FormOverlay {
    /// Opens a blank create form for a resource.
    pub fn create(resource: Resource) -> Self {
        Self {
            resource,
            record_id: 0,
            scan: false,
            enrolled: Vec::new(),
            fields: blank_fields(resource),
            focus: 0,
            error: None,
        }
    }

    /// Opens the QR check-in entry form.
    pub fn check_in() -> Self {
        Self {
            resource: Resource::Attendance,
            record_id: 0,
            scan: true,
            enrolled: Vec::new(),
            fields: vec![
                Field::new("Scan code", FieldKind::Text),
                Field::new("Formation id", FieldKind::Id),
            ],
            focus: 0,
            error: None,
        }
    }

    /// Opens an edit form prefilled from the selected row, when the
    /// resource supports editing.
    pub fn edit(rows: &Rows, index: usize) -> Option<Self> {
        let (record_id, enrolled, fields) = match rows {
            Rows::Students(list) => {
                let s = list.get(index)?;
                (
                    s.id,
                    s.formation_ids.clone(),
                    vec![
                        Field::new("First name", FieldKind::Text).with(&s.first_name),
                        Field::new("Last name", FieldKind::Text).with(&s.last_name),
                        Field::new("Email", FieldKind::Email).with(&s.email),
                        Field::new("Phone", FieldKind::Phone).with(&s.phone),
                        Field::new("Birth date", FieldKind::OptionalDate)
                            .with(s.birth_date.map(|d| d.to_string()).unwrap_or_default()),
                    ],
                )
            }
            Rows::Teachers(list) => {
                let t = list.get(index)?;
                (
                    t.id,
                    Vec::new(),
                    vec![
                        Field::new("First name", FieldKind::Text).with(&t.first_name),
                        Field::new("Last name", FieldKind::Text).with(&t.last_name),
                        Field::new("Email", FieldKind::Email).with(&t.email),
                        Field::new("Phone", FieldKind::Phone).with(&t.phone),
                        Field::new("Speciality", FieldKind::Text).with(&t.speciality),
                    ],
                )
            }
            Rows::Formations(list) => {
                let f = list.get(index)?;
                (
                    f.id,
                    Vec::new(),
                    vec![
                        Field::new("Title", FieldKind::Text).with(&f.title),
                        Field::new("Teacher id", FieldKind::OptionalNumber)
                            .with(f.teacher_id.map(|id| id.to_string()).unwrap_or_default()),
                        Field::new("Start date", FieldKind::Date).with(f.start_date.to_string()),
                        Field::new("End date", FieldKind::Date).with(f.end_date.to_string()),
                        Field::new("Monthly price", FieldKind::Money).with(fmt_cents(f.monthly_price_cents)),
                        Field::new("Capacity", FieldKind::OptionalNumber)
                            .with(f.capacity.map(|c| c.to_string()).unwrap_or_default()),
                    ],
                )
            }
            // Payments and attendance entries are immutable: delete and re-create.
            Rows::Payments(_) | Rows::Attendance(_) => return None,
        };
        Some(Self {
            resource: rows.resource(),
            record_id,
            scan: false,
            enrolled,
            fields,
            focus: 0,
            error: None,
        })
    }

    pub fn title(&self) -> String {
        if self.scan {
            "QR check-in".to_string()
        } else if self.record_id != 0 {
            format!("Edit {}", self.resource.noun())
        } else {
            format!("New {}", self.resource.noun())
        }
    }

    /// Validates every field and assembles the submit payload.
    fn build_draft(&self) -> Result<RecordDraft, String> {
        for field in &self.fields {
            if let Some(problem) = field.check() {
                return Err(problem);
            }
        }
        let f = |i: usize| &self.fields[i];

        let draft = if self.scan {
            RecordDraft::Scan(ScanRequest::new(f(0).value.trim().to_string(), f(1).id()))
        } else {
            match self.resource {
                Resource::Students => RecordDraft::Student(Student {
                    id: self.record_id,
                    first_name: f(0).value.trim().to_string(),
                    last_name: f(1).value.trim().to_string(),
                    email: f(2).value.trim().to_string(),
                    phone: f(3).value.trim().to_string(),
                    birth_date: (!f(4).value.trim().is_empty()).then(|| f(4).date()),
                    formation_ids: self.enrolled.clone(),
                }),
                Resource::Teachers => RecordDraft::Teacher(Teacher {
                    id: self.record_id,
                    first_name: f(0).value.trim().to_string(),
                    last_name: f(1).value.trim().to_string(),
                    email: f(2).value.trim().to_string(),
                    phone: f(3).value.trim().to_string(),
                    speciality: f(4).value.trim().to_string(),
                }),
                Resource::Formations => RecordDraft::Formation(Formation {
                    id: self.record_id,
                    title: f(0).value.trim().to_string(),
                    teacher_id: f(1).value.trim().parse().ok(),
                    start_date: f(2).date(),
                    end_date: f(3).date(),
                    monthly_price_cents: parse_cents(&f(4).value).unwrap_or(0),
                    capacity: f(5).value.trim().parse().ok(),
                }),
                Resource::Payments => RecordDraft::Payment(Payment {
                    id: 0,
                    student_id: f(0).id(),
                    formation_id: f(1).id(),
                    amount_cents: parse_cents(&f(2).value).unwrap_or(0),
                    method: method_from(&f(3).value),
                    paid_on: f(4).date(),
                    period: f(5).value.trim().to_string(),
                }),
                Resource::Attendance => RecordDraft::Attendance(AttendanceRecord {
                    id: 0,
                    student_id: f(0).id(),
                    formation_id: f(1).id(),
                    date: f(2).date(),
                    status: status_from(&f(3).value),
                    via_scan: false,
                }),
            }
        };

        if let RecordDraft::Formation(formation) = &draft {
            if formation.end_date < formation.start_date {
                return Err("end date: must not precede start date".to_string());
            }
        }
        Ok(draft)
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                OverlayUpdate::stay()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                OverlayUpdate::stay()
            }
            KeyCode::Left | KeyCode::Right => {
                let field = &mut self.fields[self.focus];
                if let FieldKind::Choice(options) = field.kind {
                    let current = options.iter().position(|o| *o == field.value).unwrap_or(0);
                    let next = if key.code == KeyCode::Right {
                        (current + 1) % options.len()
                    } else {
                        (current + options.len() - 1) % options.len()
                    };
                    field.value = options[next].to_string();
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                if tui.tasks.mutation.is_running() {
                    self.error = Some("Save in progress...".to_string());
                    return OverlayUpdate::stay();
                }
                match self.build_draft() {
                    Ok(draft) => {
                        let task = tui.start_task(TaskKind::Mutation);
                        OverlayUpdate::close()
                            .with_effects(vec![UiEffect::SubmitRecord { task, draft }])
                    }
                    Err(problem) => {
                        self.error = Some(problem);
                        OverlayUpdate::stay()
                    }
                }
            }
            KeyCode::Backspace => {
                let field = &mut self.fields[self.focus];
                if !matches!(field.kind, FieldKind::Choice(_)) {
                    field.value.pop();
                }
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                let field = &mut self.fields[self.focus];
                if !matches!(field.kind, FieldKind::Choice(_)) {
                    field.value.push(c);
                }
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = self.fields.len() as u16 + 5;
        let popup = popup_area(area, 56, height);
        let inner = popup_block(frame, popup, &self.title(), Color::Yellow);

        for (i, field) in self.fields.iter().enumerate() {
            let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            render_field_line(frame, row, field.label, &field.value, false, i == self.focus);
        }
        let error_row = Rect::new(
            inner.x,
            inner.y + self.fields.len() as u16 + 1,
            inner.width,
            1,
        );
        render_error_line(frame, error_row, self.error.as_deref());

        let hints = [
            InputHint::new("Enter", "save"),
            InputHint::new("Tab", "next field"),
            InputHint::new("←/→", "cycle"),
            InputHint::new("Esc", "cancel"),
        ];
        render_hints(frame, inner, &hints, Color::Yellow);
    }
}

fn blank_fields(resource: Resource) -> Vec<Field> {
    match resource {
        Resource::Students => vec![
            Field::new("First name", FieldKind::Text),
            Field::new("Last name", FieldKind::Text),
            Field::new("Email", FieldKind::Email),
            Field::new("Phone", FieldKind::Phone),
            Field::new("Birth date", FieldKind::OptionalDate),
        ],
        Resource::Teachers => vec![
            Field::new("First name", FieldKind::Text),
            Field::new("Last name", FieldKind::Text),
            Field::new("Email", FieldKind::Email),
            Field::new("Phone", FieldKind::Phone),
            Field::new("Speciality", FieldKind::Text),
        ],
        Resource::Formations => vec![
            Field::new("Title", FieldKind::Text),
            Field::new("Teacher id", FieldKind::OptionalNumber),
            Field::new("Start date", FieldKind::Date),
            Field::new("End date", FieldKind::Date),
            Field::new("Monthly price", FieldKind::Money),
            Field::new("Capacity", FieldKind::OptionalNumber),
        ],
        Resource::Payments => vec![
            Field::new("Student id", FieldKind::Id),
            Field::new("Formation id", FieldKind::Id),
            Field::new("Amount", FieldKind::Money),
            Field::new("Method", FieldKind::Choice(METHODS)),
            Field::new("Paid on", FieldKind::Date),
            Field::new("Period", FieldKind::Period),
        ],
        Resource::Attendance => vec![
            Field::new("Student id", FieldKind::Id),
            Field::new("Formation id", FieldKind::Id),
            Field::new("Date", FieldKind::Date),
            Field::new("Status", FieldKind::Choice(STATUSES)),
        ],
    }
}

fn method_from(value: &str) -> PaymentMethod {
    match value {
        "card" => PaymentMethod::Card,
        "transfer" => PaymentMethod::Transfer,
        "cheque" => PaymentMethod::Cheque,
        _ => PaymentMethod::Cash,
    }
}

fn status_from(value: &str) -> AttendanceStatus {
    match value {
        "absent" => AttendanceStatus::Absent,
        "late" => AttendanceStatus::Late,
        "excused" => AttendanceStatus::Excused,
        _ => AttendanceStatus::Present,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(form: &mut FormOverlay, label: &str, value: &str) {
        let field = form
            .fields
            .iter_mut()
            .find(|f| f.label == label)
            .unwrap_or_else(|| panic!("no field {label}"));
        field.value = value.to_string();
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("120"), Some(12000));
        assert_eq!(parse_cents("120.50"), Some(12050));
        assert_eq!(parse_cents("0.5"), Some(50));
        assert_eq!(parse_cents(""), None);
        assert_eq!(parse_cents("12.345"), None);
        assert_eq!(parse_cents("abc"), None);
    }

    #[test]
    fn test_parse_cents_rejects_negative_amounts() {
        assert_eq!(parse_cents("-5.50"), None);
        assert_eq!(parse_cents("-0.50"), None);
        assert_eq!(parse_cents("-120"), None);
        assert_eq!(parse_cents("+5"), None);
    }

    #[test]
    fn test_fmt_cents_roundtrip() {
        assert_eq!(fmt_cents(12000), "120");
        assert_eq!(fmt_cents(12050), "120.50");
        assert_eq!(parse_cents(&fmt_cents(9905)), Some(9905));
    }

    #[test]
    fn test_invalid_email_blocks_submit() {
        let mut form = FormOverlay::create(Resource::Students);
        set(&mut form, "First name", "Amina");
        set(&mut form, "Last name", "Haddad");
        set(&mut form, "Email", "not-an-email");
        set(&mut form, "Phone", "+33612345678");

        let err = form.build_draft().unwrap_err();
        assert_eq!(err, "email: invalid format");
    }

    #[test]
    fn test_valid_student_builds_create_draft() {
        let mut form = FormOverlay::create(Resource::Students);
        set(&mut form, "First name", "Amina");
        set(&mut form, "Last name", "Haddad");
        set(&mut form, "Email", "amina@example.org");
        set(&mut form, "Phone", "0612345678");
        set(&mut form, "Birth date", "2004-09-17");

        let draft = form.build_draft().unwrap();
        assert!(!draft.is_update());
        let RecordDraft::Student(student) = draft else {
            panic!("expected a student draft");
        };
        assert_eq!(student.id, 0);
    }

    #[test]
    fn test_edit_prefills_and_preserves_enrollments() {
        let rows = Rows::Students(vec![Student {
            id: 7,
            first_name: "Amina".to_string(),
            last_name: "Haddad".to_string(),
            email: "amina@example.org".to_string(),
            phone: "0612345678".to_string(),
            birth_date: None,
            formation_ids: vec![1, 3],
        }]);
        let form = FormOverlay::edit(&rows, 0).unwrap();
        assert_eq!(form.title(), "Edit student");

        let draft = form.build_draft().unwrap();
        let RecordDraft::Student(student) = draft else {
            panic!("expected a student draft");
        };
        assert_eq!(student.id, 7);
        assert_eq!(student.formation_ids, vec![1, 3]);
    }

    #[test]
    fn test_payments_are_not_editable() {
        let rows = Rows::Payments(vec![]);
        assert!(FormOverlay::edit(&rows, 0).is_none());
    }

    #[test]
    fn test_formation_date_order_checked() {
        let mut form = FormOverlay::create(Resource::Formations);
        set(&mut form, "Title", "Algebra");
        set(&mut form, "Start date", "2026-09-01");
        set(&mut form, "End date", "2026-08-01");
        set(&mut form, "Monthly price", "120");

        let err = form.build_draft().unwrap_err();
        assert_eq!(err, "end date: must not precede start date");
    }

    #[test]
    fn test_check_in_builds_scan_draft() {
        let mut form = FormOverlay::check_in();
        set(&mut form, "Scan code", "STU-7-TOKEN");
        set(&mut form, "Formation id", "3");

        let draft = form.build_draft().unwrap();
        let RecordDraft::Scan(scan) = draft else {
            panic!("expected a scan draft");
        };
        assert_eq!(scan.code, "STU-7-TOKEN");
        assert_eq!(scan.formation_id, 3);
    }

    #[test]
    fn test_payment_method_choice_maps_to_enum() {
        let mut form = FormOverlay::create(Resource::Payments);
        set(&mut form, "Student id", "7");
        set(&mut form, "Formation id", "3");
        set(&mut form, "Amount", "120.50");
        set(&mut form, "Method", "transfer");
        set(&mut form, "Paid on", "2026-09-05");
        set(&mut form, "Period", "2026-09");

        let draft = form.build_draft().unwrap();
        let RecordDraft::Payment(payment) = draft else {
            panic!("expected a payment draft");
        };
        assert_eq!(payment.method, PaymentMethod::Transfer);
        assert_eq!(payment.amount_cents, 12050);
    }
}
