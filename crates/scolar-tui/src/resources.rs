//! The resources the console manages, and the payloads that move between
//! the reducer and the runtime for them.

use scolar_types::{AttendanceRecord, Formation, Payment, Student, Teacher};

use scolar_client::services::attendance::ScanRequest;

/// One manageable resource / screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Students,
    Teachers,
    Formations,
    Payments,
    Attendance,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Students,
        Resource::Teachers,
        Resource::Formations,
        Resource::Payments,
        Resource::Attendance,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Resource::Students => "Students",
            Resource::Teachers => "Teachers",
            Resource::Formations => "Formations",
            Resource::Payments => "Payments",
            Resource::Attendance => "Attendance",
        }
    }

    /// Singular noun for feedback messages ("Delete student?").
    pub fn noun(self) -> &'static str {
        match self {
            Resource::Students => "student",
            Resource::Teachers => "teacher",
            Resource::Formations => "formation",
            Resource::Payments => "payment",
            Resource::Attendance => "attendance record",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Resource::Students => 0,
            Resource::Teachers => 1,
            Resource::Formations => 2,
            Resource::Payments => 3,
            Resource::Attendance => 4,
        }
    }
}

/// Loaded rows for one resource, as returned by a list call.
#[derive(Debug, Clone)]
pub enum Rows {
    Students(Vec<Student>),
    Teachers(Vec<Teacher>),
    Formations(Vec<Formation>),
    Payments(Vec<Payment>),
    Attendance(Vec<AttendanceRecord>),
}

impl Rows {
    pub fn resource(&self) -> Resource {
        match self {
            Rows::Students(_) => Resource::Students,
            Rows::Teachers(_) => Resource::Teachers,
            Rows::Formations(_) => Resource::Formations,
            Rows::Payments(_) => Resource::Payments,
            Rows::Attendance(_) => Resource::Attendance,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Rows::Students(rows) => rows.len(),
            Rows::Teachers(rows) => rows.len(),
            Rows::Formations(rows) => rows.len(),
            Rows::Payments(rows) => rows.len(),
            Rows::Attendance(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record id of the row at `index`.
    pub fn id_at(&self, index: usize) -> Option<u64> {
        match self {
            Rows::Students(rows) => rows.get(index).map(|r| r.id),
            Rows::Teachers(rows) => rows.get(index).map(|r| r.id),
            Rows::Formations(rows) => rows.get(index).map(|r| r.id),
            Rows::Payments(rows) => rows.get(index).map(|r| r.id),
            Rows::Attendance(rows) => rows.get(index).map(|r| r.id),
        }
    }

    /// Short human label for the row at `index`, used in confirm prompts.
    pub fn label_at(&self, index: usize) -> Option<String> {
        match self {
            Rows::Students(rows) => rows.get(index).map(Student::display_name),
            Rows::Teachers(rows) => rows.get(index).map(Teacher::display_name),
            Rows::Formations(rows) => rows.get(index).map(|r| r.title.clone()),
            Rows::Payments(rows) => rows
                .get(index)
                .map(|r| format!("payment #{} ({})", r.id, r.period)),
            Rows::Attendance(rows) => rows
                .get(index)
                .map(|r| format!("entry #{} ({})", r.id, r.date)),
        }
    }
}

/// A record to submit, built by the form overlay.
#[derive(Debug, Clone)]
pub enum RecordDraft {
    Student(Student),
    Teacher(Teacher),
    Formation(Formation),
    Payment(Payment),
    Attendance(AttendanceRecord),
    Scan(ScanRequest),
}

impl RecordDraft {
    pub fn resource(&self) -> Resource {
        match self {
            RecordDraft::Student(_) => Resource::Students,
            RecordDraft::Teacher(_) => Resource::Teachers,
            RecordDraft::Formation(_) => Resource::Formations,
            RecordDraft::Payment(_) => Resource::Payments,
            RecordDraft::Attendance(_) | RecordDraft::Scan(_) => Resource::Attendance,
        }
    }

    /// True when this draft updates an existing record (PUT, not POST).
    pub fn is_update(&self) -> bool {
        match self {
            RecordDraft::Student(s) => s.id != 0,
            RecordDraft::Teacher(t) => t.id != 0,
            RecordDraft::Formation(f) => f.id != 0,
            RecordDraft::Payment(_) | RecordDraft::Attendance(_) | RecordDraft::Scan(_) => false,
        }
    }
}
