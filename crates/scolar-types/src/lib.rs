//! Shared domain types for the Scolar console (students, teachers,
//! formations, payments, attendance) plus client-side field validation.

pub mod domain;
pub mod validate;

pub use domain::{
    AttendanceRecord, AttendanceStatus, Formation, Payment, PaymentMethod, Student, Teacher,
};
