//! Client-side field-format checks.
//!
//! These are a UX nicety only: they catch obvious typos before a round
//! trip. The server re-validates everything and stays authoritative.

/// Returns true when the value looks like an email address.
///
/// Deliberately loose: one `@`, non-empty local part, a dot in the domain.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.') && !domain.contains('@') && !value.contains(char::is_whitespace)
}

/// Returns true when the value looks like a phone number.
///
/// Accepts an optional leading `+`, then 8-15 digits with spaces, dots or
/// dashes as separators.
pub fn looks_like_phone(value: &str) -> bool {
    let value = value.trim();
    let rest = value.strip_prefix('+').unwrap_or(value);
    if rest.is_empty() {
        return false;
    }
    let digits = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect::<String>();
    (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Returns true when the value is an ISO `YYYY-MM-DD` date.
pub fn looks_like_iso_date(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok()
}

/// Returns true when the value is a `YYYY-MM` billing period.
pub fn looks_like_period(value: &str) -> bool {
    let value = value.trim();
    let Some((year, month)) = value.split_once('-') else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 {
        return false;
    }
    let year_ok = year.chars().all(|c| c.is_ascii_digit());
    let month_ok = month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m));
    year_ok && month_ok
}
