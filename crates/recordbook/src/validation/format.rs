//! Field format checks.
//!
//! Phone numbers and flight date/times are checked against fixed patterns
//! before a record is written.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{Error, Result, ValidationReason};

/// `strftime` layout of a flight's `Date/Time` field.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const PHONE_PATTERN: &str = r"^[0-9]{1,3}-[0-9]{1,3}-[0-9]{4,10}$";

// chrono alone accepts unpadded months and wider years, so the shape is
// pinned down first.
const DATE_TIME_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}$";

/// A named, compiled field format.
#[derive(Debug)]
pub struct FieldFormat {
    /// Name of the format for identification.
    pub name: &'static str,

    /// Example of a conforming value, shown to users.
    pub example: &'static str,

    regex: Regex,
}

impl FieldFormat {
    /// Create a new field format.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(name: &'static str, example: &'static str, pattern: &str) -> Self {
        Self {
            name,
            example,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check if the whole value conforms to this format.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// The client phone number format (`1-773-5435432`).
pub fn phone_format() -> &'static FieldFormat {
    static FORMAT: OnceLock<FieldFormat> = OnceLock::new();
    FORMAT.get_or_init(|| FieldFormat::new("phone", "1-773-5435432", PHONE_PATTERN))
}

/// The flight date/time shape (`2023-12-20 10:00`).
pub fn date_time_format() -> &'static FieldFormat {
    static FORMAT: OnceLock<FieldFormat> = OnceLock::new();
    FORMAT.get_or_init(|| FieldFormat::new("date/time", "2023-12-20 10:00", DATE_TIME_PATTERN))
}

/// Check a phone number against the client phone format.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    phone_format().matches(phone)
}

/// Check that a date/time has the `YYYY-MM-DD HH:MM` shape and names a
/// real calendar minute.
#[must_use]
pub fn is_valid_date_time(value: &str) -> bool {
    date_time_format().matches(value)
        && NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).is_ok()
}

/// Parse a flight date/time, failing with [`ValidationReason::InvalidDateTime`].
///
/// # Errors
///
/// Returns a validation error if the value is not a valid `YYYY-MM-DD HH:MM`.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime> {
    if !date_time_format().matches(value) {
        return Err(invalid_date_time());
    }
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| invalid_date_time())
}

/// Require a valid phone number.
///
/// # Errors
///
/// Returns [`ValidationReason::InvalidPhoneFormat`] if the format does not match.
pub fn check_phone(phone: &str) -> Result<()> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(Error::validation(
            ValidationReason::InvalidPhoneFormat,
            format!(
                "Invalid phone number format. Expected e.g. {}.",
                phone_format().example
            ),
        ))
    }
}

/// Require a valid flight date/time.
///
/// # Errors
///
/// Returns [`ValidationReason::InvalidDateTime`] if the value is malformed.
pub fn check_date_time(value: &str) -> Result<()> {
    parse_date_time(value).map(|_| ())
}

fn invalid_date_time() -> Error {
    Error::validation(
        ValidationReason::InvalidDateTime,
        "Invalid date/time format. Use YYYY-MM-DD HH:MM.",
    )
}
