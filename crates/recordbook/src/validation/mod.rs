//! Field validation for records.
//!
//! Two kinds of checks guard every write:
//!
//! - **Format checks**: client phone numbers must look like `1-773-5435432`
//!   and flight date/times like `2023-12-20 10:00`.
//! - **Uniqueness checks**: client phones, airline company names (ignoring
//!   case) and flight (client, airline, date/time) triples must not repeat.
//!
//! Every failure is an [`Error::Validation`](crate::Error::Validation)
//! carrying a [`ValidationReason`](crate::ValidationReason).
//!
//! # Example
//!
//! ```
//! use recordbook::validation::{is_valid_date_time, is_valid_phone};
//!
//! assert!(is_valid_phone("1-773-5435432"));
//! assert!(!is_valid_phone("17735435432"));
//! assert!(is_valid_date_time("2023-12-20 10:00"));
//! assert!(!is_valid_date_time("2023-12-20"));
//! ```

mod format;
mod uniqueness;

pub use format::{
    check_date_time, check_phone, date_time_format, is_valid_date_time, is_valid_phone,
    parse_date_time, phone_format, FieldFormat, DATE_TIME_FORMAT,
};
pub use uniqueness::{
    airline_name_in_use, check_airline_name_unused, check_flight_unused, check_phone_unused,
    flight_in_use, normalize_airline_name, phone_in_use, FlightKey,
};
