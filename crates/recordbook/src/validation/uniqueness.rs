//! Uniqueness checks across the records of one store.
//!
//! Each predicate takes the current records and an optional identifier to
//! skip, so an update does not collide with the record being updated.

use crate::airline::Airline;
use crate::client::Client;
use crate::error::{Error, Result, ValidationReason};
use crate::flight::Flight;

/// The fields that identify a flight booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlightKey<'a> {
    /// Booked client.
    pub client_id: u64,
    /// Operating airline.
    pub airline_id: u64,
    /// Departure, `YYYY-MM-DD HH:MM`.
    pub date_time: &'a str,
}

impl<'a> FlightKey<'a> {
    /// The key of an existing flight.
    #[must_use]
    pub fn of(flight: &'a Flight) -> Self {
        Self {
            client_id: flight.client_id,
            airline_id: flight.airline_id,
            date_time: &flight.date_time,
        }
    }
}

/// Check if a client other than `except` has exactly this phone number.
#[must_use]
pub fn phone_in_use(clients: &[Client], phone: &str, except: Option<u64>) -> bool {
    clients
        .iter()
        .filter(|c| Some(c.id) != except)
        .any(|c| c.phone == phone)
}

/// Company name as compared for uniqueness: trimmed and lowercased.
#[must_use]
pub fn normalize_airline_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check if an airline other than `except` has this company name,
/// ignoring case and surrounding whitespace.
#[must_use]
pub fn airline_name_in_use(airlines: &[Airline], name: &str, except: Option<u64>) -> bool {
    let wanted = normalize_airline_name(name);
    airlines
        .iter()
        .filter(|a| Some(a.id) != except)
        .any(|a| normalize_airline_name(&a.company_name) == wanted)
}

/// Check if a flight other than `except` has the same client, airline and
/// date/time.
#[must_use]
pub fn flight_in_use(flights: &[Flight], key: FlightKey<'_>, except: Option<u64>) -> bool {
    flights
        .iter()
        .filter(|f| Some(f.flight_id) != except)
        .any(|f| FlightKey::of(f) == key)
}

/// Require that no other client uses `phone`.
///
/// # Errors
///
/// Returns [`ValidationReason::DuplicatePhone`] on a collision.
pub fn check_phone_unused(clients: &[Client], phone: &str, except: Option<u64>) -> Result<()> {
    if phone_in_use(clients, phone, except) {
        return Err(Error::validation(
            ValidationReason::DuplicatePhone,
            "Duplicate phone number detected.",
        ));
    }
    Ok(())
}

/// Require that no other airline uses `name`.
///
/// # Errors
///
/// Returns [`ValidationReason::DuplicateAirlineName`] on a collision.
pub fn check_airline_name_unused(
    airlines: &[Airline],
    name: &str,
    except: Option<u64>,
) -> Result<()> {
    if airline_name_in_use(airlines, name, except) {
        return Err(Error::validation(
            ValidationReason::DuplicateAirlineName,
            "Duplicate airline name detected.",
        ));
    }
    Ok(())
}

/// Require that no other flight has the same key.
///
/// # Errors
///
/// Returns [`ValidationReason::DuplicateFlight`] on a collision.
pub fn check_flight_unused(flights: &[Flight], key: FlightKey<'_>, except: Option<u64>) -> Result<()> {
    if flight_in_use(flights, key, except) {
        return Err(Error::validation(
            ValidationReason::DuplicateFlight,
            "Duplicate flight record detected.",
        ));
    }
    Ok(())
}
