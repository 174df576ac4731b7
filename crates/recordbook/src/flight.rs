//! Flight bookings.
//!
//! A flight ties a client to an airline at a departure date/time. The client
//! and airline identifiers are plain integers and are not checked against
//! their stores.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{overlay, Record};
use crate::storage::{JsonStore, LoadPolicy};
use crate::validation::{self, FlightKey};

/// A booked flight.
///
/// Reads accept the legacy `Start_City`/`End_City` keys, alone or next to
/// the spaced ones; writes always use the spaced form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredFlight")]
pub struct Flight {
    /// Unique identifier.
    #[serde(rename = "Flight_ID")]
    pub flight_id: u64,

    /// The booked client.
    #[serde(rename = "Client_ID")]
    pub client_id: u64,

    /// The operating airline.
    #[serde(rename = "Airline_ID")]
    pub airline_id: u64,

    /// Departure in `YYYY-MM-DD HH:MM` form.
    #[serde(rename = "Date/Time")]
    pub date_time: String,

    /// Departure city.
    #[serde(rename = "Start City")]
    pub start_city: String,

    /// Arrival city.
    #[serde(rename = "End City")]
    pub end_city: String,
}

/// A flight as found on disk. A record merged by older tools can carry both
/// spellings of a city key; the spaced one is the newer value.
#[derive(Deserialize)]
struct StoredFlight {
    #[serde(rename = "Flight_ID")]
    flight_id: u64,
    #[serde(rename = "Client_ID")]
    client_id: u64,
    #[serde(rename = "Airline_ID")]
    airline_id: u64,
    #[serde(rename = "Date/Time")]
    date_time: String,
    #[serde(rename = "Start City")]
    start_city: Option<String>,
    #[serde(rename = "Start_City")]
    legacy_start_city: Option<String>,
    #[serde(rename = "End City")]
    end_city: Option<String>,
    #[serde(rename = "End_City")]
    legacy_end_city: Option<String>,
}

impl From<StoredFlight> for Flight {
    fn from(stored: StoredFlight) -> Self {
        Self {
            flight_id: stored.flight_id,
            client_id: stored.client_id,
            airline_id: stored.airline_id,
            date_time: stored.date_time,
            start_city: stored
                .start_city
                .or(stored.legacy_start_city)
                .unwrap_or_default(),
            end_city: stored.end_city.or(stored.legacy_end_city).unwrap_or_default(),
        }
    }
}

/// Fields to overlay onto an existing flight. Each mirrors the [`Flight`]
/// field of the same name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightUpdate {
    pub client_id: Option<u64>,
    pub airline_id: Option<u64>,
    pub date_time: Option<String>,
    pub start_city: Option<String>,
    pub end_city: Option<String>,
}

impl FlightUpdate {
    fn touches_key(&self) -> bool {
        self.client_id.is_some() || self.airline_id.is_some() || self.date_time.is_some()
    }
}

impl Record for Flight {
    const KIND: &'static str = "flight";
    type Update = FlightUpdate;

    fn id(&self) -> u64 {
        self.flight_id
    }

    fn set_id(&mut self, id: u64) {
        self.flight_id = id;
    }

    fn apply(&mut self, update: &FlightUpdate) {
        overlay(&mut self.client_id, update.client_id.as_ref());
        overlay(&mut self.airline_id, update.airline_id.as_ref());
        overlay(&mut self.date_time, update.date_time.as_ref());
        overlay(&mut self.start_city, update.start_city.as_ref());
        overlay(&mut self.end_city, update.end_city.as_ref());
    }
}

/// The flight store: date/time format and (client, airline, date/time)
/// uniqueness are enforced here.
#[derive(Debug)]
pub struct FlightStore {
    store: JsonStore<Flight>,
    unique_flight_on_update: bool,
}

impl FlightStore {
    /// Open the flight store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
            unique_flight_on_update: true,
        }
    }

    /// Set how unparsable files are treated.
    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.store = self.store.with_policy(policy);
        self
    }

    /// Whether `update` rejects a change that makes the flight collide with
    /// another one.
    #[must_use]
    pub fn with_unique_flight_on_update(mut self, enabled: bool) -> Self {
        self.unique_flight_on_update = enabled;
        self
    }

    /// The underlying record file.
    #[must_use]
    pub fn store(&self) -> &JsonStore<Flight> {
        &self.store
    }

    /// Get the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Load every flight.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::load_all`].
    pub fn load_all(&self) -> Result<Vec<Flight>> {
        self.store.load_all()
    }

    /// Overwrite the store with `flights`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::save_all`].
    pub fn save_all(&self, flights: &[Flight]) -> Result<()> {
        self.store.save_all(flights)
    }

    /// Next free flight identifier.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::generate_id`].
    pub fn generate_id(&self) -> Result<u64> {
        self.store.generate_id()
    }

    /// Check if a flight with this client, airline and date/time exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn is_duplicate_flight(
        &self,
        client_id: u64,
        airline_id: u64,
        date_time: &str,
    ) -> Result<bool> {
        let key = FlightKey {
            client_id,
            airline_id,
            date_time,
        };
        Ok(validation::flight_in_use(&self.load_all()?, key, None))
    }

    /// Store a flight whose identifier is already set.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for a malformed date/time, a booking
    /// that duplicates another flight, or a duplicate identifier.
    pub fn create(&self, flight: Flight) -> Result<()> {
        validation::check_date_time(&flight.date_time)?;
        let candidate = flight.clone();
        self.store.create_with(flight, |existing| {
            validation::check_flight_unused(existing, FlightKey::of(&candidate), None)
        })
    }

    /// Store a new flight under the next free identifier and return it.
    ///
    /// # Errors
    ///
    /// Same validation as [`FlightStore::create`].
    pub fn add(&self, flight: Flight) -> Result<Flight> {
        validation::check_date_time(&flight.date_time)?;
        let candidate = flight.clone();
        self.store.add_with(flight, |existing| {
            validation::check_flight_unused(existing, FlightKey::of(&candidate), None)
        })
    }

    /// Find a flight by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn search(&self, id: u64) -> Result<Option<Flight>> {
        self.store.search(id)
    }

    /// Overlay `update` onto flight `id`. Returns `false` if there is no
    /// such flight.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if a supplied date/time is malformed,
    /// or (when enabled) the updated flight would duplicate another one.
    pub fn update(&self, id: u64, update: &FlightUpdate) -> Result<bool> {
        if let Some(date_time) = &update.date_time {
            validation::check_date_time(date_time)?;
        }
        let check_unique = self.unique_flight_on_update && update.touches_key();
        let outcome = self.store.update_with(id, update, |existing| {
            if !check_unique {
                return Ok(());
            }
            let Some(current) = existing.iter().find(|f| f.flight_id == id) else {
                return Ok(());
            };
            let mut merged = current.clone();
            merged.apply(update);
            validation::check_flight_unused(existing, FlightKey::of(&merged), Some(id))
        })?;
        Ok(outcome.is_found())
    }

    /// Delete flight `id`. Returns `false` if there is no such flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded or saved.
    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(id)
    }
}
