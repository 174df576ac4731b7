//! `recordbook` - Client, airline and flight records kept in plain JSON files
//!
//! Each record type lives in its own file holding a JSON array. Stores load
//! the whole file, apply one change, and atomically write it back. Phone
//! numbers, airline names and flight bookings are validated before anything
//! is written.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod airline;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod flight;
pub mod form;
pub mod logging;
pub mod record;
pub mod registry;
pub mod storage;
pub mod validation;

pub use airline::{Airline, AirlineStore, AirlineUpdate};
pub use client::{Client, ClientStore, ClientUpdate};
pub use config::Config;
pub use error::{Error, Result, ValidationReason};
pub use flight::{Flight, FlightStore, FlightUpdate};
pub use logging::init_logging;
pub use record::{Record, RecordType};
pub use registry::{Registry, RegistryStats};
pub use storage::{JsonStore, LoadOutcome, LoadPolicy, UpdateOutcome};
