//! The three record stores opened together from configuration.

use std::path::PathBuf;

use serde::Serialize;

use crate::airline::AirlineStore;
use crate::client::ClientStore;
use crate::config::Config;
use crate::error::Result;
use crate::flight::FlightStore;
use crate::record::Record;
use crate::storage::{JsonStore, LoadOutcome};

/// Client, airline and flight stores sharing one configuration.
#[derive(Debug)]
pub struct Registry {
    /// Client records.
    pub clients: ClientStore,
    /// Airline records.
    pub airlines: AirlineStore,
    /// Flight records.
    pub flights: FlightStore,
}

/// What a store file looked like when inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    /// No file yet.
    Missing,
    /// The file parsed.
    Ok,
    /// The file exists but does not parse.
    Corrupt,
}

/// Statistics for one store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Path to the store file.
    pub path: PathBuf,
    /// Parse state of the file.
    pub state: StoreState,
    /// Number of records; 0 unless the file parsed.
    pub records: usize,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Statistics for every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// The client store.
    pub clients: StoreStats,
    /// The airline store.
    pub airlines: StoreStats,
    /// The flight store.
    pub flights: StoreStats,
}

impl RegistryStats {
    /// Total records across all stores.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.clients.records + self.airlines.records + self.flights.records
    }
}

impl Registry {
    /// Open the stores at the paths and with the policies in `config`.
    ///
    /// No file is touched until a store is used.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        let policy = config.storage.load_policy;
        Self {
            clients: ClientStore::new(config.clients_path())
                .with_policy(policy)
                .with_unique_phone_on_update(config.validation.unique_phone_on_update),
            airlines: AirlineStore::new(config.airlines_path()).with_policy(policy),
            flights: FlightStore::new(config.flights_path())
                .with_policy(policy)
                .with_unique_flight_on_update(config.validation.unique_flight_on_update),
        }
    }

    /// Inspect every store file.
    ///
    /// A corrupt file is reported in [`StoreStats::state`] rather than as an
    /// error, whatever the load policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read.
    pub fn stats(&self) -> Result<RegistryStats> {
        Ok(RegistryStats {
            clients: store_stats(self.clients.store())?,
            airlines: store_stats(self.airlines.store())?,
            flights: store_stats(self.flights.store())?,
        })
    }
}

fn store_stats<R: Record>(store: &JsonStore<R>) -> Result<StoreStats> {
    let (state, records) = match store.load()? {
        LoadOutcome::Missing => (StoreState::Missing, 0),
        LoadOutcome::Loaded(records) => (StoreState::Ok, records.len()),
        LoadOutcome::Corrupt(_) => (StoreState::Corrupt, 0),
    };
    Ok(StoreStats {
        path: store.path().to_path_buf(),
        state,
        records,
        size_bytes: store.file_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airline::Airline;
    use crate::client::Client;
    use crate::error::ValidationReason;
    use crate::flight::{Flight, FlightUpdate};
    use crate::storage::LoadPolicy;
    use tempfile::TempDir;

    fn create_test_registry(dir: &TempDir) -> Registry {
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        Registry::open(&config)
    }

    #[test]
    fn test_open_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);

        assert_eq!(registry.clients.path(), dir.path().join("clients.json"));
        assert_eq!(registry.airlines.path(), dir.path().join("airlines.json"));
        assert_eq!(registry.flights.path(), dir.path().join("flights.json"));
        assert!(!registry.clients.path().exists());
    }

    #[test]
    fn test_open_applies_policy_and_validation() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.storage.load_policy = LoadPolicy::Strict;
        config.validation.unique_flight_on_update = false;
        let registry = Registry::open(&config);

        assert_eq!(registry.airlines.store().policy(), LoadPolicy::Strict);

        let flight = |client_id| Flight {
            client_id,
            airline_id: 1,
            date_time: "2024-03-01 07:15".to_string(),
            ..Flight::default()
        };
        registry.flights.add(flight(1)).unwrap();
        registry.flights.add(flight(2)).unwrap();

        let update = FlightUpdate {
            client_id: Some(1),
            ..FlightUpdate::default()
        };
        assert!(registry.flights.update(2, &update).unwrap());
    }

    #[test]
    fn test_stats_empty() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);

        let stats = registry.stats().unwrap();
        assert_eq!(stats.clients.state, StoreState::Missing);
        assert_eq!(stats.total_records(), 0);
        assert_eq!(stats.flights.size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);

        registry
            .clients
            .add(Client {
                name: "John Doe".to_string(),
                phone: "1-773-5435432".to_string(),
                ..Client::default()
            })
            .unwrap();
        registry.airlines.add(Airline::new(0, "Delta")).unwrap();
        registry.airlines.add(Airline::new(0, "KLM")).unwrap();

        let stats = registry.stats().unwrap();
        assert_eq!(stats.clients.records, 1);
        assert_eq!(stats.airlines.records, 2);
        assert_eq!(stats.airlines.state, StoreState::Ok);
        assert!(stats.airlines.size_bytes > 0);
        assert_eq!(stats.total_records(), 3);
    }

    #[test]
    fn test_stats_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);
        std::fs::write(registry.flights.path(), "[{").unwrap();

        let stats = registry.stats().unwrap();
        assert_eq!(stats.flights.state, StoreState::Corrupt);
        assert_eq!(stats.flights.records, 0);
        assert!(stats.flights.size_bytes > 0);
    }

    #[test]
    fn test_stores_are_independent() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);

        let flight = Flight {
            client_id: 404,
            airline_id: 405,
            date_time: "2023-12-20 10:00".to_string(),
            ..Flight::default()
        };
        registry.flights.add(flight).unwrap();
        assert!(registry.clients.search(404).unwrap().is_none());

        let err = registry
            .airlines
            .create(Airline::new(1, "Delta"))
            .and_then(|()| registry.airlines.create(Airline::new(2, "delta")))
            .unwrap_err();
        assert_eq!(
            err.validation_reason(),
            Some(ValidationReason::DuplicateAirlineName)
        );
    }

    #[test]
    fn test_stats_serialize() {
        let dir = TempDir::new().unwrap();
        let registry = create_test_registry(&dir);

        let json = serde_json::to_value(registry.stats().unwrap()).unwrap();
        assert_eq!(json["clients"]["state"], "missing");
        assert_eq!(json["airlines"]["records"], 0);
    }
}
