//! Airline records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::record::{overlay, Record, RecordType};
use crate::storage::{JsonStore, LoadPolicy, UpdateOutcome};
use crate::validation::{self, normalize_airline_name};

/// An airline company. Company names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Unique identifier.
    #[serde(rename = "ID")]
    pub id: u64,

    /// Record tag, always [`RecordType::Airline`].
    #[serde(rename = "Type", default = "RecordType::airline")]
    pub record_type: RecordType,

    /// Company name.
    #[serde(rename = "Company Name")]
    pub company_name: String,
}

impl Airline {
    /// Create an airline record.
    pub fn new(id: u64, company_name: impl Into<String>) -> Self {
        Self {
            id,
            record_type: RecordType::Airline,
            company_name: company_name.into(),
        }
    }
}

/// Fields to overlay onto an existing airline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirlineUpdate {
    /// New company name.
    pub company_name: Option<String>,
}

impl Record for Airline {
    const KIND: &'static str = "airline";
    type Update = AirlineUpdate;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    /// A new name equal to the current one ignoring case and surrounding
    /// whitespace leaves the record as it is.
    fn apply(&mut self, update: &AirlineUpdate) {
        let renamed = update.company_name.as_ref().filter(|name| {
            normalize_airline_name(name) != normalize_airline_name(&self.company_name)
        });
        overlay(&mut self.company_name, renamed);
    }
}

/// The airline store: company names are kept unique here.
#[derive(Debug)]
pub struct AirlineStore {
    store: JsonStore<Airline>,
}

impl AirlineStore {
    /// Open the airline store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    /// Set how unparsable files are treated.
    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.store = self.store.with_policy(policy);
        self
    }

    /// The underlying record file.
    #[must_use]
    pub fn store(&self) -> &JsonStore<Airline> {
        &self.store
    }

    /// Get the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Load every airline.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::load_all`].
    pub fn load_all(&self) -> Result<Vec<Airline>> {
        self.store.load_all()
    }

    /// Overwrite the store with `airlines`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::save_all`].
    pub fn save_all(&self, airlines: &[Airline]) -> Result<()> {
        self.store.save_all(airlines)
    }

    /// Next free airline identifier.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::generate_id`].
    pub fn generate_id(&self) -> Result<u64> {
        self.store.generate_id()
    }

    /// Check if any airline already uses `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn is_duplicate_name(&self, name: &str) -> Result<bool> {
        Ok(validation::airline_name_in_use(&self.load_all()?, name, None))
    }

    /// Store an airline whose identifier is already set.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if the name is taken or the identifier
    /// is already used.
    pub fn create(&self, airline: Airline) -> Result<()> {
        let name = airline.company_name.clone();
        self.store.create_with(airline, |existing| {
            validation::check_airline_name_unused(existing, &name, None)
        })
    }

    /// Store a new airline under the next free identifier and return it.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if the name is taken.
    pub fn add(&self, airline: Airline) -> Result<Airline> {
        let name = airline.company_name.clone();
        self.store.add_with(airline, |existing| {
            validation::check_airline_name_unused(existing, &name, None)
        })
    }

    /// Find an airline by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn search(&self, id: u64) -> Result<Option<Airline>> {
        self.store.search(id)
    }

    /// Find the first airline whose name matches `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn search_by_name(&self, name: &str) -> Result<Option<Airline>> {
        let wanted = normalize_airline_name(name);
        Ok(self
            .load_all()?
            .into_iter()
            .find(|a| normalize_airline_name(&a.company_name) == wanted))
    }

    /// Rename airline `id`.
    ///
    /// Reports [`UpdateOutcome::Unchanged`] without writing when the new name
    /// equals the current one ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if another airline has the name. This
    /// is checked before the identifier is looked up.
    pub fn update(&self, id: u64, update: &AirlineUpdate) -> Result<UpdateOutcome> {
        self.store.update_with(id, update, |existing| match &update.company_name {
            Some(name) => validation::check_airline_name_unused(existing, name, Some(id)),
            None => Ok(()),
        })
    }

    /// Delete airline `id`. Returns `false` if there is no such airline.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded or saved.
    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;
    use tempfile::TempDir;

    fn create_test_store(dir: &TempDir) -> AirlineStore {
        let store = AirlineStore::new(dir.path().join("airlines.json"));
        store
            .save_all(&[Airline::new(1, "AIRLINE ONE"), Airline::new(2, "Airline Two")])
            .unwrap();
        store
    }

    fn rename(name: &str) -> AirlineUpdate {
        AirlineUpdate {
            company_name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_serializes_with_on_disk_names() {
        let json = serde_json::to_string(&Airline::new(1, "Delta")).unwrap();
        assert_eq!(json, r#"{"ID":1,"Type":"Airline","Company Name":"Delta"}"#);
    }

    #[test]
    fn test_deserializes_without_type_tag() {
        let parsed: Airline = serde_json::from_str(r#"{"ID": 3, "Company Name": "KLM"}"#).unwrap();
        assert_eq!(parsed, Airline::new(3, "KLM"));
    }

    #[test]
    fn test_create_rejects_case_only_duplicate() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let err = store.create(Airline::new(3, "Airline One")).unwrap_err();
        assert_eq!(
            err.validation_reason(),
            Some(ValidationReason::DuplicateAirlineName)
        );
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_create_rejects_padded_duplicate() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let err = store.create(Airline::new(3, "Airline Two ")).unwrap_err();
        assert_eq!(
            err.validation_reason(),
            Some(ValidationReason::DuplicateAirlineName)
        );
        assert!(store.add(Airline::new(0, " airline two")).is_err());
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_create_new_name() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        store.create(Airline::new(3, "Airline Three")).unwrap();
        assert_eq!(
            store.search(3).unwrap(),
            Some(Airline::new(3, "Airline Three"))
        );
    }

    #[test]
    fn test_is_duplicate_name() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        assert!(store.is_duplicate_name("Airline One").unwrap());
        assert!(!store.is_duplicate_name("Airline Nine").unwrap());
    }

    #[test]
    fn test_search_by_name() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let found = store.search_by_name("airline two").unwrap().unwrap();
        assert_eq!(found.id, 2);
        assert!(store.search_by_name("Nobody Air").unwrap().is_none());
    }

    #[test]
    fn test_update_renames() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let outcome = store.update(1, &rename("Updated Airline One")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(
            store.search(1).unwrap().unwrap().company_name,
            "Updated Airline One"
        );
    }

    #[test]
    fn test_update_rejects_name_of_other_airline() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let err = store.update(1, &rename("airline two")).unwrap_err();
        assert_eq!(
            err.validation_reason(),
            Some(ValidationReason::DuplicateAirlineName)
        );
    }

    #[test]
    fn test_update_same_name_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let outcome = store.update(1, &rename(" airline one ")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(store.search(1).unwrap().unwrap().company_name, "AIRLINE ONE");
    }

    #[test]
    fn test_update_without_name_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);
        let before = std::fs::read_to_string(store.path()).unwrap();

        let outcome = store.update(2, &AirlineUpdate::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_apply_keeps_name_on_case_only_change() {
        let mut airline = Airline::new(1, "Delta");
        airline.apply(&rename("DELTA "));
        assert_eq!(airline.company_name, "Delta");

        airline.apply(&rename("Delta Air Lines"));
        assert_eq!(airline.company_name, "Delta Air Lines");
    }

    #[test]
    fn test_update_missing_airline() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);

        let outcome = store.update(9, &rename("Fresh Air")).unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = AirlineStore::new(dir.path().join("airlines.json"));

        let id = store.generate_id().unwrap();
        assert_eq!(id, 1);
        store.create(Airline::new(id, "Delta")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["ID"], 1);
        assert_eq!(raw[0]["Company Name"], "Delta");

        assert_eq!(store.search(1).unwrap(), Some(Airline::new(1, "Delta")));
        assert!(store.delete(1).unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }
}
