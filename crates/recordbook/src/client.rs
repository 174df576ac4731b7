//! Client records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{overlay, Record, RecordType};
use crate::storage::{JsonStore, LoadPolicy};
use crate::validation;

/// A client: a person with a postal address and a unique phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier.
    #[serde(rename = "ID")]
    pub id: u64,

    /// Record tag, always [`RecordType::Client`].
    #[serde(rename = "Type", default = "RecordType::client")]
    pub record_type: RecordType,

    /// Full name.
    #[serde(rename = "Name", default)]
    pub name: String,

    /// First address line.
    #[serde(rename = "Address Line 1", default)]
    pub address_line1: String,

    /// Second address line.
    #[serde(rename = "Address Line 2", default)]
    pub address_line2: String,

    /// Third address line.
    #[serde(rename = "Address Line 3", default)]
    pub address_line3: String,

    /// City.
    #[serde(rename = "City", default)]
    pub city: String,

    /// State or region.
    #[serde(rename = "State", default)]
    pub state: String,

    /// Postal code, kept as text.
    #[serde(rename = "Zip Code", default)]
    pub zip_code: String,

    /// Country.
    #[serde(rename = "Country", default)]
    pub country: String,

    /// Phone number in `1-773-5435432` form; unique across clients.
    #[serde(rename = "Phone Number", default)]
    pub phone: String,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            id: 0,
            record_type: RecordType::Client,
            name: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            address_line3: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
            phone: String::new(),
        }
    }
}

/// Fields to overlay onto an existing client. Each mirrors the
/// [`Client`] field of the same name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl Record for Client {
    const KIND: &'static str = "client";
    type Update = ClientUpdate;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn apply(&mut self, update: &ClientUpdate) {
        overlay(&mut self.name, update.name.as_ref());
        overlay(&mut self.address_line1, update.address_line1.as_ref());
        overlay(&mut self.address_line2, update.address_line2.as_ref());
        overlay(&mut self.address_line3, update.address_line3.as_ref());
        overlay(&mut self.city, update.city.as_ref());
        overlay(&mut self.state, update.state.as_ref());
        overlay(&mut self.zip_code, update.zip_code.as_ref());
        overlay(&mut self.country, update.country.as_ref());
        overlay(&mut self.phone, update.phone.as_ref());
    }
}

/// The client store: phone format and phone uniqueness are enforced here.
#[derive(Debug)]
pub struct ClientStore {
    store: JsonStore<Client>,
    unique_phone_on_update: bool,
}

impl ClientStore {
    /// Open the client store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
            unique_phone_on_update: true,
        }
    }

    /// Set how unparsable files are treated.
    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.store = self.store.with_policy(policy);
        self
    }

    /// Whether `update` rejects a phone number used by another client.
    /// Format is checked on update regardless.
    #[must_use]
    pub fn with_unique_phone_on_update(mut self, enabled: bool) -> Self {
        self.unique_phone_on_update = enabled;
        self
    }

    /// The underlying record file.
    #[must_use]
    pub fn store(&self) -> &JsonStore<Client> {
        &self.store
    }

    /// Get the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Load every client.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::load_all`].
    pub fn load_all(&self) -> Result<Vec<Client>> {
        self.store.load_all()
    }

    /// Overwrite the store with `clients`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::save_all`].
    pub fn save_all(&self, clients: &[Client]) -> Result<()> {
        self.store.save_all(clients)
    }

    /// Next free client identifier.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::generate_id`].
    pub fn generate_id(&self) -> Result<u64> {
        self.store.generate_id()
    }

    /// Check if any stored client already has exactly this phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn is_duplicate_phone(&self, phone: &str) -> Result<bool> {
        Ok(validation::phone_in_use(&self.load_all()?, phone, None))
    }

    /// Store a client whose identifier is already set.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for a malformed or duplicate phone, or a
    /// duplicate identifier. Nothing is written in that case.
    pub fn create(&self, client: Client) -> Result<()> {
        validation::check_phone(&client.phone)?;
        let phone = client.phone.clone();
        self.store.create_with(client, |existing| {
            validation::check_phone_unused(existing, &phone, None)
        })
    }

    /// Store a new client under the next free identifier and return it.
    ///
    /// # Errors
    ///
    /// Same validation as [`ClientStore::create`].
    pub fn add(&self, client: Client) -> Result<Client> {
        validation::check_phone(&client.phone)?;
        let phone = client.phone.clone();
        self.store.add_with(client, |existing| {
            validation::check_phone_unused(existing, &phone, None)
        })
    }

    /// Find a client by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn search(&self, id: u64) -> Result<Option<Client>> {
        self.store.search(id)
    }

    /// Overlay `update` onto client `id`. Returns `false` if there is no
    /// such client.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if a supplied phone is malformed, or
    /// (when enabled) used by another client.
    pub fn update(&self, id: u64, update: &ClientUpdate) -> Result<bool> {
        if let Some(phone) = &update.phone {
            validation::check_phone(phone)?;
        }
        let check_unique = self.unique_phone_on_update;
        let outcome = self.store.update_with(id, update, |existing| {
            match &update.phone {
                Some(phone) if check_unique => {
                    validation::check_phone_unused(existing, phone, Some(id))
                }
                _ => Ok(()),
            }
        })?;
        Ok(outcome.is_found())
    }

    /// Delete client `id`. Returns `false` if there is no such client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded or saved.
    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(id)
    }
}
