//! Storage layer for recordbook.
//!
//! Each record kind lives in its own JSON file holding an ordered array of
//! records. Every operation is a full read, an in-memory change, and a full
//! atomic rewrite; the file is the only durable state and there is no index.

mod file;

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result, ValidationReason};
use crate::record::Record;

pub use file::LoadOutcome;

/// How [`JsonStore::load_all`] treats a file that exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Treat an unparsable file as an empty store and log a warning.
    #[default]
    Lenient,
    /// Fail with [`Error::CorruptStore`].
    Strict,
}

/// Result of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record was changed and the store rewritten.
    Updated,
    /// The record exists but the update changed nothing; no write happened.
    Unchanged,
    /// No record has the requested identifier.
    NotFound,
}

impl UpdateOutcome {
    /// Check if a record with the identifier exists.
    #[must_use]
    pub fn is_found(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// A file-backed sequence of records of one kind.
#[derive(Debug)]
pub struct JsonStore<R> {
    path: PathBuf,
    policy: LoadPolicy,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonStore<R> {
    /// Create a store over the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: LoadPolicy::default(),
            _record: PhantomData,
        }
    }

    /// Set how unparsable files are treated.
    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the load policy.
    #[must_use]
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Read the store file and report exactly what was found.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failures other than the file being absent.
    pub fn load(&self) -> Result<LoadOutcome<R>> {
        file::read_records(&self.path)
    }

    /// Load every record in file order.
    ///
    /// A missing file is an empty store. An unparsable file is an empty store
    /// under [`LoadPolicy::Lenient`] and an error under [`LoadPolicy::Strict`].
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, or on a corrupt file in strict mode.
    pub fn load_all(&self) -> Result<Vec<R>> {
        match self.load()? {
            LoadOutcome::Loaded(records) => {
                debug!(
                    "Loaded {} {} records from {}",
                    records.len(),
                    R::KIND,
                    self.path.display()
                );
                Ok(records)
            }
            LoadOutcome::Missing => {
                debug!("No {} store at {}", R::KIND, self.path.display());
                Ok(Vec::new())
            }
            LoadOutcome::Corrupt(source) => match self.policy {
                LoadPolicy::Lenient => {
                    warn!(
                        path = %self.path.display(),
                        error = %source,
                        "Unreadable {} store, treating as empty",
                        R::KIND
                    );
                    Ok(Vec::new())
                }
                LoadPolicy::Strict => Err(Error::CorruptStore {
                    path: self.path.clone(),
                    source,
                }),
            },
        }
    }

    /// Overwrite the store file with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the atomic replace fails.
    pub fn save_all(&self, records: &[R]) -> Result<()> {
        let json = file::to_pretty_json(records)?;
        file::write_atomic(&self.path, &json)
    }

    /// Next free identifier: one more than the largest stored, or 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded, or
    /// [`Error::IdExhausted`] if the largest identifier is `u64::MAX`.
    pub fn generate_id(&self) -> Result<u64> {
        next_id(&self.load_all()?)
    }

    /// Append a record that already carries its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationReason::DuplicateId`] if the identifier is taken,
    /// or an I/O error.
    pub fn create(&self, record: R) -> Result<()> {
        self.create_with(record, |_| Ok(()))
    }

    /// Append a record after `validate` accepts it against the current records.
    ///
    /// Nothing is written if validation fails.
    ///
    /// # Errors
    ///
    /// Returns the validation error, a duplicate-ID error, or an I/O error.
    pub fn create_with<F>(&self, record: R, validate: F) -> Result<()>
    where
        F: FnOnce(&[R]) -> Result<()>,
    {
        let mut records = self.load_all()?;
        validate(&records)?;

        let id = record.id();
        if records.iter().any(|r| r.id() == id) {
            return Err(Error::validation(
                ValidationReason::DuplicateId,
                format!("Duplicate record ID {id} detected."),
            ));
        }

        records.push(record);
        self.save_all(&records)?;
        info!("Created {} {}", R::KIND, id);
        Ok(())
    }

    /// Assign the next identifier to `record` and append it, in one
    /// load-and-save cycle. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns the validation error, [`Error::IdExhausted`], or an I/O error.
    pub fn add_with<F>(&self, mut record: R, validate: F) -> Result<R>
    where
        F: FnOnce(&[R]) -> Result<()>,
    {
        let mut records = self.load_all()?;
        validate(&records)?;

        record.set_id(next_id(&records)?);
        records.push(record.clone());
        self.save_all(&records)?;
        info!("Added {} {}", R::KIND, record.id());
        Ok(record)
    }

    /// Find the first record with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn search(&self, id: u64) -> Result<Option<R>> {
        Ok(self.load_all()?.into_iter().find(|r| r.id() == id))
    }

    /// Merge `update` into the record with identifier `id`.
    ///
    /// `validate` sees the current records before the lookup, so a failing
    /// validation is reported even for an unknown identifier.
    ///
    /// # Errors
    ///
    /// Returns the validation error or an I/O error.
    pub fn update_with<F>(&self, id: u64, update: &R::Update, validate: F) -> Result<UpdateOutcome>
    where
        F: FnOnce(&[R]) -> Result<()>,
    {
        let mut records = self.load_all()?;
        validate(&records)?;

        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            debug!("No {} {} to update", R::KIND, id);
            return Ok(UpdateOutcome::NotFound);
        };

        let before = record.clone();
        record.apply(update);
        if *record == before {
            debug!("Update left {} {} unchanged", R::KIND, id);
            return Ok(UpdateOutcome::Unchanged);
        }

        self.save_all(&records)?;
        info!("Updated {} {}", R::KIND, id);
        Ok(UpdateOutcome::Updated)
    }

    /// Remove every record with identifier `id`.
    ///
    /// Returns `true` if anything was removed. The file is rewritten only then.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded or saved.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            debug!("No {} {} to delete", R::KIND, id);
            return Ok(false);
        }

        self.save_all(&records)?;
        info!("Deleted {} {}", R::KIND, id);
        Ok(true)
    }

    /// Count the stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn count(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }

    /// Size of the store file in bytes, or 0 if it does not exist.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

fn next_id<R: Record>(records: &[R]) -> Result<u64> {
    match records.iter().map(Record::id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or(Error::IdExhausted { kind: R::KIND, max }),
    }
}
