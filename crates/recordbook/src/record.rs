//! The record abstraction shared by every store.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The `"Type"` tag written into client and airline records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A client record.
    Client,
    /// An airline record.
    Airline,
}

impl RecordType {
    /// Tag used when a client record on disk has none.
    #[must_use]
    pub fn client() -> Self {
        Self::Client
    }

    /// Tag used when an airline record on disk has none.
    #[must_use]
    pub fn airline() -> Self {
        Self::Airline
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "Client"),
            Self::Airline => write!(f, "Airline"),
        }
    }
}

/// A record kept in a JSON store file.
///
/// Every record has a unique integer identifier and a companion update type
/// describing a partial overlay of its fields.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug {
    /// Lower-case name of the record kind, used in messages.
    const KIND: &'static str;

    /// A partial set of fields; `None` leaves the stored value alone.
    type Update: fmt::Debug;

    /// The record's identifier.
    fn id(&self) -> u64;

    /// Replace the record's identifier.
    fn set_id(&mut self, id: u64);

    /// Overlay every field present in `update` onto this record.
    fn apply(&mut self, update: &Self::Update);
}

/// Overwrite `target` when `value` is present.
pub(crate) fn overlay<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}
