//! Reading and atomically replacing store files.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Indentation used for store files, matching files written by earlier tools.
const INDENT: &[u8] = b"    ";

/// What was found at a store path.
#[derive(Debug)]
pub enum LoadOutcome<R> {
    /// No file exists yet.
    Missing,
    /// The file parsed into this sequence of records.
    Loaded(Vec<R>),
    /// The file exists but is not a JSON array of records.
    Corrupt(serde_json::Error),
}

impl<R> LoadOutcome<R> {
    /// Check if the file parsed successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Check if the file exists but failed to parse.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

/// Read and parse a store file.
///
/// A missing file and a parse failure are reported as outcomes; any other
/// I/O failure is an error.
pub(crate) fn read_records<R: DeserializeOwned>(path: &Path) -> Result<LoadOutcome<R>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
        Err(e) => return Err(e.into()),
    };

    Ok(match serde_json::from_slice(&bytes) {
        Ok(records) => LoadOutcome::Loaded(records),
        Err(e) => LoadOutcome::Corrupt(e),
    })
}

/// Serialize records as an indented JSON array.
pub(crate) fn to_pretty_json<R: Serialize>(records: &[R]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replace `path` with `contents` without ever exposing a partial file.
///
/// The data goes to a temporary file in the same directory, is synced, and
/// is then renamed over the target.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let persist_err = |source| Error::Persist {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(persist_err)?;
    tmp.write_all(contents).map_err(persist_err)?;
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let outcome: LoadOutcome<u64> = read_records(&dir.path().join("none.json")).unwrap();
        assert!(matches!(outcome, LoadOutcome::Missing));
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{\"ID\": 1,").unwrap();

        let outcome: LoadOutcome<u64> = read_records(&path).unwrap();
        assert!(outcome.is_corrupt());
        assert!(!outcome.is_loaded());
    }

    #[test]
    fn test_read_empty_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();

        let outcome: LoadOutcome<u64> = read_records(&path).unwrap();
        assert!(outcome.is_corrupt());
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let json = to_pretty_json(&[1_u64, 2]).unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "[\n    1,\n    2\n]\n");
    }

    #[test]
    fn test_pretty_json_empty() {
        let json = to_pretty_json::<u64>(&[]).unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/store.json");

        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        write_atomic(&path, b"[1, 2, 3]").unwrap();
        write_atomic(&path, b"[4]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[4]");
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("numbers.json");

        write_atomic(&path, &to_pretty_json(&[3_u64, 1, 2]).unwrap()).unwrap();
        match read_records::<u64>(&path).unwrap() {
            LoadOutcome::Loaded(v) => assert_eq!(v, vec![3, 1, 2]),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
