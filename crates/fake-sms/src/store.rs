//! File-backed registry of the operator's numbers.
//!
//! The document is a JSON array of [`Number`] at `<store-dir>/db.json`.
//! Every operation re-reads the whole file, so separate invocations always
//! see each other's writes; concurrent processes race with last writer wins.
//! Each write goes to its own uniquely named temp file in the store directory
//! and is renamed over the document, so readers and a crash mid-write only
//! ever see a complete document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::types::{Number, SmsError, SmsResult};

/// Environment variable overriding the store directory.
pub const STORE_DIR_ENV: &str = "FAKE_SMS_DB_DIR";

/// Store directory name under the home directory.
pub const DEFAULT_STORE_DIR: &str = ".fake-sms";

pub const DB_FILE_NAME: &str = "db.json";

/// Body of a freshly created document.
const EMPTY_DOCUMENT: &str = "[\n]\n";

/// Resolve the store directory: explicit path, then `FAKE_SMS_DB_DIR`,
/// then `~/.fake-sms`.
pub fn resolve_store_dir(explicit: Option<&Path>) -> SmsResult<PathBuf> {
    resolve_store_dir_from(
        explicit,
        std::env::var_os(STORE_DIR_ENV).map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn resolve_store_dir_from(
    explicit: Option<&Path>,
    env_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> SmsResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(dir) = env_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    home.map(|h| h.join(DEFAULT_STORE_DIR)).ok_or_else(|| SmsError::Store {
        path: PathBuf::from(DEFAULT_STORE_DIR),
        message: format!("no home directory; set {STORE_DIR_ENV}"),
    })
}

/// Handle to the store document. Holds only the path; nothing is cached.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open the store in `dir`, creating the directory (owner-only) and an
    /// empty document if they do not exist yet.
    pub fn open(dir: &Path) -> SmsResult<Self> {
        if !dir.exists() {
            tracing::info!("Creating store directory: {}", dir.display());
            create_private_dir(dir).map_err(|e| SmsError::store(dir, e))?;
        }

        let path = dir.join(DB_FILE_NAME);
        if !path.exists() {
            let created = stage(dir, EMPTY_DOCUMENT.as_bytes())
                .and_then(|tmp| tmp.persist_noclobber(&path).map_err(io::Error::from));
            match created {
                Ok(_) => tracing::info!("Creating store document: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(SmsError::store(&path, e)),
            }
        }

        Ok(Self { path })
    }

    /// Open the store at the default location.
    pub fn open_default() -> SmsResult<Self> {
        Self::open(&resolve_store_dir(None)?)
    }

    /// Path of the store document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered numbers in insertion order.
    pub fn list(&self) -> SmsResult<Vec<Number>> {
        self.read_numbers()
    }

    /// Whether `number` is registered.
    pub fn contains(&self, number: &str) -> SmsResult<bool> {
        Ok(self.read_numbers()?.iter().any(|n| n.number == number))
    }

    /// Append `number`. A number that is already registered is rejected.
    pub fn append(&self, number: Number) -> SmsResult<()> {
        let mut numbers = self.read_numbers()?;
        if numbers.iter().any(|n| n.number == number.number) {
            return Err(SmsError::DuplicateNumber(number.number));
        }
        tracing::info!("Registering {number}");
        numbers.push(number);
        self.write_numbers(&numbers)
    }

    /// Remove the entry at `index` of the current document and return it.
    /// Later entries shift down by one.
    pub fn remove_at(&self, index: usize) -> SmsResult<Number> {
        let mut numbers = self.read_numbers()?;
        if index >= numbers.len() {
            return Err(SmsError::IndexOutOfRange {
                index,
                len: numbers.len(),
            });
        }
        let removed = numbers.remove(index);
        tracing::info!("Removing {removed} at index {index}");
        self.write_numbers(&numbers)?;
        Ok(removed)
    }

    /// Remove the entry whose `number` equals `number` and return it.
    pub fn remove_number(&self, number: &str) -> SmsResult<Number> {
        let mut numbers = self.read_numbers()?;
        let index = numbers
            .iter()
            .position(|n| n.number == number)
            .ok_or_else(|| SmsError::NumberNotFound(number.to_string()))?;
        let removed = numbers.remove(index);
        tracing::info!("Removing {removed}");
        self.write_numbers(&numbers)?;
        Ok(removed)
    }

    fn read_numbers(&self) -> SmsResult<Vec<Number>> {
        tracing::debug!("Reading store document: {}", self.path.display());
        let data = fs::read_to_string(&self.path).map_err(|e| SmsError::store(&self.path, e))?;
        serde_json::from_str(&data).map_err(|e| SmsError::StoreCorrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_numbers(&self, numbers: &[Number]) -> SmsResult<()> {
        let mut payload = serde_json::to_vec_pretty(numbers)?;
        payload.push(b'\n');

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        stage(dir, &payload)
            .and_then(|tmp| tmp.persist(&self.path).map_err(io::Error::from))
            .map_err(|e| SmsError::store(&self.path, e))?;
        Ok(())
    }
}

/// Write `data` to a fresh owner-only temp file in `dir` and flush it to
/// disk. The file is deleted if it is dropped without being persisted.
fn stage(dir: &Path, data: &[u8]) -> io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
