//! File-backed favorites store
//!
//! [`FavoritesStore`] keeps the ordered list of [`ServerRecord`]s in memory and
//! rewrites the backing file synchronously after every mutation. A failed
//! write is logged and reported but never discards the in-memory list, which
//! stays authoritative until the next successful save.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{RecordId, ServerRecord};
use crate::tracing::span_names;

use super::codec::{FILE_HEADER, decode_record, encode_record};

/// Kind of change announced by [`FavoritesStore::subscribe`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// The collection was (re)loaded from disk
    Loaded,
    /// A record was appended
    Added(RecordId),
    /// A record was replaced in place
    Updated(RecordId),
    /// Records with this id were removed
    Deleted(RecordId),
}

/// Change notification carried by the store's watch channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// Incremented on every change; starts at 0 before any load
    pub revision: u64,
    /// What happened, `None` before the first change
    pub kind: Option<ChangeKind>,
}

/// Summary of a [`FavoritesStore::load`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records kept in the collection
    pub loaded: usize,
    /// Lines that could not be decoded or duplicated an earlier id
    pub skipped: usize,
}

/// Ordered, file-backed collection of favorite servers
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    records: Vec<ServerRecord>,
    change_tx: watch::Sender<StoreChange>,
    dirty: bool,
}

impl FavoritesStore {
    /// Creates an empty store bound to `path` without touching the disk
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (change_tx, _) = watch::channel(StoreChange {
            revision: 0,
            kind: None,
        });
        Self {
            path: path.into(),
            records: Vec::new(),
            change_tx,
            dirty: false,
        }
    }

    /// Creates a store bound to `path` and loads it
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribes to change notifications
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreChange> {
        self.change_tx.subscribe()
    }

    /// Returns true if in-memory changes have not reached the file yet
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the in-memory collection with the contents of the file
    ///
    /// A missing file yields an empty collection. An unreadable file is logged
    /// and also yields an empty collection. Each line is decoded on its own:
    /// invalid UTF-8 is replaced lossily, and lines that fail to decode or
    /// repeat an id already seen are skipped.
    pub fn load(&mut self) -> LoadReport {
        let _span = tracing::info_span!(span_names::STORE_LOAD, path = %self.path.display()).entered();

        self.records.clear();
        self.dirty = false;

        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No favorites file found, starting fresh");
                self.notify(ChangeKind::Loaded);
                return LoadReport::default();
            }
            Err(source) => {
                let err = StoreError::Read {
                    path: self.path.clone(),
                    source,
                };
                error!(error = %err, "Failed to load favorites");
                self.notify(ChangeKind::Loaded);
                return LoadReport::default();
            }
        };

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();

        for (index, raw) in contents.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);
            if matches!(line, Cow::Owned(_)) {
                warn!(line = index + 1, "Favorites line is not valid UTF-8, decoding lossily");
            }

            let mut record = match decode_record(&line) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!(line = index + 1, error = %e, "Skipping unparsable favorites line");
                    report.skipped += 1;
                    continue;
                }
            };

            if record.id.is_empty() {
                record.id = RecordId::generate();
                self.dirty = true;
            }
            if !seen.insert(record.id.clone()) {
                warn!(line = index + 1, id = %record.id, "Skipping duplicate favorites id");
                report.skipped += 1;
                continue;
            }
            self.records.push(record);
        }

        report.loaded = self.records.len();
        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "Loaded favorite servers"
        );
        self.notify(ChangeKind::Loaded);
        report
    }

    /// Serializes the whole collection and overwrites the backing file
    ///
    /// The data is written to a sibling temporary file first and then renamed
    /// over the target, so a crash mid-write leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the directory, temporary file or rename
    /// fails. The in-memory collection is left untouched.
    pub fn save(&mut self) -> StoreResult<()> {
        let _span = tracing::info_span!(span_names::STORE_SAVE, path = %self.path.display()).entered();

        let mut contents = String::with_capacity(64 * (self.records.len() + 1));
        contents.push_str(FILE_HEADER);
        contents.push('\n');
        for record in &self.records {
            let _ = writeln!(contents, "{}", encode_record(record));
        }

        self.write_atomically(&contents)
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        self.dirty = false;
        info!(count = self.records.len(), "Saved favorite servers");
        Ok(())
    }

    fn write_atomically(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        Ok(())
    }

    /// Saves after a mutation, logging instead of propagating failures
    fn persist(&mut self) {
        self.dirty = true;
        if let Err(e) = self.save() {
            error!(error = %e, "Failed to save favorites; keeping changes in memory");
        }
    }

    fn notify(&self, kind: ChangeKind) {
        self.change_tx.send_modify(|change| {
            change.revision += 1;
            change.kind = Some(kind);
        });
    }

    /// Appends a record, persists and notifies
    ///
    /// A record without an id, or whose id is already taken, receives a fresh
    /// one. Returns the id the record is stored under.
    pub fn add(&mut self, mut record: ServerRecord) -> RecordId {
        if record.id.is_empty() {
            record.id = RecordId::generate();
        } else if self.get(&record.id).is_some() {
            let fresh = RecordId::generate();
            warn!(old = %record.id, new = %fresh, "Record id already in use, assigning a new one");
            record.id = fresh;
        }

        let id = record.id.clone();
        debug!(id = %id, name = %record.name, "Adding favorite server");
        self.records.push(record);
        self.persist();
        self.notify(ChangeKind::Added(id.clone()));
        id
    }

    /// Replaces the record with the same id in place
    ///
    /// Returns false, without persisting or notifying, if no record matches.
    pub fn update(&mut self, record: ServerRecord) -> bool {
        let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) else {
            debug!(id = %record.id, "Update ignored, no such record");
            return false;
        };

        let id = record.id.clone();
        *slot = record;
        debug!(id = %id, "Updated favorite server");
        self.persist();
        self.notify(ChangeKind::Updated(id));
        true
    }

    /// Removes every record with the given id, persists and notifies
    ///
    /// Returns the number of records removed.
    pub fn delete(&mut self, id: &RecordId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = before - self.records.len();
        debug!(id = %id, removed, "Deleted favorite server");
        self.persist();
        self.notify(ChangeKind::Deleted(id.clone()));
        removed
    }

    /// Looks up a record by id
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&ServerRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// All records in insertion order
    #[must_use]
    pub fn list(&self) -> &[ServerRecord] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds a record by name or id
    ///
    /// Tries, in order: exact name, exact id, case-insensitive name, and a
    /// unique case-insensitive name prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing matches or the reference is
    /// blank, and
    /// [`StoreError::Ambiguous`] if a prefix matches several records.
    pub fn find(&self, reference: &str) -> StoreResult<&ServerRecord> {
        if reference.trim().is_empty() {
            return Err(StoreError::NotFound(reference.to_string()));
        }
        if let Some(record) = self.records.iter().find(|r| r.name == reference) {
            return Ok(record);
        }
        if let Some(record) = self.records.iter().find(|r| r.id.as_str() == reference) {
            return Ok(record);
        }
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(reference))
        {
            return Ok(record);
        }

        let prefix = reference.to_lowercase();
        let matches: Vec<&ServerRecord> = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(reference.to_string())),
            [single] => Ok(*single),
            many => Err(StoreError::Ambiguous {
                reference: reference.to_string(),
                matches: many.iter().map(|r| r.name.clone()).collect(),
            }),
        }
    }
}
