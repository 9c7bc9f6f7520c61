//! Append-only dataset storage keyed by session id

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::schema::Dataset;

pub type Hash32 = [u8; 32];

pub const RECORD_PREFIX: &str = "rlhf_session_";
pub const RECORD_EXT: &str = ".json";

/// Characters of the session id embedded in a record name.
pub const SESSION_PREFIX_LEN: usize = 8;

/// Collision suffixes tried before giving up on a name.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),

    #[error("no free record name for session {0}")]
    NameExhausted(String),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Where and what was written for one record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreReceipt {
    pub file_path: String,
    pub bytes_written: u64,
    #[serde(with = "hex")]
    pub content_hash: Hash32, // BLAKE3(bytes written)
}

/// Write-once record store. `put` never overwrites; `find` returns the
/// newest record for a session.
pub trait DatasetStore: Send + Sync {
    fn put(&self, dataset: &Dataset) -> Result<StoreReceipt>;
    fn find(&self, session_id: &str) -> Result<Option<Dataset>>;
    /// Record names, oldest first.
    fn list(&self) -> Result<Vec<String>>;
}

/// Session ids end up in file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn check_session_id(session_id: &str) -> Result<()> {
    let ok = !session_id.is_empty()
        && session_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidSessionId(session_id.to_string()))
    }
}

pub fn session_prefix(session_id: &str) -> &str {
    match session_id.char_indices().nth(SESSION_PREFIX_LEN) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}

/// `rlhf_session_<yyyymmdd_HHMMSS>_<prefix>[-<attempt>].json`
pub fn record_name(session_id: &str, at: DateTime<Utc>, attempt: u32) -> String {
    let stamp = at.format("%Y%m%d_%H%M%S");
    let prefix = session_prefix(session_id);
    if attempt == 0 {
        format!("{RECORD_PREFIX}{stamp}_{prefix}{RECORD_EXT}")
    } else {
        format!("{RECORD_PREFIX}{stamp}_{prefix}-{attempt}{RECORD_EXT}")
    }
}

/// Whether a record name belongs to `session_id` (by its 8-char prefix).
pub fn name_matches(name: &str, session_id: &str) -> bool {
    let Some(stem) = name
        .strip_prefix(RECORD_PREFIX)
        .and_then(|n| n.strip_suffix(RECORD_EXT))
    else {
        return false;
    };
    // yyyymmdd_HHMMSS_ is 16 bytes
    let Some(tail) = stem.get(16..) else {
        return false;
    };
    let prefix = session_prefix(session_id);
    match tail.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('-')
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}

/// Sort key putting records in write order: by timestamp, then by
/// collision suffix (`x.json` < `x-1.json` < `x-10.json`).
pub fn record_key(name: &str) -> (&str, usize, &str) {
    // rlhf_session_ + yyyymmdd_HHMMSS
    let stamp = name.get(..RECORD_PREFIX.len() + 15).unwrap_or(name);
    (stamp, name.len(), name)
}

/// Among candidate records (oldest first), prefer the newest exact session
/// match, else the newest prefix match.
fn pick_newest(candidates: Vec<Dataset>, session_id: &str) -> Option<Dataset> {
    let exact = candidates.iter().rposition(|d| d.session_id == session_id);
    let mut candidates = candidates;
    match exact {
        Some(i) => Some(candidates.swap_remove(i)),
        None => candidates.pop(),
    }
}

/// Keep readable candidates; remember the last unreadable one.
fn keep_readable(
    name: &str,
    parsed: Result<Dataset>,
    candidates: &mut Vec<Dataset>,
    failure: &mut Option<StoreError>,
) {
    match parsed {
        Ok(dataset) => candidates.push(dataset),
        Err(e) => {
            warn!(record = %name, error = %e, "skipping unreadable dataset record");
            *failure = Some(e);
        }
    }
}

/// Unreadable records only surface as an error when nothing else matched.
fn resolve(candidates: Vec<Dataset>, failure: Option<StoreError>, session_id: &str) -> Result<Option<Dataset>> {
    match failure {
        Some(e) if candidates.is_empty() => Err(e),
        _ => Ok(pick_newest(candidates, session_id)),
    }
}

fn encode(dataset: &Dataset) -> Result<(Vec<u8>, Hash32)> {
    let bytes = serde_json::to_vec_pretty(dataset)?;
    let hash = blake3::hash(&bytes).into();
    Ok((bytes, hash))
}

/// One pretty-printed JSON file per record in a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn matching_names(&self, session_id: &str) -> Result<Vec<String>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|n| name_matches(n, session_id))
            .collect())
    }
}

impl DatasetStore for FileStore {
    fn put(&self, dataset: &Dataset) -> Result<StoreReceipt> {
        check_session_id(&dataset.session_id)?;
        let (bytes, content_hash) = encode(dataset)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(record_name(&dataset.session_id, dataset.timestamp, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            // durable before anyone can read it back
            if let Err(e) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
                drop(file);
                // a partial record must not shadow the session's other records
                if let Err(rm) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %rm, "could not remove partial dataset record");
                }
                return Err(e.into());
            }
            return Ok(StoreReceipt {
                file_path: path.display().to_string(),
                bytes_written: bytes.len() as u64,
                content_hash,
            });
        }
        Err(StoreError::NameExhausted(dataset.session_id.clone()))
    }

    fn find(&self, session_id: &str) -> Result<Option<Dataset>> {
        check_session_id(session_id)?;
        let mut candidates = Vec::new();
        let mut failure = None;
        for name in self.matching_names(session_id)? {
            let parsed = fs::read(self.dir.join(&name))
                .map_err(StoreError::from)
                .and_then(|bytes| Ok(serde_json::from_slice::<Dataset>(&bytes)?));
            keep_readable(&name, parsed, &mut candidates, &mut failure);
        }
        resolve(candidates, failure, session_id)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(RECORD_PREFIX) && name.ends_with(RECORD_EXT) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_by(|a, b| record_key(a).cmp(&record_key(b)));
        Ok(names)
    }
}

/// In-memory store (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetStore for InMemoryStore {
    fn put(&self, dataset: &Dataset) -> Result<StoreReceipt> {
        check_session_id(&dataset.session_id)?;
        let (bytes, content_hash) = encode(dataset)?;
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;

        let name = (0..MAX_NAME_ATTEMPTS)
            .map(|attempt| record_name(&dataset.session_id, dataset.timestamp, attempt))
            .find(|n| !records.contains_key(n))
            .ok_or_else(|| StoreError::NameExhausted(dataset.session_id.clone()))?;

        let bytes_written = bytes.len() as u64;
        records.insert(name.clone(), bytes);
        Ok(StoreReceipt {
            file_path: format!("memory://{name}"),
            bytes_written,
            content_hash,
        })
    }

    fn find(&self, session_id: &str) -> Result<Option<Dataset>> {
        check_session_id(session_id)?;
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut names: Vec<&String> = records.keys().filter(|n| name_matches(n, session_id)).collect();
        names.sort_by(|a, b| record_key(a).cmp(&record_key(b)));
        let mut candidates = Vec::with_capacity(names.len());
        let mut failure = None;
        for name in names {
            let parsed = serde_json::from_slice::<Dataset>(&records[name]).map_err(StoreError::from);
            keep_readable(name, parsed, &mut candidates, &mut failure);
        }
        resolve(candidates, failure, session_id)
    }

    fn list(&self) -> Result<Vec<String>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut names: Vec<String> = records.keys().cloned().collect();
        names.sort_by(|a, b| record_key(a).cmp(&record_key(b)));
        Ok(names)
    }
}
