//! Offline copy of the engine state on local disk.
//!
//! The file is one JSON object with two fixed keys, [`DRAFTS_KEY`] and
//! [`HISTORY_KEY`]. It is read once at startup and rewritten after every
//! mutation. The history store stays the system of record: this copy only
//! bridges restarts and store outages.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{DraftStore, ResultEngine, SettlementRecord};

pub const DRAFTS_KEY: &str = "drafts";
pub const HISTORY_KEY: &str = "history";

/// What the cache file held at startup.
#[derive(Debug, Default)]
pub struct CachedState {
    pub drafts: DraftStore,
    pub history: Vec<SettlementRecord>,
}

#[derive(Clone, Debug)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cache. A missing file yields an empty state; a key that
    /// cannot be decoded is logged and replaced by its default.
    pub fn load(&self) -> ResultEngine<CachedState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CachedState::default());
            }
            Err(err) => return Err(err.into()),
        };
        let mut document: Map<String, Value> = serde_json::from_str(&content)?;

        Ok(CachedState {
            drafts: decode_key(&mut document, DRAFTS_KEY),
            history: decode_key(&mut document, HISTORY_KEY),
        })
    }

    /// Rewrites the whole cache file.
    pub fn save(&self, drafts: &DraftStore, history: &[SettlementRecord]) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut document = Map::new();
        document.insert(DRAFTS_KEY.to_string(), serde_json::to_value(drafts)?);
        document.insert(HISTORY_KEY.to_string(), serde_json::to_value(history)?);
        let payload = serde_json::to_string_pretty(&document)?;

        // Write next to the target and rename, so a crash never leaves half a file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn decode_key<T: DeserializeOwned + Default>(document: &mut Map<String, Value>, key: &str) -> T {
    let Some(value) = document.remove(key) else {
        return T::default();
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!("ignoring unreadable '{key}' entry in local cache: {err}");
            T::default()
        }
    }
}
