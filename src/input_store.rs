use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::debounce::{Debouncer, QUIET_PERIOD};

pub const FRESHNESS_WINDOW_MS: i64 = 5 * 60 * 1000;

const STATE_DIR: &str = "idleclans_terminal";
const STATE_FILE: &str = "last_username.json";

/// One raw key/value slot.
pub trait InputSlot {
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, raw: &str) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputSlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {}", self.path.display())),
        }
    }

    fn write(&mut self, raw: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).context("write input slot")?;
        fs::rename(&tmp, &self.path).context("swap input slot")?;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}

/// In-memory slot; counts writes so debounce behaviour can be observed.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    writes: usize,
}

impl MemorySlot {
    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl InputSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, raw: &str) -> Result<()> {
        self.value = Some(raw.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct StoredInput {
    value: String,
    timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh { age_ms: i64 },
    // Plain-string record from before timestamps were stored; never expires.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInput {
    pub value: String,
    pub freshness: Freshness,
}

/// Last entered username, valid for [`FRESHNESS_WINDOW_MS`] after it was saved.
#[derive(Debug, Clone)]
pub struct InputStore<S> {
    slot: S,
}

impl<S: InputSlot> InputStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Expired records are removed from the slot as part of the read. A JSON
    /// object without a numeric `timestamp` counts as expired.
    pub fn load(&mut self, now_ms: i64) -> Result<Option<PersistedInput>> {
        let Some(raw) = self.slot.read()? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        // Only JSON objects are timestamped records; anything else, including
        // a bare name like `12345` that happens to parse, is a legacy value.
        let record = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(record)) => record,
            _ => {
                return Ok(Some(PersistedInput {
                    value: raw,
                    freshness: Freshness::Legacy,
                }));
            }
        };

        let age_ms = record
            .get("timestamp")
            .and_then(Value::as_f64)
            .map(|timestamp| now_ms as f64 - timestamp)
            .filter(|age| age.is_finite());
        let Some(age_ms) = age_ms.filter(|age| *age < FRESHNESS_WINDOW_MS as f64) else {
            self.slot.remove()?;
            return Ok(None);
        };

        let value = match record.get("value").and_then(Value::as_str) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return Ok(None),
        };
        Ok(Some(PersistedInput {
            value,
            freshness: Freshness::Fresh {
                age_ms: age_ms.max(0.0) as i64,
            },
        }))
    }

    pub fn save(&mut self, value: &str, now_ms: i64) -> Result<()> {
        let stored = StoredInput {
            value: value.to_string(),
            timestamp: now_ms,
        };
        let json = serde_json::to_string(&stored).context("serialize input record")?;
        self.slot.write(&json)
    }
}

/// Coalesces keystrokes into one persisted write per quiet period.
#[derive(Debug, Clone)]
pub struct DebouncedSaver<S> {
    store: InputStore<S>,
    debouncer: Debouncer<String>,
}

impl<S: InputSlot> DebouncedSaver<S> {
    pub fn new(store: InputStore<S>) -> Self {
        Self {
            store,
            debouncer: Debouncer::new(QUIET_PERIOD),
        }
    }

    pub fn store(&self) -> &InputStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut InputStore<S> {
        &mut self.store
    }

    /// Clearing the input cancels a pending write without persisting the blank.
    pub fn input_changed(&mut self, value: &str, now: Instant) {
        if value.is_empty() {
            self.debouncer.cancel();
            return;
        }
        self.debouncer.schedule(value.to_string(), now);
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns `true` when a write happened on this tick.
    pub fn tick(&mut self, now: Instant, now_ms: i64) -> Result<bool> {
        let Some(value) = self.debouncer.poll(now) else {
            return Ok(false);
        };
        self.store.save(&value, now_ms)?;
        Ok(true)
    }
}

/// `IDLECLANS_STATE_DIR` wins, then `$XDG_CACHE_HOME`, then `~/.cache`.
pub fn default_slot_path(state_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = state_dir {
        return Some(dir.join(STATE_FILE));
    }
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(STATE_DIR).join(STATE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(STATE_DIR)
            .join(STATE_FILE),
    )
}
