//! Pronunciation audio cache, persisted in SQLite across restarts.
//!
//! Rows are keyed by the exact source text. Audio bytes are stored as base64
//! text together with the format version that wrote them. Every read or write
//! failure is logged and treated as a miss.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use kotoba_core::constants::AUDIO_CACHE_FORMAT_VERSION;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::clock::{to_time_delta, Clock, SystemClock};
use crate::error::StorageError;
use crate::migrations;
use crate::ttl_cache::TtlCache;

struct StoredAudio {
    payload: String,
    created_at: i64,
    format_version: i64,
}

pub struct AudioCache {
    conn: Mutex<Connection>,
    memory: TtlCache<String, Arc<Vec<u8>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AudioCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCache").field("memory", &self.memory).field("ttl", &self.ttl).finish()
    }
}

impl AudioCache {
    /// Open (or create) the cache database at `db_path`.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or migrations fail.
    pub fn open(db_path: &Path, ttl: Duration) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, ttl, Arc::new(SystemClock))
    }

    /// Non-persistent cache, for tests and for running without a data dir.
    ///
    /// # Errors
    /// Returns an error if `SQLite` cannot create the in-memory database.
    pub fn open_in_memory(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?, ttl, clock)
    }

    /// # Errors
    /// Returns an error if migrations fail.
    pub fn from_connection(
        conn: Connection,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            memory: TtlCache::with_clock(ttl, Arc::clone(&clock)),
            ttl: to_time_delta(ttl),
            clock,
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(created_at) > self.ttl
    }

    /// Cached audio for exactly `text`, if present and fresh.
    pub fn get(&self, text: &str) -> Option<Vec<u8>> {
        if let Some(audio) = self.memory.get(text) {
            tracing::debug!(chars = text.chars().count(), "audio cache hit (memory)");
            return Some(audio.as_ref().clone());
        }
        match self.load(text) {
            Ok(Some((audio, created_at))) => {
                tracing::debug!(chars = text.chars().count(), "audio cache hit (disk)");
                let audio = Arc::new(audio);
                self.memory.set_at(text.to_owned(), Arc::clone(&audio), created_at);
                Some(audio.as_ref().clone())
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "audio cache read failed, treating as miss");
                None
            },
        }
    }

    pub fn has(&self, text: &str) -> bool {
        self.memory.has(text) || matches!(self.load(text), Ok(Some(_)))
    }

    /// Decode the persisted row for `text`, deleting it if stale or corrupt.
    fn load(&self, text: &str) -> Result<Option<(Vec<u8>, DateTime<Utc>)>, StorageError> {
        let row = {
            let conn = self.lock_conn()?;
            conn.query_row(
                "SELECT payload, created_at, format_version FROM audio_cache WHERE text = ?1",
                params![text],
                |row| {
                    Ok(StoredAudio {
                        payload: row.get(0)?,
                        created_at: row.get(1)?,
                        format_version: row.get(2)?,
                    })
                },
            )
            .optional()?
        };
        let Some(row) = row else {
            return Ok(None);
        };

        if row.format_version != AUDIO_CACHE_FORMAT_VERSION {
            tracing::debug!(version = row.format_version, "dropping audio written by old format");
            self.delete_row(text)?;
            return Ok(None);
        }
        let Some(created_at) = Utc.timestamp_millis_opt(row.created_at).single() else {
            tracing::warn!("audio cache row has invalid timestamp, evicting");
            self.delete_row(text)?;
            return Ok(None);
        };
        if self.is_expired(created_at, self.clock.now()) {
            self.delete_row(text)?;
            return Ok(None);
        }
        match STANDARD.decode(row.payload.as_bytes()) {
            Ok(audio) => Ok(Some((audio, created_at))),
            Err(e) => {
                tracing::warn!(error = %e, "corrupted audio cache row, evicting");
                self.delete_row(text)?;
                Ok(None)
            },
        }
    }

    fn delete_row(&self, text: &str) -> Result<(), StorageError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM audio_cache WHERE text = ?1", params![text])?;
        Ok(())
    }

    /// Store `audio` for exactly `text`, replacing any previous entry.
    pub fn set(&self, text: &str, audio: &[u8]) {
        let now = self.clock.now();
        self.memory.set_at(text.to_owned(), Arc::new(audio.to_vec()), now);
        if let Err(e) = self.persist(text, audio, now) {
            tracing::warn!(error = %e, "audio cache write failed, entry kept in memory only");
        }
    }

    fn persist(&self, text: &str, audio: &[u8], now: DateTime<Utc>) -> Result<(), StorageError> {
        let payload = STANDARD.encode(audio);
        let conn = self.lock_conn()?;
        conn.execute(
            r#"INSERT OR REPLACE INTO audio_cache (text, payload, created_at, format_version)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![text, payload, now.timestamp_millis(), AUDIO_CACHE_FORMAT_VERSION],
        )?;
        Ok(())
    }

    pub fn remove(&self, text: &str) {
        self.memory.remove(text);
        if let Err(e) = self.delete_row(text) {
            tracing::warn!(error = %e, "audio cache delete failed");
        }
    }

    pub fn clear(&self) {
        self.memory.clear();
        let result = self
            .lock_conn()
            .and_then(|conn| conn.execute("DELETE FROM audio_cache", []).map_err(Into::into));
        if let Err(e) = result {
            tracing::warn!(error = %e, "audio cache clear failed");
        }
    }

    /// Delete every persisted row that is expired or was written by another
    /// format version. Returns the number of rows removed.
    pub fn sweep(&self) -> usize {
        let cutoff = self.clock.now().checked_sub_signed(self.ttl).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let result = self.lock_conn().and_then(|conn| {
            conn.execute(
                "DELETE FROM audio_cache WHERE format_version != ?1 OR created_at < ?2",
                params![AUDIO_CACHE_FORMAT_VERSION, cutoff.timestamp_millis()],
            )
            .map_err(Into::into)
        });
        match result {
            Ok(removed) => {
                tracing::info!(removed, "audio cache sweep finished");
                removed
            },
            Err(e) => {
                tracing::warn!(error = %e, "audio cache sweep failed");
                0
            },
        }
    }

    /// Run [`AudioCache::sweep`] once, `delay` after being called.
    ///
    /// The returned [`PendingSweep`] can be dropped to leave the sweep running
    /// in the background, or finished early before the runtime shuts down.
    pub fn spawn_startup_sweep(self: &Arc<Self>, delay: Duration) -> PendingSweep {
        let cache = Arc::clone(self);
        let start_now = Arc::new(Notify::new());
        let signal = Arc::clone(&start_now);
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {},
                () = signal.notified() => {},
            }
            tokio::task::spawn_blocking(move || cache.sweep()).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "audio cache sweep task failed");
                0
            })
        });
        PendingSweep { handle, start_now }
    }

    /// Number of persisted rows, fresh or not.
    ///
    /// # Errors
    /// Returns an error if the count query fails.
    pub fn persisted_len(&self) -> Result<usize, StorageError> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM audio_cache", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| StorageError::DataCorruption(e.to_string()))
    }

    /// Write a row as-is, bypassing encoding and versioning.
    #[cfg(test)]
    pub(crate) fn insert_raw(
        &self,
        text: &str,
        payload: &str,
        created_at: DateTime<Utc>,
        format_version: i64,
    ) -> Result<(), StorageError> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO audio_cache (text, payload, created_at, format_version) VALUES (?1, ?2, ?3, ?4)",
            params![text, payload, created_at.timestamp_millis(), format_version],
        )?;
        Ok(())
    }
}

/// A sweep scheduled by [`AudioCache::spawn_startup_sweep`].
#[derive(Debug)]
pub struct PendingSweep {
    handle: JoinHandle<usize>,
    start_now: Arc<Notify>,
}

impl PendingSweep {
    /// Skip whatever is left of the delay and wait for the sweep.
    /// Returns the number of rows removed.
    pub async fn finish(self) -> usize {
        self.start_now.notify_one();
        self.handle.await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "audio cache sweep task failed");
            0
        })
    }
}
