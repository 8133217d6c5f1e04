//! Cache layer for kotoba
//!
//! An in-memory TTL cache for list responses and a SQLite-backed cache for
//! synthesized pronunciation audio.

mod audio_cache;
mod clock;
mod error;
mod migrations;
mod ttl_cache;

pub use audio_cache::{AudioCache, PendingSweep};
pub use clock::{to_time_delta, Clock, ManualClock, SystemClock};
pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;
pub use ttl_cache::TtlCache;
