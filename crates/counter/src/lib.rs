//! Client-side view counting.
//!
//! A project page asks [`ViewCountDisplay`] for a number to show. When remote
//! tracking is enabled the authoritative server count is used; otherwise, or
//! when the server cannot be reached, a locally persisted counter is shown and
//! grown by [`GrowthSimulator`] every few days. The two tiers are independent
//! and never reconciled with each other.

mod admin;
mod counter_store;
mod display;
mod error;
mod flags;
mod growth;
mod remote;
mod seams;
mod store;

pub use admin::{AdminError, AdminPanel, AdminResult, SPIKE_RANGE};
pub use counter_store::{
    BASE_VIEW_COUNTS, CounterStore, SEED_RANGE, base_view_count, last_increment_key,
    view_count_key,
};
pub use display::{DisplayedCount, ViewCountDisplay};
pub use error::{CounterError, RemoteError, Result};
pub use flags::FeatureFlags;
pub use growth::{GrowthSimulator, INCREMENT_RANGE, INTERVAL_DAYS};
pub use remote::{HttpRemoteCounter, RemoteCounter, RemoteSettings};
pub use seams::{
    Clock, ManualClock, RandomSource, ScriptedRandom, SeededRandom, SystemClock, ThreadRandom,
    uniform_f64, uniform_u64,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
