//! Process-wide measurement storage backend
//!
//! This crate is the storage collaborator the bundle registry initializes
//! and measurement components record into:
//!
//! - A lazily-created process singleton ([`Storage::instance`]) with a
//!   thread-safe, idempotent [`Storage::initialize`] gate
//! - A record sink aggregating per-label, per-metric statistics
//! - Summary snapshots with JSON export
//!
//! The `flat` flag on a [`Record`] selects flattened rather than
//! hierarchical label handling; its meaning is owned entirely by this
//! backend.

mod error;
mod sink;

pub use error::{Result, StorageError};
pub use sink::{MetricStats, Record, Storage, StorageSummary};
