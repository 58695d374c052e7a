//! Record sink with per-label aggregation

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global storage instance
static STORAGE: OnceLock<Storage> = OnceLock::new();

/// A single recorded measurement.
///
/// `label` is the free-form prefix the caller started recording under.
/// `flat` selects flattened recording: the stored label is reduced to the
/// last path segment so repeated invocations from different call sites
/// aggregate together.
#[derive(Debug, Clone)]
pub struct Record {
    /// Label the measurement was recorded under
    pub label: String,
    /// Metric name, e.g. "wall_clock"
    pub metric: &'static str,
    /// Measured value
    pub value: f64,
    /// Whether to record flattened rather than hierarchically
    pub flat: bool,
}

impl Record {
    /// Create a new record.
    pub fn new(label: impl Into<String>, metric: &'static str, value: f64, flat: bool) -> Self {
        Self {
            label: label.into(),
            metric,
            value,
            flat,
        }
    }

    /// The label this record aggregates under.
    ///
    /// Hierarchical records keep the full path; flat records keep only the
    /// leaf segment.
    pub fn storage_label(&self) -> &str {
        if self.flat {
            self.label.rsplit('/').next().unwrap_or(&self.label)
        } else {
            &self.label
        }
    }
}

/// Aggregated statistics for one (label, metric) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStats {
    /// Number of recorded samples
    pub count: usize,
    /// Sum of all samples
    pub sum: f64,
    /// Minimum sample
    pub min: f64,
    /// Maximum sample
    pub max: f64,
    /// Most recent sample
    pub last: f64,
}

impl MetricStats {
    fn from_value(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
            last: value,
        }
    }

    fn update(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.last = value;
    }

    /// Mean of all recorded samples.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Snapshot of everything the storage has aggregated so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    /// Identifier of this process's storage session
    pub session_id: uuid::Uuid,
    /// When the summary was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Stats per label, then per metric name
    pub labels: HashMap<String, HashMap<String, MetricStats>>,
    /// Total number of records received
    pub total_records: usize,
}

/// Process-wide measurement storage.
///
/// Components record into this backend while a bundle drives them; the
/// registry initializes it lazily, exactly once, before the first component
/// is appended anywhere. Created on first access and lives for the process
/// lifetime.
#[derive(Debug)]
pub struct Storage {
    initialized: AtomicBool,
    session_id: uuid::Uuid,
    started_at: chrono::DateTime<chrono::Utc>,
    inner: Mutex<SinkState>,
}

#[derive(Debug, Default)]
struct SinkState {
    labels: HashMap<String, HashMap<String, MetricStats>>,
    total_records: usize,
}

impl Storage {
    fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            session_id: uuid::Uuid::new_v4(),
            started_at: chrono::Utc::now(),
            inner: Mutex::new(SinkState::default()),
        }
    }

    /// Get the process-wide storage instance.
    pub fn instance() -> &'static Storage {
        STORAGE.get_or_init(Storage::new)
    }

    /// Initialize the storage backend.
    ///
    /// Thread-safe and idempotent: exactly one call performs the
    /// initialization, every racing caller observes the completed result
    /// before returning.
    pub fn initialize(&self) {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::debug!(
                target: "storage",
                session_id = %self.session_id,
                "storage initialized"
            );
        }
    }

    /// Check whether the backend has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Identifier of this process's storage session.
    pub fn session_id(&self) -> uuid::Uuid {
        self.session_id
    }

    /// When this storage instance was created.
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Record one measurement.
    ///
    /// Records arriving before `initialize()` are dropped; the registry's
    /// init gate runs before any component can start recording, so this only
    /// triggers for components driven outside a bundle.
    pub fn record(&self, record: Record) {
        if !self.is_initialized() {
            tracing::debug!(
                target: "storage",
                label = %record.label,
                metric = record.metric,
                "record dropped: storage not initialized"
            );
            return;
        }

        tracing::trace!(
            target: "storage",
            label = %record.label,
            metric = record.metric,
            value = record.value,
            flat = record.flat,
            "measurement recorded"
        );

        let label = record.storage_label().to_string();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.total_records += 1;
        inner
            .labels
            .entry(label)
            .or_default()
            .entry(record.metric.to_string())
            .and_modify(|stats| stats.update(record.value))
            .or_insert_with(|| MetricStats::from_value(record.value));
    }

    /// Aggregated stats for one (label, metric) pair, if any were recorded.
    pub fn stats(&self, label: &str, metric: &str) -> Option<MetricStats> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.labels.get(label).and_then(|m| m.get(metric)).cloned()
    }

    /// Total number of records received.
    pub fn total_records(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.total_records
    }

    /// Snapshot the aggregated results.
    pub fn summary(&self) -> StorageSummary {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        StorageSummary {
            session_id: self.session_id,
            generated_at: chrono::Utc::now(),
            labels: inner.labels.clone(),
            total_records: inner.total_records,
        }
    }

    /// Export the aggregated results as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    /// Clear all aggregated results.
    ///
    /// Leaves the initialized flag untouched.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.labels.clear();
        inner.total_records = 0;
    }
}
