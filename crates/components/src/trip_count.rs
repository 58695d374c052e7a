//! Trip counting component

use registry::Component;
use std::any::Any;

/// Metric name trip counts are stored under.
pub const TRIP_COUNT_METRIC: &str = "trip_count";

/// Counts how many times a region was entered.
///
/// Every completed start/stop pair records one trip to the storage backend
/// under the label it was started with.
#[derive(Debug, Default)]
pub struct TripCount {
    count: u64,
    pending: Option<(String, bool)>,
}

impl TripCount {
    /// Number of times the region has been entered.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Component for TripCount {
    fn start(&mut self, prefix: &str, flat: bool) {
        self.count += 1;
        self.pending = Some((prefix.to_string(), flat));
    }

    fn stop(&mut self) {
        let Some((label, flat)) = self.pending.take() else {
            return;
        };
        storage::Storage::instance().record(storage::Record::new(
            label,
            TRIP_COUNT_METRIC,
            1.0,
            flat,
        ));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
