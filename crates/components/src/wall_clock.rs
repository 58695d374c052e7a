//! Wall-clock timing component

use registry::Component;
use std::any::Any;
use std::time::Instant;

/// Metric name wall-clock measurements are stored under.
pub const WALL_CLOCK_METRIC: &str = "wall_clock";

/// Measures elapsed wall time between `start` and `stop`.
///
/// Each completed lap is reported to the storage backend under the label
/// the bundle started it with, and accumulated locally so callers can read
/// totals back through [`Bundle::get`](registry::Bundle::get).
#[derive(Debug, Default)]
pub struct WallClock {
    in_flight: Option<Lap>,
    laps: usize,
    total_ms: f64,
    last_ms: f64,
}

#[derive(Debug)]
struct Lap {
    begin: Instant,
    label: String,
    flat: bool,
}

impl WallClock {
    /// Number of completed start/stop laps.
    pub fn laps(&self) -> usize {
        self.laps
    }

    /// Sum of all completed lap times in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Most recent completed lap time in milliseconds.
    pub fn last_ms(&self) -> f64 {
        self.last_ms
    }

    /// Whether a lap is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Component for WallClock {
    fn start(&mut self, prefix: &str, flat: bool) {
        self.in_flight = Some(Lap {
            begin: Instant::now(),
            label: prefix.to_string(),
            flat,
        });
    }

    fn stop(&mut self) {
        // stop without a matching start is tolerated as a no-op
        let Some(lap) = self.in_flight.take() else {
            return;
        };

        let elapsed_ms = lap.begin.elapsed().as_secs_f64() * 1000.0;
        self.laps += 1;
        self.total_ms += elapsed_ms;
        self.last_ms = elapsed_ms;

        tracing::trace!(
            target: "components::wall_clock",
            label = %lap.label,
            elapsed_ms = elapsed_ms,
            "lap completed"
        );

        storage::Storage::instance().record(storage::Record::new(
            lap.label,
            WALL_CLOCK_METRIC,
            elapsed_ms,
            lap.flat,
        ));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
