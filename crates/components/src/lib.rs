//! Measurement components for the bundle registry
//!
//! Concrete [`Component`](registry::Component) implementations that record
//! into the process-wide [`storage`] backend:
//!
//! - [`WallClock`] - elapsed wall time per start/stop lap
//! - [`TripCount`] - number of times a region was entered
//!
//! Register them process-wide or per bundle instance through the registry:
//!
//! ```rust
//! use components::WallClock;
//! use registry::Bundle;
//!
//! struct AppProfile;
//!
//! Bundle::<AppProfile>::configure_type::<WallClock>();
//!
//! let mut bundle = Bundle::<AppProfile>::with_prefix("startup", false);
//! bundle.start();
//! // ... region of interest ...
//! bundle.stop();
//! ```

mod trip_count;
mod wall_clock;

pub use trip_count::{TripCount, TRIP_COUNT_METRIC};
pub use wall_clock::{WallClock, WALL_CLOCK_METRIC};
