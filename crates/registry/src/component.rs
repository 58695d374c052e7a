//! The capability seam between the registry and measurement components

use std::any::Any;
use std::collections::HashSet;

/// Set of identity hashes registered in a scope.
///
/// Order-irrelevant; used only for membership testing during registration.
/// A hash of zero is a placeholder and never counts as a registered kind.
pub type TypeIdSet = HashSet<u64>;

/// A single measurement component.
///
/// Implementors measure some resource (time, counters, memory) between
/// `start` and `stop` and report results into the external storage backend
/// themselves; the registry only drives the lifecycle. Control flows
/// strictly downward: a component never calls back into the registry.
pub trait Component: Any + Send {
    /// One-time setup, e.g. starting external measurement infrastructure.
    ///
    /// Invoked on every registration, so implementations must be idempotent.
    /// Defaults to a no-op.
    fn init(&mut self) {}

    /// Begin recording under the given label.
    ///
    /// `flat` selects flattened rather than hierarchical recording in the
    /// storage backend; the meaning of the flag is owned by that backend.
    /// The component tracks its own in-flight state between `start` and
    /// `stop`.
    fn start(&mut self, prefix: &str, flat: bool);

    /// End recording and report the measurement to storage.
    ///
    /// After this the component may be started again. Callers must not stop
    /// a component that has not been started; components are expected to
    /// tolerate it as a no-op.
    fn stop(&mut self);

    /// Upcast for hash-gated downcasts out of a type-erased handle.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
