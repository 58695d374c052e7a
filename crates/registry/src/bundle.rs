//! User-facing bundle facade
//!
//! A [`Bundle`] snapshots the process-wide scope of its kind at
//! construction, accepts further instance-local insertions, and fans
//! `start`/`stop` out across every held handle in insertion order.

use crate::component::{Component, TypeIdSet};
use crate::factory;
use crate::opaque::Opaque;
use crate::scope::{register, scope_for, ScopeState};
use std::marker::PhantomData;
use std::sync::PoisonError;

/// The default bundle kind.
///
/// Bundle kinds are zero-sized marker types; every distinct marker gets its
/// own process-wide scope and mutex. Define an empty struct to carve out an
/// independent family of bundles.
pub struct Global;

/// A runtime-composable bundle of measurement components.
///
/// Default construction copies the *current* contents of the process-wide
/// scope for `K`: a snapshot, not a live view; later `configure` calls do
/// not retroactively appear in existing instances. Instance state is
/// unsynchronized: share a bundle across threads only with external
/// synchronization.
pub struct Bundle<K: 'static = Global> {
    flat: bool,
    prefix: String,
    scope: ScopeState,
    running: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: 'static> Bundle<K> {
    /// Register a component process-wide for every future bundle of kind `K`.
    ///
    /// Silent no-op when the handle is empty, when any hash in `typeids` is
    /// already registered for this kind, or when the hash sum is zero; a
    /// rejected call mutates nothing. Acceptance triggers the one-time
    /// storage initialization, runs the handle's `init`, and appends it.
    /// The whole check-then-insert sequence runs under the kind's mutex.
    pub fn configure(handle: Opaque, typeids: TypeIdSet) {
        let scope = scope_for::<K>();
        let mut state = scope.lock().unwrap_or_else(PoisonError::into_inner);
        if !register(&mut state, handle, &typeids) {
            tracing::debug!(
                target: "registry::scope",
                kind = std::any::type_name::<K>(),
                "process-wide registration dropped"
            );
        }
    }

    /// Register a default-constructible component type process-wide.
    pub fn configure_type<T: Component + Default>() {
        let (handle, typeids) = factory::opaque::<T>();
        Self::configure(handle, typeids);
    }

    /// Clear the process-wide scope for kind `K`.
    ///
    /// Already-constructed instances keep their private snapshots.
    pub fn reset() {
        let scope = scope_for::<K>();
        let mut state = scope.lock().unwrap_or_else(PoisonError::into_inner);
        state.handles.clear();
        state.typeids.clear();
    }

    /// Number of handles currently registered process-wide for kind `K`.
    pub fn configured_size() -> usize {
        let scope = scope_for::<K>();
        let state = scope.lock().unwrap_or_else(PoisonError::into_inner);
        state.handles.len()
    }

    /// Construct a bundle holding a snapshot of the process-wide scope.
    ///
    /// The snapshot is taken under the kind's mutex, so it never observes a
    /// half-applied `configure`.
    pub fn new() -> Self {
        let scope = scope_for::<K>();
        let state = scope.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            flat: false,
            prefix: String::new(),
            scope: state.clone(),
            running: false,
            _kind: PhantomData,
        }
    }

    /// Construct a bundle with a label and recording mode.
    pub fn with_prefix(prefix: impl Into<String>, flat: bool) -> Self {
        let mut bundle = Self::new();
        bundle.prefix = prefix.into();
        bundle.flat = flat;
        bundle
    }

    /// Register a component into this instance only.
    ///
    /// Same algorithm as [`configure`](Self::configure) but against this
    /// bundle's private identity set and handle sequence, under no lock.
    /// The process-wide identity set is deliberately not consulted, so a
    /// kind registered process-wide can still be inserted here.
    pub fn insert(&mut self, handle: Opaque, typeids: TypeIdSet) {
        if !register(&mut self.scope, handle, &typeids) {
            tracing::debug!(
                target: "registry::scope",
                kind = std::any::type_name::<K>(),
                "instance registration dropped"
            );
        }
    }

    /// Register a default-constructible component type into this instance.
    pub fn insert_type<T: Component + Default>(&mut self) {
        let (handle, typeids) = factory::opaque::<T>();
        self.insert(handle, typeids);
    }

    /// Begin recording on every held handle, front to back.
    ///
    /// Calling `start` on an already-running bundle is a caller-discipline
    /// violation; the facade does not detect it.
    pub fn start(&mut self) {
        self.running = true;
        tracing::trace!(
            target: "registry::bundle",
            prefix = %self.prefix,
            flat = self.flat,
            handles = self.scope.handles.len(),
            "bundle started"
        );
        for handle in &mut self.scope.handles {
            handle.start(&self.prefix, self.flat);
        }
    }

    /// End recording on every held handle, in the same front-to-back order.
    pub fn stop(&mut self) {
        for handle in &mut self.scope.handles {
            handle.stop();
        }
        self.running = false;
        tracing::trace!(
            target: "registry::bundle",
            prefix = %self.prefix,
            "bundle stopped"
        );
    }

    /// Stop if running, then drop all instance state.
    ///
    /// Independent of the process-wide scope.
    pub fn clear(&mut self) {
        if self.running {
            self.stop();
        }
        self.scope.typeids.clear();
        self.scope.handles.clear();
    }

    /// First held component of type `T`, if any.
    ///
    /// Linear scan in insertion order, gated on identity hash; a miss is
    /// `None`, never an error.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.scope
            .handles
            .iter()
            .find_map(|handle| handle.get::<T>())
    }

    /// Mutable access to the first held component of type `T`.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scope
            .handles
            .iter_mut()
            .find_map(|handle| handle.get_mut::<T>())
    }

    /// First held component whose identity hash equals `hash`.
    pub fn get_by_hash(&self, hash: u64) -> Option<&dyn Component> {
        self.scope
            .handles
            .iter()
            .find_map(|handle| handle.get_by_hash(hash))
    }

    /// Number of held handles.
    pub fn size(&self) -> usize {
        self.scope.handles.len()
    }

    /// Whether the bundle holds no handles.
    pub fn is_empty(&self) -> bool {
        self.scope.handles.is_empty()
    }

    /// Whether `start` has been called without a matching `stop`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The label measurements are recorded under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the recording label.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Whether flattened recording is selected.
    pub fn flat(&self) -> bool {
        self.flat
    }

    /// Select flattened or hierarchical recording.
    pub fn set_flat(&mut self, flat: bool) {
        self.flat = flat;
    }
}

impl<K: 'static> Default for Bundle<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: 'static> Clone for Bundle<K> {
    /// Deep-copies the handle sequence: every cloned handle owns a fresh
    /// component instance, so dropping either bundle never invalidates the
    /// other. The clone starts idle regardless of the original's state.
    fn clone(&self) -> Self {
        Self {
            flat: self.flat,
            prefix: self.prefix.clone(),
            scope: self.scope.clone(),
            running: false,
            _kind: PhantomData,
        }
    }
}

impl<K: 'static> std::fmt::Debug for Bundle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("kind", &std::any::type_name::<K>())
            .field("prefix", &self.prefix)
            .field("flat", &self.flat)
            .field("running", &self.running)
            .field("size", &self.scope.handles.len())
            .finish()
    }
}
