//! Type-erased handle around one component instance

use crate::component::Component;
use hashing::type_hash;
use std::fmt;
use std::sync::Arc;

/// Constructor used to manufacture an independent sibling instance when a
/// handle is cloned.
pub type Constructor = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// A type-erased container for one concrete component instance.
///
/// A handle either wraps exactly one component (created through the
/// [`factory`](crate::factory)) or is empty; empty handles no-op on every
/// operation and are silently rejected by registration.
///
/// # Ownership
///
/// Each handle uniquely owns its instance and frees it on drop. `Clone`
/// does not share the instance: it manufactures a fresh one through the
/// stored constructor, so the clone starts idle and dropping either handle
/// can never invalidate the other.
pub struct Opaque {
    inner: Option<Inner>,
}

struct Inner {
    instance: Box<dyn Component>,
    make: Constructor,
    hash: u64,
}

impl Opaque {
    /// Create a handle owning `instance`.
    ///
    /// `make` must produce instances of the same concrete type; it backs
    /// `Clone`. `hash` is the identity hash of that type. Prefer the
    /// [`factory`](crate::factory) helpers, which derive both.
    pub fn new(instance: Box<dyn Component>, make: Constructor, hash: u64) -> Self {
        Self {
            inner: Some(Inner {
                instance,
                make,
                hash,
            }),
        }
    }

    /// Create an empty handle.
    ///
    /// Empty handles evaluate as absent everywhere: every operation is a
    /// no-op and registration silently ignores them.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Whether this handle wraps no instance.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Identity hash of the wrapped component's type, or zero when empty.
    pub fn hash(&self) -> u64 {
        self.inner.as_ref().map_or(0, |i| i.hash)
    }

    /// Whether the wrapped instance's identity hash equals `hash`.
    pub fn matches(&self, hash: u64) -> bool {
        self.inner.as_ref().is_some_and(|i| i.hash == hash)
    }

    /// Run the wrapped component's idempotent setup.
    pub fn init(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.instance.init();
        }
    }

    /// Begin recording on the wrapped component.
    pub fn start(&mut self, prefix: &str, flat: bool) {
        if let Some(inner) = &mut self.inner {
            inner.instance.start(prefix, flat);
        }
    }

    /// End recording on the wrapped component.
    pub fn stop(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.instance.stop();
        }
    }

    /// Access the wrapped instance as `T`.
    ///
    /// Returns `None` unless the stored identity hash matches `T`; absence
    /// is never an error.
    pub fn get<T: Component>(&self) -> Option<&T> {
        let inner = self.inner.as_ref()?;
        if inner.hash != type_hash::<T>() {
            return None;
        }
        inner.instance.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the wrapped instance as `T`.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let inner = self.inner.as_mut()?;
        if inner.hash != type_hash::<T>() {
            return None;
        }
        inner.instance.as_any_mut().downcast_mut::<T>()
    }

    /// Borrow the wrapped instance if its identity hash equals `hash`.
    pub fn get_by_hash(&self, hash: u64) -> Option<&dyn Component> {
        let inner = self.inner.as_ref()?;
        if inner.hash != hash {
            return None;
        }
        Some(inner.instance.as_ref())
    }
}

impl Clone for Opaque {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.as_ref().map(|inner| Inner {
                instance: (inner.make)(),
                make: Arc::clone(&inner.make),
                hash: inner.hash,
            }),
        }
    }
}

impl Default for Opaque {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("Opaque")
                .field("hash", &inner.hash)
                .finish_non_exhaustive(),
            None => f.write_str("Opaque::empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Default)]
    struct Probe {
        started: usize,
        stopped: usize,
        inits: usize,
        last_prefix: String,
        last_flat: bool,
    }

    impl Component for Probe {
        fn init(&mut self) {
            self.inits += 1;
        }

        fn start(&mut self, prefix: &str, flat: bool) {
            self.started += 1;
            self.last_prefix = prefix.to_string();
            self.last_flat = flat;
        }

        fn stop(&mut self) {
            self.stopped += 1;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn probe_handle() -> Opaque {
        Opaque::new(
            Box::<Probe>::default(),
            Arc::new(|| Box::<Probe>::default()),
            type_hash::<Probe>(),
        )
    }

    #[test]
    fn test_empty_handle_noops() {
        let mut handle = Opaque::empty();
        assert!(handle.is_empty());
        assert_eq!(handle.hash(), 0);

        handle.init();
        handle.start("region", false);
        handle.stop();
        assert!(handle.get::<Probe>().is_none());
    }

    #[test]
    fn test_start_stop_dispatch() {
        let mut handle = probe_handle();
        handle.start("region", true);
        handle.stop();

        let probe = handle.get::<Probe>().unwrap();
        assert_eq!(probe.started, 1);
        assert_eq!(probe.stopped, 1);
        assert_eq!(probe.last_prefix, "region");
        assert!(probe.last_flat);
    }

    #[test]
    fn test_get_requires_matching_hash() {
        struct Other;
        impl Component for Other {
            fn start(&mut self, _: &str, _: bool) {}
            fn stop(&mut self) {}
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        let handle = probe_handle();
        assert!(handle.get::<Probe>().is_some());
        assert!(handle.get::<Other>().is_none());
        assert!(handle.matches(type_hash::<Probe>()));
        assert!(!handle.matches(type_hash::<Other>()));
        assert!(handle.get_by_hash(type_hash::<Probe>()).is_some());
        assert!(handle.get_by_hash(type_hash::<Other>()).is_none());
    }

    #[test]
    fn test_clone_is_independent_instance() {
        let mut original = probe_handle();
        original.start("region", false);

        let mut copy = original.clone();
        assert_eq!(copy.get::<Probe>().unwrap().started, 0);

        copy.start("copy", false);
        copy.stop();
        drop(copy);

        // original still usable after the clone is gone
        original.stop();
        assert_eq!(original.get::<Probe>().unwrap().stopped, 1);
    }

    #[test]
    fn test_init_idempotent_dispatch() {
        let mut handle = probe_handle();
        handle.init();
        handle.init();
        assert_eq!(handle.get::<Probe>().unwrap().inits, 2);
    }
}
