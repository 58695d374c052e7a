//! Manufactures type-erased handles for concrete component types

use crate::component::{Component, TypeIdSet};
use crate::opaque::Opaque;
use hashing::type_hash;
use std::sync::Arc;

/// Build a handle and identity set for a default-constructible component.
pub fn opaque<T: Component + Default>() -> (Opaque, TypeIdSet) {
    opaque_with(T::default)
}

/// Build a handle and identity set using a caller-supplied constructor.
///
/// The constructor is retained inside the handle and re-invoked whenever
/// the handle is cloned, so it must be callable any number of times.
pub fn opaque_with<T, F>(make: F) -> (Opaque, TypeIdSet)
where
    T: Component,
    F: Fn() -> T + Send + Sync + 'static,
{
    let make: Arc<dyn Fn() -> Box<dyn Component> + Send + Sync> =
        Arc::new(move || Box::new(make()));
    let handle = Opaque::new(make(), Arc::clone(&make), type_hash::<T>());
    (handle, typeids::<T>())
}

/// Identity set for a component type.
pub fn typeids<T: Component>() -> TypeIdSet {
    TypeIdSet::from([type_hash::<T>()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Default)]
    struct Tick;

    impl Component for Tick {
        fn start(&mut self, _: &str, _: bool) {}
        fn stop(&mut self) {}
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_opaque_carries_type_hash() {
        let (handle, typeids) = opaque::<Tick>();
        assert!(!handle.is_empty());
        assert_eq!(handle.hash(), type_hash::<Tick>());
        assert!(typeids.contains(&type_hash::<Tick>()));
        assert_eq!(typeids.len(), 1);
    }

    #[test]
    fn test_opaque_with_custom_constructor() {
        struct Gauge {
            floor: f64,
        }

        impl Component for Gauge {
            fn start(&mut self, _: &str, _: bool) {}
            fn stop(&mut self) {}
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        let (handle, _) = opaque_with(|| Gauge { floor: 2.5 });
        assert_eq!(handle.get::<Gauge>().unwrap().floor, 2.5);

        // clones are built by the same constructor
        let copy = handle.clone();
        assert_eq!(copy.get::<Gauge>().unwrap().floor, 2.5);
    }
}
