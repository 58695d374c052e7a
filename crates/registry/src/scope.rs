//! Registration scopes and the one-time storage init gate
//!
//! One process-wide scope exists per bundle kind, created lazily and never
//! torn down. The outer map lock is held only long enough to hand out the
//! per-kind mutex, so all registration work serializes per kind rather than
//! globally.

use crate::component::TypeIdSet;
use crate::opaque::Opaque;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once, OnceLock, PoisonError};

static SCOPES: OnceLock<Mutex<HashMap<TypeId, Arc<Mutex<ScopeState>>>>> = OnceLock::new();

static STORAGE_INIT: Once = Once::new();

/// Ordered handle sequence plus the identity hashes registered alongside.
///
/// Insertion order is start/stop order.
#[derive(Default, Clone)]
pub(crate) struct ScopeState {
    pub(crate) handles: Vec<Opaque>,
    pub(crate) typeids: TypeIdSet,
}

/// The process-wide scope shared by every bundle of kind `K`.
pub(crate) fn scope_for<K: 'static>() -> Arc<Mutex<ScopeState>> {
    let map = SCOPES.get_or_init(Default::default);
    let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(map.entry(TypeId::of::<K>()).or_default())
}

/// Initialize the storage backend exactly once per process.
///
/// Idempotent and safe under concurrent callers; every caller returns only
/// after initialization has completed.
pub(crate) fn init_storage_once() {
    STORAGE_INIT.call_once(|| {
        storage::Storage::instance().initialize();
    });
}

/// The shared registration algorithm, run against either scope.
///
/// Rejects the entire call, mutating nothing, when the handle is empty,
/// when any nonzero hash is already registered in `state`, or when the
/// accumulated hash sum is zero (the nothing-meaningful sentinel). On
/// acceptance the handle is initialized and appended. The caller holds
/// whatever lock the scope requires.
pub(crate) fn register(state: &mut ScopeState, mut handle: Opaque, typeids: &TypeIdSet) -> bool {
    if handle.is_empty() {
        return false;
    }

    let mut sum = 0u64;
    for &hash in typeids {
        if hash > 0 && state.typeids.contains(&hash) {
            return false;
        }
        sum = sum.wrapping_add(hash);
    }
    if sum == 0 {
        return false;
    }

    for &hash in typeids {
        if hash > 0 {
            state.typeids.insert(hash);
        }
    }

    init_storage_once();
    handle.init();
    state.handles.push(handle);
    true
}
