//! Runtime-composable instrumentation bundle registry
//!
//! This crate lets an application assemble an arbitrary, heterogeneous set
//! of measurement components at run time, store them behind uniform
//! type-erased handles, and drive them as one bundle:
//!
//! - Register component types process-wide, once, typically at program
//!   start ([`Bundle::configure_type`]) or into a single bundle value ad
//!   hoc ([`Bundle::insert_type`])
//! - Deduplicate registrations by component identity hash
//! - Fan `start`/`stop` out across every held handle in insertion order
//! - Look held components back up by type ([`Bundle::get`])
//!
//! Components record their measurements into the external [`storage`]
//! backend themselves; the registry lazily initializes that backend exactly
//! once, before the first component is appended anywhere.
//!
//! # Example
//!
//! ```rust
//! use registry::{Bundle, Component};
//! # use std::any::Any;
//!
//! #[derive(Default)]
//! struct WallClock { /* ... */ }
//! # impl Component for WallClock {
//! #     fn start(&mut self, _: &str, _: bool) {}
//! #     fn stop(&mut self) {}
//! #     fn as_any(&self) -> &dyn Any { self }
//! #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! # }
//!
//! // One scope per bundle kind; markers are plain empty structs.
//! struct Profiling;
//!
//! Bundle::<Profiling>::configure_type::<WallClock>();
//!
//! let mut bundle = Bundle::<Profiling>::with_prefix("save_document", false);
//! bundle.start();
//! // ... region of interest ...
//! bundle.stop();
//!
//! assert!(bundle.get::<WallClock>().is_some());
//! ```
//!
//! # Modules
//!
//! - [`component`] - the `Component` trait seam and identity sets
//! - [`opaque`] - the type-erased handle
//! - [`factory`] - manufactures handles for concrete component types
//! - [`bundle`] - the user-facing bundle facade
//!
//! # Error handling
//!
//! By contract every failure path here is a silent no-op: empty handles,
//! duplicate registrations, and zero-sum registrations are dropped without
//! a status, and lookup misses are `None`. Dropped registrations emit
//! `tracing` debug events and are detectable through post-condition queries
//! (`size`, `get`).

pub mod bundle;
pub mod component;
pub mod factory;
pub mod opaque;
mod scope;

pub use bundle::{Bundle, Global};
pub use component::{Component, TypeIdSet};
pub use opaque::{Constructor, Opaque};

/// Re-export for convenience
pub use hashing::{type_hash, TYPEID_SEED};
