//! Structural immutability analysis
//!
//! This module decides whether state reachable from a type can change after
//! construction:
//! - Known-immutable registry and known mutable collection shapes
//! - Escape-hatch markers on types and members
//! - Inspection flags that relax or tighten the policy per call
//! - The recursive, cycle-safe inspection engine

mod config;
mod flags;
mod inspector;
mod registry;
mod result;

pub use config::{
    validate_type_name, ImmutabilityConfig, KnownImmutableType, DEFAULT_AUDITED_MARKER, DEFAULT_IMMUTABILITY_MARKER,
};
pub use flags::InspectionFlags;
pub use inspector::{MutabilityInspector, MAX_TYPE_ARGUMENT_DEPTH};
pub use registry::{ImmutabilityPolicy, KnownImmutableRegistry, MarkerPolicy, TypeArgumentRule};
pub use result::{MutabilityKind, MutabilityReason, MutabilityResult};
