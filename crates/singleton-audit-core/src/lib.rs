//! # Singleton Audit Core
//!
//! Symbol model and structural mutability inspection for auditing
//! dependency-injection singletons.
//!
//! ## Modules
//!
//! - **[`symbols`]** - Read-only symbol graph materialized by the host compiler
//! - **[`immutability`]** - Known-immutable registry, inspection flags and the
//!   recursive inspection engine
//! - **[`error`]** - Symbol-table and configuration errors
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_audit_core::prelude::*;
//!
//! let mut table = SymbolTable::new();
//! let int = table.add_type(TypeSymbol::structure("System", "Int32"));
//! let counter = table.add_type(TypeSymbol::class("App", "Counter").sealed());
//! table.add_member(counter, MemberSymbol::field("count", int)).unwrap();
//!
//! let policy = ImmutabilityPolicy::default();
//! let result = MutabilityInspector::new(&table, &policy).inspect_type(counter, InspectionFlags::empty());
//! assert!(result.is_mutable());
//! ```

pub mod error;
pub mod immutability;
pub mod symbols;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{ConfigError, SymbolError};
    pub use crate::immutability::{
        ImmutabilityConfig, ImmutabilityPolicy, InspectionFlags, KnownImmutableRegistry, MutabilityInspector,
        MutabilityKind, MutabilityReason, MutabilityResult, TypeArgumentRule,
    };
    pub use crate::symbols::{
        MemberKind, MemberSymbol, MethodId, MethodSymbol, ParameterSymbol, SymbolTable, TypeId, TypeKey, TypeKind,
        TypeSymbol,
    };
}

// Re-export main types at crate root for convenience
pub use error::{ConfigError, SymbolError};
pub use immutability::{
    ImmutabilityConfig, ImmutabilityPolicy, InspectionFlags, KnownImmutableRegistry, MutabilityInspector,
    MutabilityKind, MutabilityReason, MutabilityResult,
};
pub use symbols::{MethodId, MethodSymbol, SymbolTable, TypeId, TypeKey, TypeKind, TypeSymbol};
