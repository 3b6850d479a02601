//! # Singleton Audit Analysis
//!
//! Finds dependency-injection registrations that share mutable state.
//!
//! ## Modules
//!
//! - **[`registration`]** - Recognizes registration calls and extracts scope
//!   and registered types
//! - **[`driver`]** - Per-call-site analysis, sequential and parallel
//! - **[`diagnostics`]** - Reported findings and the host's sink
//! - **[`config`]** - JSON-loadable analyzer configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_audit_analysis::prelude::*;
//! use singleton_audit_core::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let mut table = SymbolTable::new();
//! let registry = table.add_type(TypeSymbol::interface("Injection", "IDependencyRegistry"));
//! let scope = table.add_type(TypeSymbol::new("Injection", "ObjectScope", TypeKind::Enum));
//! let int = table.add_type(TypeSymbol::structure("System", "Int32"));
//! let counter = table.add_type(TypeSymbol::class("App", "Counter").sealed());
//! table.add_member(counter, MemberSymbol::field("count", int)).unwrap();
//!
//! let register = table
//!     .add_method(
//!         MethodSymbol::new(registry, "Register")
//!             .with_type_arguments([counter])
//!             .with_parameter("scope", scope),
//!     )
//!     .unwrap();
//! let site = CallSite::new(
//!     SourceLocation::new("Startup.cs", 10, 5),
//!     Some(register),
//!     vec![Argument::enum_member("Injection.ObjectScope", "Singleton")],
//! );
//!
//! let analyzer = SingletonAnalyzer::from_config(&table, &AnalyzerConfig::default()).unwrap();
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! analyzer.analyze(&[site], &mut diagnostics, &CancellationToken::new());
//! assert_eq!(diagnostics[0].id(), "SGL0001");
//! ```

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod registration;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AnalyzerConfig, AnalyzerConfigError};
    pub use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
    pub use crate::driver::{AnalysisSummary, SingletonAnalyzer, SiteOutcome, SINGLETON_INSPECTION_FLAGS};
    pub use crate::registration::{
        Argument, CallSite, ConstantValue, DependencyRegistration, ObjectScope, RegistrationApiConfig,
        RegistrationMapper, RegistrationShape, SourceLocation,
    };
}

// Re-export main types at crate root for convenience
pub use config::AnalyzerConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use driver::{AnalysisSummary, SingletonAnalyzer, SiteOutcome};
pub use registration::{CallSite, DependencyRegistration, ObjectScope, RegistrationMapper};
