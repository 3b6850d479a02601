//! Diagnostics reported to the host

use crate::registration::SourceLocation;
use serde::{Deserialize, Serialize};
use singleton_audit_core::MutabilityReason;
use std::fmt;

/// What went wrong at a registration site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A singleton's type can be mutated after construction
    UnsafeSingletonField { type_name: String, reason: MutabilityReason },
    /// A singleton registration whose type could not be determined
    SingletonRegistrationTypeUnknown,
    /// A registration call whose scope or shape could not be determined
    RegistrationKindUnknown,
}

impl DiagnosticKind {
    /// Stable diagnostic identifier
    pub fn id(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsafeSingletonField { .. } => "SGL0001",
            DiagnosticKind::SingletonRegistrationTypeUnknown => "SGL0002",
            DiagnosticKind::RegistrationKindUnknown => "SGL0003",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: SourceLocation,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(location: SourceLocation, kind: DiagnosticKind) -> Self {
        Self { location, kind }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::UnsafeSingletonField { type_name, reason } => {
                format!("singleton `{type_name}` is not immutable: {reason}")
            }
            DiagnosticKind::SingletonRegistrationTypeUnknown => {
                "unable to determine the type registered as a singleton".to_string()
            }
            DiagnosticKind::RegistrationKindUnknown => {
                "unable to determine the scope of this registration; pass an ObjectScope member directly".to_string()
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.id(), self.message())
    }
}

/// Reporting collaborator supplied by the host
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
