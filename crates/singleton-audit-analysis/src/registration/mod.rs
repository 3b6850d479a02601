//! Dependency-registration mapping
//!
//! Recognizes calls into the container's registration API and turns each one
//! into a [`DependencyRegistration`]:
//! - **Call-site model**: what the host tells us about a call and its
//!   constant-folded arguments
//! - **Shapes**: the closed set of recognized registration signatures
//! - **Mapper**: API-surface matching plus shape evaluation

mod call_site;
mod mapper;
mod shapes;

pub use call_site::{Argument, CallSite, ConstantValue, SourceLocation};
pub use mapper::{RegistrationApiConfig, RegistrationMapper, REGISTRATION_METHOD_NAMES};
pub use shapes::RegistrationShape;

use serde::{Deserialize, Serialize};
use singleton_audit_core::TypeId;
use std::fmt;

/// Sharing policy the container applies to a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectScope {
    Singleton,
    Transient,
    PerRequest,
    Unknown,
}

impl fmt::Display for ObjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectScope::Singleton => "singleton",
            ObjectScope::Transient => "transient",
            ObjectScope::PerRequest => "per-request",
            ObjectScope::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// What one registration call registers, and with which scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRegistration {
    scope: ObjectScope,
    dependency_type: Option<TypeId>,
    concrete_type: Option<TypeId>,
    is_factory: bool,
}

impl DependencyRegistration {
    /// A singleton must name at least one type; `None` otherwise
    pub fn new(
        scope: ObjectScope,
        dependency_type: Option<TypeId>,
        concrete_type: Option<TypeId>,
        is_factory: bool,
    ) -> Option<Self> {
        if scope == ObjectScope::Singleton && dependency_type.is_none() && concrete_type.is_none() {
            return None;
        }
        Some(Self {
            scope,
            dependency_type,
            concrete_type,
            is_factory,
        })
    }

    pub fn scope(&self) -> ObjectScope {
        self.scope
    }

    pub fn dependency_type(&self) -> Option<TypeId> {
        self.dependency_type
    }

    pub fn concrete_type(&self) -> Option<TypeId> {
        self.concrete_type
    }

    pub fn is_factory(&self) -> bool {
        self.is_factory
    }

    /// Type whose structure decides whether the registration is safe.
    ///
    /// The concrete type wins unless the registration goes through a factory,
    /// whose product is only known by its dependency type.
    pub fn type_to_inspect(&self) -> Option<TypeId> {
        match self.concrete_type {
            Some(concrete) if !self.is_factory => Some(concrete),
            _ => self.dependency_type,
        }
    }
}
