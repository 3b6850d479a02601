//! Materialized symbol graph supplied by the host compiler
//!
//! The host walks its semantic model once and records every type, member and
//! method the analysis may reach into a [`SymbolTable`]. After that the table
//! is only read, so it can be shared freely across concurrent analyses.
//!
//! Generic types follow the usual compiler split:
//! - a *definition* (`List<T>`) owns the members, whose types may mention its
//!   type parameters
//! - a *constructed* type (`List<int>`) points back at its definition and
//!   carries the type arguments
//!
//! Arrays are interned per element type and keep the element as their single
//! type argument.

mod key;
mod table;

pub use key::TypeKey;
pub use table::SymbolTable;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable identity of a type inside a [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable identity of a method inside a [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId(pub(crate) u32);

impl MethodId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shape of a type symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    /// Element type is the single type argument
    Array,
    /// Type parameter at `ordinal` of its declaring generic definition
    TypeParameter { ordinal: usize },
    /// The host could not bind this type
    Error,
}

impl TypeKind {
    /// Whether the language closes this kind of type for extension
    pub fn is_sealed_by_default(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum | TypeKind::Delegate | TypeKind::Array)
    }
}

/// A type as declared in the analyzed program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    /// Number of type parameters declared by the definition
    pub arity: usize,
    pub is_sealed: bool,
    pub base_type: Option<TypeId>,
    /// Set for constructed generic types and arrays' element bookkeeping
    pub original_definition: Option<TypeId>,
    pub type_arguments: SmallVec<[TypeId; 2]>,
    pub members: Vec<MemberSymbol>,
    /// Fully-qualified names of attributes attached to the type
    pub markers: Vec<String>,
}

impl TypeSymbol {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            arity: 0,
            is_sealed: kind.is_sealed_by_default(),
            base_type: None,
            original_definition: None,
            type_arguments: SmallVec::new(),
            members: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Struct)
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn unsealed(mut self) -> Self {
        self.is_sealed = false;
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_member(mut self, member: MemberSymbol) -> Self {
        self.members.push(member);
        self
    }

    /// Metadata name of the definition, e.g. ``System.Collections.Generic.List`1``
    pub fn metadata_name(&self) -> String {
        let mut name = if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        };
        if self.arity > 0 {
            name.push('`');
            name.push_str(&self.arity.to_string());
        }
        name
    }

    pub fn is_constructed(&self) -> bool {
        self.original_definition.is_some()
    }

    pub fn is_generic_definition(&self) -> bool {
        self.arity > 0 && !self.is_constructed()
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

/// How a member stores state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    /// Property backed by a compiler-generated field
    AutoProperty,
    /// Property with explicit accessors and no backing storage of its own
    ComputedProperty,
}

/// Field or property declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSymbol {
    pub name: String,
    pub ty: TypeId,
    pub kind: MemberKind,
    pub is_static: bool,
    /// Read-only field, or auto-property without a setter (init-only counts)
    pub is_read_only: bool,
    pub markers: Vec<String>,
}

impl MemberSymbol {
    fn new(name: impl Into<String>, ty: TypeId, kind: MemberKind, is_read_only: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            is_static: false,
            is_read_only,
            markers: Vec::new(),
        }
    }

    /// Writable instance field
    pub fn field(name: impl Into<String>, ty: TypeId) -> Self {
        Self::new(name, ty, MemberKind::Field, false)
    }

    pub fn readonly_field(name: impl Into<String>, ty: TypeId) -> Self {
        Self::new(name, ty, MemberKind::Field, true)
    }

    pub fn auto_property(name: impl Into<String>, ty: TypeId, has_setter: bool) -> Self {
        Self::new(name, ty, MemberKind::AutoProperty, !has_setter)
    }

    pub fn computed_property(name: impl Into<String>, ty: TypeId) -> Self {
        Self::new(name, ty, MemberKind::ComputedProperty, true)
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeId,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A method as bound at a call site, with its type arguments substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub containing_type: TypeId,
    pub name: String,
    pub type_arguments: SmallVec<[TypeId; 2]>,
    pub parameters: Vec<ParameterSymbol>,
    /// Extension methods declare the receiver as their first parameter
    pub is_extension: bool,
}

impl MethodSymbol {
    pub fn new(containing_type: TypeId, name: impl Into<String>) -> Self {
        Self {
            containing_type,
            name: name.into(),
            type_arguments: SmallVec::new(),
            parameters: Vec::new(),
            is_extension: false,
        }
    }

    pub fn with_type_arguments(mut self, args: impl IntoIterator<Item = TypeId>) -> Self {
        self.type_arguments = args.into_iter().collect();
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.parameters.push(ParameterSymbol::new(name, ty));
        self
    }

    pub fn extension(mut self) -> Self {
        self.is_extension = true;
        self
    }

    /// Parameters that correspond to call-site arguments
    pub fn value_parameters(&self) -> &[ParameterSymbol] {
        if self.is_extension && !self.parameters.is_empty() {
            &self.parameters[1..]
        } else {
            &self.parameters
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_name_includes_arity() {
        let list = TypeSymbol::class("System.Collections.Generic", "List").with_arity(1);
        assert_eq!(list.metadata_name(), "System.Collections.Generic.List`1");

        let string = TypeSymbol::class("System", "String");
        assert_eq!(string.metadata_name(), "System.String");

        let global = TypeSymbol::class("", "Widget");
        assert_eq!(global.metadata_name(), "Widget");
    }

    #[test]
    fn test_value_types_are_sealed_by_default() {
        assert!(TypeSymbol::structure("System", "Int32").is_sealed);
        assert!(!TypeSymbol::class("App", "Service").is_sealed);
        assert!(!TypeSymbol::interface("App", "IService").is_sealed);
    }

    #[test]
    fn test_extension_receiver_is_not_a_value_parameter() {
        let registry = TypeId(0);
        let scope = TypeId(1);
        let method = MethodSymbol::new(registry, "Register")
            .with_parameter("registry", registry)
            .with_parameter("scope", scope)
            .extension();

        assert_eq!(method.value_parameters().len(), 1);
        assert_eq!(method.value_parameters()[0].name, "scope");
    }

    #[test]
    fn test_auto_property_read_only_follows_setter() {
        let ty = TypeId(0);
        assert!(MemberSymbol::auto_property("Name", ty, false).is_read_only);
        assert!(!MemberSymbol::auto_property("Name", ty, true).is_read_only);
    }
}
