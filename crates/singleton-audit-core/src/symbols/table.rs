//! Arena of type and method symbols

use super::{MethodId, MethodSymbol, MemberSymbol, TypeId, TypeKey, TypeKind, TypeSymbol};
use crate::error::SymbolError;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Read-only symbol graph handed to the analysis by the host
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    types: Vec<TypeSymbol>,
    methods: Vec<MethodSymbol>,
    /// Interned constructed types keyed by (definition, arguments)
    constructed: IndexMap<(TypeId, SmallVec<[TypeId; 2]>), TypeId>,
    /// Interned array types keyed by element type
    arrays: IndexMap<TypeId, TypeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn push_type(&mut self, symbol: TypeSymbol) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(symbol);
        id
    }

    fn require(&self, id: TypeId) -> Result<&TypeSymbol, SymbolError> {
        self.types.get(id.index()).ok_or(SymbolError::UnknownType(id))
    }

    /// Add a type definition
    pub fn add_type(&mut self, symbol: TypeSymbol) -> TypeId {
        self.push_type(symbol)
    }

    /// Add a type the host failed to bind
    pub fn add_error_type(&mut self, name: impl Into<String>) -> TypeId {
        self.push_type(TypeSymbol::new("", name, TypeKind::Error))
    }

    /// Declare the type parameter at `ordinal` of a generic definition
    pub fn add_type_parameter(
        &mut self,
        owner: TypeId,
        ordinal: usize,
        name: impl Into<String>,
    ) -> Result<TypeId, SymbolError> {
        let owner_symbol = self.require(owner)?;
        if ordinal >= owner_symbol.arity {
            return Err(SymbolError::OrdinalOutOfRange {
                name: owner_symbol.metadata_name(),
                ordinal,
            });
        }
        Ok(self.push_type(TypeSymbol::new("", name, TypeKind::TypeParameter { ordinal })))
    }

    /// Declare a member on a type definition
    pub fn add_member(&mut self, ty: TypeId, member: MemberSymbol) -> Result<(), SymbolError> {
        self.require(member.ty)?;
        let symbol = self.require(ty)?;
        if symbol.is_constructed() || symbol.kind == TypeKind::Array {
            return Err(SymbolError::ConstructedMember(self.display_name(ty)));
        }
        self.types[ty.index()].members.push(member);
        Ok(())
    }

    /// Set the base type of a definition after both have been declared
    pub fn set_base_type(&mut self, ty: TypeId, base: TypeId) -> Result<(), SymbolError> {
        self.require(base)?;
        self.require(ty)?;
        self.types[ty.index()].base_type = Some(base);
        Ok(())
    }

    /// Instantiate a generic definition, reusing an existing instantiation
    pub fn construct(
        &mut self,
        definition: TypeId,
        arguments: impl IntoIterator<Item = TypeId>,
    ) -> Result<TypeId, SymbolError> {
        let arguments: SmallVec<[TypeId; 2]> = arguments.into_iter().collect();
        for arg in &arguments {
            self.require(*arg)?;
        }
        let def = self.require(definition)?;
        if !def.is_generic_definition() {
            return Err(SymbolError::NotGenericDefinition(def.metadata_name()));
        }
        if def.arity != arguments.len() {
            return Err(SymbolError::ArityMismatch {
                name: def.metadata_name(),
                expected: def.arity,
                actual: arguments.len(),
            });
        }

        let intern_key = (definition, arguments);
        if let Some(existing) = self.constructed.get(&intern_key) {
            return Ok(*existing);
        }

        let mut symbol = TypeSymbol::new(def.namespace.clone(), def.name.clone(), def.kind).with_arity(def.arity);
        symbol.is_sealed = def.is_sealed;
        symbol.markers = def.markers.clone();
        symbol.original_definition = Some(definition);
        symbol.type_arguments = intern_key.1.clone();

        let id = self.push_type(symbol);
        self.constructed.insert(intern_key, id);
        Ok(id)
    }

    /// Array type with the given element type
    pub fn array_of(&mut self, element: TypeId) -> Result<TypeId, SymbolError> {
        self.require(element)?;
        if let Some(existing) = self.arrays.get(&element) {
            return Ok(*existing);
        }
        let mut symbol = TypeSymbol::new("", "", TypeKind::Array);
        symbol.type_arguments.push(element);
        let id = self.push_type(symbol);
        self.arrays.insert(element, id);
        Ok(id)
    }

    pub fn add_method(&mut self, method: MethodSymbol) -> Result<MethodId, SymbolError> {
        self.require(method.containing_type)?;
        for ty in method.type_arguments.iter().chain(method.parameters.iter().map(|p| &p.ty)) {
            self.require(*ty)?;
        }
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(method);
        Ok(id)
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeSymbol> {
        self.types.get(id.index())
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodSymbol> {
        self.methods.get(id.index())
    }

    /// The open definition of a constructed type, or the type itself
    pub fn definition_of(&self, id: TypeId) -> TypeId {
        self.get(id).and_then(|s| s.original_definition).unwrap_or(id)
    }

    /// Metadata name of the type's definition
    pub fn metadata_name(&self, id: TypeId) -> Option<String> {
        self.get(self.definition_of(id)).map(TypeSymbol::metadata_name)
    }

    /// Find a definition by metadata name
    pub fn find_definition(&self, metadata_name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_constructed() && !matches!(s.kind, TypeKind::Array | TypeKind::TypeParameter { .. }))
            .find(|(_, s)| s.metadata_name() == metadata_name)
            .map(|(index, _)| TypeId(index as u32))
    }

    /// Whether the type, or any type argument or element reachable from it,
    /// failed to bind
    pub fn contains_error(&self, id: TypeId) -> bool {
        match self.get(id) {
            None => true,
            Some(symbol) if symbol.kind == TypeKind::Error => true,
            Some(symbol) => symbol.type_arguments.iter().any(|arg| self.contains_error(*arg)),
        }
    }

    /// Identity of `id` with type parameters substituted from `env`
    pub fn key_of(&self, id: TypeId, env: &[TypeKey]) -> TypeKey {
        let Some(symbol) = self.get(id) else {
            return TypeKey::leaf(id);
        };
        match symbol.kind {
            TypeKind::TypeParameter { ordinal } => env.get(ordinal).cloned().unwrap_or_else(|| TypeKey::leaf(id)),
            _ => TypeKey {
                definition: self.definition_of(id),
                arguments: symbol.type_arguments.iter().map(|arg| self.key_of(*arg, env)).collect(),
            },
        }
    }

    /// Generic-argument-qualified name, e.g. `App.Cache<System.String>`
    pub fn display_name(&self, id: TypeId) -> String {
        self.display_key(&self.key_of(id, &[]))
    }

    pub fn display_key(&self, key: &TypeKey) -> String {
        let Some(symbol) = self.get(key.definition) else {
            return format!("<unknown type {}>", key.definition.index());
        };
        match symbol.kind {
            TypeKind::Array => {
                let element = key
                    .arguments
                    .first()
                    .map(|arg| self.display_key(arg))
                    .unwrap_or_else(|| "?".to_string());
                format!("{element}[]")
            }
            TypeKind::TypeParameter { .. } | TypeKind::Error => symbol.name.clone(),
            _ if key.arguments.is_empty() => symbol.metadata_name(),
            _ => {
                let base = if symbol.namespace.is_empty() {
                    symbol.name.clone()
                } else {
                    format!("{}.{}", symbol.namespace, symbol.name)
                };
                let args: Vec<String> = key.arguments.iter().map(|arg| self.display_key(arg)).collect();
                format!("{}<{}>", base, args.join(", "))
            }
        }
    }
}
