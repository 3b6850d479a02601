//! Policy lists of types whose mutability is decided without inspection

use super::config::{ImmutabilityConfig, KnownImmutableType};
use crate::error::ConfigError;
use crate::symbols::{MemberSymbol, SymbolTable, TypeId, TypeKey, TypeKind, TypeSymbol};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// How the type arguments of a known-immutable generic type are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeArgumentRule {
    /// Immutable whatever the type arguments are
    #[default]
    Unconditional,
    /// Immutable only if every type argument is immutable
    RequireImmutableArguments,
}

/// Registry of known-immutable types and known mutable collection shapes.
///
/// Entries are keyed by the metadata name of the open definition, so
/// ``System.Collections.Generic.IReadOnlyList`1`` covers every instantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownImmutableRegistry {
    immutable: IndexMap<String, TypeArgumentRule>,
    /// Metadata name -> short collection name used in explanations
    mutable_collections: IndexMap<String, String>,
}

impl KnownImmutableRegistry {
    /// Registry holding the default policy
    pub fn new() -> Self {
        Self::build(&ImmutabilityConfig::default())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ImmutabilityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Registry of an already validated config
    fn build(config: &ImmutabilityConfig) -> Self {
        let mut registry = Self::empty();
        for KnownImmutableType { name, rule } in &config.known_immutable_types {
            registry.register(name.clone(), *rule);
        }
        for name in &config.mutable_collections {
            registry.register_mutable_collection(name.clone());
        }
        registry
    }

    pub fn register(&mut self, metadata_name: impl Into<String>, rule: TypeArgumentRule) {
        self.immutable.insert(metadata_name.into(), rule);
    }

    pub fn register_mutable_collection(&mut self, metadata_name: impl Into<String>) {
        let metadata_name = metadata_name.into();
        let short = collection_short_name(&metadata_name);
        self.mutable_collections.insert(metadata_name, short);
    }

    pub fn len(&self) -> usize {
        self.immutable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.immutable.is_empty()
    }

    pub fn rule_for_name(&self, metadata_name: &str) -> Option<TypeArgumentRule> {
        self.immutable.get(metadata_name).copied()
    }

    /// Rule registered for the definition of `ty`, if any
    pub fn rule_for(&self, table: &SymbolTable, ty: TypeId) -> Option<TypeArgumentRule> {
        let symbol = table.get(table.definition_of(ty))?;
        if !has_metadata_identity(symbol) {
            return None;
        }
        self.rule_for_name(&symbol.metadata_name())
    }

    /// Whether `ty` is immutable by policy alone.
    ///
    /// Type arguments of `RequireImmutableArguments` entries must themselves be
    /// known-immutable; no member inspection happens here. A `false` answer
    /// does not make the type mutable: the inspection engine still checks the
    /// arguments structurally.
    pub fn is_known_immutable(&self, table: &SymbolTable, ty: TypeId) -> bool {
        self.is_known_immutable_key(table, &table.key_of(ty, &[]))
    }

    /// [`Self::is_known_immutable`] for an instantiation with substituted arguments
    pub fn is_known_immutable_key(&self, table: &SymbolTable, key: &TypeKey) -> bool {
        match self.rule_for(table, key.definition) {
            None => false,
            Some(TypeArgumentRule::Unconditional) => true,
            Some(TypeArgumentRule::RequireImmutableArguments) => key
                .arguments
                .iter()
                .all(|arg| self.is_known_immutable_key(table, arg)),
        }
    }

    pub fn mutable_collection_name(&self, metadata_name: &str) -> Option<&str> {
        self.mutable_collections.get(metadata_name).map(String::as_str)
    }

    /// Short collection name when `ty` is a known mutable collection shape
    pub fn mutable_collection_kind(&self, table: &SymbolTable, ty: TypeId) -> Option<&str> {
        let symbol = table.get(table.definition_of(ty))?;
        if !has_metadata_identity(symbol) {
            return None;
        }
        self.mutable_collection_name(&symbol.metadata_name())
    }
}

fn has_metadata_identity(symbol: &TypeSymbol) -> bool {
    !matches!(
        symbol.kind,
        TypeKind::Array | TypeKind::TypeParameter { .. } | TypeKind::Error
    )
}

/// ``System.Collections.Generic.Dictionary`2`` -> `Dictionary`
fn collection_short_name(metadata_name: &str) -> String {
    let last = metadata_name.rsplit('.').next().unwrap_or(metadata_name);
    last.split('`').next().unwrap_or(last).to_string()
}

/// Attribute names that act as escape hatches
#[derive(Debug, Clone, Default)]
pub struct MarkerPolicy {
    immutability_markers: IndexSet<String>,
    audited_markers: IndexSet<String>,
}

impl MarkerPolicy {
    pub fn new(
        immutability_markers: impl IntoIterator<Item = String>,
        audited_markers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            immutability_markers: immutability_markers.into_iter().collect(),
            audited_markers: audited_markers.into_iter().collect(),
        }
    }

    /// Type declares itself immutable
    pub fn is_marked_immutable(&self, symbol: &TypeSymbol) -> bool {
        symbol.markers.iter().any(|m| self.immutability_markers.contains(m))
    }

    /// Member was reviewed and accepted despite being mutable
    pub fn is_audited(&self, member: &MemberSymbol) -> bool {
        member.markers.iter().any(|m| self.audited_markers.contains(m))
    }
}

/// Everything the inspection engine consults besides the symbol graph.
///
/// Built once per analysis run and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct ImmutabilityPolicy {
    pub registry: KnownImmutableRegistry,
    pub markers: MarkerPolicy,
}

impl ImmutabilityPolicy {
    pub fn from_config(config: &ImmutabilityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }
}

impl ImmutabilityPolicy {
    fn build(config: &ImmutabilityConfig) -> Self {
        Self {
            registry: KnownImmutableRegistry::build(config),
            markers: MarkerPolicy::new(
                config.immutability_markers.iter().cloned(),
                config.audited_markers.iter().cloned(),
            ),
        }
    }
}

impl Default for ImmutabilityPolicy {
    fn default() -> Self {
        Self::build(&ImmutabilityConfig::default())
    }
}
