//! Serializable immutability policy

use super::registry::TypeArgumentRule;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_IMMUTABILITY_MARKER: &str = "Annotations.Objects.ImmutableAttribute";
pub const DEFAULT_AUDITED_MARKER: &str = "Annotations.Mutability.AuditedAttribute";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownImmutableType {
    /// Metadata name of the open definition
    pub name: String,
    #[serde(default)]
    pub rule: TypeArgumentRule,
}

impl KnownImmutableType {
    pub fn new(name: impl Into<String>, rule: TypeArgumentRule) -> Self {
        Self { name: name.into(), rule }
    }
}

/// Policy the Known-Immutable Registry and marker handling are built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmutabilityConfig {
    pub known_immutable_types: Vec<KnownImmutableType>,
    pub mutable_collections: Vec<String>,
    pub immutability_markers: Vec<String>,
    pub audited_markers: Vec<String>,
}

impl Default for ImmutabilityConfig {
    fn default() -> Self {
        Self {
            known_immutable_types: Self::default_known_immutable_types(),
            mutable_collections: Self::default_mutable_collections(),
            immutability_markers: vec![DEFAULT_IMMUTABILITY_MARKER.to_string()],
            audited_markers: vec![DEFAULT_AUDITED_MARKER.to_string()],
        }
    }
}

impl ImmutabilityConfig {
    pub fn default_known_immutable_types() -> Vec<KnownImmutableType> {
        use TypeArgumentRule::{RequireImmutableArguments, Unconditional};

        const UNCONDITIONAL: &[&str] = &[
            "System.Boolean",
            "System.Byte",
            "System.SByte",
            "System.Char",
            "System.Int16",
            "System.UInt16",
            "System.Int32",
            "System.UInt32",
            "System.Int64",
            "System.UInt64",
            "System.IntPtr",
            "System.UIntPtr",
            "System.Single",
            "System.Double",
            "System.Decimal",
            "System.String",
            "System.Guid",
            "System.DateTime",
            "System.DateTimeOffset",
            "System.TimeSpan",
            "System.Uri",
            "System.Type",
            "System.Version",
            "System.Text.RegularExpressions.Regex",
            "System.Globalization.CultureInfo",
            "System.Text.Encoding",
        ];
        const REQUIRE_ARGUMENTS: &[&str] = &[
            "System.Nullable`1",
            "System.Lazy`1",
            "System.Tuple`2",
            "System.ValueTuple`2",
            "System.Collections.Generic.KeyValuePair`2",
            "System.Collections.Generic.IEnumerable`1",
            "System.Collections.Generic.IReadOnlyCollection`1",
            "System.Collections.Generic.IReadOnlyList`1",
            "System.Collections.Generic.IReadOnlyDictionary`2",
            "System.Collections.Immutable.ImmutableArray`1",
            "System.Collections.Immutable.ImmutableList`1",
            "System.Collections.Immutable.ImmutableHashSet`1",
            "System.Collections.Immutable.ImmutableDictionary`2",
        ];

        UNCONDITIONAL
            .iter()
            .map(|name| KnownImmutableType::new(*name, Unconditional))
            .chain(
                REQUIRE_ARGUMENTS
                    .iter()
                    .map(|name| KnownImmutableType::new(*name, RequireImmutableArguments)),
            )
            .collect()
    }

    pub fn default_mutable_collections() -> Vec<String> {
        [
            "System.Collections.ArrayList",
            "System.Collections.Hashtable",
            "System.Collections.Generic.List`1",
            "System.Collections.Generic.Dictionary`2",
            "System.Collections.Generic.HashSet`1",
            "System.Collections.Generic.SortedDictionary`2",
            "System.Collections.Generic.SortedList`2",
            "System.Collections.Generic.SortedSet`1",
            "System.Collections.Generic.LinkedList`1",
            "System.Collections.Generic.Queue`1",
            "System.Collections.Generic.Stack`1",
            "System.Collections.Generic.ICollection`1",
            "System.Collections.Generic.IList`1",
            "System.Collections.Generic.IDictionary`2",
            "System.Collections.Generic.ISet`1",
            "System.Collections.Concurrent.ConcurrentDictionary`2",
            "System.Collections.Concurrent.ConcurrentQueue`1",
            "System.Collections.Concurrent.ConcurrentBag`1",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect()
    }

    /// An empty policy: nothing is known-immutable, nothing is a collection
    pub fn empty() -> Self {
        Self {
            known_immutable_types: Vec::new(),
            mutable_collections: Vec::new(),
            immutability_markers: Vec::new(),
            audited_markers: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.known_immutable_types {
            validate_type_name(&entry.name)?;
            if entry.rule == TypeArgumentRule::RequireImmutableArguments && generic_arity(&entry.name).is_none() {
                return Err(ConfigError::RuleRequiresGeneric(entry.name.clone()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicateEntry(entry.name.clone()));
            }
        }

        let mut collections = HashSet::new();
        for name in &self.mutable_collections {
            validate_type_name(name)?;
            if seen.contains(name.as_str()) {
                return Err(ConfigError::ConflictingEntry(name.clone()));
            }
            if !collections.insert(name.as_str()) {
                return Err(ConfigError::DuplicateEntry(name.clone()));
            }
        }

        for marker in self.immutability_markers.iter().chain(&self.audited_markers) {
            validate_type_name(marker)?;
        }
        Ok(())
    }
}

/// Reject empty names and names containing whitespace
pub fn validate_type_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyTypeName);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ConfigError::MalformedTypeName(name.to_string()));
    }
    Ok(())
}

/// Arity encoded in a metadata name suffix, e.g. 2 for ``Dictionary`2``
fn generic_arity(name: &str) -> Option<usize> {
    let (_, arity) = name.rsplit_once('`')?;
    arity.parse().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ImmutabilityConfig::default().validate(), Ok(()));
        assert_eq!(ImmutabilityConfig::empty().validate(), Ok(()));
    }

    #[test]
    fn test_rule_requires_generic_name() {
        let mut config = ImmutabilityConfig::empty();
        config.known_immutable_types.push(KnownImmutableType::new(
            "App.Wrapper",
            TypeArgumentRule::RequireImmutableArguments,
        ));
        assert_eq!(
            config.validate(),
            Err(ConfigError::RuleRequiresGeneric("App.Wrapper".to_string()))
        );
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut config = ImmutabilityConfig::empty();
        config
            .known_immutable_types
            .push(KnownImmutableType::new("App.Money", TypeArgumentRule::Unconditional));
        config
            .known_immutable_types
            .push(KnownImmutableType::new("App.Money", TypeArgumentRule::Unconditional));
        assert_eq!(config.validate(), Err(ConfigError::DuplicateEntry("App.Money".to_string())));
    }

    #[test]
    fn test_conflicting_entries_are_rejected() {
        let mut config = ImmutabilityConfig::empty();
        config
            .known_immutable_types
            .push(KnownImmutableType::new("App.Bag`1", TypeArgumentRule::Unconditional));
        config.mutable_collections.push("App.Bag`1".to_string());
        assert_eq!(config.validate(), Err(ConfigError::ConflictingEntry("App.Bag`1".to_string())));
    }

    #[test]
    fn test_whitespace_in_names_is_rejected() {
        let mut config = ImmutabilityConfig::empty();
        config.immutability_markers.push("Bad Marker".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::MalformedTypeName(_))));
    }

    #[test]
    fn test_from_json_fills_missing_sections_with_defaults() {
        let config = ImmutabilityConfig::from_json(
            r#"{ "known_immutable_types": [ { "name": "App.Money" } ] }"#,
        )
        .unwrap();

        assert_eq!(config.known_immutable_types.len(), 1);
        assert_eq!(config.known_immutable_types[0].rule, TypeArgumentRule::Unconditional);
        assert_eq!(config.mutable_collections, ImmutabilityConfig::default_mutable_collections());
        assert_eq!(config.immutability_markers, vec![DEFAULT_IMMUTABILITY_MARKER.to_string()]);
    }

    #[test]
    fn test_generic_arity() {
        assert_eq!(generic_arity("System.Lazy`1"), Some(1));
        assert_eq!(generic_arity("System.String"), None);
        assert_eq!(generic_arity("Odd`0"), None);
    }
}
