//! Registration API surface matching

use super::call_site::Argument;
use super::shapes::RegistrationShape;
use super::{DependencyRegistration, ObjectScope};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use singleton_audit_core::immutability::validate_type_name;
use singleton_audit_core::{ConfigError, MethodSymbol, SymbolTable};
use smallvec::SmallVec;
use tracing::debug;

/// Method names the container exposes for registering dependencies
pub const REGISTRATION_METHOD_NAMES: &[&str] = &[
    "Register",
    "RegisterInstance",
    "RegisterFactory",
    "RegisterPlugin",
    "RegisterPluginFactory",
];

/// Where the container's registration API lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationApiConfig {
    /// Metadata names of the registry interface and its extension classes
    pub registry_types: Vec<String>,
    /// Metadata name of the scope enum
    pub object_scope_type: String,
    /// Scope enum member name to the scope it selects
    pub scope_members: IndexMap<String, ObjectScope>,
}

impl Default for RegistrationApiConfig {
    fn default() -> Self {
        Self {
            registry_types: vec![
                "Injection.IDependencyRegistry".to_string(),
                "Injection.DependencyRegistryExtensions".to_string(),
            ],
            object_scope_type: "Injection.ObjectScope".to_string(),
            scope_members: IndexMap::from([
                ("Singleton".to_string(), ObjectScope::Singleton),
                ("AlwaysCreateNewInstance".to_string(), ObjectScope::Transient),
                ("Transient".to_string(), ObjectScope::Transient),
                ("WebRequest".to_string(), ObjectScope::PerRequest),
            ]),
        }
    }
}

impl RegistrationApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = SmallVec::<[&str; 2]>::new();
        for name in &self.registry_types {
            validate_type_name(name)?;
            if seen.contains(&name.as_str()) {
                return Err(ConfigError::DuplicateEntry(name.clone()));
            }
            seen.push(name);
        }
        validate_type_name(&self.object_scope_type)?;
        for member in self.scope_members.keys() {
            validate_type_name(member)?;
        }
        Ok(())
    }
}

/// Recognizes registration calls and maps them to [`DependencyRegistration`]s
#[derive(Debug, Clone)]
pub struct RegistrationMapper {
    config: RegistrationApiConfig,
}

impl RegistrationMapper {
    pub fn new(config: RegistrationApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegistrationApiConfig {
        &self.config
    }

    /// Declared on the registration API surface under a registration name
    pub fn is_registration_method(&self, method: &MethodSymbol, table: &SymbolTable) -> bool {
        if !REGISTRATION_METHOD_NAMES.contains(&method.name.as_str()) {
            return false;
        }
        table
            .metadata_name(method.containing_type)
            .is_some_and(|name| self.config.registry_types.iter().any(|t| *t == name))
    }

    /// Map one registration call.
    ///
    /// `None` means the call looks like a registration but its signature or
    /// arguments could not be understood.
    pub fn try_map_registration_method(
        &self,
        method: &MethodSymbol,
        arguments: &[Argument],
        table: &SymbolTable,
    ) -> Option<DependencyRegistration> {
        let Some(shape) = RegistrationShape::from_method(method, table, &self.config) else {
            debug!(
                method = %method.name,
                type_arguments = method.type_arguments.len(),
                parameters = method.value_parameters().len(),
                "unrecognized registration signature"
            );
            return None;
        };

        let registration = shape.get_registration(method, arguments, &self.config);
        if registration.is_none() {
            debug!(method = %method.name, ?shape, "registration arguments could not be evaluated");
        }
        registration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use singleton_audit_core::{TypeId, TypeKind, TypeSymbol};

    fn setup() -> (SymbolTable, TypeId, TypeId, TypeId, TypeId) {
        let mut table = SymbolTable::new();
        let registry = table.add_type(TypeSymbol::interface("Injection", "IDependencyRegistry"));
        let extensions = table.add_type(TypeSymbol::class("Injection", "DependencyRegistryExtensions").sealed());
        let scope = table.add_type(TypeSymbol::new("Injection", "ObjectScope", TypeKind::Enum));
        let cache = table.add_type(TypeSymbol::class("App", "Cache").sealed());
        (table, registry, extensions, scope, cache)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(RegistrationMapper::new(RegistrationApiConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = RegistrationApiConfig::default();
        config.registry_types.push("Injection.IDependencyRegistry".to_string());
        assert_eq!(
            RegistrationMapper::new(config).unwrap_err(),
            ConfigError::DuplicateEntry("Injection.IDependencyRegistry".to_string())
        );

        let config = RegistrationApiConfig {
            object_scope_type: String::new(),
            ..RegistrationApiConfig::default()
        };
        assert_eq!(RegistrationMapper::new(config).unwrap_err(), ConfigError::EmptyTypeName);
    }

    #[test]
    fn test_registration_method_requires_surface_and_name() {
        let (table, registry, _, scope, cache) = setup();
        let mapper = RegistrationMapper::new(RegistrationApiConfig::default()).unwrap();

        let register = MethodSymbol::new(registry, "Register")
            .with_type_arguments([cache])
            .with_parameter("scope", scope);
        let resolve = MethodSymbol::new(registry, "Resolve").with_type_arguments([cache]);
        let foreign = MethodSymbol::new(cache, "Register")
            .with_type_arguments([cache])
            .with_parameter("scope", scope);

        assert!(mapper.is_registration_method(&register, &table));
        assert!(!mapper.is_registration_method(&resolve, &table));
        assert!(!mapper.is_registration_method(&foreign, &table));
    }

    #[test]
    fn test_extension_method_receiver_is_ignored() {
        let (table, registry, extensions, scope, cache) = setup();
        let mapper = RegistrationMapper::new(RegistrationApiConfig::default()).unwrap();
        let method = MethodSymbol::new(extensions, "Register")
            .with_type_arguments([cache])
            .with_parameter("registry", registry)
            .with_parameter("scope", scope)
            .extension();

        assert!(mapper.is_registration_method(&method, &table));
        let registration = mapper
            .try_map_registration_method(
                &method,
                &[Argument::enum_member("Injection.ObjectScope", "AlwaysCreateNewInstance")],
                &table,
            )
            .unwrap();
        assert_eq!(registration.scope(), ObjectScope::Transient);
        assert_eq!(registration.concrete_type(), Some(cache));
    }

    #[test]
    fn test_unrecognized_signature_maps_to_nothing() {
        let (table, registry, _, scope, cache) = setup();
        let mapper = RegistrationMapper::new(RegistrationApiConfig::default()).unwrap();
        let method = MethodSymbol::new(registry, "RegisterPlugin")
            .with_type_arguments([cache])
            .with_parameter("scope", scope);

        assert!(mapper
            .try_map_registration_method(&method, &[Argument::enum_member("Injection.ObjectScope", "Singleton")], &table)
            .is_none());
    }

    #[test]
    fn test_custom_scope_members() {
        let (table, registry, _, scope, cache) = setup();
        let config = RegistrationApiConfig {
            scope_members: IndexMap::from([("Shared".to_string(), ObjectScope::Singleton)]),
            ..RegistrationApiConfig::default()
        };
        let mapper = RegistrationMapper::new(config).unwrap();
        let method = MethodSymbol::new(registry, "Register")
            .with_type_arguments([cache])
            .with_parameter("scope", scope);

        let shared = mapper.try_map_registration_method(
            &method,
            &[Argument::enum_member("Injection.ObjectScope", "Shared")],
            &table,
        );
        assert_eq!(shared.map(|r| r.scope()), Some(ObjectScope::Singleton));

        let singleton = mapper.try_map_registration_method(
            &method,
            &[Argument::enum_member("Injection.ObjectScope", "Singleton")],
            &table,
        );
        assert!(singleton.is_none());
    }
}
