//! Closed set of recognized registration signatures

use super::call_site::{Argument, ConstantValue};
use super::mapper::RegistrationApiConfig;
use super::{DependencyRegistration, ObjectScope};
use singleton_audit_core::{MethodSymbol, SymbolTable, TypeId};

/// One recognized overload of the registration API.
///
/// Each variant fixes where the scope, dependency type and concrete type come
/// from; [`RegistrationShape::get_registration`] reads them off a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationShape {
    /// `Register<TDependency, TConcrete>(ObjectScope)`, `RegisterPlugin<TDependency, TConcrete>(ObjectScope)`
    GenericTypes,
    /// `Register<TConcrete>(ObjectScope)`
    SelfBound,
    /// `Register(Type dependency, Type concrete, ObjectScope)`
    TypeOfArguments,
    /// `Register<TDependency>(TDependency instance)`, `RegisterInstance<TDependency>(TDependency instance)`
    Instance,
    /// `RegisterFactory<TDependency, TFactory>(ObjectScope)`, `RegisterPluginFactory<TDependency, TFactory>(ObjectScope)`
    GenericFactory,
    /// `RegisterFactory<TDependency>(Func<..., TDependency>, ObjectScope)`
    LambdaFactory,
}

impl RegistrationShape {
    /// Match a registration method's signature to a known shape
    pub fn from_method(method: &MethodSymbol, table: &SymbolTable, config: &RegistrationApiConfig) -> Option<Self> {
        let params = method.value_parameters();
        let is_scope = |index: usize| {
            params
                .get(index)
                .and_then(|param| table.metadata_name(param.ty))
                .is_some_and(|name| name == config.object_scope_type)
        };
        let takes_dependency = || {
            matches!((params.first(), method.type_arguments.first()), (Some(param), Some(ty)) if param.ty == *ty)
        };

        match (method.name.as_str(), method.type_arguments.len(), params.len()) {
            ("Register" | "RegisterPlugin", 2, 1) if is_scope(0) => Some(Self::GenericTypes),
            ("Register", 1, 1) if is_scope(0) => Some(Self::SelfBound),
            ("Register" | "RegisterInstance", 1, 1) if takes_dependency() => Some(Self::Instance),
            ("Register", 0, 3) if is_scope(2) => Some(Self::TypeOfArguments),
            ("RegisterFactory" | "RegisterPluginFactory", 2, 1) if is_scope(0) => Some(Self::GenericFactory),
            ("RegisterFactory", 1, 2) if is_scope(1) => Some(Self::LambdaFactory),
            _ => None,
        }
    }

    /// Number of call-site arguments the shape reads
    pub fn argument_count(self) -> usize {
        match self {
            Self::GenericTypes | Self::SelfBound | Self::Instance | Self::GenericFactory => 1,
            Self::LambdaFactory => 2,
            Self::TypeOfArguments => 3,
        }
    }

    /// Evaluate the actual arguments of a call with this shape.
    ///
    /// Returns `None` when the arguments do not line up with the shape or the
    /// scope is not a recognized constant; the scope is never guessed.
    pub fn get_registration(
        self,
        method: &MethodSymbol,
        arguments: &[Argument],
        config: &RegistrationApiConfig,
    ) -> Option<DependencyRegistration> {
        if arguments.len() != self.argument_count() {
            return None;
        }
        let type_argument = |index: usize| method.type_arguments.get(index).copied();

        match self {
            Self::GenericTypes => {
                let scope = scope_of(&arguments[0], config)?;
                DependencyRegistration::new(scope, type_argument(0), type_argument(1), false)
            }
            Self::SelfBound => {
                let scope = scope_of(&arguments[0], config)?;
                DependencyRegistration::new(scope, type_argument(0), type_argument(0), false)
            }
            Self::TypeOfArguments => {
                let scope = scope_of(&arguments[2], config)?;
                DependencyRegistration::new(scope, type_of(&arguments[0]), type_of(&arguments[1]), false)
            }
            Self::Instance => DependencyRegistration::new(
                ObjectScope::Singleton,
                type_argument(0),
                arguments[0].value_type(),
                false,
            ),
            Self::GenericFactory => {
                let scope = scope_of(&arguments[0], config)?;
                DependencyRegistration::new(scope, type_argument(0), None, true)
            }
            Self::LambdaFactory => {
                let scope = scope_of(&arguments[1], config)?;
                let product = match &arguments[0] {
                    Argument::Lambda { return_type } => *return_type,
                    _ => None,
                };
                DependencyRegistration::new(scope, type_argument(0), product, true)
            }
        }
    }
}

/// Scope named by a constant member of the configured scope enum
fn scope_of(argument: &Argument, config: &RegistrationApiConfig) -> Option<ObjectScope> {
    let Argument::Constant(ConstantValue::EnumMember { enum_type, member }) = argument else {
        return None;
    };
    if *enum_type != config.object_scope_type {
        return None;
    }
    config
        .scope_members
        .get(member)
        .copied()
        .filter(|scope| *scope != ObjectScope::Unknown)
}

fn type_of(argument: &Argument) -> Option<TypeId> {
    match argument {
        Argument::TypeOf(ty) => Some(*ty),
        _ => None,
    }
}
