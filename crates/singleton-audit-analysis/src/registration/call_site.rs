//! Call expressions as reported by the host semantic model

use serde::{Deserialize, Serialize};
use singleton_audit_core::{MethodId, TypeId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Compile-time value the host folded an argument to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstantValue {
    EnumMember { enum_type: String, member: String },
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
}

/// One argument at a call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    Constant(ConstantValue),
    /// `typeof(T)` operand
    TypeOf(TypeId),
    /// Lambda or method group; the return type when the host inferred one
    Lambda { return_type: Option<TypeId> },
    /// Any other expression, with its static type when bound
    Expression { ty: Option<TypeId> },
}

impl Argument {
    pub fn enum_member(enum_type: impl Into<String>, member: impl Into<String>) -> Self {
        Argument::Constant(ConstantValue::EnumMember {
            enum_type: enum_type.into(),
            member: member.into(),
        })
    }

    pub fn variable(ty: TypeId) -> Self {
        Argument::Expression { ty: Some(ty) }
    }

    /// Static type of the value the argument evaluates to
    pub fn value_type(&self) -> Option<TypeId> {
        match self {
            Argument::Expression { ty } => *ty,
            Argument::Constant(_) | Argument::TypeOf(_) | Argument::Lambda { .. } => None,
        }
    }
}

/// A call expression in the analyzed program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub location: SourceLocation,
    /// `None` when the invoked expression did not bind to a method
    pub method: Option<MethodId>,
    pub arguments: Vec<Argument>,
}

impl CallSite {
    pub fn new(location: SourceLocation, method: Option<MethodId>, arguments: Vec<Argument>) -> Self {
        Self {
            location,
            method,
            arguments,
        }
    }
}
