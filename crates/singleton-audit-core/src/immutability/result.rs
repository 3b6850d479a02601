//! Structured explanation of why a type is (not) immutable

use crate::symbols::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a single mutability cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutabilityKind {
    Array,
    MutableCollection,
    Unsealed,
    WritableField,
    WritableProperty,
    Delegate,
    OpenTypeParameter,
    Unresolved,
    /// A generic instantiation that keeps growing along one path
    NestingLimit,
}

/// One contributing cause, attributed to the type it was found on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutabilityReason {
    pub ty: TypeId,
    /// Generic-argument-qualified name of `ty` as reached by the traversal
    pub type_name: String,
    pub kind: MutabilityKind,
    /// Member name for member causes, collection name for collection causes
    pub detail: Option<String>,
    /// Chain of read-only members leading from the inspected root to `ty`
    pub path: Vec<String>,
}

impl MutabilityReason {
    pub fn new(ty: TypeId, type_name: impl Into<String>, kind: MutabilityKind) -> Self {
        Self {
            ty,
            type_name: type_name.into(),
            kind,
            detail: None,
            path: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for MutabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "through `{}`, ", self.path.join("."))?;
        }
        let name = &self.type_name;
        let detail = self.detail.as_deref().unwrap_or("?");
        match self.kind {
            MutabilityKind::Array => write!(f, "`{name}` is an array"),
            MutabilityKind::MutableCollection => write!(f, "`{name}` is a mutable collection ({detail})"),
            MutabilityKind::Unsealed => write!(f, "`{name}` is not sealed"),
            MutabilityKind::WritableField => write!(f, "field `{detail}` of `{name}` is not read-only"),
            MutabilityKind::WritableProperty => write!(f, "property `{detail}` of `{name}` has a setter"),
            MutabilityKind::Delegate => write!(f, "`{name}` is a delegate"),
            MutabilityKind::OpenTypeParameter => write!(f, "type parameter `{name}` is not bound to a type argument"),
            MutabilityKind::Unresolved => write!(f, "`{name}` could not be resolved"),
            MutabilityKind::NestingLimit => write!(f, "`{name}` nests type arguments too deeply to inspect"),
        }
    }
}

/// Outcome of one top-level inspection.
///
/// A type is mutable exactly when at least one reason was found; the reasons
/// keep the order in which the traversal discovered them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutabilityResult {
    reasons: Vec<MutabilityReason>,
}

impl MutabilityResult {
    pub fn immutable() -> Self {
        Self::default()
    }

    pub fn mutable(reason: MutabilityReason) -> Self {
        Self { reasons: vec![reason] }
    }

    pub fn is_mutable(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[MutabilityReason] {
        &self.reasons
    }

    /// First cause found, used for user-facing messages
    pub fn primary_reason(&self) -> Option<&MutabilityReason> {
        self.reasons.first()
    }

    pub fn push(&mut self, reason: MutabilityReason) {
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }

    /// Union of both reason sequences, keeping `self`'s order first
    pub fn join(mut self, other: MutabilityResult) -> MutabilityResult {
        for reason in other.reasons {
            self.push(reason);
        }
        self
    }

    /// Attribute every reason to a path that starts at `member`
    pub fn through_member(mut self, member: &str) -> MutabilityResult {
        for reason in &mut self.reasons {
            reason.path.insert(0, member.to_string());
        }
        self
    }
}
