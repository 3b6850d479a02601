//! Recursive structural mutability inspection
//!
//! The inspector walks a type, its base chain and the types of its read-only
//! members, collecting every cause of mutability it finds. Generic types are
//! inspected through their resolved type arguments: the traversal carries the
//! instantiation's argument keys as a substitution environment, so a field of
//! type `T` declared on `Box<T>` is inspected as `int` when reached through
//! `Box<int>`.
//!
//! Cycles are broken with a visited-set of [`TypeKey`]s local to one
//! top-level call. A type reached a second time contributes nothing: its
//! reasons (if any) were already collected by the first visit and flow into
//! the same root result. Instantiations that keep growing (`Node<T>` holding a
//! `Node<Node<T>>`) never repeat a key; once such a key nests deeper than
//! [`MAX_TYPE_ARGUMENT_DEPTH`] while a shallower instantiation of the same
//! definition is still on the current path, the edge is reported as
//! [`MutabilityKind::NestingLimit`] rather than followed.

use super::flags::InspectionFlags;
use super::registry::{ImmutabilityPolicy, TypeArgumentRule};
use super::result::{MutabilityKind, MutabilityReason, MutabilityResult};
use crate::symbols::{MemberKind, MemberSymbol, SymbolTable, TypeId, TypeKey, TypeKind, TypeSymbol};
use std::collections::HashSet;
use tracing::trace;

/// Deepest type-argument nesting a growing instantiation may reach
pub const MAX_TYPE_ARGUMENT_DEPTH: usize = 8;

/// State of one top-level inspection
struct Traversal {
    flags: InspectionFlags,
    visited: HashSet<TypeKey>,
    /// (definition, nesting depth) of every key on the current path
    path: Vec<(TypeId, usize)>,
}

impl Traversal {
    /// `definition` was already entered on this path with shallower arguments
    fn is_expanding(&self, definition: TypeId, depth: usize) -> bool {
        self.path.iter().any(|(def, d)| *def == definition && *d < depth)
    }
}

/// Classifies types of one symbol table under one policy.
///
/// Holds only shared references, so one inspector can serve any number of
/// concurrent callers; each call gets its own traversal state.
#[derive(Debug, Clone, Copy)]
pub struct MutabilityInspector<'a> {
    table: &'a SymbolTable,
    policy: &'a ImmutabilityPolicy,
}

impl<'a> MutabilityInspector<'a> {
    pub fn new(table: &'a SymbolTable, policy: &'a ImmutabilityPolicy) -> Self {
        Self { table, policy }
    }

    /// Decide whether any state reachable from `ty` can change after
    /// construction.
    ///
    /// Never fails. Callers that need to distinguish "could not resolve" from
    /// "mutable" check [`SymbolTable::contains_error`] on the root first.
    pub fn inspect_type(&self, ty: TypeId, flags: InspectionFlags) -> MutabilityResult {
        let mut traversal = Traversal {
            flags,
            visited: HashSet::new(),
            path: Vec::new(),
        };
        let key = self.table.key_of(ty, &[]);
        let result = self.inspect_key(&key, &mut traversal);
        trace!(
            type_name = %self.table.display_key(&key),
            visited = traversal.visited.len(),
            mutable = result.is_mutable(),
            "inspection finished"
        );
        result
    }

    fn inspect_key(&self, key: &TypeKey, traversal: &mut Traversal) -> MutabilityResult {
        let depth = key.depth();
        if depth > MAX_TYPE_ARGUMENT_DEPTH && traversal.is_expanding(key.definition, depth) {
            let type_name = self.table.display_key(key);
            trace!(type_name = %type_name, depth, "type argument nesting limit reached");
            return self.mutable(key, type_name, MutabilityKind::NestingLimit);
        }
        if !traversal.visited.insert(key.clone()) {
            return MutabilityResult::immutable();
        }

        traversal.path.push((key.definition, depth));
        let result = self.classify(key, traversal);
        traversal.path.pop();
        result
    }

    fn classify(&self, key: &TypeKey, traversal: &mut Traversal) -> MutabilityResult {
        let type_name = self.table.display_key(key);
        let Some(symbol) = self.table.get(key.definition) else {
            return self.mutable(key, type_name, MutabilityKind::Unresolved);
        };
        trace!(type_name = %type_name, kind = ?symbol.kind, "inspecting type");

        match symbol.kind {
            TypeKind::Error => return self.mutable(key, type_name, MutabilityKind::Unresolved),
            TypeKind::TypeParameter { .. } => {
                return self.mutable(key, type_name, MutabilityKind::OpenTypeParameter)
            }
            _ => {}
        }

        if self.policy.registry.rule_for(self.table, key.definition).is_some() {
            return self.inspect_known(key, traversal);
        }

        if symbol.kind == TypeKind::Enum {
            return MutabilityResult::immutable();
        }

        if traversal.flags.honors_immutability_markers() && self.policy.markers.is_marked_immutable(symbol) {
            trace!(type_name = %type_name, "trusting immutability marker");
            return MutabilityResult::immutable();
        }

        if let Some(reason) = self.shape_reason(key, symbol, &type_name) {
            return MutabilityResult::mutable(reason);
        }

        if symbol.kind == TypeKind::Delegate {
            return self.mutable(key, type_name, MutabilityKind::Delegate);
        }

        if !symbol.is_sealed && !traversal.flags.allows_unsealed() {
            return self.mutable(key, type_name, MutabilityKind::Unsealed);
        }

        self.inspect_members(key, symbol, traversal)
    }

    /// A registry-listed type: immutable when its arguments are known
    /// immutable, otherwise as immutable as its arguments are structurally
    fn inspect_known(&self, key: &TypeKey, traversal: &mut Traversal) -> MutabilityResult {
        if self.policy.registry.is_known_immutable_key(self.table, key) {
            return MutabilityResult::immutable();
        }
        match self.policy.registry.rule_for(self.table, key.definition) {
            Some(TypeArgumentRule::RequireImmutableArguments) => key
                .arguments
                .iter()
                .fold(MutabilityResult::immutable(), |acc, arg| {
                    acc.join(self.inspect_key(arg, traversal))
                }),
            _ => MutabilityResult::immutable(),
        }
    }

    /// Mutability that follows from what a type is, before looking at members
    fn shape_reason(&self, key: &TypeKey, symbol: &TypeSymbol, type_name: &str) -> Option<MutabilityReason> {
        if symbol.kind == TypeKind::Array {
            return Some(MutabilityReason::new(key.definition, type_name, MutabilityKind::Array));
        }
        let collection = self.policy.registry.mutable_collection_kind(self.table, key.definition)?;
        Some(MutabilityReason::new(key.definition, type_name, MutabilityKind::MutableCollection).with_detail(collection))
    }

    /// Instance members of the type and of every base type
    fn inspect_members(&self, key: &TypeKey, symbol: &TypeSymbol, traversal: &mut Traversal) -> MutabilityResult {
        let mut result = MutabilityResult::immutable();
        let mut seen_bases = HashSet::from([key.definition]);
        let mut level = Some((key.clone(), symbol));

        while let Some((level_key, level_symbol)) = level.take() {
            let owner_name = self.table.display_key(&level_key);
            for member in &level_symbol.members {
                result = result.join(self.inspect_member(&level_key, &owner_name, member, traversal));
            }

            let Some(base) = level_symbol.base_type else {
                break;
            };
            let base_key = self.table.key_of(base, &level_key.arguments);
            if !seen_bases.insert(base_key.definition) {
                break;
            }
            let base_name = self.table.display_key(&base_key);
            let base_symbol = match self.table.get(base_key.definition) {
                Some(base_symbol) if base_symbol.kind != TypeKind::Error => base_symbol,
                _ => {
                    result.push(MutabilityReason::new(base_key.definition, base_name, MutabilityKind::Unresolved));
                    break;
                }
            };
            if self.policy.registry.rule_for(self.table, base_key.definition).is_some() {
                result = result.join(self.inspect_known(&base_key, traversal));
                break;
            }
            if let Some(reason) = self.shape_reason(&base_key, base_symbol, &base_name) {
                result.push(reason);
                break;
            }
            level = Some((base_key, base_symbol));
        }

        result
    }

    fn inspect_member(
        &self,
        owner: &TypeKey,
        owner_name: &str,
        member: &MemberSymbol,
        traversal: &mut Traversal,
    ) -> MutabilityResult {
        if member.is_static || member.kind == MemberKind::ComputedProperty {
            return MutabilityResult::immutable();
        }
        if self.policy.markers.is_audited(member) {
            trace!(owner = owner_name, member = %member.name, "skipping audited member");
            return MutabilityResult::immutable();
        }

        if !member.is_read_only {
            let kind = match member.kind {
                MemberKind::Field => MutabilityKind::WritableField,
                _ => MutabilityKind::WritableProperty,
            };
            let reason = MutabilityReason::new(owner.definition, owner_name, kind).with_detail(member.name.as_str());
            return MutabilityResult::mutable(reason);
        }

        let member_key = self.table.key_of(member.ty, &owner.arguments);
        self.inspect_key(&member_key, traversal)
            .through_member(&member.name)
    }

    fn mutable(&self, key: &TypeKey, type_name: String, kind: MutabilityKind) -> MutabilityResult {
        MutabilityResult::mutable(MutabilityReason::new(key.definition, type_name, kind))
    }
}
