//! Canonical identity of a (possibly instantiated) type

use super::TypeId;

/// Definition plus fully-resolved type arguments.
///
/// Two symbols that denote the same instantiation produce equal keys, which is
/// what the inspection traversal records in its visited-set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub definition: TypeId,
    pub arguments: Vec<TypeKey>,
}

impl TypeKey {
    pub fn leaf(definition: TypeId) -> Self {
        Self {
            definition,
            arguments: Vec::new(),
        }
    }

    /// Nesting depth of type arguments; a non-generic type has depth 0
    pub fn depth(&self) -> usize {
        self.arguments.iter().map(|arg| arg.depth() + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        let leaf = TypeKey::leaf(TypeId(0));
        assert_eq!(leaf.depth(), 0);

        let nested = TypeKey {
            definition: TypeId(1),
            arguments: vec![
                leaf.clone(),
                TypeKey {
                    definition: TypeId(1),
                    arguments: vec![leaf],
                },
            ],
        };
        assert_eq!(nested.depth(), 2);
    }
}
