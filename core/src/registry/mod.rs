//! Type declarations and named-reference resolution.
//!
//! Declarations are collected from every module of a batch with a
//! [`RegistryBuilder`]. Once built, the [`Registry`] is immutable and may be
//! shared across threads.

use crate::errors::BoundaryError;
use crate::{String, Vec, format};
use alloc::sync::Arc;
use boundary_types::{NamedRef, TypeArena, TypeId, TypeTerm, display_type, instantiate, named_refs};
use hashbrown::{HashMap, HashSet};


/// Identifies a type declaration by module and name, ignoring arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub module: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    fn of(named: &NamedRef) -> Self {
        Self::new(named.module.clone(), named.name.clone())
    }
}

/// A named type declared by a module.
///
/// `body` may use `Var(0) .. Var(params - 1)` for the declaration's type
/// parameters. A body that is itself a named reference is an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub module: String,
    pub name: String,
    pub params: u16,
    pub body: TypeId,
}

impl TypeDecl {
    pub fn new(module: impl Into<String>, name: impl Into<String>, body: TypeId) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            params: 0,
            body,
        }
    }

    pub fn with_params(mut self, params: u16) -> Self {
        self.params = params;
        self
    }

    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.module.clone(), self.name.clone())
    }
}

/// The outcome of resolving a named reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The declaration that was referenced.
    pub key: TypeKey,
    /// The instantiated body, with aliases followed.
    pub node: TypeId,
    /// The referenced declaration can reach itself through its body.
    pub recursive: bool,
    /// Every recursive occurrence passes the declaration's parameters
    /// through unchanged, so only finitely many instantiations exist.
    pub regular: bool,
}

/// Collects declarations before the registry is sealed.
#[derive(Debug)]
pub struct RegistryBuilder {
    arena: Arc<TypeArena>,
    decls: HashMap<TypeKey, TypeDecl>,
}

impl RegistryBuilder {
    pub fn new(arena: Arc<TypeArena>) -> Self {
        Self {
            arena,
            decls: HashMap::new(),
        }
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    /// Add a declaration. Declaring the same module and name twice is an
    /// error, even with an identical body.
    pub fn declare(&mut self, decl: TypeDecl) -> Result<&mut Self, BoundaryError> {
        let key = decl.key();
        if self.decls.contains_key(&key) {
            return Err(BoundaryError::DuplicateDeclaration {
                module: key.module,
                name: key.name,
            });
        }
        self.decls.insert(key, decl);
        Ok(self)
    }

    /// Seal the registry, computing which declarations are recursive.
    pub fn build(self) -> Registry {
        let edges: HashMap<TypeKey, Vec<TypeKey>> = self
            .decls
            .iter()
            .map(|(key, decl)| {
                let targets = named_refs(&self.arena, decl.body)
                    .into_iter()
                    .filter_map(|id| match &self.arena.get(id).term {
                        TypeTerm::NamedRef(named) => Some(TypeKey::of(named)),
                        _ => None,
                    })
                    .collect();
                (key.clone(), targets)
            })
            .collect();

        let recursive: HashSet<TypeKey> = self
            .decls
            .keys()
            .filter(|key| reaches(&edges, key, key))
            .cloned()
            .collect();

        // A recursive occurrence applied to anything but bare type
        // variables can grow its arguments without bound.
        let non_regular: HashSet<TypeKey> = recursive
            .iter()
            .filter(|key| {
                let Some(decl) = self.decls.get(*key) else {
                    return false;
                };
                named_refs(&self.arena, decl.body).into_iter().any(|id| {
                    let data = self.arena.get(id);
                    let TypeTerm::NamedRef(named) = &data.term else {
                        return false;
                    };
                    let target = TypeKey::of(named);
                    let same_cycle =
                        recursive.contains(&target) && reaches(&edges, &target, key);
                    same_cycle
                        && named
                            .args
                            .iter()
                            .any(|arg| !matches!(self.arena.get(*arg).term, TypeTerm::Var(_)))
                })
            })
            .cloned()
            .collect();

        tracing::debug!(
            declarations = self.decls.len(),
            recursive = recursive.len(),
            non_regular = non_regular.len(),
            "Built type registry"
        );

        Registry {
            arena: self.arena,
            decls: self.decls,
            recursive,
            non_regular,
        }
    }
}

/// True if `to` is reachable from `from` in at least one step.
fn reaches(edges: &HashMap<TypeKey, Vec<TypeKey>>, from: &TypeKey, to: &TypeKey) -> bool {
    let mut seen = HashSet::new();
    let mut stack: Vec<&TypeKey> = edges.get(from).map(|t| t.iter().collect()).unwrap_or_default();
    while let Some(key) = stack.pop() {
        if key == to {
            return true;
        }
        if seen.insert(key) {
            if let Some(next) = edges.get(key) {
                stack.extend(next.iter());
            }
        }
    }
    false
}

/// Immutable view of every type declared in a batch.
pub struct Registry {
    arena: Arc<TypeArena>,
    decls: HashMap<TypeKey, TypeDecl>,
    recursive: HashSet<TypeKey>,
    non_regular: HashSet<TypeKey>,
}

impl Registry {
    pub fn builder(arena: Arc<TypeArena>) -> RegistryBuilder {
        RegistryBuilder::new(arena)
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn arena_handle(&self) -> Arc<TypeArena> {
        Arc::clone(&self.arena)
    }

    pub fn declaration(&self, module: &str, name: &str) -> Option<&TypeDecl> {
        self.decls.get(&TypeKey::new(module, name))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn is_recursive(&self, key: &TypeKey) -> bool {
        self.recursive.contains(key)
    }

    /// Resolve the named reference `ty` to its instantiated body.
    ///
    /// Alias chains are followed to the first non-reference body. A chain
    /// that comes back to a declaration it already visited is cyclic.
    pub fn resolve(&self, ty: TypeId) -> Result<Resolution, BoundaryError> {
        let mut current = match &self.arena.get(ty).term {
            TypeTerm::NamedRef(named) => named.clone(),
            other => {
                return Err(BoundaryError::unsupported(
                    display_type(&self.arena, ty),
                    format!("expected a named type, found {}", other.shape_name()),
                ));
            }
        };

        let origin = TypeKey::of(&current);
        let mut visited: Vec<TypeKey> = Vec::new();

        loop {
            let key = TypeKey::of(&current);
            if visited.contains(&key) {
                return Err(BoundaryError::cyclic(
                    display_type(&self.arena, ty),
                    "type alias expands to itself",
                ));
            }

            let decl = self.decls.get(&key).ok_or_else(|| BoundaryError::Unresolved {
                module: key.module.clone(),
                name: key.name.clone(),
            })?;

            if current.args.len() != decl.params as usize {
                return Err(BoundaryError::unsupported(
                    format!("{}.{}", key.module, key.name),
                    format!(
                        "declared with {} type parameter(s), applied to {}",
                        decl.params,
                        current.args.len()
                    ),
                ));
            }

            let node = instantiate(&self.arena, decl.body, &current.args);
            visited.push(key);

            match &self.arena.get(node).term {
                TypeTerm::NamedRef(next) => current = next.clone(),
                _ => {
                    let recursive = self.recursive.contains(&origin);
                    let regular = !self.non_regular.contains(&origin);
                    tracing::trace!(
                        ty = %display_type(&self.arena, ty),
                        aliases = visited.len() - 1,
                        recursive,
                        "Resolved named type"
                    );
                    return Ok(Resolution {
                        key: origin,
                        node,
                        recursive,
                        regular,
                    });
                }
            }
        }
    }

    /// Names of every declaration, sorted, for reports.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .decls
            .keys()
            .map(|k| format!("{}.{}", k.module, k.name))
            .collect();
        names.sort();
        names
    }
}
