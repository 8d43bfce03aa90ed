use super::Converter;
use boundary_types::TypeId;
use dashmap::DashMap;

/// Converters shared by every planner of a batch.
///
/// Entries are published once: the first converter stored for a type wins
/// and every later caller receives that same instance, so structurally
/// identical types share one converter across modules and threads.
#[derive(Debug, Default)]
pub struct ConverterCache {
    converters: DashMap<TypeId, Converter>,
    fixpoints: DashMap<TypeId, Converter>,
}

impl ConverterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ty: TypeId) -> Option<Converter> {
        self.converters.get(&ty).map(|entry| entry.value().clone())
    }

    /// Store `converter` unless another one was stored first. Returns the
    /// converter now in the cache.
    pub fn publish(&self, ty: TypeId, converter: Converter) -> Converter {
        self.converters.entry(ty).or_insert(converter).value().clone()
    }

    /// Body converter of a recursive type.
    pub fn fixpoint(&self, ty: TypeId) -> Option<Converter> {
        self.fixpoints.get(&ty).map(|entry| entry.value().clone())
    }

    pub fn publish_fixpoint(&self, ty: TypeId, body: Converter) -> Converter {
        self.fixpoints.entry(ty).or_insert(body).value().clone()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
