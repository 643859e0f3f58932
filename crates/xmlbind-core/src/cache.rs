//! Concurrent binding cache.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::{Bind, Binding, BindingError};

/// Bindings keyed by the type they describe.
///
/// Bindings are built outside the map's locks, so two callers resolving the
/// same type for the first time may both build one. Only the first insert is
/// kept and every caller gets that shared copy. Failed resolutions are not
/// cached.
#[derive(Debug, Default)]
pub struct BindingCache {
    bindings: DashMap<TypeId, Arc<Binding>>,
}

impl BindingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the binding for `T`, building and caching it on first use.
    pub fn resolve<T: Bind>(&self) -> Result<Arc<Binding>, BindingError> {
        let key = TypeId::of::<T>();
        if let Some(cached) = self.bindings.get(&key) {
            return Ok(Arc::clone(cached.value()));
        }

        let built = Arc::new(Binding::new(T::schema())?);
        let entry = self.bindings.entry(key).or_insert(built);
        debug!(
            type_name = entry.type_name(),
            root = entry.root(),
            fields = entry.fields().len(),
            "cached binding"
        );
        Ok(Arc::clone(entry.value()))
    }

    /// Whether a binding for `T` is cached.
    pub fn contains<T: Bind>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop all cached bindings.
    pub fn clear(&self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldReader, FieldSchema, FieldWriter, BindError, Schema};

    struct Point {
        x: i32,
    }

    impl Bind for Point {
        fn schema() -> Schema {
            Schema::new("Point", "point").field(FieldSchema::attribute::<i32>("x"))
        }

        fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError> {
            out.write("x", &self.x)
        }

        fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError> {
            Ok(Self { x: input.read("x")? })
        }
    }

    struct Empty;

    impl Bind for Empty {
        fn schema() -> Schema {
            Schema::new("Empty", "empty")
        }

        fn write_fields(&self, _out: &mut FieldWriter<'_>) -> Result<(), BindError> {
            Ok(())
        }

        fn read_fields(_input: &FieldReader<'_>) -> Result<Self, BindError> {
            Ok(Empty)
        }
    }

    #[test]
    fn test_resolve_caches() {
        let cache = BindingCache::new();
        assert!(!cache.contains::<Point>());

        let first = cache.resolve::<Point>().unwrap();
        let second = cache.resolve::<Point>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains::<Point>());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_resolution_not_cached() {
        let cache = BindingCache::new();
        assert!(matches!(
            cache.resolve::<Empty>(),
            Err(BindingError::NoFields { type_name: "Empty" })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = BindingCache::new();
        let bindings: Vec<Arc<Binding>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.resolve::<Point>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let cached = cache.resolve::<Point>().unwrap();
        assert!(bindings.iter().all(|b| Arc::ptr_eq(b, &cached)));
    }

    #[test]
    fn test_clear() {
        let cache = BindingCache::new();
        cache.resolve::<Point>().unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
