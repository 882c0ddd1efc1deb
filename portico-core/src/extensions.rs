//! Typed per-request extensions.
//!
//! Upstream filters attach values to a request by type (for example the
//! authenticated subject), and handlers read them back without string keys.
//!
//! ```rust
//! use portico_core::Extensions;
//!
//! let mut ext = Extensions::new();
//! ext.insert(42i32);
//! assert_eq!(ext.get::<i32>(), Some(&42));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Values keyed by their `TypeId`, one per type.
#[derive(Clone, Default)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.insert_arc(Arc::new(value));
    }

    /// Insert a value that is already shared.
    pub fn insert_arc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        self.map
            .insert(TypeId::of::<T>(), value as Arc<dyn Any + Send + Sync>);
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|arc| arc.downcast_ref::<T>())
    }

    /// Get a shared handle to the value, for use beyond the request borrow.
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|arc| arc.clone().downcast::<T>().ok())
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove the value of this type. Returns true if one was present.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> bool {
        self.map.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("count", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(&'static str);

    #[test]
    fn test_insert_replaces_same_type() {
        let mut ext = Extensions::new();
        ext.insert(Marker("first"));
        ext.insert(Marker("second"));

        assert_eq!(ext.len(), 1);
        assert_eq!(ext.get::<Marker>(), Some(&Marker("second")));
    }

    #[test]
    fn test_shared_value_round_trips_through_arc() {
        let mut ext = Extensions::new();
        let shared = Arc::new(Marker("shared"));
        ext.insert_arc(shared.clone());

        let back = ext.get_arc::<Marker>().unwrap();
        assert!(Arc::ptr_eq(&shared, &back));
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::new();
        ext.insert(7u8);

        assert!(ext.remove::<u8>());
        assert!(!ext.remove::<u8>());
        assert!(ext.is_empty());
    }
}
