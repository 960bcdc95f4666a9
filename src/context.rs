//! Request scope: an immutable chain of typed service bindings.
//!
//! The root context is built once at startup and carries the long-lived
//! services (token service, store reader, config getter, scope). Every request
//! derives a child from it; middleware derive further children (e.g. the auth
//! middleware binds the validated claims). Deriving never touches the parent,
//! so sibling contexts are independent and the root can be shared by all
//! requests without locking.
//!
//! ```ignore
//! static GREETING: ServiceKey<Arc<String>> = ServiceKey::new("greeting");
//!
//! let root = Context::new();
//! let ctx = root.with_service(&GREETING, Arc::new("hello".to_string()));
//! assert_eq!(ctx.service(&GREETING)?.as_str(), "hello");
//! assert!(root.service(&GREETING).is_err());
//! ```
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("service not found in context: {key}")]
    ServiceNotFound { key: &'static str },
}

/// Typed key for a context binding.
///
/// Two keys address the same binding only if both the name and the value type
/// match, so a key can never hand back a value of the wrong type.
pub struct ServiceKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ServiceKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ServiceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.name).finish()
    }
}

struct Binding {
    name: &'static str,
    type_id: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Binding>>,
}

#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Binding>>,
}

impl Context {
    /// Empty root context.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Returns a child context that additionally binds `value` under `key`.
    ///
    /// `self` is left untouched; an existing binding for the same key is
    /// shadowed in the child only.
    #[must_use]
    pub fn with_service<T>(&self, key: &ServiceKey<T>, value: T) -> Context
    where
        T: Clone + Send + Sync + 'static,
    {
        Context {
            head: Some(Arc::new(Binding {
                name: key.name,
                type_id: TypeId::of::<T>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up the innermost binding for `key`.
    pub fn service<T>(&self, key: &ServiceKey<T>) -> Result<T, ContextError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let mut cursor = self.head.as_deref();

        while let Some(binding) = cursor {
            if binding.name == key.name
                && binding.type_id == type_id
                && let Some(value) = binding.value.downcast_ref::<T>()
            {
                return Ok(value.clone());
            }
            cursor = binding.parent.as_deref();
        }

        Err(ContextError::ServiceNotFound { key: key.name })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are opaque services; names are enough for diagnostics.
        let mut names = Vec::new();
        let mut cursor = self.head.as_deref();
        while let Some(binding) = cursor {
            names.push(binding.name);
            cursor = binding.parent.as_deref();
        }
        f.debug_struct("Context").field("bindings", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static NAME: ServiceKey<Arc<String>> = ServiceKey::new("name");
    static COUNT: ServiceKey<u32> = ServiceKey::new("count");

    #[test]
    fn lookup_on_empty_context_is_not_found() {
        let ctx = Context::new();
        assert_eq!(
            ctx.service(&NAME).unwrap_err(),
            ContextError::ServiceNotFound { key: "name" }
        );
    }

    #[test]
    fn child_binding_shadows_parent() {
        let a = Context::new().with_service(&NAME, Arc::new("a".to_string()));
        let b = a.with_service(&NAME, Arc::new("b".to_string()));

        assert_eq!(b.service(&NAME).unwrap().as_str(), "b");
        assert_eq!(a.service(&NAME).unwrap().as_str(), "a");
        assert_eq!(format!("{b:?}"), r#"Context { bindings: ["name", "name"] }"#);
    }

    #[test]
    fn siblings_do_not_see_each_other() {
        let root = Context::new().with_service(&COUNT, 1);
        let left = root.with_service(&NAME, Arc::new("left".to_string()));
        let right = root.with_service(&NAME, Arc::new("right".to_string()));

        assert_eq!(left.service(&NAME).unwrap().as_str(), "left");
        assert_eq!(right.service(&NAME).unwrap().as_str(), "right");
        assert_eq!(left.service(&COUNT).unwrap(), 1);
        assert_eq!(right.service(&COUNT).unwrap(), 1);
        assert!(root.service(&NAME).is_err());
    }

    #[test]
    fn same_name_different_type_is_a_different_key() {
        static OTHER: ServiceKey<u64> = ServiceKey::new("count");

        let ctx = Context::new().with_service(&COUNT, 7);
        assert!(ctx.service(&OTHER).is_err());
        assert_eq!(ctx.service(&COUNT).unwrap(), 7);
    }

    #[test]
    fn contexts_move_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
