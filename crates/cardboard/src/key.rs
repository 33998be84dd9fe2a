//! Type identities and type-erased shared values.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a component type, capability, or context entry.
///
/// Equality and hashing use the [`TypeId`]; the type name is carried for
/// diagnostics and scope filtering. Keys may name concrete types or trait
/// objects such as `dyn Economy`.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Final path segment of the type name, e.g. `Shop` for `plugin::shop::Shop`.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Returns `true` when the type lives under the module path `scope`.
    ///
    /// An empty scope matches every type.
    #[must_use]
    pub fn in_scope(&self, scope: &str) -> bool {
        let name = self.name.strip_prefix("dyn ").unwrap_or(self.name);
        scope.is_empty() || name.starts_with(scope)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A shared value of a known [`TypeKey`], with its concrete type erased.
///
/// The payload is an `Arc<T>` where `T` may be unsized, so a handle can carry
/// either a concrete component or a trait-object view of one.
#[derive(Clone)]
pub struct Handle {
    key: TypeKey,
    value: Arc<dyn Any + Send + Sync>,
}

impl Handle {
    /// Wraps a shared value under the key of `T`.
    #[must_use]
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Key of the wrapped value.
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Recovers the shared value when `T` matches the handle's key.
    #[must_use]
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("key", &self.key).finish()
    }
}
