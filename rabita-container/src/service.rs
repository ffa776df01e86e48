//! Traits implemented by objects stored in the container.
//!
//! [`Service`] is deliberately small: any `'static + Send + Sync` type
//! qualifies with an empty impl. The two provided methods are optional
//! capabilities the container probes for, defaulting to "not supported".

use std::any::Any;

use crate::container::Container;
use crate::value::Value;

/// An object that can be stored in, and resolved from, the container.
///
/// # Capabilities
///
/// - [`as_container_aware`](Service::as_container_aware): opt in to
///   receive the owning container right after construction, so the
///   instance can resolve its own dependencies later without the caller
///   wiring them explicitly.
/// - [`property`](Service::property): expose named fields to dotted alias
///   paths such as `"container.database.url"`.
///
/// # Examples
/// ```
/// use rabita_container::prelude::*;
///
/// struct Database {
///     url: String,
/// }
///
/// impl Service for Database {
///     fn property(&self, name: &str) -> Option<Value> {
///         match name {
///             "url" => Some(Value::from(self.url.as_str())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Service: Any + Send + Sync {
    /// The "receive a container" capability.
    ///
    /// Return `Some(self)` from a type that also implements
    /// [`ContainerAware`] and the builder will call
    /// [`ContainerAware::set_container`] with the owning container
    /// immediately after construction.
    fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
        None
    }

    /// Named-field access used by dotted alias paths.
    ///
    /// Returning `None` (the default) makes every path through this
    /// object fail with `NotFound`.
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Binding target for the "receive a container" capability.
///
/// `set_container` takes `&self` because the instance is already behind
/// an `Arc` when the hook fires; implementors keep the handle in a
/// write-once or otherwise interior-mutable slot.
pub trait ContainerAware: Send + Sync {
    fn set_container(&self, container: Container);
}
