//! # The Container — heart of Rabita
//!
//! A named-service registry: callers register values under string names
//! and resolve them back with [`Container::get`]. Primitive entries are
//! returned as stored; object entries are constructed lazily on first
//! access by an [`ObjectBuilder`] and cached for the container's
//! lifetime (singleton-per-name).
//!
//! # Architecture
//! ```text
//! add_boolean / add_string / add_number
//! add_object / add_object_with_instance
//!        │ (validated by TypeValidator)
//!        ▼
//!    Container ──get(name)──> primitive: stored literal
//!        │                    object:    lazy build, then cached
//!        ▼
//!    ObjectBuilder ──resolves "container.*" args──> Container::get
//! ```
//!
//! # Examples
//! ```
//! use rabita_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Engine { power: f64 }
//! impl Service for Engine {}
//!
//! struct Car { engine: Arc<Engine> }
//! impl Service for Car {}
//!
//! # fn main() -> Result<()> {
//! let container = Container::new();
//! container.add_number("horsepower", 120.0)?;
//!
//! container.add_object("engine", |args| {
//!     let power = args[0].as_number().ok_or("horsepower must be a number")?;
//!     Ok(Arc::new(Engine { power }))
//! }, ObjectConfig::new().with_args(vec!["container.horsepower".into()]))?;
//!
//! container.add_object("car", |args| {
//!     let engine = args[0].downcast::<Engine>().ok_or("engine dependency missing")?;
//!     Ok(Arc::new(Car { engine }))
//! }, ObjectConfig::new().with_args(vec!["container.engine".into()]))?;
//!
//! let car = container.get("car")?.downcast::<Car>().unwrap();
//! assert_eq!(car.engine.power, 120.0);
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, trace, warn};

use rabita_support::rendering::suggest_similar;

use crate::builder::{BoxError, FactoryFn, ObjectBuilder};
use crate::error::{CyclicDependencyError, NotFoundError, RabitaError, Result};
use crate::service::Service;
use crate::validator::{ALIAS_SEPARATOR, CONTAINER_TOKEN, TypeValidator};
use crate::value::Value;

/// Hook invoked exactly once, right after an object entry is constructed
/// and cached, with the owning container and the new instance.
pub type PostConstructCallback = Arc<dyn Fn(&Container, &Arc<dyn Service>) + Send + Sync>;

// ============================================================
// ObjectConfig
// ============================================================

/// Configuration for [`Container::add_object`].
///
/// Unspecified options keep their defaults: no pre-built value, autoload
/// off, empty constructor-argument list, no callback.
///
/// # Examples
/// ```rust,ignore
/// container.add_object("database", db_factory, ObjectConfig::new()
///     .with_args(vec!["container.database_url".into(), "container.logger".into()])
///     .autoload(true)
///     .callback(|_, _| println!("database ready")))?;
/// ```
#[derive(Default)]
pub struct ObjectConfig {
    pub(crate) value: Option<Arc<dyn Service>>,
    pub(crate) autoload: bool,
    pub(crate) with: Vec<Value>,
    pub(crate) callback: Option<PostConstructCallback>,
}

impl ObjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies an already-resolved instance; the factory will never run
    /// for this entry.
    pub fn value(mut self, instance: Arc<dyn Service>) -> Self {
        self.value = Some(instance);
        self
    }

    /// Constructs the object at registration time instead of at first
    /// `get`.
    pub fn autoload(mut self, autoload: bool) -> Self {
        self.autoload = autoload;
        self
    }

    /// Ordered constructor arguments. String arguments that classify as
    /// aliases are resolved through the container at build time; all
    /// other values pass through as literals.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.with = args;
        self
    }

    /// Post-construction hook, invoked once with `(container, instance)`
    /// after the value is cached.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Container, &Arc<dyn Service>) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// The configured constructor-argument list.
    pub fn constructor_args(&self) -> &[Value] {
        &self.with
    }
}

impl fmt::Debug for ObjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectConfig")
            .field("value", &self.value.is_some())
            .field("autoload", &self.autoload)
            .field("args", &self.with.len())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

// ============================================================
// Registry entries
// ============================================================

enum Entry {
    Boolean(bool),
    Number(f64),
    String(String),
    Object(ObjectEntry),
}

struct ObjectEntry {
    value: Option<Arc<dyn Service>>,
    factory: Option<FactoryFn>,
    with: Vec<Value>,
    callback: Option<PostConstructCallback>,
    autoload: bool,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Entry::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Entry::String(value) => f.debug_tuple("String").field(value).finish(),
            Entry::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

impl fmt::Debug for ObjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("resolved", &self.value.is_some())
            .field("autoload", &self.autoload)
            .field("args", &self.with.len())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Snapshot taken under the registry lock, so no lock is held while
/// factories, callbacks or recursive `get` calls run.
enum Lookup {
    Ready(Value),
    Build {
        with: Vec<Value>,
        factory: Option<FactoryFn>,
        callback: Option<PostConstructCallback>,
    },
    Missing,
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// The named-service registry.
///
/// `Container` is a cheap handle: cloning shares the same registry, which
/// is what lets constructed objects hold the container that built them.
/// Resolution is synchronous and assumes a single logical owner; internal
/// locks are short-lived and never held across user code.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    validator: TypeValidator,
    entries: Mutex<HashMap<String, Entry>>,
    /// Names currently being constructed, outermost first. A name
    /// reappearing here means the dependency graph has a cycle.
    resolving: Mutex<Vec<String>>,
}

impl Container {
    /// Creates an empty container with the default validator.
    pub fn new() -> Self {
        Self::with_validator(TypeValidator::new())
    }

    /// Creates an empty container with an explicit validator collaborator.
    pub fn with_validator(validator: TypeValidator) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                validator,
                entries: Mutex::new(HashMap::new()),
                resolving: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns true if both handles share the same registry.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns true if an entry with that name exists, or the name is an
    /// alias token — the container always "has" itself.
    pub fn has(&self, name: &str) -> bool {
        self.inner.entries.lock().contains_key(name) || self.inner.validator.is_alias(name)
    }

    /// Registered entry names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }

    // ── Resolution ──

    /// Resolves an entry by name or alias.
    ///
    /// The self-reference token yields the container itself. Primitive
    /// entries return their stored literal on every call. An object entry
    /// without a value is constructed first: a fresh [`ObjectBuilder`] is
    /// wired with this container, the validator, the entry's constructor
    /// arguments and its factory; the result is cached and the entry's
    /// callback (if any) fires exactly once. Dotted aliases walk from the
    /// named entry into object properties.
    ///
    /// Fails with `NotFound` for unknown names or missing path segments,
    /// and with `CyclicDependency` when a name reappears on the active
    /// resolution stack.
    #[instrument(skip(self), name = "container_get")]
    pub fn get(&self, name: &str) -> Result<Value> {
        if name == CONTAINER_TOKEN {
            return Ok(Value::Container(self.clone()));
        }

        let lookup = {
            let entries = self.inner.entries.lock();
            match entries.get(name) {
                Some(Entry::Boolean(value)) => Lookup::Ready(Value::Boolean(*value)),
                Some(Entry::Number(value)) => Lookup::Ready(Value::Number(*value)),
                Some(Entry::String(value)) => Lookup::Ready(Value::String(value.clone())),
                Some(Entry::Object(object)) => match &object.value {
                    Some(instance) => Lookup::Ready(Value::Object(Arc::clone(instance))),
                    None => Lookup::Build {
                        with: object.with.clone(),
                        factory: object.factory.clone(),
                        callback: object.callback.clone(),
                    },
                },
                None => Lookup::Missing,
            }
        };

        match lookup {
            Lookup::Ready(value) => {
                trace!(name, "entry resolved");
                Ok(value)
            }
            Lookup::Build {
                with,
                factory,
                callback,
            } => self.construct(name, with, factory, callback),
            Lookup::Missing if self.inner.validator.is_alias(name) => self.get_by_alias(name),
            Lookup::Missing => Err(RabitaError::NotFound(NotFoundError {
                requested: name.to_owned(),
                segment: None,
                suggestions: self.find_suggestions(name),
            })),
        }
    }

    // ── Registration ──

    /// Adds a boolean entry.
    pub fn add_boolean(&self, name: &str, value: bool) -> Result<()> {
        self.inner.validator.validate_name(name)?;
        let value = self.inner.validator.validate_boolean(value)?;
        self.insert(name, Entry::Boolean(value));
        Ok(())
    }

    /// Adds a string entry.
    pub fn add_string(&self, name: &str, value: impl Into<String>) -> Result<()> {
        self.inner.validator.validate_name(name)?;
        let value = value.into();
        self.inner.validator.validate_string(&value)?;
        self.insert(name, Entry::String(value));
        Ok(())
    }

    /// Adds a number entry. Fails with `InvalidArgument` for non-finite
    /// values.
    pub fn add_number(&self, name: &str, value: f64) -> Result<()> {
        self.inner.validator.validate_name(name)?;
        let value = self.inner.validator.validate_number(value)?;
        self.insert(name, Entry::Number(value));
        Ok(())
    }

    /// Adds an object entry with its construction factory.
    ///
    /// Name validation runs first, then config validation; a rejected
    /// registration leaves the registry untouched. With
    /// [`ObjectConfig::autoload`] the entry is constructed synchronously
    /// before this call returns, by the same sequence `get` uses.
    pub fn add_object<F>(&self, name: &str, factory: F, config: ObjectConfig) -> Result<()>
    where
        F: Fn(&[Value]) -> std::result::Result<Arc<dyn Service>, BoxError> + Send + Sync + 'static,
    {
        self.inner.validator.validate_name(name)?;
        let config = self.inner.validator.validate_object_config(config)?;
        let autoload = config.autoload;

        self.insert(
            name,
            Entry::Object(ObjectEntry {
                value: config.value,
                factory: Some(Arc::new(factory)),
                with: config.with,
                callback: config.callback,
                autoload,
            }),
        );

        if autoload {
            debug!(name, "autoloading object entry");
            self.get(name)?;
        }
        Ok(())
    }

    /// Adds an already-resolved object entry, bypassing construction
    /// entirely.
    pub fn add_object_with_instance(
        &self,
        name: &str,
        instance: Arc<dyn Service>,
    ) -> Result<()> {
        self.inner.validator.validate_name(name)?;
        self.insert(
            name,
            Entry::Object(ObjectEntry {
                value: Some(instance),
                factory: None,
                with: Vec::new(),
                callback: None,
                autoload: false,
            }),
        );
        Ok(())
    }

    // ── Internal ──

    fn insert(&self, name: &str, entry: Entry) {
        debug!(name, entry = ?entry, "storing entry");
        let mut entries = self.inner.entries.lock();
        if entries.insert(name.to_owned(), entry).is_some() {
            debug!(name, "previous entry overwritten");
        }
    }

    /// Lazy construction of an object entry: cycle check, build through a
    /// fresh builder, cache, then fire the callback.
    fn construct(
        &self,
        name: &str,
        with: Vec<Value>,
        factory: Option<FactoryFn>,
        callback: Option<PostConstructCallback>,
    ) -> Result<Value> {
        let factory = factory.ok_or_else(|| RabitaError::ConstructionFailure {
            name: name.to_owned(),
            source: "no factory registered for this entry".into(),
        })?;

        {
            let resolving = self.inner.resolving.lock();
            if resolving.iter().any(|active| active == name) {
                let mut chain = resolving.clone();
                chain.push(name.to_owned());
                warn!(name, ?chain, "cyclic dependency detected");
                return Err(RabitaError::CyclicDependency(CyclicDependencyError {
                    chain,
                }));
            }
        }

        self.inner.resolving.lock().push(name.to_owned());
        let built = self.run_builder(name, with, factory);
        self.inner.resolving.lock().pop();
        let instance = built?;

        {
            let mut entries = self.inner.entries.lock();
            if let Some(Entry::Object(object)) = entries.get_mut(name) {
                object.value = Some(Arc::clone(&instance));
            }
        }

        if let Some(callback) = callback {
            trace!(name, "invoking post-construct callback");
            callback(self, &instance);
        }

        debug!(name, "object entry resolved and cached");
        Ok(Value::Object(instance))
    }

    fn run_builder(
        &self,
        name: &str,
        with: Vec<Value>,
        factory: FactoryFn,
    ) -> Result<Arc<dyn Service>> {
        let mut builder = ObjectBuilder::new();
        builder.set_container(self.clone());
        builder.set_type_validator(self.inner.validator);
        builder.set_object_name(name)?;
        builder.set_constructor_args(with);
        builder.set_factory(factory);
        builder.build()?.get_object()
    }

    /// Walks a dotted alias: the segment after the container token names
    /// an entry (resolved through the normal `get` path, so lazy
    /// construction triggers), and each further segment goes through the
    /// current object's `property` capability.
    fn get_by_alias(&self, alias: &str) -> Result<Value> {
        trace!(alias, "resolving dotted alias");
        let mut segments = alias.split(ALIAS_SEPARATOR);
        segments.next(); // leading container token, guaranteed by is_alias

        let root = match segments.next() {
            Some(segment) if !segment.is_empty() => segment,
            _ => return Err(self.not_found(alias, None)),
        };

        let mut current = match self.get(root) {
            Ok(value) => value,
            Err(RabitaError::NotFound(err)) => {
                return Err(RabitaError::NotFound(NotFoundError {
                    requested: alias.to_owned(),
                    segment: Some(root.to_owned()),
                    suggestions: err.suggestions,
                }));
            }
            Err(other) => return Err(other),
        };

        for segment in segments {
            current = match &current {
                Value::Object(instance) => match instance.property(segment) {
                    Some(next) => next,
                    None => return Err(self.not_found(alias, Some(segment))),
                },
                _ => return Err(self.not_found(alias, Some(segment))),
            };
        }

        Ok(current)
    }

    fn not_found(&self, requested: &str, segment: Option<&str>) -> RabitaError {
        RabitaError::NotFound(NotFoundError {
            requested: requested.to_owned(),
            segment: segment.map(str::to_owned),
            suggestions: Vec::new(),
        })
    }

    fn find_suggestions(&self, name: &str) -> Vec<String> {
        let entries = self.inner.entries.lock();
        let names: Vec<&str> = entries.keys().map(String::as_str).collect();
        suggest_similar(name, &names, 3)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ObjectConfig, PostConstructCallback};
    pub use crate::builder::{BoxError, FactoryFn, ObjectBuilder};
    pub use crate::error::{RabitaError, Result};
    pub use crate::service::{ContainerAware, Service};
    pub use crate::validator::{CONTAINER_TOKEN, TypeValidator};
    pub use crate::value::{Kind, Value};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use once_cell::sync::OnceCell;

    use crate::service::ContainerAware;

    struct Engine;
    impl Service for Engine {}

    struct Car {
        engine: Arc<Engine>,
    }
    impl Service for Car {}

    #[test]
    fn primitives_store_and_fetch() {
        let container = Container::new();
        container.add_number("Pi", 3.14).unwrap();
        container.add_boolean("True", true).unwrap();
        container.add_string("Lorem", "Ipsum").unwrap();

        assert_eq!(container.get("Pi").unwrap().as_number(), Some(3.14));
        assert_eq!(container.get("True").unwrap().as_boolean(), Some(true));
        assert_eq!(container.get("Lorem").unwrap().as_str(), Some("Ipsum"));
        // Primitives are re-returned on every call.
        assert_eq!(container.get("Pi").unwrap().as_number(), Some(3.14));
    }

    #[test]
    fn object_constructed_once_and_cached() {
        let container = Container::new();
        let constructions = Arc::new(AtomicU32::new(0));

        container
            .add_object(
                "engine",
                {
                    let constructions = Arc::clone(&constructions);
                    move |_| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        Ok(Arc::new(Engine))
                    }
                },
                ObjectConfig::new(),
            )
            .unwrap();

        let first = container.get("engine").unwrap();
        let second = container.get("engine").unwrap();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        // Reference-equal: the cached instance is returned.
        assert_eq!(first, second);
    }

    #[test]
    fn alias_argument_constructs_dependency_first() {
        let container = Container::new();

        container
            .add_object("engine", |_| Ok(Arc::new(Engine)), ObjectConfig::new())
            .unwrap();
        container
            .add_object(
                "car",
                |args| {
                    let engine = args[0].downcast::<Engine>().ok_or("engine missing")?;
                    Ok(Arc::new(Car { engine }))
                },
                ObjectConfig::new().with_args(vec!["container.engine".into()]),
            )
            .unwrap();

        let car = container.get("car").unwrap().downcast::<Car>().unwrap();
        let engine = container.get("engine").unwrap().downcast::<Engine>().unwrap();
        assert!(Arc::ptr_eq(&car.engine, &engine));
    }

    #[test]
    fn container_resolves_itself() {
        let container = Container::new();
        assert!(container.has("container"));
        assert!(container.is_empty());

        let resolved = container.get("container").unwrap();
        assert!(resolved.as_container().unwrap().ptr_eq(&container));
    }

    #[test]
    fn direct_instance_bypasses_construction() {
        let container = Container::new();
        let mars: Arc<dyn Service> = Arc::new(Engine);

        container
            .add_object_with_instance("Mars", Arc::clone(&mars))
            .unwrap();

        let resolved = container.get("Mars").unwrap();
        assert!(Arc::ptr_eq(resolved.as_object().unwrap(), &mars));
    }

    #[test]
    fn autoload_constructs_at_registration() {
        let container = Container::new();
        let constructions = Arc::new(AtomicU32::new(0));

        container
            .add_object(
                "eager",
                {
                    let constructions = Arc::clone(&constructions);
                    move |_| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        Ok(Arc::new(Engine))
                    }
                },
                ObjectConfig::new().autoload(true),
            )
            .unwrap();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        container.get("eager").unwrap();
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn preset_value_short_circuits_construction() {
        let container = Container::new();
        let instance: Arc<dyn Service> = Arc::new(Engine);
        let constructions = Arc::new(AtomicU32::new(0));

        container
            .add_object(
                "prebuilt",
                {
                    let constructions = Arc::clone(&constructions);
                    move |_| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        Ok(Arc::new(Engine))
                    }
                },
                ObjectConfig::new().value(Arc::clone(&instance)).autoload(true),
            )
            .unwrap();

        // The entry is already resolved, so neither autoload nor get
        // invokes the factory.
        assert_eq!(constructions.load(Ordering::SeqCst), 0);
        let resolved = container.get("prebuilt").unwrap();
        assert!(Arc::ptr_eq(resolved.as_object().unwrap(), &instance));
        assert_eq!(constructions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_name_fails_with_not_found() {
        let container = Container::new();
        container.add_string("database", "postgres://localhost").unwrap();

        match container.get("databse") {
            Err(RabitaError::NotFound(err)) => {
                assert_eq!(err.requested, "databse");
                assert_eq!(err.suggestions, vec!["database".to_string()]);
            }
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn rejected_registration_leaves_registry_unchanged() {
        let container = Container::new();

        assert!(matches!(
            container.add_boolean("", true),
            Err(RabitaError::InvalidArgument(_))
        ));

        let malformed = ObjectConfig::new().with_args(vec!["container..engine".into()]);
        assert!(matches!(
            container.add_object("w", |_| Ok(Arc::new(Engine)), malformed),
            Err(RabitaError::InvalidArgument(_))
        ));

        assert!(container.is_empty());
        assert!(!container.has("w"));
    }

    #[test]
    fn reregistration_overwrites() {
        let container = Container::new();
        container.add_number("x", 1.0).unwrap();
        container.add_string("x", "replaced").unwrap();

        assert_eq!(container.len(), 1);
        assert_eq!(container.get("x").unwrap().as_str(), Some("replaced"));
    }

    #[test]
    fn cyclic_dependency_detected_not_overflowed() {
        let container = Container::new();

        container
            .add_object(
                "a",
                |_| Ok(Arc::new(Engine)),
                ObjectConfig::new().with_args(vec!["container.b".into()]),
            )
            .unwrap();
        container
            .add_object(
                "b",
                |_| Ok(Arc::new(Engine)),
                ObjectConfig::new().with_args(vec!["container.a".into()]),
            )
            .unwrap();

        match container.get("a") {
            Err(RabitaError::CyclicDependency(err)) => {
                assert_eq!(err.chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected CyclicDependency, got: {other:?}"),
        }

        // The resolution stack unwound: the same failure reproduces
        // instead of accumulating stale frames, and nothing was cached.
        match container.get("a") {
            Err(RabitaError::CyclicDependency(err)) => {
                assert_eq!(err.chain.len(), 3);
            }
            other => panic!("expected CyclicDependency, got: {other:?}"),
        }
    }

    #[test]
    fn failed_construction_is_retried() {
        let container = Container::new();
        let attempts = Arc::new(AtomicU32::new(0));

        container
            .add_object(
                "flaky",
                {
                    let attempts = Arc::clone(&attempts);
                    move |_| {
                        if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                            Err("cold start".into())
                        } else {
                            Ok(Arc::new(Engine))
                        }
                    }
                },
                ObjectConfig::new(),
            )
            .unwrap();

        assert!(matches!(
            container.get("flaky"),
            Err(RabitaError::ConstructionFailure { .. })
        ));
        // No corrupt cached value: the next get attempts construction again.
        assert!(container.get("flaky").is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn callback_fires_once_after_value_is_cached() {
        let container = Container::new();
        let invocations = Arc::new(AtomicU32::new(0));

        container
            .add_object(
                "tracked",
                |_| Ok(Arc::new(Engine)),
                ObjectConfig::new().callback({
                    let invocations = Arc::clone(&invocations);
                    move |owner, instance| {
                        invocations.fetch_add(1, Ordering::SeqCst);
                        // The value is already cached when the hook runs.
                        let cached = owner.get("tracked").unwrap();
                        assert!(Arc::ptr_eq(cached.as_object().unwrap(), instance));
                    }
                }),
            )
            .unwrap();

        container.get("tracked").unwrap();
        container.get("tracked").unwrap();
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dotted_alias_reaches_into_properties() {
        struct Config {
            url: String,
        }
        impl Service for Config {
            fn property(&self, name: &str) -> Option<Value> {
                match name {
                    "url" => Some(Value::from(self.url.as_str())),
                    _ => None,
                }
            }
        }

        let container = Container::new();
        container
            .add_object(
                "config",
                |_| {
                    Ok(Arc::new(Config {
                        url: "postgres://localhost/app".into(),
                    }))
                },
                ObjectConfig::new(),
            )
            .unwrap();

        let url = container.get("container.config.url").unwrap();
        assert_eq!(url.as_str(), Some("postgres://localhost/app"));

        // Missing property names the failing segment.
        match container.get("container.config.port") {
            Err(RabitaError::NotFound(err)) => assert_eq!(err.segment.as_deref(), Some("port")),
            other => panic!("expected NotFound, got: {other:?}"),
        }

        // Primitives have no properties to walk into.
        container.add_number("pi", 3.14).unwrap();
        assert!(container.get("container.pi.digits").is_err());

        // Missing root entry names the root segment.
        match container.get("container.nope") {
            Err(RabitaError::NotFound(err)) => assert_eq!(err.segment.as_deref(), Some("nope")),
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn container_token_as_constructor_argument() {
        struct Holder {
            slot: OnceCell<Container>,
        }
        impl Service for Holder {}

        let container = Container::new();
        container
            .add_object(
                "holder",
                |args| {
                    let holder = Holder {
                        slot: OnceCell::new(),
                    };
                    if let Some(owner) = args[0].as_container() {
                        let _ = holder.slot.set(owner.clone());
                    }
                    Ok(Arc::new(holder))
                },
                ObjectConfig::new().with_args(vec!["container".into()]),
            )
            .unwrap();

        let holder = container.get("holder").unwrap().downcast::<Holder>().unwrap();
        assert!(holder.slot.get().unwrap().ptr_eq(&container));
    }

    #[test]
    fn container_aware_service_resolves_own_dependencies_later() {
        struct Repo {
            owner: OnceCell<Container>,
        }
        impl Service for Repo {
            fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
                Some(self)
            }
        }
        impl ContainerAware for Repo {
            fn set_container(&self, container: Container) {
                let _ = self.owner.set(container);
            }
        }
        impl Repo {
            fn connection_url(&self) -> Option<String> {
                let owner = self.owner.get()?;
                Some(owner.get("database_url").ok()?.as_str()?.to_owned())
            }
        }

        let container = Container::with_validator(TypeValidator::new());
        container
            .add_string("database_url", "postgres://localhost/app")
            .unwrap();
        container
            .add_object(
                "repo",
                |_| {
                    Ok(Arc::new(Repo {
                        owner: OnceCell::new(),
                    }))
                },
                ObjectConfig::new(),
            )
            .unwrap();

        let repo = container.get("repo").unwrap().downcast::<Repo>().unwrap();
        assert_eq!(
            repo.connection_url().as_deref(),
            Some("postgres://localhost/app")
        );
    }

    #[test]
    fn introspection() {
        let container = Container::new();
        container.add_number("b", 1.0).unwrap();
        container.add_number("a", 2.0).unwrap();

        assert_eq!(container.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(container.len(), 2);
        assert!(container.has("a"));
        assert!(!container.has("c"));

        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains('2'));
    }
}
