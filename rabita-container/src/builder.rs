//! The object builder, a single-use construction worker.
//!
//! A builder is configured through setters, then driven once:
//! `build()` resolves the constructor arguments (aliases recurse into
//! [`Container::get`]), invokes the entry's factory, binds the container
//! capability, and `get_object()` hands the instance back.
//!
//! The container creates one fresh builder per construction; builders own
//! nothing past `build()`.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::container::Container;
use crate::error::{RabitaError, Result};
use crate::service::Service;
use crate::validator::TypeValidator;
use crate::value::Value;

/// Boxed error type factories are allowed to fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A construction function supplied at registration time.
///
/// Receives the resolved, positionally-ordered argument list and returns
/// the new instance. This replaces looking a type up by name in an
/// ambient namespace, which Rust has no business doing at runtime.
pub type FactoryFn =
    Arc<dyn Fn(&[Value]) -> std::result::Result<Arc<dyn Service>, BoxError> + Send + Sync>;

/// Builds a single object entry.
///
/// ```text
/// ObjectBuilder::new()
///     ── set_container / set_type_validator / set_object_name /
///        set_constructor_args / set_factory ──
///     build() ── get_object() ──> Arc<dyn Service>
/// ```
#[derive(Default)]
pub struct ObjectBuilder {
    container: Option<Container>,
    validator: Option<TypeValidator>,
    object_name: Option<String>,
    constructor_args: Vec<Value>,
    factory: Option<FactoryFn>,
    built: Option<Arc<dyn Service>>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container used to resolve alias arguments and handed to
    /// container-aware instances.
    pub fn set_container(&mut self, container: Container) -> &mut Self {
        self.container = Some(container);
        self
    }

    /// Sets the validator used to classify alias arguments.
    pub fn set_type_validator(&mut self, validator: TypeValidator) -> &mut Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the name of the entry being built. Fails with
    /// `InvalidArgument` on an empty name.
    pub fn set_object_name(&mut self, name: &str) -> Result<&mut Self> {
        if name.is_empty() {
            return Err(RabitaError::InvalidArgument(
                "object name cannot be empty".into(),
            ));
        }
        self.object_name = Some(name.to_owned());
        Ok(self)
    }

    /// Sets the ordered constructor-argument list (default: empty).
    pub fn set_constructor_args(&mut self, args: Vec<Value>) -> &mut Self {
        self.constructor_args = args;
        self
    }

    /// Sets the factory invoked with the resolved argument list.
    pub fn set_factory(&mut self, factory: FactoryFn) -> &mut Self {
        self.factory = Some(factory);
        self
    }

    /// Builds the object.
    ///
    /// Resolves each constructor argument in order: a string argument
    /// classified as an alias is replaced with `container.get(alias)` —
    /// the recursive step, which may construct other entries arbitrarily
    /// deep — and every other argument passes through unchanged. The
    /// factory then runs with the resolved list, and a container-aware
    /// instance receives the owning container.
    ///
    /// Fails with `PreconditionViolation` if a collaborator was not set,
    /// and with `ConstructionFailure` if the factory errors.
    pub fn build(&mut self) -> Result<&mut Self> {
        let name = self.object_name.clone().ok_or_else(|| {
            RabitaError::PreconditionViolation("set the object name before build()".into())
        })?;
        let container = self.container.clone().ok_or_else(|| {
            RabitaError::PreconditionViolation("set the container before build()".into())
        })?;
        let validator = self.validator.ok_or_else(|| {
            RabitaError::PreconditionViolation("set the type validator before build()".into())
        })?;
        let factory = self.factory.clone().ok_or_else(|| {
            RabitaError::PreconditionViolation("set the factory before build()".into())
        })?;

        trace!(
            object = %name,
            args = self.constructor_args.len(),
            "resolving constructor arguments"
        );

        let mut resolved = Vec::with_capacity(self.constructor_args.len());
        for arg in &self.constructor_args {
            match arg {
                Value::String(candidate) if validator.is_alias(candidate) => {
                    resolved.push(container.get(candidate)?);
                }
                literal => resolved.push(literal.clone()),
            }
        }

        let instance = factory(&resolved).map_err(|source| RabitaError::ConstructionFailure {
            name: name.clone(),
            source,
        })?;

        if let Some(aware) = instance.as_container_aware() {
            trace!(object = %name, "binding container through the container-aware capability");
            aware.set_container(container.clone());
        }

        debug!(object = %name, "object constructed");
        self.built = Some(instance);
        Ok(self)
    }

    /// Returns the built instance, failing with `PreconditionViolation`
    /// if `build()` has not succeeded yet.
    pub fn get_object(&self) -> Result<Arc<dyn Service>> {
        self.built.clone().ok_or_else(|| {
            RabitaError::PreconditionViolation("build the object before get_object()".into())
        })
    }
}
