//! Core container implementation for Rabita DI.

pub mod builder;
pub mod container;
pub mod error;
pub mod service;
pub mod validator;
pub mod value;

pub use container::prelude;
pub use container::{Container, ObjectConfig, PostConstructCallback};
pub use error::{RabitaError, Result};
pub use service::{ContainerAware, Service};
pub use validator::{CONTAINER_TOKEN, TypeValidator};
pub use value::{Kind, Value};
