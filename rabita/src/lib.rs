//! # Rabita — named-service dependency injection for Rust
//!
//! A minimal service container: register named values (primitives or
//! lazily-constructed objects), reference other entries from
//! constructor-argument lists with `container.*` aliases, and resolve
//! everything back by name. Resolved objects are cached for the
//! container's lifetime (singleton-per-name).

pub use rabita_container::*;
pub use rabita_support::*;
