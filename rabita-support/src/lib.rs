//! Support utilities for the Rabita workspace.
//!
//! Currently hosts the text-rendering helpers used to build
//! human-friendly error messages in `rabita-container`.

pub mod rendering;
