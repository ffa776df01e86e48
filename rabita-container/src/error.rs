//! Error types for Rabita container operations.
//!
//! Failures are raised immediately to the caller of the offending
//! operation; there is no internal retry or partial-success state.
//! Messages carry enough context to act on without a debugger.

use std::fmt;

use rabita_support::rendering::render_chain;

/// Main error type for all Rabita operations.
#[derive(Debug, thiserror::Error)]
pub enum RabitaError {
    /// Malformed registration input: empty entry name, non-finite number,
    /// malformed alias in a constructor-argument list.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked before its required setup, e.g. a builder
    /// used before all of its collaborators were set.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// Resolution of an unknown name, or an alias path segment that does
    /// not exist.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// The factory for an object entry returned an error.
    #[error("failed to construct {name:?}: {source}")]
    ConstructionFailure {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A name reappeared on the active resolution stack while its own
    /// construction was still in progress.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),
}

/// Error when an entry (or an alias path segment) was not found.
#[derive(Debug)]
pub struct NotFoundError {
    /// The name or alias that was requested.
    pub requested: String,
    /// The dotted-path segment that failed to resolve, if the request
    /// was an alias.
    pub segment: Option<String>,
    /// Registered names that look close (for "did you mean?" output).
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry not found: {:?}", self.requested)?;

        if let Some(ref segment) = self.segment {
            write!(f, "\n  Missing path segment: {segment:?}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register {:?} first with one of the add_* operations",
            self.requested
        )
    }
}

/// Error when a dependency cycle is detected during resolution.
///
/// Carries the full chain so you can see WHERE the cycle closes.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// The active resolution chain, ending with the repeated name.
    /// Example: `["car", "engine", "car"]`
    pub chain: Vec<String>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cyclic dependency detected:\n  ")?;
        write!(f, "{}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: hand one side a pre-built instance with add_object_with_instance(), or resolve it lazily through the bound container"
        )
    }
}

/// Convenient Result type for Rabita operations.
pub type Result<T> = std::result::Result<T, RabitaError>;
