//! Listener-level error type.

use thiserror::Error;

/// Errors returned by a [`ListenerFactory`](crate::ListenerFactory).
///
/// The engine never catches these: a failing factory call aborts the
/// transformation of the process that declared the listener.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The declaration carries no class name, expression, or throw target.
    #[error("event listener of type '{implementation_type}' has no implementation")]
    MissingImplementation { implementation_type: String },

    /// The factory was asked to build a listener kind it does not produce.
    #[error("implementation type '{0}' cannot be created by this factory method")]
    WrongImplementationType(String),

    /// Factory-specific failure.
    #[error("failed to create event listener: {0}")]
    Creation(String),
}
