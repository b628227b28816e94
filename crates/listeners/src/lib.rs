//! `listeners` crate — event types, listener declarations, and the
//! `ListenerFactory` contract used to bind them to runtime listeners.
//!
//! The engine crate calls through [`ListenerFactory`] and registers the
//! resulting [`RuntimeListener`]s in an [`EventSupport`] registry.

pub mod error;
pub mod event;
pub mod traits;
pub mod factory;
pub mod support;
pub mod mock;

pub use error::ListenerError;
pub use event::{EventType, EventTypeFilter};
pub use traits::{
    EventListenerDeclaration, ImplementationType, ListenerFactory, RuntimeListener, ThrowTarget,
};
pub use factory::DefaultListenerFactory;
pub use support::{EventSupport, RegisteredListener};
