//! Listener declarations and the `ListenerFactory` contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ListenerError;

// ---------------------------------------------------------------------------
// ImplementationType
// ---------------------------------------------------------------------------

/// How a declared listener is implemented.
///
/// Defined here (in the listeners crate) so both the engine's process model
/// and factory implementations can import it without a circular dependency.
///
/// Tags that are not recognized are kept verbatim in
/// [`ImplementationType::Unsupported`] so the binder can report them instead
/// of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImplementationType {
    /// `class` — a named listener class.
    Class,
    /// `delegateExpression` — an expression resolving to a listener.
    DelegateExpression,
    /// `throwSignalEvent` — throw a signal scoped to the process instance.
    ThrowSignalEvent,
    /// `throwGlobalSignalEvent` — throw a signal to every subscriber.
    ThrowGlobalSignalEvent,
    /// `throwMessageEvent` — throw a message.
    ThrowMessageEvent,
    /// `throwErrorEvent` — throw a BPMN error.
    ThrowErrorEvent,
    /// Any other tag.
    Unsupported(String),
}

impl ImplementationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::DelegateExpression => "delegateExpression",
            Self::ThrowSignalEvent => "throwSignalEvent",
            Self::ThrowGlobalSignalEvent => "throwGlobalSignalEvent",
            Self::ThrowMessageEvent => "throwMessageEvent",
            Self::ThrowErrorEvent => "throwErrorEvent",
            Self::Unsupported(tag) => tag,
        }
    }
}

impl fmt::Display for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImplementationType {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "class"                  => Self::Class,
            "delegateExpression"     => Self::DelegateExpression,
            "throwSignalEvent"       => Self::ThrowSignalEvent,
            "throwGlobalSignalEvent" => Self::ThrowGlobalSignalEvent,
            "throwMessageEvent"      => Self::ThrowMessageEvent,
            "throwErrorEvent"        => Self::ThrowErrorEvent,
            other                    => Self::Unsupported(other.to_owned()),
        })
    }
}

impl From<String> for ImplementationType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<ImplementationType> for String {
    fn from(t: ImplementationType) -> Self {
        t.as_str().to_owned()
    }
}

// ---------------------------------------------------------------------------
// EventListenerDeclaration
// ---------------------------------------------------------------------------

/// A listener as declared on a process model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListenerDeclaration {
    pub implementation_type: ImplementationType,
    /// Class name, expression text, signal/message name, or error code.
    #[serde(default)]
    pub implementation: String,
    /// Comma/space separated event type names; empty means all types.
    #[serde(default)]
    pub events: String,
    /// Restricts entity events to one entity type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

impl EventListenerDeclaration {
    /// Convenience constructor for testing.
    pub fn new(
        implementation_type: ImplementationType,
        implementation: impl Into<String>,
        events: impl Into<String>,
    ) -> Self {
        Self {
            implementation_type,
            implementation: implementation.into(),
            events: events.into(),
            entity_type: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeListener
// ---------------------------------------------------------------------------

/// What an event-throwing listener throws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ThrowTarget {
    Signal(String),
    GlobalSignal(String),
    Message(String),
    Error(String),
}

/// A listener ready to be registered with an [`EventSupport`](crate::EventSupport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeListener {
    ClassDelegate {
        class_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity_type: Option<String>,
    },
    DelegateExpression {
        expression: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity_type: Option<String>,
    },
    EventThrowing {
        target: ThrowTarget,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity_type: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// ListenerFactory
// ---------------------------------------------------------------------------

/// Builds runtime listeners from declarations.
///
/// The binder picks the method from the declaration's implementation type;
/// every throw variant goes through [`create_event_throwing_listener`], which
/// is responsible for telling the targets apart.
///
/// [`create_event_throwing_listener`]: ListenerFactory::create_event_throwing_listener
pub trait ListenerFactory: Send + Sync {
    fn create_class_delegate_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError>;

    fn create_delegate_expression_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError>;

    fn create_event_throwing_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError>;
}
