//! `RecordingListenerFactory` — a test double for `ListenerFactory`.
//!
//! Useful in unit and integration tests that need to assert which factory
//! method was called for which declaration.

use std::sync::{Arc, Mutex};

use crate::{
    DefaultListenerFactory, EventListenerDeclaration, ListenerError, ListenerFactory,
    RuntimeListener,
};

/// Which factory method a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryMethod {
    ClassDelegate,
    DelegateExpression,
    EventThrowing,
}

/// Behaviour injected into `RecordingListenerFactory` at construction time.
pub enum MockBehaviour {
    /// Build listeners the way [`DefaultListenerFactory`] does.
    Delegate,
    /// Fail every call with the given error.
    Fail(ListenerError),
}

/// A factory that records every call it receives.
pub struct RecordingListenerFactory {
    pub behaviour: MockBehaviour,
    /// Every call seen by this factory (in call order).
    pub calls: Arc<Mutex<Vec<(FactoryMethod, EventListenerDeclaration)>>>,
}

impl RecordingListenerFactory {
    /// Create a factory that succeeds like the default one.
    pub fn delegating() -> Self {
        Self {
            behaviour: MockBehaviour::Delegate,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a factory that always fails with `error`.
    pub fn failing(error: ListenerError) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of factory calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Methods called so far, in order.
    pub fn methods(&self) -> Vec<FactoryMethod> {
        self.calls.lock().unwrap().iter().map(|(m, _)| *m).collect()
    }

    fn record(
        &self,
        method: FactoryMethod,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        self.calls.lock().unwrap().push((method, declaration.clone()));

        match &self.behaviour {
            MockBehaviour::Fail(err) => Err(err.clone()),
            MockBehaviour::Delegate => match method {
                FactoryMethod::ClassDelegate => {
                    DefaultListenerFactory.create_class_delegate_listener(declaration)
                }
                FactoryMethod::DelegateExpression => {
                    DefaultListenerFactory.create_delegate_expression_listener(declaration)
                }
                FactoryMethod::EventThrowing => {
                    DefaultListenerFactory.create_event_throwing_listener(declaration)
                }
            },
        }
    }
}

impl ListenerFactory for RecordingListenerFactory {
    fn create_class_delegate_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        self.record(FactoryMethod::ClassDelegate, declaration)
    }

    fn create_delegate_expression_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        self.record(FactoryMethod::DelegateExpression, declaration)
    }

    fn create_event_throwing_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        self.record(FactoryMethod::EventThrowing, declaration)
    }
}
