//! The stock [`ListenerFactory`].

use tracing::debug;

use crate::{
    EventListenerDeclaration, ImplementationType, ListenerError, ListenerFactory, RuntimeListener,
    ThrowTarget,
};

/// Builds listeners straight from the declaration payload.
///
/// Class names and delegate expressions are carried as text; resolving them
/// to something callable happens when the runtime first dispatches an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListenerFactory;

fn implementation_of(declaration: &EventListenerDeclaration) -> Result<String, ListenerError> {
    let implementation = declaration.implementation.trim();
    if implementation.is_empty() {
        return Err(ListenerError::MissingImplementation {
            implementation_type: declaration.implementation_type.to_string(),
        });
    }
    Ok(implementation.to_owned())
}

impl ListenerFactory for DefaultListenerFactory {
    fn create_class_delegate_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        let class_name = implementation_of(declaration)?;
        debug!("creating class delegate listener for '{}'", class_name);
        Ok(RuntimeListener::ClassDelegate {
            class_name,
            entity_type: declaration.entity_type.clone(),
        })
    }

    fn create_delegate_expression_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        let expression = implementation_of(declaration)?;
        debug!("creating delegate expression listener for '{}'", expression);
        Ok(RuntimeListener::DelegateExpression {
            expression,
            entity_type: declaration.entity_type.clone(),
        })
    }

    fn create_event_throwing_listener(
        &self,
        declaration: &EventListenerDeclaration,
    ) -> Result<RuntimeListener, ListenerError> {
        let name = implementation_of(declaration)?;
        let target = match &declaration.implementation_type {
            ImplementationType::ThrowSignalEvent       => ThrowTarget::Signal(name),
            ImplementationType::ThrowGlobalSignalEvent => ThrowTarget::GlobalSignal(name),
            ImplementationType::ThrowMessageEvent      => ThrowTarget::Message(name),
            ImplementationType::ThrowErrorEvent        => ThrowTarget::Error(name),
            other => return Err(ListenerError::WrongImplementationType(other.to_string())),
        };
        debug!("creating event throwing listener for {:?}", target);
        Ok(RuntimeListener::EventThrowing {
            target,
            entity_type: declaration.entity_type.clone(),
        })
    }
}
