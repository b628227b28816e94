//! Engine-level error types.

use thiserror::Error;

/// Errors produced while compiling a string into an [`Expression`](crate::Expression).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// A `${` or `#{` without its closing brace.
    #[error("unterminated expression starting at offset {offset} in '{text}'")]
    Unterminated { text: String, offset: usize },

    /// `${}` with nothing inside.
    #[error("empty expression at offset {offset} in '{text}'")]
    Empty { text: String, offset: usize },

    /// A reference that is not a dotted identifier path.
    #[error("invalid reference '{reference}' in '{text}'")]
    InvalidReference { text: String, reference: String },

    /// Evaluation referenced a variable that is not set.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
}

/// Errors produced while turning data-object declarations into variables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataObjectError {
    /// The declared value does not parse as the declared item type.
    #[error("data object '{name}': value '{value}' is not a valid {item_type}")]
    InvalidValue {
        name: String,
        item_type: String,
        value: String,
    },
}

/// Errors produced while building an [`IoContract`](crate::IoContract).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IoSpecificationError {
    /// A data input/output ref does not name a declared data input/output.
    #[error("{side} ref '{reference}' does not match any declared data {side}")]
    UnknownRef {
        reference: String,
        side: &'static str,
    },
}

/// Errors raised by a [`FlowElementProcessor`](crate::FlowElementProcessor).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Two or more flow elements share the same ID.
    #[error("duplicate flow element ID: '{0}'")]
    DuplicateElementId(String),

    /// A sequence flow references an element that doesn't exist in its scope.
    #[error("sequence flow '{flow_id}' references unknown element '{element_id}' ({side} side)")]
    UnknownElementReference {
        flow_id: String,
        element_id: String,
        side: &'static str,
    },
}

/// Errors that abort the transformation of a single process model.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("listener error: {0}")]
    Listener(#[from] listeners::ListenerError),

    #[error("data object error: {0}")]
    DataObject(#[from] DataObjectError),

    #[error("io specification error: {0}")]
    IoSpecification(#[from] IoSpecificationError),

    #[error("flow element error: {0}")]
    Flow(#[from] FlowError),
}
