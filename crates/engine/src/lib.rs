//! `engine` crate — process models, definition records, and the parse
//! handler that turns one into the other.

pub mod models;
pub mod definition;
pub mod context;
pub mod error;
pub mod expression;
pub mod data_object;
pub mod io;
pub mod flow;
pub mod handler;

pub use models::{ProcessDocument, ProcessModel};
pub use definition::{IoContract, ProcessDefinitionRecord, Variables};
pub use context::{DefinitionFactory, DeploymentContext, Diagnostic, ParseContext, Severity};
pub use error::ParseError;
pub use expression::{Expression, ExpressionCompiler, TemplateExpressionCompiler};
pub use handler::{bind_listeners, HandlerConfig, ParseSummary, ProcessParseHandler};

#[cfg(test)]
mod handler_tests;
