//! Deployment and parse state shared across one parse operation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::definition::ProcessDefinitionRecord;
use crate::models::ItemDefinition;

// ---------------------------------------------------------------------------
// DefinitionFactory
// ---------------------------------------------------------------------------

/// Produces the fresh record each executable process is built into.
///
/// Any `Fn() -> ProcessDefinitionRecord` qualifies, so callers can seed
/// defaults such as pre-existing variables.
pub trait DefinitionFactory: Send + Sync {
    fn create(&self) -> ProcessDefinitionRecord;
}

impl<F> DefinitionFactory for F
where
    F: Fn() -> ProcessDefinitionRecord + Send + Sync,
{
    fn create(&self) -> ProcessDefinitionRecord {
        self()
    }
}

// ---------------------------------------------------------------------------
// DeploymentContext
// ---------------------------------------------------------------------------

/// Values already resolved by the deployment that triggered the parse.
#[derive(Clone)]
pub struct DeploymentContext {
    pub deployment_id: String,
    pub target_namespace: String,
    pub engine_version: Option<String>,
    pub deployed_at: DateTime<Utc>,
    /// Item definitions of the document, keyed by id.
    pub item_definitions: HashMap<String, ItemDefinition>,
    pub definition_factory: Arc<dyn DefinitionFactory>,
}

impl DeploymentContext {
    pub fn new(deployment_id: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            target_namespace: target_namespace.into(),
            engine_version: None,
            deployed_at: Utc::now(),
            item_definitions: HashMap::new(),
            definition_factory: Arc::new(ProcessDefinitionRecord::default),
        }
    }

    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    pub fn with_item_definitions(mut self, items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        self.item_definitions
            .extend(items.into_iter().map(|item| (item.id.clone(), item)));
        self
    }

    pub fn with_definition_factory(mut self, factory: impl DefinitionFactory + 'static) -> Self {
        self.definition_factory = Arc::new(factory);
        self
    }
}

impl fmt::Debug for DeploymentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentContext")
            .field("deployment_id", &self.deployment_id)
            .field("target_namespace", &self.target_namespace)
            .field("engine_version", &self.engine_version)
            .field("deployed_at", &self.deployed_at)
            .field("item_definitions", &self.item_definitions.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal finding reported while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The process is not flagged executable and was skipped.
    NonExecutableProcess { process_id: String },
    /// A listener with an implementation type the binder cannot handle.
    UnsupportedListener {
        implementation_type: String,
        element_id: Option<String>,
    },
    /// An event type name in a listener filter that is not recognized.
    UnknownEventType { token: String, element_id: Option<String> },
    /// An association pointing at an element the process doesn't declare.
    DanglingAssociation { association_id: String, element_id: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NonExecutableProcess { .. } => Severity::Info,
            Self::UnsupportedListener { .. }
            | Self::UnknownEventType { .. }
            | Self::DanglingAssociation { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonExecutableProcess { process_id } => write!(
                f,
                "Ignoring non-executable process with id='{process_id}'. \
                 Set the attribute isExecutable=\"true\" to deploy this process."
            ),
            Self::UnsupportedListener { implementation_type, element_id } => write!(
                f,
                "Unsupported implementation type for event listener: {implementation_type} for element {}",
                element_id.as_deref().unwrap_or("<none>")
            ),
            Self::UnknownEventType { token, element_id } => write!(
                f,
                "Unknown event type '{token}' in listener filter for element {}",
                element_id.as_deref().unwrap_or("<none>")
            ),
            Self::DanglingAssociation { association_id, element_id } => write!(
                f,
                "Association '{association_id}' references unknown element '{element_id}'"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// ParseContext
// ---------------------------------------------------------------------------

/// Mutable state of one parse operation.
///
/// Passed explicitly (`&mut`) to every step; nothing is read from globals.
#[derive(Debug)]
pub struct ParseContext {
    pub deployment: DeploymentContext,
    /// Definitions produced so far, in input order.
    pub definitions: Vec<ProcessDefinitionRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// Id of the flow element most recently entered by the flow processor.
    pub current_flow_element: Option<String>,
}

impl ParseContext {
    pub fn new(deployment: DeploymentContext) -> Self {
        Self {
            deployment,
            definitions: Vec::new(),
            diagnostics: Vec::new(),
            current_flow_element: None,
        }
    }

    /// Log `diagnostic` at its severity and keep it.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => info!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }
}
