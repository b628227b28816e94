//! Process parse handler.
//!
//! `ProcessParseHandler` turns each executable [`ProcessModel`] into a
//! [`ProcessDefinitionRecord`]:
//! 1. Gate: non-executable processes are skipped with an info diagnostic.
//! 2. Copies key, name, category, description, deployment id and engine
//!    version into a fresh record.
//! 3. Binds declared event listeners into the record's `EventSupport`.
//! 4. Hands flow elements and artifacts to the `FlowElementProcessor`.
//! 5. Compiles candidate starters, merges data objects into the variables,
//!    and attaches the I/O contract when one is declared.
//!
//! Records are appended to [`ParseContext::definitions`] only once fully
//! built; a failing collaborator leaves no partial record behind.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use listeners::{
    DefaultListenerFactory, EventListenerDeclaration, EventSupport, EventTypeFilter,
    ImplementationType, ListenerFactory,
};

use crate::context::{Diagnostic, ParseContext};
use crate::data_object::{DataObjectExtractor, TypedDataObjectExtractor};
use crate::definition::ProcessDefinitionRecord;
use crate::error::ParseError;
use crate::expression::{ExpressionCompiler, TemplateExpressionCompiler};
use crate::flow::{FlowElementProcessor, StructuralFlowProcessor};
use crate::io::{IoContractBuilder, NamespacedIoContractBuilder};
use crate::models::ProcessModel;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    /// Keep parsing the remaining processes of a batch after one fails.
    pub continue_on_error: bool,
}

// ---------------------------------------------------------------------------
// Output of a batch parse
// ---------------------------------------------------------------------------

/// A process whose transformation failed during [`ProcessParseHandler::parse_all`].
#[derive(Debug)]
pub struct ParseFailure {
    pub process_id: String,
    pub error: ParseError,
}

/// Outcome of [`ProcessParseHandler::parse_all`].
#[derive(Debug, Default)]
pub struct ParseSummary {
    /// Records appended to the context.
    pub produced: usize,
    /// Non-executable processes.
    pub skipped: usize,
    /// Only populated when `continue_on_error` is set.
    pub failures: Vec<ParseFailure>,
}

// ---------------------------------------------------------------------------
// Listener binding
// ---------------------------------------------------------------------------

/// Register one runtime listener per supported declaration, in order.
///
/// Unsupported implementation types are skipped with a warning naming
/// `ctx.current_flow_element` and nothing else; unknown event type names in
/// the filter of a registered listener are dropped with a warning each.
///
/// # Errors
/// Whatever the factory returns, unchanged.
pub fn bind_listeners(
    declarations: &[EventListenerDeclaration],
    registry: &mut EventSupport,
    factory: &dyn ListenerFactory,
    ctx: &mut ParseContext,
) -> Result<(), ParseError> {
    for declaration in declarations {
        let listener = match &declaration.implementation_type {
            ImplementationType::Class => factory.create_class_delegate_listener(declaration)?,
            ImplementationType::DelegateExpression => {
                factory.create_delegate_expression_listener(declaration)?
            }
            ImplementationType::ThrowSignalEvent
            | ImplementationType::ThrowGlobalSignalEvent
            | ImplementationType::ThrowMessageEvent
            | ImplementationType::ThrowErrorEvent => {
                factory.create_event_throwing_listener(declaration)?
            }
            ImplementationType::Unsupported(tag) => {
                ctx.report(Diagnostic::UnsupportedListener {
                    implementation_type: tag.clone(),
                    element_id: ctx.current_flow_element.clone(),
                });
                continue;
            }
        };

        // Only listeners that are actually registered get their filter checked.
        let (filter, rejected) = EventTypeFilter::parse(&declaration.events);
        for token in rejected {
            ctx.report(Diagnostic::UnknownEventType {
                token,
                element_id: ctx.current_flow_element.clone(),
            });
        }

        registry.add_listener(listener, filter);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ProcessParseHandler
// ---------------------------------------------------------------------------

/// Stateless transformer from process models to definition records.
///
/// Every collaborator is replaceable; [`ProcessParseHandler::default`] wires
/// the stock implementations.
#[derive(Clone)]
pub struct ProcessParseHandler {
    listener_factory: Arc<dyn ListenerFactory>,
    expressions: Arc<dyn ExpressionCompiler>,
    flow: Arc<dyn FlowElementProcessor>,
    data_objects: Arc<dyn DataObjectExtractor>,
    io: Arc<dyn IoContractBuilder>,
    config: HandlerConfig,
}

impl Default for ProcessParseHandler {
    fn default() -> Self {
        Self {
            listener_factory: Arc::new(DefaultListenerFactory),
            expressions: Arc::new(TemplateExpressionCompiler),
            flow: Arc::new(StructuralFlowProcessor),
            data_objects: Arc::new(TypedDataObjectExtractor),
            io: Arc::new(NamespacedIoContractBuilder),
            config: HandlerConfig::default(),
        }
    }
}

impl ProcessParseHandler {
    /// Create a handler with the stock collaborators and `config`.
    pub fn new(config: HandlerConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn with_listener_factory(mut self, factory: Arc<dyn ListenerFactory>) -> Self {
        self.listener_factory = factory;
        self
    }

    pub fn with_expression_compiler(mut self, compiler: Arc<dyn ExpressionCompiler>) -> Self {
        self.expressions = compiler;
        self
    }

    pub fn with_flow_processor(mut self, flow: Arc<dyn FlowElementProcessor>) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_data_object_extractor(mut self, extractor: Arc<dyn DataObjectExtractor>) -> Self {
        self.data_objects = extractor;
        self
    }

    pub fn with_io_contract_builder(mut self, io: Arc<dyn IoContractBuilder>) -> Self {
        self.io = io;
        self
    }

    /// `true` iff the process is flagged executable.  Otherwise reports an
    /// info diagnostic.
    pub fn admit(&self, model: &ProcessModel, ctx: &mut ParseContext) -> bool {
        if !model.executable {
            ctx.report(Diagnostic::NonExecutableProcess { process_id: model.id.clone() });
            return false;
        }
        true
    }

    /// Fresh record carrying the process metadata and deployment linkage.
    pub fn build(&self, model: &ProcessModel, ctx: &ParseContext) -> ProcessDefinitionRecord {
        let deployment = &ctx.deployment;
        let mut record = deployment.definition_factory.create();

        record.key = model.id.clone();
        record.name = model.name.clone();
        record.category = deployment.target_namespace.clone();
        record.description = model.documentation.clone();
        record.deployment_id = deployment.deployment_id.clone();

        if let Some(version) = &deployment.engine_version {
            record.engine_version = Some(version.clone());
        }

        record
    }

    /// Compile candidate starters, merge data objects, attach the I/O contract.
    ///
    /// # Errors
    /// Errors of the expression compiler, data-object extractor or I/O
    /// contract builder, unchanged.
    pub fn merge(
        &self,
        model: &ProcessModel,
        record: &mut ProcessDefinitionRecord,
        ctx: &ParseContext,
    ) -> Result<(), ParseError> {
        for user in &model.candidate_starter_users {
            record
                .candidate_starter_user_expressions
                .push(self.expressions.compile(user)?);
        }
        for group in &model.candidate_starter_groups {
            record
                .candidate_starter_group_expressions
                .push(self.expressions.compile(group)?);
        }

        let variables = self.data_objects.extract(&model.data_objects)?;
        record.merge_variables(variables);

        if let Some(specification) = &model.io_specification {
            record.io_specification = Some(self.io.build(specification, &ctx.deployment)?);
        }
        Ok(())
    }

    /// Build the complete record for an admitted process.
    ///
    /// # Errors
    /// The first collaborator error; the record is discarded.
    pub fn transform(
        &self,
        model: &ProcessModel,
        ctx: &mut ParseContext,
    ) -> Result<ProcessDefinitionRecord, ParseError> {
        let mut record = self.build(model, ctx);
        self.populate(model, &mut record, ctx)?;
        Ok(record)
    }

    fn populate(
        &self,
        model: &ProcessModel,
        record: &mut ProcessDefinitionRecord,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        bind_listeners(
            &model.event_listeners,
            &mut record.event_support,
            self.listener_factory.as_ref(),
            ctx,
        )?;

        debug!("Parsing process {}", record.key);

        self.flow.process_flow_elements(&model.flow_elements, ctx)?;
        self.flow.process_artifacts(&model.artifacts, &model.flow_elements, ctx)?;

        self.merge(model, record, ctx)
    }

    /// Gate, transform, and append the record to `ctx.definitions`.
    ///
    /// Returns whether a record was produced.
    #[instrument(skip(self, model, ctx), fields(process_id = %model.id))]
    pub fn parse_model(&self, model: &ProcessModel, ctx: &mut ParseContext) -> Result<bool, ParseError> {
        if !self.admit(model, ctx) {
            return Ok(false);
        }
        let record = self.transform(model, ctx)?;
        info!(
            "process '{}' transformed ({} listeners, {} variables)",
            record.key,
            record.event_support.len(),
            record.variables.len()
        );
        ctx.definitions.push(record);
        Ok(true)
    }

    /// Parse every model in order.
    ///
    /// # Errors
    /// The first failure, unless `continue_on_error` is set, in which case
    /// failures are collected in the summary instead.
    pub fn parse_all<'m>(
        &self,
        models: impl IntoIterator<Item = &'m ProcessModel>,
        ctx: &mut ParseContext,
    ) -> Result<ParseSummary, ParseError> {
        let mut summary = ParseSummary::default();

        for model in models {
            match self.parse_model(model, ctx) {
                Ok(true) => summary.produced += 1,
                Ok(false) => summary.skipped += 1,
                Err(err) if self.config.continue_on_error => {
                    error!("process '{}' failed: {}", model.id, err);
                    summary.failures.push(ParseFailure { process_id: model.id.clone(), error: err });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(summary)
    }
}
