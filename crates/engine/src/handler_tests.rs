//! Scenario tests for the process parse handler.
//!
//! These run the whole pipeline against in-memory models, with
//! `RecordingListenerFactory` and a recording compiler standing in for the
//! collaborators whose calls we want to observe.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;

use listeners::mock::{FactoryMethod, RecordingListenerFactory};
use listeners::{
    EventListenerDeclaration, EventType, EventTypeFilter, ImplementationType, ListenerError,
    RuntimeListener,
};

use crate::error::ExpressionError;
use crate::models::{DataObject, DataSpec, FlowElement, FlowElementKind, IoSpecification};
use crate::{
    DeploymentContext, Diagnostic, Expression, ExpressionCompiler, HandlerConfig, ParseContext,
    ParseError, ProcessDefinitionRecord, ProcessModel, ProcessParseHandler, Severity,
    TemplateExpressionCompiler, Variables,
};

/// Compiler that records every string it is asked to compile.
#[derive(Default)]
struct RecordingCompiler {
    seen: Mutex<Vec<String>>,
}

impl ExpressionCompiler for RecordingCompiler {
    fn compile(&self, text: &str) -> Result<Expression, ExpressionError> {
        self.seen.lock().unwrap().push(text.to_owned());
        TemplateExpressionCompiler.compile(text)
    }
}

fn compile(text: &str) -> Expression {
    TemplateExpressionCompiler.compile(text).expect("valid expression")
}

fn deployment() -> DeploymentContext {
    DeploymentContext::new("dep-42", "http://example.org/orders")
}

fn listener(kind: &str, implementation: &str, events: &str) -> EventListenerDeclaration {
    EventListenerDeclaration::new(kind.to_string().into(), implementation, events)
}

fn int_object(name: &str, value: i64) -> DataObject {
    DataObject {
        id: format!("do_{name}"),
        name: name.into(),
        item_subject_ref: Some("xsd:int".into()),
        value: Some(value.to_string()),
    }
}

fn recording_handler() -> (ProcessParseHandler, Arc<RecordingListenerFactory>, Arc<RecordingCompiler>) {
    let factory = Arc::new(RecordingListenerFactory::delegating());
    let compiler = Arc::new(RecordingCompiler::default());
    let handler = ProcessParseHandler::default()
        .with_listener_factory(factory.clone())
        .with_expression_compiler(compiler.clone());
    (handler, factory, compiler)
}

// ============================================================
// Gate
// ============================================================

#[test]
fn non_executable_process_yields_no_record_and_one_info_diagnostic() {
    let (handler, factory, compiler) = recording_handler();
    let mut model = ProcessModel::new("draft");
    model.executable = false;
    model.event_listeners = vec![listener("class", "com.x.Listener", "")];
    model.candidate_starter_users = vec!["kermit".into()];
    model.data_objects = vec![int_object("amount", 10)];

    let mut ctx = ParseContext::new(deployment());
    let produced = handler.parse_model(&model, &mut ctx).unwrap();

    assert!(!produced);
    assert!(ctx.definitions.is_empty());
    assert_eq!(
        ctx.diagnostics,
        vec![Diagnostic::NonExecutableProcess { process_id: "draft".into() }]
    );
    assert_eq!(ctx.diagnostics[0].severity(), Severity::Info);
    assert!(ctx.diagnostics[0].to_string().contains("isExecutable=\"true\""));
    assert_eq!(factory.call_count(), 0);
    assert!(compiler.seen.lock().unwrap().is_empty());
}

// ============================================================
// Definition builder
// ============================================================

#[test]
fn metadata_is_copied_from_model_and_deployment() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("invoice");
    model.name = Some(String::new());
    model.documentation = Some("  Handles invoices.\n".into());

    let mut ctx = ParseContext::new(deployment());
    assert!(handler.parse_model(&model, &mut ctx).unwrap());

    let record = &ctx.definitions[0];
    assert_eq!(record.key, "invoice");
    assert_eq!(record.name.as_deref(), Some(""));
    assert_eq!(record.category, "http://example.org/orders");
    assert_eq!(record.description.as_deref(), Some("  Handles invoices.\n"));
    assert_eq!(record.deployment_id, "dep-42");
    assert_eq!(record.engine_version, None);
    assert!(record.io_specification.is_none());
}

#[test]
fn engine_version_is_copied_only_when_reported() {
    let handler = ProcessParseHandler::default();
    let model = ProcessModel::new("p");

    let ctx = ParseContext::new(deployment().with_engine_version("7.1.0"));
    assert_eq!(handler.build(&model, &ctx).engine_version.as_deref(), Some("7.1.0"));

    let seeded = deployment().with_definition_factory(|| ProcessDefinitionRecord {
        engine_version: Some("legacy".into()),
        ..Default::default()
    });
    let ctx = ParseContext::new(seeded);
    assert_eq!(handler.build(&model, &ctx).engine_version.as_deref(), Some("legacy"));
}

// ============================================================
// Listener binding
// ============================================================

#[test]
fn unsupported_listeners_are_skipped_with_one_warning_each() {
    let (handler, factory, _) = recording_handler();
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![
        listener("class", "com.x.First", ""),
        listener("webhook", "http://hooks", ""),
        listener("delegateExpression", "${auditListener}", "TASK_CREATED"),
        listener("script", "print()", ""),
        listener("throwSignalEvent", "cancelled", "PROCESS_CANCELLED"),
    ];

    let mut ctx = ParseContext::new(deployment());
    ctx.current_flow_element = Some("startEvent1".into());
    handler.parse_model(&model, &mut ctx).unwrap();

    let registry = ctx.definitions[0].event_support.entries();
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry[0].listener,
        RuntimeListener::ClassDelegate { class_name: "com.x.First".into(), entity_type: None }
    );
    assert_eq!(
        registry[1].listener,
        RuntimeListener::DelegateExpression { expression: "${auditListener}".into(), entity_type: None }
    );
    assert_eq!(registry[1].filter, EventTypeFilter::Types(vec![EventType::TaskCreated]));
    assert_eq!(registry[2].filter, EventTypeFilter::Types(vec![EventType::ProcessCancelled]));

    let warnings: Vec<_> = ctx.warnings().cloned().collect();
    assert_eq!(
        warnings,
        vec![
            Diagnostic::UnsupportedListener {
                implementation_type: "webhook".into(),
                element_id: Some("startEvent1".into()),
            },
            Diagnostic::UnsupportedListener {
                implementation_type: "script".into(),
                element_id: Some("startEvent1".into()),
            },
        ]
    );
    assert_eq!(
        factory.methods(),
        vec![
            FactoryMethod::ClassDelegate,
            FactoryMethod::DelegateExpression,
            FactoryMethod::EventThrowing,
        ]
    );
}

#[test]
fn every_throw_variant_goes_through_the_event_throwing_factory_method() {
    let (handler, factory, _) = recording_handler();
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![
        listener("throwSignalEvent", "s", ""),
        listener("throwGlobalSignalEvent", "g", ""),
        listener("throwMessageEvent", "m", ""),
        listener("throwErrorEvent", "e", ""),
    ];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    assert_eq!(factory.methods(), vec![FactoryMethod::EventThrowing; 4]);
    assert_eq!(ctx.definitions[0].event_support.len(), 4);
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn listener_filters_are_not_merged_across_listeners() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![
        listener("class", "com.x.A", "TASK_CREATED"),
        listener("class", "com.x.B", "TASK_COMPLETED, TASK_COMPLETED"),
    ];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    let support = &ctx.definitions[0].event_support;
    assert_eq!(support.entries()[0].filter, EventTypeFilter::Types(vec![EventType::TaskCreated]));
    assert_eq!(
        support.entries()[1].filter,
        EventTypeFilter::Types(vec![EventType::TaskCompleted, EventType::TaskCompleted])
    );
    assert_eq!(support.listeners_for(EventType::TaskCreated).count(), 1);
}

#[test]
fn unknown_event_type_names_are_warned_about_but_listener_still_binds() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![listener("class", "com.x.A", "TASK_CRATED")];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    assert_eq!(ctx.definitions[0].event_support.entries()[0].filter, EventTypeFilter::All);
    assert_eq!(
        ctx.diagnostics,
        vec![Diagnostic::UnknownEventType { token: "TASK_CRATED".into(), element_id: None }]
    );
}

#[test]
fn unsupported_listener_reports_only_its_kind_even_with_a_bad_filter() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![
        listener("class", "com.x.A", ""),
        listener("webhook", "http://hooks", "TASK_CRATED"),
    ];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    assert_eq!(ctx.definitions[0].event_support.len(), 1);
    let warnings: Vec<_> = ctx.warnings().cloned().collect();
    assert_eq!(
        warnings,
        vec![Diagnostic::UnsupportedListener {
            implementation_type: "webhook".into(),
            element_id: None,
        }]
    );
}

#[test]
fn listener_factory_failure_aborts_the_process() {
    let factory = Arc::new(RecordingListenerFactory::failing(ListenerError::Creation("boom".into())));
    let handler = ProcessParseHandler::default().with_listener_factory(factory.clone());
    let mut model = ProcessModel::new("p");
    model.event_listeners = vec![listener("class", "com.x.A", ""), listener("class", "com.x.B", "")];

    let mut ctx = ParseContext::new(deployment());
    let result = handler.parse_model(&model, &mut ctx);

    assert!(matches!(result, Err(ParseError::Listener(ListenerError::Creation(_)))));
    assert_eq!(factory.call_count(), 1);
    assert!(ctx.definitions.is_empty());
}

// ============================================================
// Expressions, variables, I/O contract
// ============================================================

#[test]
fn candidate_starters_are_compiled_in_order_without_dedup() {
    let (handler, _, compiler) = recording_handler();
    let mut model = ProcessModel::new("p");
    model.candidate_starter_users = vec!["u1".into(), "u2".into(), "u1".into()];
    model.candidate_starter_groups = vec!["g1".into()];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    let record = &ctx.definitions[0];
    assert_eq!(
        record.candidate_starter_user_expressions,
        vec![compile("u1"), compile("u2"), compile("u1")]
    );
    assert_eq!(record.candidate_starter_group_expressions, vec![compile("g1")]);
    assert_eq!(*compiler.seen.lock().unwrap(), vec!["u1", "u2", "u1", "g1"]);
}

#[test]
fn existing_variables_are_never_overwritten() {
    let handler = ProcessParseHandler::default();
    let seeded = deployment().with_definition_factory(|| ProcessDefinitionRecord {
        variables: Variables::from([("a".to_string(), json!(1))]),
        ..Default::default()
    });
    let mut model = ProcessModel::new("p");
    model.data_objects = vec![int_object("a", 2), int_object("b", 3)];

    let mut ctx = ParseContext::new(seeded);
    handler.parse_model(&model, &mut ctx).unwrap();

    assert_eq!(
        ctx.definitions[0].variables,
        Variables::from([("a".to_string(), json!(1)), ("b".to_string(), json!(3))])
    );
}

#[test]
fn io_contract_presence_mirrors_the_model() {
    let handler = ProcessParseHandler::default();
    let without = ProcessModel::new("plain");
    let mut with = ProcessModel::new("typed");
    with.io_specification = Some(IoSpecification {
        data_inputs: vec![DataSpec {
            id: "orderIn".into(),
            name: None,
            item_subject_ref: None,
            is_collection: false,
        }],
        data_input_refs: vec!["orderIn".into()],
        ..Default::default()
    });

    let mut ctx = ParseContext::new(deployment());
    handler.parse_all([&without, &with], &mut ctx).unwrap();

    assert!(ctx.definitions[0].io_specification.is_none());
    let contract = ctx.definitions[1].io_specification.as_ref().expect("contract attached");
    assert_eq!(contract.input_refs, vec!["http://example.org/orders:orderIn"]);
}

#[test]
fn compile_error_propagates_and_leaves_no_record() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.candidate_starter_groups = vec!["${unterminated".into()];

    let mut ctx = ParseContext::new(deployment());
    let result = handler.parse_model(&model, &mut ctx);

    assert!(matches!(result, Err(ParseError::Expression(ExpressionError::Unterminated { .. }))));
    assert!(ctx.definitions.is_empty());
}

#[test]
fn data_object_error_propagates_and_leaves_no_record() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.data_objects = vec![DataObject {
        id: "do_amount".into(),
        name: "amount".into(),
        item_subject_ref: Some("xsd:int".into()),
        value: Some("ten".into()),
    }];

    let mut ctx = ParseContext::new(deployment());
    let result = handler.parse_model(&model, &mut ctx);

    assert!(matches!(result, Err(ParseError::DataObject(_))));
    assert!(ctx.definitions.is_empty());
}

#[test]
fn io_specification_error_propagates_and_leaves_no_record() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("p");
    model.io_specification = Some(IoSpecification {
        data_input_refs: vec!["undeclaredInput".into()],
        ..Default::default()
    });

    let mut ctx = ParseContext::new(deployment());
    let result = handler.parse_model(&model, &mut ctx);

    assert!(matches!(result, Err(ParseError::IoSpecification(_))));
    assert!(ctx.definitions.is_empty());
}

// ============================================================
// Batch parsing
// ============================================================

fn broken_flow_model(id: &str) -> ProcessModel {
    let mut model = ProcessModel::new(id);
    model.flow_elements = vec![FlowElement::new(
        "f1",
        FlowElementKind::SequenceFlow {
            source_ref: "nowhere".into(),
            target_ref: "nowhere".into(),
            condition_expression: None,
        },
    )];
    model
}

#[test]
fn batch_stops_at_first_failure_by_default() {
    let handler = ProcessParseHandler::default();
    let models = [ProcessModel::new("first"), broken_flow_model("broken"), ProcessModel::new("last")];

    let mut ctx = ParseContext::new(deployment());
    let result = handler.parse_all(&models, &mut ctx);

    assert!(matches!(result, Err(ParseError::Flow(_))));
    let keys: Vec<_> = ctx.definitions.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["first"]);
}

#[test]
fn batch_can_continue_past_failures() {
    let handler = ProcessParseHandler::new(HandlerConfig { continue_on_error: true });
    let mut draft = ProcessModel::new("draft");
    draft.executable = false;
    let models = [ProcessModel::new("first"), broken_flow_model("broken"), draft, ProcessModel::new("last")];

    let mut ctx = ParseContext::new(deployment());
    let summary = handler.parse_all(&models, &mut ctx).unwrap();

    assert_eq!(summary.produced, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].process_id, "broken");
    let keys: Vec<_> = ctx.definitions.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["first", "last"]);
}

// ============================================================
// End-to-end scenario
// ============================================================

#[test]
fn order_process_scenario() {
    let handler = ProcessParseHandler::default();
    let mut model = ProcessModel::new("orderProcess");
    model.name = Some("Order".into());
    model.event_listeners = vec![listener("class", "com.x.Listener", "")];
    model.candidate_starter_users = vec!["kermit".into()];
    model.data_objects = vec![int_object("amount", 10)];

    let mut ctx = ParseContext::new(deployment());
    handler.parse_model(&model, &mut ctx).unwrap();

    assert_eq!(ctx.definitions.len(), 1);
    let record = &ctx.definitions[0];
    assert_eq!(record.key, "orderProcess");
    assert_eq!(record.name.as_deref(), Some("Order"));
    assert_eq!(record.event_support.len(), 1);
    assert_eq!(
        record.event_support.entries()[0].listener,
        RuntimeListener::ClassDelegate { class_name: "com.x.Listener".into(), entity_type: None }
    );
    assert_eq!(record.event_support.entries()[0].filter, EventTypeFilter::All);
    assert_eq!(record.candidate_starter_user_expressions, vec![compile("kermit")]);
    assert_eq!(record.variables, Variables::from([("amount".to_string(), json!(10))]));
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn process_document_json_feeds_the_handler() {
    let doc: crate::ProcessDocument = serde_json::from_value(json!({
        "targetNamespace": "http://example.org/orders",
        "processes": [{
            "id": "orderProcess",
            "name": "Order",
            "eventListeners": [{ "implementationType": "class", "implementation": "com.x.Listener" }],
            "flowElements": [
                { "id": "start", "type": "startEvent" },
                { "id": "end", "type": "endEvent" },
                { "id": "f1", "type": "sequenceFlow", "sourceRef": "start", "targetRef": "end" }
            ]
        }, {
            "id": "sketch",
            "isExecutable": false
        }]
    }))
    .unwrap();

    let handler = ProcessParseHandler::default();
    let mut ctx = ParseContext::new(DeploymentContext::new("dep-1", doc.target_namespace.clone()));
    let summary = handler.parse_all(&doc.processes, &mut ctx).unwrap();

    assert_eq!((summary.produced, summary.skipped), (1, 1));
    assert_eq!(ctx.definitions[0].category, "http://example.org/orders");
    assert_eq!(ctx.current_flow_element.as_deref(), Some("f1"));
}

#[test]
fn implementation_type_tags_map_onto_the_closed_enum() {
    let decl = listener("throwErrorEvent", "E42", "");
    assert_eq!(decl.implementation_type, ImplementationType::ThrowErrorEvent);
}
