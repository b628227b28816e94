//! Process model types.
//!
//! These are the already-parsed, document-shaped input of the transformer.
//! They deserialize from the camelCase JSON the CLI reads and are never
//! mutated by the engine.

use serde::{Deserialize, Serialize};

pub use listeners::EventListenerDeclaration;

// ---------------------------------------------------------------------------
// ProcessDocument
// ---------------------------------------------------------------------------

/// A parsed definitions document: one namespace, several processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocument {
    #[serde(default)]
    pub target_namespace: String,
    #[serde(default)]
    pub item_definitions: Vec<ItemDefinition>,
    pub processes: Vec<ProcessModel>,
}

/// A named data type that data inputs/outputs refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub id: String,
    pub structure_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_kind: Option<String>,
}

// ---------------------------------------------------------------------------
// ProcessModel
// ---------------------------------------------------------------------------

fn executable_by_default() -> bool {
    true
}

/// A single declared process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "executable_by_default", rename = "isExecutable")]
    pub executable: bool,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub candidate_starter_users: Vec<String>,
    #[serde(default)]
    pub candidate_starter_groups: Vec<String>,
    #[serde(default)]
    pub event_listeners: Vec<EventListenerDeclaration>,
    #[serde(default)]
    pub data_objects: Vec<DataObject>,
    #[serde(default)]
    pub flow_elements: Vec<FlowElement>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub io_specification: Option<IoSpecification>,
}

impl ProcessModel {
    /// Convenience constructor for testing: an executable process with
    /// nothing declared.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            executable: true,
            documentation: None,
            candidate_starter_users: Vec::new(),
            candidate_starter_groups: Vec::new(),
            event_listeners: Vec::new(),
            data_objects: Vec::new(),
            flow_elements: Vec::new(),
            artifacts: Vec::new(),
            io_specification: None,
        }
    }
}

// ---------------------------------------------------------------------------
// DataObject
// ---------------------------------------------------------------------------

/// A named value declared on the process, used to seed process variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub id: String,
    pub name: String,
    /// Type reference such as `xsd:string` or `xsd:int`.
    #[serde(default)]
    pub item_subject_ref: Option<String>,
    /// Declared initial value, as written in the document.
    #[serde(default)]
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Flow elements and artifacts
// ---------------------------------------------------------------------------

/// A node or sequence flow inside a process (or sub-process).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowElement {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: FlowElementKind,
}

impl FlowElement {
    pub fn new(id: impl Into<String>, kind: FlowElementKind) -> Self {
        Self { id: id.into(), name: None, kind }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowElementKind {
    StartEvent,
    EndEvent,
    UserTask,
    ServiceTask,
    ScriptTask,
    ExclusiveGateway,
    ParallelGateway,
    #[serde(rename_all = "camelCase")]
    SequenceFlow {
        source_ref: String,
        target_ref: String,
        #[serde(default)]
        condition_expression: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubProcess {
        #[serde(default)]
        flow_elements: Vec<FlowElement>,
        #[serde(default)]
        artifacts: Vec<Artifact>,
    },
}

/// Non-executable annotation attached to a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    #[serde(flatten)]
    pub kind: ArtifactKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArtifactKind {
    TextAnnotation {
        #[serde(default)]
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Association {
        source_ref: String,
        target_ref: String,
    },
}

// ---------------------------------------------------------------------------
// IoSpecification
// ---------------------------------------------------------------------------

/// Declared inputs and outputs of a process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoSpecification {
    #[serde(default)]
    pub data_inputs: Vec<DataSpec>,
    #[serde(default)]
    pub data_outputs: Vec<DataSpec>,
    #[serde(default)]
    pub data_input_refs: Vec<String>,
    #[serde(default)]
    pub data_output_refs: Vec<String>,
}

/// One declared data input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub item_subject_ref: Option<String>,
    #[serde(default)]
    pub is_collection: bool,
}
