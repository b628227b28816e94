//! The runtime-ready process definition record produced by the transformer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use listeners::EventSupport;

use crate::models::ItemDefinition;
use crate::Expression;

/// Initial process variables: name → value.
pub type Variables = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// ProcessDefinitionRecord
// ---------------------------------------------------------------------------

/// A process definition ready to be registered with the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDefinitionRecord {
    pub key: String,
    pub name: Option<String>,
    /// Target namespace of the deployment the process came from.
    pub category: String,
    pub description: Option<String>,
    pub deployment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    pub event_support: EventSupport,
    pub candidate_starter_user_expressions: Vec<Expression>,
    pub candidate_starter_group_expressions: Vec<Expression>,
    pub variables: Variables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_specification: Option<IoContract>,
}

impl ProcessDefinitionRecord {
    /// Add `extracted` to the record's variables.  Keys the record already
    /// carries keep their value.
    pub fn merge_variables(&mut self, extracted: Variables) {
        for (name, value) in extracted {
            self.variables.entry(name).or_insert(value);
        }
    }
}

// ---------------------------------------------------------------------------
// IoContract
// ---------------------------------------------------------------------------

/// A data input or output bound into the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    /// `{namespace}:{id}`.
    pub id: String,
    pub name: Option<String>,
    pub definition: Option<ItemDefinition>,
    pub is_collection: bool,
}

/// Runtime view of a process's declared inputs and outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoContract {
    pub inputs: Vec<DataItem>,
    pub outputs: Vec<DataItem>,
    pub input_refs: Vec<String>,
    pub output_refs: Vec<String>,
}
