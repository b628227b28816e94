//! I/O contract construction from a declared I/O specification.

use crate::context::DeploymentContext;
use crate::definition::{DataItem, IoContract};
use crate::error::IoSpecificationError;
use crate::models::{DataSpec, IoSpecification};

/// Builds the runtime [`IoContract`] for a declared [`IoSpecification`].
pub trait IoContractBuilder: Send + Sync {
    fn build(
        &self,
        specification: &IoSpecification,
        deployment: &DeploymentContext,
    ) -> Result<IoContract, IoSpecificationError>;
}

/// The stock [`IoContractBuilder`].
///
/// Ids are qualified with the deployment's target namespace and item
/// definitions are looked up by `itemSubjectRef`.  Refs must name a declared
/// input/output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedIoContractBuilder;

fn qualify(namespace: &str, id: &str) -> String {
    format!("{namespace}:{id}")
}

fn data_item(spec: &DataSpec, deployment: &DeploymentContext) -> DataItem {
    DataItem {
        id: qualify(&deployment.target_namespace, &spec.id),
        name: spec.name.clone(),
        definition: spec
            .item_subject_ref
            .as_ref()
            .and_then(|r| deployment.item_definitions.get(r))
            .cloned(),
        is_collection: spec.is_collection,
    }
}

fn qualified_refs(
    refs: &[String],
    declared: &[DataSpec],
    side: &'static str,
    namespace: &str,
) -> Result<Vec<String>, IoSpecificationError> {
    refs.iter()
        .map(|r| {
            if declared.iter().any(|d| &d.id == r) {
                Ok(qualify(namespace, r))
            } else {
                Err(IoSpecificationError::UnknownRef { reference: r.clone(), side })
            }
        })
        .collect()
}

impl IoContractBuilder for NamespacedIoContractBuilder {
    fn build(
        &self,
        specification: &IoSpecification,
        deployment: &DeploymentContext,
    ) -> Result<IoContract, IoSpecificationError> {
        let namespace = deployment.target_namespace.as_str();
        Ok(IoContract {
            inputs: specification.data_inputs.iter().map(|d| data_item(d, deployment)).collect(),
            outputs: specification.data_outputs.iter().map(|d| data_item(d, deployment)).collect(),
            input_refs: qualified_refs(
                &specification.data_input_refs,
                &specification.data_inputs,
                "input",
                namespace,
            )?,
            output_refs: qualified_refs(
                &specification.data_output_refs,
                &specification.data_outputs,
                "output",
                namespace,
            )?,
        })
    }
}
