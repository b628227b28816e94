//! Flow-element and artifact processing.
//!
//! The transformer hands a process's flow elements and artifacts to a
//! [`FlowElementProcessor`].  The stock [`StructuralFlowProcessor`] walks
//! them recursively and enforces:
//! 1. Element IDs are unique across the whole process, sub-processes included.
//! 2. Every sequence flow references elements of its own scope (both
//!    `sourceRef` and `targetRef`).
//!
//! Associations pointing at unknown elements are reported as warnings.

use std::collections::HashSet;

use tracing::debug;

use crate::context::{Diagnostic, ParseContext};
use crate::error::FlowError;
use crate::models::{Artifact, ArtifactKind, FlowElement, FlowElementKind};

/// Handles the child elements of a process.
pub trait FlowElementProcessor: Send + Sync {
    fn process_flow_elements(
        &self,
        elements: &[FlowElement],
        ctx: &mut ParseContext,
    ) -> Result<(), FlowError>;

    /// `scope` holds the flow elements the artifacts were declared alongside.
    fn process_artifacts(
        &self,
        artifacts: &[Artifact],
        scope: &[FlowElement],
        ctx: &mut ParseContext,
    ) -> Result<(), FlowError>;
}

/// The stock [`FlowElementProcessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralFlowProcessor;

fn collect_ids<'a>(elements: &'a [FlowElement], seen: &mut HashSet<&'a str>) -> Result<(), FlowError> {
    for element in elements {
        if !seen.insert(element.id.as_str()) {
            return Err(FlowError::DuplicateElementId(element.id.clone()));
        }
        if let FlowElementKind::SubProcess { flow_elements, .. } = &element.kind {
            collect_ids(flow_elements, seen)?;
        }
    }
    Ok(())
}

impl StructuralFlowProcessor {
    fn walk(&self, elements: &[FlowElement], ctx: &mut ParseContext) -> Result<(), FlowError> {
        let scope: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();

        for element in elements {
            ctx.current_flow_element = Some(element.id.clone());

            match &element.kind {
                FlowElementKind::SequenceFlow { source_ref, target_ref, .. } => {
                    if !scope.contains(source_ref.as_str()) {
                        return Err(FlowError::UnknownElementReference {
                            flow_id: element.id.clone(),
                            element_id: source_ref.clone(),
                            side: "source",
                        });
                    }
                    if !scope.contains(target_ref.as_str()) {
                        return Err(FlowError::UnknownElementReference {
                            flow_id: element.id.clone(),
                            element_id: target_ref.clone(),
                            side: "target",
                        });
                    }
                }
                FlowElementKind::SubProcess { flow_elements, artifacts } => {
                    debug!("entering sub-process '{}'", element.id);
                    self.walk(flow_elements, ctx)?;
                    self.process_artifacts(artifacts, flow_elements, ctx)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl FlowElementProcessor for StructuralFlowProcessor {
    fn process_flow_elements(
        &self,
        elements: &[FlowElement],
        ctx: &mut ParseContext,
    ) -> Result<(), FlowError> {
        let mut seen = HashSet::new();
        collect_ids(elements, &mut seen)?;
        self.walk(elements, ctx)
    }

    fn process_artifacts(
        &self,
        artifacts: &[Artifact],
        scope: &[FlowElement],
        ctx: &mut ParseContext,
    ) -> Result<(), FlowError> {
        let known: HashSet<&str> = scope
            .iter()
            .map(|e| e.id.as_str())
            .chain(artifacts.iter().map(|a| a.id.as_str()))
            .collect();

        for artifact in artifacts {
            if let ArtifactKind::Association { source_ref, target_ref } = &artifact.kind {
                for end in [source_ref, target_ref] {
                    if !known.contains(end.as_str()) {
                        ctx.report(Diagnostic::DanglingAssociation {
                            association_id: artifact.id.clone(),
                            element_id: end.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
