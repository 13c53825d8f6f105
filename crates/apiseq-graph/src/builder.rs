//! Graph Builder
//!
//! Turns a [`SpecModel`] into a [`DependencyGraph`] in three passes:
//! object nodes, property edges, then one endpoint per operation with its
//! request-body, parameter and response edges.
//!
//! Usage:
//! ```rust,ignore
//! let graph = GraphBuilder::new(&model).build();
//! ```

use apiseq_model::{lookup, ref_at, Operation, SpecModel};
use serde_json::Value;

use crate::graph::DependencyGraph;
use crate::matcher::{content_objects, ObjectMatcher};
use crate::types::{EndpointKey, EndpointNode, Relation};

/// Builder for the dependency graph of one document
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    model: &'a SpecModel,
    matcher: ObjectMatcher<'a>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over `model`
    #[must_use]
    pub fn new(model: &'a SpecModel) -> Self {
        Self {
            model,
            matcher: ObjectMatcher::new(model),
        }
    }

    /// Build the graph
    #[must_use]
    pub fn build(self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();

        for (name, _) in self.model.schemas() {
            graph.add_object(name);
        }
        for (name, schema) in self.model.schemas() {
            self.add_properties(&mut graph, name, schema);
        }
        for operation in self.model.operations() {
            self.add_operation(&mut graph, operation);
        }

        tracing::info!(
            objects = graph.object_count(),
            endpoints = graph.endpoint_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );
        graph
    }

    fn add_properties(&self, graph: &mut DependencyGraph, owner: &str, schema: &Value) {
        let Some(properties) = lookup(schema, &["properties"]).and_then(Value::as_object) else {
            return;
        };
        for (property_name, property) in properties {
            let (target, is_list) = match ref_at(property, &[]) {
                Some(target) => (target, false),
                None => match ref_at(property, &["items"]) {
                    Some(target) => (target, true),
                    None => continue,
                },
            };
            if !graph.add_property(owner, target, property_name, is_list)
                && !graph.contains_object(target)
            {
                tracing::debug!(
                    owner,
                    property = %property_name,
                    target,
                    "dangling property reference"
                );
            }
        }
    }

    fn add_operation(&self, graph: &mut DependencyGraph, operation: &Operation) {
        let key = EndpointKey::new(&operation.path, &operation.method);
        let potential = self.matcher.potential_object(&operation.path);

        let parameters: Vec<_> = operation
            .parameters
            .iter()
            .map(|parameter| self.matcher.resolve_parameter(parameter, potential))
            .collect();

        tracing::debug!(
            endpoint = %key,
            potential = potential.unwrap_or(""),
            parameters = parameters.len(),
            "endpoint added"
        );

        graph.add_endpoint(EndpointNode {
            key: key.clone(),
            parameters: parameters.clone(),
        });

        if let Some(content) = operation.request_body_content() {
            for object in content_objects(content) {
                if !graph.add_input(object, &key, Relation::RequestBody)
                    && !graph.contains_object(object)
                {
                    tracing::debug!(endpoint = %key, object, "dangling request body reference");
                }
            }
        }

        for resolution in parameters.iter().filter(|r| r.is_resolved()) {
            graph.add_input(
                &resolution.object_name,
                &key,
                Relation::Parameter {
                    parameter_name: resolution.parameter_name.clone(),
                    property_name: resolution.property_name.clone(),
                },
            );
        }

        for (status, content) in operation.responses() {
            let Some(content) = content else { continue };
            for object in content_objects(content) {
                if !graph.add_response(&key, object, status) && !graph.contains_object(object) {
                    tracing::debug!(endpoint = %key, status, object, "dangling response reference");
                }
            }
        }
    }
}
