//! Read-side aggregation of graph, CRUD map and plans into views

use apiseq_graph::{DependencyGraph, EndpointKey};
use apiseq_sequence::{CrudMap, SequencePlan};
use indexmap::{IndexMap, IndexSet};

use crate::views::{CrudLists, CrudReport, EndpointPlan, EndpointReport, ObjectUsageReport};

fn labels(keys: &[EndpointKey]) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}

/// Object usage view
///
/// Every object gets an entry, even with no endpoints. An endpoint appears
/// under [`NO_OBJECT`](crate::NO_OBJECT) when no object touches it.
#[must_use]
pub fn object_usage(graph: &DependencyGraph) -> ObjectUsageReport {
    let mut touched: IndexSet<&EndpointKey> = IndexSet::new();
    let mut objects = IndexMap::with_capacity(graph.object_count());

    for object in graph.objects() {
        let mut endpoints: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, relation) in graph.object_relations(object) {
            touched.insert(key);
            endpoints
                .entry(key.to_string())
                .or_default()
                .push(relation.to_string());
        }
        objects.insert(object.to_string(), endpoints);
    }

    let no_object = graph
        .endpoints()
        .filter(|endpoint| !touched.contains(&endpoint.key))
        .map(|endpoint| endpoint.key.to_string())
        .collect();

    ObjectUsageReport { objects, no_object }
}

/// CRUD view, a direct rendering of `crud`
#[must_use]
pub fn crud_view(crud: &CrudMap) -> CrudReport {
    let objects = crud
        .iter()
        .map(|(name, entry)| {
            (
                name.to_string(),
                CrudLists {
                    create: labels(&entry.create),
                    read: labels(&entry.read),
                    update: labels(&entry.update),
                    delete: labels(&entry.delete),
                },
            )
        })
        .collect();
    CrudReport {
        objects,
        no_object: labels(crud.unclassified()),
    }
}

/// Sequence plan view, keyed by endpoint
#[must_use]
pub fn endpoint_view(plans: &IndexMap<EndpointKey, SequencePlan>) -> EndpointReport {
    let endpoints = plans
        .iter()
        .map(|(key, plan)| {
            (
                key.to_string(),
                EndpointPlan {
                    connected_with_objects: plan.connected_with_objects.clone(),
                    preparation: plan.preparation.clone(),
                    dismantling: plan.dismantling.clone(),
                    sequence_length: plan.sequence_length,
                    truncated: plan.truncated,
                },
            )
        })
        .collect();
    EndpointReport { endpoints }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiseq_graph::build_graph;
    use apiseq_test_utils as fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn usage_tags_per_endpoint() {
        let graph = build_graph(&fixtures::scenario_orders());
        let usage = object_usage(&graph);

        let order = &usage.objects["Order"];
        assert_eq!(order["/orders, post"], vec!["IN_REQUEST_BODY", "IN_RESPONSE_BODY - 201"]);
        assert_eq!(
            order["/orders/{orderId}, get"],
            vec!["IS_PARAMETER - orderId - id", "IN_RESPONSE_BODY - 200"]
        );
        assert_eq!(order["/orders/{orderId}, delete"], vec!["IS_PARAMETER - orderId - id"]);
        assert!(usage.objects["Customer"].is_empty());
        assert!(usage.no_object.is_empty());
    }

    #[test]
    fn unreferenced_objects_still_listed() {
        let graph = build_graph(&fixtures::scenario_unreferenced());
        let usage = object_usage(&graph);
        assert_eq!(usage.objects.keys().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);
        assert_eq!(usage.no_object, vec!["/health, get", "/metrics, post"]);

        let crud = crud_view(&CrudMap::classify(&graph));
        assert_eq!(crud.objects["Alpha"], CrudLists::default());
        assert_eq!(crud.objects["Beta"], CrudLists::default());
        assert_eq!(crud.no_object, vec!["/health, get", "/metrics, post"]);
    }
}
