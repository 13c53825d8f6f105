//! Objects an endpoint depends on and the order they must exist in

use apiseq_graph::{DependencyGraph, EndpointKey};
use indexmap::IndexSet;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

use crate::error::{SequenceError, SequenceResult};

/// Default bound on property walk length, in edges
pub const DEFAULT_MAX_PROPERTY_DEPTH: usize = 32;

/// Connected objects and must-precede pairs of one endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Directly connected objects and everything reachable through
    /// properties, in first-seen order
    pub connected_objects: Vec<String>,
    /// `(a, b)`: `a` must exist before `b`
    pub must_precede: Vec<(String, String)>,
}

impl Dependencies {
    /// `must_precede` as index pairs into `connected_objects`
    #[must_use]
    pub fn index_constraints(&self) -> Vec<(usize, usize)> {
        let position = |name: &str| self.connected_objects.iter().position(|o| o == name);
        self.must_precede
            .iter()
            .filter_map(|(before, after)| Some((position(before)?, position(after)?)))
            .collect()
    }
}

/// Walks property edges from the objects an endpoint touches
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver {
    max_property_depth: usize,
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROPERTY_DEPTH)
    }
}

impl DependencyResolver {
    /// Create a resolver with the given walk bound
    #[inline]
    #[must_use]
    pub fn new(max_property_depth: usize) -> Self {
        Self { max_property_depth }
    }

    /// Resolve the dependencies of `endpoint`
    ///
    /// # Errors
    ///
    /// [`SequenceError::UnknownEndpoint`] if `endpoint` is not in `graph`.
    pub fn resolve(
        &self,
        graph: &DependencyGraph,
        endpoint: &EndpointKey,
    ) -> SequenceResult<Dependencies> {
        if graph.endpoint(endpoint).is_none() {
            return Err(SequenceError::unknown_endpoint(endpoint));
        }

        let direct: IndexSet<&str> = graph
            .endpoint_relations(endpoint)
            .into_iter()
            .map(|(object, _)| object)
            .collect();

        let mut connected: IndexSet<&str> = IndexSet::new();
        let mut must_precede: IndexSet<(&str, &str)> = IndexSet::new();
        for object in direct {
            connected.insert(object);
            for path in self.property_paths(graph, object) {
                connected.extend(path.iter().copied());
                let reversed: Vec<&str> = path.into_iter().rev().collect();
                for pair in reversed.windows(2) {
                    must_precede.insert((pair[0], pair[1]));
                }
            }
        }

        let must_precede = acyclic_pairs(must_precede);
        Ok(Dependencies {
            connected_objects: connected.into_iter().map(str::to_string).collect(),
            must_precede: must_precede
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        })
    }

    /// Every maximal property walk starting at `start`
    ///
    /// A walk ends where the last object has no property edge to an object
    /// not already on the walk, or where it reaches the depth bound. An
    /// object without property edges yields the single walk `[start]`.
    #[must_use]
    pub fn property_paths<'g>(
        &self,
        graph: &'g DependencyGraph,
        start: &'g str,
    ) -> Vec<Vec<&'g str>> {
        let mut paths = Vec::new();
        let mut walk = vec![start];
        self.walk(graph, &mut walk, &mut paths);
        paths
    }

    fn walk<'g>(
        &self,
        graph: &'g DependencyGraph,
        walk: &mut Vec<&'g str>,
        paths: &mut Vec<Vec<&'g str>>,
    ) {
        let Some(&last) = walk.last() else {
            return;
        };
        if walk.len() > self.max_property_depth {
            tracing::debug!(
                start = walk[0],
                depth = self.max_property_depth,
                "property walk cut at depth bound"
            );
            paths.push(walk.clone());
            return;
        }

        let next: IndexSet<&str> = graph
            .properties(last)
            .into_iter()
            .map(|(target, _)| target)
            .filter(|target| !walk.contains(target))
            .collect();
        if next.is_empty() {
            paths.push(walk.clone());
            return;
        }
        for target in next {
            walk.push(target);
            self.walk(graph, walk, paths);
            walk.pop();
        }
    }
}

/// Drop every pair whose two objects sit on a common cycle of pairs
///
/// Walks started from different objects of a reference cycle order the
/// cycle both ways. Those pairs can never all hold, so only pairs between
/// distinct strongly connected components are kept.
fn acyclic_pairs<'g>(pairs: IndexSet<(&'g str, &'g str)>) -> IndexSet<(&'g str, &'g str)> {
    let order: DiGraphMap<&str, ()> = DiGraphMap::from_edges(pairs.iter().copied());
    let component: HashMap<&str, usize> = tarjan_scc(&order)
        .into_iter()
        .enumerate()
        .flat_map(|(index, members)| members.into_iter().map(move |object| (object, index)))
        .collect();

    let total = pairs.len();
    let kept: IndexSet<(&str, &str)> = pairs
        .into_iter()
        .filter(|(before, after)| component.get(before) != component.get(after))
        .collect();
    if kept.len() < total {
        tracing::debug!(dropped = total - kept.len(), "cyclic must-precede pairs dropped");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiseq_graph::build_graph;
    use apiseq_test_utils as fixtures;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn orders_depend_on_customer() {
        let graph = build_graph(&fixtures::scenario_orders());
        let deps = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/orders", "post"))
            .unwrap();
        assert_eq!(deps.connected_objects, vec!["Order", "Customer"]);
        assert_eq!(deps.must_precede, vec![pair("Customer", "Order")]);
        assert_eq!(deps.index_constraints(), vec![(1, 0)]);
    }

    #[test]
    fn leaf_object_has_no_pairs() {
        let graph = build_graph(&fixtures::scenario_users());
        let deps = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/users", "post"))
            .unwrap();
        assert_eq!(deps.connected_objects, vec!["User"]);
        assert!(deps.must_precede.is_empty());
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let graph = build_graph(&fixtures::scenario_users());
        let err = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/missing", "get"))
            .unwrap_err();
        assert_eq!(err, SequenceError::UnknownEndpoint("/missing, get".into()));
    }

    #[test]
    fn branching_properties_yield_one_path_each() {
        let graph = build_graph(&fixtures::petstore());
        let paths = DependencyResolver::default().property_paths(&graph, "Pet");
        assert_eq!(paths, vec![vec!["Pet", "Category"], vec!["Pet", "Tag"]]);

        let deps = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/pet", "post"))
            .unwrap();
        assert_eq!(deps.connected_objects, vec!["Pet", "Category", "Tag"]);
        assert_eq!(
            deps.must_precede,
            vec![pair("Category", "Pet"), pair("Tag", "Pet")]
        );
    }

    #[test]
    fn cycles_terminate_without_self_pairs() {
        let model = fixtures::model(
            json!({
                "Node": {"properties": {"parent": fixtures::schema_ref("Node"), "peer": fixtures::schema_ref("Peer")}},
                "Peer": {"properties": {"node": fixtures::schema_ref("Node")}}
            }),
            json!({
                "/nodes": {"post": {"requestBody": {"content": fixtures::json_content(fixtures::schema_ref("Node"))}}}
            }),
        );
        let graph = build_graph(&model);
        let deps = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/nodes", "post"))
            .unwrap();
        assert_eq!(deps.connected_objects, vec!["Node", "Peer"]);
        assert_eq!(deps.must_precede, vec![pair("Peer", "Node")]);
        assert!(deps.must_precede.iter().all(|(a, b)| a != b));
    }

    #[test]
    fn mutual_references_leave_no_contradicting_pairs() {
        let graph = build_graph(&fixtures::scenario_mutual());
        let deps = DependencyResolver::default()
            .resolve(&graph, &EndpointKey::new("/pets", "post"))
            .unwrap();
        assert_eq!(deps.connected_objects, vec!["Pet", "Owner"]);
        assert!(deps.must_precede.is_empty());
    }

    #[test]
    fn pairs_outside_a_cycle_survive() {
        let pairs: IndexSet<(&str, &str)> = [
            ("Owner", "Pet"),
            ("Pet", "Owner"),
            ("Tag", "Pet"),
            ("C", "B"),
            ("B", "A"),
            ("A", "C"),
        ]
        .into_iter()
        .collect();
        let kept: Vec<(&str, &str)> = acyclic_pairs(pairs).into_iter().collect();
        assert_eq!(kept, vec![("Tag", "Pet")]);
    }

    #[test]
    fn chain_paths_are_bounded_by_depth() {
        let graph = build_graph(&fixtures::chain(6));
        let full = DependencyResolver::default().property_paths(&graph, "S0");
        assert_eq!(full, vec![vec!["S0", "S1", "S2", "S3", "S4", "S5"]]);

        let cut = DependencyResolver::new(2).property_paths(&graph, "S0");
        assert_eq!(cut, vec![vec!["S0", "S1", "S2"]]);
    }
}
