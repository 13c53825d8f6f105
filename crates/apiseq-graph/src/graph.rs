//! Dependency graph storage and queries
//!
//! Nodes and edges are only added by [`crate::GraphBuilder`]; once built the
//! graph is read-only. Every query returns results in insertion order so
//! that two builds of the same document answer identically.

use crate::types::{EndpointKey, EndpointNode, Node, Relation, RelationKind};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// One edge rendered with node labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeView<'a> {
    /// Source label
    pub source: String,
    /// Target label
    pub target: String,
    /// Edge metadata
    pub relation: &'a Relation,
}

/// Typed object/endpoint graph
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    inner: DiGraph<Node, Relation>,
    objects: IndexMap<String, NodeIndex>,
    endpoints: IndexMap<EndpointKey, NodeIndex>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add an object node, returning the existing one for a repeated name
    pub(crate) fn add_object(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.objects.get(name) {
            return index;
        }
        let index = self.inner.add_node(Node::Object(name.to_string()));
        self.objects.insert(name.to_string(), index);
        index
    }

    /// Add an endpoint node
    pub(crate) fn add_endpoint(&mut self, endpoint: EndpointNode) -> NodeIndex {
        if let Some(&index) = self.endpoints.get(&endpoint.key) {
            return index;
        }
        let key = endpoint.key.clone();
        let index = self.inner.add_node(Node::Endpoint(endpoint));
        self.endpoints.insert(key, index);
        index
    }

    /// Object → Object property edge
    ///
    /// Returns false when either object is unknown or the edge already exists.
    pub(crate) fn add_property(
        &mut self,
        owner: &str,
        target: &str,
        property_name: &str,
        is_list: bool,
    ) -> bool {
        let (Some(&from), Some(&to)) = (self.objects.get(owner), self.objects.get(target)) else {
            return false;
        };
        self.connect(
            from,
            to,
            Relation::Property {
                property_name: property_name.to_string(),
                is_list,
            },
        )
    }

    /// Object → Endpoint edge (request body or parameter)
    pub(crate) fn add_input(
        &mut self,
        object: &str,
        endpoint: &EndpointKey,
        relation: Relation,
    ) -> bool {
        debug_assert!(matches!(
            relation.kind(),
            RelationKind::RequestBody | RelationKind::Parameter
        ));
        let (Some(&from), Some(&to)) = (self.objects.get(object), self.endpoints.get(endpoint))
        else {
            return false;
        };
        self.connect(from, to, relation)
    }

    /// Endpoint → Object response edge
    pub(crate) fn add_response(
        &mut self,
        endpoint: &EndpointKey,
        object: &str,
        status_code: &str,
    ) -> bool {
        let (Some(&from), Some(&to)) = (self.endpoints.get(endpoint), self.objects.get(object))
        else {
            return false;
        };
        self.connect(
            from,
            to,
            Relation::Response {
                status_code: status_code.to_string(),
            },
        )
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex, relation: Relation) -> bool {
        let exists = self
            .inner
            .edges_directed(from, Direction::Outgoing)
            .any(|edge| edge.target() == to && *edge.weight() == relation);
        if exists {
            return false;
        }
        self.inner.add_edge(from, to, relation);
        true
    }

    /// Number of object nodes
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of endpoint nodes
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Number of edges of every kind
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Object names in schema declaration order
    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// True if `name` is an object node
    #[must_use]
    pub fn contains_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Endpoints in path then operation declaration order
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointNode> {
        self.endpoints
            .values()
            .filter_map(|&index| match &self.inner[index] {
                Node::Endpoint(endpoint) => Some(endpoint),
                Node::Object(_) => None,
            })
    }

    /// Endpoint by key
    #[must_use]
    pub fn endpoint(&self, key: &EndpointKey) -> Option<&EndpointNode> {
        match self.endpoints.get(key).map(|&index| &self.inner[index]) {
            Some(Node::Endpoint(endpoint)) => Some(endpoint),
            _ => None,
        }
    }

    /// Outgoing property edges of `object` as `(target, relation)`
    #[must_use]
    pub fn properties(&self, object: &str) -> Vec<(&str, &Relation)> {
        let Some(&index) = self.objects.get(object) else {
            return Vec::new();
        };
        self.sorted_edges(index, Direction::Outgoing)
            .into_iter()
            .filter(|(_, _, relation)| relation.kind() == RelationKind::Property)
            .filter_map(|(_, other, relation)| self.object_name(other).map(|name| (name, relation)))
            .collect()
    }

    /// Objects touching `endpoint` as `(object, relation)`
    ///
    /// Request-body edges come first, then parameter edges, then response
    /// edges; insertion order within each kind.
    #[must_use]
    pub fn endpoint_relations(&self, endpoint: &EndpointKey) -> Vec<(&str, &Relation)> {
        let Some(&index) = self.endpoints.get(endpoint) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .sorted_edges(index, Direction::Incoming)
            .into_iter()
            .chain(self.sorted_edges(index, Direction::Outgoing))
            .collect();
        edges.sort_by_key(|(id, _, relation)| (relation.kind(), *id));
        edges
            .into_iter()
            .filter_map(|(_, other, relation)| self.object_name(other).map(|name| (name, relation)))
            .collect()
    }

    /// Endpoints touching `object` as `(endpoint, relation)`
    ///
    /// Ordered by endpoint declaration, then relation kind, then insertion.
    #[must_use]
    pub fn object_relations(&self, object: &str) -> Vec<(&EndpointKey, &Relation)> {
        let Some(&index) = self.objects.get(object) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .sorted_edges(index, Direction::Outgoing)
            .into_iter()
            .chain(self.sorted_edges(index, Direction::Incoming))
            .filter(|(_, _, relation)| relation.kind() != RelationKind::Property)
            .collect();
        edges.sort_by_key(|(id, other, relation)| (*other, relation.kind(), *id));
        edges
            .into_iter()
            .filter_map(|(_, other, relation)| match &self.inner[other] {
                Node::Endpoint(endpoint) => Some((&endpoint.key, relation)),
                Node::Object(_) => None,
            })
            .collect()
    }

    /// True if an edge of `kind` joins `object` and `endpoint` in either direction
    #[must_use]
    pub fn has_relation(&self, object: &str, endpoint: &EndpointKey, kind: RelationKind) -> bool {
        self.endpoint_relations(endpoint)
            .iter()
            .any(|(name, relation)| *name == object && relation.kind() == kind)
    }

    /// Every edge, in insertion order, with node labels
    #[must_use]
    pub fn edges(&self) -> Vec<EdgeView<'_>> {
        self.inner
            .edge_indices()
            .filter_map(|id| {
                let (source, target) = self.inner.edge_endpoints(id)?;
                Some(EdgeView {
                    source: self.inner[source].label(),
                    target: self.inner[target].label(),
                    relation: &self.inner[id],
                })
            })
            .collect()
    }

    /// Underlying petgraph graph
    #[inline]
    #[must_use]
    pub fn as_petgraph(&self) -> &DiGraph<Node, Relation> {
        &self.inner
    }

    fn object_name(&self, index: NodeIndex) -> Option<&str> {
        match &self.inner[index] {
            Node::Object(name) => Some(name),
            Node::Endpoint(_) => None,
        }
    }

    // petgraph walks adjacency lists newest-first; sort back to insertion order
    fn sorted_edges(
        &self,
        index: NodeIndex,
        direction: Direction,
    ) -> Vec<(EdgeIndex, NodeIndex, &Relation)> {
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(index, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other, edge.weight())
            })
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
    }
}
