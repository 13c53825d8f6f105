//! CRUD classification of endpoints per object

use apiseq_graph::{DependencyGraph, EndpointKey, RelationKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Lifecycle operation an endpoint performs on an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    /// Brings the object into existence
    Create,
    /// Returns the object
    Read,
    /// Modifies the object
    Update,
    /// Removes the object
    Delete,
}

impl CrudOperation {
    /// All operations in report order
    pub const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation implied by one endpoint/object relation
///
/// `post` creates when the object is sent or addresses the call, `get`
/// reads when the object is returned, `put`/`patch` update and `delete`
/// deletes whatever the relation.
#[must_use]
pub fn classify_relation(operation: &str, kind: RelationKind) -> Option<CrudOperation> {
    match (operation, kind) {
        ("post", RelationKind::RequestBody | RelationKind::Parameter) => {
            Some(CrudOperation::Create)
        }
        ("get", RelationKind::Response) => Some(CrudOperation::Read),
        ("put" | "patch", _) => Some(CrudOperation::Update),
        ("delete", _) => Some(CrudOperation::Delete),
        _ => None,
    }
}

/// Endpoints of one object, by operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrudEntry {
    /// Create endpoints
    pub create: Vec<EndpointKey>,
    /// Read endpoints
    pub read: Vec<EndpointKey>,
    /// Update endpoints
    pub update: Vec<EndpointKey>,
    /// Delete endpoints
    pub delete: Vec<EndpointKey>,
}

impl CrudEntry {
    /// Endpoints for `operation`
    #[must_use]
    pub fn get(&self, operation: CrudOperation) -> &[EndpointKey] {
        match operation {
            CrudOperation::Create => &self.create,
            CrudOperation::Read => &self.read,
            CrudOperation::Update => &self.update,
            CrudOperation::Delete => &self.delete,
        }
    }

    fn push(&mut self, operation: CrudOperation, key: EndpointKey) {
        match operation {
            CrudOperation::Create => self.create.push(key),
            CrudOperation::Read => self.read.push(key),
            CrudOperation::Update => self.update.push(key),
            CrudOperation::Delete => self.delete.push(key),
        }
    }

    /// True when no endpoint is assigned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        CrudOperation::ALL.iter().all(|op| self.get(*op).is_empty())
    }
}

/// CRUD classification of every object in a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrudMap {
    entries: IndexMap<String, CrudEntry>,
    unclassified: Vec<EndpointKey>,
}

impl CrudMap {
    /// Classify every endpoint against every object it touches
    ///
    /// Each endpoint lands at most once per object. Endpoints assigned to no
    /// object are collected once in [`CrudMap::unclassified`].
    #[must_use]
    pub fn classify(graph: &DependencyGraph) -> Self {
        let mut entries = IndexMap::with_capacity(graph.object_count());
        let mut assigned: HashSet<&EndpointKey> = HashSet::new();

        for object in graph.objects() {
            let mut by_endpoint: IndexMap<&EndpointKey, Vec<RelationKind>> = IndexMap::new();
            for (key, relation) in graph.object_relations(object) {
                by_endpoint.entry(key).or_default().push(relation.kind());
            }

            let mut entry = CrudEntry::default();
            for (key, kinds) in by_endpoint {
                let operation = kinds
                    .iter()
                    .find_map(|kind| classify_relation(&key.operation, *kind));
                if let Some(operation) = operation {
                    entry.push(operation, key.clone());
                    assigned.insert(key);
                }
            }
            entries.insert(object.to_string(), entry);
        }

        let unclassified: Vec<EndpointKey> = graph
            .endpoints()
            .map(|endpoint| &endpoint.key)
            .filter(|key| !assigned.contains(key))
            .cloned()
            .collect();

        tracing::debug!(
            objects = entries.len(),
            unclassified = unclassified.len(),
            "endpoints classified"
        );

        Self {
            entries,
            unclassified,
        }
    }

    /// Entry of `object`
    #[must_use]
    pub fn entry(&self, object: &str) -> Option<&CrudEntry> {
        self.entries.get(object)
    }

    /// Endpoints of `object` for `operation`, empty for unknown objects
    #[must_use]
    pub fn endpoints(&self, object: &str, operation: CrudOperation) -> &[EndpointKey] {
        self.entries
            .get(object)
            .map_or(&[], |entry| entry.get(operation))
    }

    /// Objects and entries in graph order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrudEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the graph had no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Endpoints assigned to no object
    #[must_use]
    pub fn unclassified(&self) -> &[EndpointKey] {
        &self.unclassified
    }

    /// Object `endpoint` creates or deletes, if any
    ///
    /// The first object in graph order wins; within one object the create
    /// list is checked before the delete list.
    #[must_use]
    pub fn role_of(&self, endpoint: &EndpointKey) -> Option<(&str, CrudOperation)> {
        self.entries.iter().find_map(|(name, entry)| {
            if entry.create.contains(endpoint) {
                Some((name.as_str(), CrudOperation::Create))
            } else if entry.delete.contains(endpoint) {
                Some((name.as_str(), CrudOperation::Delete))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiseq_graph::build_graph;
    use apiseq_test_utils as fixtures;
    use pretty_assertions::assert_eq;

    fn key(path: &str, operation: &str) -> EndpointKey {
        EndpointKey::new(path, operation)
    }

    #[test]
    fn relation_rules() {
        assert_eq!(
            classify_relation("post", RelationKind::RequestBody),
            Some(CrudOperation::Create)
        );
        assert_eq!(
            classify_relation("post", RelationKind::Parameter),
            Some(CrudOperation::Create)
        );
        assert_eq!(classify_relation("post", RelationKind::Response), None);
        assert_eq!(
            classify_relation("get", RelationKind::Response),
            Some(CrudOperation::Read)
        );
        assert_eq!(classify_relation("get", RelationKind::Parameter), None);
        assert_eq!(
            classify_relation("patch", RelationKind::Response),
            Some(CrudOperation::Update)
        );
        assert_eq!(
            classify_relation("delete", RelationKind::Parameter),
            Some(CrudOperation::Delete)
        );
        assert_eq!(classify_relation("head", RelationKind::Response), None);
    }

    #[test]
    fn users_create_and_delete() {
        let graph = build_graph(&fixtures::scenario_users());
        let crud = CrudMap::classify(&graph);
        let user = crud.entry("User").unwrap();
        assert_eq!(user.create, vec![key("/users", "post")]);
        assert_eq!(user.delete, vec![key("/users/{userId}", "delete")]);
        assert!(user.read.is_empty());
        assert!(user.update.is_empty());
        assert!(crud.unclassified().is_empty());
    }

    #[test]
    fn unreferenced_objects_leave_everything_unclassified() {
        let graph = build_graph(&fixtures::scenario_unreferenced());
        let crud = CrudMap::classify(&graph);
        assert_eq!(crud.len(), 2);
        assert!(crud.iter().all(|(_, entry)| entry.is_empty()));
        assert_eq!(
            crud.unclassified(),
            &[key("/health", "get"), key("/metrics", "post")]
        );
    }

    #[test]
    fn post_with_only_response_is_not_create() {
        let model = fixtures::model(
            serde_json::json!({"Token": {}}),
            serde_json::json!({
                "/login": {"post": {"responses": {"200": {"content": fixtures::json_content(fixtures::schema_ref("Token"))}}}}
            }),
        );
        let crud = CrudMap::classify(&build_graph(&model));
        assert!(crud.entry("Token").unwrap().is_empty());
        assert_eq!(crud.unclassified(), &[key("/login", "post")]);
    }

    #[test]
    fn petstore_classification() {
        let graph = build_graph(&fixtures::petstore());
        let crud = CrudMap::classify(&graph);

        let pet = crud.entry("Pet").unwrap();
        assert_eq!(pet.create, vec![key("/pet", "post")]);
        assert_eq!(
            pet.read,
            vec![key("/pet/findByStatus", "get"), key("/pet/{petId}", "get")]
        );
        assert_eq!(pet.update, vec![key("/pet", "put")]);
        assert_eq!(pet.delete, vec![key("/pet/{petId}", "delete")]);

        let user = crud.entry("User").unwrap();
        assert_eq!(user.create, vec![key("/user", "post")]);
        assert_eq!(user.update, vec![key("/user/{username}", "put")]);

        assert_eq!(crud.unclassified(), &[key("/store/inventory", "get")]);
    }

    #[test]
    fn role_prefers_create() {
        let graph = build_graph(&fixtures::scenario_users());
        let crud = CrudMap::classify(&graph);
        assert_eq!(
            crud.role_of(&key("/users", "post")),
            Some(("User", CrudOperation::Create))
        );
        assert_eq!(
            crud.role_of(&key("/users/{userId}", "delete")),
            Some(("User", CrudOperation::Delete))
        );
        assert_eq!(crud.role_of(&key("/nope", "get")), None);
    }
}
