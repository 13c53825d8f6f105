//! Serializable report views
//!
//! Keys are human-readable: object names as declared, endpoints as
//! `"{path}, {operation}"`, and the reserved [`NO_OBJECT`] key for
//! endpoints that matched nothing.

use apiseq_model::ApiInfo;
use apiseq_sequence::PlanStep;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key for endpoints without an object
pub const NO_OBJECT: &str = "NO_OBJECT";

/// Object → endpoint → relation tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectUsageReport {
    /// Per object, the endpoints it touches and how
    #[serde(flatten)]
    pub objects: IndexMap<String, IndexMap<String, Vec<String>>>,
    /// Endpoints touching no object
    #[serde(rename = "NO_OBJECT")]
    pub no_object: Vec<String>,
}

/// Endpoint lists of one object by lifecycle operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudLists {
    /// Create endpoints
    pub create: Vec<String>,
    /// Read endpoints
    pub read: Vec<String>,
    /// Update endpoints
    pub update: Vec<String>,
    /// Delete endpoints
    pub delete: Vec<String>,
}

/// Object → CRUD lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudReport {
    /// Per object lists
    #[serde(flatten)]
    pub objects: IndexMap<String, CrudLists>,
    /// Endpoints assigned to no object
    #[serde(rename = "NO_OBJECT")]
    pub no_object: Vec<String>,
}

/// Sequence plan of one endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPlan {
    /// Objects the endpoint needs
    pub connected_with_objects: Vec<String>,
    /// Setup plans
    pub preparation: Vec<Vec<PlanStep>>,
    /// Teardown plans
    pub dismantling: Vec<Vec<PlanStep>>,
    /// Expected number of calls around the endpoint
    pub sequence_length: usize,
    /// Plans were cut at a configured cap
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

/// Endpoint → sequence plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointReport {
    /// Plans keyed by endpoint
    pub endpoints: IndexMap<String, EndpointPlan>,
}

/// Full analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// API identity, verbatim from the document
    pub info: ApiInfo,
    /// Object usage view
    pub object_list: ObjectUsageReport,
    /// CRUD view
    pub object_crud: CrudReport,
    /// Sequence plan view
    pub endpoint_list: EndpointReport,
    /// Endpoints whose synthesis hit a cap
    pub overruns: Vec<String>,
}

impl Report {
    /// Endpoints with no resolvable object
    #[must_use]
    pub fn unresolved_endpoints(&self) -> &[String] {
        &self.object_list.no_object
    }

    /// Number of endpoints analysed
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoint_list.endpoints.len()
    }

    /// Number of objects analysed
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.object_crud.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_object_is_a_sibling_key() {
        let mut report = ObjectUsageReport::default();
        report.objects.insert(
            "User".into(),
            IndexMap::from([("/users, post".to_string(), vec!["IN_REQUEST_BODY".to_string()])]),
        );
        report.no_object.push("/health, get".into());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "User": {"/users, post": ["IN_REQUEST_BODY"]},
                "NO_OBJECT": ["/health, get"]
            })
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["User", "NO_OBJECT"]);
    }

    #[test]
    fn truncated_flag_only_when_set() {
        let plan = EndpointPlan::default();
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("truncated").is_none());

        let plan = EndpointPlan {
            truncated: true,
            ..EndpointPlan::default()
        };
        assert_eq!(serde_json::to_value(&plan).unwrap()["truncated"], true);
    }

    #[test]
    fn crud_report_round_trip() {
        let text = r#"{"Pet":{"create":["/pet, post"],"read":[],"update":[],"delete":[]},"NO_OBJECT":["/store/inventory, get"]}"#;
        let report: CrudReport = serde_json::from_str(text).unwrap();
        assert_eq!(report.objects["Pet"].create, vec!["/pet, post"]);
        assert_eq!(report.no_object, vec!["/store/inventory, get"]);
        assert_eq!(serde_json::to_string(&report).unwrap(), text);
    }
}
