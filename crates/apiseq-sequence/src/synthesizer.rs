//! Preparation and dismantling plans for testing one endpoint
//!
//! For every valid ordering of the endpoint's connected objects, a plan
//! visits the objects in order and calls a create (or delete) endpoint for
//! each. An object with several such endpoints branches the plan; an object
//! with none contributes a `Placeholder<Object>` step.

use apiseq_graph::{DependencyGraph, EndpointKey};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crud::{CrudMap, CrudOperation};
use crate::error::{SequenceError, SequenceResult};
use crate::ordering::valid_orderings;
use crate::resolver::{Dependencies, DependencyResolver, DEFAULT_MAX_PROPERTY_DEPTH};

/// Default cap on valid orderings per endpoint (7!)
pub const DEFAULT_MAX_ORDERINGS: usize = 5040;

/// Default cap on plans per endpoint and direction
pub const DEFAULT_MAX_PLANS: usize = 10_000;

/// Tuning knobs for synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Valid orderings kept per endpoint, zero for no cap
    pub max_orderings: usize,
    /// Plans kept per endpoint and direction, zero for no cap
    pub max_plans: usize,
    /// Longest property walk, in edges
    pub max_property_depth: usize,
    /// Fan endpoints out over the rayon pool
    pub parallel: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_orderings: DEFAULT_MAX_ORDERINGS,
            max_plans: DEFAULT_MAX_PLANS,
            max_property_depth: DEFAULT_MAX_PROPERTY_DEPTH,
            parallel: true,
        }
    }
}

impl SynthesisConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ordering cap
    #[inline]
    #[must_use]
    pub fn with_max_orderings(mut self, max: usize) -> Self {
        self.max_orderings = max;
        self
    }

    /// Set plan cap
    #[inline]
    #[must_use]
    pub fn with_max_plans(mut self, max: usize) -> Self {
        self.max_plans = max;
        self
    }

    /// Set property walk bound
    #[inline]
    #[must_use]
    pub fn with_max_property_depth(mut self, depth: usize) -> Self {
        self.max_property_depth = depth;
        self
    }

    /// Enable or disable parallel fan-out
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject values that would make every walk empty
    ///
    /// # Errors
    ///
    /// [`SequenceError::InvalidConfig`] when `max_property_depth` is zero.
    pub fn validate(&self) -> SequenceResult<()> {
        if self.max_property_depth == 0 {
            return Err(SequenceError::InvalidConfig(
                "max_property_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlanStep {
    /// Call this endpoint
    Endpoint(EndpointKey),
    /// Set up or remove this object by hand
    Placeholder(String),
}

impl PlanStep {
    /// True for placeholders
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint(key) => fmt::Display::fmt(key, f),
            Self::Placeholder(object) => write!(f, "Placeholder<{object}>"),
        }
    }
}

impl FromStr for PlanStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(object) = s
            .strip_prefix("Placeholder<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return Ok(Self::Placeholder(object.to_string()));
        }
        s.rsplit_once(", ")
            .map(|(path, operation)| Self::Endpoint(EndpointKey::new(path, operation)))
            .ok_or_else(|| format!("not a plan step: {s:?}"))
    }
}

impl Serialize for PlanStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlanStep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Test sequence plan of one endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencePlan {
    /// Objects the endpoint needs, in first-seen order
    pub connected_with_objects: Vec<String>,
    /// `(a, b)`: `a` must exist before `b`
    pub must_precede: Vec<(String, String)>,
    /// Setup plans, one per valid ordering and create-endpoint choice
    pub preparation: Vec<Vec<PlanStep>>,
    /// Teardown plans, one per valid ordering and delete-endpoint choice
    pub dismantling: Vec<Vec<PlanStep>>,
    /// Ceiling mean preparation length plus ceiling mean dismantling length
    pub sequence_length: usize,
    /// Orderings or plans were cut at a configured cap
    pub truncated: bool,
}

/// Ceiling of the mean plan length, zero for no plans
#[must_use]
pub fn mean_length(plans: &[Vec<PlanStep>]) -> usize {
    if plans.is_empty() {
        return 0;
    }
    let total: usize = plans.iter().map(Vec::len).sum();
    total.div_ceil(plans.len())
}

/// Synthesizes plans for endpoints of one graph
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceSynthesizer {
    config: SynthesisConfig,
}

impl SequenceSynthesizer {
    /// Create a synthesizer
    #[inline]
    #[must_use]
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Resolve and synthesize one endpoint
    ///
    /// # Errors
    ///
    /// [`SequenceError::UnknownEndpoint`] if `endpoint` is not in `graph`.
    pub fn synthesize(
        &self,
        graph: &DependencyGraph,
        crud: &CrudMap,
        endpoint: &EndpointKey,
    ) -> SequenceResult<SequencePlan> {
        let dependencies =
            DependencyResolver::new(self.config.max_property_depth).resolve(graph, endpoint)?;
        Ok(self.plan(&dependencies, crud, endpoint))
    }

    /// Build plans from already resolved dependencies
    #[must_use]
    pub fn plan(
        &self,
        dependencies: &Dependencies,
        crud: &CrudMap,
        endpoint: &EndpointKey,
    ) -> SequencePlan {
        let objects = &dependencies.connected_objects;
        let orderings = valid_orderings(
            objects.len(),
            &dependencies.index_constraints(),
            self.config.max_orderings,
        );
        if orderings.truncated {
            tracing::warn!(
                endpoint = %endpoint,
                objects = objects.len(),
                limit = self.config.max_orderings,
                "ordering enumeration truncated"
            );
        }

        let role = crud.role_of(endpoint);
        let mut preparation = PlanSet::new(self.config.max_plans);
        let mut dismantling = PlanSet::new(self.config.max_plans);

        for ordering in &orderings.orderings {
            let visit: Vec<&str> = ordering.iter().map(|&i| objects[i].as_str()).collect();
            preparation.add_ordering(&visit, crud, CrudOperation::Create, role);
            dismantling.add_ordering(&visit, crud, CrudOperation::Delete, role);
        }

        let plans_truncated = preparation.truncated || dismantling.truncated;
        if plans_truncated {
            tracing::warn!(
                endpoint = %endpoint,
                limit = self.config.max_plans,
                "plan expansion truncated"
            );
        }

        let sequence_length = mean_length(&preparation.plans) + mean_length(&dismantling.plans);
        tracing::debug!(
            endpoint = %endpoint,
            orderings = orderings.orderings.len(),
            preparation = preparation.plans.len(),
            dismantling = dismantling.plans.len(),
            sequence_length,
            "endpoint synthesized"
        );

        SequencePlan {
            connected_with_objects: objects.clone(),
            must_precede: dependencies.must_precede.clone(),
            preparation: preparation.plans,
            dismantling: dismantling.plans,
            sequence_length,
            truncated: orderings.truncated || plans_truncated,
        }
    }

    /// Synthesize every endpoint of `graph`, keyed in graph order
    ///
    /// With `parallel` set each endpoint is one rayon task; the result is
    /// identical to the sequential run.
    #[must_use]
    pub fn synthesize_all(
        &self,
        graph: &DependencyGraph,
        crud: &CrudMap,
    ) -> IndexMap<EndpointKey, SequencePlan> {
        let keys: Vec<&EndpointKey> = graph.endpoints().map(|endpoint| &endpoint.key).collect();
        let resolver = DependencyResolver::new(self.config.max_property_depth);
        let run = |key: &&EndpointKey| {
            let dependencies = resolver.resolve(graph, key).unwrap_or_default();
            ((*key).clone(), self.plan(&dependencies, crud, key))
        };

        let plans: Vec<(EndpointKey, SequencePlan)> = if self.config.parallel {
            keys.par_iter().map(run).collect()
        } else {
            keys.iter().map(run).collect()
        };
        plans.into_iter().collect()
    }
}

/// Plans for one direction, bounded by a cap
struct PlanSet {
    plans: Vec<Vec<PlanStep>>,
    limit: usize,
    truncated: bool,
}

impl PlanSet {
    fn new(limit: usize) -> Self {
        Self {
            plans: Vec::new(),
            limit,
            truncated: false,
        }
    }

    fn remaining(&self) -> usize {
        if self.limit == 0 {
            usize::MAX
        } else {
            self.limit.saturating_sub(self.plans.len())
        }
    }

    /// Expand plans for one ordering and append them
    ///
    /// The object this endpoint itself creates (for setup) or deletes (for
    /// teardown) is skipped.
    fn add_ordering(
        &mut self,
        visit: &[&str],
        crud: &CrudMap,
        operation: CrudOperation,
        role: Option<(&str, CrudOperation)>,
    ) {
        let budget = self.remaining();
        if budget == 0 {
            self.truncated = true;
            return;
        }

        let mut partial: Vec<Vec<PlanStep>> = Vec::new();
        for &object in visit {
            if role == Some((object, operation)) {
                continue;
            }
            let endpoints = crud.endpoints(object, operation);
            if endpoints.is_empty() {
                let step = PlanStep::Placeholder(object.to_string());
                if partial.is_empty() {
                    partial.push(vec![step]);
                } else {
                    for plan in &mut partial {
                        plan.push(step.clone());
                    }
                }
                continue;
            }

            if partial.is_empty() {
                partial.push(Vec::new());
            }
            let mut branches = Vec::new();
            for plan in &partial {
                for endpoint in &endpoints[1..] {
                    if partial.len() + branches.len() >= budget {
                        self.truncated = true;
                        break;
                    }
                    let mut branch = plan.clone();
                    branch.push(PlanStep::Endpoint(endpoint.clone()));
                    branches.push(branch);
                }
            }
            for plan in &mut partial {
                plan.push(PlanStep::Endpoint(endpoints[0].clone()));
            }
            partial.extend(branches);
        }

        self.plans.extend(partial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiseq_graph::build_graph;
    use apiseq_test_utils as fixtures;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn step(path: &str, operation: &str) -> PlanStep {
        PlanStep::Endpoint(EndpointKey::new(path, operation))
    }

    fn placeholder(object: &str) -> PlanStep {
        PlanStep::Placeholder(object.to_string())
    }

    fn synthesize(model: &apiseq_model::SpecModel, path: &str, operation: &str) -> SequencePlan {
        let graph = build_graph(model);
        let crud = CrudMap::classify(&graph);
        SequenceSynthesizer::default()
            .synthesize(&graph, &crud, &EndpointKey::new(path, operation))
            .unwrap()
    }

    #[test]
    fn plan_step_text() {
        assert_eq!(step("/users/{id}", "get").to_string(), "/users/{id}, get");
        assert_eq!(placeholder("Customer").to_string(), "Placeholder<Customer>");
        assert_eq!("Placeholder<Customer>".parse::<PlanStep>().unwrap(), placeholder("Customer"));
        assert_eq!("/a, b, post".parse::<PlanStep>().unwrap(), step("/a, b", "post"));
        assert!("nonsense".parse::<PlanStep>().is_err());
    }

    #[test]
    fn mean_length_rounds_up() {
        assert_eq!(mean_length(&[]), 0);
        assert_eq!(mean_length(&[vec![placeholder("A")], vec![]]), 1);
        assert_eq!(
            mean_length(&[vec![placeholder("A"), placeholder("B")], vec![placeholder("A")]]),
            2
        );
    }

    #[test]
    fn delete_skips_its_own_teardown() {
        let plan = synthesize(&fixtures::scenario_users(), "/users/{userId}", "delete");
        assert_eq!(plan.connected_with_objects, vec!["User"]);
        assert_eq!(plan.preparation, vec![vec![step("/users", "post")]]);
        assert!(plan.dismantling.is_empty());
        assert_eq!(plan.sequence_length, 1);
        assert!(!plan.truncated);
    }

    #[test]
    fn create_skips_its_own_setup() {
        let plan = synthesize(&fixtures::scenario_users(), "/users", "post");
        assert!(plan.preparation.is_empty());
        assert_eq!(plan.dismantling, vec![vec![step("/users/{userId}", "delete")]]);
        assert_eq!(plan.sequence_length, 1);
    }

    #[test]
    fn placeholder_precedes_dependent_create() {
        let plan = synthesize(&fixtures::scenario_orders(), "/orders/{orderId}", "get");
        assert_eq!(plan.connected_with_objects, vec!["Order", "Customer"]);
        assert_eq!(
            plan.must_precede,
            vec![("Customer".to_string(), "Order".to_string())]
        );
        assert_eq!(
            plan.preparation,
            vec![vec![placeholder("Customer"), step("/orders", "post")]]
        );
        assert_eq!(
            plan.dismantling,
            vec![vec![placeholder("Customer"), step("/orders/{orderId}", "delete")]]
        );
        assert_eq!(plan.sequence_length, 4);
    }

    #[test]
    fn creating_endpoint_keeps_placeholder_only() {
        let plan = synthesize(&fixtures::scenario_orders(), "/orders", "post");
        assert_eq!(plan.preparation, vec![vec![placeholder("Customer")]]);
    }

    #[test]
    fn multiple_creators_branch_plans() {
        let model = fixtures::model(
            json!({"Item": {}}),
            json!({
                "/items": {"post": {"requestBody": {"content": fixtures::json_content(fixtures::schema_ref("Item"))}}},
                "/items/bulk": {"post": {"requestBody": {"content": fixtures::json_content(fixtures::list_ref("Item"))}}},
                "/items/{itemId}": {"get": {
                    "parameters": [fixtures::path_param("itemId", "string")],
                    "responses": {"200": {"content": fixtures::json_content(fixtures::schema_ref("Item"))}}
                }}
            }),
        );
        let plan = synthesize(&model, "/items/{itemId}", "get");
        assert_eq!(
            plan.preparation,
            vec![vec![step("/items", "post")], vec![step("/items/bulk", "post")]]
        );
        assert_eq!(plan.dismantling, vec![vec![placeholder("Item")]]);
        assert_eq!(plan.sequence_length, 2);
    }

    #[test]
    fn unconnected_endpoint_has_empty_plan() {
        let plan = synthesize(&fixtures::scenario_unreferenced(), "/health", "get");
        assert_eq!(plan, SequencePlan::default());
    }

    #[test]
    fn ordering_cap_marks_truncation() {
        let graph = build_graph(&fixtures::star(4));
        let crud = CrudMap::classify(&graph);
        let key = EndpointKey::new("/roots", "post");

        let full = SequenceSynthesizer::default().synthesize(&graph, &crud, &key).unwrap();
        assert_eq!(full.preparation.len(), 24);
        assert!(!full.truncated);

        let capped = SequenceSynthesizer::new(SynthesisConfig::new().with_max_orderings(10))
            .synthesize(&graph, &crud, &key)
            .unwrap();
        assert_eq!(capped.preparation.len(), 10);
        assert!(capped.truncated);
    }

    #[test]
    fn plan_cap_marks_truncation() {
        let graph = build_graph(&fixtures::star(4));
        let crud = CrudMap::classify(&graph);
        let key = EndpointKey::new("/roots", "post");
        let capped = SequenceSynthesizer::new(SynthesisConfig::new().with_max_plans(5))
            .synthesize(&graph, &crud, &key)
            .unwrap();
        assert_eq!(capped.preparation.len(), 5);
        assert!(capped.truncated);
    }

    #[test]
    fn parallel_matches_sequential() {
        let graph = build_graph(&fixtures::petstore());
        let crud = CrudMap::classify(&graph);
        let parallel = SequenceSynthesizer::new(SynthesisConfig::new().with_parallel(true))
            .synthesize_all(&graph, &crud);
        let sequential = SequenceSynthesizer::new(SynthesisConfig::new().with_parallel(false))
            .synthesize_all(&graph, &crud);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), graph.endpoint_count());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let config = SynthesisConfig::new().with_max_property_depth(0);
        assert!(matches!(config.validate(), Err(SequenceError::InvalidConfig(_))));
        assert!(SynthesisConfig::default().validate().is_ok());
    }
}
