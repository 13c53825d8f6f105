//! End-to-end synthesis over fixture and generated documents

use apiseq_graph::{build_graph, EndpointKey};
use apiseq_model::SpecModel;
use apiseq_sequence::{
    CrudMap, CrudOperation, DependencyResolver, PlanStep, SequenceSynthesizer, SynthesisConfig,
};
use apiseq_test_utils as fixtures;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn users_scenario_end_to_end() {
    let graph = build_graph(&fixtures::scenario_users());
    let crud = CrudMap::classify(&graph);
    let plans = SequenceSynthesizer::default().synthesize_all(&graph, &crud);

    let delete = &plans[&EndpointKey::new("/users/{userId}", "delete")];
    assert_eq!(
        delete.preparation,
        vec![vec![PlanStep::Endpoint(EndpointKey::new("/users", "post"))]]
    );
    assert!(delete.dismantling.is_empty());
    assert_eq!(delete.sequence_length, 1);
}

#[test]
fn unreferenced_scenario_has_no_work() {
    let graph = build_graph(&fixtures::scenario_unreferenced());
    let crud = CrudMap::classify(&graph);
    let plans = SequenceSynthesizer::default().synthesize_all(&graph, &crud);
    assert_eq!(plans.len(), 2);
    for plan in plans.values() {
        assert!(plan.connected_with_objects.is_empty());
        assert_eq!(plan.sequence_length, 0);
    }
}

#[test]
fn mutual_references_still_produce_plans() {
    let graph = build_graph(&fixtures::scenario_mutual());
    let crud = CrudMap::classify(&graph);
    let plan = SequenceSynthesizer::default()
        .synthesize(&graph, &crud, &EndpointKey::new("/pets", "post"))
        .unwrap();

    let placeholder = |name: &str| PlanStep::Placeholder(name.to_string());
    assert_eq!(plan.connected_with_objects, vec!["Pet", "Owner"]);
    assert!(plan.must_precede.is_empty());
    assert_eq!(
        plan.preparation,
        vec![vec![placeholder("Owner")], vec![placeholder("Owner")]]
    );
    assert_eq!(
        plan.dismantling,
        vec![
            vec![placeholder("Pet"), placeholder("Owner")],
            vec![placeholder("Owner"), placeholder("Pet")],
        ]
    );
    assert_eq!(plan.sequence_length, 3);
    assert!(!plan.truncated);
}

#[test]
fn petstore_pet_lookup_needs_category_and_tag_placeholders() {
    let graph = build_graph(&fixtures::petstore());
    let crud = CrudMap::classify(&graph);
    let plan = SequenceSynthesizer::default()
        .synthesize(&graph, &crud, &EndpointKey::new("/pet/{petId}", "get"))
        .unwrap();

    assert_eq!(plan.connected_with_objects, vec!["Pet", "Category", "Tag"]);
    let placeholder = |name: &str| PlanStep::Placeholder(name.to_string());
    let create = PlanStep::Endpoint(EndpointKey::new("/pet", "post"));
    assert_eq!(
        plan.preparation,
        vec![
            vec![placeholder("Category"), placeholder("Tag"), create.clone()],
            vec![placeholder("Tag"), placeholder("Category"), create],
        ]
    );
    assert_eq!(plan.sequence_length, 6);
}

fn position(
    plan: &[PlanStep],
    object: &str,
    crud: &CrudMap,
    operation: CrudOperation,
) -> Option<usize> {
    plan.iter().position(|step| match step {
        PlanStep::Placeholder(name) => name == object,
        PlanStep::Endpoint(key) => crud.endpoints(object, operation).contains(key),
    })
}

fn shape() -> impl Strategy<Value = (usize, Vec<(usize, usize, bool)>, Vec<(usize, usize)>)> {
    (
        1usize..6,
        proptest::collection::vec((0usize..6, 0usize..6, any::<bool>()), 0..8),
        proptest::collection::vec((0usize..6, 0usize..5), 1..8),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dependencies_have_no_self_pairs((objects, properties, endpoints) in shape()) {
        let document = fixtures::shaped(objects, &properties, &endpoints);
        let model = SpecModel::from_value(document).unwrap();
        let graph = build_graph(&model);
        let resolver = DependencyResolver::default();
        for endpoint in graph.endpoints() {
            let deps = resolver.resolve(&graph, &endpoint.key).unwrap();
            let connected: HashSet<_> = deps.connected_objects.iter().collect();
            prop_assert_eq!(connected.len(), deps.connected_objects.len());
            for (before, after) in &deps.must_precede {
                prop_assert_ne!(before, after);
                prop_assert!(connected.contains(before) && connected.contains(after));
            }
        }
    }

    #[test]
    fn plans_respect_must_precede((objects, properties, endpoints) in shape()) {
        let document = fixtures::shaped(objects, &properties, &endpoints);
        let model = SpecModel::from_value(document).unwrap();
        let graph = build_graph(&model);
        let crud = CrudMap::classify(&graph);
        let config = SynthesisConfig::new().with_max_orderings(200).with_max_plans(500);
        let plans = SequenceSynthesizer::new(config).synthesize_all(&graph, &crud);

        for plan in plans.values() {
            if !plan.connected_with_objects.is_empty() {
                prop_assert!(!plan.preparation.is_empty() || !plan.dismantling.is_empty());
            }
            prop_assert!(plan.preparation.len() <= 500);
            for steps in &plan.preparation {
                prop_assert!(steps.len() <= plan.connected_with_objects.len());
                for (before, after) in &plan.must_precede {
                    let b = position(steps, before, &crud, CrudOperation::Create);
                    let a = position(steps, after, &crud, CrudOperation::Create);
                    if let (Some(b), Some(a)) = (b, a) {
                        prop_assert!(b < a, "{before} after {after} in {steps:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn parallel_and_sequential_agree((objects, properties, endpoints) in shape()) {
        let document = fixtures::shaped(objects, &properties, &endpoints);
        let model = SpecModel::from_value(document).unwrap();
        let graph = build_graph(&model);
        let crud = CrudMap::classify(&graph);
        let config = SynthesisConfig::new().with_max_orderings(120);
        let parallel =
            SequenceSynthesizer::new(config.with_parallel(true)).synthesize_all(&graph, &crud);
        let sequential =
            SequenceSynthesizer::new(config.with_parallel(false)).synthesize_all(&graph, &crud);
        prop_assert_eq!(
            parallel.into_iter().collect::<Vec<_>>(),
            sequential.into_iter().collect::<Vec<_>>()
        );
    }
}
