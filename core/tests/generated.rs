//! Generated-org runs: determinism and rollup invariants at demo scale.

use fieldpulse_core::{
    demo::{generate_org, DemoParams},
    engine::RollupEngine,
    node::OrgNode,
    row::OrgRow,
    store::OrgStore,
};

/// Seed an in-memory store with one generated org; hand back the store and
/// the head's display name.
fn seed_store(seed: u64, params: &DemoParams) -> (OrgStore, String) {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = OrgStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    let org = generate_org(seed, params);
    let head_name = org[0].emp_name.clone();
    for e in &org {
        store
            .insert_employee(
                &e.emp_code,
                &e.emp_name,
                Some(&e.role),
                e.manager_code.as_deref(),
                e.manager_name.as_deref(),
                e.territory.as_deref(),
            )
            .expect("insert employee");
        if let Some(coverage) = e.coverage {
            store.set_coverage(&e.emp_code, coverage).expect("coverage");
        }
        for (product, amount) in &e.sales {
            store.insert_sale(&e.emp_code, product, *amount).expect("sale");
        }
    }
    store.record_seed_batch(seed, "0.1.0-test").expect("batch");
    (store, head_name)
}

/// Recompute every manager's figures from their children and compare.
fn assert_rollup_invariants(node: &OrgNode) {
    if node.children.is_empty() {
        return;
    }
    let mut amount_sum = 0.0;
    let mut sales_sum = 0.0;
    for child in node.children.values() {
        assert_rollup_invariants(child);
        amount_sum += child.amount;
        sales_sum += child.total_sales;
    }
    let mean = (amount_sum / node.children.len() as f64).round();
    assert_eq!(
        node.amount, mean,
        "amount at {} must be the rounded mean of its reports",
        node.employee_id
    );
    assert!(
        (node.total_sales - sales_sum).abs() < 1e-9,
        "total at {} must be the sum over its reports",
        node.employee_id
    );
}

/// Two databases seeded from the same seed must roll up identically,
/// figures and diagnostics both.
#[test]
fn same_seed_produces_identical_rollups() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let params = DemoParams::default();

    let (store_a, head_a) = seed_store(SEED, &params);
    let (store_b, head_b) = seed_store(SEED, &params);
    assert_eq!(head_a, head_b, "same seed, same head");

    let outcome_a = RollupEngine::new(&store_a).hierarchy(&head_a).expect("rollup a");
    let outcome_b = RollupEngine::new(&store_b).hierarchy(&head_b).expect("rollup b");

    let a = serde_json::to_string(&outcome_a).expect("serialize a");
    let b = serde_json::to_string(&outcome_b).expect("serialize b");
    assert_eq!(a, b, "Same seed must produce byte-identical rollups");
}

#[test]
fn different_seeds_produce_different_rollups() {
    let params = DemoParams::default();
    let (store_a, head_a) = seed_store(42, &params);
    let (store_b, head_b) = seed_store(99, &params);

    let a = serde_json::to_string(
        &RollupEngine::new(&store_a).hierarchy(&head_a).expect("rollup a"),
    )
    .expect("serialize a");
    let b = serde_json::to_string(
        &RollupEngine::new(&store_b).hierarchy(&head_b).expect("rollup b"),
    )
    .expect("serialize b");
    assert_ne!(a, b, "Different seeds produced identical rollups — seed is unused");
}

/// Generated links are all sound, so the whole org attaches under the head
/// and every manager's figures recompute from their children.
#[test]
fn generated_org_attaches_fully_and_rolls_up_soundly() {
    let params = DemoParams::default();
    let org = generate_org(7, &params);
    let (store, head_name) = seed_store(7, &params);

    let outcome = RollupEngine::new(&store).hierarchy(&head_name).expect("rollup");
    assert_eq!(outcome.diagnostics.employees_indexed, org.len());
    assert_eq!(outcome.diagnostics.dropped, 0, "nothing dangles in generated data");
    assert_eq!(outcome.diagnostics.dangling, 0);

    let head = &outcome.root[&head_name];
    assert_eq!(head.children.len(), params.teams as usize);
    assert_rollup_invariants(head);

    // The head's grand total must equal the raw sum over every generated
    // sales line that actually carries an amount.
    let expected_total: f64 = org
        .iter()
        .flat_map(|e| e.sales.iter())
        .filter_map(|(_, amount)| *amount)
        .sum();
    assert!(
        (head.total_sales - expected_total).abs() < 1e-6,
        "head total {} must match the raw line sum {}",
        head.total_sales,
        expected_total
    );
}

/// The store fan-out and the in-memory fan-out are the same shape, so both
/// sources must agree on the whole outcome.
#[test]
fn store_rows_and_generated_rows_agree() {
    let params = DemoParams::default();
    let org = generate_org(11, &params);
    let (store, head_name) = seed_store(11, &params);

    let fixture: Vec<OrgRow> = org.iter().flat_map(|e| e.to_rows()).collect();

    let from_store = RollupEngine::new(&store).hierarchy(&head_name).expect("store");
    let from_fixture = RollupEngine::new(fixture).hierarchy(&head_name).expect("fixture");

    assert_eq!(
        serde_json::to_value(&from_store).expect("serialize"),
        serde_json::to_value(&from_fixture).expect("serialize"),
    );
}

/// A wider, deeper org keeps the same invariants.
#[test]
fn larger_org_still_rolls_up_soundly() {
    let params = DemoParams {
        teams: 9,
        min_reps_per_team: 1,
        max_reps_per_team: 8,
    };
    let (store, head_name) = seed_store(0xFEED_5EED, &params);

    let outcome = RollupEngine::new(&store).hierarchy(&head_name).expect("rollup");
    assert_eq!(outcome.diagnostics.dropped, 0);
    assert_rollup_invariants(&outcome.root[&head_name]);
}
