//! pulse-runner: seed a demo org database and roll up a reporting hierarchy.
//!
//! Usage:
//!   pulse-runner --seed 12345 --teams 4 --db org.db
//!   pulse-runner --db org.db --root "Dana Whitfield" --json
//!   pulse-runner --db org.db --list

use anyhow::Result;
use fieldpulse_core::{
    config::RollupConfig,
    demo::{generate_org, DemoParams},
    engine::RollupEngine,
    store::OrgStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let teams = parse_arg(&args, "--teams", DemoParams::default().teams);
    let list_mode = args.iter().any(|a| a == "--list");
    let json_mode = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let root_arg = args
        .windows(2)
        .find(|w| w[0] == "--root")
        .map(|w| w[1].as_str());
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    // --json keeps stdout machine-readable; logs still go to stderr.
    if !json_mode {
        println!("FieldPulse — pulse-runner");
        println!("  seed:  {seed}");
        println!("  teams: {teams}");
        println!("  db:    {db}");
        println!();
    }

    let store = if db == ":memory:" {
        OrgStore::in_memory()?
    } else {
        OrgStore::open(db)?
    };
    store.migrate()?;

    // Seed demo data only into an empty database; an existing file keeps
    // whatever org it already holds.
    let seeded_head = if store.employee_count()? == 0 {
        let params = DemoParams {
            teams,
            ..DemoParams::default()
        };
        let org = generate_org(seed, &params);
        for e in &org {
            store.insert_employee(
                &e.emp_code,
                &e.emp_name,
                Some(&e.role),
                e.manager_code.as_deref(),
                e.manager_name.as_deref(),
                e.territory.as_deref(),
            )?;
            if let Some(coverage) = e.coverage {
                store.set_coverage(&e.emp_code, coverage)?;
            }
            for (product, amount) in &e.sales {
                store.insert_sale(&e.emp_code, product, *amount)?;
            }
        }
        let batch_id = store.record_seed_batch(seed, env!("CARGO_PKG_VERSION"))?;
        log::info!("seeded {} employees under batch {batch_id}", org.len());
        Some(org[0].emp_name.clone())
    } else {
        log::info!("database already populated; skipping demo seed");
        None
    };

    if list_mode {
        println!("=== ROSTER ===");
        for e in store.roster()? {
            println!(
                "  {}  {:<24} {:<4} reports to {}",
                e.emp_code,
                e.emp_name,
                e.role.as_deref().unwrap_or("-"),
                e.manager_name.as_deref().unwrap_or("(nobody)"),
            );
        }
        return Ok(());
    }

    let root_name = match root_arg {
        Some(name) => name.to_string(),
        None => match seeded_head {
            Some(name) => name,
            // Pre-populated database, no --root: take the first employee
            // on the roster with no manager of their own.
            None => store
                .roster()?
                .into_iter()
                .find(|e| e.manager_name.is_none())
                .map(|e| e.emp_name)
                .ok_or_else(|| anyhow::anyhow!("no --root given and no top-level employee found"))?,
        },
    };

    let config = match config_path {
        Some(path) => RollupConfig::load(path)?,
        None => RollupConfig::default(),
    };

    let engine = RollupEngine::with_config(&store, config);
    let outcome = engine.hierarchy(&root_name)?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&outcome.root)?);
        return Ok(());
    }

    println!("=== ROLLUP SUMMARY ===");
    println!("  root:            {root_name}");
    println!("  rows scanned:    {}", outcome.diagnostics.rows_scanned);
    println!("  employees:       {}", outcome.diagnostics.employees_indexed);
    println!("  dangling links:  {}", outcome.diagnostics.dangling);
    println!("  name collisions: {}", outcome.diagnostics.name_collisions);
    println!("  dropped:         {}", outcome.diagnostics.dropped);

    match outcome.root.get(&root_name) {
        Some(node) => {
            println!("  amount:          {}", node.amount);
            println!("  total sales:     {:.2}", node.total_sales);
            println!();
            println!("=== DIRECT REPORTS ===");
            if node.children.is_empty() {
                println!("  (none)");
            } else {
                for (name, child) in &node.children {
                    println!(
                        "  {:<24} amount: {:>6} | sales: {:>10.2}",
                        name, child.amount, child.total_sales
                    );
                }
            }
        }
        None => println!("  (no employee named '{root_name}')"),
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
