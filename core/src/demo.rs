//! Deterministic demo data for a three-level sales organization.
//!
//! RULE: Demo generation may not call any platform RNG.
//! All randomness flows through `DemoRng` streams derived from the single
//! seed recorded on the seed_batch row, so a reloaded database is
//! reproducible draw for draw.
//!
//! The generated shape is one national head, one area manager per team,
//! and a handful of business executives per area, each with coverage and
//! zero to three sales lines.

use crate::row::OrgRow;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashSet;

/// A deterministic RNG stream for one slice of the demo load.
pub struct DemoRng {
    inner: Pcg64Mcg,
}

impl DemoRng {
    /// Derive a stream from the master seed and a stable stream index.
    /// Stream 0 is the org skeleton; stream 1 + t belongs to team t, so
    /// adding a team never shifts another team's draws.
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived = master_seed ^ (stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Knobs for the generated org. Defaults give a small but uneven tree.
#[derive(Debug, Clone)]
pub struct DemoParams {
    pub teams: u64,
    pub min_reps_per_team: u64,
    pub max_reps_per_team: u64,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            teams: 4,
            min_reps_per_team: 2,
            max_reps_per_team: 5,
        }
    }
}

/// One generated employee, pre-normalization: coverage and sales still
/// attached to the person rather than fanned out into rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoEmployee {
    pub emp_code: String,
    pub emp_name: String,
    pub role: String,
    pub manager_code: Option<String>,
    pub manager_name: Option<String>,
    pub territory: Option<String>,
    pub coverage: Option<f64>,
    pub sales: Vec<(String, Option<f64>)>,
}

impl DemoEmployee {
    /// Fan out into the denormalized row shape the builder consumes: one
    /// row per sales line, or a single line-less row when there are none.
    pub fn to_rows(&self) -> Vec<OrgRow> {
        let mut base = OrgRow::new(&self.emp_code, &self.emp_name).with_role(&self.role);
        if let Some(manager) = &self.manager_name {
            base = base.with_manager(manager);
        }
        if let Some(territory) = &self.territory {
            base = base.with_territory(territory);
        }
        if let Some(coverage) = self.coverage {
            base = base.with_coverage(coverage);
        }
        if self.sales.is_empty() {
            return vec![base];
        }
        self.sales
            .iter()
            .map(|(product, amount)| base.clone().with_sale(product, *amount))
            .collect()
    }
}

const FIRST_NAMES: &[&str] = &[
    "Asha", "Bruno", "Carmen", "Dev", "Elena", "Farid", "Greta", "Hugo", "Imani", "Jonas",
    "Kavita", "Lionel", "Mei", "Nadia", "Oscar", "Priya", "Quentin", "Rosa", "Samir", "Tara",
    "Ulrich", "Vera", "Wen", "Yusuf",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Banerjee", "Calloway", "Duarte", "Eriksen", "Fontaine", "Grewal", "Holloway",
    "Ibarra", "Joshi", "Kowalski", "Lindqvist", "Marchetti", "Novak", "Okafor", "Pereira",
    "Quintero", "Rahman", "Sorensen", "Tanaka", "Ueda", "Vance", "Whitfield", "Zidane",
];

const TERRITORIES: &[&str] = &[
    "North Ridge", "South Basin", "East Harbor", "West Mesa", "Central Plains", "Lakeside",
    "Highlands", "River Bend", "Coastal Strip", "Old Quarter", "Summit Park", "Greenfield",
];

const PRODUCTS: &[&str] = &[
    "Cardiofix", "Neurozen", "Gastrolin", "Dermacare", "Pulmovent", "Osteomax", "Renovive",
    "Hepatol", "Immunara", "Glucostat",
];

fn pick<'a>(list: &'a [&'a str], rng: &mut DemoRng) -> &'a str {
    list[rng.next_u64_below(list.len() as u64) as usize]
}

/// Draw a full name not seen before in this load. 576 combinations; after
/// eight misses fall back to a numeric suffix rather than spinning.
fn fresh_name(rng: &mut DemoRng, used: &mut HashSet<String>) -> String {
    for _ in 0..8 {
        let name = format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng));
        if used.insert(name.clone()) {
            return name;
        }
    }
    let name = format!(
        "{} {} {}",
        pick(FIRST_NAMES, rng),
        pick(LAST_NAMES, rng),
        used.len()
    );
    used.insert(name.clone());
    name
}

fn sale_amount(rng: &mut DemoRng) -> f64 {
    ((250.0 + rng.next_f64() * 4750.0) * 100.0).round() / 100.0
}

/// Generate the full org for one seed. Same seed and params, same org.
pub fn generate_org(seed: u64, params: &DemoParams) -> Vec<DemoEmployee> {
    let mut skeleton_rng = DemoRng::new(seed, 0);
    let mut used_names = HashSet::new();
    let mut out = Vec::new();
    let mut code = 0u64;

    code += 1;
    let head_code = format!("E{code:03}");
    let head_name = fresh_name(&mut skeleton_rng, &mut used_names);
    out.push(DemoEmployee {
        emp_code: head_code.clone(),
        emp_name: head_name.clone(),
        role: "NSM".to_string(),
        manager_code: None,
        manager_name: None,
        territory: None,
        coverage: None,
        sales: Vec::new(),
    });

    for team in 0..params.teams {
        let mut team_rng = DemoRng::new(seed, 1 + team);
        let territory = TERRITORIES[(team as usize) % TERRITORIES.len()];

        code += 1;
        let manager_code = format!("E{code:03}");
        let manager_name = fresh_name(&mut team_rng, &mut used_names);
        out.push(DemoEmployee {
            emp_code: manager_code.clone(),
            emp_name: manager_name.clone(),
            role: "ABM".to_string(),
            manager_code: Some(head_code.clone()),
            manager_name: Some(head_name.clone()),
            territory: Some(territory.to_string()),
            coverage: None,
            sales: Vec::new(),
        });

        let span = params.max_reps_per_team - params.min_reps_per_team + 1;
        let reps = params.min_reps_per_team + team_rng.next_u64_below(span);
        for _ in 0..reps {
            code += 1;
            let coverage = (40 + team_rng.next_u64_below(61)) as f64;
            let mut sales = Vec::new();
            for _ in 0..team_rng.next_u64_below(4) {
                let product = pick(PRODUCTS, &mut team_rng).to_string();
                // A sliver of lines arrive with no amount, like real feeds do.
                let amount = if team_rng.chance(0.05) {
                    None
                } else {
                    Some(sale_amount(&mut team_rng))
                };
                sales.push((product, amount));
            }
            out.push(DemoEmployee {
                emp_code: format!("E{code:03}"),
                emp_name: fresh_name(&mut team_rng, &mut used_names),
                role: "BE".to_string(),
                manager_code: Some(manager_code.clone()),
                manager_name: Some(manager_name.clone()),
                territory: Some(territory.to_string()),
                coverage: Some(coverage),
                sales,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_org(12345, &DemoParams::default());
        let b = generate_org(12345, &DemoParams::default());
        assert_eq!(a, b, "Same seed should produce the same org");
    }

    #[test]
    fn org_has_expected_shape() {
        let params = DemoParams::default();
        let org = generate_org(7, &params);

        let heads: Vec<_> = org.iter().filter(|e| e.role == "NSM").collect();
        assert_eq!(heads.len(), 1, "Exactly one national head");
        assert!(heads[0].manager_name.is_none());

        let managers: Vec<_> = org.iter().filter(|e| e.role == "ABM").collect();
        assert_eq!(managers.len(), params.teams as usize);
        for m in &managers {
            assert_eq!(
                m.manager_name.as_deref(),
                Some(heads[0].emp_name.as_str()),
                "Every area manager reports to the head"
            );
        }

        for rep in org.iter().filter(|e| e.role == "BE") {
            assert!(rep.coverage.is_some(), "Every rep carries coverage");
            assert!(rep.manager_name.is_some());
            assert!(rep.sales.len() <= 3);
        }
    }

    #[test]
    fn names_are_unique_within_a_load() {
        let org = generate_org(99, &DemoParams::default());
        let mut seen = HashSet::new();
        for e in &org {
            assert!(seen.insert(e.emp_name.clone()), "Duplicate name: {}", e.emp_name);
        }
    }

    #[test]
    fn fan_out_produces_one_row_per_sales_line() {
        let org = generate_org(5, &DemoParams::default());
        for e in &org {
            let rows = e.to_rows();
            let expected = e.sales.len().max(1);
            assert_eq!(rows.len(), expected, "Row count for {}", e.emp_name);
            for row in &rows {
                assert_eq!(row.employee_id, e.emp_code);
                assert_eq!(row.employee_name, e.emp_name);
            }
        }
    }
}
