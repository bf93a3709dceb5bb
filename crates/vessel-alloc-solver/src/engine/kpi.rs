// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{context::SearchContext, engine::pipeline::PipelineState, search::StageRun};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use vessel_alloc_core::prelude::Tons;
use vessel_alloc_model::prelude::{FeasibilityChecker, PortIdentifier, Solution};

/// Headline numbers of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_cost: f64,
    pub baseline_cost: f64,
    pub savings: f64,
    pub savings_pct: f64,
    pub total_demurrage: f64,
    pub assigned_tonnage: i64,
    pub capacity_utilization_pct: f64,
    pub avg_predicted_delay_days: f64,
    pub violations: usize,
    pub unassigned_vessels: usize,
    pub wall_time_ms: u64,
}

/// Projected fill level of one port under the final plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortUtilization {
    pub port_id: u32,
    pub name: String,
    pub assigned: i64,
    pub capacity: i64,
    pub utilization_pct: f64,
}

/// Entry and exit record of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: PipelineState,
    pub iterations: usize,
    pub best_cost: f64,
    pub best_penalty: f64,
    pub best_total: f64,
    pub elapsed_ms: u64,
    pub budget_exhausted: bool,
}

impl StageReport {
    pub fn of(stage: PipelineState, run: &StageRun, elapsed: Duration) -> Self {
        let fitness = run.best.fitness();
        Self {
            stage,
            iterations: run.iterations,
            best_cost: fitness.cost(),
            best_penalty: fitness.penalty(),
            best_total: fitness.total(),
            elapsed_ms: elapsed.as_millis() as u64,
            budget_exhausted: run.budget_exhausted,
        }
    }
}

/// Condenses the final plan into the run's headline numbers.
///
/// Demurrage is read off the attached cost breakdowns, so the final
/// solution must have them attached before this is called; assignments
/// without one count zero.
pub fn summarize(
    ctx: &SearchContext<'_>,
    final_solution: &Solution,
    baseline: &Solution,
    wall_time: Duration,
) -> KpiSummary {
    let total_cost = final_solution.fitness().cost();
    let baseline_cost = baseline.fitness().cost();
    let savings = baseline_cost - total_cost;
    let savings_pct = if baseline_cost > 0.0 {
        savings / baseline_cost * 100.0
    } else {
        0.0
    };

    let total_demurrage = final_solution
        .iter()
        .filter_map(|a| a.breakdown())
        .map(|b| b.demurrage())
        .sum();

    let avg_predicted_delay_days = if final_solution.is_empty() {
        0.0
    } else {
        final_solution
            .iter()
            .map(|a| a.predicted_delay_days())
            .sum::<f64>()
            / final_solution.len() as f64
    };

    let checker = FeasibilityChecker::new(ctx.problem());
    let violations = checker.violations(final_solution.assignments()).len();

    let ports = ctx.problem().ports();
    let projected: Tons = ports
        .iter()
        .map(|p| p.current_stock())
        .sum::<Tons>()
        + final_solution.assigned_tonnage();
    let total_capacity: Tons = ports.iter().map(|p| p.max_capacity()).sum();
    let capacity_utilization_pct = if total_capacity.is_positive() {
        projected.to_f64() / total_capacity.to_f64() * 100.0
    } else {
        0.0
    };

    KpiSummary {
        total_cost,
        baseline_cost,
        savings,
        savings_pct,
        total_demurrage,
        assigned_tonnage: final_solution.assigned_tonnage().value(),
        capacity_utilization_pct,
        avg_predicted_delay_days,
        violations,
        unassigned_vessels: ctx.unassignable().len(),
        wall_time_ms: wall_time.as_millis() as u64,
    }
}

/// Per-port fill levels under `solution`, ascending by port id.
pub fn port_utilization(ctx: &SearchContext<'_>, solution: &Solution) -> Vec<PortUtilization> {
    let mut assigned: BTreeMap<PortIdentifier, Tons> = BTreeMap::new();
    for a in solution.iter() {
        *assigned.entry(a.port()).or_insert_with(Tons::zero) += a.quantity();
    }

    let mut out: Vec<PortUtilization> = ctx
        .problem()
        .ports()
        .iter()
        .map(|port| {
            let moved = assigned
                .get(&port.id())
                .copied()
                .unwrap_or_else(Tons::zero);
            let projected = port.current_stock() + moved;
            let utilization_pct = if port.max_capacity().is_positive() {
                projected.to_f64() / port.max_capacity().to_f64() * 100.0
            } else {
                0.0
            };
            PortUtilization {
                port_id: port.id().into_inner(),
                name: port.name().to_owned(),
                assigned: moved.value(),
                capacity: port.max_capacity().value(),
                utilization_pct,
            }
        })
        .collect();
    out.sort_by_key(|p| p.port_id);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        eval,
        search::tests::{fixture_context, fixture_problem, fixture_solution},
    };
    use vessel_alloc_model::prelude::{CostBreakdown, PortIdentifier};

    #[test]
    fn test_summary_of_a_clean_plan() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);

        let kpis = summarize(&ctx, &solution, &solution, Duration::from_millis(42));
        assert_eq!(kpis.total_cost, kpis.baseline_cost);
        assert_eq!(kpis.savings, 0.0);
        assert_eq!(kpis.savings_pct, 0.0);
        assert_eq!(kpis.assigned_tonnage, 220_000);
        assert_eq!(kpis.violations, 0);
        assert_eq!(kpis.unassigned_vessels, 0);
        assert_eq!(kpis.wall_time_ms, 42);
        assert!(kpis.avg_predicted_delay_days >= 0.0);
    }

    #[test]
    fn test_savings_against_a_worse_baseline() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);

        // Everyone through port 1: heavily penalized baseline.
        let crowded: Vec<_> = ctx
            .assignable()
            .iter()
            .map(|&vessel| {
                let route = ctx.route_via_port(vessel, PortIdentifier::new(1)).unwrap();
                ctx.assignment_for(vessel, route).unwrap()
            })
            .collect();
        let fitness = eval::fitness_of(&ctx, &crowded);
        let baseline = Solution::new(crowded, fitness);

        let kpis = summarize(&ctx, &solution, &baseline, Duration::ZERO);
        assert!(kpis.savings > 0.0);
        assert!(kpis.savings_pct > 0.0);
        assert!(kpis.savings_pct <= 100.0);
    }

    #[test]
    fn test_empty_baseline_has_no_savings_ratio() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let kpis = summarize(
            &ctx,
            &Solution::empty(),
            &Solution::empty(),
            Duration::ZERO,
        );
        assert_eq!(kpis.savings_pct, 0.0);
        assert_eq!(kpis.avg_predicted_delay_days, 0.0);
        assert_eq!(kpis.assigned_tonnage, 0);
    }

    #[test]
    fn test_demurrage_sums_attached_breakdowns() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);

        let with_breakdowns: Vec<_> = solution
            .iter()
            .cloned()
            .map(|a| a.with_breakdown(CostBreakdown::new(0.0, 0.0, 0.0, 0.0, 500.0)))
            .collect();
        let fitness = solution.fitness();
        let attached = Solution::new(with_breakdowns, fitness);

        let kpis = summarize(&ctx, &attached, &attached, Duration::ZERO);
        assert_eq!(kpis.total_demurrage, 1_500.0);
    }

    #[test]
    fn test_port_utilization_lists_every_port_in_id_order() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);

        let utilization = port_utilization(&ctx, &solution);
        assert_eq!(utilization.len(), 3);
        assert_eq!(
            utilization.iter().map(|p| p.port_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // Vessel 1 discharges 75k at port 1 on top of 10k of stock.
        assert_eq!(utilization[0].assigned, 75_000);
        assert_eq!(utilization[0].capacity, 100_000);
        assert!((utilization[0].utilization_pct - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_stage_report_reads_the_run() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);
        let run = StageRun {
            best: solution.clone(),
            iterations: 17,
            budget_exhausted: true,
        };
        let report = StageReport::of(PipelineState::RunningGa, &run, Duration::from_millis(3));
        assert_eq!(report.stage, PipelineState::RunningGa);
        assert_eq!(report.iterations, 17);
        assert_eq!(report.best_total, solution.fitness().total());
        assert_eq!(report.elapsed_ms, 3);
        assert!(report.budget_exhausted);
    }
}
