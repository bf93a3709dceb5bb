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

use crate::context::SearchContext;
use std::collections::BTreeMap;
use vessel_alloc_core::prelude::{Money, Tons};
use vessel_alloc_model::prelude::*;

/// Penalty per ton of port or plant capacity overload.
pub const OVERLOAD_PENALTY_PER_TON: Money = 1_000_000.0;

/// Flat penalty per violated sequencing rule.
pub const SEQUENCING_PENALTY: Money = 500_000.0;

/// Declares that shipments discharging at `port` must be their vessel's
/// call number `required_call` within the plan.
///
/// Rules are plain data. Scenarios add or drop them without touching the
/// penalty code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencingRule {
    port: PortIdentifier,
    required_call: usize,
}

impl SequencingRule {
    /// Creates a rule; call numbers are 1-based and clamp up to 1.
    #[inline]
    pub fn new(port: PortIdentifier, required_call: usize) -> Self {
        Self {
            port,
            required_call: required_call.max(1),
        }
    }

    #[inline]
    pub fn port(&self) -> PortIdentifier {
        self.port
    }

    #[inline]
    pub fn required_call(&self) -> usize {
        self.required_call
    }

    #[inline]
    pub fn is_violated_by(&self, port: PortIdentifier, call: usize) -> bool {
        self.port == port && call != self.required_call
    }
}

impl std::fmt::Display for SequencingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must be call #{}", self.port, self.required_call)
    }
}

/// Scores the constraint violations of a plan in money terms, so that
/// infeasible plans stay comparable during search but never win against
/// a feasible one.
#[derive(Debug, Clone, Copy)]
pub struct PenaltyModel<'a> {
    ctx: &'a SearchContext<'a>,
}

impl<'a> PenaltyModel<'a> {
    #[inline]
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self { ctx }
    }

    /// Total penalty of a plan: overload tonnage at ports and plants plus
    /// flat charges for violated sequencing rules.
    pub fn penalty(&self, assignments: &[Assignment]) -> Money {
        self.overload_penalty(assignments) + self.sequencing_penalty(assignments)
    }

    fn overload_penalty(&self, assignments: &[Assignment]) -> Money {
        let problem = self.ctx.problem();
        let mut port_load: BTreeMap<PortIdentifier, Tons> = BTreeMap::new();
        let mut plant_load: BTreeMap<PlantIdentifier, Tons> = BTreeMap::new();
        for asg in assignments {
            *port_load.entry(asg.port()).or_insert_with(Tons::zero) += asg.quantity();
            *plant_load.entry(asg.plant()).or_insert_with(Tons::zero) += asg.quantity();
        }

        let mut overload = Tons::zero();
        for (port_id, load) in port_load {
            if let Some(port) = problem.ports().get(port_id) {
                overload += load.saturating_sub(port.headroom());
            }
        }
        for (plant_id, load) in plant_load {
            if let Some(plant) = problem.plants().get(plant_id) {
                overload += load.saturating_sub(plant.headroom());
            }
        }
        overload.to_f64() * OVERLOAD_PENALTY_PER_TON
    }

    fn sequencing_penalty(&self, assignments: &[Assignment]) -> Money {
        if self.ctx.rules().is_empty() {
            return 0.0;
        }
        let mut calls: BTreeMap<VesselIdentifier, usize> = BTreeMap::new();
        let mut penalty = 0.0;
        for asg in assignments {
            let call = calls
                .entry(asg.vessel())
                .and_modify(|c| *c += 1)
                .or_insert(1);
            for rule in self.ctx.rules() {
                if rule.is_violated_by(asg.port(), *call) {
                    penalty += SEQUENCING_PENALTY;
                }
            }
        }
        penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PredictorConfig,
        delay::DelayPredictor,
        eval::cost::ScenarioFactors,
    };
    use chrono::NaiveDate;

    #[inline]
    fn vessel(id: u32, capacity: i64) -> Vessel {
        Vessel::new(
            VesselIdentifier::new(id),
            format!("MV {id}"),
            Material::IronOre,
            Tons::new(capacity),
            NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
            3.0,
            10_000.0,
            "Saldanha",
        )
        .unwrap()
    }

    #[inline]
    fn port(id: u32, max: i64, stock: i64) -> Port {
        Port::new(
            PortIdentifier::new(id),
            format!("P{id}"),
            Tons::new(max),
            Tons::new(stock),
            4.0,
            0.5,
            Tons::new(25_000),
        )
        .unwrap()
    }

    #[inline]
    fn plant(id: u32, max: i64) -> Plant {
        Plant::new(
            PlantIdentifier::new(id),
            format!("W{id}"),
            Material::IronOre,
            Tons::new(max),
            Tons::new(0),
            true,
        )
        .unwrap()
    }

    #[inline]
    fn route(id: u32, port: u32, plant: u32) -> Route {
        Route::new(
            RouteIdentifier::new(id),
            PortIdentifier::new(port),
            PlantIdentifier::new(plant),
            2.0,
            2,
            Tons::new(100_000),
        )
        .unwrap()
    }

    fn two_vessel_problem() -> Problem {
        Problem::new(
            [vessel(1, 50_000), vessel(2, 50_000)].into_iter().collect(),
            [port(1, 80_000, 0), port(2, 200_000, 0)]
                .into_iter()
                .collect(),
            [plant(1, 500_000)].into_iter().collect(),
            [route(1, 1, 1), route(2, 2, 1)].into_iter().collect(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap()
    }

    fn context(problem: &Problem, rules: Vec<SequencingRule>) -> SearchContext<'_> {
        let predictor = DelayPredictor::fit(problem, &PredictorConfig::default());
        SearchContext::build(problem, &predictor, ScenarioFactors::default(), rules)
    }

    #[test]
    fn test_spread_plan_has_no_penalty() {
        let problem = two_vessel_problem();
        let ctx = context(&problem, Vec::new());
        let plan = vec![
            ctx.assignment_for(VesselIdentifier::new(1), RouteIdentifier::new(1))
                .unwrap(),
            ctx.assignment_for(VesselIdentifier::new(2), RouteIdentifier::new(2))
                .unwrap(),
        ];
        assert_eq!(PenaltyModel::new(&ctx).penalty(&plan), 0.0);
    }

    #[test]
    fn test_port_overload_charged_per_ton() {
        let problem = two_vessel_problem();
        let ctx = context(&problem, Vec::new());
        // Both vessels pile 100k tons onto port 1 with 80k of headroom.
        let plan = vec![
            ctx.assignment_for(VesselIdentifier::new(1), RouteIdentifier::new(1))
                .unwrap(),
            ctx.assignment_for(VesselIdentifier::new(2), RouteIdentifier::new(1))
                .unwrap(),
        ];
        assert_eq!(
            PenaltyModel::new(&ctx).penalty(&plan),
            20_000.0 * OVERLOAD_PENALTY_PER_TON
        );
    }

    #[test]
    fn test_sequencing_rule_violation_is_flat() {
        let problem = two_vessel_problem();
        let rule = SequencingRule::new(PortIdentifier::new(1), 2);
        let ctx = context(&problem, vec![rule]);
        // Single-call vessels can never make port 1 their second call.
        let plan = vec![
            ctx.assignment_for(VesselIdentifier::new(1), RouteIdentifier::new(1))
                .unwrap(),
            ctx.assignment_for(VesselIdentifier::new(2), RouteIdentifier::new(2))
                .unwrap(),
        ];
        let penalty = PenaltyModel::new(&ctx).penalty(&plan);
        assert_eq!(penalty, SEQUENCING_PENALTY);
    }

    #[test]
    fn test_satisfied_rule_costs_nothing() {
        let problem = two_vessel_problem();
        let rule = SequencingRule::new(PortIdentifier::new(2), 1);
        let ctx = context(&problem, vec![rule]);
        let plan = vec![
            ctx.assignment_for(VesselIdentifier::new(1), RouteIdentifier::new(1))
                .unwrap(),
            ctx.assignment_for(VesselIdentifier::new(2), RouteIdentifier::new(2))
                .unwrap(),
        ];
        assert_eq!(PenaltyModel::new(&ctx).penalty(&plan), 0.0);
    }

    #[test]
    fn test_rule_call_number_clamps_to_one() {
        let rule = SequencingRule::new(PortIdentifier::new(1), 0);
        assert_eq!(rule.required_call(), 1);
        assert!(!rule.is_violated_by(PortIdentifier::new(1), 1));
        assert!(rule.is_violated_by(PortIdentifier::new(1), 2));
        assert!(!rule.is_violated_by(PortIdentifier::new(2), 2));
    }
}
