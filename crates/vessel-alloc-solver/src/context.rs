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

use crate::{
    delay::{DelayEstimate, DelayPredictor},
    eval::{ScenarioFactors, SequencingRule},
};
use serde::Serialize;
use std::collections::BTreeMap;
use vessel_alloc_model::{prelude::*, solution::err::AssignmentError};

/// A vessel excluded from search with the reasons why no route works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedVessel {
    pub vessel_id: u32,
    pub name: String,
    pub reason: String,
}

/// Immutable view shared by every search stage.
///
/// The orchestrator builds the context once per run and stages borrow it
/// read-only, so they can never poison each other through shared state.
/// Vessel and route indices are sorted, which makes every sweep over
/// them reproducible.
#[derive(Debug, Clone)]
pub struct SearchContext<'p> {
    problem: &'p Problem,
    factors: ScenarioFactors,
    rules: Vec<SequencingRule>,
    estimates: BTreeMap<PortIdentifier, DelayEstimate>,
    feasible: BTreeMap<VesselIdentifier, Vec<RouteIdentifier>>,
    assignable: Vec<VesselIdentifier>,
    unassignable: Vec<UnassignedVessel>,
}

impl<'p> SearchContext<'p> {
    /// Indexes the problem: copies the delay estimates, classifies every
    /// vessel as assignable or unassignable and records per-vessel
    /// feasible routes.
    pub fn build(
        problem: &'p Problem,
        predictor: &DelayPredictor,
        factors: ScenarioFactors,
        rules: Vec<SequencingRule>,
    ) -> Self {
        let estimates: BTreeMap<PortIdentifier, DelayEstimate> = problem
            .ports()
            .iter()
            .map(|p| (p.id(), predictor.predict(p.id())))
            .collect();

        let checker = FeasibilityChecker::new(problem);
        let mut vessel_ids: Vec<VesselIdentifier> =
            problem.vessels().iter().map(|v| v.id()).collect();
        vessel_ids.sort_unstable();
        let mut route_ids: Vec<RouteIdentifier> =
            problem.routes().iter().map(|r| r.id()).collect();
        route_ids.sort_unstable();

        let mut feasible = BTreeMap::new();
        let mut assignable = Vec::new();
        let mut unassignable = Vec::new();
        for &vessel_id in &vessel_ids {
            let vessel = problem
                .vessels()
                .get(vessel_id)
                .expect("vessel ids come from the container");
            let mut options = Vec::new();
            let mut reasons: Vec<String> = Vec::new();
            for &route_id in &route_ids {
                let route = problem
                    .routes()
                    .get(route_id)
                    .expect("route ids come from the container");
                match checker.check_pair(vessel, route) {
                    Ok(()) => options.push(route_id),
                    Err(violation) => {
                        let reason = violation.to_string();
                        if !reasons.contains(&reason) {
                            reasons.push(reason);
                        }
                    }
                }
            }
            if options.is_empty() {
                let reason = if reasons.is_empty() {
                    "no routes defined in the scenario".to_string()
                } else {
                    reasons.join("; ")
                };
                unassignable.push(UnassignedVessel {
                    vessel_id: *vessel_id.value(),
                    name: vessel.name().to_string(),
                    reason,
                });
            } else {
                feasible.insert(vessel_id, options);
                assignable.push(vessel_id);
            }
        }

        Self {
            problem,
            factors,
            rules,
            estimates,
            feasible,
            assignable,
            unassignable,
        }
    }

    #[inline]
    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    #[inline]
    pub fn factors(&self) -> ScenarioFactors {
        self.factors
    }

    #[inline]
    pub fn rules(&self) -> &[SequencingRule] {
        &self.rules
    }

    /// Delay estimate for `port`. Ports outside the fitted set get the
    /// conservative fallback so cost evaluation never stalls on them.
    #[inline]
    pub fn estimate(&self, port: PortIdentifier) -> DelayEstimate {
        self.estimates
            .get(&port)
            .copied()
            .unwrap_or_else(DelayEstimate::fallback)
    }

    /// Vessels with at least one feasible route, ascending by id.
    #[inline]
    pub fn assignable(&self) -> &[VesselIdentifier] {
        &self.assignable
    }

    /// Feasible routes of `vessel`, ascending by id. Empty for vessels
    /// that are unassignable or unknown.
    #[inline]
    pub fn feasible_routes(&self, vessel: VesselIdentifier) -> &[RouteIdentifier] {
        self.feasible.get(&vessel).map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn unassignable(&self) -> &[UnassignedVessel] {
        &self.unassignable
    }

    /// Distinct discharge ports reachable by `vessel`, ascending by id.
    pub fn candidate_ports(&self, vessel: VesselIdentifier) -> Vec<PortIdentifier> {
        let mut ports: Vec<PortIdentifier> = self
            .feasible_routes(vessel)
            .iter()
            .map(|&route_id| {
                self.problem
                    .routes()
                    .get(route_id)
                    .expect("feasible routes exist in the problem")
                    .port()
            })
            .collect();
        ports.sort_unstable();
        ports.dedup();
        ports
    }

    /// Cheapest feasible route of `vessel` discharging at `port`, by rail
    /// cost with route id as the tie breaker.
    pub fn route_via_port(
        &self,
        vessel: VesselIdentifier,
        port: PortIdentifier,
    ) -> Option<RouteIdentifier> {
        let mut best: Option<(f64, RouteIdentifier)> = None;
        for &route_id in self.feasible_routes(vessel) {
            let route = self
                .problem
                .routes()
                .get(route_id)
                .expect("feasible routes exist in the problem");
            if route.port() != port {
                continue;
            }
            if best.is_none_or(|(cost, _)| route.rail_cost() < cost) {
                best = Some((route.rail_cost(), route_id));
            }
        }
        best.map(|(_, route_id)| route_id)
    }

    /// Materializes the shipment of `vessel` over `route`: full cargo
    /// capped by the route, dwell from the port's discharge rate, delay
    /// from the port estimate.
    ///
    /// # Panics
    ///
    /// Panics if `vessel` or `route` do not come from this context's
    /// indices.
    pub fn assignment_for(
        &self,
        vessel: VesselIdentifier,
        route: RouteIdentifier,
    ) -> Result<Assignment, AssignmentError> {
        let vessel_rec = self
            .problem
            .vessels()
            .get(vessel)
            .expect("assignable vessels exist in the problem");
        let route_rec = self
            .problem
            .routes()
            .get(route)
            .expect("feasible routes exist in the problem");
        let port = self
            .problem
            .ports()
            .get(route_rec.port())
            .expect("route endpoints are validated at problem construction");

        let quantity = planned_quantity(vessel_rec, route_rec);
        let dwell_days = port.dwell_days_for(quantity);
        let delay = self.estimate(route_rec.port()).expected_delay_days;
        Assignment::new(vessel_rec, route_rec, quantity, dwell_days, delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictorConfig;
    use chrono::NaiveDate;
    use vessel_alloc_core::prelude::Tons;

    #[inline]
    fn vessel(id: u32, material: Material, capacity: i64) -> Vessel {
        Vessel::new(
            VesselIdentifier::new(id),
            format!("MV {id}"),
            material,
            Tons::new(capacity),
            NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            3.0,
            9_000.0,
            "Richards Bay",
        )
        .unwrap()
    }

    #[inline]
    fn port(id: u32, max: i64) -> Port {
        Port::new(
            PortIdentifier::new(id),
            format!("P{id}"),
            Tons::new(max),
            Tons::new(0),
            4.0,
            0.5,
            Tons::new(25_000),
        )
        .unwrap()
    }

    #[inline]
    fn plant(id: u32, material: Material) -> Plant {
        Plant::new(
            PlantIdentifier::new(id),
            format!("W{id}"),
            material,
            Tons::new(300_000),
            Tons::new(0),
            true,
        )
        .unwrap()
    }

    #[inline]
    fn route(id: u32, port: u32, plant: u32, rail: f64) -> Route {
        Route::new(
            RouteIdentifier::new(id),
            PortIdentifier::new(port),
            PlantIdentifier::new(plant),
            rail,
            2,
            Tons::new(100_000),
        )
        .unwrap()
    }

    fn mixed_problem() -> Problem {
        Problem::new(
            [
                vessel(1, Material::IronOre, 60_000),
                vessel(2, Material::CokingCoal, 60_000),
                vessel(3, Material::IronOre, 500_000),
            ]
            .into_iter()
            .collect(),
            [port(1, 80_000), port(2, 80_000)].into_iter().collect(),
            [plant(1, Material::IronOre)].into_iter().collect(),
            [route(1, 1, 1, 2.0), route(2, 2, 1, 3.0), route(3, 1, 1, 1.0)]
                .into_iter()
                .collect(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap()
    }

    fn context(problem: &Problem) -> SearchContext<'_> {
        let predictor = DelayPredictor::fit(problem, &PredictorConfig::default());
        SearchContext::build(problem, &predictor, ScenarioFactors::default(), Vec::new())
    }

    #[test]
    fn test_assignable_is_sorted_and_filtered() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        // Vessel 2 carries coal nobody takes, vessel 3 fits nowhere.
        assert_eq!(ctx.assignable(), &[VesselIdentifier::new(1)]);
        assert_eq!(ctx.unassignable().len(), 2);
    }

    #[test]
    fn test_unassignable_reasons_name_the_violation() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        let coal = ctx
            .unassignable()
            .iter()
            .find(|u| u.vessel_id == 2)
            .unwrap();
        assert!(coal.reason.contains("requires"));
        let oversized = ctx
            .unassignable()
            .iter()
            .find(|u| u.vessel_id == 3)
            .unwrap();
        assert!(oversized.reason.contains("headroom"));
    }

    #[test]
    fn test_feasible_routes_are_sorted() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        let routes = ctx.feasible_routes(VesselIdentifier::new(1));
        assert_eq!(
            routes,
            &[
                RouteIdentifier::new(1),
                RouteIdentifier::new(2),
                RouteIdentifier::new(3)
            ]
        );
        assert!(ctx.feasible_routes(VesselIdentifier::new(3)).is_empty());
    }

    #[test]
    fn test_candidate_ports_are_distinct() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        // Routes 1 and 3 share port 1.
        assert_eq!(
            ctx.candidate_ports(VesselIdentifier::new(1)),
            vec![PortIdentifier::new(1), PortIdentifier::new(2)]
        );
    }

    #[test]
    fn test_route_via_port_prefers_cheap_rail() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        assert_eq!(
            ctx.route_via_port(VesselIdentifier::new(1), PortIdentifier::new(1)),
            Some(RouteIdentifier::new(3))
        );
        assert_eq!(
            ctx.route_via_port(VesselIdentifier::new(1), PortIdentifier::new(9)),
            None
        );
    }

    #[test]
    fn test_assignment_for_fills_derived_fields() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        let asg = ctx
            .assignment_for(VesselIdentifier::new(1), RouteIdentifier::new(1))
            .unwrap();
        assert_eq!(asg.quantity(), Tons::new(60_000));
        // 60k tons at 25k per day round up to three days.
        assert_eq!(asg.dwell_days(), 3);
        assert_eq!(
            asg.predicted_delay_days(),
            ctx.estimate(PortIdentifier::new(1)).expected_delay_days
        );
    }

    #[test]
    fn test_estimate_falls_back_for_unknown_port() {
        let problem = mixed_problem();
        let ctx = context(&problem);
        assert_eq!(
            ctx.estimate(PortIdentifier::new(42)),
            DelayEstimate::fallback()
        );
    }
}
