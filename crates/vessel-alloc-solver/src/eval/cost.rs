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
use vessel_alloc_core::prelude::Money;
use vessel_alloc_model::prelude::*;

/// Ocean freight rate per ton applied when the tariff book has no ocean
/// entry for the port, neither scoped nor global.
pub const DEFAULT_OCEAN_RATE: Money = 15.0;

/// Weight of the congestion risk in the congestion multiplier.
pub const CONGESTION_RISK_WEIGHT: f64 = 0.2;

/// Weight of the expected delay in the congestion multiplier.
pub const CONGESTION_DELAY_WEIGHT: f64 = 0.05;

/// Scenario wide adjustment knobs applied on top of the tariff book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioFactors {
    /// Multiplier on the ocean freight leg, covering bunker price swings.
    pub fuel_factor: f64,
}

impl ScenarioFactors {
    #[inline]
    pub const fn new(fuel_factor: f64) -> Self {
        Self { fuel_factor }
    }
}

impl Default for ScenarioFactors {
    fn default() -> Self {
        Self { fuel_factor: 1.0 }
    }
}

/// A shipment referencing an entity the problem does not contain.
///
/// Integrity errors stay local to the offending shipment: its cost is
/// skipped and reported, the rest of the plan is evaluated normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataIntegrityError {
    UnknownVessel(VesselIdentifier),
    UnknownPort(PortIdentifier),
    UnknownPlant(PlantIdentifier),
    UnknownRoute(RouteIdentifier),
}

impl std::fmt::Display for DataIntegrityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIntegrityError::UnknownVessel(id) => {
                write!(f, "Cost evaluation references unknown vessel {}", id)
            }
            DataIntegrityError::UnknownPort(id) => {
                write!(f, "Cost evaluation references unknown port {}", id)
            }
            DataIntegrityError::UnknownPlant(id) => {
                write!(f, "Cost evaluation references unknown plant {}", id)
            }
            DataIntegrityError::UnknownRoute(id) => {
                write!(f, "Cost evaluation references unknown route {}", id)
            }
        }
    }
}

impl std::error::Error for DataIntegrityError {}

/// Monetary cost of a whole plan plus the integrity errors hit while
/// evaluating it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCost {
    total: Money,
    errors: Vec<DataIntegrityError>,
}

impl PlanCost {
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    #[inline]
    pub fn errors(&self) -> &[DataIntegrityError] {
        &self.errors
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluates the monetary cost of shipments against one search context.
///
/// The model is a pure function of the context and the shipment: the
/// same inputs always produce the same breakdown.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    ctx: &'a SearchContext<'a>,
}

impl<'a> CostModel<'a> {
    #[inline]
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self { ctx }
    }

    /// Inflation applied to port side costs under congestion.
    #[inline]
    pub fn congestion_multiplier(&self, port: PortIdentifier) -> f64 {
        let est = self.ctx.estimate(port);
        1.0 + CONGESTION_RISK_WEIGHT * est.congestion_risk
            + CONGESTION_DELAY_WEIGHT * est.expected_delay_days
    }

    /// Full cost breakdown for one shipment.
    pub fn breakdown(&self, asg: &Assignment) -> Result<CostBreakdown, DataIntegrityError> {
        let problem = self.ctx.problem();
        let vessel = problem
            .vessels()
            .get(asg.vessel())
            .ok_or(DataIntegrityError::UnknownVessel(asg.vessel()))?;
        let route = problem
            .routes()
            .get(asg.route())
            .ok_or(DataIntegrityError::UnknownRoute(asg.route()))?;
        let port = problem
            .ports()
            .get(asg.port())
            .ok_or(DataIntegrityError::UnknownPort(asg.port()))?;
        if !problem.plants().contains_id(asg.plant()) {
            return Err(DataIntegrityError::UnknownPlant(asg.plant()));
        }

        let quantity = asg.quantity().to_f64();
        let estimate = self.ctx.estimate(asg.port());
        let congestion = self.congestion_multiplier(asg.port());

        let base_rate = problem
            .tariffs()
            .ocean_rate_for(asg.port())
            .unwrap_or(DEFAULT_OCEAN_RATE);
        let ocean = quantity * base_rate * self.ctx.factors().fuel_factor;
        let handling = quantity * port.handling_cost() * congestion;
        let storage = quantity * port.storage_cost() * asg.dwell_days() as f64 * congestion;
        let rail = quantity * route.rail_cost() * congestion;
        let overstay = (estimate.expected_delay_days - vessel.laydays()).max(0.0);
        let demurrage = overstay * vessel.demurrage_rate();

        Ok(CostBreakdown::new(ocean, handling, storage, rail, demurrage))
    }

    /// Sums the cost of every resolvable shipment in the plan; shipments
    /// with broken references contribute an error instead of a cost.
    pub fn plan_cost(&self, assignments: &[Assignment]) -> PlanCost {
        let mut total = 0.0;
        let mut errors = Vec::new();
        for asg in assignments {
            match self.breakdown(asg) {
                Ok(breakdown) => total += breakdown.total(),
                Err(err) => errors.push(err),
            }
        }
        PlanCost { total, errors }
    }
}
