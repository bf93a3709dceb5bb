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

pub mod cost;
pub mod penalty;

pub use cost::{
    CostModel, DEFAULT_OCEAN_RATE, DataIntegrityError, PlanCost, ScenarioFactors,
};
pub use penalty::{
    OVERLOAD_PENALTY_PER_TON, PenaltyModel, SEQUENCING_PENALTY, SequencingRule,
};

use crate::context::SearchContext;
use vessel_alloc_model::prelude::{Assignment, Fitness};

/// Evaluates a plan into the fitness used by every search stage.
///
/// Cost and penalty are kept separate so that reports can tell real
/// money from constraint pressure.
pub fn fitness_of(ctx: &SearchContext<'_>, assignments: &[Assignment]) -> Fitness {
    let cost = CostModel::new(ctx).plan_cost(assignments);
    let penalty = PenaltyModel::new(ctx).penalty(assignments);
    Fitness::new(cost.total(), penalty)
}
