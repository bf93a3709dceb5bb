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
    context::SearchContext,
    eval,
    search::oplib::{RepairOperator, plan_of},
};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use vessel_alloc_model::{
    prelude::{Assignment, VesselIdentifier},
    solution::err::AssignmentError,
};

/// Reinserts each missing vessel on its cheapest feasible route, judged
/// against the plan built so far so that overloads count.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRepair;

impl RepairOperator for GreedyRepair {
    fn name(&self) -> &'static str {
        "GreedyRepair"
    }

    fn repair(
        &self,
        ctx: &SearchContext<'_>,
        working: &mut BTreeMap<VesselIdentifier, Assignment>,
        missing: &[VesselIdentifier],
        _rng: &mut ChaCha8Rng,
    ) -> Result<(), AssignmentError> {
        for &vessel in missing {
            let mut best: Option<(f64, Assignment)> = None;
            for &route in ctx.feasible_routes(vessel) {
                let candidate = ctx.assignment_for(vessel, route)?;
                let mut plan = plan_of(working);
                plan.push(candidate.clone());
                let total = eval::fitness_of(ctx, &plan).total();
                if best.as_ref().is_none_or(|(t, _)| total < *t) {
                    best = Some((total, candidate));
                }
            }
            if let Some((_, asg)) = best {
                working.insert(vessel, asg);
            }
        }
        Ok(())
    }
}
