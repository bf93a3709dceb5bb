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

/// Regret-2 insertion: repeatedly inserts the vessel that would lose the
/// most if forced onto its second best route.
///
/// Vessels with a single feasible route have infinite regret and go
/// first, before the flexible ones eat their capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegretRepair;

impl RepairOperator for RegretRepair {
    fn name(&self) -> &'static str {
        "RegretRepair"
    }

    fn repair(
        &self,
        ctx: &SearchContext<'_>,
        working: &mut BTreeMap<VesselIdentifier, Assignment>,
        missing: &[VesselIdentifier],
        _rng: &mut ChaCha8Rng,
    ) -> Result<(), AssignmentError> {
        let mut remaining: Vec<VesselIdentifier> = missing.to_vec();
        while !remaining.is_empty() {
            // (regret, best total, index into remaining, assignment)
            let mut pick: Option<(f64, f64, usize, Assignment)> = None;
            for (index, &vessel) in remaining.iter().enumerate() {
                let mut best: Option<(f64, Assignment)> = None;
                let mut second: Option<f64> = None;
                for &route in ctx.feasible_routes(vessel) {
                    let candidate = ctx.assignment_for(vessel, route)?;
                    let mut plan = plan_of(working);
                    plan.push(candidate.clone());
                    let total = eval::fitness_of(ctx, &plan).total();
                    match &best {
                        Some((best_total, _)) if total >= *best_total => {
                            if second.is_none_or(|s| total < s) {
                                second = Some(total);
                            }
                        }
                        _ => {
                            if let Some((displaced, _)) = &best {
                                if second.is_none_or(|s| *displaced < s) {
                                    second = Some(*displaced);
                                }
                            }
                            best = Some((total, candidate));
                        }
                    }
                }
                let Some((best_total, asg)) = best else {
                    continue;
                };
                let regret = second.map_or(f64::INFINITY, |s| s - best_total);
                let wins = match &pick {
                    None => true,
                    Some((r, t, _, _)) => {
                        regret > *r || (regret == *r && best_total < *t)
                    }
                };
                if wins {
                    pick = Some((regret, best_total, index, asg));
                }
            }
            let Some((_, _, index, asg)) = pick else {
                // Nothing left is insertable.
                break;
            };
            let vessel = remaining.remove(index);
            working.insert(vessel, asg);
        }
        Ok(())
    }
}
