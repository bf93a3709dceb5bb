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

use crate::{context::SearchContext, eval};
use tracing::instrument;
use vessel_alloc_model::{
    prelude::{PortIdentifier, Solution},
    solution::err::AssignmentError,
};

/// Naive reference plan: vessels take ports round robin, in id order.
///
/// This is the yardstick the optimized plan is compared against in the
/// run report, deliberately ignoring congestion and cost.
#[instrument(skip_all)]
pub fn round_robin(ctx: &SearchContext<'_>) -> Result<Solution, AssignmentError> {
    let mut ports: Vec<PortIdentifier> = ctx.problem().ports().iter().map(|p| p.id()).collect();
    ports.sort_unstable();

    let mut plan = Vec::with_capacity(ctx.assignable().len());
    for (i, &vessel) in ctx.assignable().iter().enumerate() {
        let preferred = if ports.is_empty() {
            None
        } else {
            ctx.route_via_port(vessel, ports[i % ports.len()])
        };
        let route = match preferred {
            Some(route) => route,
            // Fall back to the first feasible route when the preferred
            // port does not serve this cargo.
            None => ctx.feasible_routes(vessel)[0],
        };
        plan.push(ctx.assignment_for(vessel, route)?);
    }
    let fitness = eval::fitness_of(ctx, &plan);
    Ok(Solution::new(plan, fitness))
}
