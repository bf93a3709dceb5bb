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

use crate::{context::SearchContext, eval, search::oplib::DestroyOperator};
use rand_chacha::ChaCha8Rng;
use vessel_alloc_model::prelude::{Assignment, Solution, VesselIdentifier};

/// Removes the assignments whose removal saves the most, measured on the
/// full fitness so that overloading shipments rank first.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstDestroy;

impl DestroyOperator for WorstDestroy {
    fn name(&self) -> &'static str {
        "WorstDestroy"
    }

    fn select_victims(
        &self,
        ctx: &SearchContext<'_>,
        current: &Solution,
        count: usize,
        _rng: &mut ChaCha8Rng,
    ) -> Vec<VesselIdentifier> {
        let full = eval::fitness_of(ctx, current.assignments()).total();
        let mut scored: Vec<(f64, VesselIdentifier)> = current
            .iter()
            .enumerate()
            .map(|(i, asg)| {
                let mut rest: Vec<Assignment> = current.assignments().to_vec();
                rest.remove(i);
                let saving = full - eval::fitness_of(ctx, &rest).total();
                (saving, asg.vessel())
            })
            .collect();
        // Largest saving first, vessel id breaks ties.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(count)
            .map(|(_, vessel)| vessel)
            .collect()
    }
}
