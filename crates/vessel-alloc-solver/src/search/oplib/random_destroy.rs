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

use crate::{context::SearchContext, search::oplib::DestroyOperator};
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use vessel_alloc_model::prelude::{Solution, VesselIdentifier};

/// Removes uniformly chosen assignments. The unbiased baseline that
/// keeps the search from fixating.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDestroy;

impl DestroyOperator for RandomDestroy {
    fn name(&self) -> &'static str {
        "RandomDestroy"
    }

    fn select_victims(
        &self,
        _ctx: &SearchContext<'_>,
        current: &Solution,
        count: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselIdentifier> {
        current
            .assignments()
            .choose_multiple(rng, count)
            .map(|a| a.vessel())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::{fixture_context, fixture_problem, fixture_solution};
    use rand::SeedableRng;

    #[test]
    fn test_selects_requested_count_of_distinct_vessels() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let victims = RandomDestroy.select_victims(&ctx, &solution, 2, &mut rng);
        assert_eq!(victims.len(), 2);
        assert_ne!(victims[0], victims[1]);
        for v in &victims {
            assert!(solution.find(*v).is_some());
        }
    }

    #[test]
    fn test_count_is_capped_by_plan_size() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let solution = fixture_solution(&ctx);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let victims = RandomDestroy.select_victims(&ctx, &solution, 99, &mut rng);
        assert_eq!(victims.len(), solution.len());
    }
}
