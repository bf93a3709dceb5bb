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

/// Removes a random seed assignment together with others discharging at
/// the same port, so the repair step can rebalance a whole berth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedDestroy;

impl DestroyOperator for RelatedDestroy {
    fn name(&self) -> &'static str {
        "RelatedDestroy"
    }

    fn select_victims(
        &self,
        _ctx: &SearchContext<'_>,
        current: &Solution,
        count: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselIdentifier> {
        let Some(seed) = current.assignments().choose(rng) else {
            return Vec::new();
        };
        let mut victims = vec![seed.vessel()];
        for asg in current.iter() {
            if victims.len() >= count {
                break;
            }
            if asg.vessel() != seed.vessel() && asg.port() == seed.port() {
                victims.push(asg.vessel());
            }
        }
        // Pad with unrelated assignments when the port group is small.
        for asg in current.iter() {
            if victims.len() >= count {
                break;
            }
            if !victims.contains(&asg.vessel()) {
                victims.push(asg.vessel());
            }
        }
        victims
    }
}
