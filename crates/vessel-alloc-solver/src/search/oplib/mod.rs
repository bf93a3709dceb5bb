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

pub mod greedy_repair;
pub mod random_destroy;
pub mod regret_repair;
pub mod related_destroy;
pub mod worst_destroy;

pub use greedy_repair::GreedyRepair;
pub use random_destroy::RandomDestroy;
pub use regret_repair::RegretRepair;
pub use related_destroy::RelatedDestroy;
pub use worst_destroy::WorstDestroy;

use crate::context::SearchContext;
use rand::distr::{Distribution, weighted::WeightedIndex};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use vessel_alloc_core::math::emwa::Ewma;
use vessel_alloc_model::{
    prelude::{Assignment, Solution, VesselIdentifier},
    solution::err::AssignmentError,
};

/// Smoothing factor of the per-operator reward average.
const REWARD_EWMA_ALPHA: f64 = 0.2;

/// Removes a set of assignments from a solution.
pub trait DestroyOperator {
    fn name(&self) -> &'static str;

    /// Picks up to `count` vessels whose assignments get removed.
    fn select_victims(
        &self,
        ctx: &SearchContext<'_>,
        current: &Solution,
        count: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselIdentifier>;
}

/// Reinserts removed vessels into a partial plan.
pub trait RepairOperator {
    fn name(&self) -> &'static str;

    /// Inserts the `missing` vessels back into `working`. Vessels
    /// without any feasible route are left out.
    fn repair(
        &self,
        ctx: &SearchContext<'_>,
        working: &mut BTreeMap<VesselIdentifier, Assignment>,
        missing: &[VesselIdentifier],
        rng: &mut ChaCha8Rng,
    ) -> Result<(), AssignmentError>;
}

/// Materializes a working plan in canonical vessel order.
pub(crate) fn plan_of(working: &BTreeMap<VesselIdentifier, Assignment>) -> Vec<Assignment> {
    working.values().cloned().collect()
}

/// Selection weight and reward history of one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorStats {
    attempts: u64,
    accepted: u64,
    weight: f64,
    reward: Ewma<f64>,
}

impl Default for OperatorStats {
    fn default() -> Self {
        Self {
            attempts: 0,
            accepted: 0,
            weight: 1.0,
            reward: Ewma::new(REWARD_EWMA_ALPHA)
                .expect("reward smoothing factor must lie within 0..=1"),
        }
    }
}

impl OperatorStats {
    #[inline]
    pub fn on_attempt(&mut self) {
        self.attempts += 1;
    }

    #[inline]
    pub fn on_accept(&mut self, reward: f64) {
        self.accepted += 1;
        self.weight += reward;
        self.reward.observe(reward);
    }

    #[inline]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn smoothed_reward(&self) -> f64 {
        self.reward.value_or_zero()
    }
}

/// One operator with its adaptive statistics.
#[derive(Debug)]
pub struct OperatorRecord<Op: ?Sized> {
    stats: OperatorStats,
    operator: Box<Op>,
}

impl<Op: ?Sized> OperatorRecord<Op> {
    #[inline]
    pub fn new(operator: Box<Op>) -> Self {
        Self {
            stats: OperatorStats::default(),
            operator,
        }
    }

    #[inline]
    pub fn operator(&self) -> &Op {
        &self.operator
    }

    #[inline]
    pub fn stats(&self) -> &OperatorStats {
        &self.stats
    }

    #[inline]
    pub fn stats_mut(&mut self) -> &mut OperatorStats {
        &mut self.stats
    }
}

/// Roulette wheel over operators, weighted by their adaptive scores.
#[derive(Debug)]
pub struct OperatorPool<Op: ?Sized> {
    records: Vec<OperatorRecord<Op>>,
}

impl<Op: ?Sized> OperatorPool<Op> {
    #[inline]
    pub fn new(operators: Vec<Box<Op>>) -> Self {
        Self {
            records: operators.into_iter().map(OperatorRecord::new).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &OperatorRecord<Op> {
        &self.records[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut OperatorRecord<Op> {
        &mut self.records[index]
    }

    #[inline]
    pub fn records(&self) -> &[OperatorRecord<Op>] {
        &self.records
    }

    /// Samples an operator index proportional to the current weights.
    pub fn choose(&self, rng: &mut ChaCha8Rng) -> usize {
        let dist = WeightedIndex::new(self.records.iter().map(|r| r.stats().weight()))
            .expect("weights must be non-negative and finite");
        dist.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use static_assertions::assert_obj_safe;

    assert_obj_safe!(DestroyOperator);
    assert_obj_safe!(RepairOperator);

    #[test]
    fn test_stats_start_neutral() {
        let stats = OperatorStats::default();
        assert_eq!(stats.attempts(), 0);
        assert_eq!(stats.accepted(), 0);
        assert_eq!(stats.weight(), 1.0);
        assert_eq!(stats.smoothed_reward(), 0.0);
    }

    #[test]
    fn test_accept_raises_weight() {
        let mut stats = OperatorStats::default();
        stats.on_attempt();
        stats.on_accept(3.0);
        stats.on_attempt();
        assert_eq!(stats.attempts(), 2);
        assert_eq!(stats.accepted(), 1);
        assert_eq!(stats.weight(), 4.0);
        assert_eq!(stats.smoothed_reward(), 3.0);
    }

    #[test]
    fn test_pool_choose_favors_heavy_operator() {
        let mut pool: OperatorPool<dyn DestroyOperator> = OperatorPool::new(vec![
            Box::new(RandomDestroy),
            Box::new(WorstDestroy),
        ]);
        // Make the second operator overwhelmingly heavy.
        for _ in 0..200 {
            pool.get_mut(1).stats_mut().on_accept(10.0);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hits = (0..100).filter(|_| pool.choose(&mut rng) == 1).count();
        assert!(hits > 90);
    }

    #[test]
    fn test_pool_records_expose_stats() {
        let pool: OperatorPool<dyn RepairOperator> =
            OperatorPool::new(vec![Box::new(GreedyRepair), Box::new(RegretRepair)]);
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
        assert_eq!(pool.get(0).operator().name(), "GreedyRepair");
        assert_eq!(pool.records()[1].operator().name(), "RegretRepair");
    }
}
