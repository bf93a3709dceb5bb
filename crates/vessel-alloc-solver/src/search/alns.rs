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
    config::AlnsConfig,
    context::SearchContext,
    engine::{
        control::{RunControl, RunSignal},
        progress::StageProgress,
    },
    eval,
    search::{
        StageRun,
        oplib::{
            DestroyOperator, GreedyRepair, OperatorPool, RandomDestroy, RegretRepair,
            RelatedDestroy, RepairOperator, WorstDestroy, plan_of,
        },
        stage_rng,
    },
};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};
use vessel_alloc_model::{
    prelude::{Assignment, Solution, VesselIdentifier},
    solution::err::AssignmentError,
};

/// How often the stage polls its control and reports progress.
const CHECKPOINT_MASK: usize = 0xF;

/// Adaptive large neighborhood search over a seed plan.
///
/// Each iteration tears a few vessels out of the incumbent with a
/// destroy operator, rebuilds the plan with a repair operator, and
/// accepts the candidate with a simulated annealing criterion. Operator
/// weights adapt with the rewards their candidates earn, so pairings
/// that keep producing improvements get sampled more often.
pub struct AlnsSearch {
    config: AlnsConfig,
    destroys: OperatorPool<dyn DestroyOperator>,
    repairs: OperatorPool<dyn RepairOperator>,
}

impl AlnsSearch {
    pub fn new(config: AlnsConfig) -> Self {
        let destroys: Vec<Box<dyn DestroyOperator>> = vec![
            Box::new(RandomDestroy),
            Box::new(WorstDestroy),
            Box::new(RelatedDestroy),
        ];
        let repairs: Vec<Box<dyn RepairOperator>> =
            vec![Box::new(GreedyRepair), Box::new(RegretRepair)];
        Self {
            config,
            destroys: OperatorPool::new(destroys),
            repairs: OperatorPool::new(repairs),
        }
    }

    #[inline]
    pub fn config(&self) -> &AlnsConfig {
        &self.config
    }

    #[inline]
    pub fn destroy_pool(&self) -> &OperatorPool<dyn DestroyOperator> {
        &self.destroys
    }

    #[inline]
    pub fn repair_pool(&self) -> &OperatorPool<dyn RepairOperator> {
        &self.repairs
    }

    #[instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn run(
        &mut self,
        ctx: &SearchContext<'_>,
        seed: &Solution,
        control: &RunControl,
        progress: &mut StageProgress<'_>,
    ) -> Result<StageRun, AssignmentError> {
        if seed.is_empty() {
            progress.finish("nothing to optimize");
            return Ok(StageRun {
                best: seed.clone(),
                iterations: 0,
                budget_exhausted: false,
            });
        }

        let mut rng = stage_rng(self.config.seed);
        let mut current = seed.clone();
        let mut best = seed.clone();
        let mut temperature = self.config.initial_temperature;
        let mut iterations = 0;
        let mut budget_exhausted = false;

        for iteration in 0..self.config.iterations {
            if iteration & CHECKPOINT_MASK == 0 {
                match control.checkpoint() {
                    RunSignal::Continue => {}
                    RunSignal::Cancelled => break,
                    RunSignal::BudgetExhausted => {
                        budget_exhausted = true;
                        break;
                    }
                }
                progress.emit(
                    iteration,
                    self.config.iterations,
                    format!(
                        "temperature {:.2}, best {:.0}",
                        temperature,
                        best.fitness().total()
                    ),
                );
            }

            let destroy_idx = self.destroys.choose(&mut rng);
            let repair_idx = self.repairs.choose(&mut rng);

            let count = rng
                .random_range(self.config.destroy_min..=self.config.destroy_max)
                .min(current.len());
            let victims = self
                .destroys
                .get(destroy_idx)
                .operator()
                .select_victims(ctx, &current, count, &mut rng);

            let mut working: BTreeMap<VesselIdentifier, Assignment> = current
                .iter()
                .map(|a| (a.vessel(), a.clone()))
                .collect();
            for vessel in &victims {
                working.remove(vessel);
            }
            self.repairs
                .get(repair_idx)
                .operator()
                .repair(ctx, &mut working, &victims, &mut rng)?;

            let plan = plan_of(&working);
            let fitness = eval::fitness_of(ctx, &plan);
            let candidate = Solution::new(plan, fitness);

            self.destroys.get_mut(destroy_idx).stats_mut().on_attempt();
            self.repairs.get_mut(repair_idx).stats_mut().on_attempt();

            let delta = candidate.fitness().total() - current.fitness().total();
            if rng.random::<f64>() < acceptance_probability(delta, temperature) {
                let improved = candidate.fitness() < current.fitness();
                current = candidate;
                if current.fitness() < best.fitness() {
                    best = current.clone();
                    self.reward(destroy_idx, repair_idx, self.config.reward_best);
                } else if improved {
                    self.reward(destroy_idx, repair_idx, self.config.reward_improvement);
                }
            }

            temperature = (temperature * self.config.cooling_rate).max(self.config.min_temperature);
            iterations = iteration + 1;
        }

        for record in self.destroys.records() {
            debug!(
                operator = record.operator().name(),
                attempts = record.stats().attempts(),
                accepted = record.stats().accepted(),
                weight = record.stats().weight(),
                "destroy operator statistics"
            );
        }
        for record in self.repairs.records() {
            debug!(
                operator = record.operator().name(),
                attempts = record.stats().attempts(),
                accepted = record.stats().accepted(),
                weight = record.stats().weight(),
                "repair operator statistics"
            );
        }
        info!(
            iterations,
            best = best.fitness().total(),
            penalty = best.fitness().penalty(),
            "neighborhood stage finished"
        );
        Ok(StageRun {
            best,
            iterations,
            budget_exhausted,
        })
    }

    fn reward(&mut self, destroy_idx: usize, repair_idx: usize, reward: f64) {
        self.destroys.get_mut(destroy_idx).stats_mut().on_accept(reward);
        self.repairs.get_mut(repair_idx).stats_mut().on_accept(reward);
    }
}

/// Metropolis acceptance: improvements always pass, worse candidates
/// pass with a probability that shrinks as the temperature cools. Equal
/// candidates are rejected to keep the walk from cycling in place.
fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else if delta > 0.0 {
        (-delta / temperature.max(1e-12)).exp()
    } else {
        0.0
    }
}
