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
    config::GaConfig,
    context::SearchContext,
    engine::{
        control::{RunControl, RunSignal},
        progress::StageProgress,
    },
    eval,
    search::{StageRun, stage_rng},
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{info, instrument};
use vessel_alloc_model::{
    prelude::{Assignment, Fitness, Solution},
    solution::err::AssignmentError,
};

/// Population based construction stage.
///
/// An individual is one assignment per assignable vessel, kept in the
/// context's vessel order. Single point crossover depends on that
/// alignment: slot `i` always describes the same vessel in every
/// individual.
#[derive(Debug, Clone)]
pub struct GeneticSearch {
    config: GaConfig,
}

impl GeneticSearch {
    #[inline]
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    #[instrument(skip_all, fields(
        population = self.config.population,
        generations = self.config.generations
    ))]
    pub fn run(
        &self,
        ctx: &SearchContext<'_>,
        control: &RunControl,
        progress: &mut StageProgress<'_>,
    ) -> Result<StageRun, AssignmentError> {
        if ctx.assignable().is_empty() || self.config.population == 0 {
            progress.finish("nothing to optimize");
            return Ok(StageRun {
                best: Solution::empty(),
                iterations: 0,
                budget_exhausted: false,
            });
        }

        let mut rng = stage_rng(self.config.seed);
        let mut population: Vec<Vec<Assignment>> = (0..self.config.population)
            .map(|_| self.random_individual(ctx, &mut rng))
            .collect::<Result<_, _>>()?;
        let mut fitnesses = evaluate(ctx, &population);
        let (mut best_plan, mut best_fitness) = pick_best(&population, &fitnesses);

        let mut iterations = 0;
        let mut budget_exhausted = false;
        for generation in 0..self.config.generations {
            match control.checkpoint() {
                RunSignal::Continue => {}
                RunSignal::Cancelled => break,
                RunSignal::BudgetExhausted => {
                    budget_exhausted = true;
                    break;
                }
            }

            population = self.next_generation(ctx, &population, &fitnesses, &mut rng)?;
            fitnesses = evaluate(ctx, &population);
            let (plan, fitness) = pick_best(&population, &fitnesses);
            if fitness < best_fitness {
                best_plan = plan;
                best_fitness = fitness;
            }

            iterations = generation + 1;
            progress.emit(
                iterations,
                self.config.generations,
                format!(
                    "generation {}/{}, best {:.0}",
                    iterations,
                    self.config.generations,
                    best_fitness.total()
                ),
            );
        }

        // Publish with a fresh evaluation of the winner.
        let fitness = eval::fitness_of(ctx, &best_plan);
        info!(
            iterations,
            best = fitness.total(),
            penalty = fitness.penalty(),
            "genetic stage finished"
        );
        Ok(StageRun {
            best: Solution::new(best_plan, fitness),
            iterations,
            budget_exhausted,
        })
    }

    fn random_individual(
        &self,
        ctx: &SearchContext<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        ctx.assignable()
            .iter()
            .map(|&vessel| {
                let routes = ctx.feasible_routes(vessel);
                let route = routes[rng.random_range(0..routes.len())];
                ctx.assignment_for(vessel, route)
            })
            .collect()
    }

    fn next_generation(
        &self,
        ctx: &SearchContext<'_>,
        population: &[Vec<Assignment>],
        fitnesses: &[Fitness],
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Vec<Assignment>>, AssignmentError> {
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| fitnesses[a].cmp(&fitnesses[b]));

        let mut next = Vec::with_capacity(population.len());
        for &elite in order.iter().take(self.config.elite_count()) {
            next.push(population[elite].clone());
        }
        while next.len() < population.len() {
            let a = self.tournament(fitnesses, rng);
            let b = self.tournament(fitnesses, rng);
            let mut child = if rng.random_bool(self.config.crossover_rate) {
                crossover(&population[a], &population[b], rng)
            } else {
                population[a].clone()
            };
            if rng.random_bool(self.config.mutation_rate) {
                self.mutate(ctx, &mut child, rng)?;
            }
            next.push(child);
        }
        Ok(next)
    }

    fn tournament(&self, fitnesses: &[Fitness], rng: &mut ChaCha8Rng) -> usize {
        let mut winner = rng.random_range(0..fitnesses.len());
        for _ in 1..self.config.tournament {
            let challenger = rng.random_range(0..fitnesses.len());
            if fitnesses[challenger] < fitnesses[winner] {
                winner = challenger;
            }
        }
        winner
    }

    /// Reroutes one random slot onto a different feasible route.
    fn mutate(
        &self,
        ctx: &SearchContext<'_>,
        child: &mut [Assignment],
        rng: &mut ChaCha8Rng,
    ) -> Result<(), AssignmentError> {
        let slot = rng.random_range(0..child.len());
        let vessel = child[slot].vessel();
        let routes = ctx.feasible_routes(vessel);
        if routes.len() < 2 {
            return Ok(());
        }
        let current = child[slot].route();
        // Uniform draw over the alternatives: remap a hit on the current
        // route to the last index, which the range excludes.
        let mut pick = rng.random_range(0..routes.len() - 1);
        if routes[pick] == current {
            pick = routes.len() - 1;
        }
        child[slot] = ctx.assignment_for(vessel, routes[pick])?;
        Ok(())
    }
}

fn evaluate(ctx: &SearchContext<'_>, population: &[Vec<Assignment>]) -> Vec<Fitness> {
    population
        .par_iter()
        .map(|plan| eval::fitness_of(ctx, plan))
        .collect()
}

fn pick_best(population: &[Vec<Assignment>], fitnesses: &[Fitness]) -> (Vec<Assignment>, Fitness) {
    let mut best = 0;
    for i in 1..fitnesses.len() {
        if fitnesses[i] < fitnesses[best] {
            best = i;
        }
    }
    (population[best].clone(), fitnesses[best])
}

fn crossover(a: &[Assignment], b: &[Assignment], rng: &mut ChaCha8Rng) -> Vec<Assignment> {
    if a.len() < 2 {
        return a.to_vec();
    }
    let cut = rng.random_range(1..a.len());
    let mut child = a[..cut].to_vec();
    child.extend_from_slice(&b[cut..]);
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{pipeline::PipelineState, progress::NullProgressSink},
        search::{
            baseline,
            tests::{fixture_context, fixture_problem},
        },
    };
    use std::collections::BTreeSet;
    use std::time::Duration;
    use vessel_alloc_core::prelude::Tons;
    use vessel_alloc_model::prelude::PortIdentifier;

    fn run_ga(config: GaConfig) -> StageRun {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let mut sink = NullProgressSink;
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningGa);
        GeneticSearch::new(config)
            .run(&ctx, &RunControl::unbounded(), &mut progress)
            .unwrap()
    }

    #[test]
    fn test_finds_clean_spread_for_three_vessels() {
        let run = run_ga(GaConfig::default());
        assert_eq!(run.best.len(), 3);
        assert!(run.best.fitness().is_clean());
        let ports: BTreeSet<PortIdentifier> =
            run.best.iter().map(|a| a.port()).collect();
        assert_eq!(ports.len(), 3);
        assert_eq!(run.iterations, 30);
        assert!(!run.budget_exhausted);
    }

    #[test]
    fn test_beats_or_matches_the_baseline() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let reference = baseline::round_robin(&ctx).unwrap();
        let run = run_ga(GaConfig::default());
        assert!(run.best.fitness() <= reference.fitness());
    }

    #[test]
    fn test_same_seed_reproduces_the_run() {
        let a = run_ga(GaConfig::default());
        let b = run_ga(GaConfig::default());
        assert_eq!(a.best, b.best);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_zero_budget_returns_initial_best() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let control = RunControl::new(
            crate::engine::control::CancelToken::new(),
            Some(Duration::ZERO),
        );
        let mut sink = NullProgressSink;
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningGa);
        let run = GeneticSearch::new(GaConfig::default())
            .run(&ctx, &control, &mut progress)
            .unwrap();
        assert!(run.budget_exhausted);
        assert_eq!(run.iterations, 0);
        // The initial population still yields a full plan.
        assert_eq!(run.best.len(), 3);
    }

    #[test]
    fn test_cancelled_before_start_keeps_initial_best() {
        let problem = fixture_problem();
        let ctx = fixture_context(&problem);
        let token = crate::engine::control::CancelToken::new();
        token.cancel();
        let control = RunControl::new(token, None);
        let mut sink = NullProgressSink;
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningGa);
        let run = GeneticSearch::new(GaConfig::default())
            .run(&ctx, &control, &mut progress)
            .unwrap();
        assert_eq!(run.iterations, 0);
        assert!(!run.budget_exhausted);
        assert_eq!(run.best.len(), 3);
    }

    #[test]
    fn test_empty_fleet_yields_empty_solution() {
        use chrono::NaiveDate;
        use vessel_alloc_model::prelude::*;

        // The only vessel carries coal, the only plant takes iron ore.
        let problem = Problem::new(
            [Vessel::new(
                VesselIdentifier::new(1),
                "MV Stranded",
                Material::CokingCoal,
                Tons::new(50_000),
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                3.0,
                9_000.0,
                "Hay Point",
            )
            .unwrap()]
            .into_iter()
            .collect(),
            [Port::new(
                PortIdentifier::new(1),
                "Haldia",
                Tons::new(100_000),
                Tons::new(0),
                4.0,
                0.5,
                Tons::new(25_000),
            )
            .unwrap()]
            .into_iter()
            .collect(),
            [Plant::new(
                PlantIdentifier::new(1),
                "Durgapur",
                Material::IronOre,
                Tons::new(300_000),
                Tons::new(0),
                true,
            )
            .unwrap()]
            .into_iter()
            .collect(),
            [Route::new(
                RouteIdentifier::new(1),
                PortIdentifier::new(1),
                PlantIdentifier::new(1),
                1.0,
                2,
                Tons::new(100_000),
            )
            .unwrap()]
            .into_iter()
            .collect(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap();
        let ctx = fixture_context(&problem);
        assert!(ctx.assignable().is_empty());

        let mut sink = NullProgressSink;
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningGa);
        let run = GeneticSearch::new(GaConfig::default())
            .run(&ctx, &RunControl::unbounded(), &mut progress)
            .unwrap();
        assert!(run.best.is_empty());
        assert_eq!(run.iterations, 0);
    }
}
