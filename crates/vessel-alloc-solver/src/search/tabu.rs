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
    config::TabuConfig,
    context::SearchContext,
    engine::{
        control::{RunControl, RunSignal},
        progress::StageProgress,
    },
    eval,
    search::{StageRun, oplib::plan_of, stage_rng},
};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, instrument};
use vessel_alloc_model::{
    prelude::{Assignment, Fitness, Solution, VesselIdentifier},
    solution::err::AssignmentError,
};

/// How often the stage reports progress, in rounds.
const PROGRESS_STRIDE: usize = 25;

/// A move is identified by the port layout it leaves and the one it
/// creates, each a per-vessel port id list in canonical vessel order.
type MoveKey = (Vec<u32>, Vec<u32>);

/// One candidate plan in the current neighborhood.
struct Neighbor {
    plan: BTreeMap<VesselIdentifier, Assignment>,
    fitness: Fitness,
    signature: Vec<u32>,
}

/// Short term memory polish stage.
///
/// Walks the swap and reroute neighborhood of the incumbent, always
/// moving to the best admissible neighbor even when it is worse, and
/// forbids the reverse move for a fixed number of rounds so the walk
/// does not bounce straight back. A tabu move is still admissible when
/// it beats the best plan seen so far.
#[derive(Debug, Clone)]
pub struct TabuSearch {
    config: TabuConfig,
}

impl TabuSearch {
    #[inline]
    pub fn new(config: TabuConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &TabuConfig {
        &self.config
    }

    #[instrument(skip_all, fields(iterations = self.config.iterations, tenure = self.config.tenure))]
    pub fn run(
        &self,
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
        let mut current: BTreeMap<VesselIdentifier, Assignment> =
            seed.iter().map(|a| (a.vessel(), a.clone())).collect();
        let mut best = seed.clone();
        let mut tabu_until: HashMap<MoveKey, usize> = HashMap::new();

        let mut iterations = 0;
        let mut budget_exhausted = false;

        for round in 0..self.config.iterations {
            match control.checkpoint() {
                RunSignal::Continue => {}
                RunSignal::Cancelled => break,
                RunSignal::BudgetExhausted => {
                    budget_exhausted = true;
                    break;
                }
            }

            let scan = self.scan_order(&current, &mut rng);
            let mut neighbors = self.neighborhood(ctx, &current, &scan)?;
            if neighbors.is_empty() {
                break;
            }

            let before = signature_of(&current);
            let mut admissible: Option<usize> = None;
            let mut overall = 0;
            for (idx, neighbor) in neighbors.iter().enumerate() {
                if neighbor.fitness < neighbors[overall].fitness {
                    overall = idx;
                }
                let key = (before.clone(), neighbor.signature.clone());
                let tabu = tabu_until.get(&key).is_some_and(|&until| round < until);
                if tabu && neighbor.fitness >= best.fitness() {
                    continue;
                }
                if admissible.is_none_or(|a| neighbor.fitness < neighbors[a].fitness) {
                    admissible = Some(idx);
                }
            }

            // All moves tabu and none aspirated: take the least bad one.
            let winner = neighbors.swap_remove(admissible.unwrap_or(overall));

            let expire = round + self.config.tenure;
            tabu_until.insert((before.clone(), winner.signature.clone()), expire);
            tabu_until.insert((winner.signature, before), expire);
            tabu_until.retain(|_, until| *until > round);

            current = winner.plan;
            if winner.fitness < best.fitness() {
                best = Solution::new(plan_of(&current), winner.fitness);
            }

            iterations = round + 1;
            if round % PROGRESS_STRIDE == 0 {
                progress.emit(
                    round,
                    self.config.iterations,
                    format!("round {}, best {:.0}", round, best.fitness().total()),
                );
            }
        }

        info!(
            iterations,
            best = best.fitness().total(),
            penalty = best.fitness().penalty(),
            "tabu stage finished"
        );
        Ok(StageRun {
            best,
            iterations,
            budget_exhausted,
        })
    }

    /// Vessels examined this round. Small fleets are scanned whole,
    /// large ones through a random sample to bound the neighborhood.
    fn scan_order(
        &self,
        current: &BTreeMap<VesselIdentifier, Assignment>,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselIdentifier> {
        let mut vessels: Vec<VesselIdentifier> = current.keys().copied().collect();
        if vessels.len() > self.config.max_vessels_scanned {
            vessels.shuffle(rng);
            vessels.truncate(self.config.max_vessels_scanned);
            vessels.sort_unstable();
        }
        vessels
    }

    fn neighborhood(
        &self,
        ctx: &SearchContext<'_>,
        current: &BTreeMap<VesselIdentifier, Assignment>,
        scan: &[VesselIdentifier],
    ) -> Result<Vec<Neighbor>, AssignmentError> {
        let mut neighbors = Vec::new();

        // Single vessel reroutes.
        for &vessel in scan {
            let from = current[&vessel].port();
            for port in ctx
                .candidate_ports(vessel)
                .into_iter()
                .filter(|&port| port != from)
                .take(self.config.max_ports_scanned)
            {
                let Some(route) = ctx.route_via_port(vessel, port) else {
                    continue;
                };
                let mut plan = current.clone();
                plan.insert(vessel, ctx.assignment_for(vessel, route)?);
                neighbors.push(neighbor_of(ctx, plan));
            }
        }

        // Pairwise port swaps.
        for (i, &a) in scan.iter().enumerate() {
            for &b in &scan[i + 1..] {
                let port_a = current[&a].port();
                let port_b = current[&b].port();
                if port_a == port_b {
                    continue;
                }
                let Some(route_a) = ctx.route_via_port(a, port_b) else {
                    continue;
                };
                let Some(route_b) = ctx.route_via_port(b, port_a) else {
                    continue;
                };
                let mut plan = current.clone();
                plan.insert(a, ctx.assignment_for(a, route_a)?);
                plan.insert(b, ctx.assignment_for(b, route_b)?);
                neighbors.push(neighbor_of(ctx, plan));
            }
        }

        Ok(neighbors)
    }
}

fn neighbor_of(ctx: &SearchContext<'_>, plan: BTreeMap<VesselIdentifier, Assignment>) -> Neighbor {
    let assignments = plan_of(&plan);
    let fitness = eval::fitness_of(ctx, &assignments);
    let signature = signature_of(&plan);
    Neighbor {
        plan,
        fitness,
        signature,
    }
}

fn signature_of(plan: &BTreeMap<VesselIdentifier, Assignment>) -> Vec<u32> {
    plan.values().map(|a| a.port().into_inner()).collect()
}
