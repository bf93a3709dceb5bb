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

use crate::eval::{ScenarioFactors, SequencingRule};
use std::time::Duration;

/// Settings for the congestion diffusion pass over the port/plant graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Number of synchronous propagation rounds.
    pub rounds: usize,
    /// Fraction of the neighbor average blended into a node per round.
    pub mixing: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            mixing: 0.35,
        }
    }
}

/// Settings for the genetic construction stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaConfig {
    pub population: usize,
    pub generations: usize,
    /// Contestants per tournament selection draw.
    pub tournament: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged each generation.
    pub elite_fraction: f64,
    pub seed: u64,
}

impl GaConfig {
    /// Number of elite individuals, always at least one and never the
    /// whole population.
    #[inline]
    pub fn elite_count(&self) -> usize {
        let raw = (self.population as f64 * self.elite_fraction).ceil() as usize;
        raw.clamp(1, self.population.max(1))
    }
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population: 50,
            generations: 30,
            tournament: 3,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elite_fraction: 0.10,
            seed: 7919,
        }
    }
}

/// Settings for the adaptive large neighborhood stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlnsConfig {
    pub iterations: usize,
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub min_temperature: f64,
    /// Bounds for the number of assignments removed per destroy step.
    pub destroy_min: usize,
    pub destroy_max: usize,
    /// Weight added to an operator pair that produced a new global best.
    pub reward_best: f64,
    /// Weight added to an operator pair whose accepted move improved on
    /// the current solution.
    pub reward_improvement: f64,
    pub seed: u64,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            initial_temperature: 1000.0,
            cooling_rate: 0.995,
            min_temperature: 1e-6,
            destroy_min: 2,
            destroy_max: 4,
            reward_best: 3.0,
            reward_improvement: 1.0,
            seed: 104_729,
        }
    }
}

/// Settings for the tabu refinement stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabuConfig {
    pub iterations: usize,
    /// Rounds a performed move stays forbidden.
    pub tenure: usize,
    /// Cap on the number of assignments considered per neighborhood.
    pub max_vessels_scanned: usize,
    /// Cap on the alternative ports tried per scanned assignment.
    pub max_ports_scanned: usize,
    pub seed: u64,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            tenure: 10,
            max_vessels_scanned: 12,
            max_ports_scanned: 6,
            seed: 1_299_709,
        }
    }
}

/// Top level configuration for a full optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub predictor: PredictorConfig,
    pub ga: GaConfig,
    pub alns: AlnsConfig,
    pub tabu: TabuConfig,
    pub factors: ScenarioFactors,
    pub sequencing_rules: Vec<SequencingRule>,
    /// Wall clock budget shared by all stages. `None` runs unbounded.
    pub max_wall_time: Option<Duration>,
}

impl PipelineConfig {
    #[inline]
    #[must_use]
    pub fn with_max_wall_time(mut self, budget: Duration) -> Self {
        self.max_wall_time = Some(budget);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_factors(mut self, factors: ScenarioFactors) -> Self {
        self.factors = factors;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_sequencing_rule(mut self, rule: SequencingRule) -> Self {
        self.sequencing_rules.push(rule);
        self
    }

    /// Derives distinct per-stage seeds from one base seed.
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga.seed = seed;
        self.alns.seed = seed.wrapping_add(1);
        self.tabu.seed = seed.wrapping_add(2);
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            ga: GaConfig::default(),
            alns: AlnsConfig::default(),
            tabu: TabuConfig::default(),
            factors: ScenarioFactors::default(),
            sequencing_rules: Vec::new(),
            max_wall_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ga_defaults() {
        let cfg = GaConfig::default();
        assert_eq!(cfg.population, 50);
        assert_eq!(cfg.generations, 30);
        assert_eq!(cfg.tournament, 3);
        assert_eq!(cfg.elite_count(), 5);
    }

    #[test]
    fn test_elite_count_is_at_least_one() {
        let cfg = GaConfig {
            population: 4,
            elite_fraction: 0.0,
            ..GaConfig::default()
        };
        assert_eq!(cfg.elite_count(), 1);
    }

    #[test]
    fn test_elite_count_never_exceeds_population() {
        let cfg = GaConfig {
            population: 3,
            elite_fraction: 2.0,
            ..GaConfig::default()
        };
        assert_eq!(cfg.elite_count(), 3);
    }

    #[test]
    fn test_alns_defaults() {
        let cfg = AlnsConfig::default();
        assert_eq!(cfg.iterations, 1000);
        assert_eq!(cfg.destroy_min, 2);
        assert_eq!(cfg.destroy_max, 4);
        assert!(cfg.cooling_rate < 1.0);
    }

    #[test]
    fn test_with_seed_spreads_stage_seeds() {
        let cfg = PipelineConfig::default().with_seed(42);
        assert_eq!(cfg.ga.seed, 42);
        assert_ne!(cfg.alns.seed, cfg.ga.seed);
        assert_ne!(cfg.tabu.seed, cfg.alns.seed);
    }

    #[test]
    fn test_with_max_wall_time() {
        let cfg = PipelineConfig::default().with_max_wall_time(Duration::from_secs(5));
        assert_eq!(cfg.max_wall_time, Some(Duration::from_secs(5)));
    }
}
