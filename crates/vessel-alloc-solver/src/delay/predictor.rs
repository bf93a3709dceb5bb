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

use crate::{config::PredictorConfig, delay::graph::CongestionGraph};
use std::collections::BTreeMap;
use tracing::instrument;
use vessel_alloc_model::prelude::*;

/// Estimate used for a port the predictor has never seen.
pub const FALLBACK_RISK: f64 = 0.25;
pub const FALLBACK_DELAY_DAYS: f64 = 2.0;
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Expected delay attributed to a port at maximum congestion risk when no
/// history backs the estimate.
const RISK_DELAY_DAYS: f64 = 5.0;

/// Observation count at which history and diffusion weigh equally.
const CONFIDENCE_HALF_COUNT: f64 = 4.0;

/// Congestion outlook for one port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayEstimate {
    /// Congestion risk in `0.0..=1.0`.
    pub congestion_risk: f64,
    /// Expected berthing delay in days.
    pub expected_delay_days: f64,
    /// Trust in this estimate, driven by the number of observations.
    pub confidence: f64,
}

impl DelayEstimate {
    #[inline]
    pub const fn new(congestion_risk: f64, expected_delay_days: f64, confidence: f64) -> Self {
        Self {
            congestion_risk,
            expected_delay_days,
            confidence,
        }
    }

    /// Conservative default for ports outside the fitted graph.
    #[inline]
    pub const fn fallback() -> Self {
        Self::new(FALLBACK_RISK, FALLBACK_DELAY_DAYS, FALLBACK_CONFIDENCE)
    }
}

/// Per-port delay estimates derived from a diffused congestion graph and
/// the delay history of the scenario.
///
/// Fitting is fully deterministic: the same problem always yields the
/// same estimates.
#[derive(Debug, Clone)]
pub struct DelayPredictor {
    estimates: BTreeMap<PortIdentifier, DelayEstimate>,
}

impl DelayPredictor {
    /// Derives estimates from an already propagated graph.
    pub fn from_graph(graph: &CongestionGraph, history: &DelayHistory) -> Self {
        let mut estimates = BTreeMap::new();
        for (port, features) in graph.ports() {
            let risk =
                (0.7 * features.risk_prior + 0.3 * features.utilization).clamp(0.0, 1.0);

            let observations = history.for_port(port).count() as f64;
            let trust = observations / (observations + CONFIDENCE_HALF_COUNT);
            let observed = history.mean_delay_for(port).unwrap_or(0.0);
            let expected = trust * observed + (1.0 - trust) * risk * RISK_DELAY_DAYS;

            estimates.insert(
                port,
                DelayEstimate::new(risk, expected, trust.max(FALLBACK_CONFIDENCE)),
            );
        }
        Self { estimates }
    }

    /// Builds the graph, propagates it and derives estimates in one step.
    #[instrument(skip_all, fields(rounds = config.rounds, mixing = config.mixing))]
    pub fn fit(problem: &Problem, config: &PredictorConfig) -> Self {
        let mut graph = CongestionGraph::from_problem(problem);
        graph.propagate(config.rounds, config.mixing);
        Self::from_graph(&graph, problem.history())
    }

    /// Estimate for `port`, falling back to a conservative default for
    /// ports the predictor has never seen.
    #[inline]
    pub fn predict(&self, port: PortIdentifier) -> DelayEstimate {
        self.estimates
            .get(&port)
            .copied()
            .unwrap_or_else(DelayEstimate::fallback)
    }

    /// All fitted estimates in ascending port order.
    #[inline]
    pub fn estimates(&self) -> impl Iterator<Item = (PortIdentifier, DelayEstimate)> + '_ {
        self.estimates.iter().map(|(&port, &est)| (port, est))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vessel_alloc_core::prelude::Tons;

    #[inline]
    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[inline]
    fn port(id: u32, max: i64, stock: i64) -> Port {
        Port::new(
            PortIdentifier::new(id),
            format!("P{id}"),
            Tons::new(max),
            Tons::new(stock),
            4.0,
            1.0,
            Tons::new(25_000),
        )
        .unwrap()
    }

    #[inline]
    fn plant(id: u32) -> Plant {
        Plant::new(
            PlantIdentifier::new(id),
            format!("W{id}"),
            Material::IronOre,
            Tons::new(60_000),
            Tons::new(10_000),
            true,
        )
        .unwrap()
    }

    #[inline]
    fn route(id: u32, port: u32, plant: u32) -> Route {
        Route::new(
            RouteIdentifier::new(id),
            PortIdentifier::new(port),
            PlantIdentifier::new(plant),
            2.0,
            2,
            Tons::new(100_000),
        )
        .unwrap()
    }

    fn problem_with_history(history: DelayHistory) -> Problem {
        Problem::new(
            VesselContainer::new(),
            [port(1, 100_000, 20_000), port(2, 100_000, 95_000)]
                .into_iter()
                .collect(),
            [plant(1)].into_iter().collect(),
            [route(1, 1, 1), route(2, 2, 1)].into_iter().collect(),
            TariffBook::new(),
            history,
        )
        .unwrap()
    }

    #[test]
    fn test_fit_covers_every_port() {
        let predictor = DelayPredictor::fit(
            &problem_with_history(DelayHistory::new()),
            &PredictorConfig::default(),
        );
        assert_eq!(predictor.len(), 2);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let problem = problem_with_history(DelayHistory::new());
        let a = DelayPredictor::fit(&problem, &PredictorConfig::default());
        let b = DelayPredictor::fit(&problem, &PredictorConfig::default());
        assert_eq!(
            a.predict(PortIdentifier::new(1)),
            b.predict(PortIdentifier::new(1))
        );
        assert_eq!(
            a.predict(PortIdentifier::new(2)),
            b.predict(PortIdentifier::new(2))
        );
    }

    #[test]
    fn test_congested_port_scores_higher_risk() {
        let predictor = DelayPredictor::fit(
            &problem_with_history(DelayHistory::new()),
            &PredictorConfig::default(),
        );
        let calm = predictor.predict(PortIdentifier::new(1));
        let busy = predictor.predict(PortIdentifier::new(2));
        assert!(busy.congestion_risk > calm.congestion_risk);
        assert!(busy.expected_delay_days > calm.expected_delay_days);
    }

    #[test]
    fn test_history_raises_confidence_and_delay() {
        let history: DelayHistory = (0..8)
            .map(|i| {
                DelayRecord::new(PortIdentifier::new(1), date(1 + i), date(5 + i), 0.6, 0.7)
                    .unwrap()
            })
            .collect();
        let with = DelayPredictor::fit(
            &problem_with_history(history),
            &PredictorConfig::default(),
        );
        let without = DelayPredictor::fit(
            &problem_with_history(DelayHistory::new()),
            &PredictorConfig::default(),
        );
        let seen = with.predict(PortIdentifier::new(1));
        let unseen = without.predict(PortIdentifier::new(1));
        assert!(seen.confidence > unseen.confidence);
        // Eight calls, four days late each, dominate the estimate.
        assert!(seen.expected_delay_days > unseen.expected_delay_days);
        assert!(seen.expected_delay_days > 2.0);
    }

    #[test]
    fn test_unknown_port_gets_fallback() {
        let predictor = DelayPredictor::fit(
            &problem_with_history(DelayHistory::new()),
            &PredictorConfig::default(),
        );
        let est = predictor.predict(PortIdentifier::new(99));
        assert_eq!(est, DelayEstimate::fallback());
        assert_eq!(est.congestion_risk, FALLBACK_RISK);
        assert_eq!(est.expected_delay_days, FALLBACK_DELAY_DAYS);
        assert_eq!(est.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_risk_stays_in_unit_interval() {
        let predictor = DelayPredictor::fit(
            &problem_with_history(DelayHistory::new()),
            &PredictorConfig::default(),
        );
        for (_, est) in predictor.estimates() {
            assert!((0.0..=1.0).contains(&est.congestion_risk));
            assert!(est.expected_delay_days >= 0.0);
            assert!((0.0..=1.0).contains(&est.confidence));
        }
    }
}
