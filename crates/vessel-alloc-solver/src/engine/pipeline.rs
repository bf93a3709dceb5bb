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
    config::PipelineConfig,
    context::{SearchContext, UnassignedVessel},
    delay::{CongestionGraph, DelayPredictor},
    engine::{
        control::{CancelToken, RunControl},
        err::{ConcurrentRunError, PipelineError, StageFailedError},
        kpi::{self, KpiSummary, PortUtilization, StageReport},
        progress::{ProgressEvent, ProgressSink, StageProgress},
    },
    eval::{CostModel, DataIntegrityError},
    search::{AlnsSearch, GeneticSearch, StageRun, TabuSearch, baseline},
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};
use vessel_alloc_model::{
    prelude::{Assignment, Problem, Solution},
    solution::err::AssignmentError,
};

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineState {
    Idle,
    BuildingGraph,
    PredictingDelays,
    RunningGa,
    RunningAlns,
    RunningTabu,
    Complete,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    solution: Solution,
    kpis: KpiSummary,
    stage_reports: Vec<StageReport>,
    port_utilization: Vec<PortUtilization>,
    unassigned: Vec<UnassignedVessel>,
    integrity_errors: Vec<DataIntegrityError>,
    cancelled: bool,
}

impl RunOutcome {
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    #[inline]
    pub fn kpis(&self) -> &KpiSummary {
        &self.kpis
    }

    /// One report per search stage that actually ran, in stage order.
    #[inline]
    pub fn stage_reports(&self) -> &[StageReport] {
        &self.stage_reports
    }

    #[inline]
    pub fn port_utilization(&self) -> &[PortUtilization] {
        &self.port_utilization
    }

    #[inline]
    pub fn unassigned(&self) -> &[UnassignedVessel] {
        &self.unassigned
    }

    /// Assignments whose cost breakdown referenced a missing entity.
    #[inline]
    pub fn integrity_errors(&self) -> &[DataIntegrityError] {
        &self.integrity_errors
    }

    #[inline]
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Releases the single flight guard when a run ends, however it ends.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Sequences graph build, delay prediction and the three search stages
/// over one problem.
///
/// A pipeline is single flight: at most one run may be active at a time,
/// and a second request fails fast with [`ConcurrentRunError`] without
/// touching the active run. Cancellation and the wall clock budget are
/// cooperative; a stopped run still returns the best plan it had.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    busy: AtomicBool,
}

impl Pipeline {
    #[inline]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            busy: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[instrument(skip_all, fields(
        vessels = problem.vessels().len(),
        ports = problem.ports().len(),
        routes = problem.routes().len()
    ))]
    pub fn run(
        &self,
        problem: &Problem,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, PipelineError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConcurrentRunError.into());
        }
        let _guard = BusyGuard { busy: &self.busy };
        self.run_inner(problem, sink, cancel)
    }

    fn run_inner(
        &self,
        problem: &Problem,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, PipelineError> {
        let started = Instant::now();
        let control = RunControl::new(cancel.clone(), self.config.max_wall_time);

        let mut graph = {
            let mut progress = StageProgress::new(&mut *sink, PipelineState::BuildingGraph);
            let graph = CongestionGraph::from_problem(problem);
            progress.finish(format!(
                "{} nodes from {} routes",
                graph.node_count(),
                problem.routes().len()
            ));
            graph
        };

        let ctx = {
            let mut progress = StageProgress::new(&mut *sink, PipelineState::PredictingDelays);
            graph.propagate(self.config.predictor.rounds, self.config.predictor.mixing);
            let predictor = DelayPredictor::from_graph(&graph, problem.history());
            let ctx = SearchContext::build(
                problem,
                &predictor,
                self.config.factors,
                self.config.sequencing_rules.clone(),
            );
            progress.finish(format!("{} ports fitted", predictor.len()));
            ctx
        };
        for vessel in ctx.unassignable() {
            warn!(
                vessel = vessel.vessel_id,
                name = %vessel.name,
                reason = %vessel.reason,
                "vessel cannot be assigned"
            );
        }

        let baseline = match baseline::round_robin(&ctx) {
            Ok(solution) => solution,
            Err(source) => {
                return Err(self.fail(sink, PipelineState::PredictingDelays, source));
            }
        };

        let mut stage_reports = Vec::with_capacity(3);
        let mut seed = baseline.clone();

        if !control.is_cancelled() {
            let (run, elapsed) = self.run_stage(sink, PipelineState::RunningGa, |progress| {
                GeneticSearch::new(self.config.ga).run(&ctx, &control, progress)
            })?;
            stage_reports.push(StageReport::of(PipelineState::RunningGa, &run, elapsed));
            seed = run.best;
        }
        if !control.is_cancelled() {
            let (run, elapsed) = self.run_stage(sink, PipelineState::RunningAlns, |progress| {
                AlnsSearch::new(self.config.alns).run(&ctx, &seed, &control, progress)
            })?;
            stage_reports.push(StageReport::of(PipelineState::RunningAlns, &run, elapsed));
            seed = run.best;
        }
        if !control.is_cancelled() {
            let (run, elapsed) = self.run_stage(sink, PipelineState::RunningTabu, |progress| {
                TabuSearch::new(self.config.tabu).run(&ctx, &seed, &control, progress)
            })?;
            stage_reports.push(StageReport::of(PipelineState::RunningTabu, &run, elapsed));
            seed = run.best;
        }

        // Attach reporting breakdowns to the winning plan. A stale
        // reference voids only its own record.
        let cost_model = CostModel::new(&ctx);
        let mut integrity_errors = Vec::new();
        let assignments: Vec<Assignment> = seed
            .assignments()
            .iter()
            .map(|a| match cost_model.breakdown(a) {
                Ok(breakdown) => a.clone().with_breakdown(breakdown),
                Err(err) => {
                    warn!(error = %err, "skipping cost breakdown");
                    integrity_errors.push(err);
                    a.clone()
                }
            })
            .collect();
        let solution = Solution::new(assignments, seed.fitness());

        let wall_time = started.elapsed();
        let kpis = kpi::summarize(&ctx, &solution, &baseline, wall_time);
        let port_utilization = kpi::port_utilization(&ctx, &solution);
        let cancelled = control.is_cancelled();

        sink.report(ProgressEvent::new(
            PipelineState::Complete,
            100,
            format!(
                "total {:.0}, {} violations, {} unassigned",
                kpis.total_cost, kpis.violations, kpis.unassigned_vessels
            ),
        ));
        info!(
            total_cost = kpis.total_cost,
            savings_pct = kpis.savings_pct,
            violations = kpis.violations,
            unassigned = kpis.unassigned_vessels,
            wall_time_ms = kpis.wall_time_ms,
            cancelled,
            "optimization run finished"
        );

        Ok(RunOutcome {
            solution,
            kpis,
            stage_reports,
            port_utilization,
            unassigned: ctx.unassignable().to_vec(),
            integrity_errors,
            cancelled,
        })
    }

    fn run_stage<F>(
        &self,
        sink: &mut dyn ProgressSink,
        state: PipelineState,
        runner: F,
    ) -> Result<(StageRun, Duration), PipelineError>
    where
        F: FnOnce(&mut StageProgress<'_>) -> Result<StageRun, AssignmentError>,
    {
        let started = Instant::now();
        let mut progress = StageProgress::new(&mut *sink, state);
        match runner(&mut progress) {
            Ok(run) => {
                progress.finish(format!("best {:.0}", run.best.fitness().total()));
                Ok((run, started.elapsed()))
            }
            Err(source) => {
                drop(progress);
                Err(self.fail(sink, state, source))
            }
        }
    }

    fn fail(
        &self,
        sink: &mut dyn ProgressSink,
        state: PipelineState,
        source: AssignmentError,
    ) -> PipelineError {
        let failure = StageFailedError::new(state, source);
        error!(stage = %state, error = %failure, "pipeline stage failed");
        sink.report(ProgressEvent::new(
            PipelineState::Failed,
            100,
            failure.to_string(),
        ));
        failure.into()
    }
}
