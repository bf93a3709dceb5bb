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

mod scenario;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use vessel_alloc_model::prelude::{PlantIdentifier, PortIdentifier, Problem, VesselIdentifier};
use vessel_alloc_solver::config::PipelineConfig;
use vessel_alloc_solver::context::UnassignedVessel;
use vessel_alloc_solver::engine::{
    CancelToken, KpiSummary, LogProgressSink, Pipeline, PortUtilization, RunOutcome, StageReport,
};

const RUN_SEED: u64 = 7919;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT | FmtSpan::CLOSE)
        .init();
}

#[derive(Serialize)]
struct RunRecord {
    scenario: String,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    runtime_ms: u128,
    seed: u64,
    cancelled: bool,
    stages: Vec<StageReport>,
    kpis: KpiSummary,
    port_utilization: Vec<PortUtilization>,
    unassigned: Vec<UnassignedVessel>,
}

fn vessel_name(problem: &Problem, id: VesselIdentifier) -> &str {
    problem.vessels().get(id).map_or("?", |v| v.name())
}

fn port_name(problem: &Problem, id: PortIdentifier) -> &str {
    problem.ports().get(id).map_or("?", |p| p.name())
}

fn plant_name(problem: &Problem, id: PlantIdentifier) -> &str {
    problem.plants().get(id).map_or("?", |w| w.name())
}

fn print_summary(problem: &Problem, outcome: &RunOutcome) {
    let kpis = outcome.kpis();

    println!();
    println!("Run summary");
    println!("  total cost          {:>14.0} USD", kpis.total_cost);
    println!("  baseline cost       {:>14.0} USD", kpis.baseline_cost);
    println!(
        "  savings             {:>14.0} USD ({:.1}%)",
        kpis.savings, kpis.savings_pct
    );
    println!("  demurrage           {:>14.0} USD", kpis.total_demurrage);
    println!("  assigned tonnage    {:>14} t", kpis.assigned_tonnage);
    println!(
        "  port capacity use   {:>13.1}%",
        kpis.capacity_utilization_pct
    );
    println!(
        "  avg predicted delay {:>13.2} days",
        kpis.avg_predicted_delay_days
    );
    println!("  violations          {:>14}", kpis.violations);
    println!("  unassigned vessels  {:>14}", kpis.unassigned_vessels);
    println!("  wall time           {:>12} ms", kpis.wall_time_ms);

    println!();
    println!("Stages");
    for report in outcome.stage_reports() {
        // Display on the stage ignores width specifiers, pad the string.
        let stage = report.stage.to_string();
        println!(
            "  {:<14} {:>6} iters  best {:>12.0}  ({} ms{})",
            stage,
            report.iterations,
            report.best_total,
            report.elapsed_ms,
            if report.budget_exhausted {
                ", budget exhausted"
            } else {
                ""
            }
        );
    }

    println!();
    println!("Port utilization");
    for port in outcome.port_utilization() {
        println!(
            "  {:<14} {:>9} t assigned of {:>9} t capacity ({:.1}%)",
            port.name, port.assigned, port.capacity, port.utilization_pct
        );
    }

    if !outcome.unassigned().is_empty() {
        println!();
        println!("Unassigned vessels");
        for vessel in outcome.unassigned() {
            println!("  {:<20} {}", vessel.name, vessel.reason);
        }
    }

    println!();
    println!("Assignments");
    for a in outcome.solution().iter() {
        let cost = a.breakdown().map_or(0.0, |b| b.total());
        println!(
            "  {:<20} via {:<14} to {:<12} {:>7} t  dwell {} d  delay {:>4.1} d  {:>12.0} USD",
            vessel_name(problem, a.vessel()),
            port_name(problem, a.port()),
            plant_name(problem, a.plant()),
            a.quantity().value(),
            a.dwell_days(),
            a.predicted_delay_days(),
            cost
        );
    }
    println!();
}

fn main() {
    enable_tracing();

    let problem = scenario::eastern_india();
    tracing::info!(
        "Planning {} vessels across {} ports and {} routes",
        problem.vessels().len(),
        problem.ports().len(),
        problem.routes().len()
    );

    let started_at = Utc::now();
    let t0 = Instant::now();

    let pipeline = Pipeline::new(PipelineConfig::default().with_seed(RUN_SEED));
    let mut sink = LogProgressSink;
    let cancel = CancelToken::new();

    let outcome = match pipeline.run(&problem, &mut sink, &cancel) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Optimization failed: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = t0.elapsed();
    let finished_at = Utc::now();

    tracing::info!(
        "Finished eastern-india: total={:.0}, savings={:.1}%, runtime={:?}",
        outcome.kpis().total_cost,
        outcome.kpis().savings_pct,
        runtime
    );

    print_summary(&problem, &outcome);

    let record = RunRecord {
        scenario: "eastern-india".to_owned(),
        started_at,
        finished_at,
        runtime_ms: runtime.as_millis(),
        seed: RUN_SEED,
        cancelled: outcome.cancelled(),
        stages: outcome.stage_reports().to_vec(),
        kpis: outcome.kpis().clone(),
        port_utilization: outcome.port_utilization().to_vec(),
        unassigned: outcome.unassigned().to_vec(),
    };

    let out_path = PathBuf::from("vessel_alloc_run.json");
    match File::create(&out_path).and_then(|mut f| {
        let json = serde_json::to_string_pretty(&record).expect("serialize run record");
        f.write_all(json.as_bytes())
    }) {
        Ok(()) => {
            tracing::info!("Wrote run record to {}", out_path.display());
        }
        Err(e) => {
            tracing::error!(
                "Failed to write run record to {}: {}",
                out_path.display(),
                e
            );
        }
    }
}
