use crate::runner::{run_plan, PlanArtifact, PlanOptions, MACRO_FILE};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use pathfinder_core::{Course, RandomSearch, Strategy, WorldConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub seeds: Vec<u32>,
    pub attempts: u32,
    pub jump_permille: u32,
    pub goal_x: Option<f32>,
    pub max_frames: Option<u32>,
    /// Also run the deterministic planner as a baseline.
    pub include_lookahead: bool,
    pub timeout: Option<Duration>,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub strategy: String,
    pub seed: Option<u32>,
    pub seed_hex: Option<String>,
    pub success: bool,
    pub frames: u32,
    pub jump_count: usize,
    pub final_x: f32,
    pub failure_frame: Option<u32>,
    pub failure_reason: Option<String>,
    pub probes: u32,
    pub elapsed_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    pub generated_unix_s: u64,
    pub goal_x: f32,
    pub max_frames: u32,
    pub attempts: u32,
    pub jobs: Option<usize>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub success_count: usize,
    pub best: Option<RunRecord>,
    pub best_macro: Option<String>,
    pub runs: Vec<RunRecord>,
}

struct InternalRun {
    record: RunRecord,
    artifact: PlanArtifact,
}

/// Successful runs first (fewest frames, then fewest jumps), then failed
/// runs by distance covered.
fn rank(a: &RunRecord, b: &RunRecord) -> Ordering {
    b.success
        .cmp(&a.success)
        .then_with(|| {
            if a.success {
                a.frames
                    .cmp(&b.frames)
                    .then_with(|| a.jump_count.cmp(&b.jump_count))
            } else {
                b.final_x.total_cmp(&a.final_x)
            }
        })
        .then_with(|| a.seed.cmp(&b.seed))
}

pub fn run_sweep(course: &Course, world: &WorldConfig, config: SweepConfig) -> Result<SweepReport> {
    if config.seeds.is_empty() && !config.include_lookahead {
        return Err(anyhow!("sweep requires at least one seed"));
    }
    if config.attempts == 0 {
        return Err(anyhow!("sweep --attempts must be >= 1"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("sweep --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let mut strategies: Vec<Strategy> = Vec::with_capacity(config.seeds.len() + 1);
    if config.include_lookahead {
        strategies.push(Strategy::Lookahead);
    }
    strategies.extend(config.seeds.iter().map(|&seed| {
        Strategy::Random(RandomSearch {
            seed,
            attempts: config.attempts,
            jump_permille: config.jump_permille,
        })
    }));

    let run_one = |strategy: &Strategy| -> Result<InternalRun> {
        let options = PlanOptions {
            goal_x: config.goal_x,
            max_frames: config.max_frames,
            strategy: *strategy,
            timeout: config.timeout,
            embed_objects: false,
        };
        let artifact = run_plan(course, world, &options)
            .with_context(|| format!("sweep run failed for {}", describe(strategy)))?;
        Ok(InternalRun {
            record: record_for(strategy, &artifact),
            artifact,
        })
    };

    let run_results: Vec<Result<InternalRun>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| strategies.par_iter().map(run_one).collect())
    } else {
        strategies.par_iter().map(run_one).collect()
    };

    let mut runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;
    runs.sort_by(|a, b| rank(&a.record, &b.record));

    let best_run = runs.first();
    let best_macro = match best_run {
        Some(run) if run.record.success => {
            let path = config.out_dir.join(MACRO_FILE);
            fs::write(&path, &run.artifact.macro_text)
                .with_context(|| format!("failed writing {}", path.display()))?;
            Some(path.to_string_lossy().into_owned())
        }
        _ => None,
    };
    let (goal_x, max_frames) = match best_run {
        Some(run) => (run.artifact.request.goal_x, run.artifact.request.max_frames),
        None => (
            config.goal_x.unwrap_or_else(|| course.default_goal()),
            config.max_frames.unwrap_or(world.max_frames),
        ),
    };

    let records: Vec<RunRecord> = runs.into_iter().map(|run| run.record).collect();
    write_runs_csv(&config.out_dir.join("runs.csv"), &records)?;

    let report = SweepReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        goal_x,
        max_frames,
        attempts: config.attempts,
        jobs: config.jobs,
        seeds: config.seeds,
        run_count: records.len(),
        success_count: records.iter().filter(|record| record.success).count(),
        best: records.first().cloned(),
        best_macro,
        runs: records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    tracing::info!(
        runs = report.run_count,
        successes = report.success_count,
        out_dir = %config.out_dir.display(),
        "sweep finished"
    );
    Ok(report)
}

fn describe(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Lookahead => "lookahead".to_string(),
        Strategy::Random(search) => format!("random seed={}", seed_to_hex(search.seed)),
    }
}

fn record_for(strategy: &Strategy, artifact: &PlanArtifact) -> RunRecord {
    let seed = match strategy {
        Strategy::Lookahead => None,
        Strategy::Random(search) => Some(search.seed),
    };
    let result = &artifact.result;
    RunRecord {
        strategy: strategy.as_str().to_string(),
        seed,
        seed_hex: seed.map(seed_to_hex),
        success: result.succeeded,
        frames: result.frames,
        jump_count: result.schedule.len(),
        final_x: result.final_state.x,
        failure_frame: result.failure_frame(),
        failure_reason: result.failure_reason().map(|reason| reason.as_str().to_string()),
        probes: result.probes,
        elapsed_ms: artifact.elapsed.as_millis() as u64,
    }
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "rank,strategy,seed_hex,success,frames,jump_count,final_x,failure_frame,failure_reason,probes,elapsed_ms\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{:.2},{},{},{},{}\n",
            idx + 1,
            row.strategy,
            row.seed_hex.as_deref().unwrap_or(""),
            row.success,
            row.frames,
            row.jump_count,
            row.final_x,
            row.failure_frame
                .map(|frame| frame.to_string())
                .unwrap_or_default(),
            row.failure_reason.as_deref().unwrap_or(""),
            row.probes,
            row.elapsed_ms
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
