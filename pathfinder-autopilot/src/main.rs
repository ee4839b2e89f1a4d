use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pathfinder_autopilot::config::load_world_config;
use pathfinder_autopilot::level::{load_course_chain, CourseFormat};
use pathfinder_autopilot::runner::{
    attach_ingestion, read_macro, run_plan, verify_macro, write_outputs, PlanOptions,
};
use pathfinder_autopilot::sweep::{run_sweep, SweepConfig};
use pathfinder_autopilot::util::{
    parse_seed, parse_seed_csv, parse_seed_file, seed_sequence, seed_to_hex, write_file,
};
use pathfinder_core::constants::{RANDOM_ATTEMPTS_DEFAULT, RANDOM_JUMP_PERMILLE_DEFAULT};
use pathfinder_core::{RandomSearch, Strategy};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "pathfinder")]
#[command(about = "Plans jump schedules that carry an auto-running agent across a course")]
struct Cli {
    /// JSON file overriding world constants (PATHFINDER_* variables apply on top)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan a jump schedule and write macro.txt + pathfinder_report.json
    Plan {
        #[arg(long)]
        course: PathBuf,
        #[arg(long, value_enum, default_value_t = CourseFormat::Auto)]
        format: CourseFormat,
        /// Course files tried in order when the primary one is unusable
        #[arg(long)]
        fallback: Vec<PathBuf>,
        #[arg(long)]
        goal_x: Option<f32>,
        #[arg(long)]
        max_frames: Option<u32>,
        #[arg(long, value_enum, default_value_t = CliStrategy::Lookahead)]
        strategy: CliStrategy,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = RANDOM_ATTEMPTS_DEFAULT)]
        attempts: u32,
        #[arg(long, default_value_t = RANDOM_JUMP_PERMILLE_DEFAULT)]
        jump_permille: u32,
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Leave the obstacle list out of the report
        #[arg(long, default_value_t = false)]
        no_objects: bool,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replay a macro against a course and check that it reaches the goal
    Verify {
        #[arg(long)]
        course: PathBuf,
        #[arg(long, value_enum, default_value_t = CourseFormat::Auto)]
        format: CourseFormat,
        #[arg(long = "macro")]
        macro_path: PathBuf,
        #[arg(long)]
        goal_x: Option<f32>,
        #[arg(long)]
        max_frames: Option<u32>,
    },
    /// Run the random strategy over many seeds and keep the best schedule
    Sweep {
        #[arg(long)]
        course: PathBuf,
        #[arg(long, value_enum, default_value_t = CourseFormat::Auto)]
        format: CourseFormat,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = RANDOM_ATTEMPTS_DEFAULT)]
        attempts: u32,
        #[arg(long, default_value_t = RANDOM_JUMP_PERMILLE_DEFAULT)]
        jump_permille: u32,
        #[arg(long)]
        goal_x: Option<f32>,
        #[arg(long)]
        max_frames: Option<u32>,
        /// Include one lookahead run as a baseline
        #[arg(long, default_value_t = false)]
        with_lookahead: bool,
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the effective world constants as JSON
    Defaults {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliStrategy {
    Lookahead,
    Random,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { config, command } = Cli::parse();
    let world = load_world_config(config.as_deref())?;

    match command {
        Commands::Plan {
            course,
            format,
            fallback,
            goal_x,
            max_frames,
            strategy,
            seed,
            attempts,
            jump_permille,
            timeout_secs,
            no_objects,
            out_dir,
        } => {
            let ingested = load_course_chain(&course, &fallback, format)?;
            let strategy = match strategy {
                CliStrategy::Lookahead => Strategy::Lookahead,
                CliStrategy::Random => {
                    let seed = match seed.as_deref() {
                        Some(raw) => parse_seed(raw)?,
                        None => RandomSearch::default().seed,
                    };
                    Strategy::Random(RandomSearch {
                        seed,
                        attempts,
                        jump_permille,
                    })
                }
            };
            let options = PlanOptions {
                goal_x,
                max_frames,
                strategy,
                timeout: timeout_secs.map(Duration::from_secs),
                embed_objects: !no_objects,
            };

            let mut artifact = run_plan(&ingested.course, &world, &options)?;
            attach_ingestion(&mut artifact, &ingested.source, ingested.attempts);
            let written = write_outputs(&out_dir, &artifact)?;

            let result = &artifact.result;
            println!("source={}", ingested.source);
            println!("objects={}", ingested.course.len());
            println!("strategy={}", strategy.as_str());
            if let Strategy::Random(search) = strategy {
                println!("seed={}", seed_to_hex(search.seed));
            }
            println!("goal_x={:.2}", artifact.request.goal_x);
            println!("success={}", result.succeeded);
            println!("frames={}", result.frames);
            println!("jumps={}", result.schedule.len());
            println!("probes={}", result.probes);
            println!("report={}", written.report.display());
            if let Some(path) = &written.macro_file {
                println!("macro={}", path.display());
            }

            if let Some(failure) = result.failure {
                println!("failure_frame={}", failure.frame);
                println!("failure_reason={}", failure.reason.as_str());
                return Err(anyhow!(
                    "no complete schedule: {} at frame {}",
                    failure.reason.as_str(),
                    failure.frame
                ));
            }
        }
        Commands::Verify {
            course,
            format,
            macro_path,
            goal_x,
            max_frames,
        } => {
            let ingested = load_course_chain(&course, &[], format)?;
            let schedule = read_macro(&macro_path)?;
            let options = PlanOptions {
                goal_x,
                max_frames,
                ..PlanOptions::default()
            };
            let outcome = verify_macro(&ingested.course, &world, &options, &schedule)?;
            println!("macro={}", macro_path.display());
            println!("jumps={}", schedule.len());
            println!("frames={}", outcome.frames);
            println!("final_x={:.2}", outcome.final_state.x);
            println!("reached_goal={}", outcome.reached_goal);
        }
        Commands::Sweep {
            course,
            format,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            attempts,
            jump_permille,
            goal_x,
            max_frames,
            with_lookahead,
            timeout_secs,
            out_dir,
            jobs,
        } => {
            let ingested = load_course_chain(&course, &[], format)?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("sweeps/{}", timestamp_suffix())));

            let report = run_sweep(
                &ingested.course,
                &world,
                SweepConfig {
                    seeds,
                    attempts,
                    jump_permille,
                    goal_x,
                    max_frames,
                    include_lookahead: with_lookahead,
                    timeout: timeout_secs.map(Duration::from_secs),
                    out_dir: out_dir.clone(),
                    jobs,
                },
            )?;

            println!("runs={}", report.run_count);
            println!("successes={}", report.success_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            if let Some(best) = &report.best {
                println!(
                    "best={} {} success={} frames={} jumps={} final_x={:.2}",
                    best.strategy,
                    best.seed_hex.as_deref().unwrap_or("-"),
                    best.success,
                    best.frames,
                    best.jump_count,
                    best.final_x
                );
            }
            if let Some(path) = &report.best_macro {
                println!("macro={path}");
            }
        }
        Commands::Defaults { output } => {
            let encoded = serde_json::to_vec_pretty(&world)?;
            if let Some(path) = output {
                write_file(&path, &encoded)?;
                println!("wrote={}", path.display());
            } else {
                println!("{}", String::from_utf8_lossy(&encoded));
            }
        }
    }

    Ok(())
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => RandomSearch::default().seed,
    };
    seed_sequence(start, seed_count)
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
