use anyhow::{anyhow, Context, Result};
use pathfinder_core::provider::ProviderAttempt;
use pathfinder_core::report::emit;
use pathfinder_core::{
    plan_with_control, random_search, verify_schedule, AgentState, Course, JumpSchedule,
    PlanReport, PlanRequest, PlanResult, ReplayOutcome, SearchControl, Strategy, WorldConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const MACRO_FILE: &str = "macro.txt";
pub const REPORT_FILE: &str = "pathfinder_report.json";

#[derive(Clone, Debug)]
pub struct PlanOptions {
    pub goal_x: Option<f32>,
    pub max_frames: Option<u32>,
    pub strategy: Strategy,
    pub timeout: Option<Duration>,
    /// Copy the obstacle list into the report.
    pub embed_objects: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            goal_x: None,
            max_frames: None,
            strategy: Strategy::Lookahead,
            timeout: None,
            embed_objects: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlanArtifact {
    pub request: PlanRequest,
    pub result: PlanResult,
    pub report: PlanReport,
    pub macro_text: String,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct WrittenOutputs {
    pub report: PathBuf,
    pub macro_file: Option<PathBuf>,
}

/// Stops the search once the wall-clock deadline passes.
pub struct Deadline {
    until: Option<Instant>,
}

impl Deadline {
    pub fn after(timeout: Option<Duration>) -> Self {
        Self {
            until: timeout.map(|timeout| Instant::now() + timeout),
        }
    }
}

impl SearchControl for Deadline {
    fn should_stop(&mut self) -> bool {
        self.until.is_some_and(|until| Instant::now() >= until)
    }

    fn on_frame(&mut self, frame: u32, state: &AgentState) {
        if frame % 600 == 0 {
            tracing::trace!(frame, x = state.x, y = state.y, "search progress");
        }
    }
}

pub fn build_request(course: &Course, config: &WorldConfig, options: &PlanOptions) -> PlanRequest {
    PlanRequest::new(
        course.default_start(config),
        options.goal_x.unwrap_or_else(|| course.default_goal()),
        options.max_frames.unwrap_or(config.max_frames),
    )
}

pub fn run_plan(
    course: &Course,
    config: &WorldConfig,
    options: &PlanOptions,
) -> Result<PlanArtifact> {
    let request = build_request(course, config, options);
    let mut deadline = Deadline::after(options.timeout);
    let started = Instant::now();

    let result = match options.strategy {
        Strategy::Lookahead => {
            plan_with_control(course.obstacles(), config, &request, &mut deadline)
        }
        Strategy::Random(search) => random_search(
            course.obstacles(),
            config,
            &request,
            &search,
            &mut deadline,
        ),
    }
    .map_err(|err| anyhow!("planner rejected input: {err}"))?;
    let elapsed = started.elapsed();

    tracing::info!(
        strategy = options.strategy.as_str(),
        success = result.succeeded,
        frames = result.frames,
        jumps = result.schedule.len(),
        probes = result.probes,
        elapsed_ms = elapsed.as_millis() as u64,
        "plan finished"
    );
    if let Some(failure) = result.failure {
        tracing::warn!(
            frame = failure.frame,
            reason = failure.reason.as_str(),
            x = result.final_state.x,
            "plan did not reach the goal"
        );
    }

    let emission = emit(course.obstacles(), &request, options.strategy, &result);
    let report = if options.embed_objects {
        emission.report.with_objects(course.obstacles())
    } else {
        emission.report
    };

    Ok(PlanArtifact {
        request,
        result,
        report,
        macro_text: emission.macro_text,
        elapsed,
    })
}

pub fn attach_ingestion(artifact: &mut PlanArtifact, source: &str, attempts: Vec<ProviderAttempt>) {
    artifact.report.record_ingestion(source.to_string(), attempts);
}

/// Writes the report unconditionally and `macro.txt` only for a successful
/// plan. A stale macro from an earlier run is removed on failure.
pub fn write_outputs(out_dir: &Path, artifact: &PlanArtifact) -> Result<WrittenOutputs> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed creating {}", out_dir.display()))?;

    let report_path = out_dir.join(REPORT_FILE);
    let encoded =
        serde_json::to_vec_pretty(&artifact.report).context("failed to serialize report")?;
    fs::write(&report_path, encoded)
        .with_context(|| format!("failed writing {}", report_path.display()))?;

    let macro_path = out_dir.join(MACRO_FILE);
    let macro_file = if artifact.result.succeeded {
        fs::write(&macro_path, &artifact.macro_text)
            .with_context(|| format!("failed writing {}", macro_path.display()))?;
        Some(macro_path)
    } else {
        if macro_path.exists() {
            fs::remove_file(&macro_path)
                .with_context(|| format!("failed removing stale {}", macro_path.display()))?;
            tracing::debug!(path = %macro_path.display(), "removed stale macro");
        }
        None
    };

    Ok(WrittenOutputs {
        report: report_path,
        macro_file,
    })
}

pub fn read_macro(path: &Path) -> Result<JumpSchedule> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading macro {}", path.display()))?;
    JumpSchedule::parse_macro_text(&text)
        .map_err(|err| anyhow!("invalid macro {}: {err}", path.display()))
}

pub fn verify_macro(
    course: &Course,
    config: &WorldConfig,
    options: &PlanOptions,
    schedule: &JumpSchedule,
) -> Result<ReplayOutcome> {
    let request = build_request(course, config, options);
    verify_schedule(course.obstacles(), config, &request, schedule)
        .map_err(|err| anyhow!("macro does not complete the course: {err}"))
}
