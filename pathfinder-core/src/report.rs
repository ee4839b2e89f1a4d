use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::obstacle::{Obstacle, ObstacleKind};
use crate::planner::{FailureReason, PlanRequest, PlanResult};
use crate::provider::ProviderAttempt;
use crate::random::RandomSearch;
use crate::schedule::JumpSchedule;
use crate::sim::AgentState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Lookahead,
    Random(RandomSearch),
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookahead => "lookahead",
            Self::Random(_) => "random",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCounts {
    pub platforms: usize,
    pub spikes: usize,
    pub jump_pads: usize,
}

impl KindCounts {
    pub fn of(obstacles: &[Obstacle]) -> Self {
        let mut counts = Self::default();
        for obstacle in obstacles {
            match obstacle.kind {
                ObstacleKind::Platform => counts.platforms += 1,
                ObstacleKind::Spike => counts.spikes += 1,
                ObstacleKind::JumpPad => counts.jump_pads += 1,
            }
        }
        counts
    }
}

/// Diagnostic record for one planning run. Pure rendering of a `PlanResult`
/// plus the inputs that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub success: bool,
    pub strategy: Strategy,
    pub object_count: usize,
    pub object_kinds: KindCounts,
    pub start_state: AgentState,
    pub goal_x: f32,
    pub max_frames: u32,
    pub frames: u32,
    pub probes: u32,
    pub jump_count: usize,
    pub jumps: JumpSchedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_frame: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    pub final_state: AgentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingestion: Vec<ProviderAttempt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<Obstacle>,
}

impl PlanReport {
    pub fn new(
        obstacles: &[Obstacle],
        request: &PlanRequest,
        strategy: Strategy,
        result: &PlanResult,
    ) -> Self {
        Self {
            success: result.succeeded,
            strategy,
            object_count: obstacles.len(),
            object_kinds: KindCounts::of(obstacles),
            start_state: request.start,
            goal_x: request.goal_x,
            max_frames: request.max_frames,
            frames: result.frames,
            probes: result.probes,
            jump_count: result.schedule.len(),
            jumps: result.schedule.clone(),
            failure_frame: result.failure_frame(),
            failure_reason: result.failure_reason(),
            final_state: result.final_state,
            source: None,
            ingestion: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn record_ingestion(&mut self, source: String, attempts: Vec<ProviderAttempt>) {
        self.source = Some(source);
        self.ingestion = attempts;
    }

    /// Embeds the full obstacle list, which makes the report self-contained
    /// at the cost of size.
    pub fn with_objects(mut self, obstacles: &[Obstacle]) -> Self {
        self.objects = obstacles.to_vec();
        self
    }
}

/// Everything a caller needs to persist one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub jumps: Vec<u32>,
    pub macro_text: String,
    pub report: PlanReport,
}

pub fn emit(
    obstacles: &[Obstacle],
    request: &PlanRequest,
    strategy: Strategy,
    result: &PlanResult,
) -> Emission {
    Emission {
        jumps: result.schedule.frames().to_vec(),
        macro_text: result.schedule.to_macro_text(),
        report: PlanReport::new(obstacles, request, strategy, result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::planner::plan;

    #[test]
    fn failure_fields_present_only_on_failure() {
        let config = WorldConfig::default();
        let obstacles = [
            Obstacle::platform(-100.0, -10.0, 1100.0, 10.0),
            Obstacle::spike(200.0, 0.0, 400.0, 20.0),
        ];
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 800.0, 2000);
        let result = plan(&obstacles, &config, &request).unwrap();
        let report = PlanReport::new(&obstacles, &request, Strategy::Lookahead, &result);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["objectCount"], 2);
        assert_eq!(json["objectKinds"]["spikes"], 1);
        assert_eq!(json["goalX"], 800.0);
        assert_eq!(json["failureReason"], "no_safe_action");
        assert!(json["failureFrame"].is_u64());
        assert_eq!(json["strategy"]["kind"], "lookahead");
        assert_eq!(json["jumpCount"], report.jumps.len());
        assert!(json.get("objects").is_none());

        let ok = plan(&obstacles[..1], &config, &request).unwrap();
        let json = serde_json::to_value(PlanReport::new(
            &obstacles[..1],
            &request,
            Strategy::Lookahead,
            &ok,
        ))
        .unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("failureFrame").is_none());
        assert!(json.get("failureReason").is_none());
        assert_eq!(json["startState"]["grounded"], true);
    }

    #[test]
    fn emission_matches_schedule() {
        let config = WorldConfig::default();
        let obstacles = [
            Obstacle::platform(-100.0, -10.0, 1100.0, 10.0),
            Obstacle::spike(200.0, 0.0, 30.0, 20.0),
        ];
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 400.0, 2000);
        let result = plan(&obstacles, &config, &request).unwrap();
        let emission = emit(&obstacles, &request, Strategy::Lookahead, &result);

        assert_eq!(emission.jumps, result.schedule.frames());
        assert_eq!(emission.macro_text, "19\n");
        assert_eq!(emission.report.jump_count, 1);

        let with_objects = emission.report.with_objects(&obstacles);
        let json = serde_json::to_value(&with_objects).unwrap();
        assert_eq!(json["objects"][1]["kind"], "spike");
    }

    #[test]
    fn random_strategy_serializes_parameters() {
        let strategy = Strategy::Random(RandomSearch {
            seed: 42,
            attempts: 8,
            jump_permille: 100,
        });
        let json = serde_json::to_value(strategy).unwrap();
        assert_eq!(json["kind"], "random");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["attempts"], 8);
    }
}
