use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::{PlanError, ReplayError};
use crate::obstacle::Obstacle;
use crate::planner::{check_request, PlanRequest};
use crate::schedule::JumpSchedule;
use crate::sim::{step, AgentState};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub reached_goal: bool,
    pub frames: u32,
    pub death_frame: Option<u32>,
    pub final_state: AgentState,
    pub max_x: f32,
    pub jumps_applied: usize,
    pub first_ineffective_jump: Option<u32>,
    pub first_unused_jump: Option<u32>,
}

/// Re-simulates `schedule` the way playback would: one step per frame, jump
/// asserted exactly on scheduled frames.
pub fn replay(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
    schedule: &JumpSchedule,
) -> Result<ReplayOutcome, PlanError> {
    check_request(obstacles, config, request)?;

    let jumps = schedule.frames();
    let mut cursor = 0usize;
    let mut state = request.start;
    let mut max_x = state.x;
    let mut frame = 0u32;
    let mut death_frame = None;
    let mut first_ineffective_jump = None;

    while frame < request.max_frames && state.x < request.goal_x {
        let press = jumps.get(cursor) == Some(&frame);
        if press {
            if !state.grounded && first_ineffective_jump.is_none() {
                first_ineffective_jump = Some(frame);
            }
            cursor += 1;
        }

        state = step(&state, press, obstacles, config);
        max_x = max_x.max(state.x);
        if config.is_dead(state.y) {
            death_frame = Some(frame);
            break;
        }
        frame += 1;
    }

    Ok(ReplayOutcome {
        reached_goal: death_frame.is_none() && state.x >= request.goal_x,
        frames: frame,
        death_frame,
        final_state: state,
        max_x,
        jumps_applied: cursor,
        first_ineffective_jump,
        first_unused_jump: jumps.get(cursor).copied(),
    })
}

/// Replays `schedule` and rejects it unless it reaches the goal alive with
/// every scheduled jump landing on a grounded frame.
pub fn verify_schedule(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
    schedule: &JumpSchedule,
) -> Result<ReplayOutcome, ReplayError> {
    let outcome = replay(obstacles, config, request, schedule)?;

    if let Some(frame) = outcome.death_frame {
        return Err(ReplayError::Died {
            frame,
            x: outcome.final_state.x,
        });
    }
    if !outcome.reached_goal {
        return Err(ReplayError::GoalNotReached {
            frames: outcome.frames,
            max_x: outcome.max_x,
        });
    }
    if let Some(frame) = outcome.first_ineffective_jump {
        return Err(ReplayError::IneffectiveJump { frame });
    }
    if let Some(first_unused) = outcome.first_unused_jump {
        return Err(ReplayError::UnusedJumps { first_unused });
    }
    Ok(outcome)
}
