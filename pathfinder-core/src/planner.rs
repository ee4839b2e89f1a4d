use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::PlanError;
use crate::obstacle::{validate_obstacles, Obstacle};
use crate::schedule::JumpSchedule;
use crate::sim::{step, AgentState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NoSafeAction,
    FrameBudgetExhausted,
    Cancelled,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSafeAction => "no_safe_action",
            Self::FrameBudgetExhausted => "frame_budget_exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFailure {
    pub frame: u32,
    pub reason: FailureReason,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanRequest {
    pub start: AgentState,
    pub goal_x: f32,
    pub max_frames: u32,
}

impl PlanRequest {
    pub fn new(start: AgentState, goal_x: f32, max_frames: u32) -> Self {
        Self {
            start,
            goal_x,
            max_frames,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanResult {
    pub succeeded: bool,
    pub schedule: JumpSchedule,
    /// Real frames simulated before the run ended.
    pub frames: u32,
    pub final_state: AgentState,
    pub failure: Option<PlanFailure>,
    /// Speculative lookahead runs performed, for diagnostics.
    pub probes: u32,
}

impl PlanResult {
    pub fn failure_frame(&self) -> Option<u32> {
        self.failure.map(|failure| failure.frame)
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        self.failure.map(|failure| failure.reason)
    }

    pub fn is_cancelled(&self) -> bool {
        self.failure_reason() == Some(FailureReason::Cancelled)
    }
}

/// Cooperative hook polled once per planner frame.
pub trait SearchControl {
    fn should_stop(&mut self) -> bool;

    fn on_frame(&mut self, _frame: u32, _state: &AgentState) {}
}

impl<F: FnMut() -> bool> SearchControl for F {
    fn should_stop(&mut self) -> bool {
        self()
    }
}

/// Never stops.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl SearchControl for Unbounded {
    fn should_stop(&mut self) -> bool {
        false
    }
}

pub(crate) fn check_request(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
) -> Result<(), PlanError> {
    config.validate()?;
    validate_obstacles(obstacles)?;
    if !request.start.is_finite() {
        return Err(PlanError::NonFiniteStart);
    }
    if !request.goal_x.is_finite() {
        return Err(PlanError::NonFiniteGoal);
    }
    if request.max_frames == 0 {
        return Err(PlanError::ZeroFrameBudget);
    }
    Ok(())
}

pub fn plan(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
) -> Result<PlanResult, PlanError> {
    plan_with_control(obstacles, config, request, &mut Unbounded)
}

/// Greedy lookahead planner.
///
/// Each frame it probes `lookahead_frames` of cruising. If cruising dies it
/// tries an immediate jump, then jumps delayed by 1..=`max_jump_delay` frames,
/// and commits the first candidate whose own probe survives. Committed jumps
/// are never revisited.
pub fn plan_with_control<C>(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
    control: &mut C,
) -> Result<PlanResult, PlanError>
where
    C: SearchControl + ?Sized,
{
    check_request(obstacles, config, request)?;

    let mut search = Search {
        obstacles,
        config,
        probes: 0,
    };
    let mut state = request.start;
    let mut jumps: Vec<u32> = Vec::new();
    let mut frame = 0u32;

    while frame < request.max_frames {
        if state.x >= request.goal_x {
            return Ok(search.finish(jumps, frame, state, None));
        }
        if control.should_stop() {
            let failure = PlanFailure {
                frame,
                reason: FailureReason::Cancelled,
            };
            return Ok(search.finish(jumps, frame, state, Some(failure)));
        }
        control.on_frame(frame, &state);

        if search.survives(&state) {
            state = step(&state, false, obstacles, config);
            frame += 1;
            continue;
        }

        if state.grounded {
            let after = step(&state, true, obstacles, config);
            if search.survives(&after) {
                jumps.push(frame);
                state = after;
                frame += 1;
                continue;
            }
        }

        match search.delayed_jump(&state, frame, request) {
            Delayed::Jump { delay, after } => {
                jumps.push(frame + delay);
                state = after;
                frame += delay + 1;
            }
            Delayed::Cruise { frames, state: cruised } => {
                state = cruised;
                frame += frames;
            }
            Delayed::None => {
                let failure = PlanFailure {
                    frame,
                    reason: FailureReason::NoSafeAction,
                };
                return Ok(search.finish(jumps, frame, state, Some(failure)));
            }
        }
    }

    if state.x >= request.goal_x {
        return Ok(search.finish(jumps, frame, state, None));
    }
    let failure = PlanFailure {
        frame: request.max_frames,
        reason: FailureReason::FrameBudgetExhausted,
    };
    Ok(search.finish(jumps, frame, state, Some(failure)))
}

enum Delayed {
    Jump { delay: u32, after: AgentState },
    /// Reached the goal or the frame budget while waiting; nothing recorded.
    Cruise { frames: u32, state: AgentState },
    None,
}

struct Search<'a> {
    obstacles: &'a [Obstacle],
    config: &'a WorldConfig,
    probes: u32,
}

impl Search<'_> {
    /// Runs the lookahead horizon with no input on a copy of `state`.
    fn survives(&mut self, state: &AgentState) -> bool {
        self.probes = self.probes.saturating_add(1);
        let mut probe = *state;
        for _ in 0..self.config.lookahead_frames {
            probe = step(&probe, false, self.obstacles, self.config);
            if self.config.is_dead(probe.y) {
                return false;
            }
        }
        true
    }

    /// Smallest delay whose post-jump probe survives, with the state right
    /// after that jump step. Cruise frames that reach the goal or the frame
    /// budget end the search without a jump.
    fn delayed_jump(
        &mut self,
        state: &AgentState,
        frame: u32,
        request: &PlanRequest,
    ) -> Delayed {
        let mut trial = *state;
        for delay in 1..=self.config.max_jump_delay {
            trial = step(&trial, false, self.obstacles, self.config);
            if self.config.is_dead(trial.y) {
                return Delayed::None;
            }
            if trial.x >= request.goal_x || frame.saturating_add(delay) >= request.max_frames {
                return Delayed::Cruise {
                    frames: delay,
                    state: trial,
                };
            }
            if !trial.grounded {
                continue;
            }
            let after = step(&trial, true, self.obstacles, self.config);
            if self.survives(&after) {
                return Delayed::Jump { delay, after };
            }
        }
        Delayed::None
    }

    fn finish(
        &self,
        jumps: Vec<u32>,
        frames: u32,
        final_state: AgentState,
        failure: Option<PlanFailure>,
    ) -> PlanResult {
        PlanResult {
            succeeded: failure.is_none(),
            schedule: JumpSchedule::from_increasing(jumps),
            frames,
            final_state,
            failure,
            probes: self.probes,
        }
    }
}
