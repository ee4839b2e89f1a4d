use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::constants::{RANDOM_ATTEMPTS_DEFAULT, RANDOM_JUMP_PERMILLE_DEFAULT};
use crate::error::PlanError;
use crate::obstacle::Obstacle;
use crate::planner::{
    check_request, FailureReason, PlanFailure, PlanRequest, PlanResult, SearchControl,
};
use crate::rng::PressRng;
use crate::schedule::JumpSchedule;
use crate::sim::{step, AgentState};

/// Parameters for the randomized-input search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSearch {
    pub seed: u32,
    pub attempts: u32,
    /// Per-frame probability of pressing jump, in thousandths.
    pub jump_permille: u32,
}

impl RandomSearch {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self {
            seed: 0xA57E_0001,
            attempts: RANDOM_ATTEMPTS_DEFAULT,
            jump_permille: RANDOM_JUMP_PERMILLE_DEFAULT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttemptEnd {
    Goal,
    Died { frame: u32 },
    Budget,
    Cancelled { frame: u32 },
}

#[derive(Clone, Debug)]
struct Attempt {
    jumps: Vec<u32>,
    frames: u32,
    final_state: AgentState,
    end: AttemptEnd,
}

/// Plays random jump inputs from the start, keeping the attempt that got the
/// furthest. Stops at the first attempt that reaches the goal.
///
/// Only presses made while grounded are recorded, since airborne presses have
/// no effect; the resulting schedule replays the attempt exactly.
pub fn random_search<C>(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
    search: &RandomSearch,
    control: &mut C,
) -> Result<PlanResult, PlanError>
where
    C: SearchControl + ?Sized,
{
    check_request(obstacles, config, request)?;
    if search.attempts == 0 {
        return Err(PlanError::ZeroAttempts);
    }

    let mut rng = PressRng::new(search.seed);
    let mut best: Option<Attempt> = None;

    for _ in 0..search.attempts {
        let attempt = run_attempt(obstacles, config, request, search, &mut rng, control);
        match attempt.end {
            AttemptEnd::Goal => return Ok(into_result(attempt, None)),
            AttemptEnd::Cancelled { frame } => {
                let failure = PlanFailure {
                    frame,
                    reason: FailureReason::Cancelled,
                };
                return Ok(into_result(best.unwrap_or(attempt), Some(failure)));
            }
            AttemptEnd::Died { .. } | AttemptEnd::Budget => {}
        }

        let improves = best
            .as_ref()
            .map_or(true, |b| attempt.final_state.x > b.final_state.x);
        if improves {
            best = Some(attempt);
        }
    }

    // attempts >= 1 and every non-returning attempt lands in `best`.
    let Some(best) = best else {
        return Err(PlanError::ZeroAttempts);
    };
    let failure = match best.end {
        AttemptEnd::Died { frame } => PlanFailure {
            frame,
            reason: FailureReason::NoSafeAction,
        },
        _ => PlanFailure {
            frame: request.max_frames,
            reason: FailureReason::FrameBudgetExhausted,
        },
    };
    Ok(into_result(best, Some(failure)))
}

fn run_attempt<C>(
    obstacles: &[Obstacle],
    config: &WorldConfig,
    request: &PlanRequest,
    search: &RandomSearch,
    rng: &mut PressRng,
    control: &mut C,
) -> Attempt
where
    C: SearchControl + ?Sized,
{
    let mut state = request.start;
    let mut jumps = Vec::new();
    let mut frame = 0u32;

    let end = loop {
        if state.x >= request.goal_x {
            break AttemptEnd::Goal;
        }
        if frame >= request.max_frames {
            break AttemptEnd::Budget;
        }
        if control.should_stop() {
            break AttemptEnd::Cancelled { frame };
        }
        control.on_frame(frame, &state);

        let press = rng.press(search.jump_permille);
        if press && state.grounded {
            jumps.push(frame);
        }
        state = step(&state, press, obstacles, config);
        if config.is_dead(state.y) {
            break AttemptEnd::Died { frame };
        }
        frame += 1;
    };

    Attempt {
        jumps,
        frames: frame,
        final_state: state,
        end,
    }
}

fn into_result(attempt: Attempt, failure: Option<PlanFailure>) -> PlanResult {
    PlanResult {
        succeeded: failure.is_none(),
        schedule: JumpSchedule::from_increasing(attempt.jumps),
        frames: attempt.frames,
        final_state: attempt.final_state,
        failure,
        probes: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Unbounded;
    use alloc::vec;

    fn gap_course() -> Vec<Obstacle> {
        vec![
            Obstacle::platform(-100.0, -10.0, 300.0, 10.0),
            Obstacle::platform(260.0, -10.0, 600.0, 10.0),
        ]
    }

    #[test]
    fn same_seed_same_result() {
        let config = WorldConfig::default();
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 500.0, 600);
        let search = RandomSearch {
            seed: 0xC0FF_EE11,
            attempts: 32,
            jump_permille: 50,
        };

        let a = random_search(&gap_course(), &config, &request, &search, &mut Unbounded).unwrap();
        let b = random_search(&gap_course(), &config, &request, &search, &mut Unbounded).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn never_jumping_falls_into_gap() {
        let config = WorldConfig::default();
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 500.0, 600);
        let search = RandomSearch {
            seed: 1,
            attempts: 3,
            jump_permille: 0,
        };

        let result =
            random_search(&gap_course(), &config, &request, &search, &mut Unbounded).unwrap();
        assert!(!result.succeeded);
        assert!(result.schedule.is_empty());
        assert_eq!(result.failure_reason(), Some(FailureReason::NoSafeAction));
        // The first platform ends at x=200; death happens after that.
        assert!(result.final_state.x > 200.0);
    }

    #[test]
    fn schedule_only_holds_grounded_presses() {
        let config = WorldConfig::default();
        let flat = [Obstacle::platform(-100.0, -10.0, 2000.0, 10.0)];
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 600.0, 600);
        let search = RandomSearch {
            seed: 99,
            attempts: 1,
            jump_permille: 1000,
        };

        let result = random_search(&flat, &config, &request, &search, &mut Unbounded).unwrap();
        assert!(result.succeeded);
        let frames = result.schedule.frames();
        assert!(frames.len() > 1);
        // Holding jump re-jumps on every landing, so presses are an airtime apart.
        for pair in frames.windows(2) {
            assert!(pair[1] - pair[0] > 30, "{pair:?}");
        }
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = WorldConfig::default();
        let request = PlanRequest::new(AgentState::at(0.0, 0.0, true), 100.0, 60);
        let search = RandomSearch {
            attempts: 0,
            ..RandomSearch::default()
        };
        assert_eq!(
            random_search(&[], &config, &request, &search, &mut Unbounded).unwrap_err(),
            PlanError::ZeroAttempts
        );
    }
}
