use pathfinder_core::{
    plan, plan_with_control, random_search, replay, step, verify_schedule, AgentState, Course,
    FailureReason, JumpSchedule, Obstacle, PlanRequest, RandomSearch, Unbounded, WorldConfig,
};

fn ground() -> Obstacle {
    Obstacle::platform(-100.0, -10.0, 1100.0, 10.0)
}

fn spike_row() -> Vec<Obstacle> {
    vec![
        ground(),
        Obstacle::spike(200.0, 0.0, 30.0, 20.0),
        Obstacle::spike(500.0, 0.0, 30.0, 20.0),
        Obstacle::spike(800.0, 0.0, 30.0, 20.0),
    ]
}

fn origin() -> AgentState {
    AgentState::at(0.0, 0.0, true)
}

#[test]
fn identical_inputs_give_identical_plans() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 1000.0, 3000);

    let first = plan(&spike_row(), &config, &request).unwrap();
    for _ in 0..3 {
        assert_eq!(plan(&spike_row(), &config, &request).unwrap(), first);
    }
}

#[test]
fn spike_row_needs_one_jump_per_spike() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 1000.0, 3000);
    let result = plan(&spike_row(), &config, &request).unwrap();

    assert!(result.succeeded, "{:?}", result.failure);
    assert_eq!(result.schedule.len(), 3);
    let frames = result.schedule.frames();
    assert!(frames.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(result.frames < request.max_frames);
    assert!(result.probes > result.frames);
}

#[test]
fn flat_run_to_hundred_takes_ceil_frames() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 100.0, 600);
    let result = plan(&[ground()], &config, &request).unwrap();

    let expected = (100.0 / config.frame_advance()).ceil() as u32;
    assert!(result.succeeded);
    assert!(result.schedule.is_empty());
    assert_eq!(result.frames, expected);
    assert_eq!(result.frames, 28);
}

#[test]
fn single_spike_forces_jump_at_first_warning() {
    let config = WorldConfig::default();
    let obstacles = [ground(), Obstacle::spike(200.0, 0.0, 30.0, 20.0)];
    let request = PlanRequest::new(origin(), 400.0, 2000);
    let result = plan(&obstacles, &config, &request).unwrap();

    assert!(result.succeeded);
    assert_eq!(result.schedule.frames(), &[19]);
    assert_eq!(result.frames, 110);
    assert!(result.final_state.x >= 400.0);
}

#[test]
fn overlong_spike_runs_out_of_safe_actions() {
    let config = WorldConfig::default();
    let obstacles = [ground(), Obstacle::spike(200.0, 0.0, 400.0, 20.0)];
    let request = PlanRequest::new(origin(), 800.0, 2000);
    let result = plan(&obstacles, &config, &request).unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.failure_reason(), Some(FailureReason::NoSafeAction));
    assert_eq!(result.schedule.frames(), &[19]);
    let failed_at = result.failure_frame().unwrap();
    assert!(failed_at > 19, "failed at {failed_at}");
    assert_eq!(result.frames, failed_at);
}

#[test]
fn jump_pad_clears_spike_without_input() {
    let config = WorldConfig::default();
    let obstacles = [
        ground(),
        Obstacle::jump_pad(100.0, 0.0, 16.0, 16.0, 0.0),
        Obstacle::spike(130.0, 0.0, 40.0, 20.0),
    ];
    let request = PlanRequest::new(origin(), 400.0, 2000);
    let result = plan(&obstacles, &config, &request).unwrap();

    assert!(result.succeeded, "{:?}", result.failure);
    assert!(result.schedule.is_empty());

    // The launch itself shows up as an upward velocity on a frame with no press.
    let mut state = origin();
    let mut launched = false;
    for _ in 0..result.frames {
        state = step(&state, false, &obstacles, &config);
        if state.vy >= config.jump_velocity - 1.0 {
            launched = true;
        }
    }
    assert!(launched);
}

#[test]
fn planner_output_replays_to_same_state() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 1000.0, 3000);
    let result = plan(&spike_row(), &config, &request).unwrap();

    let outcome = verify_schedule(&spike_row(), &config, &request, &result.schedule).unwrap();
    assert!(outcome.reached_goal);
    assert_eq!(outcome.frames, result.frames);
    assert_eq!(outcome.final_state, result.final_state);
    assert_eq!(outcome.jumps_applied, result.schedule.len());
}

#[test]
fn macro_text_survives_a_round_trip_through_replay() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 1000.0, 3000);
    let result = plan(&spike_row(), &config, &request).unwrap();

    let reparsed = JumpSchedule::parse_macro_text(&result.schedule.to_macro_text()).unwrap();
    let outcome = replay(&spike_row(), &config, &request, &reparsed).unwrap();
    assert!(outcome.reached_goal);
    assert_eq!(outcome.final_state, result.final_state);
}

#[test]
fn course_defaults_drive_a_full_run() {
    let config = WorldConfig::default();
    let course = Course::new(vec![Obstacle::platform(0.0, -10.0, 1000.0, 10.0)]).unwrap();
    let start = course.default_start(&config);
    assert_eq!(start.x, -16.0);
    assert_eq!(start.y, 12.0);

    let request = PlanRequest::new(start, course.default_goal(), config.max_frames);
    let result = plan(course.obstacles(), &config, &request).unwrap();
    assert!(result.succeeded);
    assert!(result.schedule.is_empty());
    assert!((277..=279).contains(&result.frames), "{}", result.frames);
}

#[test]
fn deadline_closure_cancels_mid_plan() {
    let config = WorldConfig::default();
    let request = PlanRequest::new(origin(), 1000.0, 3000);
    let mut budget = 50u32;
    let mut control = || {
        if budget == 0 {
            return true;
        }
        budget -= 1;
        false
    };
    let result = plan_with_control(&spike_row(), &config, &request, &mut control).unwrap();

    assert!(result.is_cancelled());
    assert_eq!(result.failure_frame(), Some(result.frames));
    // Whatever was committed before the stop still replays without dying.
    let outcome = replay(
        &spike_row(),
        &config,
        &PlanRequest::new(origin(), 1000.0, result.frames),
        &result.schedule,
    )
    .unwrap();
    assert!(outcome.death_frame.is_none());
}

#[test]
fn random_search_result_replays() {
    let config = WorldConfig::default();
    let obstacles = [ground(), Obstacle::spike(200.0, 0.0, 30.0, 20.0)];
    let request = PlanRequest::new(origin(), 400.0, 2000);
    let search = RandomSearch {
        seed: 0xDEAD_BEEF,
        attempts: 64,
        jump_permille: 30,
    };
    let result = random_search(&obstacles, &config, &request, &search, &mut Unbounded).unwrap();

    let outcome = replay(&obstacles, &config, &request, &result.schedule).unwrap();
    assert_eq!(outcome.final_state, result.final_state);
    assert_eq!(outcome.reached_goal, result.succeeded);
}

#[test]
fn goal_reached_while_waiting_to_jump_replays_cleanly() {
    // The ceiling spike forbids jumping at the warning frame, and the goal
    // lies inside the wait that follows.
    let config = WorldConfig::default();
    let obstacles = [
        ground(),
        Obstacle::spike(0.0, 30.0, 30.0, 10.0),
        Obstacle::spike(150.0, 0.0, 20.0, 20.0),
    ];
    let request = PlanRequest::new(origin(), 20.0, 2000);
    let result = plan(&obstacles, &config, &request).unwrap();

    assert!(result.succeeded, "{:?}", result.failure);
    assert!(result.schedule.is_empty());
    assert_eq!(result.frames, 6);

    let outcome = verify_schedule(&obstacles, &config, &request, &result.schedule).unwrap();
    assert_eq!(outcome.frames, result.frames);
    assert_eq!(outcome.final_state, result.final_state);
}
