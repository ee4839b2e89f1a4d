#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod error;
pub mod obstacle;
pub mod planner;
pub mod provider;
pub mod random;
pub mod replay;
pub mod report;
pub mod rng;
pub mod schedule;
pub mod sim;

pub use config::WorldConfig;
pub use error::{ConfigError, CourseError, PlanError, ProviderError, ReplayError, ScheduleError};
pub use obstacle::{Course, CourseBounds, Obstacle, ObstacleKind, Rect};
pub use planner::{
    plan, plan_with_control, FailureReason, PlanFailure, PlanRequest, PlanResult, SearchControl,
    Unbounded,
};
pub use provider::{load_first, Ingested, ObstacleProvider, ProviderAttempt, StaticProvider};
pub use random::{random_search, RandomSearch};
pub use replay::{replay, verify_schedule, ReplayOutcome};
pub use report::{emit, Emission, KindCounts, PlanReport, Strategy};
pub use schedule::JumpSchedule;
pub use sim::{step, AgentState};
