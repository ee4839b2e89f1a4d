use alloc::string::String;
use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleDefect {
    NonFiniteGeometry,
    NegativeSize,
    NonFinitePower,
}

impl fmt::Display for ObstacleDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteGeometry => write!(f, "NON_FINITE_GEOMETRY"),
            Self::NegativeSize => write!(f, "NEGATIVE_SIZE"),
            Self::NonFinitePower => write!(f, "NON_FINITE_POWER"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseError {
    Empty,
    InvalidObstacle { index: usize, defect: ObstacleDefect },
}

impl fmt::Display for CourseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "course has no obstacles"),
            Self::InvalidObstacle { index, defect } => {
                write!(f, "obstacle #{index} is invalid: {defect}")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NonFinite { field: &'static str },
    NonPositiveFrameDt,
    NonPositiveHorizontalSpeed,
    NonPositiveJumpVelocity,
    NegativeLandingEpsilon,
    ZeroLookahead,
    SentinelAboveKillFloor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "config field `{field}` is not finite"),
            Self::NonPositiveFrameDt => write!(f, "frame_dt must be > 0"),
            Self::NonPositiveHorizontalSpeed => write!(f, "horizontal_speed must be > 0"),
            Self::NonPositiveJumpVelocity => write!(f, "jump_velocity must be > 0"),
            Self::NegativeLandingEpsilon => write!(f, "landing_epsilon must be >= 0"),
            Self::ZeroLookahead => write!(f, "lookahead_frames must be >= 1"),
            Self::SentinelAboveKillFloor => {
                write!(f, "death_sentinel must lie below kill_floor")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanError {
    Config(ConfigError),
    Course(CourseError),
    NonFiniteStart,
    NonFiniteGoal,
    ZeroFrameBudget,
    ZeroAttempts,
}

impl From<ConfigError> for PlanError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CourseError> for PlanError {
    fn from(err: CourseError) -> Self {
        Self::Course(err)
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid world config: {err}"),
            Self::Course(err) => write!(f, "invalid obstacles: {err}"),
            Self::NonFiniteStart => write!(f, "start state has non-finite components"),
            Self::NonFiniteGoal => write!(f, "goal x is not finite"),
            Self::ZeroFrameBudget => write!(f, "max_frames must be > 0"),
            Self::ZeroAttempts => write!(f, "random search needs at least one attempt"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    InvalidLine { line: usize, text: String },
    NotIncreasing { index: usize, previous: u32, frame: u32 },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLine { line, text } => {
                write!(f, "line {line}: expected a frame index, got `{text}`")
            }
            Self::NotIncreasing {
                index,
                previous,
                frame,
            } => write!(
                f,
                "jump #{index} at frame {frame} does not follow frame {previous}"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReplayError {
    Plan(PlanError),
    Died { frame: u32, x: f32 },
    GoalNotReached { frames: u32, max_x: f32 },
    IneffectiveJump { frame: u32 },
    UnusedJumps { first_unused: u32 },
}

impl From<PlanError> for ReplayError {
    fn from(err: PlanError) -> Self {
        Self::Plan(err)
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan(err) => write!(f, "{err}"),
            Self::Died { frame, x } => write!(f, "agent died at frame {frame} (x={x:.2})"),
            Self::GoalNotReached { frames, max_x } => write!(
                f,
                "goal not reached after {frames} frames (furthest x={max_x:.2})"
            ),
            Self::IneffectiveJump { frame } => {
                write!(f, "jump at frame {frame} was asserted while airborne")
            }
            Self::UnusedJumps { first_unused } => write!(
                f,
                "schedule continues past the end of the run (first unused frame {first_unused})"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    Unavailable { reason: String },
    Malformed { line: Option<usize>, reason: String },
    Invalid(CourseError),
}

impl From<CourseError> for ProviderError {
    fn from(err: CourseError) -> Self {
        Self::Invalid(err)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "source unavailable: {reason}"),
            Self::Malformed {
                line: Some(line),
                reason,
            } => write!(f, "malformed record on line {line}: {reason}"),
            Self::Malformed { line: None, reason } => write!(f, "malformed course: {reason}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CourseError {}
#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
#[cfg(feature = "std")]
impl std::error::Error for PlanError {}
#[cfg(feature = "std")]
impl std::error::Error for ScheduleError {}
#[cfg(feature = "std")]
impl std::error::Error for ReplayError {}
#[cfg(feature = "std")]
impl std::error::Error for ProviderError {}
