// Default world constants for the side-scrolling course simulation.
// Units are world pixels and seconds; one frame is 1/60 s.

pub const FRAME_DT: f32 = 1.0 / 60.0;
pub const FRAMES_PER_SECOND: u32 = 60;

// Kinematics
pub const HORIZONTAL_SPEED: f32 = 220.0; // px/s
pub const GRAVITY: f32 = -1600.0; // px/s^2
pub const JUMP_VELOCITY: f32 = 680.0; // px/s

// Surface contact tolerance for landing detection.
pub const LANDING_EPSILON: f32 = 1e-3;

// Hazard contact parks y here; it sits well below KILL_FLOOR.
pub const DEATH_SENTINEL: f32 = -999_999.0;
// Anything below this is treated as dead (hazard or fell out of the course).
pub const KILL_FLOOR: f32 = -1000.0;

// Search
pub const LOOKAHEAD_FRAMES: u32 = 36;
pub const MAX_JUMP_DELAY: u32 = 8;
pub const MAX_FRAMES_DEFAULT: u32 = FRAMES_PER_SECOND * 300; // 5 minutes

// Start placement relative to the course bounds.
pub const PRE_START_OFFSET: f32 = 16.0;
pub const SPAWN_HEIGHT: f32 = 12.0;

// Text-course jump pads carry no height; they are 16x16 unless a width is given.
pub const JUMP_PAD_DEFAULT_SIZE: f32 = 16.0;

// Random search
pub const RANDOM_ATTEMPTS_DEFAULT: u32 = 256;
pub const RANDOM_JUMP_PERMILLE_DEFAULT: u32 = 500;
