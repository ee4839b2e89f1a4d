use serde::{Deserialize, Serialize};

use crate::constants::{
    DEATH_SENTINEL, FRAME_DT, GRAVITY, HORIZONTAL_SPEED, JUMP_VELOCITY, KILL_FLOOR,
    LANDING_EPSILON, LOOKAHEAD_FRAMES, MAX_FRAMES_DEFAULT, MAX_JUMP_DELAY, PRE_START_OFFSET,
    SPAWN_HEIGHT,
};
use crate::error::ConfigError;

/// Physics and search constants shared by the integrator and the planners.
///
/// Every field has a default, so a partial JSON document only overrides what it names.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub frame_dt: f32,
    pub horizontal_speed: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub landing_epsilon: f32,
    pub death_sentinel: f32,
    pub kill_floor: f32,
    pub lookahead_frames: u32,
    pub max_jump_delay: u32,
    pub max_frames: u32,
    pub pre_start_offset: f32,
    pub spawn_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            frame_dt: FRAME_DT,
            horizontal_speed: HORIZONTAL_SPEED,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            landing_epsilon: LANDING_EPSILON,
            death_sentinel: DEATH_SENTINEL,
            kill_floor: KILL_FLOOR,
            lookahead_frames: LOOKAHEAD_FRAMES,
            max_jump_delay: MAX_JUMP_DELAY,
            max_frames: MAX_FRAMES_DEFAULT,
            pre_start_offset: PRE_START_OFFSET,
            spawn_height: SPAWN_HEIGHT,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("frame_dt", self.frame_dt),
            ("horizontal_speed", self.horizontal_speed),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("landing_epsilon", self.landing_epsilon),
            ("death_sentinel", self.death_sentinel),
            ("kill_floor", self.kill_floor),
            ("pre_start_offset", self.pre_start_offset),
            ("spawn_height", self.spawn_height),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        if self.frame_dt <= 0.0 {
            return Err(ConfigError::NonPositiveFrameDt);
        }
        if self.horizontal_speed <= 0.0 {
            return Err(ConfigError::NonPositiveHorizontalSpeed);
        }
        if self.jump_velocity <= 0.0 {
            return Err(ConfigError::NonPositiveJumpVelocity);
        }
        if self.landing_epsilon < 0.0 {
            return Err(ConfigError::NegativeLandingEpsilon);
        }
        if self.lookahead_frames == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if self.death_sentinel >= self.kill_floor {
            return Err(ConfigError::SentinelAboveKillFloor);
        }
        Ok(())
    }

    /// Horizontal distance covered in one frame.
    #[inline]
    pub fn frame_advance(&self) -> f32 {
        self.horizontal_speed * self.frame_dt
    }

    /// True once `y` has dropped below the kill floor, which covers both hazard
    /// contact (the sentinel) and falling out of the course.
    #[inline]
    pub fn is_dead(&self, y: f32) -> bool {
        y < self.kill_floor
    }

    #[inline]
    pub fn is_terminal(&self, y: f32) -> bool {
        y <= self.death_sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_lookahead() {
        let config = WorldConfig {
            lookahead_frames: 0,
            ..WorldConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLookahead));
    }

    #[test]
    fn rejects_sentinel_above_kill_floor() {
        let config = WorldConfig {
            death_sentinel: -10.0,
            ..WorldConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SentinelAboveKillFloor));
    }

    #[test]
    fn rejects_nan_gravity() {
        let config = WorldConfig {
            gravity: f32::NAN,
            ..WorldConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "gravity" })
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "lookahead_frames": 48, "gravity": -2000.0 }"#).unwrap();
        assert_eq!(config.lookahead_frames, 48);
        assert_eq!(config.gravity, -2000.0);
        assert_eq!(config.jump_velocity, JUMP_VELOCITY);
        assert_eq!(config.max_jump_delay, MAX_JUMP_DELAY);
    }
}
