use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::obstacle::{Obstacle, ObstacleKind};

/// Kinematic state of the agent at one simulated instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
}

impl AgentState {
    pub fn at(x: f32, y: f32, grounded: bool) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            grounded,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Advances `state` by one frame.
///
/// Order matters: jump, integrate, land on the highest crossed platform top,
/// apply jump pads, then spikes. Spikes run last so hazard contact always wins.
/// A state already parked at the death sentinel stays there.
pub fn step(
    state: &AgentState,
    jump: bool,
    obstacles: &[Obstacle],
    config: &WorldConfig,
) -> AgentState {
    let dt = config.frame_dt;

    if config.is_terminal(state.y) {
        return AgentState {
            x: state.x + config.horizontal_speed * dt,
            y: config.death_sentinel,
            vx: state.vx,
            vy: 0.0,
            grounded: false,
        };
    }

    let mut next = *state;

    if jump && next.grounded {
        next.vy = config.jump_velocity;
        next.grounded = false;
    }

    next.x += config.horizontal_speed * dt;
    next.vy += config.gravity * dt;
    next.y += next.vy * dt;

    let eps = config.landing_epsilon;
    let mut landing: Option<f32> = None;
    for obstacle in obstacles {
        if obstacle.kind != ObstacleKind::Platform || !obstacle.rect.spans_x(next.x) {
            continue;
        }
        let top = obstacle.rect.top();
        let crossed = state.y >= top - eps && next.y <= top + eps;
        if crossed && landing.map_or(true, |best| top > best) {
            landing = Some(top);
        }
    }
    match landing {
        Some(top) => {
            next.y = top;
            next.vy = 0.0;
            next.grounded = true;
        }
        None => next.grounded = false,
    }

    for obstacle in obstacles {
        if obstacle.kind == ObstacleKind::JumpPad && obstacle.rect.contains(next.x, next.y) {
            next.vy = if obstacle.power > 0.0 {
                obstacle.power
            } else {
                config.jump_velocity
            };
            next.grounded = false;
        }
    }

    for obstacle in obstacles {
        if obstacle.kind == ObstacleKind::Spike && obstacle.rect.contains(next.x, next.y) {
            next.y = config.death_sentinel;
        }
    }

    next
}
