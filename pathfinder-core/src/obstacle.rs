use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::{CourseError, ObstacleDefect};
use crate::sim::AgentState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Platform,
    Spike,
    JumpPad,
}

impl ObstacleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Spike => "spike",
            Self::JumpPad => "jump_pad",
        }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner (y grows upward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Edges are inclusive.
    #[inline]
    pub fn spans_x(&self, px: f32) -> bool {
        px >= self.x && px <= self.right()
    }

    /// Edges are inclusive.
    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.spans_x(px) && py >= self.y && py <= self.top()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObstacleRecord", into = "ObstacleRecord")]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Launch velocity for jump pads; zero or negative means the world default.
    pub power: f32,
}

impl Obstacle {
    pub const fn platform(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind: ObstacleKind::Platform,
            rect: Rect::new(x, y, w, h),
            power: 0.0,
        }
    }

    pub const fn spike(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind: ObstacleKind::Spike,
            rect: Rect::new(x, y, w, h),
            power: 0.0,
        }
    }

    pub const fn jump_pad(x: f32, y: f32, w: f32, h: f32, power: f32) -> Self {
        Self {
            kind: ObstacleKind::JumpPad,
            rect: Rect::new(x, y, w, h),
            power,
        }
    }

    pub fn check(&self) -> Result<(), ObstacleDefect> {
        let Rect { x, y, w, h } = self.rect;
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return Err(ObstacleDefect::NonFiniteGeometry);
        }
        if w < 0.0 || h < 0.0 {
            return Err(ObstacleDefect::NegativeSize);
        }
        if !self.power.is_finite() {
            return Err(ObstacleDefect::NonFinitePower);
        }
        Ok(())
    }
}

/// Flat wire shape: `{kind, x, y, w, h, power?}`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ObstacleRecord {
    kind: ObstacleKind,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    power: Option<f32>,
}

impl From<ObstacleRecord> for Obstacle {
    fn from(record: ObstacleRecord) -> Self {
        Self {
            kind: record.kind,
            rect: Rect::new(record.x, record.y, record.w, record.h),
            power: record.power.unwrap_or(0.0),
        }
    }
}

impl From<Obstacle> for ObstacleRecord {
    fn from(obstacle: Obstacle) -> Self {
        Self {
            kind: obstacle.kind,
            x: obstacle.rect.x,
            y: obstacle.rect.y,
            w: obstacle.rect.w,
            h: obstacle.rect.h,
            power: (obstacle.kind == ObstacleKind::JumpPad).then_some(obstacle.power),
        }
    }
}

pub fn validate_obstacles(obstacles: &[Obstacle]) -> Result<(), CourseError> {
    for (index, obstacle) in obstacles.iter().enumerate() {
        obstacle
            .check()
            .map_err(|defect| CourseError::InvalidObstacle { index, defect })?;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseBounds {
    pub min_x: f32,
    pub max_x: f32,
    /// Highest platform top, or 0 when the course has no platforms.
    pub ground_y: f32,
}

/// A validated, non-empty obstacle layout. Read-only for the lifetime of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    obstacles: Vec<Obstacle>,
    bounds: CourseBounds,
}

impl Course {
    pub fn new(obstacles: Vec<Obstacle>) -> Result<Self, CourseError> {
        if obstacles.is_empty() {
            return Err(CourseError::Empty);
        }
        validate_obstacles(&obstacles)?;

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut ground_y = f32::NEG_INFINITY;
        for obstacle in &obstacles {
            min_x = min_x.min(obstacle.rect.x);
            max_x = max_x.max(obstacle.rect.right());
            if obstacle.kind == ObstacleKind::Platform {
                ground_y = ground_y.max(obstacle.rect.top());
            }
        }
        if !ground_y.is_finite() {
            ground_y = 0.0;
        }

        Ok(Self {
            obstacles,
            bounds: CourseBounds {
                min_x,
                max_x,
                ground_y,
            },
        })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bounds(&self) -> CourseBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn count(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind == kind).count()
    }

    /// Spawn a little before the first obstacle, slightly above the ground line.
    pub fn default_start(&self, config: &WorldConfig) -> AgentState {
        AgentState {
            x: self.bounds.min_x - config.pre_start_offset,
            y: self.bounds.ground_y + config.spawn_height,
            vx: config.horizontal_speed,
            vy: 0.0,
            grounded: true,
        }
    }

    pub fn default_goal(&self) -> f32 {
        self.bounds.max_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_obstacles() {
        let course = Course::new(alloc::vec![
            Obstacle::platform(0.0, -10.0, 300.0, 10.0),
            Obstacle::platform(120.0, 0.0, 40.0, 30.0),
            Obstacle::spike(200.0, 0.0, 20.0, 20.0),
            Obstacle::jump_pad(-40.0, 0.0, 16.0, 16.0, 0.0),
        ])
        .unwrap();

        let bounds = course.bounds();
        assert_eq!(bounds.min_x, -40.0);
        assert_eq!(bounds.max_x, 300.0);
        assert_eq!(bounds.ground_y, 30.0);
        assert_eq!(course.count(ObstacleKind::Platform), 2);
    }

    #[test]
    fn ground_defaults_to_zero_without_platforms() {
        let course = Course::new(alloc::vec![Obstacle::spike(50.0, 0.0, 10.0, 10.0)]).unwrap();
        assert_eq!(course.bounds().ground_y, 0.0);

        let config = WorldConfig::default();
        let start = course.default_start(&config);
        assert_eq!(start.x, 50.0 - config.pre_start_offset);
        assert_eq!(start.y, config.spawn_height);
        assert!(start.grounded);
    }

    #[test]
    fn rejects_empty_course() {
        assert_eq!(Course::new(Vec::new()), Err(CourseError::Empty));
    }

    #[test]
    fn rejects_negative_size() {
        let err = Course::new(alloc::vec![
            Obstacle::platform(0.0, 0.0, 10.0, 10.0),
            Obstacle::spike(0.0, 0.0, -1.0, 10.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CourseError::InvalidObstacle {
                index: 1,
                defect: ObstacleDefect::NegativeSize
            }
        );
    }

    #[test]
    fn rect_edges_are_inclusive() {
        let rect = Rect::new(50.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(50.0, 0.0));
        assert!(rect.contains(60.0, 10.0));
        assert!(!rect.contains(60.01, 5.0));
        assert!(!rect.contains(55.0, -0.01));
    }

    #[test]
    fn wire_record_omits_power_for_non_pads() {
        let json = serde_json::to_value(Obstacle::spike(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json["kind"], "spike");
        assert!(json.get("power").is_none());

        let pad: Obstacle =
            serde_json::from_str(r#"{"kind":"jump_pad","x":0,"y":0,"w":16,"h":16}"#).unwrap();
        assert_eq!(pad.kind, ObstacleKind::JumpPad);
        assert_eq!(pad.power, 0.0);
    }
}
