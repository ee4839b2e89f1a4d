use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Frames (0-based, 60 per second) on which the jump input is asserted.
/// Always strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct JumpSchedule {
    frames: Vec<u32>,
}

impl JumpSchedule {
    pub fn new(frames: Vec<u32>) -> Result<Self, ScheduleError> {
        for (index, pair) in frames.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ScheduleError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0],
                    frame: pair[1],
                });
            }
        }
        Ok(Self { frames })
    }

    pub(crate) fn from_increasing(frames: Vec<u32>) -> Self {
        debug_assert!(frames.windows(2).all(|pair| pair[0] < pair[1]));
        Self { frames }
    }

    pub fn frames(&self) -> &[u32] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, frame: u32) -> bool {
        self.frames.binary_search(&frame).is_ok()
    }

    /// One frame index per line, newline-terminated.
    pub fn to_macro_text(&self) -> String {
        let mut out = String::with_capacity(self.frames.len() * 6);
        for frame in &self.frames {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{frame}");
        }
        out
    }

    /// Parses the line-per-frame macro format. Blank lines and `#` comments
    /// are skipped.
    pub fn parse_macro_text(text: &str) -> Result<Self, ScheduleError> {
        let mut frames = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame = trimmed
                .parse::<u32>()
                .map_err(|_| ScheduleError::InvalidLine {
                    line: idx + 1,
                    text: trimmed.to_string(),
                })?;
            frames.push(frame);
        }
        Self::new(frames)
    }
}

impl TryFrom<Vec<u32>> for JumpSchedule {
    type Error = ScheduleError;

    fn try_from(frames: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl From<JumpSchedule> for Vec<u32> {
    fn from(schedule: JumpSchedule) -> Self {
        schedule.frames
    }
}
