//! Course files on disk.
//!
//! Two formats are accepted. The text format is one record per line:
//!
//! ```text
//! # comment
//! PLATFORM,x,y,w,h
//! SPIKE,x,y,w,h
//! JUMP_PAD,x,y[,w[,power]]
//! ```
//!
//! The JSON format is an array of `{kind, x, y, w, h, power?}` records, or an
//! object holding that array under `objects`.

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use pathfinder_core::constants::JUMP_PAD_DEFAULT_SIZE;
use pathfinder_core::provider::{load_first, Ingested, ObstacleProvider};
use pathfinder_core::{Obstacle, ProviderError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CourseFormat {
    /// `.json` files are JSON, everything else is text
    #[default]
    Auto,
    Text,
    Json,
}

impl CourseFormat {
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json {
                    Self::Json
                } else {
                    Self::Text
                }
            }
            other => other,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextCourse {
    pub obstacles: Vec<Obstacle>,
    /// Line numbers of records with an unrecognised kind.
    pub ignored_lines: Vec<usize>,
}

pub fn parse_text_course(text: &str) -> Result<TextCourse, ProviderError> {
    let mut course = TextCourse::default();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        let kind = tokens[0].to_ascii_uppercase();
        let obstacle = match kind.as_str() {
            "PLATFORM" | "SPIKE" => {
                let [x, y, w, h] = numbers::<4>(&tokens, line_no)?;
                if kind == "PLATFORM" {
                    Obstacle::platform(x, y, w, h)
                } else {
                    Obstacle::spike(x, y, w, h)
                }
            }
            "JUMP_PAD" => {
                let [x, y] = numbers::<2>(&tokens, line_no)?;
                let w = optional_number(&tokens, 3, line_no)?.unwrap_or(JUMP_PAD_DEFAULT_SIZE);
                let power = optional_number(&tokens, 4, line_no)?.unwrap_or(0.0);
                Obstacle::jump_pad(x, y, w, JUMP_PAD_DEFAULT_SIZE, power)
            }
            _ => {
                course.ignored_lines.push(line_no);
                continue;
            }
        };
        course.obstacles.push(obstacle);
    }
    Ok(course)
}

fn numbers<const N: usize>(tokens: &[&str], line: usize) -> Result<[f32; N], ProviderError> {
    if tokens.len() < N + 1 {
        return Err(ProviderError::Malformed {
            line: Some(line),
            reason: format!(
                "{} needs {N} numeric fields, found {}",
                tokens[0],
                tokens.len() - 1
            ),
        });
    }
    let mut out = [0.0f32; N];
    for (slot, idx) in out.iter_mut().zip(1..) {
        *slot = parse_number(tokens[idx], line)?;
    }
    Ok(out)
}

fn optional_number(
    tokens: &[&str],
    idx: usize,
    line: usize,
) -> Result<Option<f32>, ProviderError> {
    match tokens.get(idx) {
        Some(token) if !token.is_empty() => parse_number(token, line).map(Some),
        _ => Ok(None),
    }
}

fn parse_number(token: &str, line: usize) -> Result<f32, ProviderError> {
    token.parse::<f32>().map_err(|_| ProviderError::Malformed {
        line: Some(line),
        reason: format!("`{token}` is not a number"),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCourse {
    Bare(Vec<Obstacle>),
    Wrapped { objects: Vec<Obstacle> },
}

pub fn parse_json_course(text: &str) -> Result<Vec<Obstacle>, ProviderError> {
    // Untagged errors lose their position, so locate syntax errors first.
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ProviderError::Malformed {
            line: Some(err.line()),
            reason: err.to_string(),
        })?;
    match serde_json::from_value::<JsonCourse>(value) {
        Ok(JsonCourse::Bare(objects)) | Ok(JsonCourse::Wrapped { objects }) => Ok(objects),
        Err(_) => Err(ProviderError::Malformed {
            line: None,
            reason: "expected an array of {kind, x, y, w, h, power?} records".to_string(),
        }),
    }
}

/// A course file on disk, read on every `provide` call.
#[derive(Clone, Debug)]
pub struct CourseFile {
    path: PathBuf,
    label: String,
    format: CourseFormat,
}

impl CourseFile {
    pub fn new(path: impl Into<PathBuf>, format: CourseFormat) -> Self {
        let path = path.into();
        let format = format.resolve(&path);
        let label = path.display().to_string();
        Self {
            path,
            label,
            format,
        }
    }
}

impl ObstacleProvider for CourseFile {
    fn source(&self) -> &str {
        &self.label
    }

    fn provide(&self) -> Result<Vec<Obstacle>, ProviderError> {
        let text = fs::read_to_string(&self.path).map_err(|err| ProviderError::Unavailable {
            reason: err.to_string(),
        })?;
        match self.format {
            CourseFormat::Json => parse_json_course(&text),
            CourseFormat::Text | CourseFormat::Auto => {
                let course = parse_text_course(&text)?;
                if !course.ignored_lines.is_empty() {
                    tracing::debug!(
                        source = %self.label,
                        lines = ?course.ignored_lines,
                        "ignored records with unknown kinds"
                    );
                }
                Ok(course.obstacles)
            }
        }
    }
}

/// Loads the first usable course out of `primary` followed by `fallbacks`.
pub fn load_course_chain(
    primary: &Path,
    fallbacks: &[PathBuf],
    format: CourseFormat,
) -> Result<Ingested> {
    let files: Vec<CourseFile> = std::iter::once(primary)
        .chain(fallbacks.iter().map(PathBuf::as_path))
        .map(|path| CourseFile::new(path, format))
        .collect();
    let providers: Vec<&dyn ObstacleProvider> = files
        .iter()
        .map(|file| file as &dyn ObstacleProvider)
        .collect();

    match load_first(&providers) {
        Ok(ingested) => {
            for attempt in ingested.attempts.iter().filter(|attempt| !attempt.ok) {
                tracing::warn!(
                    source = %attempt.source,
                    error = attempt.error.as_deref().unwrap_or("unknown"),
                    "course source failed, trying next"
                );
            }
            Ok(ingested)
        }
        Err(attempts) => {
            let detail = attempts
                .iter()
                .map(|attempt| {
                    format!(
                        "{}: {}",
                        attempt.source,
                        attempt.error.as_deref().unwrap_or("unknown")
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            Err(anyhow!("no usable course ({detail})"))
        }
    }
}
