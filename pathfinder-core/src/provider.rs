use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::obstacle::{Course, Obstacle};

/// A source of obstacle records: a course file, an embedded layout, or an
/// adapter bound to a running host. Failures are reported, never thrown.
pub trait ObstacleProvider {
    /// Short human-readable label used in diagnostics.
    fn source(&self) -> &str;

    fn provide(&self) -> Result<Vec<Obstacle>, ProviderError>;

    fn load_course(&self) -> Result<Course, ProviderError> {
        Ok(Course::new(self.provide()?)?)
    }
}

/// Fixed in-memory layout.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticProvider {
    pub name: String,
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleProvider for StaticProvider {
    fn source(&self) -> &str {
        &self.name
    }

    fn provide(&self) -> Result<Vec<Obstacle>, ProviderError> {
        Ok(self.obstacles.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub source: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ingested {
    pub course: Course,
    pub source: String,
    pub attempts: Vec<ProviderAttempt>,
}

/// Tries each provider in order and returns the first valid course. Every
/// attempt, failed or not, is recorded for the report.
pub fn load_first(
    providers: &[&dyn ObstacleProvider],
) -> Result<Ingested, Vec<ProviderAttempt>> {
    let mut attempts = Vec::with_capacity(providers.len());
    for provider in providers {
        match provider.load_course() {
            Ok(course) => {
                attempts.push(ProviderAttempt {
                    source: provider.source().to_string(),
                    ok: true,
                    error: None,
                    objects: Some(course.len()),
                });
                return Ok(Ingested {
                    course,
                    source: provider.source().to_string(),
                    attempts,
                });
            }
            Err(err) => attempts.push(ProviderAttempt {
                source: provider.source().to_string(),
                ok: false,
                error: Some(err.to_string()),
                objects: None,
            }),
        }
    }
    Err(attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Offline;

    impl ObstacleProvider for Offline {
        fn source(&self) -> &str {
            "live"
        }

        fn provide(&self) -> Result<Vec<Obstacle>, ProviderError> {
            Err(ProviderError::Unavailable {
                reason: "no running level".to_string(),
            })
        }
    }

    #[test]
    fn falls_back_to_next_provider() {
        let file = StaticProvider {
            name: "level.txt".to_string(),
            obstacles: vec![Obstacle::platform(0.0, 0.0, 100.0, 10.0)],
        };
        let ingested = load_first(&[&Offline, &file]).unwrap();

        assert_eq!(ingested.source, "level.txt");
        assert_eq!(ingested.course.len(), 1);
        assert_eq!(ingested.attempts.len(), 2);
        assert!(!ingested.attempts[0].ok);
        assert_eq!(
            ingested.attempts[0].error.as_deref(),
            Some("source unavailable: no running level")
        );
        assert_eq!(ingested.attempts[1].objects, Some(1));
    }

    #[test]
    fn empty_layout_counts_as_failure() {
        let empty = StaticProvider {
            name: "empty".to_string(),
            obstacles: Vec::new(),
        };
        let attempts = load_first(&[&empty, &Offline]).unwrap_err();
        assert_eq!(attempts.len(), 2);
        assert_eq!(
            attempts[0].error.as_deref(),
            Some("course has no obstacles")
        );
    }
}
