use anyhow::{anyhow, Context, Result};
use pathfinder_core::WorldConfig;
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_PREFIX: &str = "PATHFINDER_";

/// Defaults, then the optional JSON file, then `PATHFINDER_*` variables.
pub fn load_world_config(path: Option<&Path>) -> Result<WorldConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read(path)
                .with_context(|| format!("failed reading config {}", path.display()))?;
            serde_json::from_slice::<WorldConfig>(&raw)
                .with_context(|| format!("failed parsing config {}", path.display()))?
        }
        None => WorldConfig::default(),
    };
    apply_env_overrides(&mut config, |name| env::var(name).ok());
    config
        .validate()
        .map_err(|err| anyhow!("invalid world config: {err}"))?;
    Ok(config)
}

/// `lookup` receives the full variable name, e.g. `PATHFINDER_GRAVITY`.
pub fn apply_env_overrides<F>(config: &mut WorldConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |field: &str| lookup(&format!("{ENV_PREFIX}{}", field.to_ascii_uppercase()));

    override_f32(&mut config.frame_dt, "frame_dt", &read);
    override_f32(&mut config.horizontal_speed, "horizontal_speed", &read);
    override_f32(&mut config.gravity, "gravity", &read);
    override_f32(&mut config.jump_velocity, "jump_velocity", &read);
    override_f32(&mut config.landing_epsilon, "landing_epsilon", &read);
    override_f32(&mut config.death_sentinel, "death_sentinel", &read);
    override_f32(&mut config.kill_floor, "kill_floor", &read);
    override_u32(&mut config.lookahead_frames, "lookahead_frames", &read);
    override_u32(&mut config.max_jump_delay, "max_jump_delay", &read);
    override_u32(&mut config.max_frames, "max_frames", &read);
    override_f32(&mut config.pre_start_offset, "pre_start_offset", &read);
    override_f32(&mut config.spawn_height, "spawn_height", &read);
}

fn override_f32<R>(slot: &mut f32, field: &str, read: &R)
where
    R: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(field) else {
        return;
    };
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => *slot = value,
        _ => tracing::warn!(
            "{ENV_PREFIX}{} ({raw}) is not a finite number. Keeping {}.",
            field.to_ascii_uppercase(),
            slot
        ),
    }
}

fn override_u32<R>(slot: &mut u32, field: &str, read: &R)
where
    R: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(field) else {
        return;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(
            "{ENV_PREFIX}{} ({raw}) is not an unsigned integer. Keeping {}.",
            field.to_ascii_uppercase(),
            slot
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_replace_fields() {
        let mut config = WorldConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("PATHFINDER_GRAVITY", "-1200"),
                ("PATHFINDER_LOOKAHEAD_FRAMES", " 48 "),
            ]),
        );
        assert_eq!(config.gravity, -1200.0);
        assert_eq!(config.lookahead_frames, 48);
        assert_eq!(config.jump_velocity, WorldConfig::default().jump_velocity);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let mut config = WorldConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("PATHFINDER_HORIZONTAL_SPEED", "fast"),
                ("PATHFINDER_MAX_FRAMES", "-1"),
                ("PATHFINDER_GRAVITY", "NaN"),
            ]),
        );
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn file_values_merge_with_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("world.json");
        fs::write(&path, r#"{ "jump_velocity": 720.0, "max_jump_delay": 4 }"#)?;

        let config = load_world_config(Some(&path))?;
        assert_eq!(config.jump_velocity, 720.0);
        assert_eq!(config.max_jump_delay, 4);
        assert_eq!(config.gravity, WorldConfig::default().gravity);
        Ok(())
    }

    #[test]
    fn invalid_file_config_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("world.json");
        fs::write(&path, r#"{ "lookahead_frames": 0 }"#)?;

        let err = load_world_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("lookahead"), "{err}");
        Ok(())
    }
}
