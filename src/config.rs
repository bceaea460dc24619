use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems loading or validating tuning data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("min_distance ({min_distance}) must be below run_range ({run_range})")]
    InvertedRanges { min_distance: f32, run_range: f32 },
    #[error("state_hysteresis ({hysteresis}) must be smaller than the band gap ({gap})")]
    HysteresisTooWide { hysteresis: f32, gap: f32 },
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("min_projectile_speed ({min}) exceeds max_projectile_speed ({max})")]
    InvertedSpeeds { min: f32, max: f32 },
}

/// What the boss throws. Absent in [`BossConfig`] means "throw nothing".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilePrefab {
    pub radius: f32,
    /// Seconds before the projectile despawns on its own.
    pub lifetime: f32,
    pub gravity: bool,
    /// Prefabs without a body cannot take a velocity.
    pub rigid_body: bool,
}

impl Default for ProjectilePrefab {
    fn default() -> Self {
        Self {
            radius: 0.25,
            lifetime: 4.0,
            gravity: true,
            rigid_body: true,
        }
    }
}

/// Boss tuning. Immutable once the controller is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Farther than this (plus hysteresis) and the boss chases.
    pub run_range: f32,
    /// At or inside this (plus hysteresis) and the boss throws.
    pub min_distance: f32,
    pub state_hysteresis: f32,
    /// Seconds of recovery after a release.
    pub throw_cooldown: f32,
    pub min_projectile_speed: f32,
    pub max_projectile_speed: f32,
    /// Flee gets faster once the player is inside `run_range - extra_speed_margin`.
    pub extra_speed_margin: f32,
    pub extra_speed_bonus: f32,
    pub run_animation_speed: f32,
    pub projectile: Option<ProjectilePrefab>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            run_range: 5.0,
            min_distance: 3.0,
            state_hysteresis: 0.5,
            throw_cooldown: 2.0,
            min_projectile_speed: 8.0,
            max_projectile_speed: 15.0,
            extra_speed_margin: 1.0,
            extra_speed_bonus: 0.7,
            run_animation_speed: 0.8,
            projectile: Some(ProjectilePrefab::default()),
        }
    }
}

impl BossConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("run_range", self.run_range),
            ("min_distance", self.min_distance),
            ("state_hysteresis", self.state_hysteresis),
            ("throw_cooldown", self.throw_cooldown),
            ("min_projectile_speed", self.min_projectile_speed),
            ("max_projectile_speed", self.max_projectile_speed),
            ("extra_speed_margin", self.extra_speed_margin),
            ("extra_speed_bonus", self.extra_speed_bonus),
            ("run_animation_speed", self.run_animation_speed),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        for (field, value) in [
            ("state_hysteresis", self.state_hysteresis),
            ("throw_cooldown", self.throw_cooldown),
            ("extra_speed_margin", self.extra_speed_margin),
            ("extra_speed_bonus", self.extra_speed_bonus),
            ("min_projectile_speed", self.min_projectile_speed),
            ("min_distance", self.min_distance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.min_distance >= self.run_range {
            return Err(ConfigError::InvertedRanges {
                min_distance: self.min_distance,
                run_range: self.run_range,
            });
        }
        let gap = self.run_range - self.min_distance;
        if self.state_hysteresis >= gap {
            return Err(ConfigError::HysteresisTooWide {
                hysteresis: self.state_hysteresis,
                gap,
            });
        }
        if self.min_projectile_speed > self.max_projectile_speed {
            return Err(ConfigError::InvertedSpeeds {
                min: self.min_projectile_speed,
                max: self.max_projectile_speed,
            });
        }
        Ok(())
    }
}

/// Whole-arena setup: boss tuning plus the scene around it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub boss: BossConfig,
    pub boss_start: Vec3,
    pub boss_speed: f32,
    /// Movement agent turn rate; multiplied by dt to get the slerp fraction.
    pub boss_angular_speed: f32,
    /// Throw origin relative to the boss, in boss-local space.
    pub throw_origin: Option<Vec3>,
    /// Without a player the boss has no target and disables itself.
    pub spawn_player: bool,
    pub player_start: Vec3,
    pub player_speed: f32,
    /// Points the scripted player walks through, in order, looping.
    pub player_waypoints: Vec<Vec3>,
    /// Seconds until the player is removed from the world.
    pub player_lifetime: Option<f32>,
    pub enemy_count: i32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            boss: BossConfig::default(),
            boss_start: Vec3::ZERO,
            boss_speed: 3.5,
            boss_angular_speed: 120.0,
            throw_origin: Some(Vec3::new(0.4, 1.6, 0.6)),
            spawn_player: true,
            player_start: Vec3::new(12.0, 0.0, 0.0),
            player_speed: 4.0,
            player_waypoints: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(12.0, 0.0, 4.0),
                Vec3::new(-6.0, 0.0, -6.0),
            ],
            player_lifetime: None,
            enemy_count: 1,
        }
    }
}

impl ArenaConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.boss.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_validate() {
        assert!(BossConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case(BossConfig { min_distance: 5.0, ..BossConfig::default() })]
    #[case(BossConfig { min_distance: 6.0, ..BossConfig::default() })]
    fn rejects_inverted_ranges(#[case] config: BossConfig) {
        assert!(matches!(config.validate(), Err(ConfigError::InvertedRanges { .. })));
    }

    #[test]
    fn rejects_hysteresis_wider_than_gap() {
        let config = BossConfig {
            state_hysteresis: 2.0,
            ..BossConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HysteresisTooWide { .. })
        ));
    }

    #[test]
    fn rejects_negative_cooldown() {
        let config = BossConfig {
            throw_cooldown: -1.0,
            ..BossConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "throw_cooldown", .. })
        ));
    }

    #[rstest]
    #[case(BossConfig { run_range: f32::NAN, ..BossConfig::default() }, "run_range")]
    #[case(BossConfig { state_hysteresis: f32::NAN, ..BossConfig::default() }, "state_hysteresis")]
    #[case(BossConfig { max_projectile_speed: f32::INFINITY, ..BossConfig::default() }, "max_projectile_speed")]
    fn rejects_non_finite_fields(#[case] config: BossConfig, #[case] expected: &str) {
        match config.validate() {
            Err(ConfigError::NotFinite { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected NotFinite, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_speeds() {
        let config = BossConfig {
            min_projectile_speed: 20.0,
            ..BossConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedSpeeds { .. })
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ArenaConfig::from_json(r#"{ "boss": { "run_range": 7.5 }, "enemy_count": 3 }"#)
            .unwrap();
        assert_eq!(config.boss.run_range, 7.5);
        assert_eq!(config.boss.min_distance, 3.0);
        assert_eq!(config.enemy_count, 3);
        assert_eq!(config.player_speed, 4.0);
    }

    #[test]
    fn null_projectile_disables_throws() {
        let config = ArenaConfig::from_json(r#"{ "boss": { "projectile": null } }"#).unwrap();
        assert!(config.boss.projectile.is_none());
    }

    #[test]
    fn load_rejects_invalid_tuning() {
        let path = std::env::temp_dir().join(format!("snailboss-invalid-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "boss": { "min_distance": 9.0 } }"#).unwrap();
        let result = ArenaConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::InvertedRanges { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ArenaConfig::load(Path::new("/nonexistent/arena.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
