// config.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WINDOW_TITLE: &str = "MeadowRoam";
pub const CONFIG_FILE_PATH: &str = "meadow.json";

// --- Terrain Generation ---
pub const TERRAIN_SIZE: f32 = 1000.0; // 1000x1000 meters
pub const TERRAIN_RESOLUTION: u32 = 256; // Subdivisions per side
pub const TERRAIN_MAX_HEIGHT: f32 = 50.0;
pub const TERRAIN_SMOOTHNESS: f32 = 0.008; // Reserved, the height formula ignores it
pub const TERRAIN_ORIGIN_Y: f32 = -40.0; // Terrain sits slightly below the origin

// --- Character Physics (per tick, not per second) ---
pub const GRAVITY: f32 = -0.01;
pub const MOVE_SPEED: f32 = 0.1;
pub const MOUSE_SENSITIVITY: f32 = 0.02;
pub const HALF_HEIGHT: f32 = 0.5;
pub const FALLBACK_FLOOR_Y: f32 = -39.0; // Used when no terrain can be queried
pub const SPAWN_POSITION: [f32; 3] = [0.0, 10.0, 0.0];

// Look limits. Asymmetric: looking down goes much further than up.
pub const PITCH_MIN_DEG: f32 = -40.0;
pub const PITCH_MAX_DEG: f32 = 10.0;

// Camera sits behind and above the look pivot, aimed at it
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 1.0, 4.0];

// --- Gait ---
pub const WALK_CADENCE: f32 = 3.0;
pub const WALK_AMPLITUDE: f32 = 0.5;
pub const RUN_CADENCE: f32 = 5.0;
pub const RUN_AMPLITUDE: f32 = 0.8;

// --- Rendering ---
pub const FOV_Y: f32 = 75.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 5000.0;
pub const FOG_START: f32 = 300.0;
pub const FOG_END: f32 = 900.0;
pub const MAX_FRAME_DT: f32 = 0.1; // Clamp long stalls (window drag, breakpoints)

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a session needs to build its world. Missing JSON fields fall
/// back to the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub terrain: TerrainConfig,
    pub character: CharacterConfig,
    pub avatar_size: f32,
    pub avatar_evolution_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub size: f32,
    pub resolution: u32,
    pub max_height: f32,
    pub smoothness: f32,
    pub origin_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub spawn: [f32; 3],
    pub gravity: f32,
    pub speed: f32,
    pub mouse_sensitivity: f32,
    pub half_height: f32,
    pub fallback_floor: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            character: CharacterConfig::default(),
            avatar_size: 1.0,
            avatar_evolution_level: 1,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: TERRAIN_SIZE,
            resolution: TERRAIN_RESOLUTION,
            max_height: TERRAIN_MAX_HEIGHT,
            smoothness: TERRAIN_SMOOTHNESS,
            origin_y: TERRAIN_ORIGIN_Y,
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            spawn: SPAWN_POSITION,
            gravity: GRAVITY,
            speed: MOVE_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            half_height: HALF_HEIGHT,
            fallback_floor: FALLBACK_FLOOR_Y,
        }
    }
}

impl WorldConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at '{}', using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::info!("Loaded config from '{}'", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("meadow_roam_{}_{name}.json", std::process::id()))
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: WorldConfig =
            serde_json::from_str(r#"{ "terrain": { "resolution": 32 } }"#).unwrap();
        assert_eq!(cfg.terrain.resolution, 32);
        assert_eq!(cfg.terrain.size, TERRAIN_SIZE);
        assert_eq!(cfg.character, CharacterConfig::default());
        assert_eq!(cfg.avatar_size, 1.0);
        assert_eq!(cfg.avatar_evolution_level, 1);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = WorldConfig::load_or_default("definitely/not/here.json").unwrap();
        assert_eq!(cfg, WorldConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = scratch_path("bad_config");
        std::fs::write(&path, "{ not json").unwrap();
        let err = WorldConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn written_config_reads_back() {
        let mut cfg = WorldConfig::default();
        cfg.character.speed = 0.25;
        cfg.terrain.origin_y = -12.0;
        let path = scratch_path("config_roundtrip");
        std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(WorldConfig::load(&path).unwrap(), cfg);
        let _ = std::fs::remove_file(&path);
    }
}
