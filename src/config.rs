//! Game Configuration
//!
//! Every tunable the game core reads, with defaults matching the shipped
//! game. Saved and loaded as RON files (.ron extension).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tunables for the world simulation and audio engine.
///
/// Defaults: a 12x12 grid, five items, five enemies, a 200ms projectile
/// tick, A440 tuning, and a conservative master gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_side: i32,
    /// Items placed at world generation
    pub item_count: usize,
    /// Enemies placed at world generation
    pub enemy_count: usize,
    /// Seconds between projectile ticks
    pub tick_duration: f32,
    /// Tuning reference in Hz (semitone offset 0)
    pub base_frequency: f32,
    /// Master output attenuation applied to the summed voice mix
    pub master_gain: f32,
    /// Resample occupied cells during generation instead of allowing
    /// items, enemies, and the player start to stack
    pub distinct_placements: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_side: 12,
            item_count: 5,
            enemy_count: 5,
            tick_duration: 0.2,
            base_frequency: 440.0,
            master_gain: 0.2,
            distinct_placements: false,
        }
    }
}

/// Save a config to a file in RON format
pub fn save_config(config: &GameConfig, path: &Path) -> Result<(), String> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(path, contents).map_err(|e| format!("Failed to write file: {}", e))?;

    Ok(())
}

/// Load a config from a RON file
pub fn load_config(path: &Path) -> Result<GameConfig, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let config: GameConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))?;

    Ok(config)
}
