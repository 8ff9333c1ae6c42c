/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub rules: RulesConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    /// Island units per simulation tick.
    pub player_speed: f32,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub time_limit_secs: u32,
    pub target_deliveries: u32,
    pub pickup_range: f32,
    pub deliver_range: f32,
    pub island_half_extent: f32,
    /// Respawn square bound; kept smaller than the island so chests
    /// never land in the water.
    pub spawn_extent: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    rules: TomlRules,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_time_limit")]
    time_limit_secs: u32,
    #[serde(default = "default_target")]
    target_deliveries: u32,
    #[serde(default = "default_pickup_range")]
    pickup_range: f32,
    #[serde(default = "default_deliver_range")]
    deliver_range: f32,
    #[serde(default = "default_island_half_extent")]
    island_half_extent: f32,
    #[serde(default = "default_spawn_extent")]
    spawn_extent: f32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_player_speed() -> f32 { 0.9 }   // 18 units/s at 50ms tick
fn default_time_limit() -> u32 { 60 }
fn default_target() -> u32 { 10 }
fn default_pickup_range() -> f32 { 5.0 }
fn default_deliver_range() -> f32 { 8.0 }
fn default_island_half_extent() -> f32 { 18.0 }
fn default_spawn_extent() -> f32 { 15.0 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_speed: default_player_speed(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            time_limit_secs: default_time_limit(),
            target_deliveries: default_target(),
            pickup_range: default_pickup_range(),
            deliver_range: default_deliver_range(),
            island_half_extent: default_island_half_extent(),
            spawn_extent: default_spawn_extent(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                player_speed: toml_cfg.speed.player_speed,
            },
            rules: RulesConfig {
                time_limit_secs: toml_cfg.rules.time_limit_secs,
                target_deliveries: toml_cfg.rules.target_deliveries,
                pickup_range: toml_cfg.rules.pickup_range,
                deliver_range: toml_cfg.rules.deliver_range,
                island_half_extent: toml_cfg.rules.island_half_extent,
                spawn_extent: toml_cfg.rules.spawn_extent,
            },
        }
    }
}

/// Candidate directories to search: exe dir, then CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

/// Default config for unit tests across the crate.
#[cfg(test)]
pub fn test_config() -> GameConfig {
    GameConfig::from_toml(TomlConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_full_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        let cfg = GameConfig::from_toml(cfg);
        assert_eq!(cfg.rules.time_limit_secs, 60);
        assert_eq!(cfg.rules.target_deliveries, 10);
        assert_eq!(cfg.speed.tick_rate_ms, 50);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[rules]\ntime_limit_secs = 90\n",
        ).unwrap();
        let cfg = GameConfig::from_toml(cfg);
        assert_eq!(cfg.rules.time_limit_secs, 90);
        assert_eq!(cfg.rules.target_deliveries, 10);
        assert!((cfg.rules.pickup_range - 5.0).abs() < f32::EPSILON);
    }
}
