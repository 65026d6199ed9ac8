/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete; a file that
/// exists but cannot be read or parsed is reported back as a `ConfigError`
/// so the caller can log it once logging is up.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub turn: TurnConfig,
    pub gamepad: GamepadConfig,
    pub seed: Option<u64>,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnConfig {
    pub tick_rate_ms: u64,
    pub seconds_per_turn: u32,
    pub busy_ticks: u32,     // first N countdown values reject picks
    pub picks_per_turn: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pick: Vec<String>,
    pub toggle: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} parse error: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    turn: TomlTurn,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlTurn {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_seconds_per_turn")]
    seconds_per_turn: u32,
    #[serde(default = "default_busy_ticks")]
    busy_ticks: u32,
    #[serde(default = "default_picks_per_turn")]
    picks_per_turn: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pick")]
    pick: Vec<String>,
    #[serde(default = "default_toggle")]
    toggle: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default)]
    file: Option<String>,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 1000 }
fn default_seconds_per_turn() -> u32 { 30 }
fn default_busy_ticks() -> u32 { 2 }      // countdown shows 30 and 29 before input opens
fn default_picks_per_turn() -> u32 { 3 }

fn default_pick() -> Vec<String> { vec!["A".into()] }
fn default_toggle() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTurn {
    fn default() -> Self {
        TomlTurn {
            tick_rate_ms: default_tick_rate(),
            seconds_per_turn: default_seconds_per_turn(),
            busy_ticks: default_busy_ticks(),
            picks_per_turn: default_picks_per_turn(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            pick: default_pick(),
            toggle: default_toggle(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging { file: None, level: default_log_level() }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        TomlTurn::default().into()
    }
}

impl From<TomlTurn> for TurnConfig {
    fn from(t: TomlTurn) -> Self {
        TurnConfig {
            tick_rate_ms: t.tick_rate_ms.max(1),
            // A turn needs at least one countdown unit.
            seconds_per_turn: t.seconds_per_turn.max(1),
            busy_ticks: t.busy_ticks,
            picks_per_turn: t.picks_per_turn,
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(cfg: TomlConfig) -> Self {
        GameConfig {
            turn: cfg.turn.into(),
            gamepad: GamepadConfig {
                pick: cfg.gamepad.pick,
                toggle: cfg.gamepad.toggle,
                quit: cfg.gamepad.quit,
            },
            seed: cfg.general.seed,
            logging: LoggingConfig {
                file: cfg.logging.file.map(PathBuf::from),
                level: cfg.logging.level,
            },
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/dicebingo`.
    pub fn load() -> (Self, Option<ConfigError>) {
        match load_toml(&candidate_dirs()) {
            Ok(cfg) => (cfg.into(), None),
            Err(e) => (TomlConfig::default().into(), Some(e)),
        }
    }

    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Into::into)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
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

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/dicebingo");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First `config.toml` found wins; none found means defaults.
fn load_toml(search_dirs: &[PathBuf]) -> Result<TomlConfig, ConfigError> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        return toml::from_str::<TomlConfig>(&text)
            .map_err(|source| ConfigError::Parse { path, source });
    }
    Ok(TomlConfig::default())
}
