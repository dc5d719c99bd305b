//! Generation options and configuration file loading
//!
//! The file format is line based, one or more `OPTIONS=` lines holding
//! comma-separated `name:value` pairs:
//!
//! ```text
//! # mazerc
//! OPTIONS=width:20,length:15
//! OPTIONS=growth_step:25,seed:1234
//! OPTIONS=player_spawn:3/1/3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::maze::Coord;

/// World-space position handed to the host's spawn system untouched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SpawnPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Construction-time maze options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeOptions {
    pub width: u32,
    pub length: u32,

    /// Cells created per tick during population
    pub populate_step: usize,
    /// Growth iterations per tick
    pub growth_step: usize,

    /// Fixed RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// First cell admitted to the maze
    pub origin: Coord,

    pub player_spawn: SpawnPoint,
    pub minotaur_spawn: SpawnPoint,
}

impl Default for MazeOptions {
    fn default() -> Self {
        Self {
            width: 10,
            length: 10,
            populate_step: 10,
            growth_step: 10,
            seed: None,
            origin: Coord::ORIGIN,
            player_spawn: SpawnPoint::new(3.0, 1.0, 3.0),
            minotaur_spawn: SpawnPoint::new(66.0, 1.0, 66.0),
        }
    }
}

impl MazeOptions {
    /// Load options from a file
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| OptionsError::Io(e.to_string()))?;

        Self::parse_config(&contents)
    }

    /// Parse options from a config string
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    options.parse_option(opt.trim())?;
                }
            } else {
                return Err(OptionsError::Parse(line.to_string()));
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Parse a single `name:value` option
    pub fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        if opt.is_empty() {
            return Ok(());
        }
        match opt.split_once(':').or_else(|| opt.split_once('=')) {
            Some((key, value)) => self.set_option(key.trim(), Some(value.trim())),
            None => self.set_option(opt, None),
        }
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionsError> {
        let value = value.ok_or_else(|| OptionsError::MissingValue(name.to_string()))?;
        let invalid = || OptionsError::InvalidValue(name.to_string(), value.to_string());

        match name {
            "width" => self.width = value.parse().map_err(|_| invalid())?,
            "length" => self.length = value.parse().map_err(|_| invalid())?,
            "populate_step" => self.populate_step = value.parse().map_err(|_| invalid())?,
            "growth_step" => self.growth_step = value.parse().map_err(|_| invalid())?,
            "step" => {
                let step = value.parse().map_err(|_| invalid())?;
                self.populate_step = step;
                self.growth_step = step;
            }
            "seed" => {
                self.seed = match value {
                    "random" | "none" => None,
                    _ => Some(value.parse().map_err(|_| invalid())?),
                };
            }
            "origin" => {
                let parts = split_numbers::<u32>(value).ok_or_else(invalid)?;
                let [x, y] = parts[..] else {
                    return Err(invalid());
                };
                self.origin = Coord::new(x, y);
            }
            "player_spawn" => self.player_spawn = parse_spawn(value).ok_or_else(invalid)?,
            "minotaur_spawn" => self.minotaur_spawn = parse_spawn(value).ok_or_else(invalid)?,
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Reject options no generator could run with
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.width == 0 || self.length == 0 {
            return Err(OptionsError::Invalid(format!(
                "maze must be at least 1x1, got {}x{}",
                self.width, self.length
            )));
        }
        if self.populate_step == 0 || self.growth_step == 0 {
            return Err(OptionsError::Invalid("step sizes must be positive".to_string()));
        }
        if self.origin.x >= self.width || self.origin.y >= self.length {
            return Err(OptionsError::Invalid(format!(
                "origin {} lies outside the {}x{} maze",
                self.origin, self.width, self.length
            )));
        }
        Ok(())
    }

    /// Save options to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), OptionsError> {
        let contents = self.to_config_string();
        std::fs::write(path, contents).map_err(|e| OptionsError::Io(e.to_string()))
    }

    /// Convert options to config file format
    pub fn to_config_string(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# maze generator configuration".to_string());
        lines.push(format!("OPTIONS=width:{},length:{}", self.width, self.length));
        lines.push(format!(
            "OPTIONS=populate_step:{},growth_step:{}",
            self.populate_step, self.growth_step
        ));
        if let Some(seed) = self.seed {
            lines.push(format!("OPTIONS=seed:{}", seed));
        }
        lines.push(format!("OPTIONS=origin:{}/{}", self.origin.x, self.origin.y));
        lines.push(format!("OPTIONS=player_spawn:{}", format_spawn(self.player_spawn)));
        lines.push(format!("OPTIONS=minotaur_spawn:{}", format_spawn(self.minotaur_spawn)));
        lines.join("\n") + "\n"
    }
}

fn split_numbers<T: core::str::FromStr>(value: &str) -> Option<Vec<T>> {
    value.split('/').map(|part| part.trim().parse().ok()).collect()
}

fn parse_spawn(value: &str) -> Option<SpawnPoint> {
    match split_numbers::<f32>(value)?[..] {
        [x, y, z] => Some(SpawnPoint::new(x, y, z)),
        _ => None,
    }
}

fn format_spawn(spawn: SpawnPoint) -> String {
    format!("{}/{}/{}", spawn.x, spawn.y, spawn.z)
}

/// Errors reading or validating options
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: unrecognised line '{0}'")]
    Parse(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),

    #[error("Invalid options: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = MazeOptions::default();
        assert_eq!(opts.width, 10);
        assert_eq!(opts.length, 10);
        assert_eq!(opts.growth_step, 10);
        assert_eq!(opts.origin, Coord::ORIGIN);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let config = r#"
# A comment
OPTIONS=width:20,length:15
OPTIONS=growth_step:25,populate_step:50
OPTIONS=seed:1234,origin:4/7
OPTIONS=minotaur_spawn:96/1/96
"#;

        let opts = MazeOptions::parse_config(config).unwrap();
        assert_eq!(opts.width, 20);
        assert_eq!(opts.length, 15);
        assert_eq!(opts.growth_step, 25);
        assert_eq!(opts.populate_step, 50);
        assert_eq!(opts.seed, Some(1234));
        assert_eq!(opts.origin, Coord::new(4, 7));
        assert_eq!(opts.minotaur_spawn, SpawnPoint::new(96.0, 1.0, 96.0));
    }

    #[test]
    fn test_step_sets_both_batches() {
        let opts = MazeOptions::parse_config("OPTIONS=step:3").unwrap();
        assert_eq!(opts.populate_step, 3);
        assert_eq!(opts.growth_step, 3);
    }

    #[test]
    fn test_unknown_option() {
        let result = MazeOptions::parse_config("OPTIONS=scale:5");
        assert_eq!(result, Err(OptionsError::UnknownOption("scale".to_string())));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=width:wide"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=origin:1/2/3"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=seed"),
            Err(OptionsError::MissingValue(..))
        ));
    }

    #[test]
    fn test_validation_rejects_degenerate_options() {
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=width:0"),
            Err(OptionsError::Invalid(_))
        ));
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=growth_step:0"),
            Err(OptionsError::Invalid(_))
        ));
        assert!(matches!(
            MazeOptions::parse_config("OPTIONS=width:3,length:3,origin:3/0"),
            Err(OptionsError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_string_roundtrip() {
        let opts = MazeOptions {
            width: 7,
            length: 5,
            seed: Some(99),
            origin: Coord::new(2, 4),
            ..Default::default()
        };
        let parsed = MazeOptions::parse_config(&opts.to_config_string()).unwrap();
        assert_eq!(parsed, opts);
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let opts: MazeOptions = serde_json::from_str(r#"{"width": 4, "seed": 8}"#).unwrap();
        assert_eq!(opts.width, 4);
        assert_eq!(opts.length, 10);
        assert_eq!(opts.seed, Some(8));
    }
}
