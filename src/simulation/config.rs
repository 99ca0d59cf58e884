//! Trail configuration.
//!
//! `TrailSettings` is the raw, deserialisable form that arrives from the
//! command line or a TOML file. `TrailConfig` is the validated form the
//! agent consumes; every range check happens in the conversion between
//! the two, before a simulation can start.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::grid::Neighborhood;
use crate::simulation::params::{
    DEFAULT_GRID_SIZE, DEFAULT_SPARSITY, DEFAULT_TORTUOSITY, DEFAULT_TRAIL_NAME, MAX_GRID_SIZE,
};

/// Errors raised while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be positive, got {0}")]
    GridSize(i64),
    #[error("grid size {size} exceeds the maximum of {max}")]
    GridTooLarge { size: i64, max: u32 },
    #[error("tortuosity must be within [0, 1], got {0}")]
    Tortuosity(f64),
    #[error("sparsity must be within [0, 1], got {0}")]
    Sparsity(f64),
    #[error("max length must be non-negative, got {0}")]
    MaxLength(i64),
    #[error("trail name {0:?} must be a plain file name")]
    Name(String),
    #[error("start cell ({x}, {y}) lies outside a {grid_size}x{grid_size} grid")]
    StartOutOfBounds { x: i32, y: i32, grid_size: u32 },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How long a trail may grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailLength {
    /// Run until the agent is trapped.
    #[default]
    Unbounded,
    /// Stop after this many committed steps.
    Steps(NonZeroU32),
}

impl TrailLength {
    /// Interprets the settings convention where `0` means unbounded.
    ///
    /// # Errors
    /// Returns [`ConfigError::MaxLength`] for negative values or values
    /// that do not fit a `u32`.
    pub fn from_raw(raw: i64) -> Result<Self, ConfigError> {
        if raw < 0 {
            return Err(ConfigError::MaxLength(raw));
        }
        let steps = u32::try_from(raw).map_err(|_| ConfigError::MaxLength(raw))?;
        Ok(NonZeroU32::new(steps).map_or(Self::Unbounded, Self::Steps))
    }

    /// The step budget, if any.
    #[must_use]
    pub const fn limit(self) -> Option<u32> {
        match self {
            Self::Unbounded => None,
            Self::Steps(n) => Some(n.get()),
        }
    }
}

/// Raw settings as entered by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailSettings {
    /// Trail name, used for the output file.
    pub name: String,
    pub grid_size: i64,
    pub tortuosity: f64,
    pub sparsity: f64,
    /// `0` = run until trapped.
    pub max_length: i64,
    pub neighborhood: Neighborhood,
    /// Seed for the random source; drawn fresh when absent.
    pub seed: Option<u64>,
    /// Start near the centre with a random heading instead of centre/Right.
    pub jitter_start: bool,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            grid_size: i64::from(DEFAULT_GRID_SIZE),
            tortuosity: DEFAULT_TORTUOSITY,
            sparsity: DEFAULT_SPARSITY,
            max_length: 0,
            neighborhood: Neighborhood::default(),
            seed: None,
            jitter_start: false,
        }
    }
}

impl TrailSettings {
    /// Parses settings from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Whether `name` can be used as an output file stem without leaving the
/// output directory: a single path component, not `.` or `..`.
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Validated configuration consumed by the agent.
///
/// Fields are private so every value has passed through [`TrailConfig::new`]
/// or `TryFrom<&TrailSettings>`.
///
/// ```compile_fail
/// use trail_rust::simulation::{TrailConfig, TrailLength};
/// use trail_rust::simulation::Neighborhood;
///
/// let config = TrailConfig {
///     name: String::new(),
///     grid_size: 0,
///     tortuosity: 7.5,
///     sparsity: -3.0,
///     max_length: TrailLength::Unbounded,
///     neighborhood: Neighborhood::Moore,
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TrailConfig {
    name: String,
    grid_size: u32,
    tortuosity: f64,
    sparsity: f64,
    max_length: TrailLength,
    neighborhood: Neighborhood,
}

impl TrailConfig {
    /// Builds a configuration with the default name and neighbourhood.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the grid is empty or too large, or a
    /// probability lies outside `[0, 1]` (NaN included).
    pub fn new(
        grid_size: u32,
        tortuosity: f64,
        sparsity: f64,
        max_length: TrailLength,
    ) -> Result<Self, ConfigError> {
        if grid_size == 0 {
            return Err(ConfigError::GridSize(0));
        }
        if grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                size: i64::from(grid_size),
                max: MAX_GRID_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&tortuosity) {
            return Err(ConfigError::Tortuosity(tortuosity));
        }
        if !(0.0..=1.0).contains(&sparsity) {
            return Err(ConfigError::Sparsity(sparsity));
        }
        Ok(Self {
            name: DEFAULT_TRAIL_NAME.to_string(),
            grid_size,
            tortuosity,
            sparsity,
            max_length,
            neighborhood: Neighborhood::default(),
        })
    }

    /// Sets the trail name; blank names fall back to the default.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_TRAIL_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    #[must_use]
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Trail name, also the output file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn grid_size(&self) -> u32 {
        self.grid_size
    }

    #[must_use]
    pub const fn tortuosity(&self) -> f64 {
        self.tortuosity
    }

    #[must_use]
    pub const fn sparsity(&self) -> f64 {
        self.sparsity
    }

    #[must_use]
    pub const fn max_length(&self) -> TrailLength {
        self.max_length
    }

    #[must_use]
    pub const fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }
}

impl TryFrom<&TrailSettings> for TrailConfig {
    type Error = ConfigError;

    fn try_from(settings: &TrailSettings) -> Result<Self, Self::Error> {
        if settings.grid_size <= 0 {
            return Err(ConfigError::GridSize(settings.grid_size));
        }
        let grid_size = u32::try_from(settings.grid_size).map_err(|_| ConfigError::GridTooLarge {
            size: settings.grid_size,
            max: MAX_GRID_SIZE,
        })?;
        let max_length = TrailLength::from_raw(settings.max_length)?;
        let config = Self::new(grid_size, settings.tortuosity, settings.sparsity, max_length)?
            .with_name(&settings.name)
            .with_neighborhood(settings.neighborhood);
        if !is_plain_name(&config.name) {
            return Err(ConfigError::Name(config.name));
        }
        Ok(config)
    }
}
