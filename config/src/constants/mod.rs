//! Centralized configuration values shared across the grid fill pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Numerical tolerance used by geometry predicates.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-9;

/// Ratio between the coordinate quantum and the grid spacing.
///
/// Coordinates are rounded to the nearest `spacing * QUANTIZATION_RATIO`
/// before they are used as deduplication keys.
///
/// # Examples
/// ```
/// use config::constants::QUANTIZATION_RATIO;
/// let spacing = 0.5;
/// let quantum = spacing * QUANTIZATION_RATIO;
/// assert!(quantum < spacing);
/// ```
pub const QUANTIZATION_RATIO: f64 = 1.0e-6;

// =============================================================================
// GRID DEFAULTS
// =============================================================================

/// Default lattice spacing in world units.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_SPACING;
/// let user_spacing: Option<f64> = None;
/// assert_eq!(user_spacing.unwrap_or(DEFAULT_SPACING), 0.001);
/// ```
pub const DEFAULT_SPACING: f64 = 0.001;

/// Rings of lattice cells searched around a boundary vertex when looking for
/// the interior vertex its fan spoke attaches to.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_FAN_SEARCH_RADIUS;
/// // One ring around the containing cell is a 4x4 block of lattice points.
/// let side = 2 * DEFAULT_FAN_SEARCH_RADIUS + 2;
/// assert_eq!(side, 4);
/// ```
pub const DEFAULT_FAN_SEARCH_RADIUS: u32 = 1;

/// Whether outline corners off every lattice line are kept by default.
///
/// Off by default: the snapped outline then runs through lattice crossings
/// only, and corners come back when fewer than three crossings exist.
pub const DEFAULT_PRESERVE_CORNERS: bool = false;

/// Amount of work (`lattice points * boundary edges`) above which interior
/// sampling switches from per-point ray casting to row scanlines.
///
/// # Examples
/// ```
/// use config::constants::SCANLINE_WORK_THRESHOLD;
/// let work = 100 * 40;
/// assert!(work < SCANLINE_WORK_THRESHOLD);
/// ```
pub const SCANLINE_WORK_THRESHOLD: usize = 1 << 16;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of lattice points sampled in one invocation.
///
/// Small spacings over large outlines produce enormous vertex counts; the
/// pipeline refuses to start above this limit.
///
/// # Examples
/// ```
/// use config::constants::MAX_LATTICE_POINTS;
/// let points = 1000 * 1000;
/// assert!(points < MAX_LATTICE_POINTS);
/// ```
pub const MAX_LATTICE_POINTS: usize = 25_000_000;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance propagated into geometry predicates.
    pub tolerance: f64,
    /// Quantum-to-spacing ratio used for coordinate keys.
    pub quantization_ratio: f64,
    /// Cell rings searched for fan spokes.
    pub fan_search_radius: u32,
    /// Upper bound on sampled lattice points.
    pub max_lattice_points: usize,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and quantization ratio.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 1.0e-5).expect("valid config");
    /// assert_eq!(cfg.quantization_ratio, 1.0e-5);
    /// ```
    pub fn new(tolerance: f64, quantization_ratio: f64) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !(quantization_ratio > 0.0) || quantization_ratio >= 1.0 {
            return Err(ConfigError::InvalidQuantization(quantization_ratio));
        }
        Ok(Self {
            tolerance,
            quantization_ratio,
            ..Self::default()
        })
    }

    /// Returns a copy with a different fan search radius.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::default().with_fan_search_radius(3).unwrap();
    /// assert_eq!(cfg.fan_search_radius, 3);
    /// assert!(GlobalConfig::default().with_fan_search_radius(0).is_err());
    /// ```
    pub fn with_fan_search_radius(self, radius: u32) -> Result<Self, ConfigError> {
        if radius == 0 {
            return Err(ConfigError::InvalidSearchRadius(radius));
        }
        Ok(Self {
            fan_search_radius: radius,
            ..self
        })
    }

    /// Returns a copy with a different lattice point limit.
    pub fn with_max_lattice_points(self, limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidLatticeLimit(limit));
        }
        Ok(Self {
            max_lattice_points: limit,
            ..self
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            quantization_ratio: QUANTIZATION_RATIO,
            fan_search_radius: DEFAULT_FAN_SEARCH_RADIUS,
            max_lattice_points: MAX_LATTICE_POINTS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the quantization ratio is outside `(0, 1)`.
    InvalidQuantization(f64),
    /// Raised when the fan search radius is zero.
    InvalidSearchRadius(u32),
    /// Raised when the lattice point limit is zero.
    InvalidLatticeLimit(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidQuantization(value) => {
                write!(f, "quantization_ratio must be in (0, 1): {value}")
            }
            ConfigError::InvalidSearchRadius(value) => {
                write!(f, "fan_search_radius must be >= 1: {value}")
            }
            ConfigError::InvalidLatticeLimit(value) => {
                write!(f, "max_lattice_points must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
