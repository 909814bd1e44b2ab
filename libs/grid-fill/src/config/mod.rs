//! Pipeline-level options building on the shared `config` crate.
//!
//! `GridOptions` carries every knob a host can turn. Tolerances and limits are
//! validated through [`GlobalConfig`] so the geometry stages never see an
//! unchecked value.

use config::constants::{ConfigError, GlobalConfig, DEFAULT_PRESERVE_CORNERS};
use serde::Serialize;

use crate::error::{GridError, GridResult};

/// How lattice points are classified against the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SamplingStrategy {
    /// Ray cast every lattice point against every boundary edge.
    PerPoint,
    /// Sort edge crossings per lattice row and classify by parity.
    Scanline,
    /// Pick `Scanline` once `points * edges` exceeds
    /// [`config::constants::SCANLINE_WORK_THRESHOLD`].
    #[default]
    Auto,
}

/// Options for one grid fill invocation.
///
/// # Examples
/// ```
/// use grid_fill::config::{GridOptions, SamplingStrategy};
///
/// let opts = GridOptions::default()
///     .with_sampling(SamplingStrategy::Scanline)
///     .with_preserve_corners(true);
/// assert!(opts.preserve_corners);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridOptions {
    /// Absolute tolerance for degenerate-length checks.
    pub tolerance: f64,
    /// Quantum-to-spacing ratio for coordinate keys.
    pub quantization_ratio: f64,
    /// Cell rings searched for fan spokes.
    pub fan_search_radius: u32,
    /// Keep original outline corners that are off every lattice line.
    /// Off by default, so the outline runs through lattice crossings.
    pub preserve_corners: bool,
    /// Interior classification strategy.
    pub sampling: SamplingStrategy,
    /// Classify lattice rows on the rayon pool.
    pub parallel: bool,
    /// Upper bound on lattice points in the bounding box.
    pub max_lattice_points: usize,
}

impl GridOptions {
    /// Builds options from an already validated global configuration.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// use grid_fill::config::GridOptions;
    ///
    /// let global = GlobalConfig::new(1.0e-7, 1.0e-5).unwrap();
    /// let opts = GridOptions::from_global(global);
    /// assert_eq!(opts.quantization_ratio, 1.0e-5);
    /// assert!(!opts.preserve_corners);
    /// ```
    pub fn from_global(global: GlobalConfig) -> Self {
        Self {
            tolerance: global.tolerance,
            quantization_ratio: global.quantization_ratio,
            fan_search_radius: global.fan_search_radius,
            preserve_corners: DEFAULT_PRESERVE_CORNERS,
            sampling: SamplingStrategy::Auto,
            parallel: true,
            max_lattice_points: global.max_lattice_points,
        }
    }

    /// Re-runs the global validation over the numeric fields.
    pub fn validate(&self) -> GridResult<()> {
        self.to_global().map(|_| ()).map_err(config_error)
    }

    fn to_global(self) -> Result<GlobalConfig, ConfigError> {
        GlobalConfig::new(self.tolerance, self.quantization_ratio)?
            .with_fan_search_radius(self.fan_search_radius)?
            .with_max_lattice_points(self.max_lattice_points)
    }

    /// Returns a copy with a different tolerance.
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Returns a copy with a different quantization ratio.
    pub fn with_quantization_ratio(self, quantization_ratio: f64) -> Self {
        Self {
            quantization_ratio,
            ..self
        }
    }

    /// Returns a copy with a different fan search radius.
    pub fn with_fan_search_radius(self, fan_search_radius: u32) -> Self {
        Self {
            fan_search_radius,
            ..self
        }
    }

    /// Returns a copy that keeps or drops off-lattice corners.
    pub fn with_preserve_corners(self, preserve_corners: bool) -> Self {
        Self {
            preserve_corners,
            ..self
        }
    }

    /// Returns a copy with a different sampling strategy.
    pub fn with_sampling(self, sampling: SamplingStrategy) -> Self {
        Self { sampling, ..self }
    }

    /// Returns a copy with parallel sampling switched on or off.
    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    /// Returns a copy with a different lattice point limit.
    pub fn with_max_lattice_points(self, max_lattice_points: usize) -> Self {
        Self {
            max_lattice_points,
            ..self
        }
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::from_global(GlobalConfig::default())
    }
}

fn config_error(err: ConfigError) -> GridError {
    GridError::InvalidConfig(err.to_string())
}
