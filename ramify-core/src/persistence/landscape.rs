//! Persistence landscapes: fixed-size functional summaries of a diagram.

use std::f64::consts::SQRT_2;
use std::num::NonZeroUsize;

use tracing::{debug, instrument, warn};

use crate::error::{AnalysisError, Result};

/// Shape of a [`Landscape`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LandscapeConfig {
    num_landscapes: NonZeroUsize,
    resolution: NonZeroUsize,
}

impl LandscapeConfig {
    /// Creates a configuration from non-zero sizes.
    #[must_use]
    pub const fn new(num_landscapes: NonZeroUsize, resolution: NonZeroUsize) -> Self {
        Self {
            num_landscapes,
            resolution,
        }
    }

    /// Creates a configuration, rejecting zero sizes.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidLandscapeParameter`] naming the first
    /// zero parameter.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::{AnalysisErrorCode, LandscapeConfig};
    ///
    /// let config = LandscapeConfig::try_new(5, 100)?;
    /// assert_eq!(config.resolution().get(), 100);
    ///
    /// let err = LandscapeConfig::try_new(0, 100).unwrap_err();
    /// assert_eq!(err.code(), AnalysisErrorCode::InvalidLandscapeParameter);
    /// # Ok::<(), ramify_core::AnalysisError>(())
    /// ```
    pub fn try_new(num_landscapes: usize, resolution: usize) -> Result<Self> {
        let non_zero = |parameter: &'static str, got: usize| {
            NonZeroUsize::new(got).ok_or_else(|| {
                warn!(parameter, got, "rejecting landscape parameter");
                AnalysisError::InvalidLandscapeParameter { parameter, got }
            })
        };
        Ok(Self::new(
            non_zero("num_landscapes", num_landscapes)?,
            non_zero("resolution", resolution)?,
        ))
    }

    /// Number of landscape layers.
    #[must_use]
    #[rustfmt::skip]
    pub const fn num_landscapes(&self) -> NonZeroUsize { self.num_landscapes }

    /// Samples per layer.
    #[must_use]
    #[rustfmt::skip]
    pub const fn resolution(&self) -> NonZeroUsize { self.resolution }
}

/// `num_landscapes` piecewise-linear functions sampled at `resolution`
/// points, stored layer after layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Landscape {
    values: Vec<f64>,
    num_landscapes: usize,
    resolution: usize,
}

impl Landscape {
    /// Samples the landscape of `(birth, death)` pairs over
    /// `[min birth, max death]`.
    ///
    /// Each pair contributes a tent rising from its birth to its midpoint and
    /// falling to its death. At every sample the k-th largest tent value goes
    /// to layer k; missing values stay zero. All values are scaled by √2.
    /// Empty diagrams and zero-width ranges yield an all-zero landscape.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::{Landscape, LandscapeConfig};
    ///
    /// let config = LandscapeConfig::try_new(2, 4)?;
    /// let landscape = Landscape::from_diagram(&[(0.0, 4.0)], config);
    /// assert_eq!(landscape.values().len(), 8);
    /// assert!(landscape.layer(1).is_some_and(|layer| layer.iter().all(|&v| v == 0.0)));
    /// # Ok::<(), ramify_core::AnalysisError>(())
    /// ```
    #[instrument(
        name = "persistence.landscape",
        skip(pairs, config),
        fields(
            points = pairs.len(),
            num_landscapes = config.num_landscapes().get(),
            resolution = config.resolution().get()
        )
    )]
    #[must_use]
    pub fn from_diagram(pairs: &[(f64, f64)], config: LandscapeConfig) -> Self {
        let num_landscapes = config.num_landscapes().get();
        let resolution = config.resolution().get();
        let mut values = vec![0.0; num_landscapes * resolution];

        let start = pairs.iter().map(|&(birth, _)| birth).fold(f64::INFINITY, f64::min);
        let end = pairs
            .iter()
            .map(|&(_, death)| death)
            .fold(f64::NEG_INFINITY, f64::max);
        let step = (end - start) / resolution as f64;
        if !step.is_finite() || step <= 0.0 {
            debug!(start, end, "degenerate diagram range, landscape is zero");
            return Self {
                values,
                num_landscapes,
                resolution,
            };
        }

        let sample_index = |value: f64| -> usize {
            ((value - start) / step).ceil().clamp(0.0, resolution as f64) as usize
        };
        let mut events: Vec<Vec<f64>> = vec![Vec::new(); resolution];
        for &(birth, death) in pairs {
            let rise = sample_index(birth);
            let peak = sample_index(0.5 * (birth + death));
            let fall = sample_index(death);
            if rise >= resolution || fall == 0 {
                continue;
            }
            let mut height = start + rise as f64 * step - birth;
            for slot in events.iter_mut().take(peak).skip(rise) {
                slot.push(height.max(0.0));
                height += step;
            }
            let mut height = death - start - peak as f64 * step;
            for slot in events.iter_mut().take(fall).skip(peak) {
                slot.push(height.max(0.0));
                height -= step;
            }
        }

        for (sample, heights) in events.iter_mut().enumerate() {
            heights.sort_unstable_by(|a, b| b.total_cmp(a));
            for (layer, &height) in heights.iter().take(num_landscapes).enumerate() {
                values[layer * resolution + sample] = height * SQRT_2;
            }
        }

        Self {
            values,
            num_landscapes,
            resolution,
        }
    }

    /// All samples, layer-major: `values()[k * resolution + j]` is sample `j`
    /// of layer `k`.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &[f64] { &self.values }

    /// Samples of layer `k` (0-based), or `None` past the last layer.
    #[must_use]
    pub fn layer(&self, k: usize) -> Option<&[f64]> {
        (k < self.num_landscapes).then(|| &self.values[k * self.resolution..(k + 1) * self.resolution])
    }

    /// Consumes the landscape, returning the flattened samples.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Number of layers.
    #[must_use]
    #[rustfmt::skip]
    pub fn num_landscapes(&self) -> usize { self.num_landscapes }

    /// Samples per layer.
    #[must_use]
    #[rustfmt::skip]
    pub fn resolution(&self) -> usize { self.resolution }

    /// `p`-norm of the flattened samples; `p = f64::INFINITY` gives the
    /// largest sample.
    #[must_use]
    pub fn lp_norm(&self, p: f64) -> f64 {
        if p.is_infinite() {
            return self.values.iter().fold(0.0, |max, value| value.abs().max(max));
        }
        self.values
            .iter()
            .map(|value| value.abs().powf(p))
            .sum::<f64>()
            .powf(p.recip())
    }
}
