//! Randomized augmentation parameter sampling.

use crate::common::*;

/// Source pixels covered by one unit of annotated person scale.
pub const PIXELS_PER_SCALE_UNIT: f64 = 200.0;

/// Per-sample augmentation parameters.
///
/// The image crop and the label remap must both observe the same values;
/// feeding them different ones silently desynchronizes pixels from labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentParams {
    pub scale: f64,
    /// Rotation in degrees.
    pub angle: f64,
}

impl AugmentParams {
    /// Side of the crop window in source pixels.
    pub fn image_xy_resolution(&self) -> f64 {
        PIXELS_PER_SCALE_UNIT * self.scale
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AugmentSamplerInit {
    /// Exponent spread of the log-scale jitter.
    pub scale_spread: R64,
    /// Fixed enlargement applied after the jitter.
    pub scale_margin: R64,
    /// Maximum rotation magnitude in degrees.
    pub rotate_degrees: R64,
    /// Probability that a sample is rotated at all.
    pub rotate_prob: R64,
}

impl AugmentSamplerInit {
    pub fn build(self) -> Result<AugmentSampler> {
        let Self {
            scale_spread,
            scale_margin,
            rotate_degrees,
            rotate_prob,
        } = self;

        ensure!(scale_spread >= 0.0, "scale_spread must be non-negative");
        ensure!(scale_margin > 0.0, "scale_margin must be positive");
        ensure!(rotate_degrees >= 0.0, "rotate_degrees must be non-negative");
        ensure!(
            (0.0..=1.0).contains(&rotate_prob.raw()),
            "rotate_prob must lie in [0, 1]"
        );

        Ok(AugmentSampler {
            scale_spread: scale_spread.raw(),
            scale_margin: scale_margin.raw(),
            rotate_degrees: rotate_degrees.raw(),
            rotate_prob: rotate_prob.raw(),
        })
    }
}

impl Default for AugmentSamplerInit {
    fn default() -> Self {
        Self {
            scale_spread: r64(0.25),
            scale_margin: r64(1.25),
            rotate_degrees: r64(30.0),
            rotate_prob: r64(0.4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AugmentSampler {
    scale_spread: f64,
    scale_margin: f64,
    rotate_degrees: f64,
    rotate_prob: f64,
}

impl AugmentSampler {
    /// Draw per-sample parameters around the annotated base `scale`.
    ///
    /// This is the only place randomness enters the pipeline; the rest of
    /// the sample assembly is deterministic given the returned values.
    pub fn sample<R>(&self, scale: f64, rng: &mut R) -> AugmentParams
    where
        R: Rng + ?Sized,
    {
        let jitter = rng.gen_range(-self.scale_spread..=self.scale_spread);
        let scale = scale * 2f64.powf(jitter) * self.scale_margin;

        let angle = if rng.gen::<f64>() <= self.rotate_prob {
            rng.gen_range(-self.rotate_degrees..=self.rotate_degrees)
        } else {
            0.0
        };

        AugmentParams { scale, angle }
    }
}
