use std::fmt;

use crate::shadowing::{self, NdfType};
use crate::utils::FloatExt;

/// used for direction vectors
pub type Vec3d = glam::f64::DVec3;
/// used for direction vectors and random samples
pub type Vec2d = glam::f64::DVec2;

/// Roughness of a microfacet surface along the two tangent axes of the shading frame.
///
/// The values are the `alpha` parameters of the distributions, not perceptual roughness.
/// A value of `0.0` describes a perfectly smooth surface. The distributions are singular in that
/// case and callers should switch to a specular code path before reaching this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roughness {
    /// roughness in direction x
    ///
    /// The alpha values are not perceived linearly. Squaring a perceptual roughness,
    /// `alpha_x = perceived_roughness_x^2`, gives a roughly linear response,
    /// see [`Roughness::from_remapped`].
    pub alpha_x: f64,

    /// roughness in direction y
    pub alpha_y: f64,
}

impl Roughness {
    #[must_use]
    pub fn isotropic(alpha: f64) -> Self {
        Self::anisotropic(alpha, alpha)
    }

    #[must_use]
    pub fn anisotropic(alpha_x: f64, alpha_y: f64) -> Self {
        // NaN fails both comparisons
        if !(alpha_x > 0.0 && alpha_y > 0.0) {
            log::warn!(
                "degenerate microfacet roughness ({alpha_x}, {alpha_y}), the distributions are singular"
            );
        }
        Self { alpha_x, alpha_y }
    }

    /// Builds the roughness from artist facing parameters. Both are expected in `[0, 1]`.
    #[must_use]
    pub fn from_remapped(roughness: f64, anisotropic: f64) -> Self {
        let min_alpha: f64 = 0.001;
        let max_aniso: f64 = 0.9;
        let alpha = roughness.sq().max(min_alpha);

        let aspect = 1.0_f64
            .lerp(1.0 - max_aniso, anisotropic.clamp(0.0, 1.0))
            .sqrt();
        Self::anisotropic(alpha / aspect, alpha * aspect)
    }

    #[must_use]
    pub fn as_vec2(self) -> Vec2d {
        Vec2d::new(self.alpha_x, self.alpha_y)
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_isotropic(self) -> bool {
        self.alpha_x == self.alpha_y
    }
}

impl From<Vec2d> for Roughness {
    fn from(value: Vec2d) -> Self {
        Self::anisotropic(value.x, value.y)
    }
}

/// A numeric case in which a routine has no meaningful value to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Degenerate {
    /// The refraction radicand is not positive. All light is reflected.
    TotalInternalReflection,
    /// The sampled or requested direction lies on or below the surface.
    BelowHorizon,
    /// The sampled direction has a probability density below `1e-20`.
    UnsamplablePdf,
}

impl Degenerate {
    /// The contribution of a failed sample. Accumulating loops may add this instead of
    /// skipping the sample; the estimator stays unbiased either way.
    #[must_use]
    pub const fn weight(self) -> f64 {
        0.0
    }
}

impl fmt::Display for Degenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalInternalReflection => write!(f, "total internal reflection"),
            Self::BelowHorizon => write!(f, "direction below the horizon"),
            Self::UnsamplablePdf => write!(f, "probability density too small to sample"),
        }
    }
}

impl std::error::Error for Degenerate {}

/// Contains the data that is returned by the microfacet sampling routines
#[derive(Clone, Copy, Debug)]
pub struct MicrofacetSample {
    /// The sampled microfacet normal
    pub m: Vec3d,

    /// # Incident Direction
    /// `omega_o` mirrored about `m`
    pub omega_i: Vec3d,

    /// The probability density of `omega_i` with respect to solid angle around `omega_i`.
    /// The Cook-Torrance Jacobian `1 / (4 omega_i.m)` is already applied.
    pub pdf: f64,

    /// `D(m) (omega_o.m) / (pdf_m omega_o.z)`, where `pdf_m` is the density of `m`.
    /// Multiply by the shadowing-masking and Fresnel terms to get the full reflection weight.
    pub weight: f64,
}

/// A microfacet normal distribution together with its shadowing-masking function and an
/// importance sampling routine. All directions are in the local shading frame with `z` as the
/// macro-surface normal.
pub trait MicrofacetModel {
    fn roughness(&self) -> Roughness;

    /// Which Smith fit is used for shadowing and masking
    fn ndf_type(&self) -> NdfType;

    /// Distribution of normals / Normal Distribution Function
    /// This is the $D$ term in typical Cook-Torance model
    fn distribution(&self, m: Vec3d) -> f64;

    /// This is the `G_1` term in typical Cook-Torance model
    fn shadow_mask(&self, omega: Vec3d, m: Vec3d) -> f64 {
        shadowing::g_smith(omega, m, self.roughness().as_vec2(), self.ndf_type())
    }

    /// Masking-Shadowing function
    /// This is the $G$ term in typical Cook-Torance model. Uses the uncorrelated, separable form.
    fn geometric(&self, omega_i: Vec3d, omega_o: Vec3d, m: Vec3d) -> f64 {
        self.shadow_mask(omega_i, m) * self.shadow_mask(omega_o, m)
    }

    /// Density with which [`MicrofacetModel::sample`] produces the reflection of `omega_o` about
    /// `m`, measured around the incident direction.
    fn pdf(&self, omega_o: Vec3d, m: Vec3d) -> f64 {
        let cos_om = omega_o.dot(m).abs();
        if m.z <= 0.0 || cos_om <= 0.0 {
            return 0.0;
        }
        self.distribution(m) * m.z / (4.0 * cos_om)
    }

    /// Importance samples the distribution of normals and mirrors `omega_o` about the result.
    ///
    /// # Arguments
    /// * `omega_o` - The direction towards the viewer, in the upper hemisphere
    /// * `rnd` - Two independent uniform numbers in `[0, 1)`
    ///
    /// # Errors
    /// [`Degenerate::UnsamplablePdf`] or [`Degenerate::BelowHorizon`] if the sample carries no
    /// contribution.
    fn sample(&self, omega_o: Vec3d, rnd: Vec2d) -> Result<MicrofacetSample, Degenerate>;
}
