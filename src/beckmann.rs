//! An implementation of the Beckmann Distribution

use std::f64::consts;

use crate::{
    shadowing::NdfType,
    utils::{self, FloatExt},
    Degenerate, MicrofacetModel, MicrofacetSample, Roughness, Vec2d, Vec3d,
};

/// Isotropic Beckmann normal distribution function.
///
/// The exponent is clamped to be non-negative. `n.h == 0` divides by zero, callers must not
/// evaluate exactly grazing microfacets.
#[must_use]
pub fn eval_beckmann_distribution(n: Vec3d, h: Vec3d, roughness: f64) -> f64 {
    let a2 = roughness.sq();
    let n_dot_h_sq = n.dot(h).sq();
    let exponent = ((1.0 - n_dot_h_sq) / (a2 * n_dot_h_sq)).max(0.0);
    (-exponent).exp() / (consts::PI * a2 * n_dot_h_sq.sq())
}

/// Anisotropic Beckmann normal distribution function, `h` in the local shading frame.
#[must_use]
pub fn eval_beckmann_distribution_aniso(h: Vec3d, roughness: Vec2d) -> f64 {
    let n_dot_h_sq = h.z.sq();
    let h_proj = Vec2d::new(h.x, h.y);
    let exponent = (h_proj / (roughness * roughness)).dot(h_proj) / n_dot_h_sq;
    (-exponent.max(0.0)).exp() / (consts::PI * roughness.x * roughness.y * n_dot_h_sq.sq())
}

/// Standard deviation of the Beckmann distribution as a cone apex angle in the parallel plane
/// domain
#[must_use]
pub fn beckmann_std_dev_angle(roughness: f64) -> f64 {
    (consts::FRAC_1_SQRT_2 * roughness).atan()
}

/// An approximation of the off specular peak, blending the normal `n` into the mirror
/// direction `r` as the surface gets rougher.
///
/// The result is not normalized, it is meant for cube map lookups.
#[must_use]
pub fn beckmann_dominant_dir(n: Vec3d, r: Vec3d, roughness: f64) -> Vec3d {
    let smoothness = (1.0 - roughness).clamp(0.0, 1.0);
    let lerp_factor = smoothness * (smoothness.sqrt() + roughness);
    n.lerp(r, lerp_factor)
}

/// Importance samples the Beckmann distribution of normals and reflects `omega_o` about the
/// sampled normal.
///
/// The polar angle is drawn with `tan^2(theta) = -alpha^2 ln(1 - rnd.x)`, the azimuth from
/// `rnd.y`. See [`MicrofacetSample`] for the returned quantities.
///
/// # Errors
/// * [`Degenerate::UnsamplablePdf`] if the density of the normal is below `1e-20`
/// * [`Degenerate::BelowHorizon`] if the reflected direction points into the surface
pub fn sample_beckmann_distribution(
    omega_o: Vec3d,
    roughness: Roughness,
    rnd: Vec2d,
) -> Result<MicrofacetSample, Degenerate> {
    let (cos_phi, sin_phi, inv_alpha_sq) = utils::sample_azimuth(roughness, rnd.y);

    let tan_theta_sq = -(1.0 - rnd.x).ln() / inv_alpha_sq;
    let cos_theta = 1.0 / (1.0 + tan_theta_sq).sqrt();

    let pdf_m = (1.0 - rnd.x)
        / (consts::PI * roughness.alpha_x * roughness.alpha_y * cos_theta * cos_theta.sq());

    utils::finish_reflection_sample(omega_o, cos_theta, cos_phi, sin_phi, pdf_m, |m| {
        eval_beckmann_distribution_aniso(m, roughness.as_vec2())
    })
}

/// Gaussian distribution of microfacet slopes
#[derive(Clone, Copy, Debug)]
pub struct Beckmann {
    pub roughness: Roughness,
}

impl Beckmann {
    #[must_use]
    pub const fn new(roughness: Roughness) -> Self {
        Self { roughness }
    }
}

impl MicrofacetModel for Beckmann {
    fn roughness(&self) -> Roughness {
        self.roughness
    }

    fn ndf_type(&self) -> NdfType {
        NdfType::Beckmann
    }

    fn distribution(&self, m: Vec3d) -> f64 {
        if m.z <= 0.0 {
            return 0.0;
        }
        eval_beckmann_distribution_aniso(m, self.roughness.as_vec2())
    }

    fn sample(&self, omega_o: Vec3d, rnd: Vec2d) -> Result<MicrofacetSample, Degenerate> {
        sample_beckmann_distribution(omega_o, self.roughness, rnd)
    }
}
