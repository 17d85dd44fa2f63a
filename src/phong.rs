//! Normalized Blinn-Phong distribution
use std::f64::consts;

use crate::{
    shadowing::NdfType,
    utils::{self, FloatExt},
    Degenerate, MicrofacetModel, MicrofacetSample, Roughness, Vec2d, Vec3d,
};

/// Maps a microfacet roughness onto a Blinn-Phong exponent, `2 / roughness^2 - 2`.
///
/// With this exponent the Phong lobe has the same width as a Beckmann lobe of the same roughness.
#[must_use]
pub fn convert_roughness_to_shininess(roughness: f64) -> f64 {
    2.0 / roughness.sq() - 2.0
}

/// Blinn-Phong normal distribution function, evaluated at the half vector of `v` and `l`.
#[must_use]
pub fn eval_phong_distribution(n: Vec3d, v: Vec3d, l: Vec3d, roughness: f64) -> f64 {
    let spec_power = convert_roughness_to_shininess(roughness);
    let h = (l + v).normalize();
    let n_dot_h = n.dot(h).max(0.0);
    let normalization = (spec_power + 2.0) / (2.0 * consts::PI);
    n_dot_h.powf(spec_power) * normalization
}

/// Importance samples the Phong distribution of normals with `cos(theta) = rnd.x^(1 / (s + 2))`
/// and reflects `omega_o` about the sampled normal.
///
/// # Errors
/// * [`Degenerate::UnsamplablePdf`] if the density of the normal is below `1e-20`
/// * [`Degenerate::BelowHorizon`] if the reflected direction points into the surface
pub fn sample_phong_distribution(
    omega_o: Vec3d,
    roughness: f64,
    rnd: Vec2d,
) -> Result<MicrofacetSample, Degenerate> {
    let spec_power = convert_roughness_to_shininess(roughness);
    let normalization = (spec_power + 2.0) / (2.0 * consts::PI);

    let cos_theta = rnd.x.powf(1.0 / (spec_power + 2.0));
    let pdf_m = normalization * cos_theta.powf(spec_power + 1.0);

    let (sin_phi, cos_phi) = (2.0 * consts::PI * rnd.y).sin_cos();
    utils::finish_reflection_sample(omega_o, cos_theta, cos_phi, sin_phi, pdf_m, |m| {
        m.z.max(0.0).powf(spec_power) * normalization
    })
}

/// Isotropic Phong lobe. Shadowing and masking use the Beckmann fit, whose lobe it mimics.
#[derive(Clone, Copy, Debug)]
pub struct Phong {
    pub roughness: f64,
}

impl Phong {
    /// Warns about a degenerate roughness like [`Roughness::isotropic`], the value is kept as is
    #[must_use]
    pub fn new(roughness: f64) -> Self {
        Self {
            roughness: Roughness::isotropic(roughness).alpha_x,
        }
    }

    #[must_use]
    pub fn shininess(&self) -> f64 {
        convert_roughness_to_shininess(self.roughness)
    }
}

impl MicrofacetModel for Phong {
    fn roughness(&self) -> Roughness {
        // checked once in `Phong::new`, not on every evaluation
        Roughness {
            alpha_x: self.roughness,
            alpha_y: self.roughness,
        }
    }

    fn ndf_type(&self) -> NdfType {
        NdfType::Beckmann
    }

    fn distribution(&self, m: Vec3d) -> f64 {
        if m.z <= 0.0 {
            return 0.0;
        }
        let spec_power = self.shininess();
        m.z.powf(spec_power) * (spec_power + 2.0) / (2.0 * consts::PI)
    }

    fn sample(&self, omega_o: Vec3d, rnd: Vec2d) -> Result<MicrofacetSample, Degenerate> {
        sample_phong_distribution(omega_o, self.roughness, rnd)
    }
}
