//! An implementation of the GGX Distribution

use std::f64::consts;

use crate::{
    shadowing::NdfType,
    utils::{self, FloatExt},
    Degenerate, MicrofacetModel, MicrofacetSample, Roughness, Vec2d, Vec3d,
};

/// Isotropic GGX (Trowbridge-Reitz) normal distribution function.
///
/// `n.h` is clamped to `[0, 1]`. As `roughness` approaches zero the distribution approaches a
/// dirac delta around `n`.
#[must_use]
pub fn eval_ggx_distribution(n: Vec3d, h: Vec3d, roughness: f64) -> f64 {
    let a2 = roughness.sq();
    let n_dot_h = n.dot(h).clamp(0.0, 1.0);
    #[allow(clippy::suboptimal_flops)]
    let denom = (n_dot_h * a2 - n_dot_h) * n_dot_h + 1.0;
    a2 / (consts::PI * denom.sq())
}

/// Anisotropic GGX normal distribution function, `h` in the local shading frame.
///
/// The roughness components only appear as ratios `min(1, other / this)`, which keeps the
/// evaluation finite when one of them approaches zero.
#[must_use]
pub fn eval_ggx_distribution_aniso(h: Vec3d, roughness: Vec2d) -> f64 {
    let aniso_u = if roughness.y < roughness.x {
        roughness.y / roughness.x
    } else {
        1.0
    };
    let aniso_v = if roughness.x < roughness.y {
        roughness.x / roughness.y
    } else {
        1.0
    };
    let r_sq = roughness.x.min(roughness.y).sq();
    #[allow(clippy::suboptimal_flops)]
    let root = h.z.sq() * r_sq + (h.x * aniso_u).sq() + (h.y * aniso_v).sq();
    r_sq * aniso_u * aniso_v / (consts::PI * root.sq())
}

/// Importance samples the GGX distribution of normals and reflects `omega_o` about the sampled
/// normal.
///
/// The polar angle is drawn with `tan^2(theta) = alpha^2 rnd.x / (1 - rnd.x)`, the azimuth from
/// `rnd.y`. See [`MicrofacetSample`] for the returned quantities.
///
/// # Errors
/// * [`Degenerate::UnsamplablePdf`] if the density of the normal is below `1e-20`
/// * [`Degenerate::BelowHorizon`] if the reflected direction points into the surface
pub fn sample_ggx_distribution(
    omega_o: Vec3d,
    roughness: Roughness,
    rnd: Vec2d,
) -> Result<MicrofacetSample, Degenerate> {
    let (cos_phi, sin_phi, inv_alpha_sq) = utils::sample_azimuth(roughness, rnd.y);

    let tan_theta_sq = rnd.x / ((1.0 - rnd.x) * inv_alpha_sq);
    let cos_theta = 1.0 / (1.0 + tan_theta_sq).sqrt();

    #[allow(clippy::suboptimal_flops)]
    let temp = 1.0 + tan_theta_sq * inv_alpha_sq;
    let pdf_m = consts::FRAC_1_PI
        / (roughness.alpha_x * roughness.alpha_y * cos_theta * cos_theta.sq() * temp.sq());

    utils::finish_reflection_sample(omega_o, cos_theta, cos_phi, sin_phi, pdf_m, |m| {
        eval_ggx_distribution_aniso(m, roughness.as_vec2())
    })
}

/// This is a common microsurface model to describe anisotropic rough surfaces.
///
/// # Mathematical background
/// * [Understanding the Masking-Shadowing Function in Microfacet-Based BRDFs](https://jcgt.org/published/0003/02/03/)
/// * Walter et al., Microfacet Models for Refraction through Rough Surfaces, EGSR 2007
#[derive(Clone, Copy, Debug)]
pub struct Ggx {
    pub roughness: Roughness,
}

impl Ggx {
    #[must_use]
    pub const fn new(roughness: Roughness) -> Self {
        Self { roughness }
    }

    #[must_use]
    pub fn from_remapped(roughness: f64, anisotropic: f64) -> Self {
        Self::new(Roughness::from_remapped(roughness, anisotropic))
    }
}

impl MicrofacetModel for Ggx {
    fn roughness(&self) -> Roughness {
        self.roughness
    }

    fn ndf_type(&self) -> NdfType {
        NdfType::Ggx
    }

    fn distribution(&self, m: Vec3d) -> f64 {
        if m.z <= 1e-10 {
            return 0.0;
        }
        eval_ggx_distribution_aniso(m, self.roughness.as_vec2())
    }

    fn sample(&self, omega_o: Vec3d, rnd: Vec2d) -> Result<MicrofacetSample, Degenerate> {
        sample_ggx_distribution(omega_o, self.roughness, rnd)
    }
}
