use std::f64::consts;

use crate::{Degenerate, MicrofacetSample, Roughness, Vec2d, Vec3d};

/// Half-vector densities below this are treated as unsamplable
pub const MIN_SAMPLE_PDF: f64 = 1e-20;

pub trait FloatExt {
    fn sq(self) -> Self;
    fn lerp(self, other: Self, t: Self) -> Self;
}

impl FloatExt for f64 {
    fn sq(self) -> Self {
        self * self
    }
    fn lerp(self, other: Self, t: Self) -> Self {
        #[allow(clippy::suboptimal_flops)]
        {
            self * (1.0 - t) + other * t
        }
    }
}

/// Mirrors `vec` about `n`. Both point away from the surface.
#[must_use]
pub fn reflect(n: Vec3d, vec: Vec3d) -> Vec3d {
    n * (n.dot(vec) * 2.0) - vec
}

/// Expresses `v` in the frame spanned by tangent `t`, bitangent `b` and normal `n`
#[must_use]
pub fn to_local(t: Vec3d, b: Vec3d, n: Vec3d, v: Vec3d) -> Vec3d {
    Vec3d::new(t.dot(v), b.dot(v), n.dot(v))
}

#[must_use]
pub fn pow5(v: f64) -> f64 {
    let v2 = v * v;
    v2 * v2 * v
}

/// The half vector of a reflection, oriented into the upper hemisphere.
/// `None` if the two directions can not come from a reflection.
#[must_use]
pub fn positive_reflect_normal(omega_i: Vec3d, omega_o: Vec3d) -> Option<Vec3d> {
    if omega_i.z * omega_o.z <= 0.0 {
        // This can not come from a reflection
        None
    } else {
        ((omega_i + omega_o) * omega_o.z.signum()).try_normalize()
    }
}

/* pdf is cos(theta) / pi */
#[must_use]
pub fn hemispherical_sample_cos_weighted_uv(u: f64, v: f64) -> (Vec3d, f64) {
    let eps_theta_sample = u.clamp(1e-6, 1.0); // prevent division by zero (division by pdf)
    let cos_theta = eps_theta_sample.sqrt();
    let sin_theta = (1.0 - eps_theta_sample).sqrt();
    let phi = 2.0 * consts::PI * v;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let omega_i = Vec3d {
        x: sin_theta * cos_phi,
        y: sin_theta * sin_phi,
        z: cos_theta,
    };
    (omega_i, cos_theta / consts::PI)
}

/// Samples the azimuth of a microfacet normal for an anisotropic distribution.
///
/// Returns `(cos_phi, sin_phi, a)` where `a = cos^2(phi) / alpha_x^2 + sin^2(phi) / alpha_y^2`
/// is the inverse squared roughness along the sampled azimuth. For isotropic roughness the
/// azimuth is `2 pi u` and `a = 1 / alpha^2`.
#[must_use]
pub(crate) fn sample_azimuth(roughness: Roughness, u: f64) -> (f64, f64, f64) {
    let (sin_t, cos_t) = (2.0 * consts::PI * u).sin_cos();
    if roughness.is_isotropic() {
        return (cos_t, sin_t, 1.0 / roughness.alpha_x.sq());
    }
    let dir = Vec2d::new(roughness.alpha_x * cos_t, roughness.alpha_y * sin_t);
    let dir = dir.try_normalize().unwrap_or(Vec2d::X);
    #[allow(clippy::suboptimal_flops)]
    let a = (dir.x / roughness.alpha_x).sq() + (dir.y / roughness.alpha_y).sq();
    (dir.x, dir.y, a)
}

/// Completes a microfacet sample from the sampled normal direction.
///
/// `pdf_m` is the density of the normal with respect to solid angle around `m`, which is
/// `D(m) cos(theta_m)` for the distributions in this crate. `ndf` evaluates `D`.
pub(crate) fn finish_reflection_sample(
    omega_o: Vec3d,
    cos_theta_m: f64,
    cos_phi: f64,
    sin_phi: f64,
    pdf_m: f64,
    ndf: impl FnOnce(Vec3d) -> f64,
) -> Result<MicrofacetSample, Degenerate> {
    // NaN fails the comparison as well
    if !(pdf_m >= MIN_SAMPLE_PDF) {
        return Err(Degenerate::UnsamplablePdf);
    }

    #[allow(clippy::suboptimal_flops)]
    let sin_theta_m = (1.0 - cos_theta_m * cos_theta_m).max(0.0).sqrt();
    let m = Vec3d::new(sin_theta_m * cos_phi, sin_theta_m * sin_phi, cos_theta_m);

    let omega_i = reflect(m, omega_o);
    if omega_i.z <= 0.0 {
        return Err(Degenerate::BelowHorizon);
    }

    let weight = ndf(m) * omega_o.dot(m) / (pdf_m * omega_o.z);

    // Cook-Torrance Jacobian
    let pdf = pdf_m / (4.0 * omega_i.dot(m));

    Ok(MicrofacetSample {
        m,
        omega_i,
        pdf,
        weight,
    })
}
