//! Fresnel reflectance of smooth interfaces.
//!
//! All functions take cosines in the local shading frame and return the unpolarized fraction of
//! reflected light. Material parameters are not validated: an IoR of `0.0` or NaN inputs yield
//! NaN or infinite results.

use crate::{utils, utils::FloatExt, Degenerate};

/// Schlick's approximation for reflection of a dielectric media.
///
/// `cos_theta` is the cosine between the view direction and the half vector. It must be clamped
/// to `[0, 1]` by the caller, the polynomial is unbounded outside of it.
#[must_use]
pub fn dielectric_fresnel_schlick(cos_theta: f64, ior: f64) -> f64 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).sq();
    #[allow(clippy::suboptimal_flops)]
    {
        r0 + (1.0 - r0) * utils::pow5(1.0 - cos_theta)
    }
}

/// Simplified Fresnel factor of a planar interface between two dielectrics, that takes the
/// cosine of the refracted direction as an input instead of solving for it.
///
/// Both cosines must be measured in the same hemisphere convention, the result is meaningless
/// otherwise.
#[must_use]
pub fn dielectric_fresnel_fast(n_dot_view: f64, n_dot_light: f64, ior: f64) -> f64 {
    // perpendicular component
    let rs = (n_dot_view - ior * n_dot_light) / (n_dot_view + ior * n_dot_light);
    // parallel component
    let rp = (ior * n_dot_view - n_dot_light) / (ior * n_dot_view + n_dot_light);
    (rs.sq() + rp.sq()) * 0.5
}

/// Full Fresnel factor of a planar interface between two dielectrics.
///
/// A positive `n_dot_view` enters the medium with index `ior`, a negative one leaves it.
///
/// # Errors
/// [`Degenerate::TotalInternalReflection`] if no refracted direction exists.
pub fn try_dielectric_fresnel(n_dot_view: f64, ior: f64) -> Result<f64, Degenerate> {
    // indices of refraction on the incident and on the transmitted side
    let (ior_i, ior_t) = if n_dot_view >= 0.0 { (1.0, ior) } else { (ior, 1.0) };
    let eta = ior_i / ior_t;

    #[allow(clippy::suboptimal_flops)]
    let n_dot_light_sq = 1.0 - eta.sq() * (1.0 - n_dot_view.sq());
    if n_dot_light_sq <= 0.0 {
        return Err(Degenerate::TotalInternalReflection);
    }
    let n_dot_light = n_dot_light_sq.sqrt();
    let n_dot_view = n_dot_view.abs();

    // perpendicular component
    let rs = (ior_i * n_dot_view - ior_t * n_dot_light) / (ior_i * n_dot_view + ior_t * n_dot_light);
    // parallel component
    let rp = (ior_t * n_dot_view - ior_i * n_dot_light) / (ior_t * n_dot_view + ior_i * n_dot_light);
    Ok((rs.sq() + rp.sq()) * 0.5)
}

/// Full Fresnel factor of a planar interface between two dielectrics.
/// Returns exactly `1.0` in case of total internal reflection, see [`try_dielectric_fresnel`].
#[must_use]
pub fn dielectric_fresnel(n_dot_view: f64, ior: f64) -> f64 {
    try_dielectric_fresnel(n_dot_view, ior).unwrap_or(1.0)
}

/// Full Fresnel factor of a planar interface between a dielectric (usually air) and a
/// conductor with the complex index of refraction `ior + i kappa`.
///
/// `n_dot_view` is clamped to `[0, 1]`, light does not refract into conductors.
#[must_use]
pub fn conductor_fresnel(n_dot_view: f64, ior: f64, kappa: f64) -> f64 {
    let total_ior_sq = ior.sq() + kappa.sq();
    let c = n_dot_view.clamp(0.0, 1.0);
    let c_sq = c.sq();
    let reduced = total_ior_sq * c_sq;
    let two_ior_c = 2.0 * ior * c;

    let rp_sq = (reduced - two_ior_c + 1.0) / (reduced + two_ior_c + 1.0);
    let rs_sq = (total_ior_sq - two_ior_c + c_sq) / (total_ior_sq + two_ior_c + c_sq);
    (rp_sq + rs_sq) * 0.5
}

/// The Fresnel term of a microfacet BSDF
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fresnel {
    /// Reflects everything. Useful to inspect the distribution and shadowing terms alone.
    None,
    Schlick { ior: f64 },
    Dielectric { ior: f64 },
    Conductor { ior: f64, kappa: f64 },
}

impl Fresnel {
    #[must_use]
    pub fn schlick(ior: f64) -> Self {
        warn_on_ior(ior);
        Self::Schlick { ior }
    }

    #[must_use]
    pub fn dielectric(ior: f64) -> Self {
        warn_on_ior(ior);
        Self::Dielectric { ior }
    }

    #[must_use]
    pub fn conductor(ior: f64, kappa: f64) -> Self {
        warn_on_ior(ior);
        if !(kappa >= 0.0) {
            log::warn!("conductor absorption coefficient {kappa} is negative");
        }
        Self::Conductor { ior, kappa }
    }

    /// `cos_theta` is the cosine between the view direction and the microfacet normal
    #[must_use]
    pub fn evaluate(self, cos_theta: f64) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Schlick { ior } => dielectric_fresnel_schlick(cos_theta.clamp(0.0, 1.0), ior),
            Self::Dielectric { ior } => dielectric_fresnel(cos_theta, ior),
            Self::Conductor { ior, kappa } => conductor_fresnel(cos_theta, ior, kappa),
        }
    }
}

fn warn_on_ior(ior: f64) {
    if !(ior > 0.0) {
        log::warn!("index of refraction {ior} is not positive, fresnel terms will be NaN");
    }
}
