//! Smith shadowing and masking
//!
//! # Mathematical background
//! * [Understanding the Masking-Shadowing Function in Microfacet-Based BRDFs](https://jcgt.org/published/0003/02/03/)
//! * Walter et al., Microfacet Models for Refraction through Rough Surfaces, EGSR 2007

use crate::{utils, utils::FloatExt, Vec2d, Vec3d};

/// Selects the closed form of the Smith masking function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NdfType {
    /// Rational fit of the Beckmann masking function. Also used for Phong.
    Beckmann,
    /// Exact masking function of the GGX / Trowbridge-Reitz distribution
    Ggx,
}

/// Computes the effective roughness of an anisotropic surface seen from `dir`.
///
/// The roughness is projected onto the azimuth of `dir`. The projection divides by
/// `1 - dir.z^2` and is therefore undefined for directions along the normal, which
/// [`g_smith`] excludes before calling this.
#[must_use]
pub fn effective_visible_roughness(dir: Vec3d, roughness: Vec2d) -> f64 {
    let recip_sin_theta_sq = 1.0 / (1.0 - dir.z.sq());
    let dir_plane = Vec2d::new(dir.x, dir.y);
    let cos_sin_phi_sq = dir_plane * dir_plane * recip_sin_theta_sq;
    let res = roughness * roughness * cos_sin_phi_sq;
    (res.x + res.y).sqrt()
}

/// Computes the Smith'67 shadowing or masking term for a single direction.
///
/// # Arguments
/// * `dir` - view or light direction in the local shading frame
/// * `h` - half vector (microfacet normal) in the local shading frame
/// * `roughness` - anisotropic roughness of the microfacet distribution
/// * `ndf_type` - which distribution the surface follows
///
/// Returns the fraction of microfacets with normal `h` that are visible from `dir`: exactly `0.0`
/// if the microfacet faces away from `dir`, exactly `1.0` if `dir` is the surface normal.
#[must_use]
pub fn g_smith(dir: Vec3d, h: Vec3d, roughness: Vec2d, ndf_type: NdfType) -> f64 {
    if dir.dot(h) * dir.z <= 0.0 {
        return 0.0;
    }
    let sin_theta_sq = 1.0 - dir.z.sq();
    if sin_theta_sq <= 0.0 {
        return 1.0;
    }
    let tan_theta = sin_theta_sq.sqrt() / dir.z.abs();
    let alpha = effective_visible_roughness(dir, roughness);

    match ndf_type {
        NdfType::Beckmann => {
            let a = 1.0 / (alpha * tan_theta);
            if a > 1.6 {
                return 1.0;
            }
            let a_sq = a.sq();
            #[allow(clippy::suboptimal_flops)]
            {
                (3.535 * a + 2.181 * a_sq) / (1.0 + 2.276 * a + 2.577 * a_sq)
            }
        }
        NdfType::Ggx => {
            let isect_root = alpha * tan_theta;
            2.0 / (1.0 + Vec2d::new(1.0, isect_root).length())
        }
    }
}

/// Computes the shadowing and masking term of a microfacet BSDF.
///
/// `v` and `l` are given in world space and projected onto the frame `t`, `b`, `n`. The half
/// vector `h` is already in the local frame. Unless `transmissive` is set, `v` and `l` must lie
/// in the same hemisphere, `0.0` is returned otherwise.
///
/// This is the separable (uncorrelated) product of two [`g_smith`] terms.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn eval_microfacet_terms(
    t: Vec3d,
    b: Vec3d,
    n: Vec3d,
    h: Vec3d,
    v: Vec3d,
    l: Vec3d,
    roughness: Vec2d,
    ndf_type: NdfType,
    transmissive: bool,
) -> f64 {
    let l_tg = utils::to_local(t, b, n, l);
    let v_tg = utils::to_local(t, b, n, v);

    if !transmissive && l_tg.z * v_tg.z <= 0.0 {
        return 0.0;
    }

    g_smith(v_tg, h, roughness, ndf_type) * g_smith(l_tg, h, roughness, ndf_type)
}
