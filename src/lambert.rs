//! Lambertian diffuse reflection
use std::f64::consts;

use crate::{utils, Vec2d, Vec3d};

/// Lambertian diffuse BSDF including the clamped cosine term: `max(0, n.l) / pi`.
///
/// Light from below the horizon contributes nothing.
#[must_use]
pub fn eval_diffuse_bsdf(shade_normal: Vec3d, light_dir: Vec3d) -> f64 {
    shade_normal.dot(light_dir).max(0.0) * consts::FRAC_1_PI
}

/// Samples an incident direction proportional to [`eval_diffuse_bsdf`] around the local normal.
///
/// Returns the direction and its density `cos(theta) / pi`. `rnd.x` is clamped away from zero so
/// the density never vanishes.
#[must_use]
pub fn sample_diffuse_bsdf(rnd: Vec2d) -> (Vec3d, f64) {
    utils::hemispherical_sample_cos_weighted_uv(rnd.x, rnd.y)
}
