#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::suboptimal_flops)]
#![deny(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]
#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::must_use_candidate)]
#![deny(clippy::double_must_use)]
#![deny(clippy::use_self)]
#![deny(clippy::unreadable_literal)]
#![deny(clippy::explicit_iter_loop)]
// these are lints to enable later
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]

//! This crate evaluates and importance samples microfacet reflection: Fresnel terms, normal
//! distribution functions and Smith shadowing-masking.
//!
//! # Design Decisions
//! All routines are pure functions of their arguments. There is no state, caching or
//! synchronization, so any number of evaluations may run in parallel.
//!
//! Calculations are done exclusively in [f64]s. Microfacet lobes can be extremely spiky and
//! [f64] keeps the numerical errors of the sampling routines small.
//!
//! Directions are expressed in a local shading frame. That means, the surface is assumed to be
//! the xy-plane and the z-vector is assumed to be the normal. Directions must be normalized and
//! rotated before evaluation, this crate does not validate them.
//!
//! Material parameters are not validated either. A roughness of `0.0`, an index of refraction
//! `<= 0.0` or NaN directions produce NaN or infinite results. Numerical corner cases that are
//! part of the physics (total internal reflection, directions below the horizon, samples without
//! probability density) are reported with [`Degenerate`].
//!
//! `sample_...` functions are deterministic. You are responsible for generating two [f64] in
//! the range `0.0..1.0` per sample, passed as a [Vec2d]. A sample that fails with a
//! [`Degenerate`] case contributes nothing and must not be redrawn.
//!
//! The crate writes to the [log] facade: warnings for degenerate material parameters and traces
//! for rejected samples. No logger is installed.
//!
//! # References
//! * Bruce Walter, Stephen R. Marschner, Hongsong Li, and Kenneth E. Torrance. Microfacet models
//!     for refraction through rough surfaces. In *Proceedings of the Eurographics Symposium on
//!     Rendering,* 2007.
//! * Eric Heitz. Understanding the masking-shadowing function in microfacet-based brdfs.
//!     *Journal of Computer Graphics Techniques, 3(2):32–91,* 2014.
//! * Christophe Schlick. An inexpensive BRDF model for physically-based rendering.
//!     *Computer Graphics Forum, 13(3),* 1994.

mod core;

pub use core::{Degenerate, MicrofacetModel, MicrofacetSample, Roughness, Vec2d, Vec3d};

#[cfg(test)]
pub(crate) mod test_utils;
pub mod utils;

pub mod bsdf;
pub mod fresnel;
pub mod shadowing;

#[cfg(feature = "beckmann")]
pub mod beckmann;
#[cfg(feature = "ggx")]
pub mod ggx;
#[cfg(feature = "lambert")]
pub mod lambert;
#[cfg(feature = "phong")]
pub mod phong;
