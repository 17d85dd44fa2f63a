//! Microfacet reflection: a [`MicrofacetModel`] combined with a [`Fresnel`] term
use crate::{fresnel::Fresnel, utils, Degenerate, MicrofacetModel, Vec2d, Vec3d};

/// Contains the data that is returned by [`MicrofacetReflection::sample`]
#[derive(Clone, Copy, Debug)]
pub struct BsdfSample {
    /// # Incident Direction
    /// The direction where light could be arriving at the surface
    pub omega_i: Vec3d,

    /// The probability density for choosing `omega_i` given `omega_o`, with respect to solid angle
    pub pdf: f64,

    /// `bsdf * omega_i.z / pdf`, the factor by which the incident radiance is scaled
    pub weight: f64,
}

/// Cook-Torrance reflection off a rough surface.
///
/// The BSDF is computed in a local space. That means, the surface is assumed to be the xy-plane
/// and the z-vector is assumed to be the normal. Only the upper hemisphere reflects.
#[derive(Clone, Copy, Debug)]
pub struct MicrofacetReflection<M> {
    pub model: M,
    pub fresnel: Fresnel,
}

impl<M: MicrofacetModel> MicrofacetReflection<M> {
    #[must_use]
    pub const fn new(model: M, fresnel: Fresnel) -> Self {
        Self { model, fresnel }
    }

    /// Returns the value of the BSDF at the given directions, without the cosine term
    ///
    /// # Arguments
    /// * `omega_o` - Exitant light direction
    /// * `omega_i` - Incident light direction
    #[must_use]
    pub fn evaluate(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64 {
        if omega_o.z <= 0.0 || omega_i.z <= 0.0 {
            return 0.0;
        }
        let Some(m) = utils::positive_reflect_normal(omega_i, omega_o) else {
            return 0.0;
        };
        let fresnel = self.fresnel.evaluate(omega_o.dot(m));
        let masking_shadowing = self.model.geometric(omega_i, omega_o, m);
        let ndf = self.model.distribution(m);

        fresnel * masking_shadowing * ndf / (4.0 * omega_i.z * omega_o.z)
    }

    /// Returns the probability density of [`MicrofacetReflection::sample`] producing `omega_i`
    #[must_use]
    pub fn pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64 {
        if omega_o.z <= 0.0 || omega_i.z <= 0.0 {
            return 0.0;
        }
        utils::positive_reflect_normal(omega_i, omega_o)
            .map_or(0.0, |m| self.model.pdf(omega_o, m))
    }

    /// Given a direction where light is scattered to, samples an incident direction, from which
    /// the light may come from
    ///
    /// # Errors
    /// The [`Degenerate`] case if the sample does not contribute. Such a sample counts with a
    /// weight of `0.0`, it must not be redrawn.
    pub fn sample(&self, omega_o: Vec3d, rnd: Vec2d) -> Result<BsdfSample, Degenerate> {
        if omega_o.z <= 0.0 {
            log::trace!("sample rejected: {}", Degenerate::BelowHorizon);
            return Err(Degenerate::BelowHorizon);
        }
        let sample = self.model.sample(omega_o, rnd).map_err(|degenerate| {
            log::trace!("sample rejected: {degenerate}");
            degenerate
        })?;

        let fresnel = self.fresnel.evaluate(omega_o.dot(sample.m));
        let masking_shadowing = self.model.geometric(sample.omega_i, omega_o, sample.m);
        Ok(BsdfSample {
            omega_i: sample.omega_i,
            pdf: sample.pdf,
            weight: sample.weight * masking_shadowing * fresnel,
        })
    }
}
