pub trait ApproxEqual: Copy {
    fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool;
    fn equals_approx_abs(self, other: Self, eps: Self) -> bool;
}

macro_rules! assert_eq_approx {
    ($lhs:expr, $rhs:expr, $eps_abs:expr, $eps_rel:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel),
            r#"assert_eq_approx failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}
    {} (maximum relative error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
            stringify!($eps_rel),
            $eps_rel,
        );
    };

    ($lhs:expr, $rhs:expr, $eps_abs: expr, $eps_rel:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel), $($arg)*);
    }
}

macro_rules! assert_eq_approx_abs {
    ($lhs:expr, $rhs:expr, $eps_abs:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
            r#"assert_eq_abs failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
        )
    };

    ($lhs:expr, $rhs:expr, $eps_abs:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
        $($arg)*);
    };
}

macro_rules! assert_in_range {
    ($value:expr, $lower:expr, $upper:expr) => {
        assert!(
            $lower <= $value && $value <= $upper,
            r#"assert_in_range failed:
    {} (value): {:?}
    {} (lower bound): {:?}
    {} (upper bound): {:?}"#,
            stringify!($value),
            $value,
            stringify!($lower),
            $lower,
            stringify!($upper),
            $upper
        )
    };
}

macro_rules! impl_approx_equal {
    ($scalar:ty, $vector:ty) => {
        impl ApproxEqual for $scalar {
            fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other || (self - other).abs() <= eps {
                    true
                } else {
                    let diff = (self - other).abs();
                    let max = self.abs().max(other.abs());
                    diff <= max * eps_rel
                }
            }

            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other {
                    true
                } else {
                    (self - other).abs() <= eps
                }
            }
        }

        impl ApproxEqual for $vector {
            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx_abs(self.x, other.x, eps.x)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.y, other.y, eps.y)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.z, other.z, eps.z)
            }
            fn equals_approx(self, other: Self, eps_abs: Self, eps_rel: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx(
                    self.x, other.x, eps_abs.x, eps_rel.x,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.y, other.y, eps_abs.y, eps_rel.y,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.z, other.z, eps_abs.z, eps_rel.z,
                )
            }
        }
    };
}

impl_approx_equal!(f64, Vec3d);

use std::{cell::RefCell, f64::consts, sync::Once};

pub(crate) use assert_eq_approx;
pub(crate) use assert_eq_approx_abs;
pub(crate) use assert_in_range;

use rayon::prelude::*;

use crate::{utils::FloatExt, MicrofacetModel, Vec2d, Vec3d};

thread_local! {
    static CAPTURED_LOGS: RefCell<Option<Vec<(log::Level, String)>>> = const { RefCell::new(None) };
}

/// Forwards records to the capture buffer of the logging thread, if one is open
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED_LOGS.with(|logs| {
            if let Some(logs) = logs.borrow_mut().as_mut() {
                logs.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

/// Runs `f` and returns its result together with every log record it emitted on this thread
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(log::Level, String)>) {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("no other logger in the test binary");
        log::set_max_level(log::LevelFilter::Trace);
    });

    CAPTURED_LOGS.with(|logs| *logs.borrow_mut() = Some(Vec::new()));
    let result = f();
    let logs = CAPTURED_LOGS.with(|logs| logs.borrow_mut().take().unwrap_or_default());
    (result, logs)
}

pub trait SamplerExt {
    fn vec2d(&mut self) -> Vec2d;
}

impl SamplerExt for fastrand::Rng {
    fn vec2d(&mut self) -> Vec2d {
        Vec2d::new(self.f64(), self.f64())
    }
}

/** sample a direction with density 1 / 4pi */
pub fn spherical_sample(rd: &mut fastrand::Rng) -> Vec3d {
    let u = rd.f64();
    let v = rd.f64();
    spherical_sample_uv(u, v)
}

fn spherical_sample_uv(u: f64, v: f64) -> Vec3d {
    #[allow(clippy::suboptimal_flops)]
    let cos_theta = 2.0 * u - 1.0;
    #[allow(clippy::suboptimal_flops)]
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = v * 2.0 * consts::PI;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3d::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/** sample a direction in the upper hemisphere with density 1 / 2pi */
pub fn hemispherical_sample(rd: &mut fastrand::Rng) -> Vec3d {
    let omega = spherical_sample(rd);
    Vec3d::new(omega.x, omega.y, omega.z.abs())
}

/// Integrates `f` over the upper hemisphere with the midpoint rule in spherical coordinates
pub fn integrate_hemisphere<F>(f: F, n_theta: usize, n_phi: usize) -> f64
where
    F: Fn(Vec3d) -> f64 + Sync,
{
    let d_theta = consts::FRAC_PI_2 / n_theta as f64;
    let d_phi = 2.0 * consts::PI / n_phi as f64;
    (0..n_theta)
        .into_par_iter()
        .map(|i| {
            let theta = (i as f64 + 0.5) * d_theta;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let mut row = 0.0;
            for j in 0..n_phi {
                let phi = (j as f64 + 0.5) * d_phi;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let omega = Vec3d::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
                row += f(omega);
            }
            row * sin_theta
        })
        .sum::<f64>()
        * d_theta
        * d_phi
}

/// Mean and standard error of `f` over `num_samples` random pairs, computed in parallel with a
/// fixed seed per chunk
pub fn monte_carlo<F>(f: F, num_samples: usize) -> (f64, f64)
where
    F: Fn(Vec2d) -> f64 + Sync,
{
    let chunks = 64;
    let per_chunk = num_samples / chunks;
    let (sum, sum2) = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rd = fastrand::Rng::with_seed(chunk as u64 + 1);
            let mut sum = 0.0;
            let mut sum2 = 0.0;
            for _ in 0..per_chunk {
                let value = f(rd.vec2d());
                sum += value;
                sum2 += value.sq();
            }
            (sum, sum2)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
    let n = (per_chunk * chunks) as f64;
    let mean = sum / n;
    let variance = (sum2 / n - mean.sq()) * n / (n - 1.0);
    (mean, (variance.max(0.0) / n).sqrt())
}

/// The projected area of the microfacets has to be the area of the macro surface:
/// `integral D(m) m.z dm = 1`
pub fn test_ndf_normalization<M: MicrofacetModel + Sync>(model: &M, tolerance: f64) {
    let integral = integrate_hemisphere(|m| model.distribution(m) * m.z, 4000, 512);
    assert_eq_approx_abs!(
        integral,
        1.0,
        tolerance,
        "projected microfacet area is {integral} for {:?}",
        model.roughness()
    );
}

/// Checks every sample against the evaluation routines of the same model
pub fn test_sample_eval<M: MicrofacetModel>(model: &M) {
    let mut rd = fastrand::Rng::with_seed(11);
    let runs = 10000;
    for _ in 0..runs {
        let omega_o = hemispherical_sample(&mut rd);
        let Ok(sample) = model.sample(omega_o, rd.vec2d()) else {
            continue;
        };
        assert!(sample.omega_i.z > 0.0);
        assert!(sample.pdf > 0.0);
        assert!(sample.weight >= 0.0 && sample.weight.is_finite());
        assert_eq_approx_abs!(sample.m.length(), 1.0, 1e-9);
        assert_eq_approx_abs!(sample.omega_i.length(), 1.0, 1e-9);
        assert_eq_approx_abs!(
            sample.m,
            (sample.omega_i + omega_o).normalize(),
            Vec3d::splat(1e-6)
        );

        let c_pdf = model.pdf(omega_o, sample.m);
        assert_eq_approx!(
            sample.pdf,
            c_pdf,
            1e-9,
            1e-6,
            r#"
    pdf of sample and pdf of evaluation differ
    pdf: {},
    c_pdf: {c_pdf},
    omega_o: {omega_o:?},
    m: {:?}"#,
            sample.pdf,
            sample.m
        );

        // the density of m is D(m) m.z, so only the cosines remain
        let c_weight = omega_o.dot(sample.m) / (sample.m.z * omega_o.z);
        assert_eq_approx!(sample.weight, c_weight, 1e-9, 1e-6);
    }
}

/// Compares the mean sample weight, shadowed and masked, against the albedo
/// `integral D(h) G(omega_o, omega_i, h) / (4 omega_o.z) d omega_i` computed by quadrature
pub fn test_sampled_albedo<M: MicrofacetModel + Sync>(model: &M, omega_o: Vec3d) {
    let expected = integrate_hemisphere(
        |omega_i| {
            let h = (omega_i + omega_o).normalize();
            model.distribution(h) * model.geometric(omega_i, omega_o, h) / (4.0 * omega_o.z)
        },
        2000,
        512,
    );

    let (mean, std_error) = monte_carlo(
        |rnd| {
            model.sample(omega_o, rnd).map_or_else(
                |degenerate| degenerate.weight(),
                |sample| sample.weight * model.geometric(sample.omega_i, omega_o, sample.m),
            )
        },
        1_000_000,
    );

    let confidence = 4.0 * std_error + 2e-3;
    assert_eq_approx_abs!(
        mean,
        expected,
        confidence,
        r#"
    sampled albedo {mean} does not match the integrated albedo {expected}
    std_error: {std_error},
    omega_o: {omega_o:?},
    roughness: {:?}"#,
        model.roughness()
    );
    assert!(expected > 0.0 && expected <= 1.0 + 2e-3);
}

/// The rate of successful samples is the integral of the pdf over the upper hemisphere
pub fn test_pdf_integral<M: MicrofacetModel + Sync>(model: &M, omega_o: Vec3d) {
    let expected = integrate_hemisphere(
        |omega_i| model.pdf(omega_o, (omega_i + omega_o).normalize()),
        2000,
        512,
    );
    let (rate, std_error) = monte_carlo(
        |rnd| f64::from(u8::from(model.sample(omega_o, rnd).is_ok())),
        1_000_000,
    );
    assert_eq_approx_abs!(rate, expected, 4.0 * std_error + 2e-3);
}
