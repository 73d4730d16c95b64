use rand::Rng;
use rand::distr::Uniform;
use rand_distr::{Beta, Distribution, Exp, Gamma, LogNormal, Normal, Pareto, Triangular, Weibull};
use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::api::config_dto::distribution_dto::DistributionDto;
use crate::error::ConfigError;

/// Supported distribution kinds with their typed parameters.
///
/// Parameter order follows the configuration document, e.g. `gamma` is
/// `(shape, scale)` and `weibull` is `(scale, shape)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionKind {
    /// Always returns `value`.
    Constant { value: f64 },

    /// Integer from `start, start + step, ...` below `stop`.
    RandRange { start: i64, stop: i64, step: i64 },

    /// Integer in `[low, high]`.
    RandInt { low: i64, high: i64 },

    /// Float in `[0, 1)`.
    Random,

    /// Float in `[low, high]`.
    Uniform { low: f64, high: f64 },

    Triangular { low: f64, high: f64, mode: f64 },

    Beta { alpha: f64, beta: f64 },

    Exponential { lambda: f64 },

    Gamma { shape: f64, scale: f64 },

    Normal { mu: f64, sigma: f64 },

    LogNormal { mu: f64, sigma: f64 },

    /// Pareto with scale 1.
    Pareto { alpha: f64 },

    Weibull { scale: f64, shape: f64 },

    /// Circular angle in `[0, 2π)` around `mu` with concentration `kappa`.
    VonMises { mu: f64, kappa: f64 },
}

fn arity(name: &str, expected: &str, params: &[f64]) -> ConfigError {
    ConfigError::DistributionArity { name: name.to_string(), expected: expected.to_string(), got: params.len() }
}

fn integer(name: &str, value: f64) -> Result<i64, ConfigError> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(ConfigError::InvalidDistribution { name: name.to_string(), reason: format!("{} is not an integer", value) })
    }
}

impl DistributionKind {
    /// Resolves a configuration name plus positional parameters.
    pub fn parse(name: &str, params: &[f64]) -> Result<Self, ConfigError> {
        let kind = match (name, params) {
            ("constant", [value]) => DistributionKind::Constant { value: *value },
            ("constant", _) => return Err(arity(name, "1", params)),

            ("randrange", [stop]) => DistributionKind::RandRange { start: 0, stop: integer(name, *stop)?, step: 1 },
            ("randrange", [start, stop]) => DistributionKind::RandRange { start: integer(name, *start)?, stop: integer(name, *stop)?, step: 1 },
            ("randrange", [start, stop, step]) => {
                DistributionKind::RandRange { start: integer(name, *start)?, stop: integer(name, *stop)?, step: integer(name, *step)? }
            }
            ("randrange", _) => return Err(arity(name, "1 to 3", params)),

            ("randint", [a, b]) => DistributionKind::RandInt { low: integer(name, *a)?, high: integer(name, *b)? },
            ("randint", _) => return Err(arity(name, "2", params)),

            ("random", []) => DistributionKind::Random,
            ("random", _) => return Err(arity(name, "0", params)),

            ("uniform", [a, b]) => DistributionKind::Uniform { low: *a, high: *b },
            ("uniform", _) => return Err(arity(name, "2", params)),

            ("triangular", [low, high, mode]) => DistributionKind::Triangular { low: *low, high: *high, mode: *mode },
            ("triangular", _) => return Err(arity(name, "3", params)),

            ("beta", [alpha, beta]) => DistributionKind::Beta { alpha: *alpha, beta: *beta },
            ("beta", _) => return Err(arity(name, "2", params)),

            ("expo", [lambda]) => DistributionKind::Exponential { lambda: *lambda },
            ("expo", _) => return Err(arity(name, "1", params)),

            ("gamma", [shape, scale]) => DistributionKind::Gamma { shape: *shape, scale: *scale },
            ("gamma", _) => return Err(arity(name, "2", params)),

            ("gauss" | "normal", [mu, sigma]) => DistributionKind::Normal { mu: *mu, sigma: *sigma },
            ("gauss" | "normal", _) => return Err(arity(name, "2", params)),

            ("lognorm", [mu, sigma]) => DistributionKind::LogNormal { mu: *mu, sigma: *sigma },
            ("lognorm", _) => return Err(arity(name, "2", params)),

            ("pareto", [alpha]) => DistributionKind::Pareto { alpha: *alpha },
            ("pareto", _) => return Err(arity(name, "1", params)),

            ("weibull", [scale, shape]) => DistributionKind::Weibull { scale: *scale, shape: *shape },
            ("weibull", _) => return Err(arity(name, "2", params)),

            ("vonmises", [mu, kappa]) => DistributionKind::VonMises { mu: *mu, kappa: *kappa },
            ("vonmises", _) => return Err(arity(name, "2", params)),

            _ => return Err(ConfigError::UnknownDistribution(name.to_string())),
        };

        Ok(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistributionKind::Constant { .. } => "constant",
            DistributionKind::RandRange { .. } => "randrange",
            DistributionKind::RandInt { .. } => "randint",
            DistributionKind::Random => "random",
            DistributionKind::Uniform { .. } => "uniform",
            DistributionKind::Triangular { .. } => "triangular",
            DistributionKind::Beta { .. } => "beta",
            DistributionKind::Exponential { .. } => "expo",
            DistributionKind::Gamma { .. } => "gamma",
            DistributionKind::Normal { .. } => "normal",
            DistributionKind::LogNormal { .. } => "lognorm",
            DistributionKind::Pareto { .. } => "pareto",
            DistributionKind::Weibull { .. } => "weibull",
            DistributionKind::VonMises { .. } => "vonmises",
        }
    }
}

/// Von Mises distribution sampled with the Best-Fisher rejection method.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VonMises {
    mu: f64,
    kappa: f64,
    /// Rejection envelope parameter `s + sqrt(1 + s^2)` with `s = 1 / (2 kappa)`.
    r: f64,
}

impl VonMises {
    /// Below this concentration the distribution is sampled as uniform on the circle.
    const UNIFORM_KAPPA: f64 = 1e-6;

    fn new(mu: f64, kappa: f64) -> Result<Self, String> {
        if !mu.is_finite() {
            return Err(format!("mu must be finite, got {}", mu));
        }
        if !kappa.is_finite() || kappa < 0.0 {
            return Err(format!("kappa must be finite and non-negative, got {}", kappa));
        }

        let s = 0.5 / kappa.max(Self::UNIFORM_KAPPA);
        Ok(VonMises { mu, kappa, r: s + (1.0 + s * s).sqrt() })
    }
}

impl Distribution<f64> for VonMises {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.kappa <= Self::UNIFORM_KAPPA {
            return TAU * rng.random::<f64>();
        }

        let z = loop {
            let z = (PI * rng.random::<f64>()).cos();
            let d = z / (self.r + z);
            let u = rng.random::<f64>();
            if u < 1.0 - d * d || u <= (1.0 - d) * d.exp() {
                break z;
            }
        };

        let q = 1.0 / self.r;
        let f = ((q + z) / (1.0 + q * z)).clamp(-1.0, 1.0);
        let theta = if rng.random::<f64>() > 0.5 { self.mu + f.acos() } else { self.mu - f.acos() };
        theta.rem_euclid(TAU)
    }
}

/// The resolved sampling backend of a [`DistributionKind`].
#[derive(Debug, Clone)]
enum Draw {
    Constant(f64),
    Range { start: i64, step: i64, offsets: Uniform<i64> },
    Int(Uniform<i64>),
    Unit,
    Uniform(Uniform<f64>),
    Triangular(Triangular<f64>),
    Beta(Beta<f64>),
    Exp(Exp<f64>),
    Gamma(Gamma<f64>),
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
    Pareto(Pareto<f64>),
    Weibull(Weibull<f64>),
    VonMises(VonMises),
}

impl Draw {
    fn resolve(kind: DistributionKind) -> Result<Draw, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDistribution { name: kind.name().to_string(), reason };

        let draw = match kind {
            DistributionKind::Constant { value } => Draw::Constant(value),
            DistributionKind::RandRange { start, stop, step } => {
                if step <= 0 {
                    return Err(invalid(format!("step must be positive, got {}", step)));
                }
                let count = (stop - start + step - 1) / step;
                let offsets = Uniform::new(0, count.max(0)).map_err(|e| invalid(format!("empty range [{}, {}): {}", start, stop, e)))?;
                Draw::Range { start, step, offsets }
            }
            DistributionKind::RandInt { low, high } => Draw::Int(Uniform::new_inclusive(low, high).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Random => Draw::Unit,
            DistributionKind::Uniform { low, high } => {
                let (low, high) = if low <= high { (low, high) } else { (high, low) };
                Draw::Uniform(Uniform::new_inclusive(low, high).map_err(|e| invalid(e.to_string()))?)
            }
            DistributionKind::Triangular { low, high, mode } => {
                Draw::Triangular(Triangular::new(low, high, mode).map_err(|e| invalid(e.to_string()))?)
            }
            DistributionKind::Beta { alpha, beta } => Draw::Beta(Beta::new(alpha, beta).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Exponential { lambda } => Draw::Exp(Exp::new(lambda).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Gamma { shape, scale } => Draw::Gamma(Gamma::new(shape, scale).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Normal { mu, sigma } => Draw::Normal(Normal::new(mu, sigma).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::LogNormal { mu, sigma } => Draw::LogNormal(LogNormal::new(mu, sigma).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Pareto { alpha } => Draw::Pareto(Pareto::new(1.0, alpha).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::Weibull { scale, shape } => Draw::Weibull(Weibull::new(scale, shape).map_err(|e| invalid(e.to_string()))?),
            DistributionKind::VonMises { mu, kappa } => Draw::VonMises(VonMises::new(mu, kappa).map_err(invalid)?),
        };

        Ok(draw)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Draw::Constant(value) => *value,
            Draw::Range { start, step, offsets } => (start + step * offsets.sample(rng)) as f64,
            Draw::Int(uniform) => uniform.sample(rng) as f64,
            Draw::Unit => rng.random::<f64>(),
            Draw::Uniform(uniform) => uniform.sample(rng),
            Draw::Triangular(d) => d.sample(rng),
            Draw::Beta(d) => d.sample(rng),
            Draw::Exp(d) => d.sample(rng),
            Draw::Gamma(d) => d.sample(rng),
            Draw::Normal(d) => d.sample(rng),
            Draw::LogNormal(d) => d.sample(rng),
            Draw::Pareto(d) => d.sample(rng),
            Draw::Weibull(d) => d.sample(rng),
            Draw::VonMises(d) => d.sample(rng),
        }
    }
}

/// A distribution resolved once at load time.
///
/// Used for client placement, movement deltas, usage amounts and usage intervals.
#[derive(Debug, Clone)]
pub struct DistributionSampler {
    kind: DistributionKind,
    draw: Draw,
    divide_scale: f64,
}

impl DistributionSampler {
    pub fn new(kind: DistributionKind, divide_scale: f64) -> Result<Self, ConfigError> {
        if !divide_scale.is_finite() || divide_scale == 0.0 {
            return Err(ConfigError::InvalidDistribution {
                name: kind.name().to_string(),
                reason: format!("divide_scale must be finite and non-zero, got {}", divide_scale),
            });
        }

        Ok(DistributionSampler { kind, draw: Draw::resolve(kind)?, divide_scale })
    }

    pub fn from_dto(dto: &DistributionDto) -> Result<Self, ConfigError> {
        let kind = DistributionKind::parse(&dto.distribution, &dto.params)?;
        Self::new(kind, dto.divide_scale.unwrap_or(1.0))
    }

    /// A sampler that always yields `value`.
    pub fn constant(value: f64) -> Self {
        DistributionSampler { kind: DistributionKind::Constant { value }, draw: Draw::Constant(value), divide_scale: 1.0 }
    }

    pub fn kind(&self) -> DistributionKind {
        self.kind
    }

    pub fn divide_scale(&self) -> f64 {
        self.divide_scale
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.draw.sample(rng)
    }

    pub fn sample_scaled<R: Rng>(&self, rng: &mut R) -> f64 {
        self.draw.sample(rng) / self.divide_scale
    }

    /// Two independent scaled draws used as an `(dx, dy)` step.
    pub fn sample_movement<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        let x = self.sample_scaled(rng);
        let y = self.sample_scaled(rng);
        (x, y)
    }
}

impl fmt::Display for DistributionSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {:?}", self.kind.name(), self.kind)?;
        if self.divide_scale != 1.0 {
            write!(f, " / {}", self.divide_scale)?;
        }
        write!(f, "]")
    }
}
