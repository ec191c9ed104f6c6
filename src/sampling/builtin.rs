//! builtin.rs
//! Built-in samplers. Parameter names follow the usual numeric-library
//! conventions (`scale` rather than `rate` for gamma and exponential).

use super::params::Parameters;
use crate::error::{GraphError, Result};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::{Beta, Binomial, Exp, Gamma, LogNormal, Normal, Poisson, Triangular, Uniform};
use std::fmt::Display;

fn invalid<E: Display>(distribution: &'static str) -> impl FnOnce(E) -> GraphError {
    move |e| GraphError::InvalidParameters { distribution: distribution.to_string(), reason: e.to_string() }
}

fn draw<D: Distribution<f64>>(dist: &D, nsim: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..nsim).map(|_| dist.sample(rng)).collect()
}

/// Reads `key` as a whole, non-negative count.
fn count(params: &Parameters, distribution: &'static str, key: &str) -> Result<u64> {
    let raw = params.require(distribution, key)?;
    if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 {
        return Err(GraphError::InvalidParameters {
            distribution: distribution.to_string(),
            reason: format!("'{}' must be a non-negative integer, got {}", key, raw),
        });
    }
    Ok(raw as u64)
}

fn positive_scale(params: &Parameters, distribution: &'static str) -> Result<f64> {
    let scale = params.require(distribution, "scale")?;
    if !(scale > 0.0) {
        return Err(GraphError::InvalidParameters {
            distribution: distribution.to_string(),
            reason: format!("'scale' must be positive, got {}", scale),
        });
    }
    Ok(scale)
}

pub fn binomial(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("binomial", &["n", "p"])?;
    let n = count(params, "binomial", "n")?;
    let p = params.require("binomial", "p")?;
    let dist = Binomial::new(p, n).map_err(invalid("binomial"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn triangular(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("triangular", &["left", "mode", "right"])?;
    let left = params.require("triangular", "left")?;
    let mode = params.require("triangular", "mode")?;
    let right = params.require("triangular", "right")?;
    let dist = Triangular::new(left, right, mode).map_err(invalid("triangular"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn gamma(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("gamma", &["shape", "scale"])?;
    let shape = params.require("gamma", "shape")?;
    let scale = positive_scale(params, "gamma")?;
    let dist = Gamma::new(shape, 1.0 / scale).map_err(invalid("gamma"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn normal(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("normal", &["loc", "scale"])?;
    let loc = params.require("normal", "loc")?;
    let scale = positive_scale(params, "normal")?;
    let dist = Normal::new(loc, scale).map_err(invalid("normal"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn uniform(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("uniform", &["low", "high"])?;
    let low = params.require("uniform", "low")?;
    let high = params.require("uniform", "high")?;
    let dist = Uniform::new(low, high).map_err(invalid("uniform"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn poisson(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("poisson", &["lam"])?;
    let lam = params.require("poisson", "lam")?;
    let dist = Poisson::new(lam).map_err(invalid("poisson"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn lognormal(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("lognormal", &["mean", "sigma"])?;
    let mean = params.require("lognormal", "mean")?;
    let sigma = params.require("lognormal", "sigma")?;
    let dist = LogNormal::new(mean, sigma).map_err(invalid("lognormal"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn exponential(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("exponential", &["scale"])?;
    let scale = positive_scale(params, "exponential")?;
    let dist = Exp::new(1.0 / scale).map_err(invalid("exponential"))?;
    Ok(draw(&dist, nsim, rng))
}

pub fn beta(params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
    params.expect_only("beta", &["a", "b"])?;
    let a = params.require("beta", "a")?;
    let b = params.require("beta", "b")?;
    let dist = Beta::new(a, b).map_err(invalid("beta"))?;
    Ok(draw(&dist, nsim, rng))
}
