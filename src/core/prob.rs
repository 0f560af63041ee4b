use ndarray::Array1;

use crate::core::error::{DaiError, DaiResult, ErrorKind};

/// A vector of (possibly unnormalized) probabilities
pub type Prob = Array1<f64>;

/// Returns a normalized uniform distribution over `states` values
#[inline]
pub fn uniform(states: usize) -> Prob {
    Array1::from_elem(states, 1f64 / states as f64)
}

/// Normalizes a vector in place so that it sums to one and returns the previous sum
///
/// # Notes
///
/// Fails with [`ErrorKind::NotNormalizable`] when the sum is zero or not finite
#[inline]
pub fn normalize(p: &mut Prob) -> DaiResult<f64> {
    let sum = p.sum();
    if sum == 0f64 || !sum.is_finite() {
        return Err(DaiError::new(
            ErrorKind::NotNormalizable,
            format!("vector of length {} sums to {}", p.len(), sum),
        ));
    }
    *p /= sum;
    Ok(sum)
}

/// Maximal entry of a vector, `-inf` for an empty one
#[inline]
pub fn max(p: &Prob) -> f64 {
    p.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// L-infinity distance between two vectors of equal length
#[inline]
pub fn dist_linf(lhs: &Prob, rhs: &Prob) -> f64 {
    lhs.iter()
        .zip(rhs)
        .fold(0f64, |acc, (l, r)| acc.max((l - r).abs()))
}

/// Kullback-Leibler divergence sum_x p(x) ln(p(x) / q(x))
///
/// # Notes
///
/// Terms with p(x) = 0 contribute nothing, `q` does not need to be normalized
#[inline]
pub fn dist_kl(p: &Prob, q: &Prob) -> f64 {
    p.iter().zip(q).fold(0f64, |acc, (p, q)| {
        if *p == 0f64 {
            acc
        } else {
            acc + p * (p.ln() - q.ln())
        }
    })
}

/// Shannon entropy (natural logarithm) of a normalized vector
#[inline]
pub fn entropy(p: &Prob) -> f64 {
    -p.iter()
        .filter(|x| **x > 0f64)
        .map(|x| x * x.ln())
        .sum::<f64>()
}

/// Converts a vector of logarithms into a normalized distribution,
/// subtracting the maximum first to avoid overflow
#[inline]
pub fn normalized_exp(log_p: &Prob) -> DaiResult<Prob> {
    let shift = max(log_p);
    let mut p = log_p.mapv(|x| (x - shift).exp());
    normalize(&mut p)?;
    Ok(p)
}
