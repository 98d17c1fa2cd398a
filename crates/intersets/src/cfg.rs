//! Numeric tolerance kernel.
//!
//! - `Tol`: centralizes the absolute epsilon and the determinant epsilon used
//!   by every approximate comparison in the crate.
//! - The crate-wide default is `Tol::default()`; every public query has a
//!   `*_with` variant that accepts an explicit `Tol` for per-call overrides.
//!
//! Comparison conventions
//! - `leq`/`geq` are permissive (enlarge the feasible side by `eps`).
//! - `lt`/`gt` are strict (shrink by `eps`); use them to certify separation.

use nalgebra::DVector;

/// Tolerance configuration.
///
/// `eps` guards feasibility and equality checks; `eps_det` guards determinant
/// and rank decisions, which degrade at a different scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tol {
    pub eps: f64,
    pub eps_det: f64,
}

impl Default for Tol {
    fn default() -> Self {
        Self {
            eps: 1e-9,
            eps_det: 1e-12,
        }
    }
}

impl Tol {
    /// Override the feasibility epsilon, keeping the determinant epsilon.
    pub fn with_eps(eps: f64) -> Self {
        Self {
            eps,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_zero(&self, x: f64) -> bool {
        x.abs() <= self.eps
    }

    #[inline]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[inline]
    pub fn leq(&self, a: f64, b: f64) -> bool {
        a <= b + self.eps
    }

    #[inline]
    pub fn geq(&self, a: f64, b: f64) -> bool {
        a + self.eps >= b
    }

    #[inline]
    pub fn lt(&self, a: f64, b: f64) -> bool {
        a < b - self.eps
    }

    #[inline]
    pub fn gt(&self, a: f64, b: f64) -> bool {
        a > b + self.eps
    }

    /// True when every component of `v` is within `eps` of zero.
    #[inline]
    pub fn is_zero_vec(&self, v: &DVector<f64>) -> bool {
        v.iter().all(|x| x.abs() <= self.eps)
    }

    /// Componentwise approximate equality of two vectors of the same length.
    #[inline]
    pub fn approx_eq_vec(&self, a: &DVector<f64>, b: &DVector<f64>) -> bool {
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= self.eps)
    }
}
