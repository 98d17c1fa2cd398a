//! Axis-aligned boxes and single points in R^n.

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;

/// Axis-aligned hyperrectangle with per-axis bounds.
///
/// Invariant: `lo.len() == hi.len()` and `lo[i] <= hi[i]` for all axes.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperrect {
    pub lo: DVector<f64>,
    pub hi: DVector<f64>,
}

impl Hyperrect {
    pub fn new(lo: DVector<f64>, hi: DVector<f64>) -> Result<Self, SetError> {
        if lo.len() != hi.len() {
            return Err(SetError::DimensionMismatch {
                lhs: lo.len(),
                rhs: hi.len(),
            });
        }
        for i in 0..lo.len() {
            if lo[i] > hi[i] {
                return Err(SetError::precondition(format!(
                    "box bounds out of order on axis {}: [{}, {}]",
                    i, lo[i], hi[i]
                )));
            }
        }
        Ok(Self { lo, hi })
    }

    /// Unit hypercube `[0, 1]^n`.
    pub fn unit(dim: usize) -> Self {
        Self {
            lo: DVector::zeros(dim),
            hi: DVector::from_element(dim, 1.0),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.lo.len()
    }

    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> bool {
        (0..self.dim()).all(|i| tol.leq(self.lo[i], x[i]) && tol.leq(x[i], self.hi[i]))
    }

    pub fn volume(&self) -> f64 {
        (0..self.dim()).map(|i| self.hi[i] - self.lo[i]).product()
    }

    /// The 2n facet constraints `x_i <= hi_i`, `-x_i <= -lo_i`.
    pub fn constraints(&self) -> Vec<HalfSpace> {
        let n = self.dim();
        let mut out = Vec::with_capacity(2 * n);
        for i in 0..n {
            let mut e = DVector::zeros(n);
            e[i] = 1.0;
            out.push(HalfSpace::new(e.clone(), self.hi[i]));
            e[i] = -1.0;
            out.push(HalfSpace::new(e, -self.lo[i]));
        }
        out
    }

    /// All 2^n corner points.
    pub fn vertices(&self) -> Vec<DVector<f64>> {
        let n = self.dim();
        let mut out = Vec::with_capacity(1 << n);
        for mask in 0u64..(1u64 << n) {
            let v = DVector::from_fn(n, |i, _| {
                if mask & (1 << i) != 0 {
                    self.hi[i]
                } else {
                    self.lo[i]
                }
            });
            out.push(v);
        }
        out
    }

    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        if v.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: v.len(),
            });
        }
        Ok(Self {
            lo: &self.lo + v,
            hi: &self.hi + v,
        })
    }
}

/// A single point of R^n.
#[derive(Clone, Debug, PartialEq)]
pub struct Singleton {
    pub element: DVector<f64>,
}

impl Singleton {
    #[inline]
    pub fn new(element: DVector<f64>) -> Self {
        Self { element }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.element.len()
    }

    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> bool {
        tol.approx_eq_vec(&self.element, x)
    }

    /// Degenerate box constraints pinning every axis.
    pub fn constraints(&self) -> Vec<HalfSpace> {
        let n = self.dim();
        let mut out = Vec::with_capacity(2 * n);
        for i in 0..n {
            let mut e = DVector::zeros(n);
            e[i] = 1.0;
            out.push(HalfSpace::new(e.clone(), self.element[i]));
            e[i] = -1.0;
            out.push(HalfSpace::new(e, -self.element[i]));
        }
        out
    }
}
