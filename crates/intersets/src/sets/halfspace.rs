//! Linear constraints in R^n: closed half-spaces and hyperplanes.
//!
//! Conventions
//! - A half-space is `{ x : n·x <= c }`; neither `n` nor `c` is normalized.
//!   A zero normal is legal and denotes either the universe (`c >= 0`) or the
//!   empty set (`c < 0`); algorithms branch on it explicitly.
//! - A hyperplane is `{ x : n·x = c }` with the same storage.

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;

/// Closed half-space `n · x <= c` in R^n.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfSpace {
    pub n: DVector<f64>,
    pub c: f64,
}

impl HalfSpace {
    #[inline]
    pub fn new(n: DVector<f64>, c: f64) -> Self {
        Self { n, c }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.n.len()
    }

    #[inline]
    pub fn satisfies(&self, p: &DVector<f64>, tol: Tol) -> bool {
        tol.leq(self.n.dot(p), self.c)
    }

    /// Complement boundary flipped: `{ x : -n·x <= -c }`.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            n: -self.n.clone(),
            c: -self.c,
        }
    }

    /// Shift by `v`: `{ x + v : n·x <= c } = { y : n·y <= c + n·v }`.
    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        if v.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: v.len(),
            });
        }
        Ok(Self {
            n: self.n.clone(),
            c: self.c + self.n.dot(v),
        })
    }
}

/// Hyperplane `n · x = c` in R^n.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperplane {
    pub n: DVector<f64>,
    pub c: f64,
}

impl Hyperplane {
    #[inline]
    pub fn new(n: DVector<f64>, c: f64) -> Self {
        Self { n, c }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.n.len()
    }

    #[inline]
    pub fn satisfies(&self, p: &DVector<f64>, tol: Tol) -> bool {
        tol.approx_eq(self.n.dot(p), self.c)
    }

    /// The two half-spaces whose conjunction is this hyperplane.
    pub fn as_constraints(&self) -> [HalfSpace; 2] {
        [
            HalfSpace::new(self.n.clone(), self.c),
            HalfSpace::new(-self.n.clone(), -self.c),
        ]
    }

    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        if v.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: v.len(),
            });
        }
        Ok(Self {
            n: self.n.clone(),
            c: self.c + self.n.dot(v),
        })
    }
}
