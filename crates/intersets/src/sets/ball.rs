//! Euclidean (2-norm) balls.

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;

/// Closed ball `{ x : ||x - center||_2 <= radius }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub center: DVector<f64>,
    pub radius: f64,
}

impl Ball {
    pub fn new(center: DVector<f64>, radius: f64) -> Result<Self, SetError> {
        if radius < 0.0 {
            return Err(SetError::precondition(format!(
                "negative ball radius {}",
                radius
            )));
        }
        Ok(Self { center, radius })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> bool {
        tol.leq((x - &self.center).norm(), self.radius)
    }

    /// `sup { d·x : x in ball } = d·c + r ||d||`.
    pub fn support_function(&self, d: &DVector<f64>) -> f64 {
        d.dot(&self.center) + self.radius * d.norm()
    }

    /// Farthest point in direction `d`; the center for a near-zero direction.
    pub fn support_vector(&self, d: &DVector<f64>, tol: Tol) -> DVector<f64> {
        let norm = d.norm();
        if tol.is_zero(norm) {
            return self.center.clone();
        }
        &self.center + d * (self.radius / norm)
    }

    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        if v.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: v.len(),
            });
        }
        Ok(Self {
            center: &self.center + v,
            radius: self.radius,
        })
    }
}
