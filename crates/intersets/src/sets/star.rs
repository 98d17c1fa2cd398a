//! Star sets: an affine basis around a center, constrained by a predicate in
//! generator coordinates.
//!
//! `S = { center + basis·α : α ∈ predicate }`, with the predicate itself a
//! constraint-based set. Stars grow constraint-by-constraint in refinement
//! loops, which is why their half-space intersection is the one documented
//! in-place mutator in this crate.

use nalgebra::{DMatrix, DVector};

use crate::cfg::Tol;
use crate::error::SetError;
use crate::lp::{DenseSimplex, FeasibilityOracle};
use crate::sets::halfspace::HalfSpace;
use crate::sets::polygon::Hs2;
use crate::sets::Set;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub center: DVector<f64>,
    /// One basis generator per column.
    pub basis: DMatrix<f64>,
    /// Constraint-based set over the generator coordinates.
    pub predicate: Box<Set>,
}

impl Star {
    pub fn new(center: DVector<f64>, basis: DMatrix<f64>, predicate: Set) -> Result<Self, SetError> {
        if basis.nrows() != center.len() {
            return Err(SetError::DimensionMismatch {
                lhs: center.len(),
                rhs: basis.nrows(),
            });
        }
        if predicate.dim() != basis.ncols() {
            return Err(SetError::DimensionMismatch {
                lhs: basis.ncols(),
                rhs: predicate.dim(),
            });
        }
        if !matches!(
            predicate,
            Set::HPolytope(_) | Set::HPolyhedron(_) | Set::HPolygon(_)
        ) {
            return Err(SetError::precondition(
                "star predicate must be a constraint-based representation",
            ));
        }
        Ok(Self {
            center,
            basis,
            predicate: Box::new(predicate),
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// In-place intersection with a half-space.
    ///
    /// The half-space `a·x <= b` pulled back through `x = center + basis·α`
    /// becomes `(basisᵀa)·α <= b - a·center`, appended to the predicate.
    pub fn intersect_halfspace(&mut self, hs: &HalfSpace, tol: Tol) -> Result<(), SetError> {
        if hs.dim() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: hs.dim(),
            });
        }
        let a_local = self.basis.transpose() * &hs.n;
        let c_local = hs.c - hs.n.dot(&self.center);
        match self.predicate.as_mut() {
            Set::HPolytope(p) | Set::HPolyhedron(p) => {
                p.add_constraint(HalfSpace::new(a_local, c_local))
            }
            Set::HPolygon(p) => {
                p.insert_constraint(
                    Hs2::new(nalgebra::Vector2::new(a_local[0], a_local[1]), c_local),
                    tol,
                );
                Ok(())
            }
            other => Err(SetError::precondition(format!(
                "star predicate {} cannot take appended constraints",
                other.kind()
            ))),
        }
    }

    /// Membership: solve for generator coordinates.
    ///
    /// With an invertible basis the coordinates are unique; otherwise the
    /// question is an LP feasibility problem over the predicate constraints
    /// plus the equality `basis·α = x - center`.
    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> Result<bool, SetError> {
        if x.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: x.len(),
            });
        }
        let rhs = x - &self.center;
        if self.basis.is_square() {
            if let Some(inv) = self.basis.clone().try_inverse() {
                let alpha = inv * &rhs;
                return self.predicate.contains(&alpha, tol);
            }
        }
        let Some(mut cs) = self.predicate.constraints_list(tol) else {
            return Err(SetError::precondition(
                "star predicate has no constraint list",
            ));
        };
        let p = self.basis.ncols();
        for r in 0..self.dim() {
            let row = DVector::from_fn(p, |j, _| self.basis[(r, j)]);
            cs.push(HalfSpace::new(row.clone(), rhs[r]));
            cs.push(HalfSpace::new(-row, -rhs[r]));
        }
        DenseSimplex.is_feasible(&cs, tol)
    }

    /// Concrete constraint list in ambient coordinates, available when the
    /// basis is square and invertible.
    pub fn ambient_constraints(&self, tol: Tol) -> Option<Vec<HalfSpace>> {
        if !self.basis.is_square() {
            return None;
        }
        let inv = self.basis.clone().try_inverse()?;
        let local = self.predicate.constraints_list(tol)?;
        let mut out = Vec::with_capacity(local.len());
        for c in &local {
            // n·α <= d with α = inv·(x - center).
            let n_amb = inv.transpose() * &c.n;
            let off = c.c + n_amb.dot(&self.center);
            out.push(HalfSpace::new(n_amb, off));
        }
        Some(out)
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
            basis: self.basis.clone(),
            predicate: self.predicate.clone(),
        })
    }
}
