//! Zonotopes: affine images of the unit cube.
//!
//! `Z = { center + G ξ : ξ in [-1, 1]^p }` with generators as the columns of
//! `G`. Support queries are closed-form; the exact H-representation comes
//! from combinatorial facet enumeration over (n-1)-subsets of generators and
//! is only available when the generators span the ambient space.

use nalgebra::{DMatrix, DVector};

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;
use crate::sets::polyhedron::{
    dedup_points_in_place, index_combinations, orthogonal_complement_vector,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Zonotope {
    pub center: DVector<f64>,
    /// One generator per column.
    pub generators: DMatrix<f64>,
}

impl Zonotope {
    pub fn new(center: DVector<f64>, generators: DMatrix<f64>) -> Result<Self, SetError> {
        if generators.nrows() != center.len() {
            return Err(SetError::DimensionMismatch {
                lhs: center.len(),
                rhs: generators.nrows(),
            });
        }
        Ok(Self { center, generators })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.generators.ncols()
    }

    /// `sup { d·x : x in Z } = d·c + sum_j |d·g_j|`.
    pub fn support_function(&self, d: &DVector<f64>) -> f64 {
        let mut acc = d.dot(&self.center);
        for j in 0..self.order() {
            acc += self.generators.column(j).dot(d).abs();
        }
        acc
    }

    /// Farthest point in direction `d` (ties resolved toward `+g_j`).
    pub fn support_vector(&self, d: &DVector<f64>) -> DVector<f64> {
        let mut x = self.center.clone();
        for j in 0..self.order() {
            let g = self.generators.column(j).clone_owned();
            if g.dot(d) >= 0.0 {
                x += g;
            } else {
                x -= g;
            }
        }
        x
    }

    /// Vertex candidates from sign enumeration (2^p points, deduped).
    pub fn vertices(&self, tol: Tol) -> Vec<DVector<f64>> {
        let p = self.order();
        let mut out = Vec::with_capacity(1usize << p.min(20));
        for mask in 0u64..(1u64 << p) {
            let mut x = self.center.clone();
            for j in 0..p {
                let g = self.generators.column(j).clone_owned();
                if mask & (1 << j) != 0 {
                    x += g;
                } else {
                    x -= g;
                }
            }
            out.push(x);
        }
        dedup_points_in_place(&mut out, tol.eps.max(1e-9));
        out
    }

    /// Exact facet constraints.
    ///
    /// For every (n-1)-subset of generators, the orthogonal direction `c`
    /// supports two parallel facets at offset `c·center ± sum_j |c·g_j|`.
    /// `None` when the generators do not span R^n (the zonotope is not
    /// full-dimensional and has no bounded H-representation).
    pub fn facet_constraints(&self, tol: Tol) -> Option<Vec<HalfSpace>> {
        let n = self.dim();
        let p = self.order();
        if n == 0 {
            return None;
        }
        if n == 1 {
            let half: f64 = (0..p).map(|j| self.generators.column(j)[0].abs()).sum();
            return Some(vec![
                HalfSpace::new(DVector::from_element(1, 1.0), self.center[0] + half),
                HalfSpace::new(DVector::from_element(1, -1.0), -(self.center[0] - half)),
            ]);
        }
        if p < n - 1 {
            return None;
        }
        let mut out: Vec<HalfSpace> = Vec::new();
        let mut seen: Vec<DVector<f64>> = Vec::new();
        for comb in index_combinations(p, n - 1) {
            let rows: Vec<DVector<f64>> = comb
                .iter()
                .map(|&j| self.generators.column(j).clone_owned())
                .collect();
            let Some(mut c) = orthogonal_complement_vector(&rows, n, tol) else {
                continue;
            };
            // Canonical sign: first significant component positive.
            if let Some(k) = (0..n).find(|&k| c[k].abs() > tol.eps) {
                if c[k] < 0.0 {
                    c = -c;
                }
            }
            if seen.iter().any(|s| (s - &c).norm() < 1e-9) {
                continue;
            }
            seen.push(c.clone());
            let spread: f64 = (0..p)
                .map(|j| self.generators.column(j).dot(&c).abs())
                .sum();
            let mid = c.dot(&self.center);
            out.push(HalfSpace::new(c.clone(), mid + spread));
            out.push(HalfSpace::new(-c, -(mid - spread)));
        }
        if out.is_empty() {
            return None;
        }
        // A spanning generator set produces at least 2n facets; fewer means
        // every subset was rank-deficient and the zonotope is degenerate.
        if out.len() < 2 * n {
            return None;
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
            generators: self.generators.clone(),
        })
    }
}
