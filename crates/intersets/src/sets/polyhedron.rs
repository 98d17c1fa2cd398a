//! Polyhedra in R^n: constraint lists and vertex lists, with explicit
//! enumeration-based conversions.
//!
//! Conversions are deliberately combinatorial (n-subsets of constraints or
//! vertices) rather than delegated to an external polyhedral library: counts
//! are moderate in this crate's workloads and the explicit versions are easy
//! to audit. H→V solves each n-subset's equality system and filters by
//! feasibility; V→H enumerates supporting hyperplanes and orients them so
//! every vertex satisfies `n·x <= c`.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;

/// Polyhedron as a conjunction of half-space constraints.
///
/// The same storage backs both the bounded (`HPolytope`) and unbounded
/// (`HPolyhedron`) set variants; boundedness is a property of the wrapping
/// variant, not of this struct.
#[derive(Clone, Debug, PartialEq)]
pub struct HPoly {
    pub dim: usize,
    pub constraints: Vec<HalfSpace>,
}

impl HPoly {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            constraints: Vec::new(),
        }
    }

    pub fn from_constraints(dim: usize, constraints: Vec<HalfSpace>) -> Result<Self, SetError> {
        for c in &constraints {
            if c.dim() != dim {
                return Err(SetError::DimensionMismatch {
                    lhs: dim,
                    rhs: c.dim(),
                });
            }
        }
        Ok(Self { dim, constraints })
    }

    /// Append one constraint (in-place intersection with a half-space).
    pub fn add_constraint(&mut self, hs: HalfSpace) -> Result<(), SetError> {
        if hs.dim() != self.dim {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim,
                rhs: hs.dim(),
            });
        }
        self.constraints.push(hs);
        Ok(())
    }

    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> bool {
        self.constraints.iter().all(|c| c.satisfies(x, tol))
    }

    /// Vertex enumeration; meaningful for bounded, full-dimensional systems.
    pub fn vertices(&self, tol: Tol) -> Vec<DVector<f64>> {
        h_to_vertices(self.dim, &self.constraints, tol)
    }

    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        let constraints = self
            .constraints
            .iter()
            .map(|c| c.translate(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            dim: self.dim,
            constraints,
        })
    }
}

/// Polytope as the convex hull of an explicit vertex list.
#[derive(Clone, Debug, PartialEq)]
pub struct VPolytope {
    pub dim: usize,
    pub vertices: Vec<DVector<f64>>,
}

impl VPolytope {
    pub fn from_vertices(dim: usize, vertices: Vec<DVector<f64>>) -> Result<Self, SetError> {
        if vertices.is_empty() {
            return Err(SetError::precondition("VPolytope needs at least one vertex"));
        }
        for v in &vertices {
            if v.len() != dim {
                return Err(SetError::DimensionMismatch {
                    lhs: dim,
                    rhs: v.len(),
                });
            }
        }
        Ok(Self { dim, vertices })
    }

    /// Supporting-hyperplane enumeration of the facet constraints.
    pub fn facet_constraints(&self, tol: Tol) -> Vec<HalfSpace> {
        v_to_halfspaces(self.dim, &self.vertices, tol)
    }

    pub fn translate(&self, v: &DVector<f64>) -> Result<Self, SetError> {
        if v.len() != self.dim {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim,
                rhs: v.len(),
            });
        }
        Ok(Self {
            dim: self.dim,
            vertices: self.vertices.iter().map(|p| p + v).collect(),
        })
    }
}

/// H→V: enumerate n-subsets of constraints, solve the equality system, and
/// keep feasible solutions. O(C(m, n)); acceptable at this crate's scales.
pub fn h_to_vertices(dim: usize, cs: &[HalfSpace], tol: Tol) -> Vec<DVector<f64>> {
    let mut out: Vec<DVector<f64>> = Vec::new();
    if cs.len() < dim || dim == 0 {
        return out;
    }
    for comb in index_combinations(cs.len(), dim) {
        let a = DMatrix::from_fn(dim, dim, |r, c| cs[comb[r]].n[c]);
        let b = DVector::from_fn(dim, |r, _| cs[comb[r]].c);
        let lu = a.lu();
        if !lu.is_invertible() {
            continue;
        }
        if let Some(x) = lu.solve(&b) {
            // Feasibility filter with a looser slack: the solve itself can
            // leave residuals just above the comparison epsilon.
            let slack = Tol::with_eps(tol.eps * 100.0);
            if cs.iter().all(|c| c.satisfies(&x, slack)) {
                out.push(x);
            }
        }
    }
    dedup_points_in_place(&mut out, tol.eps.max(1e-9));
    out
}

/// V→H: enumerate supporting hyperplanes from n-subsets of vertices.
pub fn v_to_halfspaces(dim: usize, vs: &[DVector<f64>], tol: Tol) -> Vec<HalfSpace> {
    let mut hs: Vec<HalfSpace> = Vec::new();
    if vs.len() < dim + 1 || dim == 0 {
        return hs;
    }
    let mut seen: HashSet<Vec<i64>> = HashSet::new();
    for comb in index_combinations(vs.len(), dim) {
        let base = &vs[comb[0]];
        let diffs: Vec<DVector<f64>> = comb[1..].iter().map(|&i| &vs[i] - base).collect();
        let Some(n) = orthogonal_complement_vector(&diffs, dim, tol) else {
            continue;
        };
        let c = n.dot(base);
        let mut on_pos = false;
        let mut on_neg = false;
        for x in vs {
            let d = n.dot(x) - c;
            if d > tol.eps {
                on_pos = true;
            }
            if d < -tol.eps {
                on_neg = true;
            }
            if on_pos && on_neg {
                break;
            }
        }
        if on_pos && on_neg {
            continue;
        }
        let (n, c) = if on_pos { (-n, -c) } else { (n, c) };
        let key = quantize(&n, c, 1e-9);
        if seen.insert(key) {
            hs.push(HalfSpace::new(n, c));
        }
    }
    hs
}

/// Unit vector orthogonal to all `rows` in R^dim; `None` if the rows are
/// rank-deficient or already span the whole space.
pub(crate) fn orthogonal_complement_vector(
    rows: &[DVector<f64>],
    dim: usize,
    tol: Tol,
) -> Option<DVector<f64>> {
    if rows.len() + 1 > dim {
        return None;
    }
    // Gram-Schmidt over the rows; bail out on rank deficiency.
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(rows.len());
    for r in rows {
        let mut v = r.clone();
        for b in &basis {
            let proj = b.dot(&v);
            v -= b * proj;
        }
        let norm = v.norm();
        if norm < tol.eps.max(tol.eps_det * r.norm()) {
            return None;
        }
        basis.push(v / norm);
    }
    // First standard basis vector with a usable residual.
    for k in 0..dim {
        let mut trial = DVector::zeros(dim);
        trial[k] = 1.0;
        for b in &basis {
            let proj = b.dot(&trial);
            trial -= b * proj;
        }
        let norm = trial.norm();
        if norm > 1e-6 {
            return Some(trial / norm);
        }
    }
    None
}

/// Index combinations `k` out of `n`, ascending.
pub(crate) fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn rec(n: usize, k: usize, start: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            rec(n, k, i + 1, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    if k <= n {
        let mut cur = Vec::with_capacity(k);
        rec(n, k, 0, &mut cur, &mut out);
    }
    out
}

/// Sort lexicographically and drop near-duplicates.
pub(crate) fn dedup_points_in_place(points: &mut Vec<DVector<f64>>, eps: f64) {
    points.sort_by(|a, b| {
        for i in 0..a.len() {
            match a[i].partial_cmp(&b[i]).unwrap_or(std::cmp::Ordering::Equal) {
                std::cmp::Ordering::Equal => continue,
                o => return o,
            }
        }
        std::cmp::Ordering::Equal
    });
    points.dedup_by(|a, b| (a.clone() - b.clone()).norm() < eps);
}

fn quantize(n: &DVector<f64>, c: f64, grid: f64) -> Vec<i64> {
    let mut key: Vec<i64> = n.iter().map(|x| (x / grid).round() as i64).collect();
    key.push((c / grid).round() as i64);
    key
}
