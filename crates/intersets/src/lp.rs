//! Feasibility/LP oracle and redundancy elimination.
//!
//! The intersection algorithms consume the oracle through the
//! `FeasibilityOracle` trait so solver backends stay swappable. The default
//! backend is a dense two-phase simplex with Bland's rule: problem sizes in
//! this crate are small (tens of constraints, single-digit dimensions), so a
//! plain tableau is simpler to audit than a sparse solver and terminates by
//! construction.
//!
//! Policy: infeasibility is a *normal* outcome, reported in-band
//! (`LpStatus::Infeasible` / `Ok(false)`); anything else that goes wrong in
//! the backend is a fatal `SetError::Solver`.

use log::trace;
use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;

/// Outcome of maximizing a linear objective over a constraint list.
#[derive(Clone, Debug)]
pub enum LpStatus {
    Optimal { value: f64, point: DVector<f64> },
    Infeasible,
    Unbounded,
}

/// External feasibility/LP oracle used by redundancy elimination and by the
/// generic polyhedral intersection.
pub trait FeasibilityOracle {
    /// Maximize `objective · x` subject to `c.n · x <= c.c` for all `c`.
    fn maximize(
        &self,
        objective: &DVector<f64>,
        constraints: &[HalfSpace],
        tol: Tol,
    ) -> Result<LpStatus, SetError>;

    /// Is the constraint system feasible at all?
    fn is_feasible(&self, constraints: &[HalfSpace], tol: Tol) -> Result<bool, SetError> {
        let n = constraints.first().map(|c| c.dim()).unwrap_or(0);
        match self.maximize(&DVector::zeros(n), constraints, tol)? {
            LpStatus::Infeasible => Ok(false),
            _ => Ok(true),
        }
    }

    /// Is constraint `idx` implied by the remaining ones?
    fn is_redundant(
        &self,
        constraints: &[HalfSpace],
        idx: usize,
        tol: Tol,
    ) -> Result<bool, SetError> {
        let others: Vec<HalfSpace> = constraints
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, c)| c.clone())
            .collect();
        match self.maximize(&constraints[idx].n, &others, tol)? {
            LpStatus::Optimal { value, .. } => Ok(tol.leq(value, constraints[idx].c)),
            // Unbounded above in this direction: the constraint bites.
            LpStatus::Unbounded => Ok(false),
            // The remainder is already infeasible; keep the constraint and
            // let the caller's feasibility pass decide.
            LpStatus::Infeasible => Ok(false),
        }
    }
}

/// Default backend: dense two-phase simplex, Bland's rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenseSimplex;

/// Pivot threshold; below this a tableau entry is treated as zero.
const PIVOT_EPS: f64 = 1e-11;

struct Tableau {
    /// m rows of `cols` coefficients plus the rhs appended last.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    cols: usize,
}

impl Tableau {
    fn pivot(&mut self, row: usize, col: usize) {
        let piv = self.rows[row][col];
        let inv = 1.0 / piv;
        for x in self.rows[row].iter_mut() {
            *x *= inv;
        }
        let pivot_row = self.rows[row].clone();
        for (r, other) in self.rows.iter_mut().enumerate() {
            if r == row {
                continue;
            }
            let factor = other[col];
            if factor.abs() > 0.0 {
                for (j, x) in other.iter_mut().enumerate() {
                    *x -= factor * pivot_row[j];
                }
            }
        }
        self.basis[row] = col;
    }

    /// Minimize `cost · vars` from the current basis. Returns `false` when
    /// the problem is unbounded below.
    fn minimize(&mut self, cost: &[f64], allowed_cols: usize) -> Result<bool, SetError> {
        let m = self.rows.len();
        let max_iters = 100 * (self.cols + m) + 100;
        for _ in 0..max_iters {
            // Reduced costs from scratch: slower, but immune to drift.
            let mut entering = None;
            for j in 0..allowed_cols {
                let mut r = cost[j];
                for (i, row) in self.rows.iter().enumerate() {
                    r -= cost[self.basis[i]] * row[j];
                }
                if r < -PIVOT_EPS.max(1e-9) {
                    entering = Some(j);
                    break; // Bland: first improving index.
                }
            }
            let Some(e) = entering else {
                return Ok(true);
            };
            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[e];
                if a > PIVOT_EPS {
                    let ratio = row[self.cols] / a;
                    match leaving {
                        None => leaving = Some((i, ratio)),
                        Some((li, lr)) => {
                            if ratio < lr - PIVOT_EPS
                                || (ratio < lr + PIVOT_EPS && self.basis[i] < self.basis[li])
                            {
                                leaving = Some((i, ratio));
                            }
                        }
                    }
                }
            }
            let Some((l, _)) = leaving else {
                return Ok(false);
            };
            self.pivot(l, e);
        }
        Err(SetError::solver("simplex iteration limit exceeded"))
    }

    fn basic_value(&self, var: usize) -> f64 {
        for (i, &b) in self.basis.iter().enumerate() {
            if b == var {
                return self.rows[i][self.cols];
            }
        }
        0.0
    }
}

impl FeasibilityOracle for DenseSimplex {
    fn maximize(
        &self,
        objective: &DVector<f64>,
        constraints: &[HalfSpace],
        tol: Tol,
    ) -> Result<LpStatus, SetError> {
        let n = objective.len();
        let m = constraints.len();
        if m == 0 {
            return Ok(if tol.is_zero_vec(objective) {
                LpStatus::Optimal {
                    value: 0.0,
                    point: DVector::zeros(n),
                }
            } else {
                LpStatus::Unbounded
            });
        }
        for c in constraints {
            if c.dim() != n {
                return Err(SetError::DimensionMismatch {
                    lhs: n,
                    rhs: c.dim(),
                });
            }
        }
        if n == 0 {
            // Zero variables: feasible iff every offset is nonnegative.
            return Ok(if constraints.iter().all(|c| tol.geq(c.c, 0.0)) {
                LpStatus::Optimal {
                    value: 0.0,
                    point: DVector::zeros(0),
                }
            } else {
                LpStatus::Infeasible
            });
        }

        // Free variables split as x = u - w; one slack per row; artificials
        // for rows whose rhs had to be negated.
        let slack0 = 2 * n;
        let art0 = 2 * n + m;
        let mut art_count = 0usize;
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(m);
        let mut basis: Vec<usize> = Vec::with_capacity(m);
        let mut needs_art: Vec<bool> = Vec::with_capacity(m);
        for (i, c) in constraints.iter().enumerate() {
            let neg = c.c < 0.0;
            let sgn = if neg { -1.0 } else { 1.0 };
            let mut row = vec![0.0; art0 + 1];
            for j in 0..n {
                row[j] = sgn * c.n[j];
                row[n + j] = -sgn * c.n[j];
            }
            row[slack0 + i] = sgn;
            row[art0] = sgn * c.c;
            rows.push(row);
            needs_art.push(neg);
            if neg {
                art_count += 1;
            }
            basis.push(slack0 + i);
        }
        // Widen rows for the artificial columns, rhs stays last.
        let cols = art0 + art_count;
        let mut next_art = art0;
        for (i, row) in rows.iter_mut().enumerate() {
            let rhs = row.pop().expect("rhs column");
            row.resize(cols, 0.0);
            row.push(rhs);
            if needs_art[i] {
                row[next_art] = 1.0;
                basis[i] = next_art;
                next_art += 1;
            }
        }
        let mut t = Tableau { rows, basis, cols };

        if art_count > 0 {
            let mut phase1 = vec![0.0; cols];
            for j in art0..cols {
                phase1[j] = 1.0;
            }
            if !t.minimize(&phase1, cols)? {
                return Err(SetError::solver("phase-1 objective unbounded"));
            }
            let z1: f64 = (0..t.rows.len())
                .map(|i| phase1[t.basis[i]] * t.rows[i][t.cols])
                .sum();
            if z1 > tol.eps {
                return Ok(LpStatus::Infeasible);
            }
            // Drive any leftover artificial out of the basis; an all-zero
            // row is a redundant constraint and can be dropped.
            let mut i = 0;
            while i < t.rows.len() {
                if t.basis[i] >= art0 {
                    let pivot_col = (0..art0).find(|&j| t.rows[i][j].abs() > PIVOT_EPS);
                    match pivot_col {
                        Some(j) => t.pivot(i, j),
                        None => {
                            t.rows.remove(i);
                            t.basis.remove(i);
                            continue;
                        }
                    }
                }
                i += 1;
            }
        }

        // Phase 2: minimize -objective over the original columns only.
        let mut phase2 = vec![0.0; cols];
        for j in 0..n {
            phase2[j] = -objective[j];
            phase2[n + j] = objective[j];
        }
        if !t.minimize(&phase2, art0)? {
            return Ok(LpStatus::Unbounded);
        }
        let point = DVector::from_fn(n, |j, _| t.basic_value(j) - t.basic_value(n + j));
        let value = objective.dot(&point);
        Ok(LpStatus::Optimal { value, point })
    }
}

/// Remove every constraint not needed to define the feasible region.
///
/// Returns `Ok(false)` when the system is infeasible (the caller maps this
/// to the empty set) and `Ok(true)` after pruning in place. Zero-normal
/// constraints are resolved up front: nonnegative offsets are universally
/// true, negative ones make the whole system infeasible.
pub fn remove_redundant_constraints(
    cs: &mut Vec<HalfSpace>,
    oracle: &dyn FeasibilityOracle,
    tol: Tol,
) -> Result<bool, SetError> {
    if cs
        .iter()
        .any(|c| tol.is_zero_vec(&c.n) && tol.lt(c.c, 0.0))
    {
        return Ok(false);
    }
    cs.retain(|c| !tol.is_zero_vec(&c.n));
    if cs.is_empty() {
        return Ok(true);
    }
    if !oracle.is_feasible(cs, tol)? {
        return Ok(false);
    }
    let mut i = 0;
    while i < cs.len() {
        if cs.len() == 1 {
            break;
        }
        if oracle.is_redundant(cs, i, tol)? {
            trace!("dropping redundant constraint {}", i);
            cs.remove(i);
        } else {
            i += 1;
        }
    }
    Ok(true)
}

/// Vertex-representation analogue: drop vertices inside the hull of the
/// remaining ones. 2D inputs use the monotone chain directly; higher
/// dimensions ask the oracle one hull-membership LP per vertex.
pub fn remove_redundant_vertices(
    vertices: &mut Vec<DVector<f64>>,
    oracle: &dyn FeasibilityOracle,
    tol: Tol,
) -> Result<(), SetError> {
    let Some(first) = vertices.first() else {
        return Ok(());
    };
    let dim = first.len();
    if dim == 2 {
        let pts: Vec<nalgebra::Vector2<f64>> = vertices
            .iter()
            .map(|v| nalgebra::Vector2::new(v[0], v[1]))
            .collect();
        let hull = crate::sets::polygon::convex_hull(&pts, tol);
        *vertices = hull
            .into_iter()
            .map(|p| nalgebra::dvector![p.x, p.y])
            .collect();
        return Ok(());
    }
    let mut i = 0;
    while i < vertices.len() {
        if vertices.len() == 1 {
            break;
        }
        let v = vertices[i].clone();
        let others: Vec<DVector<f64>> = vertices
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.clone())
            .collect();
        if in_convex_hull(&v, &others, oracle, tol)? {
            vertices.remove(i);
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Hull membership as LP feasibility over combination weights.
fn in_convex_hull(
    x: &DVector<f64>,
    points: &[DVector<f64>],
    oracle: &dyn FeasibilityOracle,
    tol: Tol,
) -> Result<bool, SetError> {
    let k = points.len();
    let dim = x.len();
    let mut cs: Vec<HalfSpace> = Vec::with_capacity(2 * dim + 2 + k);
    for d in 0..dim {
        let row = DVector::from_fn(k, |j, _| points[j][d]);
        cs.push(HalfSpace::new(row.clone(), x[d]));
        cs.push(HalfSpace::new(-row, -x[d]));
    }
    let ones = DVector::from_element(k, 1.0);
    cs.push(HalfSpace::new(ones.clone(), 1.0));
    cs.push(HalfSpace::new(-ones, -1.0));
    for j in 0..k {
        let mut e = DVector::zeros(k);
        e[j] = -1.0;
        cs.push(HalfSpace::new(e, 0.0));
    }
    oracle.is_feasible(&cs, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn square() -> Vec<HalfSpace> {
        vec![
            HalfSpace::new(dvector![1.0, 0.0], 1.0),
            HalfSpace::new(dvector![-1.0, 0.0], 0.0),
            HalfSpace::new(dvector![0.0, 1.0], 1.0),
            HalfSpace::new(dvector![0.0, -1.0], 0.0),
        ]
    }

    #[test]
    fn maximize_over_unit_square() {
        let tol = Tol::default();
        let status = DenseSimplex
            .maximize(&dvector![1.0, 2.0], &square(), tol)
            .unwrap();
        match status {
            LpStatus::Optimal { value, point } => {
                assert!((value - 3.0).abs() < 1e-7);
                assert!((point - dvector![1.0, 1.0]).norm() < 1e-7);
            }
            other => panic!("expected optimum, got {:?}", other),
        }
    }

    #[test]
    fn negative_rhs_needs_phase_one() {
        let tol = Tol::default();
        // 1 <= x <= 2 encoded with a negative offset.
        let cs = vec![
            HalfSpace::new(dvector![-1.0], -1.0),
            HalfSpace::new(dvector![1.0], 2.0),
        ];
        match DenseSimplex.maximize(&dvector![-1.0], &cs, tol).unwrap() {
            LpStatus::Optimal { value, .. } => assert!((value + 1.0).abs() < 1e-7),
            other => panic!("expected optimum, got {:?}", other),
        }
    }

    #[test]
    fn detects_infeasible_and_unbounded() {
        let tol = Tol::default();
        let contradiction = vec![
            HalfSpace::new(dvector![1.0], 0.0),
            HalfSpace::new(dvector![-1.0], -1.0),
        ];
        assert!(matches!(
            DenseSimplex
                .maximize(&dvector![1.0], &contradiction, tol)
                .unwrap(),
            LpStatus::Infeasible
        ));
        let half = vec![HalfSpace::new(dvector![-1.0], 0.0)];
        assert!(matches!(
            DenseSimplex.maximize(&dvector![1.0], &half, tol).unwrap(),
            LpStatus::Unbounded
        ));
    }

    #[test]
    fn prunes_redundant_constraint() {
        let tol = Tol::default();
        let mut cs = square();
        cs.push(HalfSpace::new(dvector![1.0, 1.0], 5.0));
        assert!(remove_redundant_constraints(&mut cs, &DenseSimplex, tol).unwrap());
        assert_eq!(cs.len(), 4);

        let mut contradiction = vec![
            HalfSpace::new(dvector![1.0, 0.0], 0.0),
            HalfSpace::new(dvector![-1.0, 0.0], -1.0),
        ];
        assert!(!remove_redundant_constraints(&mut contradiction, &DenseSimplex, tol).unwrap());
    }

    #[test]
    fn vertex_pruning_keeps_hull() {
        let tol = Tol::default();
        let mut vs = vec![
            dvector![0.0, 0.0, 0.0],
            dvector![1.0, 0.0, 0.0],
            dvector![0.0, 1.0, 0.0],
            dvector![0.0, 0.0, 1.0],
            dvector![0.25, 0.25, 0.25],
        ];
        remove_redundant_vertices(&mut vs, &DenseSimplex, tol).unwrap();
        assert_eq!(vs.len(), 4);
    }
}
