//! Polygons in the plane: ordered H-representation and V-representation.
//!
//! `HPolygon` keeps a strict constraint sequence: unit normals, sorted by
//! `atan2` angle, parallel directions coalesced to the tighter offset. The
//! ordering is what makes the linear-time constraint merge and the deque
//! feasibility sweep possible, so it is an invariant, not a convention.
//!
//! `VPolygon` keeps vertices in counterclockwise convex-hull order.

use std::collections::VecDeque;

use nalgebra::{Matrix2, Vector2};

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;

/// Closed half-plane `n · x <= c` in R^2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }

    #[inline]
    pub fn satisfies(&self, p: Vector2<f64>, tol: Tol) -> bool {
        tol.leq(self.n.dot(&p), self.c)
    }

    /// Lift into the n-dimensional constraint type (dimension 2).
    pub fn lift(&self) -> HalfSpace {
        HalfSpace::new(nalgebra::dvector![self.n.x, self.n.y], self.c)
    }
}

#[inline]
pub(crate) fn angle_of(n: Vector2<f64>) -> f64 {
    n.y.atan2(n.x)
}

/// Unit-normalize `(n, c)`; `None` for a numerically zero normal.
#[inline]
pub(crate) fn canonicalize_unit(n: Vector2<f64>, c: f64) -> Option<(Vector2<f64>, f64)> {
    let norm = n.norm();
    if !norm.is_finite() || norm <= 0.0 {
        return None;
    }
    Some((n / norm, c / norm))
}

pub(crate) fn push_or_coalesce(out: &mut Vec<Hs2>, n: Vector2<f64>, c: f64, tol: Tol) {
    if let Some(last) = out.last_mut() {
        if (last.n - n).norm() < tol.eps {
            if c < last.c {
                last.c = c;
            }
            return;
        }
    }
    out.push(Hs2::new(n, c));
}

/// Unique intersection point of two constraint boundaries, if any.
pub(crate) fn boundary_intersection(h1: Hs2, h2: Hs2, tol: Tol) -> Option<Vector2<f64>> {
    let a = Matrix2::new(h1.n.x, h1.n.y, h2.n.x, h2.n.y);
    let det = a.determinant();
    if det.abs() < tol.eps_det {
        return None;
    }
    let inv = a.try_inverse()?;
    Some(inv * Vector2::new(h1.c, h2.c))
}

/// Strict, angle-ordered H-representation of a planar polygon.
///
/// Invariants:
/// - Unit normals (`||n|| = 1`).
/// - Sorted by `atan2(n.y, n.x)` (stable).
/// - Parallel directions coalesced (tighter `c` wins).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HPolygon {
    pub hs: Vec<Hs2>,
}

/// Feasibility sweep outcome over an ordered constraint list.
#[derive(Clone, Debug)]
pub enum Sweep {
    Empty,
    Unbounded,
    Bounded {
        /// Indices of the constraints that remain active (irredundant).
        active: Vec<usize>,
        /// Polygon vertices in constraint order.
        vertices: Vec<Vector2<f64>>,
    },
}

impl HPolygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary half-planes, establishing the ordering invariant.
    pub fn from_constraints(hs: Vec<Hs2>, tol: Tol) -> Self {
        let mut out = Self::new();
        for h in hs {
            out.insert_constraint(h, tol);
        }
        out
    }

    /// Insert one constraint, preserving order and coalescing parallels.
    ///
    /// Binary search by angle; a parallel neighbor keeps the tighter offset.
    pub fn insert_constraint(&mut self, h: Hs2, tol: Tol) {
        let Some((n, c)) = canonicalize_unit(h.n, h.c) else {
            return;
        };
        let key = angle_of(n);
        let mut lo = 0usize;
        let mut hi = self.hs.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if angle_of(self.hs[mid].n) <= key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo > 0 && (self.hs[lo - 1].n - n).norm() < tol.eps {
            if c < self.hs[lo - 1].c {
                self.hs[lo - 1].c = c;
            }
            return;
        }
        if lo < self.hs.len() && (self.hs[lo].n - n).norm() < tol.eps {
            if c < self.hs[lo].c {
                self.hs[lo].c = c;
            }
            return;
        }
        self.hs.insert(lo, Hs2::new(n, c));
    }

    /// Check the angle ordering invariant (used as a merge precondition).
    pub fn is_sorted(&self) -> bool {
        self.hs
            .windows(2)
            .all(|w| angle_of(w[0].n) <= angle_of(w[1].n))
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>, tol: Tol) -> bool {
        self.hs.iter().all(|h| h.satisfies(p, tol))
    }

    /// Feasibility sweep over the ordered constraints.
    ///
    /// A deque pass drops constraints whose boundary corner violates a later
    /// constraint; the surviving deque is exactly the active constraint set,
    /// so the sweep doubles as 2D redundancy elimination. A contradiction
    /// between opposite parallel constraints is detected up front via the
    /// induced 1D interval.
    pub fn sweep(&self, tol: Tol) -> Sweep {
        let hs = &self.hs;
        if hs.is_empty() {
            return Sweep::Unbounded;
        }
        let angles: Vec<f64> = hs.iter().map(|h| angle_of(h.n)).collect();
        // Opposite parallel pair (n, -n): s = n·x lies in [-c2, c1], which is
        // empty as soon as -c2 exceeds c1.
        for (i, h) in hs.iter().enumerate() {
            let target = wrap_angle(angles[i] + std::f64::consts::PI);
            let mut lo = 0usize;
            let mut hi_idx = angles.len();
            while lo < hi_idx {
                let mid = (lo + hi_idx) / 2;
                if angles[mid] < target {
                    lo = mid + 1;
                } else {
                    hi_idx = mid;
                }
            }
            if lo < angles.len() && (angles[lo] - target).abs() < tol.eps {
                let c1 = h.c;
                let c2 = hs[lo].c;
                if (-c2).max(-c1) > c1.min(c2) + tol.eps {
                    return Sweep::Empty;
                }
            }
        }

        let mut dq: VecDeque<usize> = VecDeque::new();
        for i in 0..hs.len() {
            while dq.len() >= 2 {
                let l1 = dq[dq.len() - 2];
                let l2 = dq[dq.len() - 1];
                if let Some(p) = boundary_intersection(hs[l1], hs[l2], tol) {
                    if hs[i].satisfies(p, tol) {
                        break;
                    }
                }
                dq.pop_back();
            }
            while dq.len() >= 2 {
                let f1 = dq[0];
                let f2 = dq[1];
                if let Some(p) = boundary_intersection(hs[f1], hs[f2], tol) {
                    if hs[i].satisfies(p, tol) {
                        break;
                    }
                }
                dq.pop_front();
            }
            dq.push_back(i);
        }
        while dq.len() >= 3 {
            let l1 = dq[dq.len() - 2];
            let l2 = dq[dq.len() - 1];
            if let Some(p) = boundary_intersection(hs[l1], hs[l2], tol) {
                if hs[dq[0]].satisfies(p, tol) {
                    break;
                }
            }
            dq.pop_back();
        }
        while dq.len() >= 3 {
            let f1 = dq[0];
            let f2 = dq[1];
            if let Some(p) = boundary_intersection(hs[f1], hs[f2], tol) {
                if hs[dq[dq.len() - 1]].satisfies(p, tol) {
                    break;
                }
            }
            dq.pop_front();
        }
        if dq.is_empty() {
            return Sweep::Empty;
        }
        if dq.len() < 3 {
            return Sweep::Unbounded;
        }
        let m = dq.len();
        let mut vertices = Vec::with_capacity(m);
        for k in 0..m {
            let i1 = dq[k];
            let i2 = dq[(k + 1) % m];
            match boundary_intersection(hs[i1], hs[i2], tol) {
                Some(p) => vertices.push(p),
                None => return Sweep::Unbounded,
            }
        }
        Sweep::Bounded {
            active: dq.into_iter().collect(),
            vertices,
        }
    }

    /// Polygon vertices, when the constraint system is bounded and feasible.
    pub fn vertices(&self, tol: Tol) -> Option<Vec<Vector2<f64>>> {
        match self.sweep(tol) {
            Sweep::Bounded { vertices, .. } => Some(vertices),
            _ => None,
        }
    }

    /// Lifted n-dimensional constraint list.
    pub fn lifted_constraints(&self) -> Vec<HalfSpace> {
        self.hs.iter().map(Hs2::lift).collect()
    }

    /// Translation keeps normals (and therefore ordering) intact.
    pub fn translate(&self, v: Vector2<f64>) -> Self {
        Self {
            hs: self
                .hs
                .iter()
                .map(|h| Hs2::new(h.n, h.c + h.n.dot(&v)))
                .collect(),
        }
    }
}

#[inline]
pub(crate) fn wrap_angle(a: f64) -> f64 {
    let mut x = a;
    while x <= -std::f64::consts::PI {
        x += 2.0 * std::f64::consts::PI;
    }
    while x > std::f64::consts::PI {
        x -= 2.0 * std::f64::consts::PI;
    }
    x
}

#[inline]
pub(crate) fn cross2(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Andrew's monotone chain; returns the hull in CCW order.
///
/// Inputs with fewer than three distinct points come back as-is (deduped),
/// so degenerate clips can still be classified by the caller.
pub(crate) fn convex_hull(points: &[Vector2<f64>], tol: Tol) -> Vec<Vector2<f64>> {
    let mut pts: Vec<Vector2<f64>> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < tol.eps);
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross2(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross2(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        // All points collinear; keep the two extremes.
        let mut ends = vec![pts[0], pts[pts.len() - 1]];
        ends.dedup_by(|a, b| (*a - *b).norm() < tol.eps);
        return ends;
    }
    hull
}

/// Polygon in vertex representation, counterclockwise convex-hull order.
///
/// One or two vertices are legal degenerate forms (a point, a segment).
#[derive(Clone, Debug, PartialEq)]
pub struct VPolygon {
    pub vertices: Vec<Vector2<f64>>,
}

impl VPolygon {
    /// Build from arbitrary points, establishing the CCW hull invariant.
    pub fn from_points(points: &[Vector2<f64>], tol: Tol) -> Result<Self, SetError> {
        if points.is_empty() {
            return Err(SetError::precondition("VPolygon needs at least one vertex"));
        }
        Ok(Self {
            vertices: convex_hull(points, tol),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, p: Vector2<f64>, tol: Tol) -> bool {
        match self.vertices.len() {
            0 => false,
            1 => (self.vertices[0] - p).norm() <= tol.eps,
            2 => crate::sets::line2::Segment2::new(self.vertices[0], self.vertices[1])
                .contains(p, tol),
            m => (0..m).all(|i| {
                // Left-of test for every CCW edge, with slack.
                cross2(self.vertices[i], self.vertices[(i + 1) % m], p) >= -tol.eps
            }),
        }
    }

    /// Shoelace area (zero for degenerate polygons).
    pub fn area(&self) -> f64 {
        let m = self.vertices.len();
        if m < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..m {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % m];
            acc += a.x * b.y - a.y * b.x;
        }
        acc / 2.0
    }

    /// Outward edge constraints; `None` for degenerate polygons.
    pub fn edge_constraints(&self, tol: Tol) -> Option<Vec<Hs2>> {
        let m = self.vertices.len();
        if m < 3 {
            return None;
        }
        let mut hs = Vec::with_capacity(m);
        for k in 0..m {
            let p = self.vertices[k];
            let q = self.vertices[(k + 1) % m];
            let edge = q - p;
            // CCW order: outward normal is the 90° clockwise rotation.
            let n = Vector2::new(edge.y, -edge.x);
            if let Some((nn, cc)) = canonicalize_unit(n, n.dot(&p)) {
                hs.push(Hs2::new(nn, cc));
            }
        }
        Some(hs)
    }

    pub fn translate(&self, v: Vector2<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|p| p + v).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn unit_square(tol: Tol) -> HPolygon {
        HPolygon::from_constraints(
            vec![
                Hs2::new(vector![1.0, 0.0], 1.0),
                Hs2::new(vector![-1.0, 0.0], 0.0),
                Hs2::new(vector![0.0, 1.0], 1.0),
                Hs2::new(vector![0.0, -1.0], 0.0),
            ],
            tol,
        )
    }

    #[test]
    fn insert_keeps_order_and_coalesces() {
        let tol = Tol::default();
        let mut p = unit_square(tol);
        assert!(p.is_sorted());
        assert_eq!(p.hs.len(), 4);
        // A looser parallel constraint is absorbed, a tighter one wins.
        p.insert_constraint(Hs2::new(vector![2.0, 0.0], 4.0), tol);
        assert_eq!(p.hs.len(), 4);
        p.insert_constraint(Hs2::new(vector![3.0, 0.0], 1.5), tol);
        assert_eq!(p.hs.len(), 4);
        assert!(p.contains(vector![0.5, 0.5], tol));
        assert!(!p.contains(vector![0.7, 0.5], tol));
    }

    #[test]
    fn sweep_detects_contradiction_and_vertices() {
        let tol = Tol::default();
        let mut p = HPolygon::new();
        p.insert_constraint(Hs2::new(vector![1.0, 0.0], 0.0), tol);
        p.insert_constraint(Hs2::new(vector![-1.0, 0.0], -1.0), tol);
        assert!(matches!(p.sweep(tol), Sweep::Empty));

        let q = unit_square(tol);
        match q.sweep(tol) {
            Sweep::Bounded { active, vertices } => {
                assert_eq!(active.len(), 4);
                assert_eq!(vertices.len(), 4);
            }
            other => panic!("expected bounded sweep, got {:?}", other),
        }
    }

    #[test]
    fn hull_and_area() {
        let tol = Tol::default();
        let poly = VPolygon::from_points(
            &[
                vector![0.0, 0.0],
                vector![1.0, 0.0],
                vector![1.0, 1.0],
                vector![0.0, 1.0],
                vector![0.5, 0.5],
            ],
            tol,
        )
        .unwrap();
        assert_eq!(poly.len(), 4);
        assert!((poly.area() - 1.0).abs() < 1e-12);
        assert!(poly.contains(vector![0.5, 0.5], tol));
        assert!(!poly.contains(vector![1.5, 0.5], tol));
    }
}
