//! Two-dimensional lines and line segments.
//!
//! `Line2` shares the `n·x = c` storage of a hyperplane but is a distinct
//! type: the 2D intersection algorithms (determinant test, Cramer solve)
//! only exist in the plane.

use nalgebra::Vector2;

use crate::cfg::Tol;
use crate::error::SetError;

/// Line `{ x in R^2 : n·x = c }`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Line2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }

    /// Line through two distinct points.
    pub fn through(p: Vector2<f64>, q: Vector2<f64>, tol: Tol) -> Result<Self, SetError> {
        let d = q - p;
        if tol.is_zero(d.norm()) {
            return Err(SetError::precondition(
                "cannot build a line through coincident points",
            ));
        }
        // Normal is the 90° rotation of the direction.
        let n = Vector2::new(d.y, -d.x);
        Ok(Self { n, c: n.dot(&p) })
    }

    #[inline]
    pub fn satisfies(&self, p: Vector2<f64>, tol: Tol) -> bool {
        tol.approx_eq(self.n.dot(&p), self.c)
    }

    /// Same line as a set, up to scaling of `(n, c)`.
    pub fn same_line(&self, other: &Line2, tol: Tol) -> bool {
        let det = self.n.x * other.n.y - self.n.y * other.n.x;
        if det.abs() > tol.eps_det.max(tol.eps * self.n.norm() * other.n.norm()) {
            return false;
        }
        // Parallel; compare offsets after matching the scale of the normals.
        let (s, o) = if self.n.x.abs() >= self.n.y.abs() {
            (self.n.x, other.n.x)
        } else {
            (self.n.y, other.n.y)
        };
        if s.abs() <= tol.eps {
            return tol.is_zero(self.c) && tol.is_zero(other.c);
        }
        tol.approx_eq(self.c * o, other.c * s)
    }

    pub fn translate(&self, v: Vector2<f64>) -> Self {
        Self {
            n: self.n,
            c: self.c + self.n.dot(&v),
        }
    }
}

/// Closed segment between `p` and `q`; `p == q` is legal (a point).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment2 {
    pub p: Vector2<f64>,
    pub q: Vector2<f64>,
}

impl Segment2 {
    #[inline]
    pub fn new(p: Vector2<f64>, q: Vector2<f64>) -> Self {
        Self { p, q }
    }

    #[inline]
    pub fn is_degenerate(&self, tol: Tol) -> bool {
        tol.is_zero((self.q - self.p).norm())
    }

    /// The carrying line; `None` for a degenerate segment.
    pub fn line(&self, tol: Tol) -> Option<Line2> {
        Line2::through(self.p, self.q, tol).ok()
    }

    /// Axis-aligned bounding-interval membership; assumes `x` is on the
    /// carrying line when used as the second half of a containment test.
    pub fn in_bounds(&self, x: Vector2<f64>, tol: Tol) -> bool {
        let (lx, hx) = (self.p.x.min(self.q.x), self.p.x.max(self.q.x));
        let (ly, hy) = (self.p.y.min(self.q.y), self.p.y.max(self.q.y));
        tol.leq(lx, x.x) && tol.leq(x.x, hx) && tol.leq(ly, x.y) && tol.leq(x.y, hy)
    }

    pub fn contains(&self, x: Vector2<f64>, tol: Tol) -> bool {
        let d = self.q - self.p;
        let r = x - self.p;
        let cross = d.x * r.y - d.y * r.x;
        // Collinearity scaled by segment length so long segments stay robust.
        if cross.abs() > tol.eps * (1.0 + d.norm()) {
            return false;
        }
        self.in_bounds(x, tol)
    }

    pub fn length(&self) -> f64 {
        (self.q - self.p).norm()
    }

    pub fn translate(&self, v: Vector2<f64>) -> Self {
        Self {
            p: self.p + v,
            q: self.q + v,
        }
    }
}
