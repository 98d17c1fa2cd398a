//! Planar line and segment intersections.
//!
//! The line/line case drives everything: a 2x2 determinant classifies the
//! pair (crossing, parallel, identical) and Cramer's rule recovers the
//! crossing point. Segments are cast to their carrying lines and the result
//! is filtered through their bounding ranges.

use nalgebra::Vector2;

use crate::cfg::Tol;
use crate::sets::line2::{Line2, Segment2};
use crate::sets::Set;

/// Line2 ∩ Line2.
///
/// Near-zero determinant means parallel normals: identical lines come back
/// unchanged, distinct parallels are disjoint. Otherwise Cramer's rule gives
/// the unique crossing point.
pub fn line_line(x: &Line2, y: &Line2, tol: Tol) -> Set {
    let det = x.n.x * y.n.y - x.n.y * y.n.x;
    let scale = (x.n.norm() * y.n.norm()).max(1.0);
    if det.abs() <= tol.eps_det.max(tol.eps * scale) {
        return if x.same_line(y, tol) {
            Set::Line2(*x)
        } else {
            Set::empty(2)
        };
    }
    let px = (x.c * y.n.y - x.n.y * y.c) / det;
    let py = (x.n.x * y.c - x.c * y.n.x) / det;
    Set::point2(Vector2::new(px, py))
}

/// LineSegment ∩ Line2: cast the segment to a line and filter.
pub fn segment_line(s: &Segment2, l: &Line2, tol: Tol) -> Set {
    if s.is_degenerate(tol) {
        return if l.satisfies(s.p, tol) {
            Set::point2(s.p)
        } else {
            Set::empty(2)
        };
    }
    let carrier = s.line(tol).expect("non-degenerate segment has a line");
    match line_line(&carrier, l, tol) {
        // The whole segment lies on the line.
        Set::Line2(_) => Set::Segment2(*s),
        Set::Singleton(p) => {
            let pt = Vector2::new(p.element[0], p.element[1]);
            if s.in_bounds(pt, tol) {
                Set::point2(pt)
            } else {
                Set::empty(2)
            }
        }
        _ => Set::empty(2),
    }
}

/// LineSegment ∩ LineSegment.
///
/// Collinear segments overlap along their common direction: the projected
/// parameter ranges are intersected, a degenerate range is a single point,
/// and a crossed range is empty. Crossing carriers contribute their point
/// only when it lies inside both bounding ranges.
pub fn segment_segment(s: &Segment2, t: &Segment2, tol: Tol) -> Set {
    if s.is_degenerate(tol) {
        return if t.contains(s.p, tol) {
            Set::point2(s.p)
        } else {
            Set::empty(2)
        };
    }
    if t.is_degenerate(tol) {
        return if s.contains(t.p, tol) {
            Set::point2(t.p)
        } else {
            Set::empty(2)
        };
    }
    let ls = s.line(tol).expect("non-degenerate segment has a line");
    let lt = t.line(tol).expect("non-degenerate segment has a line");
    if ls.same_line(&lt, tol) {
        let u = (s.q - s.p).normalize();
        let (a1, b1) = sorted_pair(u.dot(&s.p), u.dot(&s.q));
        let (a2, b2) = sorted_pair(u.dot(&t.p), u.dot(&t.q));
        let lo = a1.max(a2);
        let hi = b1.min(b2);
        if tol.gt(lo, hi) {
            return Set::empty(2);
        }
        // Anchor at the projection of s.p onto the common line.
        let base = s.p - u * u.dot(&s.p);
        if tol.approx_eq(lo, hi) {
            return Set::point2(base + u * lo);
        }
        return Set::Segment2(Segment2::new(base + u * lo, base + u * hi));
    }
    match line_line(&ls, &lt, tol) {
        Set::Singleton(p) => {
            let pt = Vector2::new(p.element[0], p.element[1]);
            if s.in_bounds(pt, tol) && t.in_bounds(pt, tol) {
                Set::point2(pt)
            } else {
                Set::empty(2)
            }
        }
        _ => Set::empty(2),
    }
}

#[inline]
fn sorted_pair(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
