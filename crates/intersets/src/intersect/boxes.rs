//! Interval and hyperrectangle intersections, plus the generic 1D
//! support-function fallback.

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::lp::{remove_redundant_constraints, DenseSimplex};
use crate::sets::halfspace::{HalfSpace, Hyperplane};
use crate::sets::hyperrect::Hyperrect;
use crate::sets::interval::Interval;
use crate::sets::polyhedron::HPoly;
use crate::sets::Set;

/// Interval ∩ Interval: clip both bounds; crossed bounds mean disjoint.
pub fn interval_interval(x: &Interval, y: &Interval) -> Set {
    let lo = x.lo.max(y.lo);
    let hi = x.hi.min(y.hi);
    if hi < lo {
        Set::empty(1)
    } else {
        Set::Interval(Interval { lo, hi })
    }
}

/// Interval ∩ HalfSpace in 1D.
///
/// A numerically zero normal makes the half-space trivial: universal for a
/// nonnegative offset, empty otherwise. Otherwise the boundary `c/a` clips
/// the upper or lower bound depending on the sign of `a`.
pub fn interval_halfspace(x: &Interval, h: &HalfSpace, tol: Tol) -> Set {
    let a = h.n[0];
    if tol.is_zero(a) {
        return if tol.geq(h.c, 0.0) {
            Set::Interval(*x)
        } else {
            Set::empty(1)
        };
    }
    let boundary = h.c / a;
    if a > 0.0 {
        let hi = x.hi.min(boundary);
        if hi < x.lo {
            Set::empty(1)
        } else {
            Set::Interval(Interval { lo: x.lo, hi })
        }
    } else {
        let lo = x.lo.max(boundary);
        if lo > x.hi {
            Set::empty(1)
        } else {
            Set::Interval(Interval { lo, hi: x.hi })
        }
    }
}

/// Interval ∩ Hyperplane in 1D: at most the single boundary point.
pub fn interval_hyperplane(x: &Interval, h: &Hyperplane, tol: Tol) -> Set {
    let a = h.n[0];
    if tol.is_zero(a) {
        return if tol.is_zero(h.c) {
            Set::Interval(*x)
        } else {
            Set::empty(1)
        };
    }
    let p = h.c / a;
    if x.contains(p, tol) {
        Set::Singleton(crate::sets::Singleton::new(nalgebra::dvector![p]))
    } else {
        Set::empty(1)
    }
}

/// Interval ∩ a 1D constraint list: sequential clips.
pub fn interval_constraints(x: &Interval, cs: &[HalfSpace], tol: Tol) -> Set {
    let mut cur = *x;
    for c in cs {
        match interval_halfspace(&cur, c, tol) {
            Set::Interval(next) => cur = next,
            other => return other,
        }
    }
    Set::Interval(cur)
}

/// Hyperrect ∩ Hyperrect: per-axis clip; any crossed axis is disjointness.
pub fn rect_rect(x: &Hyperrect, y: &Hyperrect) -> Set {
    let n = x.dim();
    let mut lo = DVector::zeros(n);
    let mut hi = DVector::zeros(n);
    for i in 0..n {
        lo[i] = x.lo[i].max(y.lo[i]);
        hi[i] = x.hi[i].min(y.hi[i]);
        if hi[i] < lo[i] {
            return Set::empty(n);
        }
    }
    Set::Hyperrect(Hyperrect { lo, hi })
}

/// Hyperrect ∩ HalfSpace: cheap support tests first, polyhedral fallback.
///
/// Subset (box entirely inside) returns the box unchanged; disjointness
/// returns empty; only the genuinely cut case pays for the LP pruning.
pub fn rect_halfspace(x: &Hyperrect, h: &HalfSpace, tol: Tol) -> Result<Set, SetError> {
    let n = x.dim();
    let mut hi_support = 0.0;
    let mut lo_support = 0.0;
    for i in 0..n {
        if h.n[i] >= 0.0 {
            hi_support += h.n[i] * x.hi[i];
            lo_support += h.n[i] * x.lo[i];
        } else {
            hi_support += h.n[i] * x.lo[i];
            lo_support += h.n[i] * x.hi[i];
        }
    }
    if tol.leq(hi_support, h.c) {
        return Ok(Set::Hyperrect(x.clone()));
    }
    if tol.gt(lo_support, h.c) {
        return Ok(Set::empty(n));
    }
    let mut cs = x.constraints();
    cs.push(h.clone());
    if !remove_redundant_constraints(&mut cs, &DenseSimplex, tol)? {
        return Ok(Set::empty(n));
    }
    Ok(Set::HPolytope(HPoly::from_constraints(n, cs)?))
}

/// Generic fallback for two bounded one-dimensional convex sets: both bounds
/// come from two support-function evaluations per operand.
pub fn one_dim_support(a: &Set, b: &Set, tol: Tol) -> Result<Set, SetError> {
    let plus = nalgebra::dvector![1.0];
    let minus = nalgebra::dvector![-1.0];
    let hi = a
        .support_function(&plus, tol)?
        .min(b.support_function(&plus, tol)?);
    let lo = (-a.support_function(&minus, tol)?).max(-b.support_function(&minus, tol)?);
    if tol.gt(lo, hi) {
        return Ok(Set::empty(1));
    }
    if lo > hi {
        // Within tolerance but numerically crossed: collapse to the midpoint.
        let mid = (lo + hi) / 2.0;
        return Ok(Set::Interval(Interval { lo: mid, hi: mid }));
    }
    Ok(Set::Interval(Interval { lo, hi }))
}
