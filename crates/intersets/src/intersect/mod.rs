//! Pairwise intersection dispatcher.
//!
//! Resolution order, most to least specific:
//! 1. Dimension check, then the degenerate absorbers (`EmptySet` absorbs,
//!    `Universe` is the identity).
//! 2. Exact-structure pairs with a bespoke algorithm. Implementations are
//!    written for one argument order; commutativity is the dispatcher's job,
//!    so the swapped order is retried automatically.
//! 3. A generic constraint-concatenation path for any two polyhedral
//!    operands, then the support-function fallback for two bounded
//!    one-dimensional convex sets.
//! 4. `Unsupported`, naming both representation kinds.

pub mod boxes;
pub mod line2;
pub mod polygon;
pub mod polyhedron;
pub mod product;

use log::trace;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::hyperrect::Singleton;
use crate::sets::Set;

/// `intersection(a, b)` with the default tolerance.
pub fn intersection(a: &Set, b: &Set) -> Result<Set, SetError> {
    intersection_with(a, b, Tol::default())
}

/// `intersection(a, b)` with an explicit tolerance override.
pub fn intersection_with(a: &Set, b: &Set, tol: Tol) -> Result<Set, SetError> {
    if a.dim() != b.dim() {
        return Err(SetError::DimensionMismatch {
            lhs: a.dim(),
            rhs: b.dim(),
        });
    }
    // Degenerate absorbers short-circuit every algorithm.
    match (a, b) {
        (Set::Empty(e), _) | (_, Set::Empty(e)) => return Ok(Set::Empty(*e)),
        (Set::Universe(_), other) | (other, Set::Universe(_)) => return Ok((*other).clone()),
        _ => {}
    }
    // A singleton resolves by membership; this disambiguation explicitly
    // wins over any geometric algorithm the other operand would match.
    match (a, b) {
        (Set::Singleton(s), other) | (other, Set::Singleton(s)) => {
            return singleton_pair(s, other, tol)
        }
        _ => {}
    }
    if let Some(r) = intersect_ordered(a, b, tol)? {
        return Ok(r);
    }
    trace!("retrying {} ∩ {} in swapped order", a.kind(), b.kind());
    if let Some(r) = intersect_ordered(b, a, tol)? {
        return Ok(r);
    }
    // Generic polyhedral pair: concatenate constraint lists and prune. Runs
    // only after both argument orders failed to find a bespoke algorithm.
    if let (Some(ca), Some(cb)) = (a.constraints_list(tol), b.constraints_list(tol)) {
        return polyhedron::polyhedral_pair(a, b, ca, cb, tol);
    }
    if a.dim() == 1 && a.is_bounded() && b.is_bounded() && a.is_convex() && b.is_convex() {
        return boxes::one_dim_support(a, b, tol);
    }
    Err(SetError::Unsupported {
        lhs: a.kind(),
        rhs: b.kind(),
    })
}

/// One argument order of the pair dispatch; `Ok(None)` means "no algorithm
/// registered for this order".
fn intersect_ordered(a: &Set, b: &Set, tol: Tol) -> Result<Option<Set>, SetError> {
    let result = match (a, b) {
        (Set::Interval(x), Set::Interval(y)) => Some(boxes::interval_interval(x, y)),
        (Set::Interval(x), Set::HalfSpace(h)) => Some(boxes::interval_halfspace(x, h, tol)),
        (Set::Interval(x), Set::Hyperplane(h)) => Some(boxes::interval_hyperplane(x, h, tol)),
        (Set::Interval(x), Set::HPolytope(p)) | (Set::Interval(x), Set::HPolyhedron(p)) => {
            Some(boxes::interval_constraints(x, &p.constraints, tol))
        }

        (Set::Line2(x), Set::Line2(y)) => Some(line2::line_line(x, y, tol)),
        (Set::Segment2(s), Set::Line2(l)) => Some(line2::segment_line(s, l, tol)),
        (Set::Segment2(s), Set::Segment2(t)) => Some(line2::segment_segment(s, t, tol)),

        (Set::Hyperrect(x), Set::Hyperrect(y)) => Some(boxes::rect_rect(x, y)),
        (Set::Hyperrect(x), Set::HalfSpace(h)) => Some(boxes::rect_halfspace(x, h, tol)?),

        (Set::HPolygon(x), Set::HPolygon(y)) => Some(polygon::hpolygon_hpolygon(x, y, tol)?),
        (Set::VPolygon(x), Set::VPolygon(y)) => Some(polygon::vpolygon_vpolygon(x, y, tol)?),
        (Set::VPolytope(x), Set::VPolytope(y)) => {
            Some(polygon::vpolytope_vpolytope(x, y, tol)?)
        }

        (Set::Zonotope(z), Set::HalfSpace(h)) => Some(polyhedron::zonotope_halfspace(z, h, tol)?),
        (Set::Star(s), Set::HalfSpace(h)) => Some(polyhedron::star_halfspace(s, h, tol)?),

        // Lazy operands reduce structurally and re-enter the dispatcher.
        (Set::LinearMap(m), other) => {
            let materialized = m.materialize(tol)?;
            Some(intersection_with(&materialized, other, tol)?)
        }
        (Set::Union(u), other) => Some(product::union_pair(u, other, tol)?),
        (Set::UnionArray(u), other) => Some(product::union_array_pair(u, other, tol)?),

        (Set::Product(p), Set::Product(q)) => Some(product::product_product(p, q, tol)?),
        (Set::Product(p), other) => match other.constraints_list(tol) {
            Some(cs) => Some(product::product_polyhedron(p, other, cs, tol)?),
            None => None,
        },

        _ => None,
    };
    Ok(result)
}

fn singleton_pair(s: &Singleton, other: &Set, tol: Tol) -> Result<Set, SetError> {
    Ok(if other.contains(&s.element, tol)? {
        Set::Singleton(s.clone())
    } else {
        Set::empty(s.dim())
    })
}

#[cfg(test)]
mod tests;
