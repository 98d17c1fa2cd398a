//! Constraint-based intersections: the generic polyhedral concatenation,
//! the zonotope/half-space fast paths, and the star/half-space append.

use log::debug;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::lp::{remove_redundant_constraints, DenseSimplex};
use crate::sets::halfspace::HalfSpace;
use crate::sets::polyhedron::HPoly;
use crate::sets::star::Star;
use crate::sets::zonotope::Zonotope;
use crate::sets::Set;

/// Generic polyhedral intersection: concatenate both constraint lists, prune
/// with the LP oracle, and classify the result.
///
/// The result is a polytope when either input is bounded (the intersection
/// inherits boundedness), a general polyhedron otherwise. An infeasible
/// system is the empty set, not an error.
pub fn polyhedral_pair(
    a: &Set,
    b: &Set,
    ca: Vec<HalfSpace>,
    cb: Vec<HalfSpace>,
    tol: Tol,
) -> Result<Set, SetError> {
    let dim = a.dim();
    let mut cs = ca;
    cs.extend(cb);
    debug!(
        "polyhedral intersection {} ∩ {}: {} candidate constraints",
        a.kind(),
        b.kind(),
        cs.len()
    );
    if !remove_redundant_constraints(&mut cs, &DenseSimplex, tol)? {
        return Ok(Set::empty(dim));
    }
    let hp = HPoly::from_constraints(dim, cs)?;
    Ok(if a.is_bounded() || b.is_bounded() {
        Set::HPolytope(hp)
    } else {
        Set::HPolyhedron(hp)
    })
}

/// Zonotope ∩ HalfSpace: test-then-compute.
///
/// Disjointness and inclusion are both single support-function evaluations,
/// so the LP-backed polyhedral computation only runs when the half-space
/// actually cuts the zonotope.
pub fn zonotope_halfspace(z: &Zonotope, h: &HalfSpace, tol: Tol) -> Result<Set, SetError> {
    // min over Z of n·x is -σ(-n); above c means disjoint.
    let min_val = -z.support_function(&-h.n.clone());
    if tol.gt(min_val, h.c) {
        return Ok(Set::empty(z.dim()));
    }
    // max over Z of n·x below c means Z is entirely inside.
    if tol.leq(z.support_function(&h.n), h.c) {
        return Ok(Set::Zonotope(z.clone()));
    }
    let Some(mut cs) = z.facet_constraints(tol) else {
        return Err(SetError::precondition(
            "zonotope generators do not span the ambient space",
        ));
    };
    cs.push(h.clone());
    if !remove_redundant_constraints(&mut cs, &DenseSimplex, tol)? {
        return Ok(Set::empty(z.dim()));
    }
    Ok(Set::HPolytope(HPoly::from_constraints(z.dim(), cs)?))
}

/// Star ∩ HalfSpace: the dispatcher's value-level wrapper around the
/// documented in-place mutator (clone, then append the pulled-back
/// constraint to the predicate).
pub fn star_halfspace(s: &Star, h: &HalfSpace, tol: Tol) -> Result<Set, SetError> {
    let mut out = s.clone();
    out.intersect_halfspace(h, tol)?;
    Ok(Set::Star(out))
}
