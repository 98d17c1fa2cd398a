//! Structural intersections: Cartesian product arrays and unions.

use std::sync::Arc;

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::intersect::intersection_with;
use crate::sets::halfspace::HalfSpace;
use crate::sets::lazy::{CartesianProductArray, UnionSet, UnionSetArray};
use crate::sets::polyhedron::HPoly;
use crate::sets::Set;

/// Product ∩ Product with identical block structure: blockwise.
///
/// Valid because corresponding blocks live in disjoint dimension ranges; a
/// structure mismatch is a precondition violation, not a fallback case. Any
/// empty block empties the whole product.
pub fn product_product(
    p: &CartesianProductArray,
    q: &CartesianProductArray,
    tol: Tol,
) -> Result<Set, SetError> {
    if p.block_structure() != q.block_structure() {
        return Err(SetError::precondition(
            "Cartesian product arrays have different block structures",
        ));
    }
    let total = p.dim();
    let mut blocks = Vec::with_capacity(p.blocks.len());
    for (x, y) in p.blocks.iter().zip(q.blocks.iter()) {
        let r = intersection_with(x, y, tol)?;
        if matches!(r, Set::Empty(_)) {
            return Ok(Set::empty(total));
        }
        blocks.push(Arc::new(r));
    }
    Ok(Set::Product(CartesianProductArray::new(blocks)?))
}

/// Product ∩ polyhedral set, exploiting unconstrained dimensions.
///
/// Only the contiguous run of blocks whose dimensions the polyhedron
/// actually constrains participates; blocks outside the run are passed
/// through by shared reference. The touched run is merged into a single
/// polyhedral block, intersected with the projection of the constraints
/// onto the run's dimension range, and spliced back in place.
pub fn product_polyhedron(
    p: &CartesianProductArray,
    other: &Set,
    cs: Vec<HalfSpace>,
    tol: Tol,
) -> Result<Set, SetError> {
    let total = p.dim();
    // Dimensions with any nonzero coefficient.
    let mut constrained: Vec<usize> = Vec::new();
    for c in &cs {
        for j in 0..total {
            if c.n[j].abs() > tol.eps {
                constrained.push(j);
            }
        }
    }
    if constrained.is_empty() {
        // Every constraint is a zero-normal triviality.
        return Ok(if cs.iter().all(|c| tol.geq(c.c, 0.0)) {
            Set::Product(p.clone())
        } else {
            Set::empty(total)
        });
    }
    let lo_dim = *constrained.iter().min().expect("nonempty");
    let hi_dim = *constrained.iter().max().expect("nonempty");
    let offsets = p.block_offsets();
    let dims = p.block_structure();
    let block_of = |d: usize| -> usize {
        (0..p.blocks.len())
            .rfind(|&b| offsets[b] <= d)
            .expect("dimension inside the product")
    };
    let i0 = block_of(lo_dim);
    let i1 = block_of(hi_dim);
    let span_off = offsets[i0];
    let span_dim: usize = dims[i0..=i1].iter().sum();

    // Merge the touched run into one polyhedral set.
    let merged: Set = if i0 == i1 {
        p.blocks[i0].as_ref().clone()
    } else {
        let mut merged_cs: Vec<HalfSpace> = Vec::new();
        for b in i0..=i1 {
            let local = p.blocks[b].constraints_list(tol).ok_or_else(|| {
                SetError::Unsupported {
                    lhs: p.blocks[b].kind(),
                    rhs: other.kind(),
                }
            })?;
            for c in local {
                let mut n = DVector::zeros(span_dim);
                for j in 0..c.dim() {
                    n[offsets[b] - span_off + j] = c.n[j];
                }
                merged_cs.push(HalfSpace::new(n, c.c));
            }
        }
        let hp = HPoly::from_constraints(span_dim, merged_cs)?;
        if p.blocks[i0..=i1].iter().all(|b| b.is_bounded()) {
            Set::HPolytope(hp)
        } else {
            Set::HPolyhedron(hp)
        }
    };

    // Project the constraints onto the run's dimension range; outside the
    // run every coefficient is zero by choice of the run.
    let mut projected: Vec<HalfSpace> = Vec::new();
    for c in &cs {
        let n = DVector::from_fn(span_dim, |j, _| c.n[span_off + j]);
        if tol.is_zero_vec(&n) {
            if tol.geq(c.c, 0.0) {
                continue;
            }
            return Ok(Set::empty(total));
        }
        projected.push(HalfSpace::new(n, c.c));
    }
    let local = Set::HPolyhedron(HPoly::from_constraints(span_dim, projected)?);
    let mid = intersection_with(&merged, &local, tol)?;
    if matches!(mid, Set::Empty(_)) {
        return Ok(Set::empty(total));
    }

    // Splice: untouched blocks keep their original references.
    let mut blocks: Vec<Arc<Set>> = Vec::with_capacity(p.blocks.len());
    blocks.extend(p.blocks[..i0].iter().cloned());
    blocks.push(Arc::new(mid));
    blocks.extend(p.blocks[i1 + 1..].iter().cloned());
    if blocks.len() == 1 {
        return Ok(blocks.pop().map(|b| b.as_ref().clone()).expect("one block"));
    }
    Ok(Set::Product(CartesianProductArray::new(blocks)?))
}

/// Union ∩ X distributes; empty branches are kept as-is.
pub fn union_pair(u: &UnionSet, other: &Set, tol: Tol) -> Result<Set, SetError> {
    let a = intersection_with(&u.a, other, tol)?;
    let b = intersection_with(&u.b, other, tol)?;
    Ok(Set::Union(UnionSet::new(Arc::new(a), Arc::new(b))?))
}

/// UnionSetArray ∩ X distributes over every disjunct.
pub fn union_array_pair(u: &UnionSetArray, other: &Set, tol: Tol) -> Result<Set, SetError> {
    let mut sets = Vec::with_capacity(u.sets.len());
    for s in &u.sets {
        sets.push(Arc::new(intersection_with(s, other, tol)?));
    }
    Ok(Set::UnionArray(UnionSetArray::new(sets)?))
}
