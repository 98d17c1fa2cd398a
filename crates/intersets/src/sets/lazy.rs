//! Lazy composite sets: linear maps, Cartesian product arrays, and unions.
//!
//! Composites hold `Arc<Set>` operands: operand graphs are immutable and
//! acyclic, so shared ownership is safe and keeps deep compositions cheap.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector, Vector2};

use crate::cfg::Tol;
use crate::error::SetError;
use crate::sets::halfspace::HalfSpace;
use crate::sets::hyperrect::Singleton;
use crate::sets::interval::Interval;
use crate::sets::polygon::VPolygon;
use crate::sets::polyhedron::{HPoly, VPolytope};
use crate::sets::zonotope::Zonotope;
use crate::sets::Set;

/// Lazy linear map `{ M·x : x ∈ X }`.
///
/// Invariant: `M` has as many columns as `dim(X)`; the map's ambient
/// dimension is the row count.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearMap {
    pub m: DMatrix<f64>,
    pub x: Arc<Set>,
}

impl LinearMap {
    pub fn new(m: DMatrix<f64>, x: Arc<Set>) -> Result<Self, SetError> {
        if m.ncols() != x.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: m.ncols(),
                rhs: x.dim(),
            });
        }
        Ok(Self { m, x })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.m.nrows()
    }

    /// Concretize the map.
    ///
    /// Vertex-based operands map forward directly; constraint-based operands
    /// push forward through `M⁻¹` (so they require an invertible map);
    /// unions distribute; nested maps compose first.
    pub fn materialize(&self, tol: Tol) -> Result<Set, SetError> {
        match self.x.as_ref() {
            Set::Empty(_) => Ok(Set::empty(self.dim())),
            Set::Singleton(s) => Ok(Set::Singleton(Singleton::new(&self.m * &s.element))),
            Set::Interval(iv) => {
                // 1-to-1 scaling only; a rectangular matrix changes kind.
                if self.m.nrows() == 1 && self.m.ncols() == 1 {
                    let a = self.m[(0, 0)];
                    let (lo, hi) = if a >= 0.0 {
                        (a * iv.lo, a * iv.hi)
                    } else {
                        (a * iv.hi, a * iv.lo)
                    };
                    Ok(Set::Interval(Interval::new(lo, hi)?))
                } else {
                    let verts = vec![
                        &self.m * DVector::from_element(1, iv.lo),
                        &self.m * DVector::from_element(1, iv.hi),
                    ];
                    Ok(Set::VPolytope(VPolytope::from_vertices(self.dim(), verts)?))
                }
            }
            Set::Hyperrect(b) => {
                // M · box = zonotope with the scaled half-widths as generators.
                let n = b.dim();
                let center = DVector::from_fn(n, |i, _| (b.lo[i] + b.hi[i]) / 2.0);
                let gens = DMatrix::from_fn(n, n, |r, c| {
                    if r == c {
                        (b.hi[r] - b.lo[r]) / 2.0
                    } else {
                        0.0
                    }
                });
                let z = Zonotope::new(&self.m * center, &self.m * gens)?;
                Ok(Set::Zonotope(z))
            }
            Set::Zonotope(z) => Ok(Set::Zonotope(Zonotope::new(
                &self.m * &z.center,
                &self.m * &z.generators,
            )?)),
            Set::VPolytope(v) => Ok(Set::VPolytope(VPolytope::from_vertices(
                self.dim(),
                v.vertices.iter().map(|p| &self.m * p).collect(),
            )?)),
            Set::VPolygon(v) if self.m.nrows() == 2 && self.m.ncols() == 2 => {
                let mapped: Vec<Vector2<f64>> = v
                    .vertices
                    .iter()
                    .map(|p| {
                        let q = &self.m * nalgebra::dvector![p.x, p.y];
                        Vector2::new(q[0], q[1])
                    })
                    .collect();
                // A negative determinant flips orientation; rebuild the hull.
                Ok(Set::VPolygon(VPolygon::from_points(&mapped, tol)?))
            }
            Set::Star(s) => {
                let mut out = s.clone();
                out.center = &self.m * &out.center;
                out.basis = &self.m * &out.basis;
                Ok(Set::Star(out))
            }
            Set::Union(u) => {
                let a = LinearMap::new(self.m.clone(), u.a.clone())?.materialize(tol)?;
                let b = LinearMap::new(self.m.clone(), u.b.clone())?.materialize(tol)?;
                Ok(Set::Union(UnionSet::new(Arc::new(a), Arc::new(b))?))
            }
            Set::UnionArray(u) => {
                let mut sets = Vec::with_capacity(u.sets.len());
                for s in &u.sets {
                    let mapped =
                        LinearMap::new(self.m.clone(), s.clone())?.materialize(tol)?;
                    sets.push(Arc::new(mapped));
                }
                Ok(Set::UnionArray(UnionSetArray::new(sets)?))
            }
            Set::LinearMap(inner) => {
                let composed = LinearMap::new(&self.m * &inner.m, inner.x.clone())?;
                composed.materialize(tol)
            }
            other => {
                // Constraint-based fallback through an invertible square map:
                // a·x <= c becomes (M⁻ᵀa)·y <= c.
                if self.m.is_square() {
                    if let (Some(cs), Some(inv)) = (
                        other.constraints_list(tol),
                        self.m.clone().try_inverse(),
                    ) {
                        let inv_t = inv.transpose();
                        let mapped: Vec<HalfSpace> = cs
                            .iter()
                            .map(|c| HalfSpace::new(&inv_t * &c.n, c.c))
                            .collect();
                        let hp = HPoly::from_constraints(self.dim(), mapped)?;
                        return Ok(if other.is_bounded() {
                            Set::HPolytope(hp)
                        } else {
                            Set::HPolyhedron(hp)
                        });
                    }
                }
                Err(SetError::precondition(format!(
                    "cannot materialize a linear map of {}",
                    other.kind()
                )))
            }
        }
    }
}

/// Cartesian product `X₁ × … × Xₖ` of an ordered block sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianProductArray {
    pub blocks: Vec<Arc<Set>>,
}

impl CartesianProductArray {
    pub fn new(blocks: Vec<Arc<Set>>) -> Result<Self, SetError> {
        if blocks.is_empty() {
            return Err(SetError::precondition(
                "Cartesian product needs at least one block",
            ));
        }
        Ok(Self { blocks })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.blocks.iter().map(|b| b.dim()).sum()
    }

    /// Dimension count per block; products combine blockwise only when these
    /// match exactly.
    pub fn block_structure(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.dim()).collect()
    }

    /// Start offset of each block in the ambient coordinate order.
    pub fn block_offsets(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut acc = 0;
        for b in &self.blocks {
            out.push(acc);
            acc += b.dim();
        }
        out
    }
}

/// Binary union (disjunction) of two sets of equal ambient dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct UnionSet {
    pub a: Arc<Set>,
    pub b: Arc<Set>,
}

impl UnionSet {
    pub fn new(a: Arc<Set>, b: Arc<Set>) -> Result<Self, SetError> {
        if a.dim() != b.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: a.dim(),
                rhs: b.dim(),
            });
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.dim()
    }
}

/// N-ary union of sets of equal ambient dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct UnionSetArray {
    pub sets: Vec<Arc<Set>>,
}

impl UnionSetArray {
    pub fn new(sets: Vec<Arc<Set>>) -> Result<Self, SetError> {
        let Some(first) = sets.first() else {
            return Err(SetError::precondition("union array needs at least one set"));
        };
        let dim = first.dim();
        for s in &sets {
            if s.dim() != dim {
                return Err(SetError::DimensionMismatch {
                    lhs: dim,
                    rhs: s.dim(),
                });
            }
        }
        Ok(Self { sets })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.sets[0].dim()
    }
}
