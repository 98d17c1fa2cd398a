//! Set representation taxonomy.
//!
//! A closed tagged-variant enumeration over every concrete representation,
//! plus the capability queries the intersection dispatcher keys on
//! (`is_bounded`, `is_polyhedral`, `is_convex`, `kind`). No representation
//! knows about any other; pairwise behavior lives in `crate::intersect`.

pub mod ball;
pub mod halfspace;
pub mod hyperrect;
pub mod interval;
pub mod lazy;
pub mod line2;
pub mod polygon;
pub mod polyhedron;
pub mod star;
pub mod zonotope;

use nalgebra::{DVector, Vector2};

use crate::cfg::Tol;
use crate::error::{SetError, SetKind};
use crate::lp::{DenseSimplex, FeasibilityOracle};

pub use ball::Ball;
pub use halfspace::{HalfSpace, Hyperplane};
pub use hyperrect::{Hyperrect, Singleton};
pub use interval::Interval;
pub use lazy::{CartesianProductArray, LinearMap, UnionSet, UnionSetArray};
pub use line2::{Line2, Segment2};
pub use polygon::{HPolygon, Hs2, VPolygon};
pub use polyhedron::{HPoly, VPolytope};
pub use star::Star;
pub use zonotope::Zonotope;

/// The distinguished bottom element for a given ambient dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmptySet {
    pub dim: usize,
}

/// The distinguished top element for a given ambient dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Universe {
    pub dim: usize,
}

/// Any representable set.
#[derive(Clone, Debug, PartialEq)]
pub enum Set {
    Empty(EmptySet),
    Universe(Universe),
    Singleton(Singleton),
    Interval(Interval),
    HalfSpace(HalfSpace),
    Hyperplane(Hyperplane),
    Line2(Line2),
    Segment2(Segment2),
    Ball(Ball),
    Hyperrect(Hyperrect),
    HPolygon(HPolygon),
    VPolygon(VPolygon),
    HPolytope(HPoly),
    HPolyhedron(HPoly),
    VPolytope(VPolytope),
    Zonotope(Zonotope),
    Star(Star),
    LinearMap(LinearMap),
    Product(CartesianProductArray),
    Union(UnionSet),
    UnionArray(UnionSetArray),
}

impl Set {
    #[inline]
    pub fn empty(dim: usize) -> Self {
        Set::Empty(EmptySet { dim })
    }

    #[inline]
    pub fn universe(dim: usize) -> Self {
        Set::Universe(Universe { dim })
    }

    /// A singleton from a 2D point (the planar algorithms' result type).
    pub(crate) fn point2(p: Vector2<f64>) -> Self {
        Set::Singleton(Singleton::new(nalgebra::dvector![p.x, p.y]))
    }

    pub fn kind(&self) -> SetKind {
        match self {
            Set::Empty(_) => SetKind::Empty,
            Set::Universe(_) => SetKind::Universe,
            Set::Singleton(_) => SetKind::Singleton,
            Set::Interval(_) => SetKind::Interval,
            Set::HalfSpace(_) => SetKind::HalfSpace,
            Set::Hyperplane(_) => SetKind::Hyperplane,
            Set::Line2(_) => SetKind::Line2,
            Set::Segment2(_) => SetKind::Segment2,
            Set::Ball(_) => SetKind::Ball,
            Set::Hyperrect(_) => SetKind::Hyperrect,
            Set::HPolygon(_) => SetKind::HPolygon,
            Set::VPolygon(_) => SetKind::VPolygon,
            Set::HPolytope(_) => SetKind::HPolytope,
            Set::HPolyhedron(_) => SetKind::HPolyhedron,
            Set::VPolytope(_) => SetKind::VPolytope,
            Set::Zonotope(_) => SetKind::Zonotope,
            Set::Star(_) => SetKind::Star,
            Set::LinearMap(_) => SetKind::LinearMap,
            Set::Product(_) => SetKind::Product,
            Set::Union(_) => SetKind::Union,
            Set::UnionArray(_) => SetKind::UnionArray,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Set::Empty(e) => e.dim,
            Set::Universe(u) => u.dim,
            Set::Singleton(s) => s.dim(),
            Set::Interval(_) => 1,
            Set::HalfSpace(h) => h.dim(),
            Set::Hyperplane(h) => h.dim(),
            Set::Line2(_) | Set::Segment2(_) => 2,
            Set::Ball(b) => b.dim(),
            Set::Hyperrect(b) => b.dim(),
            Set::HPolygon(_) | Set::VPolygon(_) => 2,
            Set::HPolytope(p) | Set::HPolyhedron(p) => p.dim,
            Set::VPolytope(p) => p.dim,
            Set::Zonotope(z) => z.dim(),
            Set::Star(s) => s.dim(),
            Set::LinearMap(m) => m.dim(),
            Set::Product(p) => p.dim(),
            Set::Union(u) => u.dim(),
            Set::UnionArray(u) => u.dim(),
        }
    }

    /// Whether the represented set is bounded.
    ///
    /// `HPolygon` is bounded by convention (the 2D polygon types describe
    /// polygons, not arbitrary half-plane systems); `HPolyhedron` is
    /// conservatively reported unbounded.
    pub fn is_bounded(&self) -> bool {
        match self {
            Set::Empty(_) => true,
            Set::Universe(_) => false,
            Set::Singleton(_)
            | Set::Interval(_)
            | Set::Segment2(_)
            | Set::Ball(_)
            | Set::Hyperrect(_)
            | Set::HPolygon(_)
            | Set::VPolygon(_)
            | Set::HPolytope(_)
            | Set::VPolytope(_)
            | Set::Zonotope(_) => true,
            Set::HalfSpace(_) | Set::Hyperplane(_) | Set::Line2(_) | Set::HPolyhedron(_) => false,
            Set::Star(s) => s.predicate.is_bounded(),
            Set::LinearMap(m) => m.x.is_bounded(),
            Set::Product(p) => p.blocks.iter().all(|b| b.is_bounded()),
            Set::Union(u) => u.a.is_bounded() && u.b.is_bounded(),
            Set::UnionArray(u) => u.sets.iter().all(|s| s.is_bounded()),
        }
    }

    /// Whether the set is a finite conjunction of linear constraints.
    pub fn is_polyhedral(&self) -> bool {
        match self {
            Set::Empty(_) | Set::Ball(_) => false,
            Set::Universe(_)
            | Set::Singleton(_)
            | Set::Interval(_)
            | Set::HalfSpace(_)
            | Set::Hyperplane(_)
            | Set::Line2(_)
            | Set::Segment2(_)
            | Set::Hyperrect(_)
            | Set::HPolygon(_)
            | Set::VPolygon(_)
            | Set::HPolytope(_)
            | Set::HPolyhedron(_)
            | Set::VPolytope(_)
            | Set::Zonotope(_) => true,
            Set::Star(s) => s.predicate.is_polyhedral(),
            Set::LinearMap(m) => m.x.is_polyhedral(),
            Set::Product(p) => p.blocks.iter().all(|b| b.is_polyhedral()),
            Set::Union(_) | Set::UnionArray(_) => false,
        }
    }

    pub fn is_convex(&self) -> bool {
        match self {
            Set::Union(_) | Set::UnionArray(_) => false,
            Set::Product(p) => p.blocks.iter().all(|b| b.is_convex()),
            Set::LinearMap(m) => m.x.is_convex(),
            _ => true,
        }
    }

    /// Membership with the default tolerance.
    pub fn contains(&self, x: &DVector<f64>, tol: Tol) -> Result<bool, SetError> {
        if x.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: x.len(),
            });
        }
        match self {
            Set::Empty(_) => Ok(false),
            Set::Universe(_) => Ok(true),
            Set::Singleton(s) => Ok(s.contains(x, tol)),
            Set::Interval(iv) => Ok(iv.contains(x[0], tol)),
            Set::HalfSpace(h) => Ok(h.satisfies(x, tol)),
            Set::Hyperplane(h) => Ok(h.satisfies(x, tol)),
            Set::Line2(l) => Ok(l.satisfies(to2(x), tol)),
            Set::Segment2(s) => Ok(s.contains(to2(x), tol)),
            Set::Ball(b) => Ok(b.contains(x, tol)),
            Set::Hyperrect(b) => Ok(b.contains(x, tol)),
            Set::HPolygon(p) => Ok(p.contains(to2(x), tol)),
            Set::VPolygon(p) => Ok(p.contains(to2(x), tol)),
            Set::HPolytope(p) | Set::HPolyhedron(p) => Ok(p.contains(x, tol)),
            Set::VPolytope(p) => vpolytope_contains(p, x, tol),
            Set::Zonotope(z) => zonotope_contains(z, x, tol),
            Set::Star(s) => s.contains(x, tol),
            Set::LinearMap(m) => {
                if m.m.is_square() {
                    if let Some(inv) = m.m.clone().try_inverse() {
                        return m.x.contains(&(inv * x), tol);
                    }
                }
                m.materialize(tol)?.contains(x, tol)
            }
            Set::Product(p) => {
                let mut off = 0;
                for b in &p.blocks {
                    let d = b.dim();
                    let slice = DVector::from_fn(d, |i, _| x[off + i]);
                    if !b.contains(&slice, tol)? {
                        return Ok(false);
                    }
                    off += d;
                }
                Ok(true)
            }
            Set::Union(u) => Ok(u.a.contains(x, tol)? || u.b.contains(x, tol)?),
            Set::UnionArray(u) => {
                for s in &u.sets {
                    if s.contains(x, tol)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Constraint list for polyhedral representations, in ambient
    /// coordinates. `None` when the representation has no (finite, exact)
    /// constraint form.
    pub fn constraints_list(&self, tol: Tol) -> Option<Vec<HalfSpace>> {
        match self {
            Set::Universe(_) => Some(Vec::new()),
            Set::HalfSpace(h) => Some(vec![h.clone()]),
            Set::Hyperplane(h) => Some(h.as_constraints().to_vec()),
            Set::Interval(iv) => Some(vec![
                HalfSpace::new(nalgebra::dvector![1.0], iv.hi),
                HalfSpace::new(nalgebra::dvector![-1.0], -iv.lo),
            ]),
            Set::Singleton(s) => Some(s.constraints()),
            Set::Hyperrect(b) => Some(b.constraints()),
            Set::Line2(l) => {
                let h = Hyperplane::new(nalgebra::dvector![l.n.x, l.n.y], l.c);
                Some(h.as_constraints().to_vec())
            }
            Set::Segment2(s) => Some(segment_constraints(s, tol)),
            Set::HPolygon(p) => Some(p.lifted_constraints()),
            Set::HPolytope(p) | Set::HPolyhedron(p) => Some(p.constraints.clone()),
            Set::VPolygon(p) => p
                .edge_constraints(tol)
                .map(|hs| hs.iter().map(Hs2::lift).collect()),
            Set::VPolytope(p) => {
                if p.dim == 1 {
                    let lo = p.vertices.iter().map(|v| v[0]).fold(f64::INFINITY, f64::min);
                    let hi = p
                        .vertices
                        .iter()
                        .map(|v| v[0])
                        .fold(f64::NEG_INFINITY, f64::max);
                    return Some(vec![
                        HalfSpace::new(nalgebra::dvector![1.0], hi),
                        HalfSpace::new(nalgebra::dvector![-1.0], -lo),
                    ]);
                }
                let hs = p.facet_constraints(tol);
                if hs.is_empty() {
                    None
                } else {
                    Some(hs)
                }
            }
            Set::Zonotope(z) => z.facet_constraints(tol),
            Set::Star(s) => s.ambient_constraints(tol),
            Set::Product(p) => {
                let offsets = p.block_offsets();
                let total = p.dim();
                let mut out = Vec::new();
                for (bi, b) in p.blocks.iter().enumerate() {
                    let local = b.constraints_list(tol)?;
                    for c in local {
                        let mut n = DVector::zeros(total);
                        for j in 0..c.dim() {
                            n[offsets[bi] + j] = c.n[j];
                        }
                        out.push(HalfSpace::new(n, c.c));
                    }
                }
                Some(out)
            }
            _ => None,
        }
    }

    /// Vertex list for bounded representations that expose one.
    pub fn vertices_list(&self, tol: Tol) -> Option<Vec<DVector<f64>>> {
        match self {
            Set::Singleton(s) => Some(vec![s.element.clone()]),
            Set::Interval(iv) => Some(vec![
                nalgebra::dvector![iv.lo],
                nalgebra::dvector![iv.hi],
            ]),
            Set::Segment2(s) => Some(vec![
                nalgebra::dvector![s.p.x, s.p.y],
                nalgebra::dvector![s.q.x, s.q.y],
            ]),
            Set::Hyperrect(b) => Some(b.vertices()),
            Set::VPolygon(p) => Some(
                p.vertices
                    .iter()
                    .map(|v| nalgebra::dvector![v.x, v.y])
                    .collect(),
            ),
            Set::VPolytope(p) => Some(p.vertices.clone()),
            Set::HPolygon(p) => p
                .vertices(tol)
                .map(|vs| vs.iter().map(|v| nalgebra::dvector![v.x, v.y]).collect()),
            Set::HPolytope(p) => Some(p.vertices(tol)),
            Set::Zonotope(z) => {
                if z.order() > 20 {
                    return None;
                }
                Some(z.vertices(tol))
            }
            _ => None,
        }
    }

    /// Translation by `v`, distributing over composites.
    pub fn translate(&self, v: &DVector<f64>, tol: Tol) -> Result<Set, SetError> {
        if v.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: v.len(),
            });
        }
        Ok(match self {
            Set::Empty(e) => Set::Empty(*e),
            Set::Universe(u) => Set::Universe(*u),
            Set::Singleton(s) => Set::Singleton(Singleton::new(&s.element + v)),
            Set::Interval(iv) => Set::Interval(iv.translate(v[0])),
            Set::HalfSpace(h) => Set::HalfSpace(h.translate(v)?),
            Set::Hyperplane(h) => Set::Hyperplane(h.translate(v)?),
            Set::Line2(l) => Set::Line2(l.translate(to2(v))),
            Set::Segment2(s) => Set::Segment2(s.translate(to2(v))),
            Set::Ball(b) => Set::Ball(b.translate(v)?),
            Set::Hyperrect(b) => Set::Hyperrect(b.translate(v)?),
            Set::HPolygon(p) => Set::HPolygon(p.translate(to2(v))),
            Set::VPolygon(p) => Set::VPolygon(p.translate(to2(v))),
            Set::HPolytope(p) => Set::HPolytope(p.translate(v)?),
            Set::HPolyhedron(p) => Set::HPolyhedron(p.translate(v)?),
            Set::VPolytope(p) => Set::VPolytope(p.translate(v)?),
            Set::Zonotope(z) => Set::Zonotope(z.translate(v)?),
            Set::Star(s) => Set::Star(s.translate(v)?),
            Set::LinearMap(m) => m.materialize(tol)?.translate(v, tol)?,
            Set::Product(p) => {
                let offsets = p.block_offsets();
                let mut blocks = Vec::with_capacity(p.blocks.len());
                for (bi, b) in p.blocks.iter().enumerate() {
                    let d = b.dim();
                    let slice = DVector::from_fn(d, |i, _| v[offsets[bi] + i]);
                    blocks.push(std::sync::Arc::new(b.translate(&slice, tol)?));
                }
                Set::Product(CartesianProductArray::new(blocks)?)
            }
            Set::Union(u) => Set::Union(UnionSet::new(
                std::sync::Arc::new(u.a.translate(v, tol)?),
                std::sync::Arc::new(u.b.translate(v, tol)?),
            )?),
            Set::UnionArray(u) => {
                let mut sets = Vec::with_capacity(u.sets.len());
                for s in &u.sets {
                    sets.push(std::sync::Arc::new(s.translate(v, tol)?));
                }
                Set::UnionArray(UnionSetArray::new(sets)?)
            }
        })
    }
}

#[inline]
pub(crate) fn to2(x: &DVector<f64>) -> Vector2<f64> {
    Vector2::new(x[0], x[1])
}

/// Segment as a 2D polytope: carrying line plus end bounds along the
/// direction; a degenerate segment pins both axes.
fn segment_constraints(s: &Segment2, tol: Tol) -> Vec<HalfSpace> {
    let d = s.q - s.p;
    if tol.is_zero(d.norm()) {
        return Singleton::new(nalgebra::dvector![s.p.x, s.p.y]).constraints();
    }
    let n = Vector2::new(d.y, -d.x);
    vec![
        HalfSpace::new(nalgebra::dvector![n.x, n.y], n.dot(&s.p)),
        HalfSpace::new(nalgebra::dvector![-n.x, -n.y], -n.dot(&s.p)),
        HalfSpace::new(nalgebra::dvector![d.x, d.y], d.dot(&s.q)),
        HalfSpace::new(nalgebra::dvector![-d.x, -d.y], -d.dot(&s.p)),
    ]
}

/// V-rep membership: is `x` a convex combination of the vertices?
///
/// Feasibility LP over the combination weights.
fn vpolytope_contains(p: &VPolytope, x: &DVector<f64>, tol: Tol) -> Result<bool, SetError> {
    let k = p.vertices.len();
    let mut cs: Vec<HalfSpace> = Vec::with_capacity(2 * p.dim + 2 + k);
    for d in 0..p.dim {
        let row = DVector::from_fn(k, |j, _| p.vertices[j][d]);
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
    DenseSimplex.is_feasible(&cs, tol)
}

/// Zonotope membership: does `G ξ = x - c` admit ξ in the unit cube?
fn zonotope_contains(z: &Zonotope, x: &DVector<f64>, tol: Tol) -> Result<bool, SetError> {
    let p = z.order();
    let rhs = x - &z.center;
    let mut cs: Vec<HalfSpace> = Vec::with_capacity(2 * z.dim() + 2 * p);
    for d in 0..z.dim() {
        let row = DVector::from_fn(p, |j, _| z.generators[(d, j)]);
        cs.push(HalfSpace::new(row.clone(), rhs[d]));
        cs.push(HalfSpace::new(-row, -rhs[d]));
    }
    for j in 0..p {
        let mut e = DVector::zeros(p);
        e[j] = 1.0;
        cs.push(HalfSpace::new(e.clone(), 1.0));
        e[j] = -1.0;
        cs.push(HalfSpace::new(e, 1.0));
    }
    DenseSimplex.is_feasible(&cs, tol)
}
