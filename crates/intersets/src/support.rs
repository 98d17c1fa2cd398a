//! Support function and support vector protocol.
//!
//! `support_function(d, X) = sup { d·x : x ∈ X }` and `support_vector`
//! returns a point attaining it. Every representation answers; composites
//! delegate to their operands (a linear map queries its operand at `Mᵀd` and
//! maps the attaining point forward). Unbounded feasible directions yield
//! `+∞` from the support function and an error from the support vector.

use nalgebra::DVector;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::lp::{DenseSimplex, FeasibilityOracle, LpStatus};
use crate::sets::{to2, Set};

impl Set {
    /// `sup { d·x : x ∈ self }`; `-∞` for the empty set, `+∞` for unbounded
    /// feasible directions.
    pub fn support_function(&self, d: &DVector<f64>, tol: Tol) -> Result<f64, SetError> {
        if d.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: d.len(),
            });
        }
        match self {
            Set::Empty(_) => Ok(f64::NEG_INFINITY),
            Set::Universe(_) => Ok(if tol.is_zero_vec(d) { 0.0 } else { f64::INFINITY }),
            Set::Singleton(s) => Ok(d.dot(&s.element)),
            Set::Interval(iv) => Ok(if d[0] >= 0.0 {
                d[0] * iv.hi
            } else {
                d[0] * iv.lo
            }),
            Set::HalfSpace(h) => {
                if tol.is_zero_vec(d) {
                    return Ok(0.0);
                }
                // Finite only along the outward normal itself.
                match parallel_factor(d, &h.n, tol) {
                    Some(lambda) if lambda > 0.0 => Ok(lambda * h.c),
                    _ => Ok(f64::INFINITY),
                }
            }
            Set::Hyperplane(h) => {
                if tol.is_zero_vec(d) {
                    return Ok(0.0);
                }
                match parallel_factor(d, &h.n, tol) {
                    Some(lambda) => Ok(lambda * h.c),
                    None => Ok(f64::INFINITY),
                }
            }
            Set::Line2(l) => {
                if tol.is_zero_vec(d) {
                    return Ok(0.0);
                }
                let n = nalgebra::dvector![l.n.x, l.n.y];
                match parallel_factor(d, &n, tol) {
                    Some(lambda) => Ok(lambda * l.c),
                    None => Ok(f64::INFINITY),
                }
            }
            Set::Segment2(s) => {
                let d2 = to2(d);
                Ok(d2.dot(&s.p).max(d2.dot(&s.q)))
            }
            Set::Ball(b) => Ok(b.support_function(d)),
            Set::Hyperrect(b) => {
                let mut acc = 0.0;
                for i in 0..b.dim() {
                    acc += if d[i] >= 0.0 {
                        d[i] * b.hi[i]
                    } else {
                        d[i] * b.lo[i]
                    };
                }
                Ok(acc)
            }
            Set::HPolygon(p) => {
                let d2 = to2(d);
                match p.vertices(tol) {
                    Some(vs) => Ok(vs
                        .iter()
                        .map(|v| d2.dot(v))
                        .fold(f64::NEG_INFINITY, f64::max)),
                    None => match p.sweep(tol) {
                        crate::sets::polygon::Sweep::Empty => Ok(f64::NEG_INFINITY),
                        _ => Ok(f64::INFINITY),
                    },
                }
            }
            Set::VPolygon(p) => {
                let d2 = to2(d);
                Ok(p.vertices
                    .iter()
                    .map(|v| d2.dot(v))
                    .fold(f64::NEG_INFINITY, f64::max))
            }
            Set::VPolytope(p) => Ok(p
                .vertices
                .iter()
                .map(|v| d.dot(v))
                .fold(f64::NEG_INFINITY, f64::max)),
            Set::HPolytope(p) | Set::HPolyhedron(p) => {
                match DenseSimplex.maximize(d, &p.constraints, tol)? {
                    LpStatus::Optimal { value, .. } => Ok(value),
                    LpStatus::Unbounded => Ok(f64::INFINITY),
                    LpStatus::Infeasible => Ok(f64::NEG_INFINITY),
                }
            }
            Set::Zonotope(z) => Ok(z.support_function(d)),
            Set::Star(s) => {
                let local = s.basis.transpose() * d;
                Ok(d.dot(&s.center) + s.predicate.support_function(&local, tol)?)
            }
            Set::LinearMap(m) => {
                let pulled = m.m.transpose() * d;
                m.x.support_function(&pulled, tol)
            }
            Set::Product(p) => {
                let offsets = p.block_offsets();
                let mut acc = 0.0;
                for (bi, b) in p.blocks.iter().enumerate() {
                    let slice = DVector::from_fn(b.dim(), |i, _| d[offsets[bi] + i]);
                    acc += b.support_function(&slice, tol)?;
                }
                Ok(acc)
            }
            Set::Union(u) => Ok(u
                .a
                .support_function(d, tol)?
                .max(u.b.support_function(d, tol)?)),
            Set::UnionArray(u) => {
                let mut acc = f64::NEG_INFINITY;
                for s in &u.sets {
                    acc = acc.max(s.support_function(d, tol)?);
                }
                Ok(acc)
            }
        }
    }

    /// A point of the set attaining the support function value.
    pub fn support_vector(&self, d: &DVector<f64>, tol: Tol) -> Result<DVector<f64>, SetError> {
        if d.len() != self.dim() {
            return Err(SetError::DimensionMismatch {
                lhs: self.dim(),
                rhs: d.len(),
            });
        }
        match self {
            Set::Empty(_) => Err(SetError::precondition(
                "the empty set has no support vector",
            )),
            Set::Universe(u) => {
                if tol.is_zero_vec(d) {
                    Ok(DVector::zeros(u.dim))
                } else {
                    Err(SetError::precondition(
                        "universe is unbounded in every nonzero direction",
                    ))
                }
            }
            Set::Singleton(s) => Ok(s.element.clone()),
            Set::Interval(iv) => Ok(nalgebra::dvector![if d[0] >= 0.0 { iv.hi } else { iv.lo }]),
            Set::HalfSpace(h) => {
                // Attained only on the boundary along the normal.
                match parallel_factor(d, &h.n, tol) {
                    Some(lambda) if lambda > 0.0 || tol.is_zero_vec(d) => {
                        let nn = h.n.dot(&h.n);
                        if tol.is_zero(nn) {
                            return Err(SetError::precondition(
                                "degenerate half-space has no support vector",
                            ));
                        }
                        Ok(&h.n * (h.c / nn))
                    }
                    _ => Err(SetError::precondition(
                        "half-space is unbounded in this direction",
                    )),
                }
            }
            Set::Hyperplane(h) => match parallel_factor(d, &h.n, tol) {
                Some(_) => {
                    let nn = h.n.dot(&h.n);
                    if tol.is_zero(nn) {
                        return Err(SetError::precondition(
                            "degenerate hyperplane has no support vector",
                        ));
                    }
                    Ok(&h.n * (h.c / nn))
                }
                None => Err(SetError::precondition(
                    "hyperplane is unbounded in this direction",
                )),
            },
            Set::Line2(l) => {
                let n = nalgebra::dvector![l.n.x, l.n.y];
                match parallel_factor(d, &n, tol) {
                    Some(_) => {
                        let nn = n.dot(&n);
                        if tol.is_zero(nn) {
                            return Err(SetError::precondition(
                                "degenerate line has no support vector",
                            ));
                        }
                        Ok(&n * (l.c / nn))
                    }
                    None => Err(SetError::precondition(
                        "line is unbounded in this direction",
                    )),
                }
            }
            Set::Segment2(s) => {
                let d2 = to2(d);
                let best = if d2.dot(&s.p) >= d2.dot(&s.q) { s.p } else { s.q };
                Ok(nalgebra::dvector![best.x, best.y])
            }
            Set::Ball(b) => Ok(b.support_vector(d, tol)),
            Set::Hyperrect(b) => Ok(DVector::from_fn(b.dim(), |i, _| {
                if d[i] >= 0.0 {
                    b.hi[i]
                } else {
                    b.lo[i]
                }
            })),
            Set::HPolygon(p) => {
                let d2 = to2(d);
                let vs = p.vertices(tol).ok_or_else(|| {
                    SetError::precondition("polygon is empty or unbounded in this direction")
                })?;
                let best = vs
                    .iter()
                    .max_by(|a, b| {
                        d2.dot(*a)
                            .partial_cmp(&d2.dot(*b))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .copied()
                    .expect("bounded polygon has vertices");
                Ok(nalgebra::dvector![best.x, best.y])
            }
            Set::VPolygon(p) => {
                let d2 = to2(d);
                let best = p
                    .vertices
                    .iter()
                    .max_by(|a, b| {
                        d2.dot(*a)
                            .partial_cmp(&d2.dot(*b))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .copied()
                    .ok_or_else(|| SetError::precondition("empty vertex list"))?;
                Ok(nalgebra::dvector![best.x, best.y])
            }
            Set::VPolytope(p) => p
                .vertices
                .iter()
                .max_by(|a, b| {
                    d.dot(*a)
                        .partial_cmp(&d.dot(*b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned()
                .ok_or_else(|| SetError::precondition("empty vertex list")),
            Set::HPolytope(p) | Set::HPolyhedron(p) => {
                match DenseSimplex.maximize(d, &p.constraints, tol)? {
                    LpStatus::Optimal { point, .. } => Ok(point),
                    LpStatus::Unbounded => Err(SetError::precondition(
                        "polyhedron is unbounded in this direction",
                    )),
                    LpStatus::Infeasible => {
                        Err(SetError::precondition("polyhedron is empty"))
                    }
                }
            }
            Set::Zonotope(z) => Ok(z.support_vector(d)),
            Set::Star(s) => {
                let local = s.basis.transpose() * d;
                let alpha = s.predicate.support_vector(&local, tol)?;
                Ok(&s.center + &s.basis * alpha)
            }
            Set::LinearMap(m) => {
                let pulled = m.m.transpose() * d;
                let inner = m.x.support_vector(&pulled, tol)?;
                Ok(&m.m * inner)
            }
            Set::Product(p) => {
                let offsets = p.block_offsets();
                let mut out = DVector::zeros(p.dim());
                for (bi, b) in p.blocks.iter().enumerate() {
                    let slice = DVector::from_fn(b.dim(), |i, _| d[offsets[bi] + i]);
                    let sv = b.support_vector(&slice, tol)?;
                    for i in 0..b.dim() {
                        out[offsets[bi] + i] = sv[i];
                    }
                }
                Ok(out)
            }
            Set::Union(u) => {
                let fa = u.a.support_function(d, tol)?;
                let fb = u.b.support_function(d, tol)?;
                if fa >= fb {
                    u.a.support_vector(d, tol)
                } else {
                    u.b.support_vector(d, tol)
                }
            }
            Set::UnionArray(u) => {
                let mut best: Option<(f64, &Set)> = None;
                for s in &u.sets {
                    let f = s.support_function(d, tol)?;
                    if best.map(|(bf, _)| f > bf).unwrap_or(true) {
                        best = Some((f, s));
                    }
                }
                let (_, set) = best.ok_or_else(|| SetError::precondition("empty union"))?;
                set.support_vector(d, tol)
            }
        }
    }
}

/// If `d = lambda * n` for some scalar `lambda`, return it.
fn parallel_factor(d: &DVector<f64>, n: &DVector<f64>, tol: Tol) -> Option<f64> {
    let nn = n.dot(n);
    if tol.is_zero(nn) {
        return None;
    }
    let lambda = d.dot(n) / nn;
    let residual = d - n * lambda;
    if residual.norm() <= tol.eps * (1.0 + d.norm()) {
        Some(lambda)
    } else {
        None
    }
}
