//! Planar polygon intersections: the ordered constraint merge for
//! H-polygons and Sutherland–Hodgman clipping for V-polygons.

use nalgebra::Vector2;

use crate::cfg::Tol;
use crate::error::SetError;
use crate::lp::{remove_redundant_constraints, DenseSimplex};
use crate::sets::line2::Segment2;
use crate::sets::polygon::{angle_of, convex_hull, cross2, push_or_coalesce, HPolygon, Hs2, Sweep, VPolygon};
use crate::sets::polyhedron::{h_to_vertices, VPolytope};
use crate::sets::Set;

/// HPolygon ∩ HPolygon: linear merge of two angle-sorted constraint lists.
///
/// Advance whichever list carries the earlier normal direction; coinciding
/// normals keep only the tighter offset. The merged candidate then runs the
/// feasibility sweep, which both detects emptiness and drops redundant
/// constraints (the surviving deque is the active set).
pub fn hpolygon_hpolygon(x: &HPolygon, y: &HPolygon, tol: Tol) -> Result<Set, SetError> {
    if !x.is_sorted() || !y.is_sorted() {
        return Err(SetError::precondition(
            "H-polygon constraints must be sorted by normal angle",
        ));
    }
    let mut i = 0usize;
    let mut j = 0usize;
    let mut merged: Vec<Hs2> = Vec::with_capacity(x.hs.len() + y.hs.len());
    while i < x.hs.len() && j < y.hs.len() {
        let ai = angle_of(x.hs[i].n);
        let bj = angle_of(y.hs[j].n);
        if (ai - bj).abs() <= tol.eps {
            // Same direction: the smaller feasible half-plane wins.
            let c = x.hs[i].c.min(y.hs[j].c);
            push_or_coalesce(&mut merged, x.hs[i].n, c, tol);
            i += 1;
            j += 1;
        } else if ai < bj {
            push_or_coalesce(&mut merged, x.hs[i].n, x.hs[i].c, tol);
            i += 1;
        } else {
            push_or_coalesce(&mut merged, y.hs[j].n, y.hs[j].c, tol);
            j += 1;
        }
    }
    while i < x.hs.len() {
        push_or_coalesce(&mut merged, x.hs[i].n, x.hs[i].c, tol);
        i += 1;
    }
    while j < y.hs.len() {
        push_or_coalesce(&mut merged, y.hs[j].n, y.hs[j].c, tol);
        j += 1;
    }
    let candidate = HPolygon { hs: merged };
    match candidate.sweep(tol) {
        Sweep::Empty => Ok(Set::empty(2)),
        Sweep::Unbounded => Ok(Set::HPolygon(candidate)),
        Sweep::Bounded { active, .. } => Ok(Set::HPolygon(HPolygon {
            hs: active.into_iter().map(|k| candidate.hs[k]).collect(),
        })),
    }
}

/// VPolygon ∩ VPolygon.
///
/// Degenerate operands (a point, an edge) are resolved by membership or
/// segment clipping; proper polygons run Sutherland–Hodgman and rebuild the
/// hull of the surviving vertices.
pub fn vpolygon_vpolygon(x: &VPolygon, y: &VPolygon, tol: Tol) -> Result<Set, SetError> {
    match (x.len(), y.len()) {
        (0, _) | (_, 0) => return Ok(Set::empty(2)),
        (1, _) => {
            return Ok(if y.contains(x.vertices[0], tol) {
                Set::point2(x.vertices[0])
            } else {
                Set::empty(2)
            })
        }
        (_, 1) => {
            return Ok(if x.contains(y.vertices[0], tol) {
                Set::point2(y.vertices[0])
            } else {
                Set::empty(2)
            })
        }
        (2, _) => return Ok(clip_segment(x.vertices[0], x.vertices[1], y, tol)),
        (_, 2) => return Ok(clip_segment(y.vertices[0], y.vertices[1], x, tol)),
        _ => {}
    }
    let survivors = sutherland_hodgman(&x.vertices, &y.vertices, tol);
    let hull = convex_hull(&survivors, tol);
    Ok(match hull.len() {
        0 => Set::empty(2),
        1 => Set::point2(hull[0]),
        _ => Set::VPolygon(VPolygon { vertices: hull }),
    })
}

/// Clip the subject vertex loop against every directed edge of the clip
/// polygon, keeping inside vertices and inserting boundary crossings.
fn sutherland_hodgman(
    subject: &[Vector2<f64>],
    clip: &[Vector2<f64>],
    tol: Tol,
) -> Vec<Vector2<f64>> {
    let mut output: Vec<Vector2<f64>> = subject.to_vec();
    let m = clip.len();
    for e in 0..m {
        if output.is_empty() {
            break;
        }
        let a = clip[e];
        let b = clip[(e + 1) % m];
        let input = std::mem::take(&mut output);
        let k = input.len();
        for v in 0..k {
            let p = input[v];
            let q = input[(v + 1) % k];
            let p_in = cross2(a, b, p) >= -tol.eps;
            let q_in = cross2(a, b, q) >= -tol.eps;
            match (p_in, q_in) {
                (true, true) => output.push(q),
                (true, false) => {
                    if let Some(r) = edge_crossing(a, b, p, q, tol) {
                        output.push(r);
                    }
                }
                (false, true) => {
                    if let Some(r) = edge_crossing(a, b, p, q, tol) {
                        output.push(r);
                    }
                    output.push(q);
                }
                (false, false) => {}
            }
        }
    }
    output
}

/// Crossing of segment `p..q` with the infinite clip edge through `a..b`.
fn edge_crossing(
    a: Vector2<f64>,
    b: Vector2<f64>,
    p: Vector2<f64>,
    q: Vector2<f64>,
    tol: Tol,
) -> Option<Vector2<f64>> {
    let cp = cross2(a, b, p);
    let cq = cross2(a, b, q);
    let denom = cp - cq;
    if denom.abs() <= tol.eps_det {
        return None;
    }
    let t = cp / denom;
    Some(p + (q - p) * t)
}

/// Clip one segment against a convex polygon's edges (parametric range).
fn clip_segment(p: Vector2<f64>, q: Vector2<f64>, poly: &VPolygon, tol: Tol) -> Set {
    if poly.len() < 3 {
        // Degenerate against degenerate: fall back to segment/segment.
        if poly.len() == 2 {
            return crate::intersect::line2::segment_segment(
                &Segment2::new(p, q),
                &Segment2::new(poly.vertices[0], poly.vertices[1]),
                tol,
            );
        }
        return Set::empty(2);
    }
    let m = poly.len();
    let mut t_lo = 0.0f64;
    let mut t_hi = 1.0f64;
    let d = q - p;
    for e in 0..m {
        let a = poly.vertices[e];
        let b = poly.vertices[(e + 1) % m];
        // Inside test f(t) = cross(b-a, p + t d - a) >= 0, affine in t.
        let f0 = cross2(a, b, p);
        let f1 = cross2(a, b, q);
        let slope = f1 - f0;
        if slope.abs() <= tol.eps_det {
            if f0 < -tol.eps {
                return Set::empty(2);
            }
            continue;
        }
        let t_star = -f0 / slope;
        if slope > 0.0 {
            t_lo = t_lo.max(t_star);
        } else {
            t_hi = t_hi.min(t_star);
        }
        if t_lo > t_hi + tol.eps {
            return Set::empty(2);
        }
    }
    let r0 = p + d * t_lo;
    let r1 = p + d * t_hi;
    if (r1 - r0).norm() <= tol.eps {
        Set::point2(r0)
    } else {
        Set::Segment2(Segment2::new(r0, r1))
    }
}

/// VPolytope ∩ VPolytope, dimension-dispatched.
///
/// 1D operands collapse to intervals; 2D operands clip as polygons; higher
/// dimensions convert to H-representation, intersect there, and re-enumerate
/// the vertices of the result.
pub fn vpolytope_vpolytope(x: &VPolytope, y: &VPolytope, tol: Tol) -> Result<Set, SetError> {
    if x.dim == 1 {
        let (a, b) = one_d_bounds(x);
        let (c, d) = one_d_bounds(y);
        let lo = a.max(c);
        let hi = b.min(d);
        return Ok(if hi < lo {
            Set::empty(1)
        } else {
            Set::Interval(crate::sets::Interval { lo, hi })
        });
    }
    if x.dim == 2 {
        let xs: Vec<Vector2<f64>> = x.vertices.iter().map(|v| Vector2::new(v[0], v[1])).collect();
        let ys: Vec<Vector2<f64>> = y.vertices.iter().map(|v| Vector2::new(v[0], v[1])).collect();
        let result = vpolygon_vpolygon(
            &VPolygon::from_points(&xs, tol)?,
            &VPolygon::from_points(&ys, tol)?,
            tol,
        )?;
        // Stay in the n-dimensional vertex representation.
        return Ok(match result {
            Set::VPolygon(p) => Set::VPolytope(VPolytope::from_vertices(
                2,
                p.vertices
                    .iter()
                    .map(|v| nalgebra::dvector![v.x, v.y])
                    .collect(),
            )?),
            other => other,
        });
    }
    let mut cs = x.facet_constraints(tol);
    let cs_y = y.facet_constraints(tol);
    if cs.is_empty() || cs_y.is_empty() {
        return Err(SetError::precondition(
            "degenerate polytope has no facet representation",
        ));
    }
    cs.extend(cs_y);
    if !remove_redundant_constraints(&mut cs, &DenseSimplex, tol)? {
        return Ok(Set::empty(x.dim));
    }
    let verts = h_to_vertices(x.dim, &cs, tol);
    if verts.is_empty() {
        return Ok(Set::empty(x.dim));
    }
    Ok(Set::VPolytope(VPolytope::from_vertices(x.dim, verts)?))
}

fn one_d_bounds(p: &VPolytope) -> (f64, f64) {
    let lo = p.vertices.iter().map(|v| v[0]).fold(f64::INFINITY, f64::min);
    let hi = p
        .vertices
        .iter()
        .map(|v| v[0])
        .fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}
