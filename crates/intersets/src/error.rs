//! Error taxonomy for set queries and the intersection engine.
//!
//! Policy
//! - `DimensionMismatch`, `Unsupported`, `Precondition`, and `Solver` are
//!   programmer/configuration errors: they abort the current call.
//! - Numerical infeasibility is *not* an error anywhere in this crate; it is
//!   translated to the `EmptySet` result value by the callers of the LP layer.

use std::fmt;

/// Discriminant of a concrete set representation, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetKind {
    Empty,
    Universe,
    Singleton,
    Interval,
    HalfSpace,
    Hyperplane,
    Line2,
    Segment2,
    Ball,
    Hyperrect,
    HPolygon,
    VPolygon,
    HPolytope,
    HPolyhedron,
    VPolytope,
    Zonotope,
    Star,
    LinearMap,
    Product,
    Union,
    UnionArray,
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetKind::Empty => "EmptySet",
            SetKind::Universe => "Universe",
            SetKind::Singleton => "Singleton",
            SetKind::Interval => "Interval",
            SetKind::HalfSpace => "HalfSpace",
            SetKind::Hyperplane => "Hyperplane",
            SetKind::Line2 => "Line2",
            SetKind::Segment2 => "Segment2",
            SetKind::Ball => "Ball",
            SetKind::Hyperrect => "Hyperrect",
            SetKind::HPolygon => "HPolygon",
            SetKind::VPolygon => "VPolygon",
            SetKind::HPolytope => "HPolytope",
            SetKind::HPolyhedron => "HPolyhedron",
            SetKind::VPolytope => "VPolytope",
            SetKind::Zonotope => "Zonotope",
            SetKind::Star => "Star",
            SetKind::LinearMap => "LinearMap",
            SetKind::Product => "CartesianProductArray",
            SetKind::Union => "UnionSet",
            SetKind::UnionArray => "UnionSetArray",
        };
        write!(f, "{}", name)
    }
}

/// Errors surfaced by set construction, queries, and intersection.
#[derive(Clone, Debug, PartialEq)]
pub enum SetError {
    /// Operands of incompatible ambient dimension.
    DimensionMismatch { lhs: usize, rhs: usize },
    /// No intersection algorithm resolves for the given representation pair.
    Unsupported { lhs: SetKind, rhs: SetKind },
    /// A documented invariant or precondition does not hold.
    Precondition { reason: String },
    /// The LP backend failed for a reason other than reporting infeasibility.
    Solver { reason: String },
}

impl SetError {
    pub(crate) fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    pub(crate) fn solver(reason: impl Into<String>) -> Self {
        Self::Solver {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::DimensionMismatch { lhs, rhs } => {
                write!(f, "ambient dimensions differ: {} vs {}", lhs, rhs)
            }
            SetError::Unsupported { lhs, rhs } => {
                write!(f, "no intersection algorithm for {} vs {}", lhs, rhs)
            }
            SetError::Precondition { reason } => write!(f, "precondition violated: {}", reason),
            SetError::Solver { reason } => write!(f, "LP backend failure: {}", reason),
        }
    }
}

impl std::error::Error for SetError {}
