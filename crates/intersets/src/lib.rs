//! Symbolic convex-set representations and a pairwise intersection engine.
//!
//! Sets are represented lazily where that pays off (linear maps, Cartesian
//! products, unions hold their operands by shared reference) and concretely
//! otherwise. Three pieces carry the crate:
//!
//! - the support function/vector protocol every convex representation
//!   answers (`Set::support_function` / `Set::support_vector`),
//! - the ordered constraint-list machinery for planar polygons
//!   (`sets::polygon`),
//! - the pairwise intersection dispatcher (`intersection`), which resolves
//!   each representation pair to a bespoke geometric algorithm, a generic
//!   polyhedral path, or a support-function fallback.
//!
//! Numeric comparisons run through a single tolerance configuration
//! (`Tol`); redundancy elimination consumes an LP backend through the
//! `lp::FeasibilityOracle` trait.

pub mod cfg;
pub mod error;
pub mod intersect;
pub mod lp;
pub mod sets;
pub mod support;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::Tol;
pub use error::{SetError, SetKind};
pub use intersect::{intersection, intersection_with};
pub use sets::Set;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::Tol;
    pub use crate::error::{SetError, SetKind};
    pub use crate::intersect::{intersection, intersection_with};
    pub use crate::lp::{DenseSimplex, FeasibilityOracle, LpStatus};
    pub use crate::sets::{
        Ball, CartesianProductArray, EmptySet, HPoly, HPolygon, HalfSpace, Hs2, Hyperplane,
        Hyperrect, Interval, LinearMap, Line2, Segment2, Set, Singleton, Star, UnionSet,
        UnionSetArray, Universe, VPolygon, VPolytope, Zonotope,
    };
}
