//! Curve intersection by bounding-box subdivision.
//!
//! Curves are wrapped in lazily split bounding-box trees. Pairs of nodes whose
//! boxes overlap are split until both sides are indivisible; each surviving
//! leaf pair is then refined numerically to a precise parameter pair.
//!
//! # Example
//!
//! ```
//! use splinekit::intersect::{curve_curve, IntersectionOptions};
//! use splinekit::{Line3, Point3};
//!
//! let a = Line3::new(Point3::new(0.0_f64, 0.0, 0.0), Point3::new(2.0, 2.0, 0.0))
//!     .unwrap()
//!     .to_nurbs()
//!     .unwrap();
//! let b = Line3::new(Point3::new(0.0, 2.0, 0.0), Point3::new(2.0, 0.0, 0.0))
//!     .unwrap()
//!     .to_nurbs()
//!     .unwrap();
//!
//! let hits = curve_curve(&a, &b, &IntersectionOptions::default()).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].t1 - 0.5).abs() < 1e-9);
//! ```

mod curve_curve;
mod curve_plane;
mod objective;
mod options;
mod tree;

pub use curve_curve::{curve_curve, curve_line, CurveCurveIntersection};
pub use curve_plane::{curve_plane, CurvePlaneIntersection};
pub use objective::ChordLengthObjective;
pub use options::IntersectionOptions;
pub use tree::{BoundingBoxTree, LazyCurveBoundingBoxTree};
