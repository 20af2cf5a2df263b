//! splinekit - NURBS curves and surfaces
//!
//! Construction, evaluation and modification of non-uniform rational
//! B-splines, following the algorithms of *The NURBS Book* (Piegl & Tiller).
//! Curves can be refined, split, decomposed into Bézier segments, elevated,
//! measured and intersected with each other and with planes.
//!
//! All geometry is generic over [`num_traits::Float`], so `f32` and `f64`
//! both work. Every value is immutable: operations return new curves.
//!
//! ```
//! use splinekit::{NurbsCurve, Point3};
//!
//! // Rational quadratic quarter circle.
//! let w = std::f64::consts::FRAC_1_SQRT_2;
//! let quadrant = NurbsCurve::new(
//!     2,
//!     vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
//!     vec![
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     Some(vec![1.0, w, 1.0]),
//! )
//! .unwrap();
//!
//! let p = quadrant.point_at(0.5).unwrap();
//! assert!((p.distance(Point3::origin()) - 1.0).abs() < 1e-12);
//!
//! let (left, right) = quadrant.split(0.5).unwrap();
//! assert_eq!(left.domain(), (0.0, 0.5));
//! assert_eq!(right.domain(), (0.5, 1.0));
//! ```

pub mod bounds;
pub mod curves;
pub mod error;
pub mod fit;
pub mod intersect;
pub mod knots;
pub mod linalg;
pub mod nurbs;
pub mod primitives;
pub mod tolerance;

pub use bounds::Aabb3;
pub use curves::{Arc3, Curve, Parametric, PolyCurve};
pub use error::{SplineError, SplineResult};
pub use intersect::{CurveCurveIntersection, CurvePlaneIntersection, IntersectionOptions};
pub use knots::KnotVector;
pub use nurbs::{NurbsCurve, NurbsSurface};
pub use primitives::{Line3, Plane3, Point3, Point4, Transform3, Vec3};
