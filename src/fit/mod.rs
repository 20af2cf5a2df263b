//! Curve fitting.
//!
//! # Example
//!
//! ```
//! use splinekit::fit::interpolate;
//! use splinekit::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0_f64, 0.0, 0.0),
//!     Point3::new(1.0, 2.0, 0.0),
//!     Point3::new(2.0, 2.5, 0.0),
//!     Point3::new(3.0, 1.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//! ];
//!
//! let curve = interpolate(&points, 3).unwrap();
//! // The curve passes through every input point.
//! let end = curve.end_point().unwrap();
//! assert!(end.distance(points[4]) < 1e-12);
//! ```

mod interpolate;

pub use interpolate::{chord_length_parameterize, interpolate};
