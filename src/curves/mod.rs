//! Analytic curves and the [`Curve`] enum that unifies them with NURBS.
//!
//! Lines, arcs and NURBS curves all implement [`Parametric`], so code that
//! only needs to evaluate or measure a curve can stay generic over its kind.
//! Anything beyond that (splitting, refinement, intersection) works on
//! [`NurbsCurve`](crate::NurbsCurve); use [`Curve::to_nurbs`] to get there.

mod arc;
mod curve;
mod polycurve;

pub use arc::Arc3;
pub use curve::{Curve, Parametric};
pub use polycurve::PolyCurve;
