//! NURBS curves and surfaces: basis functions, evaluation, knot refinement,
//! splitting, degree elevation and length queries.
//!
//! The free functions in this module are the algorithms; [`NurbsCurve`] and
//! [`NurbsSurface`] expose them as methods.

mod analyze;
mod basis;
mod curve;
mod elevate;
mod evaluate;
mod homogeneous;
mod refine;
mod surface;

pub use analyze::{
    closest_parameter, divide_by_count, length, length_at, parameter_at_chord_length,
    parameter_at_length,
};
pub use basis::{basis_functions, binomial, derivative_basis_functions};
pub use curve::NurbsCurve;
pub(crate) use curve::clamp_to_domain;
pub use elevate::elevate_degree;
pub use evaluate::{
    curve_derivatives, curve_point_at, rational_curve_derivatives, rational_surface_derivatives,
    surface_derivatives, surface_point_at,
};
pub use homogeneous::{
    dehomogenize_1d, dehomogenize_2d, homogenize_1d, homogenize_2d, weight_1d, weight_2d,
};
pub use refine::{decompose_into_beziers, knot_refine, split};
pub use surface::NurbsSurface;
