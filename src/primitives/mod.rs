//! Floating-point geometric primitives and operations.

mod line3;
mod plane3;
mod point3;
mod point4;
mod transform3;
mod vec3;

pub use line3::Line3;
pub use plane3::Plane3;
pub use point3::Point3;
pub use point4::Point4;
pub use transform3::Transform3;
pub use vec3::Vec3;
