//! Affine transforms in homogeneous 4×4 form.

use super::{Point3, Vec3};
use crate::error::SplineResult;
use num_traits::Float;

/// A 4×4 affine transform stored row-major.
///
/// The bottom row is always `[0, 0, 0, 1]` for transforms built through
/// this API; points are transformed as column vectors `M · [x y z 1]ᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3<F> {
    pub m: [[F; 4]; 4],
}

impl<F: Float> Transform3<F> {
    pub fn identity() -> Self {
        let (o, z) = (F::one(), F::zero());
        Self {
            m: [[o, z, z, z], [z, o, z, z], [z, z, o, z], [z, z, z, o]],
        }
    }

    pub fn translation(v: Vec3<F>) -> Self {
        let mut t = Self::identity();
        t.m[0][3] = v.x;
        t.m[1][3] = v.y;
        t.m[2][3] = v.z;
        t
    }

    /// Non-uniform scaling about the origin.
    pub fn scaling(sx: F, sy: F, sz: F) -> Self {
        let mut t = Self::identity();
        t.m[0][0] = sx;
        t.m[1][1] = sy;
        t.m[2][2] = sz;
        t
    }

    /// Rotation by `angle` radians about `axis` through the origin (Rodrigues).
    pub fn rotation(axis: Vec3<F>, angle: F) -> SplineResult<Self> {
        let a = axis.unitize()?;
        let (s, c) = angle.sin_cos();
        let t = F::one() - c;
        let mut r = Self::identity();
        r.m[0][0] = t * a.x * a.x + c;
        r.m[0][1] = t * a.x * a.y - s * a.z;
        r.m[0][2] = t * a.x * a.z + s * a.y;
        r.m[1][0] = t * a.x * a.y + s * a.z;
        r.m[1][1] = t * a.y * a.y + c;
        r.m[1][2] = t * a.y * a.z - s * a.x;
        r.m[2][0] = t * a.x * a.z - s * a.y;
        r.m[2][1] = t * a.y * a.z + s * a.x;
        r.m[2][2] = t * a.z * a.z + c;
        Ok(r)
    }

    /// Returns the transform that applies `self` first and then `next`.
    pub fn then(&self, next: &Self) -> Self {
        let mut out = [[F::zero(); 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).fold(F::zero(), |acc, k| acc + next.m[i][k] * self.m[k][j]);
            }
        }
        Self { m: out }
    }

    #[inline]
    pub fn apply_point(&self, p: Point3<F>) -> Point3<F> {
        let m = &self.m;
        Point3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Transforms a direction; translation does not apply.
    #[inline]
    pub fn apply_vector(&self, v: Vec3<F>) -> Vec3<F> {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl<F: Float> Default for Transform3<F> {
    fn default() -> Self {
        Self::identity()
    }
}
