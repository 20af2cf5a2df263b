//! Knot vectors: validation, span search, multiplicities and generation.

mod knot_vector;

pub use knot_vector::KnotVector;
