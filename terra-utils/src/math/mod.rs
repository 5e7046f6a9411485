//! Math primitives shared across the crate: vectors and axis-aligned bounding boxes.
mod aabb;
mod vector2;
mod vector3;

pub use aabb::Aabb;
pub use vector2::Vector2;
pub use vector3::{Axis, Vector3};
