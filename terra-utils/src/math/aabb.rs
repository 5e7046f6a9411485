//! Double-precision axis-aligned bounding box, used for entity collision
//! bounds and broad-phase queries (§3 Entity bounding box).

/// A double-precision axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl Aabb {
    /// Creates a new AABB from min and max coordinates.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Builds the standard centered bounding box for an entity of the given
    /// width/height, anchored with its feet at `(x, y, z)`.
    #[must_use]
    pub fn centered_at(x: f64, y: f64, z: f64, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self::new(x - half, y, z - half, x + half, y + height, z + half)
    }

    /// Returns a copy of this box translated by the given offsets.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.min_z + dz,
            self.max_x + dx,
            self.max_y + dy,
            self.max_z + dz,
        )
    }

    /// Whether this box intersects another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }

    /// Whether the given point lies within this box.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        x >= self.min_x
            && x <= self.max_x
            && y >= self.min_y
            && y <= self.max_y
            && z >= self.min_z
            && z <= self.max_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let b = Aabb::new(0.5, 0.5, 0.5, 1.5, 1.5, 1.5);
        assert!(a.intersects(&b));
    }

    #[test]
    fn does_not_intersect_disjoint_boxes() {
        let a = Aabb::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let b = Aabb::new(2.0, 2.0, 2.0, 3.0, 3.0, 3.0);
        assert!(!a.intersects(&b));
    }
}
