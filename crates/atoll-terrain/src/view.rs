//! Axis-aligned view volume in f64 world space.

use glam::DVec3;

/// Axis-aligned bounding box.
///
/// Invariant: `min.x <= max.x`, `min.y <= max.y`, `min.z <= max.z`.
/// The constructor enforces this by sorting components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create an AABB from two corners, sorting components so min <= max.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from a center point and half-extents.
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if this AABB overlaps with other
    /// (including touching edges/faces).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_sorts_corners() {
        let aabb = Aabb::new(DVec3::new(5.0, 0.0, -1.0), DVec3::new(-5.0, 2.0, 3.0));
        assert_eq!(aabb.min, DVec3::new(-5.0, 0.0, -1.0));
        assert_eq!(aabb.max, DVec3::new(5.0, 2.0, 3.0));
    }

    #[test]
    fn test_contains_point_boundary_inclusive() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::splat(10.0));
        assert!(aabb.contains_point(DVec3::ZERO));
        assert!(aabb.contains_point(DVec3::splat(10.0)));
        assert!(!aabb.contains_point(DVec3::new(10.1, 0.0, 0.0)));
    }

    #[test]
    fn test_intersects_touching_counts() {
        let a = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        let b = Aabb::new(DVec3::splat(1.0), DVec3::splat(2.0));
        let c = Aabb::new(DVec3::splat(1.5), DVec3::splat(2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
