//! Collision categories and the invisible floor far below the tracked world.

use std::ops::BitOr;
use vek::*;


/// Bitmask of collision categories, as the physics engine understands them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct CollisionCategory(pub u32);

impl CollisionCategory {
    pub const NONE: CollisionCategory = CollisionCategory(0);
    pub const BOUNDARY: CollisionCategory = CollisionCategory(1 << 0);
    pub const CUBE: CollisionCategory = CollisionCategory(1 << 1);
    pub const PLANE: CollisionCategory = CollisionCategory(1 << 2);

    pub fn contains(self, other: CollisionCategory) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: CollisionCategory) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for CollisionCategory {
    type Output = CollisionCategory;

    fn bitor(self, rhs: CollisionCategory) -> CollisionCategory {
        CollisionCategory(self.0 | rhs.0)
    }
}


/// Static, invisible, kinematic slab far below the tracked surfaces. Cubes that fall off a plane
/// eventually touch it, at which point the engine reports the contact and the cube is despawned.
///
/// Registered once at scene setup. Has no runtime logic.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBoundary {
    /// World position of the slab's center.
    pub position: Vec3<f32>,
    /// Slab dimensions: very wide, very thin.
    pub size: Extent3<f32>,
    /// Always true. The slab is never drawn.
    pub transparent: bool,
    pub category: CollisionCategory,
    /// Categories whose contacts with the slab the engine must report.
    pub contact_test: CollisionCategory,
}

impl SceneBoundary {
    pub const DEPTH: f32 = 10.0;

    /// A boundary `depth` units below the world origin.
    pub fn at_depth(depth: f32) -> Self {
        SceneBoundary {
            position: Vec3::new(0.0, -depth, 0.0),
            size: Extent3::new(1000.0, 0.5, 1000.0),
            transparent: true,
            category: CollisionCategory::BOUNDARY,
            contact_test: CollisionCategory::CUBE,
        }
    }
}

impl Default for SceneBoundary {
    fn default() -> Self {
        Self::at_depth(Self::DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_distinct() {
        let cats = [
            CollisionCategory::BOUNDARY,
            CollisionCategory::CUBE,
            CollisionCategory::PLANE,
        ];
        for (i, a) in cats.iter().enumerate() {
            for b in &cats[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
        let both = CollisionCategory::CUBE | CollisionCategory::PLANE;
        assert!(both.contains(CollisionCategory::CUBE));
        assert!(!both.contains(CollisionCategory::BOUNDARY));
    }

    #[test]
    fn default_boundary_is_far_below() {
        let boundary = SceneBoundary::default();
        assert_eq!(boundary.position, Vec3::new(0.0, -10.0, 0.0));
        assert!(boundary.size.w > 100.0 && boundary.size.d > 100.0);
        assert!(boundary.size.h < 1.0);
        assert!(boundary.transparent);
        assert_eq!(boundary.category, CollisionCategory::BOUNDARY);
        assert!(boundary.contact_test.contains(CollisionCategory::CUBE));
    }
}
