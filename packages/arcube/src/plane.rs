//! Detected planes and how the engine should draw them.

use crate::boundary::CollisionCategory;
use std::fmt;
use vek::*;


/// Thickness of the box used to represent a plane. Planes are boxes rather than flat quads so that
/// the physics engine has something with volume for cubes to rest on.
pub const PLANE_HEIGHT: f32 = 0.01;

/// Index of the top face among the six face materials of a box, in engine face order.
pub const TOP_FACE: usize = 4;


/// Opaque identifier of a detected surface. Assigned by the engine, never generated locally.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PlaneId(pub String);

impl From<&str> for PlaneId {
    fn from(s: &str) -> Self {
        PlaneId(s.to_owned())
    }
}

impl From<String> for PlaneId {
    fn from(s: String) -> Self {
        PlaneId(s)
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


/// Mirror of one detected physical surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneRecord {
    pub id: PlaneId,
    /// Surface centroid in world space.
    pub center: Vec3<f32>,
    /// Width (x) and depth (z) of the surface's bounding rectangle. Never negative.
    pub extent: Extent2<f32>,
    /// When false the plane renders fully transparent and is excluded from hit tests.
    pub visible: bool,
}

impl PlaneRecord {
    /// Construct a visible record. Negative or NaN extent components are clamped to 0.
    pub fn new(id: PlaneId, center: Vec3<f32>, extent: Extent2<f32>) -> Self {
        PlaneRecord {
            id,
            center,
            extent: sanitize_extent(extent),
            visible: true,
        }
    }

    /// Replace geometry in place, keeping identity and visibility.
    pub fn set_geometry(&mut self, center: Vec3<f32>, extent: Extent2<f32>) {
        self.center = center;
        self.extent = sanitize_extent(extent);
    }
}

// clamp to non-negative, NaN becomes 0
pub(crate) fn sanitize_extent(extent: Extent2<f32>) -> Extent2<f32> {
    Extent2::new(extent.w.max(0.0), extent.h.max(0.0))
}


/// Material of one face of a plane box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FaceMaterial {
    /// Fully transparent.
    Transparent,
    /// Repeating grid texture.
    Grid {
        /// Texture coordinate scale, so the grid repeats once per world unit.
        scale: Vec2<f32>,
    },
}

/// Declarative description of the engine-side node for a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneVisual {
    pub id: PlaneId,
    /// Node position relative to the surface anchor.
    pub position: Vec3<f32>,
    /// Offset of the box geometry within the node, so its top face sits on the surface.
    pub geometry_offset: Vec3<f32>,
    /// Box dimensions, `w` along x, `h` vertical, `d` along z.
    pub size: Extent3<f32>,
    /// Face materials in engine face order.
    pub materials: [FaceMaterial; 6],
    /// Collision category of the kinematic body built from the box.
    pub category: CollisionCategory,
    /// Whether the engine should return this plane from hit tests.
    pub accepts_hit_tests: bool,
}

impl PlaneVisual {
    pub fn from_record(record: &PlaneRecord) -> Self {
        let width = record.extent.w;
        let length = record.extent.h;

        let mut materials = [FaceMaterial::Transparent; 6];
        if record.visible {
            materials[TOP_FACE] = FaceMaterial::Grid {
                scale: Vec2::new(width, length),
            };
        }

        PlaneVisual {
            id: record.id.clone(),
            position: Vec3::new(record.center.x, 0.0, record.center.z),
            geometry_offset: Vec3::new(0.0, -PLANE_HEIGHT / 2.0, 0.0),
            size: Extent3::new(width, PLANE_HEIGHT, length),
            materials,
            category: CollisionCategory::PLANE,
            accepts_hit_tests: record.visible,
        }
    }

    /// Whether any face is drawn at all.
    pub fn is_transparent(&self) -> bool {
        self.materials.iter().all(|&m| m == FaceMaterial::Transparent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extent_clamped() {
        let record = PlaneRecord::new(
            "A".into(),
            Vec3::zero(),
            Extent2::new(-1.0, f32::NAN),
        );
        assert_eq!(record.extent, Extent2::new(0.0, 0.0));
        assert!(record.visible);
    }

    #[test]
    fn visible_plane_has_grid_on_top_only() {
        let record = PlaneRecord::new(
            "A".into(),
            Vec3::new(1.0, 2.0, 3.0),
            Extent2::new(2.0, 0.5),
        );
        let visual = PlaneVisual::from_record(&record);
        for (i, &material) in visual.materials.iter().enumerate() {
            if i == TOP_FACE {
                assert_eq!(material, FaceMaterial::Grid { scale: Vec2::new(2.0, 0.5) });
            } else {
                assert_eq!(material, FaceMaterial::Transparent);
            }
        }
        assert_eq!(visual.position, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(visual.size, Extent3::new(2.0, PLANE_HEIGHT, 0.5));
        assert_eq!(visual.geometry_offset.y, -PLANE_HEIGHT / 2.0);
        assert!(visual.accepts_hit_tests);
        assert!(!visual.is_transparent());
    }

    #[test]
    fn hidden_plane_is_transparent() {
        let mut record = PlaneRecord::new("A".into(), Vec3::zero(), Extent2::new(1.0, 1.0));
        record.visible = false;
        let visual = PlaneVisual::from_record(&record);
        assert!(visual.is_transparent());
        assert!(!visual.accepts_hit_tests);
    }
}
