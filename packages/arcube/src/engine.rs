//! The boundary with the host AR/3D engine.
//!
//! Plane detection, hit testing, rendering and physics all belong to the host engine. It drives
//! the scene through `SceneEvents`, and the scene talks back to it through `Engine`, handing it
//! declarative descriptions to materialize and simulate.

use crate::{
    body_registry::BodyKey,
    boundary::{
        CollisionCategory,
        SceneBoundary,
    },
    gesture::Gesture,
    plane::{
        PlaneId,
        PlaneVisual,
    },
};
use vek::*;
use anyhow::Result;


/// Description of a cube for the engine to spawn as a dynamic body.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSpec {
    pub key: BodyKey,
    /// Initial world position of the cube's center.
    pub position: Vec3<f32>,
    /// Side length.
    pub size: f32,
    pub mass: f32,
    pub category: CollisionCategory,
    /// Categories whose contacts with the cube the engine must report.
    pub contact_test: CollisionCategory,
}

/// Why tracking quality is limited.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

/// Camera tracking quality, as reported by the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TrackingState {
    NotAvailable,
    Limited(LimitedReason),
    Normal,
}

impl TrackingState {
    /// Message to show the user, if any.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            TrackingState::NotAvailable => Some("Tracking unavailable"),
            TrackingState::Limited(LimitedReason::Initializing) => Some("Initializing"),
            TrackingState::Limited(LimitedReason::ExcessiveMotion) =>
                Some("Too much motion, try moving slower"),
            TrackingState::Limited(LimitedReason::InsufficientFeatures) =>
                Some("Not enough surface detail"),
            TrackingState::Limited(LimitedReason::Relocalizing) => Some("Relocalizing"),
            TrackingState::Normal => None,
        }
    }
}


/// The host engine, as seen by the scene.
///
/// Queries are infallible. Commands may fail, in which case the scene logs the failure and carries
/// on.
pub trait Engine {
    /// World-space intersections of the ray through a screen point with hit-testable planes,
    /// nearest first.
    fn hit_test(&self, point: Vec2<f32>) -> Vec<Vec3<f32>>;

    /// Current world position of a body, or `None` if the engine no longer has it.
    fn body_position(&self, key: BodyKey) -> Option<Vec3<f32>>;

    fn add_plane(&mut self, visual: &PlaneVisual) -> Result<()>;

    /// Replace geometry, materials and collision body of an existing plane node.
    fn update_plane(&mut self, visual: &PlaneVisual) -> Result<()>;

    fn remove_plane(&mut self, id: &PlaneId) -> Result<()>;

    fn add_boundary(&mut self, boundary: &SceneBoundary) -> Result<()>;

    fn spawn_body(&mut self, cube: &CubeSpec) -> Result<()>;

    /// Apply an instantaneous impulse at `offset` in the body's local frame.
    fn apply_impulse(&mut self, key: BodyKey, impulse: Vec3<f32>, offset: Vec3<f32>) -> Result<()>;

    fn despawn_body(&mut self, key: BodyKey) -> Result<()>;

    fn set_light_intensity(&mut self, intensity: f32) -> Result<()>;

    /// Stop detecting new planes and updating existing ones.
    fn stop_plane_detection(&mut self) -> Result<()>;

    /// Show a message overlay to the user, replacing any current one.
    fn show_notice(&mut self, text: &str) -> Result<()>;

    fn clear_notice(&mut self) -> Result<()>;
}


/// Events flowing from the host into the scene. One method per kind of event.
pub trait SceneEvents {
    fn on_plane_detected(&mut self, id: PlaneId, center: Vec3<f32>, extent: Extent2<f32>);

    fn on_plane_updated(&mut self, id: PlaneId, center: Vec3<f32>, extent: Extent2<f32>);

    fn on_plane_removed(&mut self, id: PlaneId);

    /// Single tap at a screen point.
    fn on_tap(&mut self, point: Vec2<f32>);

    /// Single-finger long press began at a screen point.
    fn on_long_press(&mut self, point: Vec2<f32>);

    /// Two-finger long press began.
    fn on_two_finger_long_press(&mut self);

    /// Per-frame tick, with the ambient light estimate if the engine has one.
    fn on_frame(&mut self, ambient_intensity: Option<f32>);

    /// A dynamic body touched the scene boundary.
    fn on_boundary_contact(&mut self, key: BodyKey);

    fn on_tracking_state(&mut self, state: TrackingState);

    fn on_session_failed(&mut self, error: &str);

    fn on_session_interrupted(&mut self);

    fn on_session_interruption_ended(&mut self);

    /// Dispatch a recognized gesture to the matching method.
    fn on_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap(point) => self.on_tap(point),
            Gesture::LongPress(point) => self.on_long_press(point),
            Gesture::TwoFingerLongPress(_) => self.on_two_finger_long_press(),
        }
    }
}
