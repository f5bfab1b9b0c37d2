//! Augmented reality cube demo core.
//!
//! The host AR engine does plane detection, hit testing, rendering and physics. This crate is the
//! bookkeeping layer between that engine and the user: it mirrors detected planes, tracks the
//! cubes the user drops onto them, and works out the impulses of a long-press explosion.
//!
//! The entry point is `scene::SceneController`, which is driven through the `engine::SceneEvents`
//! trait and talks back to the host through the `engine::Engine` trait.

#[macro_use]
extern crate tracing;

pub mod logging;
pub mod settings;
pub mod plane;
pub mod plane_registry;
pub mod body_registry;
pub mod explosion;
pub mod boundary;
pub mod gesture;
pub mod engine;
pub mod headless;
pub mod scene;
