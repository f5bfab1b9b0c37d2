//! In-memory stand-in for the host engine.
//!
//! Records every command it receives, keeps just enough world state to answer queries, and
//! simulates nothing. Used for tests and for the command-line demo.

use crate::{
    body_registry::BodyKey,
    boundary::SceneBoundary,
    engine::{
        CubeSpec,
        Engine,
    },
    plane::{
        PlaneId,
        PlaneVisual,
    },
};
use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
};
use vek::*;
use anyhow::{
    anyhow,
    ensure,
    Result,
};


/// Command received by a `HeadlessEngine`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPlane(PlaneVisual),
    UpdatePlane(PlaneVisual),
    RemovePlane(PlaneId),
    AddBoundary(SceneBoundary),
    SpawnBody(CubeSpec),
    ApplyImpulse {
        key: BodyKey,
        impulse: Vec3<f32>,
        offset: Vec3<f32>,
    },
    DespawnBody(BodyKey),
    SetLightIntensity(f32),
    StopPlaneDetection,
    ShowNotice(String),
    ClearNotice,
}

/// Body as tracked by a `HeadlessEngine`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadlessBody {
    pub position: Vec3<f32>,
    /// Sum of applied impulses divided by mass. Never integrated.
    pub velocity: Vec3<f32>,
    pub mass: f32,
}

/// Engine with no rendering or physics.
///
/// Every plane anchor sits at the world origin, so a plane covers the rectangle of its extent
/// around its node position, at height 0. A hit test casts straight down through world `(x, z)`
/// taken from the screen point.
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    pub commands: Vec<Command>,
    pub planes: HashMap<PlaneId, PlaneVisual>,
    pub bodies: BTreeMap<BodyKey, HeadlessBody>,
    pub boundary: Option<SceneBoundary>,
    pub light_intensity: Option<f32>,
    pub detecting_planes: bool,
    pub notice: Option<String>,
    /// Spawning fails once this many bodies exist.
    pub max_bodies: Option<usize>,
    /// Bodies that reject impulses, as a frozen body would.
    pub frozen_bodies: BTreeSet<BodyKey>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        HeadlessEngine {
            detecting_planes: true,
            ..Default::default()
        }
    }

    /// Move a body, as the physics engine would.
    pub fn set_body_position(&mut self, key: BodyKey, position: Vec3<f32>) {
        if let Some(body) = self.bodies.get_mut(&key) {
            body.position = position;
        }
    }

    /// Drop a body without telling anyone, as an engine culling it would.
    pub fn cull_body(&mut self, key: BodyKey) {
        self.bodies.remove(&key);
    }

    /// Whether a body is below the top of the scene boundary.
    pub fn touches_boundary(&self, key: BodyKey) -> bool {
        match (self.boundary.as_ref(), self.bodies.get(&key)) {
            (Some(boundary), Some(body)) =>
                body.position.y <= boundary.position.y + boundary.size.h / 2.0,
            _ => false,
        }
    }

    /// Impulses applied so far, in order.
    pub fn impulses(&self) -> Vec<(BodyKey, Vec3<f32>)> {
        self.commands.iter()
            .filter_map(|command| match command {
                &Command::ApplyImpulse { key, impulse, .. } => Some((key, impulse)),
                _ => None,
            })
            .collect()
    }
}

impl Engine for HeadlessEngine {
    fn hit_test(&self, point: Vec2<f32>) -> Vec<Vec3<f32>> {
        let mut hits = self.planes
            .values()
            .filter(|visual| visual.accepts_hit_tests)
            .filter(|visual| {
                let half = Vec2::new(visual.size.w, visual.size.d) / 2.0;
                (point.x - visual.position.x).abs() <= half.x
                    && (point.y - visual.position.z).abs() <= half.y
            })
            .map(|visual| (visual.id.clone(), Vec3::new(point.x, visual.position.y, point.y)))
            .collect::<Vec<_>>();
        // every hit is at height 0 and so equally near, order by id to stay deterministic
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        hits.into_iter().map(|(_, hit)| hit).collect()
    }

    fn body_position(&self, key: BodyKey) -> Option<Vec3<f32>> {
        self.bodies.get(&key).map(|body| body.position)
    }

    fn add_plane(&mut self, visual: &PlaneVisual) -> Result<()> {
        ensure!(self.detecting_planes, "plane detection is stopped");
        self.commands.push(Command::AddPlane(visual.clone()));
        self.planes.insert(visual.id.clone(), visual.clone());
        Ok(())
    }

    fn update_plane(&mut self, visual: &PlaneVisual) -> Result<()> {
        let slot = self.planes
            .get_mut(&visual.id)
            .ok_or_else(|| anyhow!("no plane node {}", visual.id))?;
        *slot = visual.clone();
        self.commands.push(Command::UpdatePlane(visual.clone()));
        Ok(())
    }

    fn remove_plane(&mut self, id: &PlaneId) -> Result<()> {
        self.planes.remove(id).ok_or_else(|| anyhow!("no plane node {}", id))?;
        self.commands.push(Command::RemovePlane(id.clone()));
        Ok(())
    }

    fn add_boundary(&mut self, boundary: &SceneBoundary) -> Result<()> {
        ensure!(self.boundary.is_none(), "scene boundary already added");
        self.boundary = Some(boundary.clone());
        self.commands.push(Command::AddBoundary(boundary.clone()));
        Ok(())
    }

    fn spawn_body(&mut self, cube: &CubeSpec) -> Result<()> {
        ensure!(!self.bodies.contains_key(&cube.key), "body {:?} already exists", cube.key);
        if let Some(max) = self.max_bodies {
            ensure!(self.bodies.len() < max, "body limit {} reached", max);
        }
        self.bodies.insert(cube.key, HeadlessBody {
            position: cube.position,
            velocity: Vec3::zero(),
            mass: cube.mass,
        });
        self.commands.push(Command::SpawnBody(cube.clone()));
        Ok(())
    }

    fn apply_impulse(&mut self, key: BodyKey, impulse: Vec3<f32>, offset: Vec3<f32>) -> Result<()> {
        ensure!(!self.frozen_bodies.contains(&key), "body {:?} is frozen", key);
        let body = self.bodies.get_mut(&key).ok_or_else(|| anyhow!("no body {:?}", key))?;
        body.velocity += impulse / body.mass;
        self.commands.push(Command::ApplyImpulse { key, impulse, offset });
        Ok(())
    }

    fn despawn_body(&mut self, key: BodyKey) -> Result<()> {
        self.bodies.remove(&key).ok_or_else(|| anyhow!("no body {:?}", key))?;
        self.commands.push(Command::DespawnBody(key));
        Ok(())
    }

    fn set_light_intensity(&mut self, intensity: f32) -> Result<()> {
        self.light_intensity = Some(intensity);
        self.commands.push(Command::SetLightIntensity(intensity));
        Ok(())
    }

    fn stop_plane_detection(&mut self) -> Result<()> {
        self.detecting_planes = false;
        self.commands.push(Command::StopPlaneDetection);
        Ok(())
    }

    fn show_notice(&mut self, text: &str) -> Result<()> {
        self.notice = Some(text.to_owned());
        self.commands.push(Command::ShowNotice(text.to_owned()));
        Ok(())
    }

    fn clear_notice(&mut self) -> Result<()> {
        self.notice = None;
        self.commands.push(Command::ClearNotice);
        Ok(())
    }
}
