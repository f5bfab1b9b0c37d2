//! See `SceneController`.

use crate::{
    body_registry::{
        BodyKey,
        DynamicBodyRegistry,
    },
    boundary::{
        CollisionCategory,
        SceneBoundary,
    },
    engine::{
        CubeSpec,
        Engine,
        SceneEvents,
        TrackingState,
    },
    explosion::{
        compute_impulses,
        ExplosionParams,
    },
    plane::{
        PlaneId,
        PlaneVisual,
    },
    plane_registry::PlaneRegistry,
    settings::Settings,
};
use std::collections::VecDeque;
use vek::*;
use anyhow::Result;


/// Owns all demo state and coordinates between the user, the registries and the engine.
///
/// Everything happens on the thread that delivers engine callbacks. Nothing in here is shared.
///
/// Explosions are not computed inside the gesture callback. They are queued and run by
/// `flush_deferred`, which the host should call once it has finished handling the current input
/// event, and which `on_frame` also calls. That way the positions sampled for an explosion come
/// from a completed physics step.
pub struct SceneController<E> {
    engine: E,
    settings: Settings,
    explosion: ExplosionParams,
    planes: PlaneRegistry,
    bodies: DynamicBodyRegistry,
    boundary: SceneBoundary,
    // latest light intensity pushed to the engine, after rescaling
    light_intensity: Option<f32>,
    deferred: VecDeque<Deferred>,
    detecting_planes: bool,
}

/// Work queued to run after the current event has been handled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Deferred {
    Explode {
        origin: Vec3<f32>,
    },
}

impl<E: Engine> SceneController<E> {
    /// Set up the scene, registering the scene boundary with the engine.
    pub fn new(mut engine: E, settings: Settings) -> Self {
        let boundary = SceneBoundary::default();
        log_failure(engine.add_boundary(&boundary), "add scene boundary");
        SceneController {
            engine,
            explosion: ExplosionParams::from_settings(&settings),
            settings,
            planes: PlaneRegistry::new(),
            bodies: DynamicBodyRegistry::new(),
            boundary,
            light_intensity: None,
            deferred: VecDeque::new(),
            detecting_planes: true,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    pub fn bodies(&self) -> &DynamicBodyRegistry {
        &self.bodies
    }

    pub fn boundary(&self) -> &SceneBoundary {
        &self.boundary
    }

    pub fn light_intensity(&self) -> Option<f32> {
        self.light_intensity
    }

    pub fn is_detecting_planes(&self) -> bool {
        self.detecting_planes
    }

    /// Queued work that has not run yet.
    pub fn deferred(&self) -> impl Iterator<Item=&Deferred> {
        self.deferred.iter()
    }

    /// Spawn a cube at a world position. Returns `None` if the engine refused it.
    pub fn place_cube(&mut self, position: Vec3<f32>) -> Option<BodyKey> {
        let key = self.bodies.add(position, self.settings.cube_mass);
        let cube = CubeSpec {
            key,
            position,
            size: self.settings.cube_size,
            mass: self.settings.cube_mass,
            category: CollisionCategory::CUBE,
            contact_test: CollisionCategory::BOUNDARY,
        };
        match self.engine.spawn_body(&cube) {
            Ok(()) => {
                debug!(?key, ?position, "placed cube");
                Some(key)
            }
            Err(e) => {
                warn!(%e, "engine failed to spawn cube");
                self.bodies.remove(key);
                None
            }
        }
    }

    /// Queue an explosion centered on a world position.
    pub fn queue_explosion(&mut self, origin: Vec3<f32>) {
        self.deferred.push_back(Deferred::Explode { origin });
    }

    /// Run all queued work, in the order it was queued. Returns how many impulses the engine
    /// accepted.
    pub fn flush_deferred(&mut self) -> usize {
        let mut applied = 0;
        while let Some(task) = self.deferred.pop_front() {
            match task {
                Deferred::Explode { origin } => applied += self.explode(origin),
            }
        }
        applied
    }

    /// Make every plane transparent and stop detecting more of them.
    pub fn hide_planes(&mut self) {
        let visuals = self.planes
            .hide_all()
            .into_iter()
            .map(PlaneVisual::from_record)
            .collect::<Vec<_>>();
        info!(count=visuals.len(), "hiding planes");
        for visual in &visuals {
            log_failure(self.engine.update_plane(visual), "hide plane");
        }
        if self.detecting_planes {
            log_failure(self.engine.stop_plane_detection(), "stop plane detection");
            self.detecting_planes = false;
        }
    }

    // sample positions, solve, hand impulses to the engine
    fn explode(&mut self, origin: Vec3<f32>) -> usize {
        self.refresh_positions();
        let impulses = compute_impulses(origin, self.bodies.snapshot(), &self.explosion);
        let mut applied = 0;
        for (key, impulse) in impulses {
            if impulse == Vec3::zero() {
                continue;
            }
            match self.engine.apply_impulse(key, impulse, self.explosion.offset) {
                Ok(()) => applied += 1,
                Err(e) => warn!(%e, ?key, "engine failed to apply explosion impulse"),
            }
        }
        info!(?origin, applied, total=self.bodies.len(), "explosion");
        applied
    }

    // pull fresh positions from the engine, dropping bodies it no longer has
    fn refresh_positions(&mut self) {
        for key in self.bodies.all() {
            match self.engine.body_position(key) {
                Some(position) => {
                    self.bodies.set_position(key, position);
                }
                None => {
                    debug!(?key, "engine no longer has body, forgetting it");
                    self.bodies.remove(key);
                }
            }
        }
    }

    fn notify(&mut self, text: &str) {
        log_failure(self.engine.show_notice(text), "show notice");
    }
}

impl<E: Engine> SceneEvents for SceneController<E> {
    fn on_plane_detected(&mut self, id: PlaneId, center: Vec3<f32>, extent: Extent2<f32>) {
        let existed = self.planes.get(&id).is_some();
        let visual = PlaneVisual::from_record(self.planes.on_detected(id, center, extent));
        if existed {
            log_failure(self.engine.update_plane(&visual), "replace plane");
        } else if let Err(e) = self.engine.add_plane(&visual) {
            // no node to update or hide later, so don't track it
            warn!(%e, id=%visual.id, "engine failed to add plane, forgetting it");
            self.planes.on_removed(&visual.id);
        } else {
            debug!(id=%visual.id, "plane detected");
        }
    }

    fn on_plane_updated(&mut self, id: PlaneId, center: Vec3<f32>, extent: Extent2<f32>) {
        if let Some(record) = self.planes.on_updated(&id, center, extent) {
            let visual = PlaneVisual::from_record(record);
            log_failure(self.engine.update_plane(&visual), "update plane");
        }
    }

    fn on_plane_removed(&mut self, id: PlaneId) {
        if self.planes.on_removed(&id).is_some() {
            debug!(%id, "plane removed");
            log_failure(self.engine.remove_plane(&id), "remove plane");
        }
    }

    fn on_tap(&mut self, point: Vec2<f32>) {
        let Some(&hit) = self.engine.hit_test(point).first() else {
            debug!(?point, "tap hit no plane");
            return;
        };
        self.place_cube(hit + Vec3::unit_y() * self.settings.insertion_y_offset);
    }

    fn on_long_press(&mut self, point: Vec2<f32>) {
        let Some(&hit) = self.engine.hit_test(point).first() else {
            debug!(?point, "long press hit no plane");
            return;
        };
        self.queue_explosion(hit - Vec3::unit_y() * self.settings.explosion_y_offset);
    }

    fn on_two_finger_long_press(&mut self) {
        self.hide_planes();
    }

    fn on_frame(&mut self, ambient_intensity: Option<f32>) {
        if let Some(ambient) = ambient_intensity {
            let intensity = ambient * self.settings.light_intensity_scale;
            if self.light_intensity != Some(intensity) {
                self.light_intensity = Some(intensity);
                log_failure(self.engine.set_light_intensity(intensity), "set light intensity");
            }
        }
        self.flush_deferred();
    }

    fn on_boundary_contact(&mut self, key: BodyKey) {
        if self.bodies.remove(key).is_some() {
            debug!(?key, "body fell out of the world");
            log_failure(self.engine.despawn_body(key), "despawn body");
        } else {
            trace!(?key, "boundary contact for unknown body");
        }
    }

    fn on_tracking_state(&mut self, state: TrackingState) {
        match state.notice() {
            Some(text) => {
                info!(?state, "tracking limited");
                self.notify(text);
            }
            None => {
                info!("tracking normal");
                log_failure(self.engine.clear_notice(), "clear notice");
            }
        }
    }

    fn on_session_failed(&mut self, error: &str) {
        warn!(%error, "session failed");
        self.notify(&format!("Session failed: {}", error));
    }

    fn on_session_interrupted(&mut self) {
        info!("session interrupted");
        self.notify("Session interrupted");
    }

    fn on_session_interruption_ended(&mut self) {
        info!("session interruption ended");
        self.notify("Session resumed");
    }
}

// engine command failures are never fatal
fn log_failure(result: Result<()>, what: &str) {
    if let Err(e) = result {
        warn!(%e, "engine failed to {}", what);
    }
}
