//! Radial explosion impulses.
//!
//! An explosion pushes every nearby object directly away from the blast origin. The push falls off
//! quadratically with distance, reaching zero at `max_distance`:
//!
//! ```text
//! falloff = max(0, max_distance - distance)
//! impulse = direction * falloff^2 * strength
//! ```
//!
//! The engine should apply each impulse instantaneously and at `offset` from the object's center
//! of mass in its local frame, so struck objects tumble instead of sliding.

use crate::settings::Settings;
use vek::*;


/// Tunables of an explosion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExplosionParams {
    /// Distance at and beyond which objects are unaffected.
    pub max_distance: f32,
    /// Multiplier on the squared falloff.
    pub strength: f32,
    /// Impulse application point in the struck object's local frame.
    pub offset: Vec3<f32>,
}

impl ExplosionParams {
    pub fn from_settings(settings: &Settings) -> Self {
        ExplosionParams {
            max_distance: settings.explosion_max_distance,
            strength: settings.explosion_strength,
            offset: Vec3::from(settings.impulse_offset),
        }
    }
}

impl Default for ExplosionParams {
    fn default() -> Self {
        ExplosionParams {
            max_distance: 2.0,
            strength: 2.0,
            offset: Vec3::broadcast(0.05),
        }
    }
}

/// Impulse for a single object at `pos`.
///
/// An object exactly at the origin has no direction to be pushed in and gets the zero vector.
pub fn impulse_at(origin: Vec3<f32>, pos: Vec3<f32>, params: &ExplosionParams) -> Vec3<f32> {
    let delta = pos - origin;
    let len = delta.magnitude();
    if len == 0.0 || !len.is_finite() {
        return Vec3::zero();
    }
    let falloff = (params.max_distance - len).max(0.0);
    let scale = falloff * falloff * params.strength;
    delta / len * scale
}

/// Impulses for every object, in the same order as given.
///
/// Pure: no state is read besides the arguments. Objects at or beyond `max_distance` get the zero
/// vector rather than being left out.
pub fn compute_impulses<K, I>(
    origin: Vec3<f32>,
    objects: I,
    params: &ExplosionParams,
) -> Vec<(K, Vec3<f32>)>
where
    I: IntoIterator<Item=(K, Vec3<f32>)>,
{
    objects.into_iter()
        .map(|(key, pos)| (key, impulse_at(origin, pos, params)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(pos: Vec3<f32>) -> Vec3<f32> {
        impulse_at(Vec3::zero(), pos, &ExplosionParams::default())
    }

    #[test]
    fn unit_distance() {
        assert_eq!(solve(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn beyond_max_distance_is_zero() {
        assert_eq!(solve(Vec3::new(3.0, 0.0, 0.0)), Vec3::zero());
        assert_eq!(solve(Vec3::new(2.0, 0.0, 0.0)), Vec3::zero());
        assert_eq!(solve(Vec3::new(0.0, -1.5, 1.5)), Vec3::zero());
    }

    #[test]
    fn coincident_is_exact_zero() {
        let impulse = solve(Vec3::zero());
        assert_eq!(impulse, Vec3::zero());
        assert!(impulse.x.is_finite() && impulse.y.is_finite() && impulse.z.is_finite());

        let origin = Vec3::new(0.3, -0.2, 7.0);
        assert_eq!(impulse_at(origin, origin, &ExplosionParams::default()), Vec3::zero());
    }

    #[test]
    fn points_away_from_origin() {
        let origin = Vec3::new(1.0, 1.0, 1.0);
        let pos = Vec3::new(1.0, 1.5, 1.0);
        let impulse = impulse_at(origin, pos, &ExplosionParams::default());
        assert_eq!(impulse.x, 0.0);
        assert_eq!(impulse.z, 0.0);
        // falloff 1.5, scale 1.5 * 1.5 * 2
        assert!((impulse.y - 4.5).abs() < 1e-5);
    }

    #[test]
    fn magnitude_non_increasing_with_distance() {
        let dir = Vec3::new(1.0, 2.0, -0.5).normalized();
        let mut prev = f32::INFINITY;
        for i in 1..=250 {
            let dist = i as f32 * 0.01;
            let mag = solve(dir * dist).magnitude();
            assert!(mag <= prev, "magnitude grew at distance {}", dist);
            prev = mag;
        }
        assert_eq!(prev, 0.0);
    }

    #[test]
    fn deterministic_and_order_preserving() {
        let objects = vec![
            ('a', Vec3::new(0.5, 0.0, 0.0)),
            ('b', Vec3::new(0.0, 0.0, 5.0)),
            ('c', Vec3::new(0.0, 0.0, 0.0)),
            ('d', Vec3::new(-1.0, 0.0, 0.0)),
        ];
        let params = ExplosionParams::default();
        let first = compute_impulses(Vec3::zero(), objects.clone(), &params);
        let second = compute_impulses(Vec3::zero(), objects, &params);
        assert_eq!(first, second);
        let keys = first.iter().map(|&(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!['a', 'b', 'c', 'd']);
        assert_eq!(first[1].1, Vec3::zero());
        assert_eq!(first[2].1, Vec3::zero());
        assert_eq!(first[3].1, Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn empty_input_empty_output() {
        let out = compute_impulses::<u32, _>(Vec3::zero(), Vec::new(), &ExplosionParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn params_follow_settings() {
        let params = ExplosionParams::from_settings(&Settings::default());
        assert_eq!(params, ExplosionParams::default());
    }
}
