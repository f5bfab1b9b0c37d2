//! See `PlaneRegistry`.

use crate::plane::{
    PlaneId,
    PlaneRecord,
};
use std::collections::{
    HashMap,
    hash_map,
};
use vek::*;


/// Mirror of the planes the engine is currently tracking, keyed by engine-assigned identifier.
///
/// Only holds state. Telling the engine how to draw a plane, or to stop hit testing a hidden one,
/// is the caller's job, driven by the records this returns.
#[derive(Debug, Clone, Default)]
pub struct PlaneRegistry {
    planes: HashMap<PlaneId, PlaneRecord>,
}

impl PlaneRegistry {
    /// Construct empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly detected plane, visible by default.
    ///
    /// A second detection of an id that is already registered breaks the engine's contract. It is
    /// logged and the existing record is overwritten.
    pub fn on_detected(
        &mut self,
        id: PlaneId,
        center: Vec3<f32>,
        extent: Extent2<f32>,
    ) -> &PlaneRecord {
        let record = PlaneRecord::new(id.clone(), center, extent);
        match self.planes.entry(id) {
            hash_map::Entry::Occupied(mut entry) => {
                warn!(id=%entry.key(), "plane detected twice, overwriting");
                entry.insert(record);
                entry.into_mut()
            }
            hash_map::Entry::Vacant(entry) => entry.insert(record),
        }
    }

    /// Replace the center and extent of a registered plane, preserving its visibility.
    ///
    /// Returns `None` and warns if the id is unknown.
    pub fn on_updated(
        &mut self,
        id: &PlaneId,
        center: Vec3<f32>,
        extent: Extent2<f32>,
    ) -> Option<&PlaneRecord> {
        match self.planes.get_mut(id) {
            Some(record) => {
                record.set_geometry(center, extent);
                Some(record)
            }
            None => {
                warn!(%id, "update for unknown plane ignored");
                None
            }
        }
    }

    /// Forget a plane, for example one the engine merged into a larger neighbor.
    ///
    /// Returns the removed record, or `None` if the id is unknown.
    pub fn on_removed(&mut self, id: &PlaneId) -> Option<PlaneRecord> {
        let removed = self.planes.remove(id);
        if removed.is_none() {
            debug!(%id, "removal of unknown plane ignored");
        }
        removed
    }

    /// Mark every currently registered plane hidden and return them all. Planes registered later
    /// start visible as usual.
    pub fn hide_all(&mut self) -> Vec<&PlaneRecord> {
        self.planes
            .values_mut()
            .map(|record| {
                record.visible = false;
                &*record
            })
            .collect()
    }

    pub fn get(&self, id: &PlaneId) -> Option<&PlaneRecord> {
        self.planes.get(id)
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item=&'a PlaneRecord> + 'a {
        self.planes.values()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}
