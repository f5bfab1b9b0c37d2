//! See `DynamicBodyRegistry`.

use slab::Slab;
use vek::*;


/// Handle to a dynamic object.
///
/// Slab index plus a generation counter. The counter is unique for the life of the registry, so a
/// handle to an object that has since been removed never resolves, even if its slot is reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BodyKey {
    idx: usize,
    ctr: u64,
}

impl BodyKey {
    /// Sequence number of the object, in order of creation.
    pub fn seq(self) -> u64 {
        self.ctr
    }
}

/// A user-placed simulated body.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DynamicObject {
    pub key: BodyKey,
    /// Last sampled world position. The physics engine owns the real one.
    pub position: Vec3<f32>,
    /// Fixed at creation. Only the engine's integrator uses this.
    pub mass: f32,
}

/// Every dynamic object currently believed to be in the scene, iterated in order of creation.
#[derive(Debug, Clone, Default)]
pub struct DynamicBodyRegistry {
    slab: Slab<DynamicObject>,
    ctr: u64,
}

impl DynamicBodyRegistry {
    /// Construct empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object and return its handle.
    pub fn add(&mut self, position: Vec3<f32>, mass: f32) -> BodyKey {
        debug_assert!(mass > 0.0, "DynamicBodyRegistry.add non-positive mass");
        let entry = self.slab.vacant_entry();
        let key = BodyKey {
            idx: entry.key(),
            ctr: self.ctr,
        };
        entry.insert(DynamicObject { key, position, mass });
        self.ctr += 1;
        key
    }

    /// Forget an object. Returns `None` if the handle is stale.
    pub fn remove(&mut self, key: BodyKey) -> Option<DynamicObject> {
        self.get(key)?;
        Some(self.slab.remove(key.idx))
    }

    pub fn get(&self, key: BodyKey) -> Option<&DynamicObject> {
        self.slab.get(key.idx).filter(|obj| obj.key.ctr == key.ctr)
    }

    /// Record a freshly sampled position. Returns false if the handle is stale.
    pub fn set_position(&mut self, key: BodyKey, position: Vec3<f32>) -> bool {
        match self.slab.get_mut(key.idx) {
            Some(obj) if obj.key.ctr == key.ctr => {
                obj.position = position;
                true
            }
            _ => false,
        }
    }

    /// Point-in-time positions of all objects, in order of creation.
    ///
    /// Positions are only as fresh as the last `set_position`, so the caller should re-sample
    /// from the engine first.
    pub fn snapshot(&self) -> Vec<(BodyKey, Vec3<f32>)> {
        self.ordered().map(|obj| (obj.key, obj.position)).collect()
    }

    /// All handles, in order of creation.
    pub fn all(&self) -> Vec<BodyKey> {
        self.ordered().map(|obj| obj.key).collect()
    }

    pub fn len(&self) -> usize {
        self.slab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    // slab order diverges from creation order once a freed slot is reused, so sort by counter
    fn ordered<'a>(&'a self) -> impl Iterator<Item=&'a DynamicObject> + 'a {
        let mut objs = self.slab.iter().map(|(_, obj)| obj).collect::<Vec<_>>();
        objs.sort_by_key(|obj| obj.key.ctr);
        objs.into_iter()
    }
}
