//! Which collision layers may touch each other.

/// Layer id of a body. Valid ids are `0..LAYER_COUNT`.
pub type CollisionLayer = u8;

pub const LAYER_COUNT: usize = 32;

/// Symmetric 32x32 collision relation stored as one bitmask per layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionLayerMatrix {
    rows: [u32; LAYER_COUNT],
}

impl Default for CollisionLayerMatrix {
    /// Every layer collides with every layer.
    fn default() -> Self {
        CollisionLayerMatrix { rows: [u32::MAX; LAYER_COUNT] }
    }
}

impl CollisionLayerMatrix {
    /// No layer collides with anything.
    pub fn none() -> Self {
        CollisionLayerMatrix { rows: [0; LAYER_COUNT] }
    }

    /// Set whether `a` and `b` collide, in both directions.
    pub fn set(&mut self, a: CollisionLayer, b: CollisionLayer, collide: bool) {
        let (ai, bi) = (a as usize, b as usize);
        if ai >= LAYER_COUNT || bi >= LAYER_COUNT {
            log::warn!("collision layer pair ({a}, {b}) out of range, ignored");
            return;
        }
        if collide {
            self.rows[ai] |= 1 << bi;
            self.rows[bi] |= 1 << ai;
        } else {
            self.rows[ai] &= !(1 << bi);
            self.rows[bi] &= !(1 << ai);
        }
    }

    pub fn with(mut self, a: CollisionLayer, b: CollisionLayer, collide: bool) -> Self {
        self.set(a, b, collide);
        self
    }

    /// Out-of-range layers never collide.
    pub fn can_collide(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        let (ai, bi) = (a as usize, b as usize);
        if ai >= LAYER_COUNT || bi >= LAYER_COUNT {
            return false;
        }
        self.rows[ai] & (1 << bi) != 0
    }

    /// Bitmask of the layers `layer` collides with.
    pub fn mask(&self, layer: CollisionLayer) -> u32 {
        self.rows.get(layer as usize).copied().unwrap_or(0)
    }
}
