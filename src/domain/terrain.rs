/// Island surface classification for the presentation layer.
/// Properties are queried via methods, not stored as flags, so
/// terrain semantics are centralized here.

use glam::Vec2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terrain {
    Water,
    Sand,
    DeliveryZone,
}

impl Terrain {
    /// Can the player stand here? (The movement clamp already keeps
    /// the player on the island; this mirrors it for queries.)
    #[allow(dead_code)]
    pub fn is_ground(self) -> bool {
        !matches!(self, Terrain::Water)
    }
}

/// Classify an island coordinate. The delivery disc is painted on
/// the sand; everything beyond the island bound is water.
pub fn classify(pos: Vec2, half_extent: f32, zone: Vec2, zone_radius: f32) -> Terrain {
    if pos.x.abs() > half_extent || pos.y.abs() > half_extent {
        return Terrain::Water;
    }
    if pos.distance(zone) <= zone_radius {
        return Terrain::DeliveryZone;
    }
    Terrain::Sand
}
