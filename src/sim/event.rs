/// Events emitted by the simulation. The outer loop consumes these
/// for transient messages; the renderer reads world state directly.

use glam::Vec2;

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    TreasurePicked,
    TreasureDelivered { total: u32 },
    TreasureRespawned { pos: Vec2 },
    SecondElapsed,
    TimeWarning { remaining: u32 },
    TimeExpired,
    AllTreasuresDelivered,
}
