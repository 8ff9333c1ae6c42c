/// WorldState: the complete snapshot of a running game.
///
/// One instance, owned by the game loop and passed by explicit `&mut`
/// to the frame step, the clock, and the renderer; no globals.
///
/// ## Coordinates
///
/// Island coordinates are `glam::Vec2` on the ground plane: +x east,
/// +y south (matches terminal rows). The player is clamped to
/// ±`island_half_extent`; the ship and the water lie beyond the rim.
///
/// ## Camera / Viewport
///
/// World cells and screen cells are separate: the camera centers the
/// viewport on the player each frame and clamps to the rendered world,
/// centering maps smaller than the terminal.

use glam::Vec2;

use crate::config::{GameConfig, RulesConfig, SpeedConfig};
use crate::domain::entity::{Player, Ship, Treasure};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    Victory,
    Defeat,
}

/// How a run ended. Feeds the one-shot Playing → terminal transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Victory,
    Defeat,
}

// ── Island layout ──
//
// Fixed scenery, in island coordinates.

const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, 0.0);
const TREASURE_SPAWN: Vec2 = Vec2::new(10.0, 10.0);
const SHIP_POS: Vec2 = Vec2::new(-22.0, -22.0);
const ZONE_POS: Vec2 = Vec2::new(-18.0, -18.0);
const ZONE_RADIUS: f32 = 3.0;
const PALMS: [Vec2; 4] = [
    Vec2::new(15.0, 5.0),
    Vec2::new(-8.0, 15.0),
    Vec2::new(12.0, -10.0),
    Vec2::new(-15.0, 8.0),
];

/// Camera: a viewport into the rendered world grid.
///
/// `(x, y)` is the world cell at the top-left of the viewport, and may
/// be negative when the world is smaller than the terminal (centered).
#[derive(Clone, Debug)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0, y: 0, view_w: 0, view_h: 0 }
    }

    /// Center the viewport on a target cell, clamped to world bounds.
    /// Axes where the world fits entirely are centered instead.
    pub fn center_on(&mut self, tx: i32, ty: i32, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }

        self.x = Self::axis(tx, self.view_w, world_w);
        self.y = Self::axis(ty, self.view_h, world_h);
    }

    fn axis(target: i32, view: usize, world: usize) -> i32 {
        let view = view as i32;
        let world = world as i32;
        if world <= view {
            -((view - world) / 2)
        } else {
            (target - view / 2).clamp(0, world - view)
        }
    }

    /// World cell → viewport cell, None outside the visible area.
    #[allow(dead_code)]
    pub fn world_to_view(&self, wx: i32, wy: i32) -> Option<(usize, usize)> {
        let vx = wx - self.x;
        let vy = wy - self.y;
        if vx >= 0 && vx < self.view_w as i32 && vy >= 0 && vy < self.view_h as i32 {
            Some((vx as usize, vy as usize))
        } else {
            None
        }
    }
}

pub struct WorldState {
    // ── Actors ──
    pub player: Player,
    pub treasure: Treasure,
    pub ship: Ship,
    pub palms: Vec<Vec2>,

    // ── Run state ──
    pub delivered: u32,
    pub target: u32,
    pub time_limit: u32,
    pub time_remaining: u32,
    pub phase: Phase,
    pub paused: bool,

    // ── Config ──
    pub speed: SpeedConfig,
    pub rules: RulesConfig,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,
    pub camera: Camera,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        WorldState {
            player: Player::new(PLAYER_SPAWN),
            treasure: Treasure::new(TREASURE_SPAWN),
            ship: Ship {
                pos: SHIP_POS,
                zone: ZONE_POS,
                zone_radius: ZONE_RADIUS,
            },
            palms: PALMS.to_vec(),
            delivered: 0,
            target: config.rules.target_deliveries,
            time_limit: config.rules.time_limit_secs,
            time_remaining: config.rules.time_limit_secs,
            phase: Phase::Title,
            paused: false,
            speed: config.speed.clone(),
            rules: config.rules.clone(),
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
            camera: Camera::new(),
        }
    }

    /// Reset run state and enter the Playing phase.
    pub fn start_run(&mut self) {
        self.player = Player::new(PLAYER_SPAWN);
        self.treasure = Treasure::new(TREASURE_SPAWN);
        self.delivered = 0;
        self.time_remaining = self.time_limit;
        self.paused = false;
        self.message.clear();
        self.message_timer = 0;
        self.anim_tick = 0;
        self.phase = Phase::Playing;
    }

    /// Is gameplay live?
    pub fn active(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn carrying(&self) -> bool {
        self.treasure.is_carried()
    }

    /// Seconds spent in the current (or just-finished) run.
    pub fn elapsed_secs(&self) -> u32 {
        self.time_limit.saturating_sub(self.time_remaining)
    }

    /// One-shot Playing → Victory/Defeat transition. Calls on an
    /// already-finished (or not started) world are no-ops, so late
    /// timer or interaction callbacks cannot double-finish.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = match outcome {
            Outcome::Victory => Phase::Victory,
            Outcome::Defeat => Phase::Defeat,
        };
        self.paused = false;
        self.message.clear();
        self.message_timer = 0;
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn finish_is_one_shot() {
        let mut w = WorldState::new(&test_config());
        w.start_run();

        w.finish(Outcome::Victory);
        assert_eq!(w.phase, Phase::Victory);

        // A late loss callback must not overwrite the outcome
        w.finish(Outcome::Defeat);
        assert_eq!(w.phase, Phase::Victory);
    }

    #[test]
    fn finish_before_start_is_noop() {
        let mut w = WorldState::new(&test_config());
        w.finish(Outcome::Defeat);
        assert_eq!(w.phase, Phase::Title);
    }

    #[test]
    fn start_run_resets_a_finished_world() {
        let mut w = WorldState::new(&test_config());
        w.start_run();
        w.delivered = 4;
        w.time_remaining = 0;
        w.finish(Outcome::Defeat);

        w.start_run();
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.delivered, 0);
        assert_eq!(w.time_remaining, w.time_limit);
        assert!(!w.carrying());
    }

    #[test]
    fn camera_centers_small_world() {
        let mut cam = Camera::new();
        cam.view_w = 80;
        cam.view_h = 24;
        cam.center_on(0, 0, 40, 40);
        // Width fits: centered (negative origin). Height doesn't: clamped.
        assert_eq!(cam.x, -20);
        assert_eq!(cam.y, 0);
    }

    #[test]
    fn camera_follows_and_clamps() {
        let mut cam = Camera::new();
        cam.view_w = 20;
        cam.view_h = 10;
        cam.center_on(35, 38, 40, 40);
        assert_eq!(cam.x, 20); // clamped to right edge
        assert_eq!(cam.y, 30); // clamped to bottom edge
        assert_eq!(cam.world_to_view(35, 38), Some((15, 8)));
        assert_eq!(cam.world_to_view(10, 10), None);
    }
}
