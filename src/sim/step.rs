/// The frame step: advances the world by one rendered frame.
///
/// Processing order:
///   1. Transient message countdown
///   2. Movement resolution (held keys → clamped position)
///   3. Treasure idle animation
///   4. Action resolution (edge-triggered pickup / delivery)
///
/// Everything is gated on `Phase::Playing` and the pause flag: a
/// finished or paused world is never mutated here.

use rand::thread_rng;

use crate::domain::entity::{FrameInput, Heading};
use crate::domain::rules::{self, ActionOutcome};
use super::event::GameEvent;
use super::world::{Outcome, Phase, WorldState};

pub fn frame(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.anim_tick = world.anim_tick.wrapping_add(1);

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 { world.message.clear(); }
    }

    resolve_movement(world, &input);
    world.treasure.tick_spin();

    if input.action {
        resolve_action(world, &mut events);
    }

    events
}

// ── Movement ──

fn resolve_movement(world: &mut WorldState, input: &FrameInput) {
    let dir = match rules::move_direction(input) {
        Some(d) => d,
        None => return,
    };

    let next = world.player.pos + dir * world.speed.player_speed;
    world.player.pos = rules::clamp_to_island(next, world.rules.island_half_extent);

    if dir.x < 0.0 { world.player.heading = Heading::Left; }
    if dir.x > 0.0 { world.player.heading = Heading::Right; }
}

// ── Action (pickup / delivery) ──

fn resolve_action(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let player = world.player.pos;
    let chest = world.treasure.world_pos(&world.player);

    let outcome = rules::resolve_action(
        world.carrying(),
        player,
        chest,
        world.ship.pos,
        world.rules.pickup_range,
        world.rules.deliver_range,
    );

    match outcome {
        ActionOutcome::PickUp => {
            world.treasure.attach_to_player();
            events.push(GameEvent::TreasurePicked);
        }
        ActionOutcome::Deliver => {
            let spawn = rules::respawn_position(&mut thread_rng(), world.rules.spawn_extent);
            world.treasure.detach_at(spawn);
            world.delivered += 1;
            events.push(GameEvent::TreasureDelivered { total: world.delivered });
            events.push(GameEvent::TreasureRespawned { pos: spawn });

            if world.delivered >= world.target {
                world.finish(Outcome::Victory);
                events.push(GameEvent::AllTreasuresDelivered);
            }
        }
        ActionOutcome::OutOfRange => {} // silent no-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use glam::Vec2;

    fn playing_world() -> WorldState {
        let mut w = WorldState::new(&test_config());
        w.start_run();
        w
    }

    fn press(up: bool, down: bool, left: bool, right: bool) -> FrameInput {
        FrameInput { up, down, left, right, action: false }
    }

    const ACTION: FrameInput = FrameInput {
        up: false, down: false, left: false, right: false, action: true,
    };

    // ── Interaction ──

    #[test]
    fn action_out_of_range_changes_nothing() {
        let mut w = playing_world();
        let before = w.player.pos;

        let events = frame(&mut w, ACTION);

        assert!(events.is_empty());
        assert!(!w.carrying());
        assert_eq!(w.delivered, 0);
        assert_eq!(w.player.pos, before);
    }

    #[test]
    fn pickup_attaches_chest_in_range() {
        let mut w = playing_world();
        w.player.pos = w.treasure.pos + Vec2::new(2.0, 0.0);

        let events = frame(&mut w, ACTION);

        assert!(w.carrying());
        assert!(matches!(events[0], GameEvent::TreasurePicked));
    }

    #[test]
    fn delivery_scores_and_respawns_chest() {
        let mut w = playing_world();
        w.player.pos = w.treasure.pos;
        frame(&mut w, ACTION); // pick up
        assert!(w.carrying());

        w.player.pos = w.ship.zone; // inside deliver range of the ship
        let events = frame(&mut w, ACTION);

        assert!(!w.carrying());
        assert_eq!(w.delivered, 1);
        assert!(matches!(events[0], GameEvent::TreasureDelivered { total: 1 }));
        // Chest respawned inside the spawn square
        let e = w.rules.spawn_extent;
        assert!(w.treasure.pos.x.abs() <= e && w.treasure.pos.y.abs() <= e);
    }

    #[test]
    fn carrying_blocks_second_pickup() {
        let mut w = playing_world();
        w.player.pos = w.treasure.pos;
        frame(&mut w, ACTION);

        // Far from the ship: the action key does nothing at all
        w.player.pos = Vec2::new(15.0, 15.0);
        let events = frame(&mut w, ACTION);
        assert!(events.is_empty());
        assert!(w.carrying());
        assert_eq!(w.delivered, 0);
    }

    #[test]
    fn full_run_reaches_victory_at_target() {
        let mut w = playing_world();

        for round in 1..=w.target {
            let chest = w.treasure.world_pos(&w.player);
            w.player.pos = chest;
            frame(&mut w, ACTION);
            assert!(w.carrying(), "round {round}: pickup failed");

            w.player.pos = w.ship.zone;
            let events = frame(&mut w, ACTION);
            assert_eq!(w.delivered, round);

            if round < w.target {
                assert_eq!(w.phase, Phase::Playing);
            } else {
                assert_eq!(w.phase, Phase::Victory);
                assert!(events.iter().any(|e| matches!(e, GameEvent::AllTreasuresDelivered)));
            }
        }

        // Win happened regardless of the clock still holding time
        assert!(w.time_remaining > 0);
    }

    // ── Movement ──

    #[test]
    fn held_keys_move_and_clamp_at_rim() {
        let mut w = playing_world();
        let bound = w.rules.island_half_extent;

        // Hold north-west far longer than the island is wide
        for _ in 0..10_000 {
            frame(&mut w, press(true, false, true, false));
        }
        assert_eq!(w.player.pos, Vec2::new(-bound, -bound));
        assert_eq!(w.player.heading, Heading::Left);
    }

    #[test]
    fn diagonal_speed_matches_axial_speed() {
        let mut w = playing_world();
        frame(&mut w, press(false, true, false, true));
        let diagonal = w.player.pos.length();

        let mut w2 = playing_world();
        frame(&mut w2, press(false, false, false, true));
        let axial = w2.player.pos.length();

        assert!((diagonal - axial).abs() < 1e-5);
    }

    // ── Inactive / paused freeze ──

    #[test]
    fn finished_world_is_frozen() {
        let mut w = playing_world();
        w.player.pos = w.treasure.pos;
        w.finish(Outcome::Defeat);

        let before_pos = w.player.pos;
        let before_delivered = w.delivered;
        let mut input = ACTION;
        input.right = true;
        let events = frame(&mut w, input);

        assert!(events.is_empty());
        assert_eq!(w.player.pos, before_pos);
        assert_eq!(w.delivered, before_delivered);
        assert!(!w.carrying());
    }

    #[test]
    fn paused_world_is_frozen() {
        let mut w = playing_world();
        w.paused = true;
        w.player.pos = w.treasure.pos;

        let events = frame(&mut w, ACTION);
        assert!(events.is_empty());
        assert!(!w.carrying());
    }
}
