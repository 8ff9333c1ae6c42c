/// Movement and interaction rules: pure functions, no side effects.
/// These encode "what is legal" without performing the action.
///
/// ## Action Key Truth Table
///
/// ┌───────────┬──────────────────────────────┬────────────┐
/// │ Carrying? │ Condition                     │ Outcome    │
/// ├───────────┼──────────────────────────────┼────────────┤
/// │ no        │ dist(player, chest) < pickup  │ PickUp     │
/// │ no        │ otherwise                     │ OutOfRange │
/// │ yes       │ dist(player, ship) < deliver  │ Deliver    │
/// │ yes       │ otherwise                     │ OutOfRange │
/// └───────────┴──────────────────────────────┴────────────┘
///
/// OutOfRange is a silent no-op, never an error.
///
/// ## Movement
///
/// Opposing held keys cancel. A non-zero direction is normalized, so
/// diagonal running is exactly as fast as axial running. The resulting
/// position is clamped per-axis to the island's symmetric bound.

use glam::Vec2;
use rand::Rng;

use super::entity::FrameInput;

/// What a fresh action-key press resolves to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionOutcome {
    PickUp,
    Deliver,
    OutOfRange,
}

/// Resolve the action key against the truth table above.
pub fn resolve_action(
    carrying: bool,
    player: Vec2,
    chest: Vec2,
    ship: Vec2,
    pickup_range: f32,
    deliver_range: f32,
) -> ActionOutcome {
    if !carrying {
        if player.distance(chest) < pickup_range {
            ActionOutcome::PickUp
        } else {
            ActionOutcome::OutOfRange
        }
    } else if player.distance(ship) < deliver_range {
        ActionOutcome::Deliver
    } else {
        ActionOutcome::OutOfRange
    }
}

/// Unit direction from the held movement keys, None when idle
/// (or when opposing keys cancel out).
pub fn move_direction(input: &FrameInput) -> Option<Vec2> {
    let mut dir = Vec2::ZERO;
    if input.up { dir.y -= 1.0; }
    if input.down { dir.y += 1.0; }
    if input.left { dir.x -= 1.0; }
    if input.right { dir.x += 1.0; }

    if dir == Vec2::ZERO {
        None
    } else {
        Some(dir.normalize())
    }
}

/// Clamp both axes to the island's symmetric bound.
pub fn clamp_to_island(pos: Vec2, half_extent: f32) -> Vec2 {
    pos.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent))
}

/// Uniform random respawn point within ±extent on both axes.
/// May land inside the delivery zone or on the extent edge; both
/// are accepted.
pub fn respawn_position<R: Rng>(rng: &mut R, extent: f32) -> Vec2 {
    Vec2::new(
        rng.gen_range(-extent..=extent),
        rng.gen_range(-extent..=extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PICKUP: f32 = 5.0;
    const DELIVER: f32 = 8.0;

    fn input(up: bool, down: bool, left: bool, right: bool) -> FrameInput {
        FrameInput { up, down, left, right, action: false }
    }

    // ── Action resolution ──

    #[test]
    fn pickup_within_range() {
        let outcome = resolve_action(
            false,
            Vec2::new(8.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::PickUp);
    }

    #[test]
    fn pickup_blocked_out_of_range() {
        let outcome = resolve_action(
            false,
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::OutOfRange);
    }

    #[test]
    fn pickup_range_is_exclusive() {
        // Exactly at the threshold is still out of range (strict <)
        let outcome = resolve_action(
            false,
            Vec2::new(5.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::OutOfRange);
    }

    #[test]
    fn deliver_requires_carrying() {
        // Standing right on the ship without the chest: pickup branch,
        // and the chest is far away, so nothing happens.
        let outcome = resolve_action(
            false,
            Vec2::new(-22.0, -22.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::OutOfRange);
    }

    #[test]
    fn deliver_within_range_of_ship() {
        let outcome = resolve_action(
            true,
            Vec2::new(-18.0, -18.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::Deliver);
    }

    #[test]
    fn deliver_blocked_far_from_ship() {
        let outcome = resolve_action(
            true,
            Vec2::new(15.0, 15.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::OutOfRange);
    }

    #[test]
    fn carrying_ignores_chest_distance() {
        // Carried chest rides on the player, so its distance is ~0;
        // the deliver branch must still measure against the ship.
        let outcome = resolve_action(
            true,
            Vec2::new(15.0, 15.0),
            Vec2::new(15.0, 14.0),
            Vec2::new(-22.0, -22.0),
            PICKUP, DELIVER,
        );
        assert_eq!(outcome, ActionOutcome::OutOfRange);
    }

    // ── Movement direction ──

    #[test]
    fn idle_gives_no_direction() {
        assert_eq!(move_direction(&input(false, false, false, false)), None);
    }

    #[test]
    fn axial_direction_is_unit() {
        let dir = move_direction(&input(false, false, false, true)).unwrap();
        assert_eq!(dir, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn diagonal_is_normalized() {
        let dir = move_direction(&input(true, false, false, true)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        assert_eq!(move_direction(&input(true, true, false, false)), None);
        assert_eq!(move_direction(&input(false, false, true, true)), None);
        // Cancel on one axis, move on the other
        let dir = move_direction(&input(true, true, true, false)).unwrap();
        assert_eq!(dir, Vec2::new(-1.0, 0.0));
    }

    // ── Island clamp ──

    #[test]
    fn clamp_holds_the_rim() {
        let p = clamp_to_island(Vec2::new(25.0, -40.0), 18.0);
        assert_eq!(p, Vec2::new(18.0, -18.0));
    }

    #[test]
    fn clamp_leaves_interior_alone() {
        let p = clamp_to_island(Vec2::new(3.5, -17.9), 18.0);
        assert_eq!(p, Vec2::new(3.5, -17.9));
    }

    // ── Respawn ──

    #[test]
    fn respawn_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = respawn_position(&mut rng, 15.0);
            assert!(p.x >= -15.0 && p.x <= 15.0);
            assert!(p.y >= -15.0 && p.y <= 15.0);
        }
    }
}
