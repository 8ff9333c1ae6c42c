/// Entities: Player, Treasure, and the Ship with its delivery zone.
/// The chest's held-state IS its attachment: parented to the player
/// means carried, so flag and scene parenting can never disagree.

use glam::Vec2;

/// Sprite facing, driven by the horizontal movement component.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Left,
    Right,
}

/// One frame of player intent, sampled from the key tracker.
/// Movement keys are level-triggered (held), the action key is
/// edge-triggered (fresh press only).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub action: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub heading: Heading,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Player { pos, heading: Heading::Right }
    }
}

/// Which coordinate frame the treasure's `pos` lives in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Parent {
    /// Free chest: `pos` is an island coordinate.
    World,
    /// Carried: `pos` is an offset from the player.
    Player,
}

/// Hoisted chest rides one cell north of the carrier.
pub const CARRY_OFFSET: Vec2 = Vec2::new(0.0, -1.0);

/// The treasure chest. While world-parented it idles with a spin
/// animation; picking it up re-parents it to the player and resets
/// the spin, delivery re-parents it back to the world.
#[derive(Clone, Debug)]
pub struct Treasure {
    pub pos: Vec2,
    pub parent: Parent,
    pub spin: u32,
}

impl Treasure {
    pub fn new(pos: Vec2) -> Self {
        Treasure { pos, parent: Parent::World, spin: 0 }
    }

    /// Is the chest currently carried by the player?
    pub fn is_carried(&self) -> bool {
        self.parent == Parent::Player
    }

    /// Re-parent to the player. `pos` becomes the carry offset.
    pub fn attach_to_player(&mut self) {
        self.parent = Parent::Player;
        self.pos = CARRY_OFFSET;
        self.spin = 0;
    }

    /// Re-parent back to the world at the given island coordinate.
    pub fn detach_at(&mut self, pos: Vec2) {
        self.parent = Parent::World;
        self.pos = pos;
        self.spin = 0;
    }

    /// Resolve the chest's island coordinate regardless of parent.
    pub fn world_pos(&self, player: &Player) -> Vec2 {
        match self.parent {
            Parent::World => self.pos,
            Parent::Player => player.pos + self.pos,
        }
    }

    /// Advance the idle spin. Carried chests don't spin.
    pub fn tick_spin(&mut self) {
        if self.parent == Parent::World {
            self.spin = self.spin.wrapping_add(1);
        }
    }
}

/// The ship is fixed scenery anchored off the island's corner.
/// Delivery distance is measured to `pos`; the `zone` disc beside it
/// is a rendered landmark, not the interaction threshold.
#[derive(Clone, Debug)]
pub struct Ship {
    pub pos: Vec2,
    pub zone: Vec2,
    pub zone_radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_detach_lifecycle() {
        let mut chest = Treasure::new(Vec2::new(10.0, 10.0));
        assert!(!chest.is_carried());

        chest.attach_to_player();
        assert!(chest.is_carried());
        assert_eq!(chest.pos, CARRY_OFFSET);

        chest.detach_at(Vec2::new(-3.0, 7.0));
        assert!(!chest.is_carried());
        assert_eq!(chest.pos, Vec2::new(-3.0, 7.0));
    }

    #[test]
    fn carried_chest_follows_player() {
        let mut player = Player::new(Vec2::ZERO);
        let mut chest = Treasure::new(Vec2::new(10.0, 10.0));
        chest.attach_to_player();

        player.pos = Vec2::new(4.0, -2.0);
        assert_eq!(chest.world_pos(&player), Vec2::new(4.0, -2.0) + CARRY_OFFSET);

        // Free chest ignores the player entirely
        chest.detach_at(Vec2::new(1.0, 1.0));
        player.pos = Vec2::new(-9.0, 3.0);
        assert_eq!(chest.world_pos(&player), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn spin_only_while_grounded() {
        let mut chest = Treasure::new(Vec2::ZERO);
        chest.tick_spin();
        chest.tick_spin();
        assert_eq!(chest.spin, 2);

        chest.attach_to_player();
        chest.tick_spin();
        assert_eq!(chest.spin, 0);
    }
}
