/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::clock::GameClock;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::input::InputTracker;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut world = WorldState::new(&config);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for sailing with Corsair!");
    println!("Treasures delivered: {}", world.delivered);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut keys = InputTracker::new();
    let mut clock = GameClock::new();
    let mut last_frame = Instant::now();
    let tick_rate = Duration::from_millis(world.speed.tick_rate_ms);

    loop {
        keys.drain_events();

        if keys.quit_requested() {
            break;
        }
        if handle_meta(world, &keys, &mut clock) {
            break;
        }

        // The countdown runs on its own wall-clock cadence, not the
        // frame cadence; it cancels itself the moment the run ends.
        let clock_events = clock.poll(world);
        process_events(world, &clock_events);

        if last_frame.elapsed() >= tick_rate {
            if world.active() && !world.paused {
                let events = step::frame(world, sample_input(&keys));
                process_events(world, &events);
            } else {
                // Menus and the pause overlay still animate
                world.anim_tick = world.anim_tick.wrapping_add(1);
                if world.message_timer > 0 {
                    world.message_timer -= 1;
                    if world.message_timer == 0 { world.message.clear(); }
                }
            }
            last_frame = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_ACTION: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Sample this frame's gameplay intent from the key tracker.
/// Movement reads held keys (plus fresh taps, so a quick tap still
/// moves one step); the action key is edge-triggered only.
fn sample_input(keys: &InputTracker) -> FrameInput {
    FrameInput {
        up: keys.any_held(KEYS_UP) || keys.any_pressed(KEYS_UP),
        down: keys.any_held(KEYS_DOWN) || keys.any_pressed(KEYS_DOWN),
        left: keys.any_held(KEYS_LEFT) || keys.any_pressed(KEYS_LEFT),
        right: keys.any_held(KEYS_RIGHT) || keys.any_pressed(KEYS_RIGHT),
        action: keys.any_pressed(KEYS_ACTION),
    }
}

/// Menu and phase-transition keys. Returns true to quit the program.
fn handle_meta(world: &mut WorldState, keys: &InputTracker, clock: &mut GameClock) -> bool {
    let confirm = keys.any_pressed(KEYS_CONFIRM);
    let esc = keys.any_pressed(&[KeyCode::Esc]);

    match world.phase {
        Phase::Title => {
            if confirm {
                world.start_run();
                clock.arm();
            } else if esc || keys.any_pressed(KEYS_QUIT) {
                return true;
            }
        }

        Phase::Playing => {
            if keys.any_pressed(KEYS_PAUSE) {
                world.paused = !world.paused;
            } else if esc {
                // Abandon the run; the clock cancels itself on the
                // next poll once the phase leaves Playing.
                world.paused = false;
                world.phase = Phase::Title;
            }
        }

        Phase::Victory | Phase::Defeat => {
            if confirm {
                world.start_run();
                clock.arm();
            } else if esc {
                world.phase = Phase::Title;
            }
        }
    }

    false
}

/// Map simulation events to transient message-bar text.
fn process_events(world: &mut WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::TreasurePicked => {
                world.set_message("Treasure hoisted! Make for the ship!", 40);
            }
            GameEvent::TreasureDelivered { total } => {
                let msg = format!("Delivered! {} of {} aboard", total, world.target);
                world.set_message(&msg, 40);
            }
            GameEvent::TimeWarning { remaining } => {
                let msg = format!("{remaining} seconds left, run!");
                world.set_message(&msg, 60);
            }
            _ => {}
        }
    }
}
