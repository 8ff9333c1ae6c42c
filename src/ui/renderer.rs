/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into the `front` buffer, diffed cell-by-cell
/// against the previous frame (`back`), and only the changed cells are
/// emitted, batched with `queue!` and flushed once. Full repaints (and
/// their flicker) happen only on resize or phase change.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::Vec2;

use crate::domain::entity::Heading;
use crate::domain::terrain::{self, Terrain};
use crate::sim::clock::{TIME_CRITICAL, TIME_WARN};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    /// This char occupies 2 terminal columns (emoji sprites).
    wide: bool,
    /// Right half of a wide char; never printed itself.
    cont: bool,
}

impl Cell {
    /// Deep-sea background, used for every "empty" cell and for
    /// Clear so inter-row gap pixels match the cell color exactly.
    const BASE_BG: Color = Color::Rgb { r: 16, g: 26, b: 42 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel that differs from any real cell, so every position
    /// gets diff'd on the next flush.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Every cell carries an explicit background (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg), wide: false, cont: false }
    }

    fn new_wide(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg), wide: true, cont: false }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y); each char takes one column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }

    /// Place an emoji sprite (2 columns) at (x, y).
    fn put_sprite(&mut self, x: usize, y: usize, ch: char, bg: Color) {
        if x + 1 >= self.width { return; }
        self.set(x, y, Cell::new_wide(ch, Color::Reset, bg));
        let mut cont = Cell::WIDE_CONT;
        cont.bg = Cell::norm_bg(bg);
        self.set(x + 1, y, cont);
    }
}

// ── Renderer ──

/// Each island cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Water cells rendered beyond the island bound (the ship is out there).
const WATER_MARGIN: f32 = 7.0;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

// Palette
const NAVY: Color = Color::Rgb { r: 20, g: 28, b: 66 };
const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const AMBER: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const RED: Color = Color::Rgb { r: 255, g: 70, b: 70 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const SAND: Color = Color::Rgb { r: 110, g: 96, b: 60 };
const SAND_DOT: Color = Color::Rgb { r: 140, g: 124, b: 82 };
const WAVE: Color = Color::Rgb { r: 70, g: 130, b: 190 };
const ZONE_DIM: Color = Color::Rgb { r: 70, g: 58, b: 10 };
const ZONE_LIT: Color = Color::Rgb { r: 96, g: 78, b: 14 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        // Terminal resize → full repaint
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Viewport dimensions from terminal size, capped to the world
        let world_cells = grid_cells(world);
        let reserved_rows = MAP_ROW + 4; // HUD + gap + msg + help
        world.camera.view_w = (self.term_w / CELL_W).min(world_cells);
        world.camera.view_h = if self.term_h > reserved_rows {
            (self.term_h - reserved_rows).min(world_cells)
        } else {
            1
        };

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        // Camera tracks the player whenever the island is on screen
        if world.phase == Phase::Playing {
            let (px, py) = cell_of(world, world.player.pos);
            world.camera.center_on(px, py, world_cells, world_cells);
        }

        self.front.clear();

        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::Playing => self.compose_game(world),
            Phase::Victory => self.compose_victory(world),
            Phase::Defeat => self.compose_defeat(world),
        }

        if world.paused {
            self.compose_pause_overlay(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors at frame start. Not ResetColor: the
        // terminal's native default may differ from BASE_BG and leave
        // line artifacts between rows.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // A wide char must also repaint when its right half changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: gameplay ──

    fn compose_game(&mut self, w: &WorldState) {
        let buf_w = self.front.width;

        // ── HUD row: status | score | timer ──
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, NAVY));
        }
        let status = if w.carrying() {
            "Carry the treasure to the ship!"
        } else {
            "Find the treasure!"
        };
        self.front.put_str(1, HUD_ROW, status, Color::White, NAVY);

        let score = format!("Booty {:>2}/{}", w.delivered, w.target);
        self.front.put_str(36, HUD_ROW, &score, GOLD, NAVY);

        let timer = format!("Time {}:{:02}", w.time_remaining / 60, w.time_remaining % 60);
        let timer_fg = if w.time_remaining <= TIME_CRITICAL {
            RED
        } else if w.time_remaining <= TIME_WARN {
            AMBER
        } else {
            Color::White
        };
        self.front.put_str(50, HUD_ROW, &timer, timer_fg, NAVY);

        // ── Island viewport ──
        let cam = w.camera.clone();
        for vy in 0..cam.view_h {
            let wy = cam.y + vy as i32;
            let row = MAP_ROW + vy;
            if row >= self.front.height { break; }

            for vx in 0..cam.view_w {
                let wx = cam.x + vx as i32;
                let col = vx * CELL_W;
                if col + 1 >= buf_w { break; }

                self.compose_cell(w, wx, wy, col, row);
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + cam.view_h + 1;
        if msg_row < self.front.height && !w.message.is_empty() {
            let msg = format!(" ◈ {} ", w.message);
            for x in 0..buf_w {
                self.front.set(x, msg_row, Cell::new(' ', Color::Black, GOLD));
            }
            self.front.put_str(0, msg_row, &msg, Color::Black, GOLD);
        }

        // ── Help bar ──
        let help_row = MAP_ROW + cam.view_h + 3;
        if help_row < self.front.height {
            let help = " WASD/Arrows:Move   Space:Grab/Deliver   P:Pause   ESC:Title";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    /// Write the visual for world cell (wx, wy) at buffer (col, row).
    fn compose_cell(&mut self, w: &WorldState, wx: i32, wy: i32, col: usize, row: usize) {
        let cells = grid_cells(w) as i32;
        if wx < 0 || wy < 0 || wx >= cells || wy >= cells {
            self.front.set(col, row, Cell::BLANK);
            self.front.set(col + 1, row, Cell::BLANK);
            return;
        }

        let island = cell_to_island(w, wx, wy);
        let ground = terrain::classify(
            island,
            w.rules.island_half_extent,
            w.ship.zone,
            w.ship.zone_radius,
        );
        let bg = match ground {
            Terrain::Water => Cell::BASE_BG,
            Terrain::Sand => SAND,
            Terrain::DeliveryZone => {
                // Slow emissive pulse on the landing disc
                if (w.anim_tick / 10) % 2 == 0 { ZONE_LIT } else { ZONE_DIM }
            }
        };

        // Actors and scenery, nearest first
        let (px, py) = cell_of(w, w.player.pos);
        if (wx, wy) == (px, py) {
            self.front.set(col, row, Cell::new('☻', Color::White, bg));
            let tick = match w.player.heading {
                Heading::Left => '◂',
                Heading::Right => '▸',
            };
            self.front.set(col + 1, row, Cell::new(tick, SAND_DOT, bg));
            return;
        }

        let chest_pos = w.treasure.world_pos(&w.player);
        if (wx, wy) == cell_of(w, chest_pos) {
            // Grounded chests glint as they spin
            let glyph = if !w.carrying() && (w.treasure.spin / 6) % 2 == 1 {
                '✨'
            } else {
                '💰'
            };
            self.front.put_sprite(col, row, glyph, bg);
            return;
        }

        if (wx, wy) == cell_of(w, w.ship.pos) {
            self.front.put_sprite(col, row, '⛵', bg);
            return;
        }

        for palm in &w.palms {
            if (wx, wy) == cell_of(w, *palm) {
                self.front.put_sprite(col, row, '🌴', bg);
                return;
            }
        }

        // Bare terrain
        match ground {
            Terrain::Water => {
                // Drifting wave crests
                let phase = (wx + wy * 3 + (w.anim_tick / 8) as i32).rem_euclid(7);
                let ch = if phase == 0 { '≈' } else { ' ' };
                self.front.set(col, row, Cell::new(ch, WAVE, bg));
                self.front.set(col + 1, row, Cell::new(' ', WAVE, bg));
            }
            Terrain::Sand => {
                // Sparse speckle so the beach isn't a flat slab
                let speckle = (wx * 7 + wy * 13).rem_euclid(11) == 0;
                let ch = if speckle { '·' } else { ' ' };
                self.front.set(col, row, Cell::new(ch, SAND_DOT, bg));
                self.front.set(col + 1, row, Cell::new(' ', SAND_DOT, bg));
            }
            Terrain::DeliveryZone => {
                self.front.set(col, row, Cell::new(' ', GOLD, bg));
                self.front.set(col + 1, row, Cell::new(' ', GOLD, bg));
            }
        }
    }

    // ── Compose: screens ──

    fn compose_title(&mut self, w: &WorldState) {
        let title = [
            r"   ___  ___   ___  ___   _   ___  ___ ",
            r"  / __|/ _ \ | _ \/ __| /_\ |_ _|| _ \",
            r" | (__| (_) ||   /\__ \/ _ \ | | |   /",
            r"  \___|\___/ |_|_\|___/_/ \_\|___||_|_\",
        ];

        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, GOLD, Color::Reset);
        }

        let subtitle = "◈◈  Isla del Tesoro  ◈◈";
        let sx = 2 + (title[3].len().saturating_sub(subtitle.chars().count())) / 2;
        self.front.put_str(sx, 7, subtitle, GREEN, Color::Reset);

        let menu_base = 10;
        self.front.put_str(8, menu_base, "ENTER   Set Sail", GREEN, Color::Reset);
        self.front.put_str(8, menu_base + 1, "  Q     Quit", Color::White, Color::Reset);

        let goal = format!(
            "      Deliver {} treasures to the ship in {} seconds.",
            w.target, w.time_limit,
        );
        self.front.put_str(2, menu_base + 3, &goal, Color::DarkGrey, Color::Reset);

        let help = [
            "Controls",
            "  ←→↑↓ / WASD   Move",
            "  SPACE          Grab / Deliver",
            "  P              Pause        ESC  Title",
        ];
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { GOLD } else { Color::White };
            self.front.put_str(8, menu_base + 5 + i, line, color, Color::Reset);
        }
    }

    fn compose_victory(&mut self, w: &WorldState) {
        let box_art = [
            "╔═══════════════════════════════╗",
            "║      ★  V I C T O R Y  ★      ║",
            "╚═══════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, GOLD, Color::Reset);
        }
        self.front.put_str(8, 8, "A true pirate! The hold is full.", Color::White, Color::Reset);
        let score = format!(
            "◈ {}/{} treasures in {} seconds",
            w.delivered, w.target, w.elapsed_secs(),
        );
        self.front.put_str(8, 10, &score, GREEN, Color::Reset);
        self.front.put_str(8, 12, "▸ ENTER: Sail again", GREEN, Color::Reset);
        self.front.put_str(8, 13, "▸ ESC:   Back to Title", Color::DarkGrey, Color::Reset);
    }

    fn compose_defeat(&mut self, w: &WorldState) {
        let box_art = [
            "╔═══════════════════════════════╗",
            "║     ✕  OUT  OF  TIME  ✕       ║",
            "╚═══════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, RED, Color::Reset);
        }
        self.front.put_str(8, 8, "The tide went out on you. Try again!", Color::White, Color::Reset);
        let score = format!("◈ Treasures delivered: {}/{}", w.delivered, w.target);
        self.front.put_str(8, 10, &score, Color::White, Color::Reset);
        self.front.put_str(8, 12, "▸ ENTER: Sail again", GREEN, Color::Reset);
        self.front.put_str(8, 13, "▸ ESC:   Back to Title", Color::DarkGrey, Color::Reset);
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let blink = (w.anim_tick / 8) % 2 == 0;

        let view_cols = w.camera.view_w * CELL_W;
        let box_w = 22_usize.min(view_cols);
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + w.camera.view_h.saturating_sub(5) / 2;

        for y in box_y..box_y + 5 {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::Reset, dim));
            }
        }

        let label = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.front.put_str(box_x + 4, box_y + 1, label, GOLD, dim);
        self.front.put_str(box_x + 2, box_y + 3, "P Resume  ESC Title", Color::White, dim);
    }
}

// ── World grid mapping ──

/// Rendered world = island + water margin, in cells per side.
fn grid_cells(w: &WorldState) -> usize {
    (2.0 * (w.rules.island_half_extent + WATER_MARGIN) + 1.0) as usize
}

/// Island coordinate → world grid cell.
fn cell_of(w: &WorldState, pos: Vec2) -> (i32, i32) {
    let half = (w.rules.island_half_extent + WATER_MARGIN) as i32;
    (pos.x.round() as i32 + half, pos.y.round() as i32 + half)
}

/// Center of a world grid cell, in island coordinates.
fn cell_to_island(w: &WorldState, wx: i32, wy: i32) -> Vec2 {
    let half = (w.rules.island_half_extent + WATER_MARGIN) as i32;
    Vec2::new((wx - half) as f32, (wy - half) as f32)
}
