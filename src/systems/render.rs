//! Rendering systems.
//!
//! Everything drawn here is read-only over the world: the map layers culled to
//! [`VisibleRange`], the character at its pixel position lifted by the jump
//! offset, then screen-space overlays. Only the binary schedules it.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::character::{Character, Facing, Player};
use crate::components::mapposition::MapPosition;
use crate::game::{ActiveDialog, ActiveNotice, CollectedItems, Dialog};
use crate::resources::camera2d::{GameCamera, VisibleRange};
use crate::resources::debugmode::DebugMode;
use crate::resources::gamestate::{GameState, GameStates};
use crate::resources::input::{Control, VirtualPad, VirtualPadLayout};
use crate::resources::screensize::ScreenSize;
use crate::resources::tilemap::{Cell, TileKind, TileMap};

const BACKGROUND: Color = Color::new(24, 32, 24, 255);
const PANEL: Color = Color::new(250, 244, 228, 235);
const INK: Color = Color::new(40, 30, 30, 255);

/// Flat colour for a tile's visual key.
fn tile_color(key: &str) -> Color {
    match key {
        "grass" => Color::new(106, 170, 84, 255),
        "grass_flowers" => Color::new(118, 178, 92, 255),
        "dirt_path" => Color::new(176, 138, 92, 255),
        "paved_path" => Color::new(170, 170, 160, 255),
        "water" => Color::new(64, 128, 208, 255),
        "tree" => Color::new(34, 96, 48, 255),
        "bush" => Color::new(60, 130, 60, 255),
        "rock" => Color::new(120, 120, 128, 255),
        "fence" => Color::new(140, 100, 60, 255),
        "house" => Color::new(180, 80, 70, 255),
        _ => Color::MAGENTA,
    }
}

/// Draw one frame. Takes the raylib handle out of the world for the
/// duration of the drawing scope.
pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };
    {
        let camera = world
            .get_resource::<GameCamera>()
            .copied()
            .unwrap_or_default()
            .to_raylib();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(BACKGROUND);
        {
            let mut d2 = d.begin_mode2D(camera);
            render_pass(world, &mut d2);
        }
        render_ui(world, &mut d);
        render_debug_ui(world, &mut d);
    }
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);
}

/// Map-space drawing, culled to the visible range.
pub fn render_pass(world: &mut World, d2: &mut RaylibMode2D<RaylibDrawHandle>) {
    if world.resource::<GameState>().get() != &GameStates::Playing {
        return;
    }
    let players: Vec<(Character, MapPosition)> = world
        .query_filtered::<(&Character, &MapPosition), With<Player>>()
        .iter(world)
        .map(|(c, p)| (*c, *p))
        .collect();
    let Some(map) = world.get_resource::<TileMap>() else {
        return;
    };
    let range = world.get_resource::<VisibleRange>().copied().unwrap_or_default();
    let ts = map.tile_size() as i32;
    let (width, height) = (map.width(), map.height());

    for cell in range.cells_within(width, height) {
        let Some(kind) = map.ground_at(cell) else {
            continue;
        };
        let (x, y) = (cell.col * ts, cell.row * ts);
        d2.draw_rectangle(x, y, ts, ts, tile_color(kind.visual_key()));
        if kind == TileKind::GrassFlowers {
            d2.draw_circle(x + ts / 4, y + ts / 3, 2.5, Color::YELLOW);
            d2.draw_circle(x + 3 * ts / 4, y + ts / 2, 2.5, Color::PINK);
            d2.draw_circle(x + ts / 2, y + 3 * ts / 4, 2.5, Color::WHITE);
        }
    }

    // anchors up to footprint-1 cells before the range still cover it
    let (max_w, max_h) = TileKind::MAX_FOOTPRINT;
    let first_col = (range.start_col - (max_w as i32 - 1)).max(0);
    let first_row = (range.start_row - (max_h as i32 - 1)).max(0);
    for row in first_row..range.end_row.min(height as i32) {
        for col in first_col..range.end_col.min(width as i32) {
            if let Some(kind) = map.object_at(Cell::new(col, row)) {
                draw_object(d2, kind, col * ts, row * ts, ts);
            }
        }
    }

    let collected = world.get_resource::<CollectedItems>();
    for item in map.collectibles() {
        if !range.contains(item.cell) || collected.is_some_and(|c| c.0.contains(&item.index)) {
            continue;
        }
        let cx = item.cell.col * ts + ts / 2;
        let cy = item.cell.row * ts + ts / 2;
        d2.draw_circle(cx - 4, cy - 2, 5.0, Color::RED);
        d2.draw_circle(cx + 4, cy - 2, 5.0, Color::RED);
        d2.draw_triangle(
            Vector2 { x: (cx - 9) as f32, y: cy as f32 },
            Vector2 { x: cx as f32, y: (cy + 10) as f32 },
            Vector2 { x: (cx + 9) as f32, y: cy as f32 },
            Color::RED,
        );
    }

    for (character, position) in &players {
        draw_character(d2, character, position, ts);
    }

    for cell in range.cells_within(width, height) {
        if let Some(kind) = map.overhead_at(cell) {
            let color = tile_color(kind.visual_key()).fade(0.7);
            d2.draw_rectangle(cell.col * ts, cell.row * ts, ts, ts, color);
        }
    }

    for label in map.labels() {
        let (x, y) = (label.cell.col * ts, label.cell.row * ts);
        if label.rotation.abs() < 45.0 {
            d2.draw_text(&label.name, x, y, 12, Color::WHITE);
        } else {
            // vertical street names, one glyph per line
            for (i, ch) in label.name.chars().enumerate() {
                let mut buf = [0u8; 4];
                d2.draw_text(ch.encode_utf8(&mut buf), x, y + i as i32 * 12, 12, Color::WHITE);
            }
        }
    }
}

fn draw_object(d2: &mut RaylibMode2D<RaylibDrawHandle>, kind: TileKind, x: i32, y: i32, ts: i32) {
    let (w, h) = kind.footprint();
    let (pw, ph) = (w as i32 * ts, h as i32 * ts);
    let color = tile_color(kind.visual_key());
    match kind {
        TileKind::Tree => {
            d2.draw_rectangle(x + ts / 2 - 3, y + ts, 6, ts - 4, Color::BROWN);
            d2.draw_circle(x + ts / 2, y + ts / 2 + 4, ts as f32 * 0.55, color);
        }
        TileKind::House => {
            d2.draw_rectangle(x, y + ts / 2, pw, ph - ts / 2, Color::BEIGE);
            d2.draw_triangle(
                Vector2 { x: (x + pw / 2) as f32, y: y as f32 },
                Vector2 { x: x as f32, y: (y + ts) as f32 },
                Vector2 { x: (x + pw) as f32, y: (y + ts) as f32 },
                color,
            );
            d2.draw_rectangle(x + pw / 2 - ts / 4, y + ph - ts / 2 - 6, ts / 2, ts / 2 + 6, Color::DARKBROWN);
        }
        _ => {
            d2.draw_rectangle(x + 2, y + 2, pw - 4, ph - 4, color);
        }
    }
}

fn draw_character(
    d2: &mut RaylibMode2D<RaylibDrawHandle>,
    character: &Character,
    position: &MapPosition,
    ts: i32,
) {
    let bob = if character.walk_frame % 2 == 1 { 2 } else { 0 };
    let x = position.pos.x as i32;
    let y = (position.pos.y - character.jump_offset()) as i32 - bob;

    // shadow stays on the ground while jumping
    d2.draw_ellipse(
        x + ts / 2,
        position.pos.y as i32 + ts - 4,
        ts as f32 * 0.3,
        4.0,
        Color::BLACK.fade(0.3),
    );
    d2.draw_rectangle(x + 6, y + 4, ts - 12, ts - 6, Color::SKYBLUE);
    d2.draw_rectangle_lines(x + 6, y + 4, ts - 12, ts - 6, INK);

    let notch = facing_notch(character.facing, ts);
    d2.draw_rectangle(x + notch.0, y + notch.1, 4, 4, INK);
}

/// Offset of the small mark showing which way the character faces.
fn facing_notch(facing: Facing, ts: i32) -> (i32, i32) {
    let c = ts / 2 - 2;
    match facing {
        Facing::Up => (c, 6),
        Facing::Down => (c, ts - 8),
        Facing::Left => (8, ts / 2),
        Facing::Right => (ts - 12, ts / 2),
    }
}

fn draw_panel(d: &mut RaylibDrawHandle, x: i32, y: i32, w: i32, h: i32) {
    d.draw_rectangle(x, y, w, h, PANEL);
    d.draw_rectangle_lines(x, y, w, h, INK);
}

/// Screen-space overlays: counters, dialogs, notice, ending, virtual pad.
pub fn render_ui(world: &mut World, d: &mut RaylibDrawHandle) {
    let screen = *world.resource::<ScreenSize>();
    let total = world
        .get_resource::<TileMap>()
        .map_or(0, |m| m.collectibles().len());
    let collected = world.get_resource::<CollectedItems>().map_or(0, |c| c.count());

    if world.resource::<GameState>().get() == &GameStates::Ending {
        d.clear_background(Color::new(40, 20, 40, 255));
        let title = "Welcome home!";
        let tw = d.measure_text(title, 40);
        d.draw_text(title, (screen.w - tw) / 2, screen.h / 2 - 60, 40, Color::GOLD);
        let line = format!("You found {collected} of {total} items.");
        let lw = d.measure_text(&line, 20);
        d.draw_text(&line, (screen.w - lw) / 2, screen.h / 2, 20, Color::RAYWHITE);
        let hint = "Press Enter to quit";
        let hw = d.measure_text(hint, 16);
        d.draw_text(hint, (screen.w - hw) / 2, screen.h / 2 + 40, 16, Color::LIGHTGRAY);
        return;
    }

    draw_panel(d, 8, 8, 150, 28);
    d.draw_text(&format!("Items: {collected}/{total}"), 16, 14, 18, INK);

    if let Some(notice) = world.get_resource::<ActiveNotice>().and_then(|n| n.0.as_ref()) {
        let w = d.measure_text(&notice.text, 18) + 24;
        draw_panel(d, (screen.w - w) / 2, screen.h - 140, w, 32);
        d.draw_text(&notice.text, (screen.w - w) / 2 + 12, screen.h - 133, 18, INK);
    }

    if let Some(dialog) = world.get_resource::<ActiveDialog>().and_then(|a| a.0) {
        let (title, body) = match dialog {
            Dialog::Collected { index } => (
                format!("Item #{} found!", index + 1),
                "A little memory, tucked away in the grass.".to_string(),
            ),
            Dialog::Secret => (
                "Something glimmers in the water...".to_string(),
                "A secret place is close by.".to_string(),
            ),
        };
        let (w, h) = (screen.w * 2 / 3, 140);
        let (x, y) = ((screen.w - w) / 2, (screen.h - h) / 2);
        draw_panel(d, x, y, w, h);
        d.draw_text(&title, x + 20, y + 20, 24, INK);
        d.draw_text(&body, x + 20, y + 60, 18, INK);
        d.draw_text("Press Enter to continue", x + 20, y + h - 30, 14, Color::DARKGRAY);
    }

    if let (Some(layout), Some(pad)) = (
        world.get_resource::<VirtualPadLayout>(),
        world.get_resource::<VirtualPad>(),
    ) {
        for (control, rect) in layout.buttons() {
            let alpha = if pad.is_held(*control) { 0.6 } else { 0.25 };
            d.draw_rectangle(
                rect.x as i32,
                rect.y as i32,
                rect.w as i32,
                rect.h as i32,
                Color::WHITE.fade(alpha),
            );
            let glyph = match control {
                Control::Up => "^",
                Control::Down => "v",
                Control::Left => "<",
                Control::Right => ">",
                Control::Action => "A",
                Control::Jump => "J",
            };
            d.draw_text(
                glyph,
                (rect.x + rect.w / 2.0) as i32 - 5,
                (rect.y + rect.h / 2.0) as i32 - 10,
                20,
                INK,
            );
        }
    }
}

pub fn render_debug_ui(world: &mut World, d: &mut RaylibDrawHandle) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let screen = *world.resource::<ScreenSize>();
    let fps = d.get_fps();
    d.draw_text(
        &format!("DEBUG (F11) | FPS: {fps}"),
        10,
        44,
        10,
        Color::BLACK,
    );

    if let Some(camera) = world.get_resource::<GameCamera>() {
        let text = format!("Camera offset: ({:.1}, {:.1})", camera.offset.x, camera.offset.y);
        d.draw_text(&text, 10, 58, 10, Color::BLACK);
    }
    if let Some(range) = world.get_resource::<VisibleRange>() {
        let text = format!(
            "Visible: cols {}..{} rows {}..{}",
            range.start_col, range.end_col, range.start_row, range.end_row
        );
        d.draw_text(&text, 10, 72, 10, Color::BLACK);
    }

    let mut players = world.query_filtered::<&Character, With<Player>>();
    for character in players.iter(world) {
        let text = format!(
            "Cell: {} | {:?} | facing {:?} | frame {} | step {:.2} | jump {:.2}",
            character.cell,
            character.phase(),
            character.facing,
            character.walk_frame,
            character.step_progress(),
            character.jump_progress()
        );
        d.draw_text(&text, 10, screen.h - 20, 10, Color::BLACK);
    }
}
