//! Session layer.
//!
//! The game around the core: it owns the set of collected items, decides what
//! a completed step or a jump means, and drives the high-level states. It
//! only reacts to the core's observer events
//! ([`MoveCompletedEvent`], [`CellEnteredEvent`], [`JumpTriggeredEvent`]) and
//! to [`InputEvent`]s; the core never reads anything defined here.
//!
//! - Stepping onto an uncollected item marks it collected and opens
//!   [`Dialog::Collected`].
//! - Entering the goal door with every item collected requests
//!   [`GameStates::Ending`]; with items missing it posts a locked notice that
//!   expires after [`LOCKED_NOTICE_SECONDS`] or as soon as the player steps
//!   off the door.
//! - Jumping next to water opens [`Dialog::Secret`].
//! - While a dialog is open the game is paused. An action press closes it.
use bevy_ecs::prelude::*;
use log::{debug, error, info};
use rustc_hash::FxHashSet;

use crate::components::character::{Character, Player};
use crate::events::input::InputEvent;
use crate::events::motion::{CellEnteredEvent, JumpTriggeredEvent, MoveCompletedEvent};
use crate::resources::collision::{
    CollectedLookup, collectible_at, is_adjacent_to_water, map_goal_door,
};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState, Paused};
use crate::resources::input::Control;
use crate::resources::tilemap::{Cell, TileMap};
use crate::resources::worldtime::WorldTime;
use crate::systems::frame::{aggregate_input, dispatch_motion_events, spawn_player, teardown_scene};
use crate::systems::gamestate::state_is_playing;

/// How long the "door is locked" notice stays up.
pub const LOCKED_NOTICE_SECONDS: f32 = 3.0;

/// Indices of the items picked up this session.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollectedItems(pub FxHashSet<u32>);

impl CollectedItems {
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Whether every collectible of `map` has been picked up.
    pub fn is_complete(&self, map: &TileMap) -> bool {
        map.collectibles().iter().all(|c| self.0.contains(&c.index))
    }

    pub fn missing(&self, map: &TileMap) -> usize {
        map.collectibles()
            .iter()
            .filter(|c| !self.0.contains(&c.index))
            .count()
    }
}

impl CollectedLookup for CollectedItems {
    fn is_collected(&self, index: u32) -> bool {
        self.0.contains(&index)
    }
}

/// Modal dialogs. Any open dialog pauses the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// An item was just picked up.
    Collected { index: u32 },
    /// The secret-area prompt shown when jumping by the water.
    Secret,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveDialog(pub Option<Dialog>);

/// A timed, non-modal message tied to the cell that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    /// Seconds until it disappears on its own.
    pub remaining: f32,
    /// Leaving this cell cancels the notice.
    pub cell: Cell,
}

/// At most one notice at a time; posting replaces the previous one.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveNotice(pub Option<Notice>);

impl ActiveNotice {
    pub fn post(&mut self, text: impl Into<String>, cell: Cell, seconds: f32) {
        self.0 = Some(Notice {
            text: text.into(),
            remaining: seconds,
            cell,
        });
    }

    /// Drop the notice without letting it expire. Returns whether one was up.
    pub fn cancel(&mut self) -> bool {
        self.0.take().is_some()
    }

    /// Count down by `dt`; returns true when the notice expired this call.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(notice) = self.0.as_mut() else {
            return false;
        };
        notice.remaining -= dt;
        if notice.remaining <= 0.0 {
            self.0 = None;
            return true;
        }
        false
    }
}

/// Insert the session resources and register its observers.
pub fn init_session(world: &mut World) {
    world.init_resource::<CollectedItems>();
    world.init_resource::<ActiveDialog>();
    world.init_resource::<ActiveNotice>();
    world.add_observer(on_move_completed);
    world.add_observer(on_cell_entered);
    world.add_observer(on_jump_triggered);
    world.add_observer(on_input_event);
    world.flush();
}

/// Add the session systems around the core chain of a frame schedule.
pub fn add_session_systems(schedule: &mut Schedule) {
    schedule.add_systems(sync_pause_signal.before(aggregate_input));
    schedule.add_systems(
        update_notice
            .after(dispatch_motion_events)
            .run_if(state_is_playing),
    );
}

/// Push the pause signal for this tick: paused while a dialog is open.
pub fn sync_pause_signal(dialog: Res<ActiveDialog>, mut paused: ResMut<Paused>) {
    let open = dialog.0.is_some();
    if paused.0 != open {
        debug!("Paused: {}", open);
        paused.0 = open;
    }
}

/// Drop the notice once the player starts stepping off its cell, otherwise
/// expire it when its time is up.
pub fn update_notice(
    world_time: Res<WorldTime>,
    mut notice: ResMut<ActiveNotice>,
    player: Query<&Character, With<Player>>,
) {
    let leaving = notice.0.as_ref().is_some_and(|n| {
        player
            .iter()
            .any(|c| c.step.is_some_and(|step| step.to != n.cell))
    });
    if leaving {
        notice.cancel();
        debug!("Notice cancelled, player left the door");
    } else if notice.tick(world_time.delta) {
        debug!("Notice expired");
    }
}

/// Pick up an item on the cell the character just reached.
pub fn on_move_completed(
    trigger: On<MoveCompletedEvent>,
    map: Res<TileMap>,
    mut collected: ResMut<CollectedItems>,
    mut dialog: ResMut<ActiveDialog>,
) {
    let cell = trigger.event().cell;
    if let Some(index) = collectible_at(&map, cell, &*collected) {
        collected.0.insert(index);
        info!(
            "Collected item {} at {} ({}/{})",
            index,
            cell,
            collected.count(),
            map.collectibles().len()
        );
        dialog.0 = Some(Dialog::Collected { index });
    }
}

/// Goal check on the door cell.
pub fn on_cell_entered(
    trigger: On<CellEnteredEvent>,
    map: Res<TileMap>,
    collected: Res<CollectedItems>,
    mut next_state: ResMut<NextGameState>,
    mut notice: ResMut<ActiveNotice>,
) {
    let cell = trigger.event().cell;
    if map_goal_door(&map) != Some(cell) {
        return;
    }
    if collected.is_complete(&map) {
        info!("Reached the door with everything collected");
        next_state.set(GameStates::Ending);
    } else {
        let missing = collected.missing(&map);
        info!("Door is locked, {} item(s) missing", missing);
        notice.post(
            format!("The door is locked. {missing} item(s) still missing."),
            cell,
            LOCKED_NOTICE_SECONDS,
        );
    }
}

/// Secret prompt when jumping next to water.
pub fn on_jump_triggered(
    trigger: On<JumpTriggeredEvent>,
    map: Res<TileMap>,
    mut dialog: ResMut<ActiveDialog>,
) {
    let cell = trigger.event().cell;
    if dialog.0.is_none() && is_adjacent_to_water(&map, cell) {
        info!("Secret prompt opened at {}", cell);
        dialog.0 = Some(Dialog::Secret);
    }
}

/// Action presses: dismiss the dialog, enter the house from its door, or
/// leave the ending screen.
pub fn on_input_event(
    trigger: On<InputEvent>,
    state: Res<GameState>,
    mut next_state: ResMut<NextGameState>,
    mut dialog: ResMut<ActiveDialog>,
    map: Option<Res<TileMap>>,
    collected: Res<CollectedItems>,
    player: Query<&Character, With<Player>>,
) {
    let event = trigger.event();
    if event.action != Control::Action || !event.pressed {
        return;
    }
    match state.get() {
        GameStates::Ending => {
            next_state.set(GameStates::Quitting);
            return;
        }
        GameStates::Playing => {}
        _ => return,
    }

    if let Some(closed) = dialog.0.take() {
        debug!("Dialog {:?} dismissed", closed);
        return;
    }

    let (Some(map), Ok(character)) = (map, player.single()) else {
        return;
    };
    if !character.is_stepping()
        && map_goal_door(&map) == Some(character.cell)
        && collected.is_complete(&map)
    {
        info!("Entering the house");
        next_state.set(GameStates::Ending);
    }
}

/// Start a scene on `map`: fresh session state and the player on its spawn.
pub fn start_scene(commands: &mut Commands, map: TileMap) {
    commands.insert_resource(CollectedItems::default());
    commands.insert_resource(ActiveDialog::default());
    commands.insert_resource(ActiveNotice::default());
    commands.insert_resource(Paused(false));
    spawn_player(commands, &map);
    commands.insert_resource(map);
}

/// `Setup` hook: load the configured map and start playing.
pub fn setup(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextGameState>,
) {
    match TileMap::load(&config.map_path) {
        Ok(map) => {
            commands.insert_resource(config.motion_tuning());
            start_scene(&mut commands, map);
            next_state.set(GameStates::Playing);
        }
        Err(e) => {
            error!("Cannot start: {}", e);
            next_state.set(GameStates::Quitting);
        }
    }
}

/// `Playing` hook.
pub fn enter_play(mut paused: ResMut<Paused>, map: Option<Res<TileMap>>) {
    paused.0 = false;
    if let Some(map) = map {
        info!(
            "Playing: find {} item(s), then head to the door",
            map.collectibles().len()
        );
    }
}

/// `Ending` hook: stop the scene, drop dialogs and pending notices.
pub fn enter_ending(world: &mut World) {
    teardown_scene(world);
    world.insert_resource(ActiveDialog::default());
    if let Some(mut notice) = world.get_resource_mut::<ActiveNotice>() {
        notice.cancel();
    }
    let collected = world
        .get_resource::<CollectedItems>()
        .map_or(0, CollectedItems::count);
    info!("The end. {} item(s) collected", collected);
}

/// `Quitting` hook.
pub fn quit_game(world: &mut World) {
    teardown_scene(world);
    info!("Quitting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_its_time() {
        let mut notice = ActiveNotice::default();
        notice.post("locked", Cell::new(1, 3), 3.0);
        assert!(!notice.tick(1.5));
        assert!(notice.0.is_some());
        assert!(notice.tick(1.5));
        assert!(notice.0.is_none());
        assert!(!notice.tick(1.0));
    }

    #[test]
    fn test_notice_cancel() {
        let mut notice = ActiveNotice::default();
        assert!(!notice.cancel());
        notice.post("locked", Cell::new(1, 3), 3.0);
        assert!(notice.cancel());
        assert!(notice.0.is_none());
    }

    #[test]
    fn test_collected_items_lookup() {
        let mut items = CollectedItems::default();
        items.0.insert(4);
        assert!(items.is_collected(4));
        assert!(!items.is_collected(5));
        assert_eq!(items.count(), 1);
    }
}
