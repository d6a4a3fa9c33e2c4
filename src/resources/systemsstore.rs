//! Registry for dynamically addressable systems.
//!
//! State hooks (`"setup"`, `"enter_play"`, `"enter_ending"`, `"quit_game"`)
//! are registered under string keys at startup and looked up by the game
//! state observer when a transition is applied.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use log::debug;
use rustc_hash::FxHashMap;

/// Map of hook names to system IDs.
#[derive(Resource, Default)]
pub struct SystemsStore {
    pub map: FxHashMap<String, SystemId>,
}

impl SystemsStore {
    pub fn new() -> Self {
        SystemsStore {
            map: FxHashMap::default(),
        }
    }

    /// Insert an already registered system under `name`, replacing any
    /// previous hook of that name.
    pub fn insert(&mut self, name: impl Into<String>, id: SystemId) {
        self.map.insert(name.into(), id);
    }

    /// Register `system` with `world` and store it under `name`.
    pub fn register<M>(
        &mut self,
        world: &mut World,
        name: impl Into<String>,
        system: impl IntoSystem<(), (), M> + 'static,
    ) -> SystemId {
        let name = name.into();
        let id = world.register_system(system);
        debug!("Registered hook '{}'", name);
        self.map.insert(name, id);
        id
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&SystemId> {
        self.map.get(name.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Count(u32);

    fn bump(mut count: ResMut<Count>) {
        count.0 += 1;
    }

    #[test]
    fn test_registered_hook_runs_by_name() {
        let mut world = World::new();
        world.init_resource::<Count>();
        let mut store = SystemsStore::new();
        store.register(&mut world, "setup", bump);
        assert!(store.get("quit_game").is_none());

        let id = *store.get("setup").unwrap();
        world.run_system(id).unwrap();
        world.run_system(id).unwrap();
        assert_eq!(world.resource::<Count>().0, 2);
    }
}
