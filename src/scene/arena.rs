use hecs::{Entity, World};
use log::info;

use crate::components::TargetScript;
use crate::config::ArenaConfig;
use crate::scene::prefabs::{spawn_boss, spawn_player};

/// Populate an empty world from `config`.
/// Returns the boss and, when one was requested, the player.
pub fn load_arena(world: &mut World, config: &ArenaConfig) -> (Entity, Option<Entity>) {
    let player = config.spawn_player.then(|| {
        let script = TargetScript::new(
            config.player_waypoints.clone(),
            config.player_speed,
            config.player_lifetime,
        );
        spawn_player(world, config.player_start, script)
    });

    let boss = spawn_boss(world, config, player);
    info!(
        "[scene] boss at {:?}, player {}",
        config.boss_start,
        match player {
            Some(_) => format!("at {:?}", config.player_start),
            None => "absent".to_string(),
        }
    );
    (boss, player)
}
