use glam::Vec3;
use hecs::{Entity, World};

use crate::components::*;
use crate::config::ArenaConfig;
use crate::systems::BossController;

/// Contact sphere around the boss body.
pub const BOSS_RADIUS: f32 = 0.6;
/// Contact sphere around the player body.
pub const PLAYER_RADIUS: f32 = 0.4;

/// Spawn a boss with every capability the controller needs.
/// `target` is what it will chase, flee and throw at; `None` leaves it disabled.
pub fn spawn_boss(world: &mut World, config: &ArenaConfig, target: Option<Entity>) -> Entity {
    let boss = world.spawn((
        LocalTransform::new(config.boss_start),
        Collider::Sphere {
            radius: BOSS_RADIUS,
        },
        Tag::Boss,
        NavAgent::new(config.boss_speed, config.boss_angular_speed),
        Animator::new(),
        BossTarget(target),
        BossController::new(config.boss.clone()),
    ));
    if let Some(offset) = config.throw_origin {
        let _ = world.insert_one(boss, ThrowOrigin(offset));
    }
    boss
}

/// Spawn the scripted player the boss reacts to.
pub fn spawn_player(world: &mut World, pos: Vec3, script: TargetScript) -> Entity {
    world.spawn((
        LocalTransform::new(pos),
        Collider::Sphere {
            radius: PLAYER_RADIUS,
        },
        Tag::Player,
        Player,
        script,
    ))
}
