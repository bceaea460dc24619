use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{GravityAffected, LocalTransform, Projectile, Velocity};

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
/// Projectiles below this height have hit the floor.
const GROUND_Y: f32 = 0.0;

/// Fly thrown projectiles and clear out the spent ones.
/// Returns how many were despawned this tick.
pub fn projectile_system(world: &mut World, dt: f32) -> usize {
    let mut spent: Vec<Entity> = Vec::new();

    for (entity, (local, projectile, vel, gravity)) in world.query_mut::<(
        &mut LocalTransform,
        &mut Projectile,
        Option<&mut Velocity>,
        Option<&GravityAffected>,
    )>() {
        projectile.age += dt;
        if let Some(vel) = vel {
            if gravity.is_some() {
                vel.0 += GRAVITY * dt;
            }
            // Semi-implicit Euler: velocity first, then position
            local.position += vel.0 * dt;
        }
        if projectile.age >= projectile.lifetime || local.position.y < GROUND_Y {
            spent.push(entity);
        }
    }

    for &entity in &spent {
        let _ = world.despawn(entity);
    }
    spent.len()
}
