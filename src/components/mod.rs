mod boss;
mod physics;

pub use boss::*;
pub use physics::*;

use glam::{Mat4, Quat, Vec3};

use crate::agent::ProjectileFactory;
use crate::config::ProjectilePrefab;

/// Spatial transform with position, rotation, and scale.
#[derive(Clone, Copy, Debug)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Transform a point from this entity's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.matrix().transform_point3(local)
    }
}

/// What an entity is, for contact filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Player,
    Boss,
    Projectile,
}

/// Marker: this entity is the player.
pub struct Player;

/// Marker: entity is switched off. Systems skip it.
pub struct Inactive;

/// A thrown projectile. `age` counts up until `lifetime`.
pub struct Projectile {
    pub age: f32,
    pub lifetime: f32,
}

/// A projectile released this tick, waiting to be spawned into the world.
#[derive(Clone, Debug)]
pub struct PendingProjectile {
    pub prefab: ProjectilePrefab,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Option<Velocity>,
}

/// Collects releases while the world is borrowed; drained by the boss AI system.
#[derive(Default, Debug)]
pub struct ProjectileSpawns(pub Vec<PendingProjectile>);

impl ProjectileFactory for ProjectileSpawns {
    fn spawn(
        &mut self,
        prefab: &ProjectilePrefab,
        position: Vec3,
        rotation: Quat,
    ) -> Option<&mut Velocity> {
        self.0.push(PendingProjectile {
            prefab: prefab.clone(),
            position,
            rotation,
            velocity: prefab.rigid_body.then_some(Velocity::default()),
        });
        self.0.last_mut().and_then(|p| p.velocity.as_mut())
    }
}
