use glam::Vec3;
use hecs::Entity;

/// Linear velocity in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec3);

/// Marker: entity is affected by gravity.
pub struct GravityAffected;

/// Collision shape attached to an entity. Contact only needs spheres.
#[derive(Clone, Copy, Debug)]
pub enum Collider {
    Sphere { radius: f32 },
}

impl Collider {
    pub fn radius(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
        }
    }
}

/// Overlap between two colliders. The normal points from `entity_a` toward `entity_b`.
#[derive(Debug)]
pub struct ContactEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
    pub contact_normal: Vec3,
}
