//! Capabilities the boss controller drives but does not own.
//!
//! The ECS components in [`crate::components`] implement these for the
//! headless arena; tests and other hosts can supply their own.

use glam::{Quat, Vec3};

use crate::components::Velocity;
use crate::config::ProjectilePrefab;

/// Destination-seeking locomotion (a nav-mesh agent in an engine).
pub trait MovementAgent {
    fn set_destination(&mut self, destination: Vec3);
    fn set_stopped(&mut self, stopped: bool);
    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
    /// Turn rate used to derive the per-tick facing fraction.
    fn angular_speed(&self) -> f32;
}

/// Boolean animation cues the controller toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Running,
    Throwing,
}

pub trait AnimationSink {
    fn set_cue(&mut self, cue: Cue, on: bool);
    fn set_playback_rate(&mut self, rate: f32);
}

/// Creates projectile entities at release time.
pub trait ProjectileFactory {
    /// Spawn `prefab` at `position`. Returns the body whose velocity the
    /// caller sets, or `None` when the prefab has no body.
    fn spawn(
        &mut self,
        prefab: &ProjectilePrefab,
        position: Vec3,
        rotation: Quat,
    ) -> Option<&mut Velocity>;
}

/// Remaining-enemies tally that decides the win condition.
pub trait WinCounter {
    /// Remove one enemy and return how many are left.
    fn decrement(&mut self) -> i32;
}
