use glam::Vec3;
use hecs::Entity;
use log::info;

use crate::agent::{AnimationSink, Cue, MovementAgent, WinCounter};
use crate::fsm::StateMachine;

// ---------------------------------------------------------------------------
// Boss mode
// ---------------------------------------------------------------------------

/// The three behaviors the boss switches between.
///
/// Classification and transition effects live in `src/systems/boss.rs`
/// (next to the controller that has the distance and config in hand), so
/// this file stays pure data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Target is far: run at it.
    Chasing,
    /// Target is mid-range: keep distance.
    Fleeing,
    /// Target is close: stand, turn, lob a projectile.
    Throwing,
}

pub type ModeFsm = StateMachine<Mode>;

// ---------------------------------------------------------------------------
// Capabilities as components
// ---------------------------------------------------------------------------

/// Straight-line stand-in for a nav-mesh agent.
/// `nav_agent_system` moves the owner's transform toward `destination`.
#[derive(Clone, Debug)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub angular_speed: f32,
    pub stopped: bool,
    /// Close enough to the destination to stop moving.
    pub stopping_distance: f32,
}

impl NavAgent {
    pub fn new(speed: f32, angular_speed: f32) -> Self {
        Self {
            destination: None,
            speed,
            angular_speed,
            stopped: false,
            stopping_distance: 0.1,
        }
    }
}

impl MovementAgent for NavAgent {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn angular_speed(&self) -> f32 {
        self.angular_speed
    }
}

/// Animation cue state. A renderer would map these onto clips.
#[derive(Clone, Debug)]
pub struct Animator {
    pub running: bool,
    pub throwing: bool,
    pub playback_rate: f32,
    /// Number of off→on edges of the throwing cue.
    pub throw_starts: u32,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            running: false,
            throwing: false,
            playback_rate: 1.0,
            throw_starts: 0,
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSink for Animator {
    fn set_cue(&mut self, cue: Cue, on: bool) {
        match cue {
            Cue::Running => self.running = on,
            Cue::Throwing => {
                if on && !self.throwing {
                    self.throw_starts += 1;
                }
                self.throwing = on;
            }
        }
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate;
    }
}

/// Where projectiles leave the boss, in boss-local space.
#[derive(Clone, Copy, Debug)]
pub struct ThrowOrigin(pub Vec3);

/// The entity the boss reacts to. `None` when no target was assigned.
#[derive(Clone, Copy, Debug)]
pub struct BossTarget(pub Option<Entity>);

// ---------------------------------------------------------------------------
// Win condition
// ---------------------------------------------------------------------------

/// Enemies left before the player wins.
#[derive(Debug)]
pub struct EnemyCounter {
    pub remaining: i32,
}

impl EnemyCounter {
    pub fn new(remaining: i32) -> Self {
        Self { remaining }
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining <= 0
    }
}

impl WinCounter for EnemyCounter {
    fn decrement(&mut self) -> i32 {
        self.remaining -= 1;
        info!("[win] enemies remaining: {}", self.remaining);
        self.remaining
    }
}

// ---------------------------------------------------------------------------
// Scripted player
// ---------------------------------------------------------------------------

/// Drives the player through waypoints in the headless arena.
#[derive(Clone, Debug)]
pub struct TargetScript {
    pub waypoints: Vec<Vec3>,
    pub speed: f32,
    pub next: usize,
    /// Seconds left before the player is despawned, if it is mortal.
    pub remaining_life: Option<f32>,
}

impl TargetScript {
    pub fn new(waypoints: Vec<Vec3>, speed: f32, lifetime: Option<f32>) -> Self {
        Self {
            waypoints,
            speed,
            next: 0,
            remaining_life: lifetime,
        }
    }
}
