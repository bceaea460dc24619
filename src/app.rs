use std::fmt;

use hecs::{Entity, World};
use log::{debug, info};

use crate::components::{EnemyCounter, Mode};
use crate::config::ArenaConfig;
use crate::engine::time::{FixedTimestep, TimestepError};
use crate::scene::load_arena;
use crate::systems::{
    boss_ai_system, contact_system, nav_agent_system, projectile_system, target_script_system,
    BossController,
};

/// Default simulation step, seconds.
pub const SIM_DT: f32 = 1.0 / 60.0;

/// What a finished run looked like.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed: f32,
    pub projectiles_spawned: usize,
    pub projectiles_expired: usize,
    pub throws_started: u32,
    pub contacts: usize,
    pub final_mode: Mode,
    pub boss_enabled: bool,
    pub boss_over: bool,
    pub enemies_remaining: i32,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:               {} ({:.2}s)", self.ticks, self.elapsed)?;
        writeln!(f, "throws started:      {}", self.throws_started)?;
        writeln!(
            f,
            "projectiles:         {} spawned, {} expired",
            self.projectiles_spawned, self.projectiles_expired
        )?;
        writeln!(f, "boss contacts:       {}", self.contacts)?;
        let status = match (self.boss_enabled, self.boss_over) {
            (false, _) => "disabled",
            (_, true) => "over",
            _ => "active",
        };
        writeln!(f, "boss:                {} ({:?})", status, self.final_mode)?;
        write!(f, "enemies remaining:   {}", self.enemies_remaining)
    }
}

/// Headless arena: one boss, an optional scripted player, a fixed-step loop.
pub struct ArenaApp {
    world: World,
    counter: EnemyCounter,
    boss: Entity,
    clock: FixedTimestep,
    ticks: u64,
    projectiles_spawned: usize,
    projectiles_expired: usize,
    contacts: usize,
}

impl ArenaApp {
    /// Fails when `dt` cannot drive the fixed step.
    pub fn new(config: &ArenaConfig, dt: f32) -> Result<Self, TimestepError> {
        let clock = FixedTimestep::new(dt)?;
        let mut world = World::new();
        let (boss, _player) = load_arena(&mut world, config);
        Ok(Self {
            world,
            counter: EnemyCounter::new(config.enemy_count),
            boss,
            clock,
            ticks: 0,
            projectiles_spawned: 0,
            projectiles_expired: 0,
            contacts: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn boss(&self) -> Entity {
        self.boss
    }

    pub fn counter(&self) -> &EnemyCounter {
        &self.counter
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One fixed step of every system, in dependency order.
    pub fn step(&mut self) {
        let dt = self.clock.dt;
        target_script_system(&mut self.world, dt);
        self.projectiles_spawned += boss_ai_system(&mut self.world, dt);
        nav_agent_system(&mut self.world, dt);
        self.projectiles_expired += projectile_system(&mut self.world, dt);
        for contact in contact_system(&mut self.world, &mut self.counter) {
            debug!(
                "[app] boss {:?} touched {:?} (normal {:?})",
                contact.entity_a, contact.entity_b, contact.contact_normal
            );
            self.contacts += 1;
        }
        self.ticks += 1;
    }

    /// Feed `seconds` of wall time in frames of `frame_dt` through the fixed
    /// step. Stops early once every enemy is cleared.
    pub fn run(&mut self, seconds: f32, frame_dt: f32) -> RunSummary {
        let frame_dt = if frame_dt.is_finite() && frame_dt > 0.0 {
            frame_dt
        } else {
            self.clock.dt
        };
        let mut wall = 0.0;
        'run: while wall < seconds {
            wall += frame_dt;
            let due = self.clock.advance(frame_dt);
            for _ in 0..due {
                self.step();
                if self.counter.is_cleared() {
                    info!("[app] all enemies cleared after {} ticks", self.ticks);
                    break 'run;
                }
            }
            debug!("[app] frame {:.3}s, {} steps, alpha {:.2}", wall, due, self.clock.alpha());
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        let (final_mode, throws_started, boss_enabled, boss_over) =
            match self.world.get::<&BossController>(self.boss) {
                Ok(controller) => (
                    controller.mode(),
                    controller.throws_started(),
                    controller.is_enabled(),
                    controller.is_over(),
                ),
                Err(_) => (Mode::Chasing, 0, false, false),
            };
        RunSummary {
            ticks: self.ticks,
            elapsed: self.ticks as f32 * self.clock.dt,
            projectiles_spawned: self.projectiles_spawned,
            projectiles_expired: self.projectiles_expired,
            throws_started,
            contacts: self.contacts,
            final_mode,
            boss_enabled,
            boss_over,
            enemies_remaining: self.counter.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn run_stops_once_counter_clears() {
        // Player walks straight into a boss that cannot throw.
        let mut config = ArenaConfig {
            player_start: Vec3::new(2.0, 0.0, 0.0),
            player_waypoints: vec![Vec3::ZERO],
            ..ArenaConfig::default()
        };
        config.boss.projectile = None;
        let mut app = ArenaApp::new(&config, 0.05).unwrap();
        let summary = app.run(30.0, 0.05);
        assert!(summary.boss_over);
        assert_eq!(summary.enemies_remaining, 0);
        assert!(summary.elapsed < 30.0);
    }

    #[test]
    fn summary_reports_disabled_boss() {
        let config = ArenaConfig {
            spawn_player: false,
            ..ArenaConfig::default()
        };
        let mut app = ArenaApp::new(&config, SIM_DT).unwrap();
        let summary = app.run(0.5, SIM_DT);
        assert!(!summary.boss_enabled);
        assert_eq!(summary.throws_started, 0);
        assert_eq!(summary.enemies_remaining, 1);
        assert!(summary.to_string().contains("disabled"));
    }

    #[test]
    fn zero_step_is_rejected() {
        assert_eq!(
            ArenaApp::new(&ArenaConfig::default(), 0.0).err(),
            Some(TimestepError::InvalidStep(0.0))
        );
    }

    #[test]
    fn unusable_frame_length_falls_back_to_the_step() {
        let mut app = ArenaApp::new(&ArenaConfig::default(), 0.25).unwrap();
        let summary = app.run(1.0, f32::INFINITY);
        assert_eq!(summary.ticks, 4);
    }
}
