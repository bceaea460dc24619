use glam::{Quat, Vec3};
use log::{debug, info, warn};

use crate::agent::Cue;
use crate::components::Mode;
use crate::config::BossConfig;
use crate::math::{horizontal, inverse_lerp, lerp, look_rotation};

use super::boss::BossCtx;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Turn-to-face fraction gained per second.
pub const TURN_RATE: f32 = 2.0;
/// Pause between raising the throw cue and releasing the projectile.
pub const WINDUP_DELAY: f32 = 0.3;

// ---------------------------------------------------------------------------
// Sequence state
// ---------------------------------------------------------------------------

/// Per-attempt bookkeeping. Dropped with the sequence that owns it.
#[derive(Clone, Debug)]
pub struct ThrowContext {
    /// Distance to the target when the throw was triggered. Picks projectile speed.
    pub trigger_distance: f32,
    /// Seconds since the sequence first resumed.
    pub elapsed: f32,
    /// Facing the boss turns to before winding up. Set on the first resume.
    pub target_rotation: Option<Quat>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrowPhase {
    /// Agent stopped, facing not captured yet.
    Entry,
    /// Slerping toward the target; `fraction` climbs to 1.0.
    Turning { fraction: f32 },
    /// Throw cue raised; release when `remaining` runs out.
    Windup { remaining: f32 },
    /// Projectile away; recover before re-evaluating.
    Cooldown { remaining: f32 },
}

/// What the controller should do once a sequence completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowUp {
    /// Target is still inside strike range: throw again from `distance`.
    Repeat { distance: f32 },
    /// Hand control back in this mode.
    Settle(Mode),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequenceStatus {
    Running,
    Finished(FollowUp),
    /// Target vanished at a suspension point.
    Aborted,
}

/// A resumable throw attempt: turn, wind up, release, cool down, re-evaluate.
///
/// The controller calls [`ThrowSequence::resume`] once per tick until it stops
/// returning [`SequenceStatus::Running`]. While alive the sequence owns the
/// movement agent and the boss facing.
#[derive(Clone, Debug)]
pub struct ThrowSequence {
    context: ThrowContext,
    phase: ThrowPhase,
    released: bool,
}

impl ThrowSequence {
    /// Entry phase: stop the agent and drop the running cue.
    pub fn begin(trigger_distance: f32, ctx: &mut BossCtx) -> Self {
        ctx.agent.set_stopped(true);
        ctx.animator.set_cue(Cue::Running, false);
        info!("[throw] preparing (distance {:.2})", trigger_distance);
        Self {
            context: ThrowContext {
                trigger_distance,
                elapsed: 0.0,
                target_rotation: None,
            },
            phase: ThrowPhase::Entry,
            released: false,
        }
    }

    pub fn context(&self) -> &ThrowContext {
        &self.context
    }

    pub fn phase(&self) -> ThrowPhase {
        self.phase
    }

    /// Whether a projectile has left the hand in this attempt.
    pub fn released(&self) -> bool {
        self.released
    }

    /// Facing is locked once the turn target has been captured.
    pub fn has_locked_facing(&self) -> bool {
        self.context.target_rotation.is_some()
    }

    /// Advance by one tick.
    pub fn resume(&mut self, ctx: &mut BossCtx, config: &BossConfig) -> SequenceStatus {
        let Some(target) = ctx.target else {
            warn!("[throw] target lost during {:?}; aborting", self.phase);
            return SequenceStatus::Aborted;
        };
        self.context.elapsed += ctx.dt;

        match self.phase {
            ThrowPhase::Entry => {
                let flat = horizontal((target - ctx.transform.position).normalize_or_zero());
                let rotation = look_rotation(flat).unwrap_or(ctx.transform.rotation);
                self.context.target_rotation = Some(rotation);
                self.turn(ctx, 0.0, rotation);
            }
            ThrowPhase::Turning { fraction } => {
                let rotation = self.context.target_rotation.unwrap_or(ctx.transform.rotation);
                self.turn(ctx, fraction, rotation);
            }
            ThrowPhase::Windup { remaining } => {
                let remaining = remaining - ctx.dt;
                if remaining > 0.0 {
                    self.phase = ThrowPhase::Windup { remaining };
                } else {
                    self.release(ctx, config, target);
                    self.phase = ThrowPhase::Cooldown {
                        remaining: config.throw_cooldown,
                    };
                }
            }
            ThrowPhase::Cooldown { remaining } => {
                let remaining = remaining - ctx.dt;
                if remaining > 0.0 {
                    self.phase = ThrowPhase::Cooldown { remaining };
                } else {
                    ctx.animator.set_cue(Cue::Throwing, false);
                    let distance = ctx.transform.position.distance(target);
                    debug!("[throw] distance after cooldown: {:.2}", distance);
                    let follow_up = match Mode::after_throw(distance, config) {
                        Mode::Throwing => FollowUp::Repeat { distance },
                        mode => FollowUp::Settle(mode),
                    };
                    return SequenceStatus::Finished(follow_up);
                }
            }
        }
        SequenceStatus::Running
    }

    fn turn(&mut self, ctx: &mut BossCtx, fraction: f32, rotation: Quat) {
        let fraction = fraction + ctx.dt * TURN_RATE;
        ctx.transform.rotation = ctx.transform.rotation.slerp(rotation, fraction.min(1.0));
        if fraction >= 1.0 {
            ctx.animator.set_cue(Cue::Throwing, true);
            info!("[throw] windup");
            self.phase = ThrowPhase::Windup {
                remaining: WINDUP_DELAY,
            };
        } else {
            self.phase = ThrowPhase::Turning { fraction };
        }
    }

    fn release(&mut self, ctx: &mut BossCtx, config: &BossConfig, target: Vec3) {
        let speed = projectile_speed(config, self.context.trigger_distance);
        debug!("[throw] projectile speed {:.2}", speed);

        let (Some(prefab), Some(offset)) = (config.projectile.as_ref(), ctx.throw_origin) else {
            warn!("[throw] projectile prefab or throw origin not set; nothing thrown");
            return;
        };
        let origin = ctx.transform.transform_point(offset);
        match ctx.projectiles.spawn(prefab, origin, Quat::IDENTITY) {
            Some(body) => {
                body.0 = (target - origin).normalize_or_zero() * speed;
                info!("[throw] released at {:.2} m/s", speed);
            }
            None => warn!("[throw] projectile has no body; velocity not set"),
        }
        self.released = true;
    }
}

/// Release speed for a throw triggered at `distance`: nearer is slower,
/// bounded by the configured projectile speeds.
pub fn projectile_speed(config: &BossConfig, distance: f32) -> f32 {
    let factor = inverse_lerp(config.min_distance, config.run_range, distance);
    lerp(config.min_projectile_speed, config.max_projectile_speed, factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Animator, LocalTransform, NavAgent, ProjectileSpawns};
    use approx::assert_relative_eq;
    use rstest::rstest;

    struct Rig {
        transform: LocalTransform,
        agent: NavAgent,
        animator: Animator,
        spawns: ProjectileSpawns,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                transform: LocalTransform::new(Vec3::ZERO),
                agent: NavAgent::new(3.5, 120.0),
                animator: Animator::new(),
                spawns: ProjectileSpawns::default(),
            }
        }

        fn ctx(&mut self, target: Option<Vec3>, dt: f32) -> BossCtx<'_> {
            BossCtx {
                transform: &mut self.transform,
                target,
                agent: &mut self.agent,
                animator: &mut self.animator,
                projectiles: &mut self.spawns,
                throw_origin: Some(Vec3::new(0.0, 1.5, 0.5)),
                dt,
            }
        }
    }

    fn run_to_end(
        seq: &mut ThrowSequence,
        rig: &mut Rig,
        target: Vec3,
        config: &BossConfig,
    ) -> SequenceStatus {
        for _ in 0..200 {
            let status = seq.resume(&mut rig.ctx(Some(target), 0.25), config);
            if status != SequenceStatus::Running {
                return status;
            }
        }
        panic!("sequence never finished");
    }

    #[rstest]
    #[case(0.0, 8.0)]
    #[case(3.0, 8.0)]
    #[case(4.0, 11.5)]
    #[case(5.0, 15.0)]
    #[case(40.0, 15.0)]
    fn speed_follows_trigger_distance(#[case] distance: f32, #[case] expected: f32) {
        assert_relative_eq!(projectile_speed(&BossConfig::default(), distance), expected);
    }

    #[test]
    fn speed_is_monotone_and_bounded() {
        let config = BossConfig::default();
        let mut last = projectile_speed(&config, 0.0);
        for step in 0..=100 {
            let speed = projectile_speed(&config, step as f32 * 0.08);
            assert!(speed >= last);
            assert!(speed >= config.min_projectile_speed && speed <= config.max_projectile_speed);
            last = speed;
        }
    }

    #[test]
    fn begin_stops_agent_and_clears_running() {
        let mut rig = Rig::new();
        rig.animator.running = true;
        let seq = ThrowSequence::begin(2.0, &mut rig.ctx(Some(Vec3::X), 0.25));
        assert!(rig.agent.stopped);
        assert!(!rig.animator.running);
        assert_eq!(seq.phase(), ThrowPhase::Entry);
        assert!(!seq.has_locked_facing());
    }

    #[test]
    fn full_sequence_turns_releases_and_settles() {
        let config = BossConfig::default();
        let mut rig = Rig::new();
        let target = Vec3::new(4.0, 0.0, 0.0);
        let mut seq = ThrowSequence::begin(4.0, &mut rig.ctx(Some(target), 0.25));

        // Two turn ticks at 0.25 s reach fraction 1.0.
        seq.resume(&mut rig.ctx(Some(target), 0.25), &config);
        assert!(seq.has_locked_facing());
        assert!(!rig.animator.throwing);
        seq.resume(&mut rig.ctx(Some(target), 0.25), &config);
        assert!(rig.animator.throwing);
        let facing = rig.transform.rotation * Vec3::Z;
        assert_relative_eq!(facing.x, 1.0, epsilon = 1e-4);

        let status = run_to_end(&mut seq, &mut rig, target, &config);
        assert_eq!(status, SequenceStatus::Finished(FollowUp::Settle(Mode::Fleeing)));
        assert!(!rig.animator.throwing);
        assert_eq!(rig.animator.throw_starts, 1);

        assert_eq!(rig.spawns.0.len(), 1);
        let velocity = rig.spawns.0[0].velocity.unwrap().0;
        assert_relative_eq!(velocity.length(), 11.5, epsilon = 1e-4);
        assert!(velocity.x > 0.0);
    }

    #[test]
    fn windup_and_cooldown_take_their_time() {
        let config = BossConfig::default();
        let mut rig = Rig::new();
        let target = Vec3::new(2.0, 0.0, 0.0);
        let mut seq = ThrowSequence::begin(2.0, &mut rig.ctx(Some(target), 0.25));
        let status = run_to_end(&mut seq, &mut rig, target, &config);
        // 2 turn + 2 windup + 8 cooldown ticks of 0.25 s.
        assert_relative_eq!(seq.context().elapsed, 3.0, epsilon = 1e-4);
        assert_eq!(status, SequenceStatus::Finished(FollowUp::Repeat { distance: 2.0 }));
    }

    #[test]
    fn release_waits_out_the_windup() {
        let config = BossConfig::default();
        let mut rig = Rig::new();
        let target = Vec3::new(2.0, 0.0, 0.0);
        let dt = 0.05;
        let mut seq = ThrowSequence::begin(2.0, &mut rig.ctx(Some(target), dt));
        for _ in 0..40 {
            if matches!(seq.phase(), ThrowPhase::Windup { .. }) {
                break;
            }
            seq.resume(&mut rig.ctx(Some(target), dt), &config);
        }
        assert!(matches!(seq.phase(), ThrowPhase::Windup { .. }));

        let mut windup_ticks = 0;
        while !seq.released() {
            seq.resume(&mut rig.ctx(Some(target), dt), &config);
            windup_ticks += 1;
            assert!(windup_ticks < 20, "never released");
        }
        // 0.3 s of windup is six ticks; float drift may add one.
        assert!(
            (6..=7).contains(&windup_ticks),
            "released after {windup_ticks} windup ticks"
        );
        assert_eq!(rig.spawns.0.len(), 1);
        assert!(matches!(seq.phase(), ThrowPhase::Cooldown { .. }));
    }

    #[test]
    fn boundary_distance_repeats_the_throw() {
        let config = BossConfig::default();
        let mut rig = Rig::new();
        let target = Vec3::new(config.min_distance + config.state_hysteresis, 0.0, 0.0);
        let mut seq = ThrowSequence::begin(3.5, &mut rig.ctx(Some(target), 0.25));
        let status = run_to_end(&mut seq, &mut rig, target, &config);
        assert!(matches!(status, SequenceStatus::Finished(FollowUp::Repeat { .. })));
    }

    #[test]
    fn losing_target_mid_turn_aborts_without_release() {
        let config = BossConfig::default();
        let mut rig = Rig::new();
        let target = Vec3::new(0.0, 0.0, -2.0);
        let mut seq = ThrowSequence::begin(2.0, &mut rig.ctx(Some(target), 0.1));
        seq.resume(&mut rig.ctx(Some(target), 0.1), &config);
        assert!(matches!(seq.phase(), ThrowPhase::Turning { .. }));

        let status = seq.resume(&mut rig.ctx(None, 0.1), &config);
        assert_eq!(status, SequenceStatus::Aborted);
        assert!(rig.spawns.0.is_empty());
        assert!(!seq.released());
        assert!(!rig.animator.throwing);
        assert!(matches!(seq.phase(), ThrowPhase::Turning { .. }));
    }

    #[test]
    fn missing_prefab_skips_spawn_but_finishes() {
        let config = BossConfig {
            projectile: None,
            ..BossConfig::default()
        };
        let mut rig = Rig::new();
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut seq = ThrowSequence::begin(10.0, &mut rig.ctx(Some(target), 0.25));
        let status = run_to_end(&mut seq, &mut rig, target, &config);
        assert!(rig.spawns.0.is_empty());
        assert!(!seq.released());
        assert_eq!(status, SequenceStatus::Finished(FollowUp::Settle(Mode::Chasing)));
    }

    #[test]
    fn bodiless_prefab_is_spawned_without_velocity() {
        let mut config = BossConfig::default();
        if let Some(prefab) = config.projectile.as_mut() {
            prefab.rigid_body = false;
        }
        let mut rig = Rig::new();
        let target = Vec3::new(2.0, 0.0, 0.0);
        let mut seq = ThrowSequence::begin(2.0, &mut rig.ctx(Some(target), 0.25));
        run_to_end(&mut seq, &mut rig, target, &config);
        assert_eq!(rig.spawns.0.len(), 1);
        assert!(rig.spawns.0[0].velocity.is_none());
    }
}
