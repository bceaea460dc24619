use glam::Vec3;
use hecs::{Entity, World};
use log::{debug, error, info, warn};

use crate::agent::{AnimationSink, Cue, MovementAgent, ProjectileFactory, WinCounter};
use crate::components::{
    Animator, BossTarget, Collider, GravityAffected, Inactive, LocalTransform, Mode, ModeFsm,
    NavAgent, Projectile, ProjectileSpawns, Tag, ThrowOrigin,
};
use crate::config::BossConfig;
use crate::math::turn_toward;

use super::throw::{FollowUp, SequenceStatus, ThrowContext, ThrowSequence};

// ---------------------------------------------------------------------------
// Mode classification
// ---------------------------------------------------------------------------

impl Mode {
    /// Start-up classification. The inner boundary ignores hysteresis.
    pub fn at_spawn(distance: f32, config: &BossConfig) -> Self {
        if distance > config.run_range + config.state_hysteresis {
            Self::Chasing
        } else if distance <= config.run_range && distance > config.min_distance {
            Self::Fleeing
        } else {
            Self::Throwing
        }
    }

    /// Steady-state classification. Anything that is neither clearly far nor
    /// inside the flee band (including the outer hysteresis margin) throws.
    pub fn per_tick(distance: f32, config: &BossConfig) -> Self {
        let strike = config.min_distance + config.state_hysteresis;
        if distance > config.run_range + config.state_hysteresis {
            Self::Chasing
        } else if distance <= config.run_range && distance > strike {
            Self::Fleeing
        } else {
            Self::Throwing
        }
    }

    /// Classification once a throw has recovered. `Throwing` means repeat;
    /// the outer margin falls back to chasing.
    pub fn after_throw(distance: f32, config: &BossConfig) -> Self {
        let strike = config.min_distance + config.state_hysteresis;
        if distance <= strike {
            Self::Throwing
        } else if distance <= config.run_range {
            Self::Fleeing
        } else {
            Self::Chasing
        }
    }

    /// Running cue and agent stop flag implied by this mode.
    fn cues(self) -> (bool, bool) {
        match self {
            Self::Chasing | Self::Fleeing => (true, false),
            Self::Throwing => (false, true),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Everything the controller touches during one tick.
pub struct BossCtx<'a> {
    pub transform: &'a mut LocalTransform,
    /// Target position, or `None` when the target is gone.
    pub target: Option<Vec3>,
    pub agent: &'a mut dyn MovementAgent,
    pub animator: &'a mut dyn AnimationSink,
    pub projectiles: &'a mut dyn ProjectileFactory,
    /// Release point in boss-local space.
    pub throw_origin: Option<Vec3>,
    pub dt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    /// Waiting for `initialize`.
    Pending,
    Active,
    /// No target at start-up. Permanent.
    Disabled,
    /// Touched the player. Permanent.
    Over,
}

/// Chase / flee / throw state machine for one boss.
#[derive(Clone, Debug)]
pub struct BossController {
    config: BossConfig,
    fsm: ModeFsm,
    lifecycle: Lifecycle,
    base_speed: f32,
    sequence: Option<ThrowSequence>,
    target_missing: bool,
    throws_started: u32,
    projectiles_released: u32,
}

impl BossController {
    pub fn new(config: BossConfig) -> Self {
        Self {
            config,
            fsm: ModeFsm::new(Mode::Chasing),
            lifecycle: Lifecycle::Pending,
            base_speed: 0.0,
            sequence: None,
            target_missing: false,
            throws_started: 0,
            projectiles_released: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.fsm.state
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle != Lifecycle::Pending
    }

    /// False once start-up found no target.
    pub fn is_enabled(&self) -> bool {
        self.lifecycle != Lifecycle::Disabled
    }

    pub fn is_over(&self) -> bool {
        self.lifecycle == Lifecycle::Over
    }

    pub fn is_preparing_throw(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn throw_context(&self) -> Option<&ThrowContext> {
        self.sequence.as_ref().map(ThrowSequence::context)
    }

    pub fn sequence(&self) -> Option<&ThrowSequence> {
        self.sequence.as_ref()
    }

    pub fn throws_started(&self) -> u32 {
        self.throws_started
    }

    pub fn projectiles_released(&self) -> u32 {
        self.projectiles_released
    }

    /// One-time start-up: cache base speed, pick the opening mode.
    pub fn initialize(&mut self, ctx: &mut BossCtx) {
        if self.lifecycle != Lifecycle::Pending {
            return;
        }
        self.base_speed = ctx.agent.speed();
        ctx.animator.set_playback_rate(self.config.run_animation_speed);

        let Some(target) = ctx.target else {
            error!("[boss] no target assigned; controller disabled");
            self.lifecycle = Lifecycle::Disabled;
            return;
        };
        self.lifecycle = Lifecycle::Active;

        let distance = ctx.transform.position.distance(target);
        info!("[boss] initial distance to target: {:.2}", distance);

        let mode = Mode::at_spawn(distance, &self.config);
        self.fsm = ModeFsm::new(mode);
        Self::apply_mode(mode, ctx);
        if mode == Mode::Throwing {
            self.start_throw(distance, ctx);
        }
    }

    /// Per-tick update. Does nothing before `initialize`, after disabling, or
    /// once the boss is over.
    pub fn advance(&mut self, ctx: &mut BossCtx) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.update(ctx);
        self.fsm.tick(ctx.dt);
    }

    fn update(&mut self, ctx: &mut BossCtx) {
        if self.sequence.is_some() {
            self.advance_sequence(ctx);
            return;
        }

        let Some(target) = ctx.target else {
            if !self.target_missing {
                warn!("[boss] target unavailable; skipping ticks until it returns");
                self.target_missing = true;
            } else {
                debug!("[boss] target still unavailable");
            }
            return;
        };
        self.target_missing = false;

        let distance = ctx.transform.position.distance(target);
        match Mode::per_tick(distance, &self.config) {
            Mode::Chasing => {
                self.transition(Mode::Chasing, ctx);
                self.chase(target, ctx);
            }
            Mode::Fleeing => {
                self.transition(Mode::Fleeing, ctx);
                self.flee(target, distance, ctx);
            }
            Mode::Throwing => {
                info!("[boss] target very close ({:.2}); starting throw", distance);
                self.start_throw(distance, ctx);
            }
        }
    }

    /// Contact hook. Returns `true` when the boss should be deactivated.
    pub fn on_contact(&mut self, tag: Tag, counter: &mut dyn WinCounter) -> bool {
        if tag != Tag::Player || self.lifecycle == Lifecycle::Over {
            return false;
        }
        info!("[boss] contact with player");
        let remaining = counter.decrement();
        debug!("[boss] counter now {}", remaining);
        self.lifecycle = Lifecycle::Over;
        self.sequence = None;
        true
    }

    /// Single-flight trigger: ignored while a sequence is in flight.
    fn start_throw(&mut self, distance: f32, ctx: &mut BossCtx) {
        if self.sequence.is_some() {
            debug!("[boss] throw already in flight; trigger ignored");
            return;
        }
        self.begin_throw(distance, ctx);
    }

    fn begin_throw(&mut self, distance: f32, ctx: &mut BossCtx) {
        self.transition(Mode::Throwing, ctx);
        self.sequence = Some(ThrowSequence::begin(distance, ctx));
        self.throws_started += 1;
    }

    fn advance_sequence(&mut self, ctx: &mut BossCtx) {
        let Some(sequence) = self.sequence.as_mut() else {
            return;
        };
        if !sequence.has_locked_facing() {
            if let Some(target) = ctx.target {
                let toward = target - ctx.transform.position;
                Self::face(ctx, toward);
            }
        }
        let was_released = sequence.released();
        let status = sequence.resume(ctx, &self.config);
        if !was_released && sequence.released() {
            self.projectiles_released += 1;
        }

        match status {
            SequenceStatus::Running => {}
            SequenceStatus::Finished(FollowUp::Repeat { distance }) => {
                info!("[boss] target still very close; repeating throw");
                self.sequence = None;
                self.begin_throw(distance, ctx);
            }
            SequenceStatus::Finished(FollowUp::Settle(mode)) => {
                info!("[boss] throw finished; settling into {:?}", mode);
                self.sequence = None;
                self.transition(mode, ctx);
                ctx.agent.set_stopped(false);
            }
            SequenceStatus::Aborted => {
                // Release the agent so a lost target does not freeze the boss.
                self.sequence = None;
                ctx.animator.set_cue(Cue::Throwing, false);
                ctx.agent.set_stopped(false);
                ctx.agent.set_destination(ctx.transform.position);
            }
        }
    }

    fn transition(&mut self, mode: Mode, ctx: &mut BossCtx) {
        let held = self.fsm.elapsed;
        if self.fsm.go(mode) {
            debug!("[boss] left {:?} after {:.2}s", self.fsm.previous, held);
            Self::apply_mode(mode, ctx);
        }
    }

    fn apply_mode(mode: Mode, ctx: &mut BossCtx) {
        let (running, stopped) = mode.cues();
        ctx.animator.set_cue(Cue::Running, running);
        ctx.agent.set_stopped(stopped);
        info!("[boss] → {:?}", mode);
    }

    fn chase(&self, target: Vec3, ctx: &mut BossCtx) {
        ctx.agent.set_stopped(false);
        ctx.agent.set_speed(self.base_speed);
        ctx.agent.set_destination(target);
        let toward = target - ctx.transform.position;
        Self::face(ctx, toward);
    }

    fn flee(&self, target: Vec3, distance: f32, ctx: &mut BossCtx) {
        ctx.agent.set_stopped(false);
        let away = (ctx.transform.position - target).normalize_or_zero();
        ctx.agent
            .set_destination(ctx.transform.position + away * self.config.run_range);

        if distance < self.config.run_range - self.config.extra_speed_margin {
            ctx.agent.set_speed(self.base_speed + self.config.extra_speed_bonus);
            debug!("[boss] fleeing fast ({:.2})", distance);
        } else {
            ctx.agent.set_speed(self.base_speed);
        }
        Self::face(ctx, away);
    }

    fn face(ctx: &mut BossCtx, direction: Vec3) {
        let fraction = ctx.agent.angular_speed() * ctx.dt;
        ctx.transform.rotation = turn_toward(ctx.transform.rotation, direction, fraction);
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

fn target_position(world: &World, target: Entity) -> Option<Vec3> {
    if world.get::<&Inactive>(target).is_ok() {
        return None;
    }
    world.get::<&LocalTransform>(target).ok().map(|t| t.position)
}

/// Initialize new controllers and advance the rest, then spawn whatever they
/// released. Returns the number of projectiles spawned this tick.
pub fn boss_ai_system(world: &mut World, dt: f32) -> usize {
    // Resolve targets first so the per-boss borrow below stays exclusive.
    let bosses: Vec<(Entity, Option<Vec3>)> = world
        .query::<(&BossController, &BossTarget)>()
        .without::<&Inactive>()
        .iter()
        .map(|(e, (_, target))| (e, target.0.and_then(|t| target_position(world, t))))
        .collect();

    let mut spawns = ProjectileSpawns::default();
    for (entity, target) in bosses {
        let Ok((controller, transform, agent, animator, origin)) = world.query_one_mut::<(
            &mut BossController,
            &mut LocalTransform,
            &mut NavAgent,
            &mut Animator,
            Option<&ThrowOrigin>,
        )>(entity) else {
            continue;
        };
        let mut ctx = BossCtx {
            transform,
            target,
            agent,
            animator,
            projectiles: &mut spawns,
            throw_origin: origin.map(|o| o.0),
            dt,
        };
        if controller.is_initialized() {
            controller.advance(&mut ctx);
        } else {
            controller.initialize(&mut ctx);
        }
    }

    let count = spawns.0.len();
    for pending in spawns.0 {
        let mut transform = LocalTransform::new(pending.position);
        transform.rotation = pending.rotation;
        let entity = world.spawn((
            transform,
            Projectile {
                age: 0.0,
                lifetime: pending.prefab.lifetime,
            },
            Collider::Sphere {
                radius: pending.prefab.radius,
            },
            Tag::Projectile,
        ));
        if let Some(velocity) = pending.velocity {
            let _ = world.insert_one(entity, velocity);
        }
        if pending.prefab.gravity {
            let _ = world.insert_one(entity, GravityAffected);
        }
    }
    count
}
