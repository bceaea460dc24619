mod boss;
mod contact;
mod navigation;
mod projectile;
mod target;
mod throw;

pub use boss::{boss_ai_system, BossController, BossCtx};
pub use contact::contact_system;
pub use navigation::nav_agent_system;
pub use projectile::{projectile_system, GRAVITY};
pub use target::target_script_system;
pub use throw::{
    projectile_speed, FollowUp, SequenceStatus, ThrowContext, ThrowPhase, ThrowSequence,
    TURN_RATE, WINDUP_DELAY,
};
