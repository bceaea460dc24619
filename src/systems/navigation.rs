use hecs::World;

use crate::components::{Inactive, LocalTransform, NavAgent};
use crate::math::horizontal;

/// Walk every running agent toward its destination along the ground plane.
/// Stopped agents and agents without a destination stay put.
pub fn nav_agent_system(world: &mut World, dt: f32) {
    for (_entity, (local, agent)) in world
        .query_mut::<(&mut LocalTransform, &NavAgent)>()
        .without::<&Inactive>()
    {
        if agent.stopped {
            continue;
        }
        let Some(destination) = agent.destination else {
            continue;
        };
        let offset = horizontal(destination - local.position);
        let dist = offset.length();
        if dist <= agent.stopping_distance {
            continue;
        }
        let step = (agent.speed * dt).min(dist);
        local.position += offset / dist * step;
    }
}
