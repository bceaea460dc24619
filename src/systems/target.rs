use hecs::{Entity, World};
use log::info;

use crate::components::{LocalTransform, Player, TargetScript};
use crate::math::horizontal;

const ARRIVE_DISTANCE: f32 = 0.05;

/// Walk scripted players along their waypoints and remove the ones whose
/// lifetime ran out.
pub fn target_script_system(world: &mut World, dt: f32) {
    let mut expired: Vec<Entity> = Vec::new();

    for (entity, (local, script, _player)) in
        world.query_mut::<(&mut LocalTransform, &mut TargetScript, &Player)>()
    {
        if let Some(life) = script.remaining_life.as_mut() {
            *life -= dt;
            if *life <= 0.0 {
                expired.push(entity);
                continue;
            }
        }
        if script.waypoints.is_empty() {
            continue;
        }

        // Budget the step across waypoints so fast walkers don't stall on arrival.
        let mut budget = script.speed * dt;
        for _ in 0..script.waypoints.len() {
            let goal = script.waypoints[script.next % script.waypoints.len()];
            let offset = horizontal(goal - local.position);
            let dist = offset.length();
            if dist <= ARRIVE_DISTANCE {
                script.next = (script.next + 1) % script.waypoints.len();
                continue;
            }
            if budget < dist {
                local.position += offset / dist * budget;
                break;
            }
            local.position += offset;
            budget -= dist;
            script.next = (script.next + 1) % script.waypoints.len();
        }
    }

    for entity in expired {
        let _ = world.despawn(entity);
        info!("[target] player {:?} removed", entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn walks_through_waypoints_in_order() {
        let mut world = World::new();
        let script = TargetScript::new(
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 2.0)],
            1.0,
            None,
        );
        let e = world.spawn((LocalTransform::new(Vec3::ZERO), script, Player));

        target_script_system(&mut world, 1.5);
        let pos = world.get::<&LocalTransform>(e).unwrap().position;
        assert_relative_eq!(pos.x, 1.0);
        assert_relative_eq!(pos.z, 0.5);
        assert_eq!(world.get::<&TargetScript>(e).unwrap().next, 1);
    }

    #[test]
    fn mortal_players_are_despawned() {
        let mut world = World::new();
        let script = TargetScript::new(Vec::new(), 1.0, Some(0.5));
        let e = world.spawn((LocalTransform::new(Vec3::ZERO), script, Player));
        target_script_system(&mut world, 0.25);
        assert!(world.contains(e));
        target_script_system(&mut world, 0.25);
        assert!(!world.contains(e));
    }
}
