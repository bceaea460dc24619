use glam::Vec3;
use hecs::{Entity, World};
use log::info;

use crate::agent::{MovementAgent, WinCounter};
use crate::components::{Collider, ContactEvent, Inactive, LocalTransform, NavAgent, Tag};

use super::boss::BossController;

struct ColliderEntry {
    entity: Entity,
    position: Vec3,
    radius: f32,
    tag: Tag,
}

/// Sphere overlap. The normal points from `a` toward `b`.
fn test_pair(a: &ColliderEntry, b: &ColliderEntry) -> Option<ContactEvent> {
    let diff = b.position - a.position;
    let dist = diff.length();
    if dist >= a.radius + b.radius {
        return None;
    }
    let normal = if dist > 1e-6 { diff / dist } else { Vec3::Y };
    Some(ContactEvent {
        entity_a: a.entity,
        entity_b: b.entity,
        contact_normal: normal,
    })
}

/// Detect boss overlaps and feed them to the controllers.
/// A boss that touches the player is stopped and marked [`Inactive`].
/// Returns every boss contact found this tick.
pub fn contact_system(world: &mut World, counter: &mut dyn WinCounter) -> Vec<ContactEvent> {
    let entries: Vec<ColliderEntry> = world
        .query::<(&LocalTransform, &Collider, &Tag)>()
        .without::<&Inactive>()
        .iter()
        .map(|(entity, (local, collider, tag))| ColliderEntry {
            entity,
            position: local.position,
            radius: collider.radius(),
            tag: *tag,
        })
        .collect();

    // Broadphase: bosses against everything else, brute force
    let mut events = Vec::new();
    for boss in entries.iter().filter(|e| e.tag == Tag::Boss) {
        for other in entries.iter().filter(|e| e.entity != boss.entity) {
            if let Some(event) = test_pair(boss, other) {
                events.push((event, other.tag));
            }
        }
    }

    let mut deactivated = Vec::new();
    for (event, tag) in &events {
        let Ok(mut controller) = world.get::<&mut BossController>(event.entity_a) else {
            continue;
        };
        if controller.on_contact(*tag, counter) {
            deactivated.push(event.entity_a);
        }
    }

    for entity in deactivated {
        if let Ok(mut agent) = world.get::<&mut NavAgent>(entity) {
            agent.set_stopped(true);
        }
        let _ = world.insert_one(entity, Inactive);
        info!("[contact] boss {:?} deactivated", entity);
    }

    events.into_iter().map(|(event, _)| event).collect()
}
