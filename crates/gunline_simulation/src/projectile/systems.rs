//! Projectile simulation step (FixedUpdate)

use bevy::prelude::*;

use super::events::{ProjectileEvent, ProjectileExpired, ProjectileHit};
use super::flight::FlightEnd;
use super::pool::ProjectilePool;
use crate::config::{SimulationClock, SimulationConfig};
use crate::logger::log;
use crate::physics::CollisionQuery;

/// Один fixed tick для всех active projectile'ов.
///
/// Порядок для каждого: integrate → swept → overlap → expiry.
/// Terminal event → release в pool в этом же tick'е.
pub fn step_projectiles(
    pool: &mut ProjectilePool,
    world: &impl CollisionQuery,
    gravity: Vec3,
    dt: f32,
    now: f64,
    min_sweep_distance: f32,
    events: &mut Vec<ProjectileEvent>,
) {
    for handle in pool.active_handles() {
        let Some(projectile) = pool.get_mut(handle) else {
            continue;
        };

        let shooter = projectile.shooter();
        let Some(end) = projectile.step(world, gravity, dt, now, min_sweep_distance) else {
            continue;
        };

        let event = match end {
            FlightEnd::Hit(hit) => {
                log(&format!(
                    "🎯 Projectile hit {:?} at {:?}: distance {:.2}m, damage {} ({:?})",
                    hit.target, hit.point, hit.distance, hit.damage, hit.detection
                ));

                ProjectileEvent::Hit(ProjectileHit {
                    shooter,
                    target: hit.target,
                    point: hit.point,
                    normal: hit.normal,
                    distance: hit.distance,
                    damage: hit.damage,
                    flight: handle,
                    detection: hit.detection,
                })
            }
            FlightEnd::Expired { position } => {
                log(&format!("⌛ Projectile {:?} lifetime expired at {:?}", handle, position));

                ProjectileEvent::Expired(ProjectileExpired {
                    shooter,
                    flight: handle,
                    position,
                })
            }
        };

        pool.release(handle);
        events.push(event);
    }
}

/// System: step projectiles против collision world resource `C`
pub fn simulate_projectiles<C: CollisionQuery + Resource>(
    mut pool: ResMut<ProjectilePool>,
    world: Res<C>,
    clock: Res<SimulationClock>,
    config: Res<SimulationConfig>,
    mut hits: EventWriter<ProjectileHit>,
    mut expiries: EventWriter<ProjectileExpired>,
) {
    let mut events = Vec::new();

    step_projectiles(
        &mut pool,
        &*world,
        config.gravity(),
        clock.delta(),
        clock.now(),
        config.min_sweep_distance,
        &mut events,
    );

    for event in events {
        match event {
            ProjectileEvent::Hit(hit) => {
                hits.write(hit);
            }
            ProjectileEvent::Expired(expired) => {
                expiries.write(expired);
            }
        }
    }
}
