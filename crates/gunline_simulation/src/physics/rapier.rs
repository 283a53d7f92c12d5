//! bevy_rapier3d adapter (feature "rapier")
//!
//! Тот же `CollisionQuery` контракт поверх Rapier query pipeline:
//! - sweep → `cast_ray_and_get_normal`
//! - overlap → `intersections_with_shape` (ball) + `project_point` для contact
//!
//! Collision groups: layer bits collider'а = memberships, mask → filter.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{CollisionQuery, OverlapHit, SweepHit};
use crate::config::{SimulationClock, SimulationConfig};
use crate::projectile::{step_projectiles, ProjectileEvent, ProjectileExpired, ProjectileHit, ProjectilePool};

pub struct RapierCollisionQuery<'a, 'w> {
    pub context: &'a RapierContext<'w>,
}

fn filter_for(mask: u32) -> QueryFilter<'static> {
    QueryFilter::new().groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask)))
}

impl CollisionQuery for RapierCollisionQuery<'_, '_> {
    fn sweep(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<SweepHit> {
        let (target, intersection) =
            self.context
                .cast_ray_and_get_normal(origin, direction, max_distance, true, filter_for(mask))?;

        Some(SweepHit {
            target,
            point: intersection.point,
            normal: intersection.normal,
            distance: intersection.time_of_impact,
        })
    }

    fn overlap(&self, center: Vec3, radius: f32, mask: u32) -> Option<OverlapHit> {
        let ball = Collider::ball(radius);
        let mut found = None;

        self.context
            .intersections_with_shape(center, Quat::IDENTITY, &ball, filter_for(mask), |entity| {
                found = Some(entity);
                false // первого достаточно
            });

        let target = found?;
        let (contact_point, normal) = self
            .context
            .project_point(center, true, filter_for(mask).predicate(&|entity| entity == target))
            .map(|(_, projection)| {
                let normal = (center - projection.point).try_normalize().unwrap_or(Vec3::Y);
                (projection.point, normal)
            })
            .unwrap_or((center, Vec3::Y));

        Some(OverlapHit {
            target,
            contact_point,
            normal,
        })
    }
}

/// System: step projectiles против Rapier world (вместо SceneColliders)
pub fn step_projectiles_rapier(
    mut pool: ResMut<ProjectilePool>,
    rapier: ReadRapierContext,
    clock: Res<SimulationClock>,
    config: Res<SimulationConfig>,
    mut hits: EventWriter<ProjectileHit>,
    mut expiries: EventWriter<ProjectileExpired>,
) {
    let Ok(context) = rapier.single() else {
        crate::log_error("step_projectiles_rapier: no RapierContext in world");
        return;
    };

    let query = RapierCollisionQuery { context: &context };
    let mut events = Vec::new();

    step_projectiles(
        &mut pool,
        &query,
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
