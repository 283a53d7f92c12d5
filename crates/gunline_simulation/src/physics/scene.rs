//! SceneColliders — встроенный collision world (headless / tests)
//!
//! Простая геометрия без broadphase: линейный проход по всем collider'ам.
//! Для десятков collider'ов этого достаточно; большая сцена → feature "rapier".
//!
//! Правило "старт внутри": sweep, начавшийся внутри solid shape, ничего не
//! возвращает (луч не пересекает поверхность снаружи). Такой случай
//! ловит overlap pass.

use bevy::prelude::*;

use super::{CollisionQuery, OverlapHit, SweepHit};
use crate::collision_layers::layer_in_mask;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Форма collider'а (world space, без rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Бесконечная двусторонняя плоскость (тонкая стена)
    Plane { point: Vec3, normal: Vec3 },

    /// Axis-aligned box
    Cuboid { center: Vec3, half_extents: Vec3 },

    Sphere { center: Vec3, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCollider {
    pub owner: Entity,
    pub layer: u32,
    pub shape: ColliderShape,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SceneColliders {
    pub colliders: Vec<SceneCollider>,
}

impl SceneColliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, owner: Entity, layer: u32, shape: ColliderShape) {
        let shape = match shape {
            ColliderShape::Plane { point, normal } => ColliderShape::Plane {
                point,
                normal: normal.normalize_or_zero(),
            },
            other => other,
        };

        self.colliders.push(SceneCollider { owner, layer, shape });
    }

    /// Builder-вариант `insert` (удобно в тестах и headless demo)
    pub fn with(mut self, owner: Entity, layer: u32, shape: ColliderShape) -> Self {
        self.insert(owner, layer, shape);
        self
    }

    /// Удалить все collider'ы владельца (target despawned)
    pub fn remove_owner(&mut self, owner: Entity) {
        self.colliders.retain(|collider| collider.owner != owner);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl CollisionQuery for SceneColliders {
    fn sweep(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<SweepHit> {
        self.colliders
            .iter()
            .filter(|collider| layer_in_mask(collider.layer, mask))
            .filter_map(|collider| {
                let (distance, normal) = ray_shape(origin, direction, &collider.shape)?;
                (distance <= max_distance).then(|| SweepHit {
                    target: collider.owner,
                    point: origin + direction * distance,
                    normal,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap(&self, center: Vec3, radius: f32, mask: u32) -> Option<OverlapHit> {
        self.colliders
            .iter()
            .filter(|collider| layer_in_mask(collider.layer, mask))
            .filter_map(|collider| {
                let (contact_point, normal) = sphere_shape(center, radius, &collider.shape)?;
                Some(OverlapHit {
                    target: collider.owner,
                    contact_point,
                    normal,
                })
            })
            .min_by(|a, b| {
                a.contact_point
                    .distance_squared(center)
                    .total_cmp(&b.contact_point.distance_squared(center))
            })
    }
}

/// Ray vs shape → (t, surface normal). `t >= 0`, без верхней границы.
fn ray_shape(origin: Vec3, direction: Vec3, shape: &ColliderShape) -> Option<(f32, Vec3)> {
    match *shape {
        ColliderShape::Plane { point, normal } => ray_plane(origin, direction, point, normal),
        ColliderShape::Cuboid { center, half_extents } => {
            ray_cuboid(origin, direction, center - half_extents, center + half_extents)
        }
        ColliderShape::Sphere { center, radius } => ray_sphere(origin, direction, center, radius),
    }
}

fn ray_plane(origin: Vec3, direction: Vec3, point: Vec3, normal: Vec3) -> Option<(f32, Vec3)> {
    let denom = normal.dot(direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = normal.dot(point - origin) / denom;
    if t < 0.0 {
        return None;
    }

    // Нормаль всегда смотрит навстречу лучу (двусторонняя плоскость)
    let facing = if denom > 0.0 { -normal } else { normal };
    Some((t, facing))
}

/// Slab test
fn ray_cuboid(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < PARALLEL_EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t_near = (min[axis] - o) * inv;
        let mut t_far = (max[axis] - o) * inv;
        let mut face = -Vec3::AXES[axis];

        if t_near > t_far {
            std::mem::swap(&mut t_near, &mut t_far);
            face = Vec3::AXES[axis];
        }

        if t_near > t_enter {
            t_enter = t_near;
            enter_normal = face;
        }
        t_exit = t_exit.min(t_far);

        if t_enter > t_exit {
            return None;
        }
    }

    // t_enter < 0 → origin внутри (или box позади)
    if t_enter < 0.0 {
        return None;
    }

    Some((t_enter, enter_normal))
}

fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;

    // Снаружи и смотрит от сферы
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    if t < 0.0 {
        return None;
    }

    let point = origin + direction * t;
    Some((t, (point - center).normalize_or_zero()))
}

/// Sphere vs shape → (contact point на поверхности shape, normal от shape к сфере)
fn sphere_shape(center: Vec3, radius: f32, shape: &ColliderShape) -> Option<(Vec3, Vec3)> {
    match *shape {
        ColliderShape::Plane { point, normal } => {
            let signed = normal.dot(center - point);
            if signed.abs() > radius {
                return None;
            }
            let side = if signed < 0.0 { -normal } else { normal };
            Some((center - normal * signed, side))
        }
        ColliderShape::Cuboid { center: box_center, half_extents } => {
            sphere_cuboid(center, radius, box_center - half_extents, box_center + half_extents)
        }
        ColliderShape::Sphere { center: other, radius: other_radius } => {
            let offset = center - other;
            if offset.length() > radius + other_radius {
                return None;
            }
            let normal = match offset.try_normalize() {
                Some(normal) => normal,
                None => Vec3::Y,
            };
            Some((other + normal * other_radius, normal))
        }
    }
}

fn sphere_cuboid(center: Vec3, radius: f32, min: Vec3, max: Vec3) -> Option<(Vec3, Vec3)> {
    let closest = center.clamp(min, max);
    let offset = center - closest;

    if offset.length_squared() > radius * radius {
        return None;
    }

    if let Some(normal) = offset.try_normalize() {
        return Some((closest, normal));
    }

    // Центр внутри box: контакт на ближайшей грани
    let mut best = (f32::INFINITY, closest, Vec3::ZERO);
    for axis in 0..3 {
        let to_min = center[axis] - min[axis];
        let to_max = max[axis] - center[axis];

        if to_min < best.0 {
            let mut point = center;
            point[axis] = min[axis];
            best = (to_min, point, -Vec3::AXES[axis]);
        }
        if to_max < best.0 {
            let mut point = center;
            point[axis] = max[axis];
            best = (to_max, point, Vec3::AXES[axis]);
        }
    }

    Some((best.1, best.2))
}
