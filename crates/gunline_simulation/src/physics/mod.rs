//! Physics query surface для projectile hit detection
//!
//! Core НЕ владеет physics world — только спрашивает:
//! - `sweep` — swept-segment query (origin, direction, max distance, layer mask)
//! - `overlap` — sphere overlap query (backup detection path)
//!
//! Реализации:
//! - `SceneColliders` — встроенная геометрия (planes, cuboids, spheres)
//! - `rapier::RapierCollisionQuery` — adapter над bevy_rapier3d (feature "rapier")

use bevy::prelude::*;

pub mod scene;

#[cfg(feature = "rapier")]
pub mod rapier;


pub use scene::{ColliderShape, SceneCollider, SceneColliders};

/// Результат swept query: ближайшее пересечение вдоль segment'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Владелец collider'а (цель для combat sink)
    pub target: Entity,

    /// Точка пересечения (world space)
    pub point: Vec3,

    /// Нормаль поверхности в точке пересечения
    pub normal: Vec3,

    /// Расстояние от origin до point
    pub distance: f32,
}

/// Результат overlap query
///
/// `contact_point` — ближайшая к центру сферы точка поверхности collider'а
/// (реальная контактная геометрия, не пустой hit record).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub target: Entity,
    pub contact_point: Vec3,
    pub normal: Vec3,
}

/// Collision/physics query capability
pub trait CollisionQuery {
    /// Ближайшее пересечение луча `origin + direction * t`, `t ∈ [0, max_distance]`.
    ///
    /// `direction` должен быть нормализован. Учитываются только collider'ы,
    /// чей layer попадает в `mask`.
    fn sweep(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<SweepHit>;

    /// Любой collider (из `mask`), пересекающий сферу `center`/`radius`.
    /// При нескольких — ближайший к центру.
    fn overlap(&self, center: Vec3, radius: f32, mask: u32) -> Option<OverlapHit>;
}
