//! Projectile events (core → combat / effects collaborators)
//!
//! Core только сообщает "этот полёт попал в эту цель с этим уроном".
//! Как применяется damage — решает combat system (отдельный collaborator).

use bevy::prelude::*;

use super::flight::HitDetection;
use super::pool::ProjectileHandle;

/// Event: projectile попал в цель
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    /// Кто выстрелил (None — projectile запущен не из WeaponMount)
    pub shooter: Option<Entity>,

    /// В кого попали (владелец collider'а)
    pub target: Entity,

    /// Точка попадания (world space)
    pub point: Vec3,

    /// Нормаль поверхности (для VFX: sparks, decals)
    pub normal: Vec3,

    /// Расстояние от начала segment'а tick'а до точки попадания
    pub distance: f32,

    pub damage: f32,

    /// Полёт, к которому относится hit
    pub flight: ProjectileHandle,

    pub detection: HitDetection,
}

/// Event: projectile истёк без попадания
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileExpired {
    pub shooter: Option<Entity>,
    pub flight: ProjectileHandle,
    pub position: Vec3,
}

/// Terminal event одного полёта (после него instance возвращается в pool)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    Hit(ProjectileHit),
    Expired(ProjectileExpired),
}

impl ProjectileEvent {
    pub fn flight(&self) -> ProjectileHandle {
        match self {
            ProjectileEvent::Hit(hit) => hit.flight,
            ProjectileEvent::Expired(expired) => expired.flight,
        }
    }
}
