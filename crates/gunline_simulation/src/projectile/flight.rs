//! Projectile — один pooled instance, переиспользуется между полётами
//!
//! Lifecycle: Pooled → (initialize) → Flying → (hit | lifetime expired) → release → Pooled
//!
//! Hit detection (два независимых прохода, один one-shot flag):
//! 1. Swept: segment previous_position → position (после integrate) через
//!    `CollisionQuery::sweep`. Не пропускает тонкую геометрию на высокой скорости.
//! 2. Overlap (backup): sphere overlap в начале segment'а (spawn внутри цели:
//!    sweep изнутри collider'а ничего не видит) и на текущей позиции.
//!    Первый сработавший проход ставит flag, остальные молчат.
//!
//! Lifetime — polled deadline (`expires_at`), не таймер: каждый `initialize`
//! перезаписывает deadline, поэтому stale deadline прошлого полёта невозможен.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision_layers::COLLISION_MASK_PROJECTILES;
use crate::config::deadline_reached;
use crate::physics::CollisionQuery;

/// Ключ pool bucket'а (тип снаряда)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectileTypeId(pub u32);

impl ProjectileTypeId {
    pub const RIFLE_ROUND: Self = Self(1);
    pub const PISTOL_ROUND: Self = Self(2);
}

/// Уникальный id instance'а внутри pool (identity, не меняется между полётами)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Параметры типа снаряда (общие для всех instance'ов bucket'а)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileKind {
    pub id: ProjectileTypeId,

    /// Время жизни полёта (секунды)
    pub lifetime: f32,

    /// С какими слоями sweep/overlap
    pub collision_mask: u32,

    /// Радиус для overlap pass (метры)
    pub radius: f32,

    /// Множитель гравитации (0 = прямолинейно)
    pub gravity_scale: f32,
}

impl ProjectileKind {
    pub const DEFAULT_LIFETIME: f32 = 5.0;

    pub fn new(id: ProjectileTypeId) -> Self {
        Self {
            id,
            lifetime: Self::DEFAULT_LIFETIME,
            collision_mask: COLLISION_MASK_PROJECTILES,
            radius: 0.05,
            gravity_scale: 1.0,
        }
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime.max(0.0);
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    pub fn with_collision_mask(mut self, mask: u32) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Clamp к минимумам (значения из файла минуют `with_*`)
    pub fn sanitized(self) -> Self {
        self.with_lifetime(self.lifetime).with_radius(self.radius)
    }
}

/// Где instance находится в иерархии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileParent {
    /// Внутри pool container своего bucket'а (не simulated, не collidable)
    PoolContainer(ProjectileTypeId),
    /// В сцене (после acquire)
    Scene,
}

/// Каким проходом зарегистрирован hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDetection {
    Swept,
    Overlap,
}

/// Hit одного полёта (без handle — его добавляет step)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub target: Entity,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub damage: f32,
    pub detection: HitDetection,
}

/// Чем закончился tick полёта
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEnd {
    Hit(HitReport),
    Expired { position: Vec3 },
}

#[derive(Debug, Clone)]
pub struct Projectile {
    instance: InstanceId,
    kind: ProjectileKind,
    pub(crate) flight: u32,
    parent: ProjectileParent,

    alive: bool,
    has_collided: bool,
    /// Integration отключена (после hit — projectile заморожен в точке попадания)
    kinematic: bool,

    shooter: Option<Entity>,
    damage: f32,
    velocity: Vec3,
    previous_position: Vec3,
    position: Vec3,
    expires_at: Option<f64>,
}

impl Projectile {
    pub(crate) fn new(instance: InstanceId, kind: ProjectileKind) -> Self {
        Self {
            instance,
            kind,
            flight: 0,
            parent: ProjectileParent::PoolContainer(kind.id),
            alive: false,
            has_collided: false,
            kinematic: false,
            shooter: None,
            damage: 0.0,
            velocity: Vec3::ZERO,
            previous_position: Vec3::ZERO,
            position: Vec3::ZERO,
            expires_at: None,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn kind(&self) -> &ProjectileKind {
        &self.kind
    }

    pub fn parent(&self) -> ProjectileParent {
        self.parent
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_collided(&self) -> bool {
        self.has_collided
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn shooter(&self) -> Option<Entity> {
        self.shooter
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    pub fn expires_at(&self) -> Option<f64> {
        self.expires_at
    }

    pub fn remaining_lifetime(&self, now: f64) -> f32 {
        self.expires_at
            .map_or(0.0, |deadline| (deadline - now).max(0.0) as f32)
    }

    /// Поставить instance на muzzle перед `initialize`
    pub fn place(&mut self, position: Vec3, shooter: Option<Entity>) {
        self.position = position;
        self.previous_position = position;
        self.shooter = shooter;
    }

    /// Pooled → Flying. Никакого residue от прошлого полёта:
    /// damage/velocity/collided flag/deadline перезаписываются.
    pub fn initialize(&mut self, damage: f32, velocity: Vec3, now: f64) {
        self.damage = damage;
        self.has_collided = false;
        self.previous_position = self.position;
        self.kinematic = false;
        self.velocity = velocity;
        self.expires_at = Some(now + self.kind.lifetime as f64);
        self.alive = true;
    }

    /// Motion integration (semi-implicit Euler), до hit detection
    pub fn integrate(&mut self, gravity: Vec3, dt: f32) {
        if !self.alive || self.kinematic {
            return;
        }

        self.velocity += gravity * self.kind.gravity_scale * dt;
        self.position += self.velocity * dt;
    }

    /// Swept pass: segment previous_position → position
    pub fn detect_swept(&mut self, world: &impl CollisionQuery, min_distance: f32) -> Option<HitReport> {
        if !self.alive || self.has_collided {
            return None;
        }

        let segment = self.position - self.previous_position;
        let distance = segment.length();
        if distance <= min_distance {
            return None;
        }

        let hit = world.sweep(
            self.previous_position,
            segment / distance,
            distance,
            self.kind.collision_mask,
        )?;

        Some(self.resolve_hit(hit.target, hit.point, hit.normal, hit.distance, HitDetection::Swept))
    }

    /// Backup overlap pass на текущей позиции (подавляется one-shot flag'ом)
    pub fn detect_overlap(&mut self, world: &impl CollisionQuery) -> Option<HitReport> {
        self.detect_overlap_at(world, self.position)
    }

    /// Overlap в начале segment'а: sweep, стартующий внутри collider'а, его
    /// не видит, а на скорости пули снаряд покидает цель за один tick.
    pub fn detect_overlap_at_start(&mut self, world: &impl CollisionQuery) -> Option<HitReport> {
        self.detect_overlap_at(world, self.previous_position)
    }

    fn detect_overlap_at(&mut self, world: &impl CollisionQuery, center: Vec3) -> Option<HitReport> {
        if !self.alive || self.has_collided {
            return None;
        }

        let overlap = world.overlap(center, self.kind.radius, self.kind.collision_mask)?;
        let distance = self.previous_position.distance(overlap.contact_point);

        Some(self.resolve_hit(
            overlap.target,
            overlap.contact_point,
            overlap.normal,
            distance,
            HitDetection::Overlap,
        ))
    }

    fn resolve_hit(
        &mut self,
        target: Entity,
        point: Vec3,
        normal: Vec3,
        distance: f32,
        detection: HitDetection,
    ) -> HitReport {
        self.has_collided = true;

        // Freeze: snap в точку попадания, физика off
        self.position = point;
        self.velocity = Vec3::ZERO;
        self.kinematic = true;

        HitReport {
            target,
            point,
            normal,
            distance,
            damage: self.damage,
            detection,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.alive
            && self
                .expires_at
                .is_some_and(|deadline| deadline_reached(now, deadline))
    }

    /// Один fixed tick: integrate → overlap в начале segment'а → swept →
    /// overlap в конце → expiry.
    ///
    /// Overlap в начале непуст только на tick'е spawn'а (иначе та же точка уже
    /// проверялась в конце прошлого tick'а) и ближе любого swept hit'а.
    ///
    /// `previous_position` после tick'а = позиция на конец этого tick'а
    /// (не пересчитывается из velocity).
    pub fn step(
        &mut self,
        world: &impl CollisionQuery,
        gravity: Vec3,
        dt: f32,
        now: f64,
        min_sweep_distance: f32,
    ) -> Option<FlightEnd> {
        if !self.alive {
            return None;
        }

        self.integrate(gravity, dt);

        let hit = self
            .detect_overlap_at_start(world)
            .or_else(|| self.detect_swept(world, min_sweep_distance))
            .or_else(|| self.detect_overlap(world));

        self.previous_position = self.position;

        if let Some(hit) = hit {
            return Some(FlightEnd::Hit(hit));
        }

        if self.is_expired(now) {
            return Some(FlightEnd::Expired {
                position: self.position,
            });
        }

        None
    }

    pub(crate) fn on_acquired(&mut self) {
        self.flight = self.flight.wrapping_add(1);
        self.parent = ProjectileParent::Scene;
    }

    /// Neutral baseline + обратно в pool container
    pub(crate) fn reset_to_pool(&mut self) {
        self.parent = ProjectileParent::PoolContainer(self.kind.id);
        self.alive = false;
        self.has_collided = false;
        self.kinematic = false;
        self.shooter = None;
        self.damage = 0.0;
        self.velocity = Vec3::ZERO;
        self.previous_position = Vec3::ZERO;
        self.position = Vec3::ZERO;
        self.expires_at = None;
    }
}
