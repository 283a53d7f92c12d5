//! WeaponMount — слот для одного weapon на owner entity
//!
//! Mount владеет weapon instance'ом: attach создаёт его из archetype,
//! detach уничтожает. Input forwarding идёт только через mount.

use bevy::prelude::*;

use super::archetype::WeaponArchetype;
use super::cues::CueSink;
use super::state::{FireOutcome, Weapon};
use crate::logger::{log_error, log_info};
use crate::projectile::ProjectilePool;

/// Snapshot для HUD / collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponStatus {
    pub name: String,
    pub current_ammo: u32,
    pub magazine_size: u32,
    pub is_reloading: bool,
    pub can_fire: bool,
    /// 0..1 во время перезарядки
    pub reload_progress: Option<f32>,
    pub cooldown_remaining: f32,
}

#[derive(Component, Debug, Clone, Default)]
pub struct WeaponMount {
    /// Локальное смещение attach point относительно owner transform
    attach_point: Vec3,
    weapon: Option<Weapon>,
    owner: Option<Entity>,
}

impl WeaponMount {
    pub fn new(attach_point: Vec3) -> Self {
        Self {
            attach_point,
            weapon: None,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn attach_point(&self) -> Vec3 {
        self.attach_point
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    /// Привязать owner (ECS: entity, на которой висит mount)
    pub fn bind_owner(&mut self, owner: Entity) {
        if self.owner == Some(owner) {
            return;
        }
        self.owner = Some(owner);
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.set_owner(Some(owner));
        }
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapon.as_mut()
    }

    pub fn has_weapon(&self) -> bool {
        self.weapon.is_some()
    }

    /// Создать weapon из archetype (предыдущий уничтожается).
    ///
    /// None archetype → error log, mount не меняется (false).
    /// Archetype без fire point attach'ится, но weapon остаётся disabled.
    pub fn attach(&mut self, archetype: Option<&WeaponArchetype>) -> bool {
        let Some(archetype) = archetype else {
            log_error("❌ [WeaponMount] attach: archetype is null, mount unchanged");
            return false;
        };

        self.detach();

        let mut weapon = Weapon::new(archetype.clone()).with_owner(self.owner);
        let fire_point = archetype.fire_point.unwrap_or(Vec3::ZERO);
        weapon.set_muzzle(self.attach_point + fire_point, Vec3::NEG_Z);
        weapon.initialize();

        log_info(&format!(
            "🔧 [WeaponMount] attached {} (owner {:?})",
            archetype.name(),
            self.owner
        ));
        self.weapon = Some(weapon);
        true
    }

    /// Уничтожить текущий weapon (no-op если пусто)
    pub fn detach(&mut self) -> bool {
        match self.weapon.take() {
            Some(weapon) => {
                log_info(&format!("🔧 [WeaponMount] detached {}", weapon.name()));
                true
            }
            None => false,
        }
    }

    /// Пересчитать world-space muzzle по transform'у owner'а
    pub fn aim(&mut self, owner_transform: &Transform) {
        let attach_point = self.attach_point;
        let Some(weapon) = self.weapon.as_mut() else {
            return;
        };

        let fire_point = weapon.archetype().fire_point.unwrap_or(Vec3::ZERO);
        let position = owner_transform.transform_point(attach_point + fire_point);
        let forward = owner_transform.rotation * Vec3::NEG_Z;
        weapon.set_muzzle(position, forward);
    }

    /// Trigger → weapon.fire (None — weapon не attach'ен)
    pub fn handle_fire_input(
        &mut self,
        now: f64,
        pool: &mut ProjectilePool,
        cues: &mut dyn CueSink,
    ) -> Option<FireOutcome> {
        self.weapon
            .as_mut()
            .map(|weapon| weapon.fire(now, pool, cues))
    }

    /// Reload key → weapon.reload
    pub fn handle_reload_input(&mut self, now: f64, cues: &mut dyn CueSink) -> bool {
        match self.weapon.as_mut() {
            Some(weapon) => weapon.reload(now, cues),
            None => false,
        }
    }

    /// Per-tick: завершение перезарядки по deadline
    pub fn update(&mut self, now: f64, cues: &mut dyn CueSink) -> bool {
        match self.weapon.as_mut() {
            Some(weapon) => weapon.update(now, cues),
            None => false,
        }
    }

    pub fn status(&self, now: f64) -> Option<WeaponStatus> {
        self.weapon.as_ref().map(|weapon| WeaponStatus {
            name: weapon.name().to_string(),
            current_ammo: weapon.current_ammo(),
            magazine_size: weapon.magazine_size(),
            is_reloading: weapon.is_reloading(),
            can_fire: weapon.can_fire(now),
            reload_progress: weapon.reload_progress(now),
            cooldown_remaining: weapon.cooldown_remaining(now),
        })
    }
}
