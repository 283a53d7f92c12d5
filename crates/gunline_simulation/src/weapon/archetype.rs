//! Weapon archetypes — profile + variant behaviour
//!
//! Вместо иерархии классов: фиксированный hook-контракт `WeaponHooks`
//! и tagged enum `WeaponBehavior` (один уровень специализации).
//!
//! Базовые cues (fire / reload start / reload complete / empty) эмитит сам
//! `Weapon`; hooks добавляют только variant-specific поведение.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::cues::{CueKind, CueSink, WeaponCue};
use super::profile::WeaponProfile;
use crate::logger::log;

/// Что доступно hook'у в момент вызова
pub struct HookContext<'a> {
    pub weapon_name: &'a str,
    pub shooter: Option<Entity>,
    pub muzzle_position: Vec3,
    pub cues: &'a mut dyn CueSink,
}

/// Hook contract для weapon variants (все hooks — no-op по умолчанию)
pub trait WeaponHooks {
    fn on_before_fire(&self, _ctx: &mut HookContext) {}
    fn on_after_fire(&self, _ctx: &mut HookContext) {}
    fn on_reload_start(&self, _ctx: &mut HookContext) {}
    fn on_reload_complete(&self, _ctx: &mut HookContext) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WeaponBehavior {
    /// Без дополнительного поведения
    #[default]
    Standard,

    /// Винтовка: отдача после каждого выстрела, full-auto / semi-auto
    Rifle {
        /// true = стреляет пока trigger зажат, false = только по нажатию
        full_auto: bool,
        /// Сила отдачи (camera collaborator)
        recoil_amount: f32,
    },
}

impl WeaponBehavior {
    pub fn is_full_auto(&self) -> bool {
        match self {
            WeaponBehavior::Standard => true,
            WeaponBehavior::Rifle { full_auto, .. } => *full_auto,
        }
    }
}

impl WeaponHooks for WeaponBehavior {
    fn on_before_fire(&self, ctx: &mut HookContext) {
        if let WeaponBehavior::Rifle { .. } = self {
            log(&format!("[Rifle] {} ready to fire", ctx.weapon_name));
        }
    }

    fn on_after_fire(&self, ctx: &mut HookContext) {
        if let WeaponBehavior::Rifle { recoil_amount, .. } = *self {
            ctx.cues.emit(WeaponCue {
                shooter: ctx.shooter,
                kind: CueKind::Recoil {
                    amount: recoil_amount,
                },
                token: None,
                position: ctx.muzzle_position,
            });
        }
    }

    fn on_reload_start(&self, ctx: &mut HookContext) {
        if let WeaponBehavior::Rifle { .. } = self {
            log(&format!("[Rifle] {} reload started", ctx.weapon_name));
        }
    }

    fn on_reload_complete(&self, ctx: &mut HookContext) {
        if let WeaponBehavior::Rifle { .. } = self {
            log(&format!("[Rifle] {} reload complete", ctx.weapon_name));
        }
    }
}

/// Шаблон оружия: из него `WeaponMount::attach` создаёт `Weapon` instance
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponArchetype {
    pub profile: Arc<WeaponProfile>,
    pub behavior: WeaponBehavior,

    /// Смещение muzzle относительно attach point (None = fire point не задан,
    /// configuration error: weapon attach'ится, но остаётся disabled)
    pub fire_point: Option<Vec3>,
}

impl WeaponArchetype {
    pub fn new(profile: WeaponProfile, behavior: WeaponBehavior) -> Self {
        Self {
            profile: Arc::new(profile.sanitized()),
            behavior,
            fire_point: Some(Vec3::ZERO),
        }
    }

    pub fn with_fire_point(mut self, fire_point: Vec3) -> Self {
        self.fire_point = Some(fire_point);
        self
    }

    pub fn without_fire_point(mut self) -> Self {
        self.fire_point = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn rifle() -> Self {
        Self::new(
            WeaponProfile::rifle(),
            WeaponBehavior::Rifle {
                full_auto: true,
                recoil_amount: 1.0,
            },
        )
        .with_fire_point(Vec3::new(0.0, 0.0, -0.8))
    }

    pub fn pistol() -> Self {
        Self::new(WeaponProfile::pistol(), WeaponBehavior::Standard)
            .with_fire_point(Vec3::new(0.0, 0.0, -0.3))
    }
}
